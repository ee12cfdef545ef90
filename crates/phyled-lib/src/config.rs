//! Invocation configuration — verbosity and per-LED requests parsed from letter tokens.
//!
//! Each command-line token is a run of single-letter commands:
//!
//! | letter    | effect                                                        |
//! |-----------|---------------------------------------------------------------|
//! | `q`       | quiet (verbosity 0)                                           |
//! | `v`       | raise verbosity by one, max 3                                 |
//! | `b` `y` `g` | target the blue/yellow/green LED and reset it to "all off"  |
//! | `l` `m` `h` `a` | enable 10/100/1000 Mbps link or activity on the target |
//!
//! The target LED is forgotten at the end of every token, so `b h` enables
//! nothing (the `h` has no target) while `bh` enables 1000 Mbps on blue.

use std::fmt;

use serde::Serialize;

use crate::led::{Behavior, BehaviorRequest, Led, LedRequests};

/// Report detail level, clamped to 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const QUIET: Verbosity = Verbosity(0);
    pub const SUMMARY: Verbosity = Verbosity(1);
    pub const DETAIL: Verbosity = Verbosity(2);
    pub const RAW: Verbosity = Verbosity(3);

    pub fn new(level: u8) -> Self {
        Verbosity(level.min(Self::RAW.0))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn raised(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::SUMMARY
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A letter that had no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenWarning {
    /// Not one of `qvbyglmha`.
    UnknownLetter { token: String, letter: char },
    /// A behavior letter with no LED selected earlier in the same token.
    NoTarget { token: String, letter: char },
}

impl fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenWarning::UnknownLetter { token, letter } => {
                write!(f, "ignoring unknown letter '{letter}' in \"{token}\"")
            }
            TokenWarning::NoTarget { token, letter } => write!(
                f,
                "ignoring '{letter}' in \"{token}\": no LED (b/y/g) selected earlier in this argument"
            ),
        }
    }
}

/// Everything one invocation asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub verbosity: Verbosity,
    pub requests: LedRequests,
}

impl Config {
    /// Parse every token before anything is reported, so a late `q` or `v`
    /// still governs the whole run. Ignored letters are logged.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let (config, warnings) = Self::parse_tokens(tokens);
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Like [`Config::from_tokens`], returning ignored letters instead of logging them.
    pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> (Self, Vec<TokenWarning>) {
        let mut parser = TokenParser::default();
        for token in tokens {
            parser.feed_token(token.as_ref());
        }
        (parser.config, parser.warnings)
    }

    pub fn is_query(&self) -> bool {
        self.requests.is_query()
    }
}

/// What a single letter means, independent of parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Letter {
    Quiet,
    Verbose,
    Select(Led),
    Enable(Behavior),
}

impl Letter {
    fn parse(c: char) -> Option<Self> {
        Some(match c {
            'q' => Letter::Quiet,
            'v' => Letter::Verbose,
            'b' => Letter::Select(Led::Blue),
            'y' => Letter::Select(Led::Yellow),
            'g' => Letter::Select(Led::Green),
            'l' => Letter::Enable(Behavior::Link10),
            'm' => Letter::Enable(Behavior::Link100),
            'h' => Letter::Enable(Behavior::Link1000),
            'a' => Letter::Enable(Behavior::Activity),
            _ => return None,
        })
    }
}

/// Letter-by-letter state machine. The only state besides the accumulated
/// config is the current target LED, which resets at each token boundary.
#[derive(Debug, Default)]
struct TokenParser {
    config: Config,
    target: Option<Led>,
    warnings: Vec<TokenWarning>,
}

impl TokenParser {
    fn feed_token(&mut self, token: &str) {
        self.target = None;
        for c in token.chars() {
            self.feed_letter(token, c);
        }
        self.target = None;
    }

    fn feed_letter(&mut self, token: &str, c: char) {
        let Some(letter) = Letter::parse(c) else {
            self.warnings.push(TokenWarning::UnknownLetter {
                token: token.to_string(),
                letter: c,
            });
            return;
        };
        match letter {
            Letter::Quiet => self.config.verbosity = Verbosity::QUIET,
            Letter::Verbose => self.config.verbosity = self.config.verbosity.raised(),
            Letter::Select(led) => {
                self.target = Some(led);
                self.config.requests.set(led, BehaviorRequest::DISABLE_ALL);
            }
            Letter::Enable(behavior) => match self.target {
                Some(led) => self.config.requests.get_mut(led).enable(behavior),
                None => self.warnings.push(TokenWarning::NoTarget {
                    token: token.to_string(),
                    letter: c,
                }),
            },
        }
    }
}

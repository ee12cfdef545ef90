//! Human-readable report of an apply run, gated by verbosity.

use crate::apply::{ApplyOutcome, ApplyStatus};
use crate::config::Verbosity;
use crate::led::{RegisterSnapshot, decode};

/// Column where the behavior list starts (`"yellow:"` plus padding).
const NAME_WIDTH: usize = 9;

/// One line per LED; at [`Verbosity::RAW`] a raw register line comes first.
pub fn render_leds(regs: RegisterSnapshot, verbosity: Verbosity) -> String {
    let mut out = String::new();
    if verbosity >= Verbosity::RAW {
        out.push_str(&format!(
            "[reg26 = 0x{:04x}, reg28 = 0x{:04x}]\n",
            regs.lacr, regs.lcr
        ));
    }
    for state in decode(regs) {
        let label = format!("{}:", state.led);
        out.push_str(&format!("{label:<NAME_WIDTH$}{state}\n"));
    }
    out
}

/// Full report text for `outcome`. Empty at [`Verbosity::QUIET`].
pub fn render(outcome: &ApplyOutcome, verbosity: Verbosity) -> String {
    let detail = verbosity >= Verbosity::DETAIL;
    let summary = verbosity >= Verbosity::SUMMARY;
    let mut out = String::new();

    match outcome.status() {
        ApplyStatus::Changed => {
            if detail {
                out.push_str("Old phy led configuration:\n");
                out.push_str(&render_leds(outcome.before, verbosity));
                out.push('\n');
            }
            if summary {
                out.push_str("Phy led configuration changed\n");
            }
            if detail {
                out.push_str("\nNew phy led configuration:\n");
                out.push_str(&render_leds(outcome.after, verbosity));
            }
        }
        ApplyStatus::AlreadySet => {
            if summary {
                out.push_str("Phy led configuration already set\n");
            }
            if detail {
                out.push_str("\nPhy led configuration:\n");
                out.push_str(&render_leds(outcome.after, verbosity));
            }
        }
        ApplyStatus::Query => {
            if summary {
                out.push_str("Phy led configuration:\n");
                out.push_str(&render_leds(outcome.after, verbosity));
            }
        }
        ApplyStatus::Incomplete => {
            // LED lines would lie about a register that was never read.
            let dump = detail && outcome.fully_read();
            if dump {
                out.push_str("Old phy led configuration:\n");
                out.push_str(&render_leds(outcome.before, verbosity));
                out.push('\n');
            }
            if summary {
                out.push_str("Phy led configuration not fully applied\n");
                for fault in &outcome.faults {
                    out.push_str(&format!("  {fault}\n"));
                }
            }
            if dump {
                if outcome.changed() {
                    out.push_str("\nRequested phy led configuration:\n");
                    out.push_str(&render_leds(outcome.computed, verbosity));
                }
                out.push_str("\nNew phy led configuration:\n");
                out.push_str(&render_leds(outcome.after, verbosity));
            }
        }
    }
    out
}

//! Static LED mapping — which register bits implement each (LED, behavior) pair.

use std::fmt;

use serde::Serialize;

/// The three PHY LEDs, named after their colors on the BananaPi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Led {
    Blue,
    Yellow,
    Green,
}

impl Led {
    pub const ALL: [Led; 3] = [Led::Blue, Led::Yellow, Led::Green];

    pub const fn name(self) -> &'static str {
        match self {
            Led::Blue => "blue",
            Led::Yellow => "yellow",
            Led::Green => "green",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Led {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What makes a LED light up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Behavior {
    #[serde(rename = "10Mbps")]
    Link10,
    #[serde(rename = "100Mbps")]
    Link100,
    #[serde(rename = "1000Mbps")]
    Link1000,
    #[serde(rename = "activity")]
    Activity,
}

impl Behavior {
    /// Table order; decoded behaviors are listed in this order.
    pub const ALL: [Behavior; 4] = [
        Behavior::Link10,
        Behavior::Link100,
        Behavior::Link1000,
        Behavior::Activity,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Behavior::Link10 => "10Mbps",
            Behavior::Link100 => "100Mbps",
            Behavior::Link1000 => "1000Mbps",
            Behavior::Activity => "Active (Tx/Rx)",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub(crate) const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bits to force off and bits to force on in one 16-bit register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Masks {
    pub clear: u16,
    pub set: u16,
}

impl Masks {
    pub const fn only_set(bits: u16) -> Self {
        Masks {
            clear: 0,
            set: bits,
        }
    }

    /// Every bit this mask pair has an opinion about.
    pub const fn touched(self) -> u16 {
        self.clear | self.set
    }

    pub const fn is_empty(self) -> bool {
        self.clear == 0 && self.set == 0
    }

    /// `(value & !clear) | set`
    pub const fn apply(self, value: u16) -> u16 {
        (value & !self.clear) | self.set
    }

    /// True if `value` currently shows exactly the bits this mask pair forces.
    pub const fn matches(self, value: u16) -> bool {
        value & self.touched() == self.set
    }
}

/// Clear/set masks for the two LED registers (26 = LACR, 28 = LCR).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegisterDelta {
    pub lacr: Masks,
    pub lcr: Masks,
}

impl RegisterDelta {
    pub const fn is_empty(&self) -> bool {
        self.lacr.is_empty() && self.lcr.is_empty()
    }
}

const fn lacr(bit: u8) -> RegisterDelta {
    RegisterDelta {
        lacr: Masks::only_set(1 << bit),
        lcr: Masks::only_set(0),
    }
}

const fn lcr(bit: u8) -> RegisterDelta {
    RegisterDelta {
        lacr: Masks::only_set(0),
        lcr: Masks::only_set(1 << bit),
    }
}

/// RTL8211E LED mapping, indexed by `[Led::index()][Behavior::index()]`.
///
/// Each LED owns a disjoint nibble of LCR and a single LACR bit, so the
/// contributions of different LEDs commute.
pub static LED_MAP: [[RegisterDelta; 4]; 3] = [
    // Blue (LED0)
    [lcr(8), lcr(9), lcr(10), lacr(6)],
    // Yellow (LED1)
    [lcr(4), lcr(5), lcr(6), lacr(5)],
    // Green (LED2)
    [lcr(0), lcr(1), lcr(2), lacr(4)],
];

/// Register delta that enables `behavior` on `led`.
pub fn mapping(led: Led, behavior: Behavior) -> &'static RegisterDelta {
    &LED_MAP[led.index()][behavior.index()]
}

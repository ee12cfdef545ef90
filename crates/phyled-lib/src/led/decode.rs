//! Reading LED behavior back out of register values.

use std::fmt;

use serde::Serialize;

use super::delta::RegisterSnapshot;
use super::request::BehaviorSet;
use super::table::{Behavior, Led, mapping};

/// Behaviors currently active on one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedState {
    pub led: Led,
    pub active: BehaviorSet,
}

impl LedState {
    pub fn is_disabled(&self) -> bool {
        self.active.is_empty()
    }

    pub fn behaviors(&self) -> Vec<Behavior> {
        self.active.iter().collect()
    }
}

/// `"1000Mbps | Active (Tx/Rx)"`, or `"disabled"`.
impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_disabled() {
            return f.write_str("disabled");
        }
        for (i, b) in self.active.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(b.name())?;
        }
        Ok(())
    }
}

impl Serialize for LedState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("LedState", 2)?;
        s.serialize_field("led", &self.led)?;
        s.serialize_field("active", &self.behaviors())?;
        s.end()
    }
}

/// True if `behavior` is currently in effect on `led`.
///
/// A behavior counts as active only when both registers show exactly the
/// bits its mapping would force.
pub fn is_active(regs: RegisterSnapshot, led: Led, behavior: Behavior) -> bool {
    let m = mapping(led, behavior);
    m.lacr.matches(regs.lacr) && m.lcr.matches(regs.lcr)
}

pub fn decode_led(regs: RegisterSnapshot, led: Led) -> LedState {
    LedState {
        led,
        active: Behavior::ALL
            .into_iter()
            .filter(|&b| is_active(regs, led, b))
            .collect(),
    }
}

/// Decode all three LEDs, in table order.
pub fn decode(regs: RegisterSnapshot) -> [LedState; 3] {
    Led::ALL.map(|led| decode_led(regs, led))
}

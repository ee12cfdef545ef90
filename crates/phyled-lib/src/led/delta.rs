//! Folding behavior requests into register clear/set masks.

use serde::Serialize;

use super::request::{BehaviorRequest, LedRequests};
use super::table::{Led, Masks, RegisterDelta, mapping};

/// The two LED registers, as read from or destined for the PHY.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegisterSnapshot {
    /// Register 26.
    pub lacr: u16,
    /// Register 28.
    pub lcr: u16,
}

impl RegisterSnapshot {
    pub const fn new(lacr: u16, lcr: u16) -> Self {
        RegisterSnapshot { lacr, lcr }
    }
}

impl RegisterDelta {
    /// `new = (old & !clear) | set`, per register.
    pub const fn apply(&self, old: RegisterSnapshot) -> RegisterSnapshot {
        RegisterSnapshot {
            lacr: self.lacr.apply(old.lacr),
            lcr: self.lcr.apply(old.lcr),
        }
    }
}

impl Masks {
    fn merge(&mut self, enable: bool, from: Masks) {
        if enable {
            self.clear |= from.clear;
            self.set |= from.set;
        } else {
            self.clear |= from.set;
            self.set |= from.clear;
        }
    }
}

/// Fold one behavior mapping into `acc`.
///
/// Disabling is the exact inverse of enabling: the mapping's set bits are
/// forced off and its clear bits forced on.
pub fn merge_behavior(acc: &mut RegisterDelta, enable: bool, delta: &RegisterDelta) {
    acc.lacr.merge(enable, delta.lacr);
    acc.lcr.merge(enable, delta.lcr);
}

/// Fold the mentioned behaviors of one LED into `acc`.
pub fn merge_request(acc: &mut RegisterDelta, led: Led, request: &BehaviorRequest) {
    for behavior in request.mentioned.iter() {
        merge_behavior(acc, request.enabled.contains(behavior), mapping(led, behavior));
    }
}

/// Combined register delta for all three LEDs.
///
/// Order does not matter: each LED's mappings occupy their own bits.
pub fn build_delta(requests: &LedRequests) -> RegisterDelta {
    let mut acc = RegisterDelta::default();
    for (led, request) in requests.iter() {
        merge_request(&mut acc, led, request);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::led::table::Behavior;

    fn requests(
        blue: BehaviorRequest,
        yellow: BehaviorRequest,
        green: BehaviorRequest,
    ) -> LedRequests {
        let mut r = LedRequests::default();
        r.set(Led::Blue, blue);
        r.set(Led::Yellow, yellow);
        r.set(Led::Green, green);
        r
    }

    #[test]
    fn enable_contributes_masks_as_is() {
        let d = RegisterDelta {
            lacr: Masks {
                clear: 0x0002,
                set: 0x0001,
            },
            lcr: Masks {
                clear: 0,
                set: 0x0100,
            },
        };
        let mut acc = RegisterDelta::default();
        merge_behavior(&mut acc, true, &d);
        assert_eq!(acc, d);
    }

    #[test]
    fn disable_swaps_clear_and_set() {
        let d = RegisterDelta {
            lacr: Masks {
                clear: 0x0002,
                set: 0x0001,
            },
            lcr: Masks {
                clear: 0,
                set: 0x0100,
            },
        };
        let mut on = RegisterDelta::default();
        merge_behavior(&mut on, true, &d);
        let mut off = RegisterDelta::default();
        merge_behavior(&mut off, false, &d);

        assert_eq!(off.lacr.clear, on.lacr.set);
        assert_eq!(off.lacr.set, on.lacr.clear);
        assert_eq!(off.lcr.clear, on.lcr.set);
        assert_eq!(off.lcr.set, on.lcr.clear);
    }

    #[test]
    fn enable_then_disable_outcomes_are_complements_on_touched_bits() {
        for led in Led::ALL {
            for b in Behavior::ALL {
                let d = mapping(led, b);
                let mut on = RegisterDelta::default();
                merge_behavior(&mut on, true, d);
                let mut off = RegisterDelta::default();
                merge_behavior(&mut off, false, d);

                for start in [0x0000u16, 0xffff, 0x5a5a] {
                    let s = RegisterSnapshot::new(start, start);
                    let a = on.apply(s);
                    let z = off.apply(s);
                    assert_eq!(a.lacr & d.lacr.touched(), !z.lacr & d.lacr.touched());
                    assert_eq!(a.lcr & d.lcr.touched(), !z.lcr & d.lcr.touched());
                }
            }
        }
    }

    #[test]
    fn untouched_request_contributes_nothing() {
        let d = build_delta(&LedRequests::default());
        assert!(d.is_empty());
    }

    #[test]
    fn primary_gigabit_activity_secondary_dark() {
        let d = build_delta(&requests(
            BehaviorRequest::only([Behavior::Link1000, Behavior::Activity]),
            BehaviorRequest::DISABLE_ALL,
            BehaviorRequest::UNTOUCHED,
        ));
        let after = d.apply(RegisterSnapshot::new(0, 0));
        assert_eq!(after, RegisterSnapshot::new(0x0040, 0x0400));
    }

    #[test]
    fn disable_all_clears_only_that_leds_bits() {
        let d = build_delta(&requests(
            BehaviorRequest::UNTOUCHED,
            BehaviorRequest::DISABLE_ALL,
            BehaviorRequest::UNTOUCHED,
        ));
        let after = d.apply(RegisterSnapshot::new(0xffff, 0xffff));
        // Yellow: LACR bit 5, LCR bits 4..6.
        assert_eq!(after.lacr, 0xffff & !0x0020);
        assert_eq!(after.lcr, 0xffff & !0x0070);
    }

    #[test]
    fn unmentioned_led_keeps_hardware_bits() {
        let start = RegisterSnapshot::new(0x0070, 0x0777);
        let d = build_delta(&requests(
            BehaviorRequest::only([Behavior::Link10]),
            BehaviorRequest::UNTOUCHED,
            BehaviorRequest::UNTOUCHED,
        ));
        let after = d.apply(start);
        let green_lcr = 0x0007;
        let yellow_lcr = 0x0070;
        assert_eq!(
            after.lcr & (green_lcr | yellow_lcr),
            start.lcr & (green_lcr | yellow_lcr)
        );
        assert_eq!(after.lacr & 0x0030, start.lacr & 0x0030);
        // Blue: only 10Mbps left on.
        assert_eq!(after.lcr & 0x0700, 0x0100);
        assert_eq!(after.lacr & 0x0040, 0);
    }

    #[test]
    fn led_order_does_not_matter() {
        let blue = BehaviorRequest::only([Behavior::Link100]);
        let yellow = BehaviorRequest::only([Behavior::Activity, Behavior::Link10]);
        let green = BehaviorRequest::DISABLE_ALL;

        let forward = build_delta(&requests(blue, yellow, green));

        let mut reversed = RegisterDelta::default();
        merge_request(&mut reversed, Led::Green, &green);
        merge_request(&mut reversed, Led::Yellow, &yellow);
        merge_request(&mut reversed, Led::Blue, &blue);

        assert_eq!(forward, reversed);
    }

    #[test]
    fn partial_mention_touches_only_mentioned_bits() {
        let mut req = BehaviorRequest::UNTOUCHED;
        req.enable(Behavior::Activity);
        let mut acc = RegisterDelta::default();
        merge_request(&mut acc, Led::Green, &req);
        assert_eq!(acc.lacr, Masks::only_set(0x0010));
        assert!(acc.lcr.is_empty());
    }
}

//! Per-LED behavior requests.

use super::table::{Behavior, Led};

/// A set of behaviors, one bit per [`Behavior`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorSet(u8);

impl BehaviorSet {
    pub const EMPTY: BehaviorSet = BehaviorSet(0);
    pub const ALL: BehaviorSet = BehaviorSet(0x0f);

    pub const fn contains(self, behavior: Behavior) -> bool {
        self.0 & behavior.bit() != 0
    }

    pub fn insert(&mut self, behavior: Behavior) {
        self.0 |= behavior.bit();
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in table order.
    pub fn iter(self) -> impl Iterator<Item = Behavior> {
        Behavior::ALL.into_iter().filter(move |&b| self.contains(b))
    }
}

impl FromIterator<Behavior> for BehaviorSet {
    fn from_iter<I: IntoIterator<Item = Behavior>>(iter: I) -> Self {
        let mut set = BehaviorSet::EMPTY;
        for b in iter {
            set.insert(b);
        }
        set
    }
}

/// What the command line asked for one LED.
///
/// Behaviors in `mentioned` but not in `enabled` are explicitly disabled;
/// behaviors outside `mentioned` keep whatever the hardware has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorRequest {
    pub mentioned: BehaviorSet,
    pub enabled: BehaviorSet,
}

impl BehaviorRequest {
    /// Leave every behavior of this LED alone.
    pub const UNTOUCHED: BehaviorRequest = BehaviorRequest {
        mentioned: BehaviorSet::EMPTY,
        enabled: BehaviorSet::EMPTY,
    };

    /// Mention every behavior and enable none: the LED goes dark unless
    /// behaviors are enabled afterwards.
    pub const DISABLE_ALL: BehaviorRequest = BehaviorRequest {
        mentioned: BehaviorSet::ALL,
        enabled: BehaviorSet::EMPTY,
    };

    /// Disable everything except `behaviors`.
    pub fn only(behaviors: impl IntoIterator<Item = Behavior>) -> Self {
        let mut req = Self::DISABLE_ALL;
        for b in behaviors {
            req.enable(b);
        }
        req
    }

    pub fn enable(&mut self, behavior: Behavior) {
        self.mentioned.insert(behavior);
        self.enabled.insert(behavior);
    }

    pub const fn is_untouched(&self) -> bool {
        self.mentioned.is_empty()
    }
}

/// Requests for all three LEDs, indexed by [`Led`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedRequests([BehaviorRequest; 3]);

impl LedRequests {
    pub fn get(&self, led: Led) -> &BehaviorRequest {
        &self.0[led.index()]
    }

    pub fn get_mut(&mut self, led: Led) -> &mut BehaviorRequest {
        &mut self.0[led.index()]
    }

    pub fn set(&mut self, led: Led, request: BehaviorRequest) {
        self.0[led.index()] = request;
    }

    /// True when no LED has any behavior mentioned (a pure status query).
    pub fn is_query(&self) -> bool {
        self.0.iter().all(BehaviorRequest::is_untouched)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Led, &BehaviorRequest)> {
        Led::ALL.into_iter().zip(self.0.iter())
    }
}

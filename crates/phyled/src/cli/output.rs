//! JSON output structs.

use serde::Serialize;

use phyled_lib::apply::{ApplyOutcome, ApplyStatus, RegisterFault};
use phyled_lib::led::{LedState, RegisterSnapshot, decode};
use phyled_lib::phy::PhyIdentity;

#[derive(Serialize)]
pub(super) struct LedsOutput {
    pub interface: String,
    pub phy_address: u16,
    pub identity: PhyIdentity,
    pub status: ApplyStatus,
    pub before: RegisterSnapshot,
    pub computed: RegisterSnapshot,
    pub after: RegisterSnapshot,
    pub writes: usize,
    pub faults: Vec<RegisterFault>,
    pub leds: [LedState; 3],
}

impl LedsOutput {
    pub fn new(
        interface: &str,
        phy_address: u16,
        identity: PhyIdentity,
        outcome: &ApplyOutcome,
    ) -> Self {
        LedsOutput {
            interface: interface.to_string(),
            phy_address,
            identity,
            status: outcome.status(),
            before: outcome.before,
            computed: outcome.computed,
            after: outcome.after,
            writes: outcome.writes,
            faults: outcome.faults.clone(),
            leds: decode(outcome.after),
        }
    }
}

//! Apply orchestrator — page select, read, compute, write-if-changed, restore.

use std::fmt;

use serde::Serialize;

use crate::led::{LedRequests, Masks, RegisterDelta, RegisterSnapshot, build_delta};
use crate::mdio::{MdioBus, Result};
use crate::phy::{LedPage, LedRegister};

/// How an apply ended, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyStatus {
    /// At least one register was rewritten.
    Changed,
    /// Something was requested but the hardware already matched.
    AlreadySet,
    /// Nothing was requested; the current state was read.
    Query,
    /// A register could not be read, or a needed write did not land.
    Incomplete,
}

/// A register access that failed during an apply run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "register", rename_all = "kebab-case")]
pub enum RegisterFault {
    /// The register was skipped: nothing computed, nothing written.
    ReadFailed(LedRegister),
    /// The computed value was not written; the register keeps its old value.
    WriteFailed(LedRegister),
}

impl RegisterFault {
    pub fn register(self) -> LedRegister {
        match self {
            RegisterFault::ReadFailed(reg) | RegisterFault::WriteFailed(reg) => reg,
        }
    }
}

impl fmt::Display for RegisterFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterFault::ReadFailed(reg) => write!(f, "reg {}: read failed", reg.address()),
            RegisterFault::WriteFailed(reg) => {
                write!(f, "reg {}: write failed", reg.address())
            }
        }
    }
}

/// Result of one apply run.
///
/// For a register that could not be read, `before`, `computed` and `after`
/// all hold 0 and a [`RegisterFault::ReadFailed`] is recorded.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    pub delta: RegisterDelta,
    pub before: RegisterSnapshot,
    /// Values the request asks for: `(before & !clear) | set`.
    pub computed: RegisterSnapshot,
    /// Register contents after the run. Differs from `computed` only where a
    /// write failed.
    pub after: RegisterSnapshot,
    /// Number of register writes that reached the PHY (0..=2).
    pub writes: usize,
    pub faults: Vec<RegisterFault>,
}

impl ApplyOutcome {
    /// True if the request differs from what was read back.
    pub fn changed(&self) -> bool {
        self.before != self.computed
    }

    pub fn is_complete(&self) -> bool {
        self.faults.is_empty()
    }

    /// True if both LED registers were read, so `before` and `after` decode
    /// to the real LED state.
    pub fn fully_read(&self) -> bool {
        !self
            .faults
            .iter()
            .any(|f| matches!(f, RegisterFault::ReadFailed(_)))
    }

    pub fn status(&self) -> ApplyStatus {
        if !self.is_complete() {
            ApplyStatus::Incomplete
        } else if self.changed() {
            ApplyStatus::Changed
        } else if !self.delta.is_empty() {
            ApplyStatus::AlreadySet
        } else {
            ApplyStatus::Query
        }
    }
}

/// One LED register after read, compute and (maybe) write.
struct RegisterUpdate {
    old: u16,
    computed: u16,
    landed: u16,
    write_failed: bool,
}

impl RegisterUpdate {
    fn wrote(&self) -> bool {
        self.landed != self.old
    }
}

/// Read one LED register, compute its new value, write it if it differs.
///
/// Only a failed read is returned as an error; a failed write is logged and
/// reported through `write_failed`.
fn update_register<B: MdioBus>(
    page: &LedPage<'_, B>,
    reg: LedRegister,
    masks: Masks,
) -> Result<RegisterUpdate> {
    let old = page.read(reg)?;
    let computed = masks.apply(old);
    let mut update = RegisterUpdate {
        old,
        computed,
        landed: old,
        write_failed: false,
    };
    if computed == old {
        return Ok(update);
    }
    match page.write(reg, computed) {
        Ok(()) => {
            log::info!("reg {}: 0x{old:04x} -> 0x{computed:04x}", reg.address());
            update.landed = computed;
        }
        Err(e) => {
            log::error!("{e}");
            update.write_failed = true;
        }
    }
    Ok(update)
}

/// Bring the LED registers in line with `requests`.
///
/// Registers whose computed value equals the current one are not written, so
/// repeating a request performs no writes. The default page is restored on
/// every path once the LED page has been selected.
///
/// Only a failed page selection is returned as an error. Register read and
/// write failures are logged, recorded in [`ApplyOutcome::faults`], and do
/// not stop the other register from being processed.
pub fn apply_requests(bus: &impl MdioBus, requests: &LedRequests) -> Result<ApplyOutcome> {
    let delta = build_delta(requests);
    log::debug!("{}: delta {delta:?}", bus.interface());

    let page = LedPage::select(bus)?;

    let mut outcome = ApplyOutcome {
        delta,
        before: RegisterSnapshot::default(),
        computed: RegisterSnapshot::default(),
        after: RegisterSnapshot::default(),
        writes: 0,
        faults: Vec::new(),
    };

    for (reg, masks) in [
        (LedRegister::Lacr, delta.lacr),
        (LedRegister::Lcr, delta.lcr),
    ] {
        let update = match update_register(&page, reg, masks) {
            Ok(update) => update,
            Err(e) => {
                log::error!("{e}");
                outcome.faults.push(RegisterFault::ReadFailed(reg));
                continue;
            }
        };
        if update.write_failed {
            outcome.faults.push(RegisterFault::WriteFailed(reg));
        }
        outcome.writes += usize::from(update.wrote());
        let (before, computed, after) = match reg {
            LedRegister::Lacr => (
                &mut outcome.before.lacr,
                &mut outcome.computed.lacr,
                &mut outcome.after.lacr,
            ),
            LedRegister::Lcr => (
                &mut outcome.before.lcr,
                &mut outcome.computed.lcr,
                &mut outcome.after.lcr,
            ),
        };
        *before = update.old;
        *computed = update.computed;
        *after = update.landed;
    }

    drop(page);
    Ok(outcome)
}

//! PHY-level protocol: identity gate and LED page bracket.

use serde::Serialize;

use crate::mdio::{MdioBus, MdioError, Result};
use crate::protocol::*;

/// Raw identifier registers of a verified PHY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhyIdentity {
    pub id1: u16,
    pub id2: u16,
}

/// Confirm that the PHY behind `bus` is the chip the LED register map belongs to.
///
/// Selects the default page first so a run interrupted on the LED page cannot
/// skew detection. No other register is written.
pub fn verify_identity(bus: &impl MdioBus) -> Result<PhyIdentity> {
    bus.write(REG_PAGE_SELECT, PAGE_DEFAULT)?;

    let id1 = bus.read(REG_PHYID1)?;
    if id1 & PHYID1_MASK != PHYID1_EXPECTED {
        return Err(MdioError::UnexpectedIdentity {
            register: REG_PHYID1,
            value: id1,
        });
    }

    let id2 = bus.read(REG_PHYID2)?;
    if id2 & PHYID2_MASK != PHYID2_EXPECTED {
        return Err(MdioError::UnexpectedIdentity {
            register: REG_PHYID2,
            value: id2,
        });
    }

    log::debug!(
        "{}: PHY identity 0x{id1:04x}:0x{id2:04x}",
        bus.interface()
    );
    Ok(PhyIdentity { id1, id2 })
}

/// The two registers reachable through [`LedPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedRegister {
    /// Register 26: activity blink enables.
    Lacr,
    /// Register 28: link-speed enables.
    Lcr,
}

impl LedRegister {
    pub const fn address(self) -> u8 {
        match self {
            LedRegister::Lacr => REG_LACR,
            LedRegister::Lcr => REG_LCR,
        }
    }
}

/// Exclusive access to the LED extension page.
///
/// Selecting the page yields a guard; dropping the guard restores the default
/// page, on every exit path. Restore failures are logged, not returned.
pub struct LedPage<'a, B: MdioBus> {
    bus: &'a B,
}

impl<'a, B: MdioBus> LedPage<'a, B> {
    /// Write the page-select sequence (page 7, extension page 44).
    ///
    /// If the second write fails the default page is still restored.
    pub fn select(bus: &'a B) -> Result<Self> {
        bus.write(REG_PAGE_SELECT, PAGE_EXTENSION)?;
        let page = LedPage { bus };
        bus.write(REG_EXT_PAGE, EXT_PAGE_LED)?;
        log::debug!("{}: LED page selected", bus.interface());
        Ok(page)
    }

    pub fn read(&self, reg: LedRegister) -> Result<u16> {
        self.bus.read(reg.address())
    }

    pub fn write(&self, reg: LedRegister, value: u16) -> Result<()> {
        self.bus.write(reg.address(), value)
    }
}

impl<B: MdioBus> Drop for LedPage<'_, B> {
    fn drop(&mut self) {
        match self.bus.write(REG_PAGE_SELECT, PAGE_DEFAULT) {
            Ok(()) => log::debug!("{}: default page restored", self.bus.interface()),
            Err(e) => log::error!("restoring default page: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdio::mock::{MdioOp, MockBus};

    #[test]
    fn identity_accepts_rtl8211e() {
        let bus = MockBus::new();
        let id = verify_identity(&bus).unwrap();
        assert_eq!(id.id1, 0x001c);
        assert_eq!(id.id2 & PHYID2_MASK, 0xc800);
    }

    #[test]
    fn identity_ignores_model_and_revision_bits() {
        let bus = MockBus::new();
        bus.set(REG_PHYID2, 0xcbff);
        assert!(verify_identity(&bus).is_ok());
    }

    #[test]
    fn identity_rejects_wrong_id1() {
        let bus = MockBus::new();
        bus.set(REG_PHYID1, 0x0007);
        let err = verify_identity(&bus).unwrap_err();
        assert!(matches!(
            err,
            MdioError::UnexpectedIdentity {
                register: REG_PHYID1,
                value: 0x0007
            }
        ));
        // PHYID2 is never consulted once PHYID1 mismatches.
        assert!(!bus.ops.borrow().contains(&MdioOp::Read(REG_PHYID2)));
    }

    #[test]
    fn identity_rejects_wrong_id2_oui() {
        let bus = MockBus::new();
        bus.set(REG_PHYID2, 0x0c15);
        let err = verify_identity(&bus).unwrap_err();
        assert!(matches!(
            err,
            MdioError::UnexpectedIdentity {
                register: REG_PHYID2,
                ..
            }
        ));
    }

    #[test]
    fn identity_only_writes_default_page() {
        let bus = MockBus::new();
        bus.set(REG_PHYID1, 0xffff);
        let _ = verify_identity(&bus);
        assert_eq!(bus.writes(), vec![(REG_PAGE_SELECT, PAGE_DEFAULT)]);
    }

    #[test]
    fn identity_read_failure_propagates() {
        let bus = MockBus::new();
        bus.fail_read(REG_PHYID1);
        assert!(matches!(
            verify_identity(&bus),
            Err(MdioError::ReadFailed(_))
        ));
    }

    #[test]
    fn led_page_brackets_access() {
        let bus = MockBus::with_leds(0x0040, 0x0700);
        {
            let page = LedPage::select(&bus).unwrap();
            assert_eq!(page.read(LedRegister::Lacr).unwrap(), 0x0040);
        }
        assert_eq!(
            *bus.ops.borrow(),
            vec![
                MdioOp::Write(REG_PAGE_SELECT, PAGE_EXTENSION),
                MdioOp::Write(REG_EXT_PAGE, EXT_PAGE_LED),
                MdioOp::Read(REG_LACR),
                MdioOp::Write(REG_PAGE_SELECT, PAGE_DEFAULT),
            ]
        );
    }

    #[test]
    fn led_page_first_write_failure_touches_nothing_else() {
        let bus = MockBus::new();
        bus.fail_write(REG_PAGE_SELECT);
        assert!(LedPage::select(&bus).is_err());
        assert_eq!(bus.writes(), vec![(REG_PAGE_SELECT, PAGE_EXTENSION)]);
    }

    #[test]
    fn led_page_ext_failure_still_restores_default() {
        let bus = MockBus::new();
        bus.fail_write(REG_EXT_PAGE);
        assert!(LedPage::select(&bus).is_err());
        assert_eq!(
            bus.writes().last().copied(),
            Some((REG_PAGE_SELECT, PAGE_DEFAULT))
        );
    }

    #[test]
    fn register_addresses() {
        assert_eq!(LedRegister::Lacr.address(), 26);
        assert_eq!(LedRegister::Lcr.address(), 28);
    }
}

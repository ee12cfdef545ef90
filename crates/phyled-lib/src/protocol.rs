//! Protocol constants for the Realtek RTL8211E PHY and the Linux MII ioctls.
//!
//! ## Register map
//!
//! The LED controls live on extension page 44 (0x2c), reached by writing
//! page 7 to the page-select register and then the extension page number to
//! the extension-page register:
//!
//! - register 26 (LACR): LED activity (blink on Tx/Rx) enables
//! - register 28 (LCR): LED link-speed enables
//!
//! Every access to 26/28 must be bracketed by the page-select sequence and a
//! restore of the default page (page 0).

// ── Linux MII ioctls (linux/sockios.h) ──

/// Get the address of the PHY attached to an interface.
pub const SIOCGMIIPHY: u32 = 0x8947;

/// Read a PHY register.
pub const SIOCGMIIREG: u32 = 0x8948;

/// Write a PHY register.
pub const SIOCSMIIREG: u32 = 0x8949;

/// Interface name buffer size, including the terminating NUL.
pub const IFNAMSIZ: usize = 16;

// ── Page selection ──

/// Page-select register.
pub const REG_PAGE_SELECT: u8 = 0x1f;

/// Extension-page register (valid while page 7 is selected).
pub const REG_EXT_PAGE: u8 = 0x1e;

/// Default register page.
pub const PAGE_DEFAULT: u16 = 0x0000;

/// Page that exposes the extension-page register.
pub const PAGE_EXTENSION: u16 = 0x0007;

/// Extension page holding the LED registers.
pub const EXT_PAGE_LED: u16 = 0x002c;

// ── LED registers (extension page 44) ──

/// LED Active Control Register: activity blink enables.
pub const REG_LACR: u8 = 26;

/// LED Control Register: link-speed enables.
pub const REG_LCR: u8 = 28;

// ── PHY identity ──

/// PHY identifier register 1 (OUI bits 3..18).
pub const REG_PHYID1: u8 = 2;

/// PHY identifier register 2 (OUI bits 19..24, model, revision).
pub const REG_PHYID2: u8 = 3;

/// Expected PHYID1 value for Realtek parts.
pub const PHYID1_EXPECTED: u16 = 0x001c;

/// Bits of PHYID1 compared against [`PHYID1_EXPECTED`].
pub const PHYID1_MASK: u16 = 0xffff;

/// Expected OUI bits of PHYID2 (model and revision are ignored).
pub const PHYID2_EXPECTED: u16 = 0xc800;

/// Bits of PHYID2 compared against [`PHYID2_EXPECTED`].
pub const PHYID2_MASK: u16 = 0xfc00;

//! MDIO register access — trait + Linux ioctl backend.

use std::fmt;

use crate::protocol::IFNAMSIZ;

// ── Error type ──

/// Register-access errors.
///
/// String payloads follow the convention **"context: details"** where *context*
/// identifies the operation (e.g. `"SIOCGMIIREG on eth0 reg 26"`) and
/// *details* is the underlying OS error.
#[derive(Debug)]
pub enum MdioError {
    InvalidInterfaceName(String),
    Socket(String),
    InterfaceNotFound(String),
    ReadFailed(String),
    WriteFailed(String),
    UnexpectedIdentity { register: u8, value: u16 },
    Unsupported,
}

impl fmt::Display for MdioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MdioError::InvalidInterfaceName(e) => write!(f, "Invalid interface name: {e}"),
            MdioError::Socket(e) => write!(f, "Socket creation failed: {e}"),
            MdioError::InterfaceNotFound(e) => write!(f, "PHY not found: {e}"),
            MdioError::ReadFailed(e) => write!(f, "Register read failed: {e}"),
            MdioError::WriteFailed(e) => write!(f, "Register write failed: {e}"),
            // PHYIDn lives in register n + 1.
            MdioError::UnexpectedIdentity { register, value } => {
                let n = register.saturating_sub(1);
                write!(f, "unexpected PHYID{n}: 0x{value:x}")
            }
            MdioError::Unsupported => {
                write!(f, "MDIO access is only supported on Linux")
            }
        }
    }
}

impl std::error::Error for MdioError {}

pub type Result<T> = std::result::Result<T, MdioError>;

/// Validate an interface name and encode it into a NUL-padded `ifr_name` buffer.
///
/// The kernel requires room for the terminating NUL, so names of
/// `IFNAMSIZ` bytes or longer are rejected rather than truncated.
pub fn encode_interface_name(name: &str) -> Result<[u8; IFNAMSIZ]> {
    if name.is_empty() {
        return Err(MdioError::InvalidInterfaceName("empty name".into()));
    }
    if name.len() >= IFNAMSIZ {
        return Err(MdioError::InvalidInterfaceName(format!(
            "{name}: longer than {} bytes",
            IFNAMSIZ - 1
        )));
    }
    if name.bytes().any(|b| b == 0) {
        return Err(MdioError::InvalidInterfaceName(format!(
            "{name:?}: contains NUL"
        )));
    }
    let mut buf = [0u8; IFNAMSIZ];
    buf[..name.len()].copy_from_slice(name.as_bytes());
    Ok(buf)
}

// ── Trait ──

/// A management-bus handle bound to the PHY of one network interface.
pub trait MdioBus {
    fn open(interface: &str) -> Result<Self>
    where
        Self: Sized;
    /// Name of the interface this handle is bound to.
    fn interface(&self) -> &str;
    /// MDIO address of the PHY behind the interface.
    fn phy_address(&self) -> u16;
    fn read(&self, reg: u8) -> Result<u16>;
    fn write(&self, reg: u8, value: u16) -> Result<()>;
}

// ── Linux implementation ──

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::os::fd::{AsRawFd, OwnedFd};

    use nix::libc;
    use nix::sys::socket::{AddressFamily, SockFlag, SockType, socket};

    use crate::protocol::{SIOCGMIIPHY, SIOCGMIIREG, SIOCSMIIREG};

    /// `struct mii_ioctl_data` from linux/mii.h.
    #[repr(C)]
    #[derive(Debug, Clone, Copy, Default)]
    struct MiiData {
        phy_id: u16,
        reg_num: u16,
        val_in: u16,
        val_out: u16,
    }

    /// `struct ifreq` with the MII data block overlaid on `ifr_ifru`.
    ///
    /// Padded to at least `sizeof(struct ifreq)` (40 bytes on 64-bit) since
    /// the kernel copies the whole structure in and out.
    #[repr(C)]
    #[derive(Debug, Clone, Copy)]
    struct MiiRequest {
        ifr_name: [libc::c_char; IFNAMSIZ],
        mii: MiiData,
        _pad: [u8; 16],
    }

    nix::ioctl_readwrite_bad!(mii_get_phy, SIOCGMIIPHY, MiiRequest);
    nix::ioctl_readwrite_bad!(mii_read_reg, SIOCGMIIREG, MiiRequest);
    nix::ioctl_readwrite_bad!(mii_write_reg, SIOCSMIIREG, MiiRequest);

    pub struct LinuxMdio {
        /// Closed on drop, including early-return paths during validation.
        socket: OwnedFd,
        name: String,
        ifr_name: [u8; IFNAMSIZ],
        phy_id: u16,
    }

    impl LinuxMdio {
        fn request(ifr_name: &[u8; IFNAMSIZ], mii: MiiData) -> MiiRequest {
            MiiRequest {
                ifr_name: ifr_name.map(|b| b as libc::c_char),
                mii,
                _pad: [0; 16],
            }
        }
    }

    impl MdioBus for LinuxMdio {
        fn open(interface: &str) -> Result<Self> {
            let ifr_name = encode_interface_name(interface)?;

            let socket = socket(
                AddressFamily::Inet,
                SockType::Datagram,
                SockFlag::empty(),
                None,
            )
            .map_err(|e| MdioError::Socket(format!("socket: {e}")))?;

            let mut req = Self::request(&ifr_name, MiiData::default());
            // SAFETY: `req` is a valid, fully initialized ifreq-sized buffer that
            // outlives the call; the socket fd is open.
            unsafe { mii_get_phy(socket.as_raw_fd(), &mut req) }.map_err(|e| {
                MdioError::InterfaceNotFound(format!("SIOCGMIIPHY on {interface}: {e}"))
            })?;

            log::debug!("{interface}: PHY at address {}", req.mii.phy_id);

            Ok(LinuxMdio {
                socket,
                name: interface.to_string(),
                ifr_name,
                phy_id: req.mii.phy_id,
            })
        }

        fn interface(&self) -> &str {
            &self.name
        }

        fn phy_address(&self) -> u16 {
            self.phy_id
        }

        fn read(&self, reg: u8) -> Result<u16> {
            let mut req = Self::request(
                &self.ifr_name,
                MiiData {
                    phy_id: self.phy_id,
                    reg_num: reg as u16,
                    ..Default::default()
                },
            );
            // SAFETY: see `open`.
            unsafe { mii_read_reg(self.socket.as_raw_fd(), &mut req) }.map_err(|e| {
                MdioError::ReadFailed(format!("SIOCGMIIREG on {} reg {reg}: {e}", self.name))
            })?;
            log::debug!("read  reg {reg:>2} = 0x{:04x}", req.mii.val_out);
            Ok(req.mii.val_out)
        }

        fn write(&self, reg: u8, value: u16) -> Result<()> {
            let mut req = Self::request(
                &self.ifr_name,
                MiiData {
                    phy_id: self.phy_id,
                    reg_num: reg as u16,
                    val_in: value,
                    val_out: 0,
                },
            );
            // SAFETY: see `open`.
            unsafe { mii_write_reg(self.socket.as_raw_fd(), &mut req) }.map_err(|e| {
                MdioError::WriteFailed(format!("SIOCSMIIREG on {} reg {reg}: {e}", self.name))
            })?;
            log::debug!("write reg {reg:>2} = 0x{value:04x}");
            Ok(())
        }
    }
}

#[cfg(target_os = "linux")]
pub use linux_impl::LinuxMdio;

// ── Stub for unsupported platforms ──

#[cfg(not(target_os = "linux"))]
pub struct StubMdio;

#[cfg(not(target_os = "linux"))]
impl MdioBus for StubMdio {
    fn open(interface: &str) -> Result<Self> {
        encode_interface_name(interface)?;
        Err(MdioError::Unsupported)
    }
    fn interface(&self) -> &str {
        ""
    }
    fn phy_address(&self) -> u16 {
        0
    }
    fn read(&self, _reg: u8) -> Result<u16> {
        Err(MdioError::Unsupported)
    }
    fn write(&self, _reg: u8, _value: u16) -> Result<()> {
        Err(MdioError::Unsupported)
    }
}

#[cfg(target_os = "linux")]
pub type PlatformMdio = LinuxMdio;
#[cfg(not(target_os = "linux"))]
pub type PlatformMdio = StubMdio;

/// Open the management bus of the PHY attached to `interface`.
pub fn open_interface(interface: &str) -> Result<PlatformMdio> {
    PlatformMdio::open(interface)
}

// ── Mock bus for testing ──

/// In-memory mock bus for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    use crate::protocol::*;

    /// PHY address every [`MockBus`] reports.
    pub const MOCK_PHY_ADDRESS: u16 = 1;

    /// One recorded bus operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MdioOp {
        Read(u8),
        Write(u8, u16),
    }

    /// In-memory PHY. Registers are a flat map keyed by register number;
    /// page selection is recorded but not modelled.
    pub struct MockBus {
        name: String,
        /// Register storage: register → value. Unset registers read as 0.
        pub registers: RefCell<HashMap<u8, u16>>,
        /// Every read and write, in issue order.
        pub ops: RefCell<Vec<MdioOp>>,
        /// Registers whose reads fail.
        pub fail_reads: RefCell<HashSet<u8>>,
        /// Registers whose writes fail.
        pub fail_writes: RefCell<HashSet<u8>>,
    }

    impl Default for MockBus {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockBus {
        /// A bus reporting an RTL8211E identity with all LED bits clear.
        pub fn new() -> Self {
            let bus = MockBus {
                name: "mock0".into(),
                registers: RefCell::new(HashMap::new()),
                ops: RefCell::new(Vec::new()),
                fail_reads: RefCell::new(HashSet::new()),
                fail_writes: RefCell::new(HashSet::new()),
            };
            bus.set(REG_PHYID1, 0x001c);
            bus.set(REG_PHYID2, 0xc915);
            bus
        }

        /// A bus with the given LACR/LCR contents.
        pub fn with_leds(lacr: u16, lcr: u16) -> Self {
            let bus = Self::new();
            bus.set(REG_LACR, lacr);
            bus.set(REG_LCR, lcr);
            bus
        }

        pub fn set(&self, reg: u8, value: u16) {
            self.registers.borrow_mut().insert(reg, value);
        }

        pub fn get(&self, reg: u8) -> u16 {
            self.registers.borrow().get(&reg).copied().unwrap_or(0)
        }

        /// Recorded writes as `(register, value)` pairs.
        pub fn writes(&self) -> Vec<(u8, u16)> {
            self.ops
                .borrow()
                .iter()
                .filter_map(|op| match *op {
                    MdioOp::Write(reg, value) => Some((reg, value)),
                    MdioOp::Read(_) => None,
                })
                .collect()
        }

        /// Recorded writes to a specific register.
        pub fn writes_to(&self, reg: u8) -> Vec<u16> {
            self.writes()
                .into_iter()
                .filter(|&(r, _)| r == reg)
                .map(|(_, v)| v)
                .collect()
        }

        pub fn fail_read(&self, reg: u8) {
            self.fail_reads.borrow_mut().insert(reg);
        }

        pub fn fail_write(&self, reg: u8) {
            self.fail_writes.borrow_mut().insert(reg);
        }
    }

    impl MdioBus for MockBus {
        fn open(_interface: &str) -> Result<Self> {
            Ok(Self::new())
        }

        fn interface(&self) -> &str {
            &self.name
        }

        fn phy_address(&self) -> u16 {
            MOCK_PHY_ADDRESS
        }

        fn read(&self, reg: u8) -> Result<u16> {
            self.ops.borrow_mut().push(MdioOp::Read(reg));
            if self.fail_reads.borrow().contains(&reg) {
                return Err(MdioError::ReadFailed(format!(
                    "mock: read failure injected on reg {reg}"
                )));
            }
            Ok(self.get(reg))
        }

        fn write(&self, reg: u8, value: u16) -> Result<()> {
            self.ops.borrow_mut().push(MdioOp::Write(reg, value));
            if self.fail_writes.borrow().contains(&reg) {
                return Err(MdioError::WriteFailed(format!(
                    "mock: write failure injected on reg {reg}"
                )));
            }
            self.set(reg, value);
            Ok(())
        }
    }
}

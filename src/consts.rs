pub const SC_RDM: u8 = 0xCC;
pub const SC_SUB_MESSAGE: u8 = 0x01;

pub const PREAMBLE_BYTE: u8 = 0xFE;
pub const SEPARATOR_BYTE: u8 = 0xAA;
/// Amount of preamble bytes a discovery response is normalized to by the driver.
pub const DISCOVERY_PREAMBLE_SIZE: usize = 7;

/// The all-devices broadcast address. Never a device identity.
pub const BROADCAST_UID: u64 = 0xFFFF_FFFFFFFF;
/// Highest unique id that takes part in discovery. Marks the top of the search space.
pub const UID_ALL: u64 = 0xFFFF_FFFFFFFE;
/// Mask for the 48 bits a unique id occupies in its host integer form.
pub const UID_MASK: u64 = 0xFFFF_FFFFFFFF;
pub const RDM_UID_SIZE: usize = 6;

pub const RDM_MIN_PACKAGE_SIZE: usize = 26;
pub const RDM_MAX_PACKAGE_SIZE: usize = 257;
/// Excluding preamble and separator
pub const RDM_DISCOVERY_RESPONSE_SIZE: usize = 16;
/// Including 7 bytes preamble + 1 byte separator
pub const RDM_MAX_DISCOVERY_RESPONSE_SIZE: usize = RDM_DISCOVERY_RESPONSE_SIZE + 8;

pub const RDM_MAX_PARAMETER_DATA_LENGTH: usize = 231;

pub const DEFAULT_TOD_SIZE: usize = 200;
/// A depth first bisection of the 48 bit space never holds more than one
/// pending sibling per level.
pub const DISCOVERY_STACK_SIZE: usize = 64;

pub const RECEIVE_TIMEOUT_MICROS: u64 = 2800;
pub const LATE_RESPONSE_TIMEOUT_MICROS: u64 = 5800;

pub const UNMUTE_RETRIES: u8 = 3;
pub const MUTE_RETRIES: u8 = 10;
pub const DISCOVERY_RETRIES: u8 = 3;
pub const QUICK_FIND_RETRIES: u8 = 10;
pub const QUICK_FIND_DISCOVERY_RETRIES: u8 = 3;

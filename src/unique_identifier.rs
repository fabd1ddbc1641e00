use crate::consts::{BROADCAST_UID, UID_ALL, UID_MASK};

/// Raised when a host integer can't be represented as a [UniqueIdentifier].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UidError {
    /// One of the upper 16 bits of the integer is set.
    OutOfRange(u64),
    /// The value is the broadcast or a manufacturer broadcast address.
    IsBroadcast,
}

impl core::fmt::Display for UidError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UidError::OutOfRange(value) => write!(f, "{:#x} does not fit into 48 bits", value),
            UidError::IsBroadcast => write!(f, "unique id is a broadcast address"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UidError {}

/// The 48 bit unique id of an RDM device.
///
/// Ordering follows the numeric value of the id, the manufacturer id being the
/// most significant part. That is the order discovery searches the id space in.
/// [more information](https://tsp.esta.org/tsp/working_groups/CP/mfctrIDs.php)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UniqueIdentifier {
    manufacturer_uid: u16,
    device_uid: u32,
}

impl core::fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04X}:{:08X}", self.manufacturer_uid, self.device_uid)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for UniqueIdentifier {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{:04X}:{:08X}", self.manufacturer_uid, self.device_uid);
    }
}

impl UniqueIdentifier {
    pub fn new(manufacturer_uid: u16, device_uid: u32) -> Result<Self, UidError> {
        if device_uid == u32::MAX {
            return Err(UidError::IsBroadcast);
        }

        Ok(UniqueIdentifier {
            manufacturer_uid,
            device_uid,
        })
    }

    pub fn manufacturer_uid(&self) -> u16 {
        self.manufacturer_uid
    }

    pub fn device_uid(&self) -> u32 {
        self.device_uid
    }

    /// Is this the id that marks the top of the discovery space.
    pub fn is_all(&self) -> bool {
        u64::from(*self) == UID_ALL
    }

    /// Big endian wire representation.
    pub fn to_bytes(&self) -> [u8; 6] {
        let mut buffer = [0u8; 6];

        buffer[..2].copy_from_slice(&self.manufacturer_uid.to_be_bytes());
        buffer[2..].copy_from_slice(&self.device_uid.to_be_bytes());

        buffer
    }

    /// Parses the big endian wire representation.
    pub fn from_bytes(buffer: &[u8; 6]) -> Result<Self, UidError> {
        let manufacturer_uid = u16::from_be_bytes([buffer[0], buffer[1]]);
        let device_uid = u32::from_be_bytes([buffer[2], buffer[3], buffer[4], buffer[5]]);

        Self::new(manufacturer_uid, device_uid)
    }
}

impl TryFrom<u64> for UniqueIdentifier {
    type Error = UidError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value & !UID_MASK != 0 {
            return Err(UidError::OutOfRange(value));
        }

        Self::new((value >> u32::BITS) as u16, value as u32)
    }
}

impl From<UniqueIdentifier> for u64 {
    fn from(value: UniqueIdentifier) -> Self {
        ((value.manufacturer_uid as u64) << u32::BITS) | value.device_uid as u64
    }
}

/// Destination of a discovery command.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PackageAddress {
    /// Broadcast to all devices.
    Broadcast,
    /// Send package to a specific device.
    Device(UniqueIdentifier),
}

impl PackageAddress {
    pub fn to_bytes(&self) -> [u8; 6] {
        match self {
            Self::Broadcast => [0xFFu8; 6],
            Self::Device(uid) => uid.to_bytes(),
        }
    }
}

impl From<PackageAddress> for u64 {
    fn from(value: PackageAddress) -> Self {
        match value {
            PackageAddress::Broadcast => BROADCAST_UID,
            PackageAddress::Device(uid) => uid.into(),
        }
    }
}

//! Decoding of DISC_UNIQUE_BRANCH responses.
//!
//! A responder answers a discovery request without break and without a
//! regular RDM header. Every byte of its uid and of the checksum is sent
//! twice, once or-ed with `0xAA` and once or-ed with `0x55`. Anding both
//! copies restores the byte. The bits set by the or have to survive on the
//! bus, otherwise the frame is damaged. When several responders answer at the
//! same time their frames overlap on the bus, which in almost every case breaks
//! the checksum. A failed decode therefore means "more than one device in
//! this range".

use crate::consts::{
    DISCOVERY_PREAMBLE_SIZE, PREAMBLE_BYTE, RDM_MAX_DISCOVERY_RESPONSE_SIZE, SEPARATOR_BYTE,
};
use crate::unique_identifier::UniqueIdentifier;
use crate::utils::calculate_checksum;

const UID_OFFSET: usize = DISCOVERY_PREAMBLE_SIZE + 1;
const CHECKSUM_OFFSET: usize = UID_OFFSET + 12;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiscoveryResponseError {
    /// The buffer is shorter than a discovery response; contains the length.
    BufferTooSmall(usize),
    /// The preamble or the separator are missing.
    WrongPreamble,
    /// A byte lost one of the bits its encoding always sets.
    WrongEncoding,
    /// The decoded checksum doesn't match the decoded uid.
    WrongChecksum { expected: u16, received: u16 },
    /// The decoded uid is a broadcast address.
    UidIsBroadcast,
}

impl core::fmt::Display for DiscoveryResponseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DiscoveryResponseError::BufferTooSmall(length) => {
                write!(f, "discovery response of {} bytes is too small", length)
            },
            DiscoveryResponseError::WrongPreamble => write!(f, "preamble is incorrect"),
            DiscoveryResponseError::WrongEncoding => write!(f, "encoded byte pair is damaged"),
            DiscoveryResponseError::WrongChecksum { expected, received } => write!(
                f,
                "checksum {:04x} does not match calculated {:04x}",
                received, expected
            ),
            DiscoveryResponseError::UidIsBroadcast => write!(f, "decoded uid is a broadcast"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DiscoveryResponseError {}

/// Decodes a discovery response and returns the uid of the single responder.
///
/// The buffer has to start with the 7 preamble bytes followed by the
/// separator, as drivers hand it over. Anything else is treated as garbage.
pub fn decode_discovery_response(
    buffer: &[u8],
) -> Result<UniqueIdentifier, DiscoveryResponseError> {
    if buffer.len() < RDM_MAX_DISCOVERY_RESPONSE_SIZE {
        return Err(DiscoveryResponseError::BufferTooSmall(buffer.len()));
    }

    if buffer[..DISCOVERY_PREAMBLE_SIZE]
        .iter()
        .any(|&byte| byte != PREAMBLE_BYTE)
        || buffer[DISCOVERY_PREAMBLE_SIZE] != SEPARATOR_BYTE
    {
        return Err(DiscoveryResponseError::WrongPreamble);
    }

    let mut uid_buffer = [0u8; 6];
    decode_disc_unique(&buffer[UID_OFFSET..CHECKSUM_OFFSET], &mut uid_buffer)?;

    let mut checksum_buffer = [0u8; 2];
    decode_disc_unique(
        &buffer[CHECKSUM_OFFSET..RDM_MAX_DISCOVERY_RESPONSE_SIZE],
        &mut checksum_buffer,
    )?;

    // The checksum covers the encoded bytes. Every encoded pair sums up to
    // its decoded byte plus 0xFF, hence the fixed 6 * 0xFF.
    let expected = calculate_checksum(&uid_buffer).wrapping_add(6 * 0xFF);
    let received = u16::from_be_bytes(checksum_buffer);

    log::trace!(
        "discovery response {:02x?}, checksum {:04x} -> {:04x}",
        uid_buffer,
        received,
        expected
    );

    if expected != received {
        return Err(DiscoveryResponseError::WrongChecksum { expected, received });
    }

    UniqueIdentifier::from_bytes(&uid_buffer).map_err(|_| DiscoveryResponseError::UidIsBroadcast)
}

/// Encodes the discovery response a responder with `uid` sends.
pub fn encode_discovery_response(uid: UniqueIdentifier) -> [u8; RDM_MAX_DISCOVERY_RESPONSE_SIZE] {
    let mut frame_buffer = [PREAMBLE_BYTE; RDM_MAX_DISCOVERY_RESPONSE_SIZE];
    frame_buffer[DISCOVERY_PREAMBLE_SIZE] = SEPARATOR_BYTE;

    encode_disc_unique(&uid.to_bytes(), &mut frame_buffer[UID_OFFSET..CHECKSUM_OFFSET]);

    let checksum = calculate_checksum(&frame_buffer[UID_OFFSET..CHECKSUM_OFFSET]);
    encode_disc_unique(
        &checksum.to_be_bytes(),
        &mut frame_buffer[CHECKSUM_OFFSET..RDM_MAX_DISCOVERY_RESPONSE_SIZE],
    );

    frame_buffer
}

/// Decode a discovery package. The destination has to be at least half the source size.
fn decode_disc_unique(src: &[u8], dest: &mut [u8]) -> Result<(), DiscoveryResponseError> {
    for (dest_byte, chunk) in dest.iter_mut().zip(src.chunks_exact(2)) {
        if chunk[0] & 0xAA != 0xAA || chunk[1] & 0x55 != 0x55 {
            return Err(DiscoveryResponseError::WrongEncoding);
        }

        *dest_byte = chunk[0] & chunk[1];
    }

    Ok(())
}

fn encode_disc_unique(src: &[u8], dest: &mut [u8]) {
    for (byte, chunk) in src.iter().zip(dest.chunks_exact_mut(2)) {
        chunk[0] = byte | 0xAA;
        chunk[1] = byte | 0x55;
    }
}

use crate::command_class::ResponseCommandClass;
use crate::consts::{RDM_MAX_PACKAGE_SIZE, RDM_MIN_PACKAGE_SIZE, SC_RDM, SC_SUB_MESSAGE};
use crate::layouts::rdm_response_layout;
use crate::pids;
use crate::rdm_types::DiscoveryMuteResponse;
use crate::unique_identifier::UniqueIdentifier;
use crate::utils::calculate_checksum;

#[derive(Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RdmDeserializationError {
    /// Buffer must be at least 26 bytes
    BufferTooSmall,
    /// Buffer must be at most 257 bytes
    BufferTooBig,
    /// The message length field is incorrect; contains result of parsing
    WrongMessageLength(usize),
    /// Wrong checksum
    WrongChecksum,
    /// Received wrong start code (0xCC) or sub start code (0x01)
    WrongStartCode,
    /// The frame is not a discovery command response; contains the command class field
    NotADiscoveryResponse(u8),
    /// The frame answers a different parameter; contains the parameter id field
    WrongParameterId(u16),
    /// The source uid is a broadcast address.
    SourceUidIsBroadcast,
    /// The parameter data could not be deserialized.
    ParameterDataNotDeserializable,
}

impl core::fmt::Display for RdmDeserializationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RdmDeserializationError::BufferTooSmall => write!(f, "buffer too small"),
            RdmDeserializationError::BufferTooBig => write!(f, "buffer to big"),
            RdmDeserializationError::WrongMessageLength(message_length) => {
                write!(f, "message length {} is incorrect", message_length)
            },
            RdmDeserializationError::WrongChecksum => write!(f, "checksum is incorrect"),
            RdmDeserializationError::WrongStartCode => write!(f, "start code is incorrect"),
            RdmDeserializationError::NotADiscoveryResponse(command_class) => {
                write!(f, "command class {:#04x} is not a discovery response", command_class)
            },
            RdmDeserializationError::WrongParameterId(parameter_id) => {
                write!(f, "parameter id {:#06x} is not DISC_MUTE", parameter_id)
            },
            RdmDeserializationError::SourceUidIsBroadcast => write!(f, "source uid is a broadcast"),
            RdmDeserializationError::ParameterDataNotDeserializable => {
                write!(f, "parameter data is malformed")
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RdmDeserializationError {}

/// A responder acknowledged a DISC_MUTE request.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiscoveryMuteAck {
    /// The device that acknowledged.
    pub source_uid: UniqueIdentifier,
    /// The control field and binding uid sent along.
    pub response: DiscoveryMuteResponse,
}

/// Deserializes a complete RDM frame (start code included) that is expected to
/// acknowledge a DISC_MUTE request.
pub fn deserialize_discovery_mute_ack(
    buffer: &[u8],
) -> Result<DiscoveryMuteAck, RdmDeserializationError> {
    let buffer_size = buffer.len();

    if buffer_size < RDM_MIN_PACKAGE_SIZE {
        return Err(RdmDeserializationError::BufferTooSmall);
    }

    if buffer_size > RDM_MAX_PACKAGE_SIZE {
        return Err(RdmDeserializationError::BufferTooBig);
    }

    let response_view = rdm_response_layout::View::new(buffer);

    if response_view.start_code().read() != SC_RDM
        || response_view.sub_start_code().read() != SC_SUB_MESSAGE
    {
        return Err(RdmDeserializationError::WrongStartCode);
    }

    // The driver may hand over trailing bytes, the message length decides.
    let message_length = response_view.message_length().read() as usize;
    if message_length + 2 > buffer_size || message_length + 2 < RDM_MIN_PACKAGE_SIZE {
        return Err(RdmDeserializationError::WrongMessageLength(message_length));
    }

    let expected_checksum = calculate_checksum(&buffer[..message_length]);
    let actual_checksum =
        u16::from_be_bytes([buffer[message_length], buffer[message_length + 1]]);

    if expected_checksum != actual_checksum {
        return Err(RdmDeserializationError::WrongChecksum);
    }

    let command_class_field = response_view.command_class().read();
    if ResponseCommandClass::try_from(command_class_field)
        != Ok(ResponseCommandClass::DiscoveryCommandResponse)
    {
        return Err(RdmDeserializationError::NotADiscoveryResponse(
            command_class_field,
        ));
    }

    let parameter_id = response_view.parameter_id().read();
    if parameter_id != pids::DISC_MUTE {
        return Err(RdmDeserializationError::WrongParameterId(parameter_id));
    }

    let parameter_data_length = response_view.parameter_data_length().read() as usize;
    let parameter_data_and_checksum = response_view.parameter_data_and_checksum();
    // 24 bytes header in front of the parameter data
    if parameter_data_length + 24 != message_length {
        return Err(RdmDeserializationError::WrongMessageLength(message_length));
    }

    let source_uid = UniqueIdentifier::from_bytes(response_view.source_uid())
        .map_err(|_| RdmDeserializationError::SourceUidIsBroadcast)?;

    let response =
        DiscoveryMuteResponse::deserialize(&parameter_data_and_checksum[..parameter_data_length])
            .map_err(|_| RdmDeserializationError::ParameterDataNotDeserializable)?;

    Ok(DiscoveryMuteAck {
        source_uid,
        response,
    })
}

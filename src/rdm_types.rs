use crate::unique_identifier::UniqueIdentifier;
use modular_bitfield::bitfield;
use modular_bitfield::prelude::B12;

#[derive(Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeserializationError;

impl core::fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "There was a deserialization error.")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DeserializationError {}

/// Parameter data of a DISC_MUTE/DISC_UN_MUTE acknowledgement.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiscoveryMuteResponse {
    /// The responder is a proxy device.
    pub managed_proxy: bool,
    /// The responder supports sub devices.
    pub sub_device: bool,
    /// The responder is not operational before receiving a firmware update.
    pub boot_loader: bool,
    /// A proxy device has responded on behalf of another device.
    pub proxy_device: bool,
    /// Included if the responding device contains multiple responder ports.
    /// It is the UID of the primary port of the device.
    pub binding_uid: Option<UniqueIdentifier>,
}

#[bitfield]
struct DiscControlField {
    pub managed_proxy: bool,
    pub sub_device: bool,
    pub boot_loader: bool,
    pub proxy_device: bool,
    #[skip]
    reserved: B12,
}

impl DiscoveryMuteResponse {
    /// Deserializes the control field and the optional binding uid.
    /// Responders without a control field (empty parameter data) are accepted as well.
    pub fn deserialize(data: &[u8]) -> Result<Self, DeserializationError> {
        let control_field = match data.len() {
            0 => 0u16,
            2 | 8 => u16::from_be_bytes([data[0], data[1]]),
            _ => return Err(DeserializationError),
        };

        // The bitfield is filled from the least significant bit upwards.
        let control_field = DiscControlField::from_bytes(control_field.to_le_bytes());
        let mut discovery_mute_response = Self {
            managed_proxy: control_field.managed_proxy(),
            sub_device: control_field.sub_device(),
            boot_loader: control_field.boot_loader(),
            proxy_device: control_field.proxy_device(),
            binding_uid: None,
        };

        if data.len() == 8 {
            let binding_uid = UniqueIdentifier::from_bytes(
                data[2..8].try_into().map_err(|_| DeserializationError)?,
            )
            .map_err(|_| DeserializationError)?;

            discovery_mute_response.binding_uid = Some(binding_uid);
        }

        Ok(discovery_mute_response)
    }
}

use crate::command_class::RequestCommandClass;
use crate::types::{DataPack, ResponseBuffer};
use crate::unique_identifier::PackageAddress;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmxError<E> {
    /// Nothing was received in time.
    /// Discovery treats this exactly like an empty receive.
    TimeoutError,
    /// An error raised by the driver.
    DriverError(E),
}

impl<E: core::fmt::Display> core::fmt::Display for DmxError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DmxError::TimeoutError => write!(f, "request timed out"),
            DmxError::DriverError(error) => error.fmt(f),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Display + core::fmt::Debug> std::error::Error for DmxError<E> {}

/// A discovery command, framed and sent by the driver.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiscoveryRequest {
    pub command_class: RequestCommandClass,
    pub parameter_id: u16,
    /// The unique id of the recipient of the request.
    pub destination_uid: PackageAddress,
    pub parameter_data: DataPack,
}

impl DiscoveryRequest {
    /// Creates a discovery command with empty parameter data.
    pub fn empty(destination_uid: PackageAddress, parameter_id: u16) -> Self {
        Self {
            command_class: RequestCommandClass::DiscoveryCommand,
            parameter_id,
            destination_uid,
            parameter_data: DataPack::new(),
        }
    }
}

/// Trait that ensures that the same Error is used across the driver traits.
pub trait ControllerDriverErrorDef {
    /// The driver specific error.
    type DriverError;
}

/// Access to the RDM ports of a controller, used by discovery.
///
/// Both methods must return quickly, discovery runs inside the main loop.
pub trait DiscoveryDriver: ControllerDriverErrorDef {
    /// Frames `request` as an RDM package and starts sending it on the port.
    /// Does not wait for a response.
    fn send(
        &mut self,
        port_index: usize,
        request: &DiscoveryRequest,
    ) -> Result<(), DmxError<Self::DriverError>>;

    /// Polls the port for a response to the last request. Waits at most
    /// `timeout_us`.
    /// Returns `None` if nothing was received.
    fn receive(
        &mut self,
        port_index: usize,
        timeout_us: u32,
    ) -> Result<Option<ResponseBuffer>, DmxError<Self::DriverError>>;
}

/// Timing and supervision of the platform.
pub trait Hardware {
    /// Monotonic microseconds.
    fn micros(&self) -> u64;
    /// Keeps the watchdog from resetting the device.
    fn watchdog_feed(&mut self);
}

use crate::consts::{RDM_MAX_PACKAGE_SIZE, RDM_MAX_PARAMETER_DATA_LENGTH};

pub type DataPack = heapless::Vec<u8, RDM_MAX_PARAMETER_DATA_LENGTH>;

/// Raw bytes the driver received on the bus after the last command.
///
/// This is either a discovery response (preamble, separator, encoded uid and
/// checksum) or a complete RDM frame starting with [crate::consts::SC_RDM].
pub type ResponseBuffer = heapless::Vec<u8, RDM_MAX_PACKAGE_SIZE>;

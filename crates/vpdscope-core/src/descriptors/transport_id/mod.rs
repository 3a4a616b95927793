//! TransportID decoding (initiator port identifiers).
//!
//! A TransportID list is a run of records whose first byte carries a format
//! code (bits 7..6) and a protocol identifier (bits 3..0). Records are 24
//! bytes except iSCSI, which declares its name length in bytes 2..3. Decoding
//! never fails: records cut short by the buffer end decode to
//! `TransportId::Truncated`, unknown protocols to `TransportId::Unknown`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::TransportIdError;
pub use parser::{TransportId, TransportIdIter, TransportIdRecord};

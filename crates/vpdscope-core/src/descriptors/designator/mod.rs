//! Identification descriptor decoding (device identification VPD page).
//!
//! A page body is a list of TLV descriptors: a four byte header (protocol id,
//! code set, PIV, association, designator type, length) followed by the
//! designator bytes. `iter` walks the list with optional filters and
//! bounds-checks every descriptor before handing it out; `parser` decodes one
//! designator per its type. Two listings sit on top: `full` emits every
//! designator with its header fields, `abridged` emits only identifiers that
//! are usable outside the device and pairs SAS port addresses with relative
//! port numbers.
//!
//! Only a descriptor that does not fit in the buffer is fatal. Prerequisite
//! violations (code set, association, length) degrade that one designator to
//! raw bytes plus a diagnostic.

pub mod abridged;
pub mod error;
pub mod full;
pub mod iter;
pub mod layout;
pub mod parser;
pub mod reader;

pub use abridged::{ShortIdentifier, ShortValue};
pub use error::{DesignatorError, DesignatorProblem};
pub use full::{DesignatorRecord, Heading};
pub use iter::{DescriptorFilter, DescriptorIter, IterStep, next_descriptor};
pub use parser::{Descriptor, Designator, Eui64, decode_designator, parse_descriptor};

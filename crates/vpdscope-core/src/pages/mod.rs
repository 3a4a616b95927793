//! VPD page handling: response validation, page table and standard decoders.
//!
//! A fetched response is first validated into a [`VpdPage`] (echoed page
//! code, hard size limit, declared length). The standard decoder for it is
//! then chosen by [`PageKind`]: the page code alone, except for 0xb0 and 0xb1
//! where the peripheral device type read from the response picks the meaning.
//! Decoders follow the same layering as the descriptor decoders (`layout`,
//! `reader`, per-page parsers, `error`) and push their output into a
//! [`RecordSink`](crate::RecordSink).

mod ata;
mod device_class;
mod device_id;
mod error;
mod fixed;
mod header;
mod kind;
mod layout;
mod lists;
mod ports;
mod reader;
mod table;

pub use ata::{AtaIdentifySummary, AtaInformation};
pub use device_class::{BlockDeviceCharacteristics, BlockLimits};
pub use device_id::DeviceIdSelection;
pub use error::PageError;
pub use fixed::{ExtendedInquiry, SupportedPage};
pub use header::{ResponseHeader, VpdPage};
pub use kind::{CharacteristicsPage, LimitsPage, PageKind, default_alloc_len};
pub use layout::{DEFAULT_ALLOC_LEN, MAX_RESPONSE_LEN};
pub use lists::{ModePagePolicy, NetworkAddress, ProtocolSpecific};
pub use table::{PageEntry, entries, find_by_acronym, lookup};

use crate::sink::RecordSink;

/// Runs the standard decoder for `kind`.
///
/// `subvalue` only matters for device identification, where it selects the
/// associations. `abridged` switches designator lists to the short form.
pub(crate) fn decode_standard(
    page: &VpdPage,
    kind: PageKind,
    subvalue: u8,
    abridged: bool,
    sink: &mut RecordSink,
) -> Result<(), PageError> {
    match kind {
        PageKind::SupportedPages => fixed::decode_supported_pages(page, sink),
        PageKind::UnitSerialNumber => fixed::decode_unit_serial_number(page, sink),
        PageKind::DeviceIdentification => device_id::decode_device_identification(
            page,
            DeviceIdSelection::from_subvalue(subvalue),
            abridged,
            sink,
        ),
        PageKind::SoftwareInterfaceIdentification => fixed::decode_software_interface_ids(page, sink),
        PageKind::ManagementNetworkAddresses => lists::decode_network_addresses(page, sink),
        PageKind::ExtendedInquiry => fixed::decode_extended_inquiry(page, sink),
        PageKind::ModePagePolicy => lists::decode_mode_page_policy(page, sink),
        PageKind::ScsiPorts => ports::decode_scsi_ports(page, abridged, sink),
        PageKind::AtaInformation => ata::decode_ata_information(page, sink),
        PageKind::ProtocolSpecificLogicalUnit => lists::decode_protocol_specific(page, true, sink),
        PageKind::ProtocolSpecificPort => lists::decode_protocol_specific(page, false, sink),
        PageKind::Limits(limits) => device_class::decode_limits(page, limits, sink),
        PageKind::Characteristics(characteristics) => {
            device_class::decode_characteristics(page, characteristics, sink)
        }
    }
}

//! SCSI ports page (0x88): per port, the initiator transport ids and the
//! target port designators.
//!
//! Transport id diagnostics carry offsets into the page body; designator
//! offsets are relative to their own target port descriptor list.

use super::device_id::list_designators;
use super::error::PageError;
use super::header::VpdPage;
use super::layout;
use super::reader::PageReader;
use crate::Record;
use crate::codes::Association;
use crate::descriptors::designator::{DescriptorFilter, Heading};
use crate::descriptors::transport_id::parser::decode_transport_ids;
use crate::sink::RecordSink;

const SCSI_PORTS: &str = "SCSI Ports";
const TARGET_PORT_DESCRIPTORS: &str = "Target port descriptor(s)";

pub(crate) fn decode_scsi_ports(page: &VpdPage, abridged: bool, sink: &mut RecordSink) -> Result<(), PageError> {
    let reader = PageReader::new(page.body());
    let mut offset = 0;
    while offset < reader.len() {
        let port_len = reader.descriptor_len(
            offset,
            layout::PORT_HEADER_LEN,
            layout::PORT_INITIATOR_ID_LENGTH_RANGE,
            SCSI_PORTS,
        )?;
        let port_range = layout::PORT_RELATIVE_PORT_RANGE;
        let port = reader.read_u16_be(offset + port_range.start..offset + port_range.end)?;
        sink.push(Record::RelativePort { port });

        let initiator_start = offset + layout::PORT_HEADER_LEN;
        let initiator_ids = reader.read_slice(initiator_start..offset + port_len)?;
        if !initiator_ids.is_empty() {
            decode_transport_ids(initiator_ids, initiator_start, sink);
        }

        let targets = offset + port_len;
        let targets_len = reader.descriptor_len(
            targets,
            layout::TARGET_DESCRIPTORS_HEADER_LEN,
            layout::TARGET_DESCRIPTORS_LENGTH_RANGE,
            SCSI_PORTS,
        )?;
        let list_start = targets + layout::TARGET_DESCRIPTORS_HEADER_LEN;
        let list = reader.read_slice(list_start..targets + targets_len)?;
        if !list.is_empty() {
            if !abridged || !initiator_ids.is_empty() {
                sink.push(Record::Section {
                    title: TARGET_PORT_DESCRIPTORS.to_string(),
                });
            }
            list_designators(
                list,
                DescriptorFilter::association(Association::TargetPort),
                Heading::Once(SCSI_PORTS),
                abridged,
                sink,
            )?;
        }
        offset = targets + targets_len;
    }
    Ok(())
}

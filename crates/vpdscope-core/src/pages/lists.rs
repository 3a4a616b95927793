//! Pages made of simple descriptor lists: management network addresses,
//! mode page policy and the two protocol-specific information pages.
//!
//! Offsets in diagnostics are relative to the page body.

use serde::{Deserialize, Serialize};

use super::error::PageError;
use super::header::VpdPage;
use super::layout;
use super::reader::PageReader;
use crate::Record;
use crate::codes::{Association, ProtocolId};
use crate::sink::RecordSink;

/// One management network address descriptor (page 0x85).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAddress {
    pub association: Association,
    pub service_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NetworkAddress {
    pub fn service_type_name(&self) -> String {
        match self.service_type {
            0 => "unspecified".to_string(),
            1 => "storage configuration service".to_string(),
            2 => "diagnostics".to_string(),
            3 => "status".to_string(),
            4 => "logging".to_string(),
            5 => "code download".to_string(),
            other => format!("reserved[0x{other:x}]"),
        }
    }
}

/// One mode page policy descriptor (page 0x87).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePagePolicy {
    pub page_code: u8,
    pub subpage_code: u8,
    pub mlus: bool,
    pub policy: u8,
}

impl ModePagePolicy {
    pub fn policy_name(&self) -> &'static str {
        match self.policy & layout::MODE_POLICY_MASK {
            0 => "shared",
            1 => "per target port",
            2 => "per initiator port",
            _ => "per I_T nexus",
        }
    }
}

/// Protocol-specific fields of a logical unit or port descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSpecific {
    pub protocol: ProtocolId,
    pub tlr_control_supported: bool,
}

const NETWORK_ADDRESSES: &str = "Management network addresses";
const MODE_PAGE_POLICY: &str = "Mode page policy";
const PROTOCOL_LU: &str = "Protocol-specific logical unit information";
const PROTOCOL_PORT: &str = "Protocol-specific port";

pub(crate) fn decode_network_addresses(page: &VpdPage, sink: &mut RecordSink) -> Result<(), PageError> {
    let reader = PageReader::new(page.body());
    let mut offset = 0;
    while offset < reader.len() {
        let bump = reader.descriptor_len(
            offset,
            layout::NETWORK_ADDRESS_HEADER_LEN,
            layout::NETWORK_ADDRESS_LENGTH_RANGE,
            NETWORK_ADDRESSES,
        )?;
        let flags = reader.read_u8(offset)?;
        let address_start = offset + layout::NETWORK_ADDRESS_HEADER_LEN;
        let address = (bump > layout::NETWORK_ADDRESS_HEADER_LEN)
            .then(|| reader.read_text(address_start..offset + bump))
            .transpose()?;
        sink.push(Record::NetworkAddress(NetworkAddress {
            association: Association::from_bits(flags >> layout::NETWORK_ASSOCIATION_SHIFT),
            service_type: flags & layout::NETWORK_SERVICE_TYPE_MASK,
            address,
        }));
        offset += bump;
    }
    Ok(())
}

pub(crate) fn decode_mode_page_policy(page: &VpdPage, sink: &mut RecordSink) -> Result<(), PageError> {
    let reader = PageReader::new(page.body());
    let mut offset = 0;
    while offset < reader.len() {
        let left = reader.len() - offset;
        if left < layout::MODE_POLICY_DESCRIPTOR_LEN {
            return Err(PageError::ShortDescriptor {
                page: MODE_PAGE_POLICY,
                needed: layout::MODE_POLICY_DESCRIPTOR_LEN,
                left,
            });
        }
        let policy = reader.read_u8(offset + 2)?;
        sink.push(Record::ModePagePolicy(ModePagePolicy {
            page_code: reader.read_u8(offset)? & layout::MODE_POLICY_PAGE_CODE_MASK,
            subpage_code: reader.read_u8(offset + 1)?,
            mlus: policy & layout::MODE_POLICY_MLUS_MASK != 0,
            policy: policy & layout::MODE_POLICY_MASK,
        }));
        offset += layout::MODE_POLICY_DESCRIPTOR_LEN;
    }
    Ok(())
}

/// Pages 0x90 and 0x91. Only SAS logical unit descriptors carry fields this
/// decoder knows; anything else is kept as raw bytes with a diagnostic.
pub(crate) fn decode_protocol_specific(
    page: &VpdPage,
    logical_unit: bool,
    sink: &mut RecordSink,
) -> Result<(), PageError> {
    let name = if logical_unit { PROTOCOL_LU } else { PROTOCOL_PORT };
    let reader = PageReader::new(page.body());
    let mut offset = 0;
    while offset < reader.len() {
        let bump = reader.descriptor_len(
            offset,
            layout::PROTOCOL_DESCRIPTOR_HEADER_LEN,
            layout::PROTOCOL_DESCRIPTOR_LENGTH_RANGE,
            name,
        )?;
        let port_range = layout::PROTOCOL_RELATIVE_PORT_RANGE;
        let port = reader.read_u16_be(offset + port_range.start..offset + port_range.end)?;
        sink.push(Record::RelativePort { port });
        if bump == layout::PROTOCOL_DESCRIPTOR_HEADER_LEN {
            offset += bump;
            continue;
        }

        let protocol = ProtocolId::from_bits(
            reader.read_u8(offset + layout::PROTOCOL_ID_OFFSET)? & layout::PROTOCOL_ID_MASK,
        );
        if logical_unit && protocol == ProtocolId::Sas {
            let tlr_control_supported = reader.read_flag(
                offset + layout::PROTOCOL_DESCRIPTOR_HEADER_LEN,
                layout::SAS_TLR_CONTROL_MASK,
            )?;
            sink.push(Record::ProtocolSpecific(ProtocolSpecific {
                protocol,
                tlr_control_supported,
            }));
        } else {
            sink.warn(Some(offset), format!("Unexpected proto={}", protocol.bits()));
            sink.push(Record::Hex {
                label: None,
                bytes: reader.read_slice(offset..offset + bump)?.to_vec(),
            });
        }
        offset += bump;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(code: u8, body: &[u8]) -> VpdPage {
        let mut response = vec![0, code, 0, body.len() as u8];
        response.extend_from_slice(body);
        VpdPage::from_response(code, response).unwrap()
    }

    #[test]
    fn network_addresses_with_and_without_text() {
        let mut body = vec![0x23, 0, 0, 0x0c];
        body.extend_from_slice(b"http://ctl\0\0");
        body.extend_from_slice(&[0x09, 0, 0, 0]);
        let mut sink = RecordSink::new();
        decode_network_addresses(&page(0x85, &body), &mut sink).unwrap();
        let (records, _) = sink.into_parts();
        let Record::NetworkAddress(first) = &records[0] else {
            panic!("expected a network address");
        };
        assert_eq!(first.association, Association::TargetPort);
        assert_eq!(first.service_type_name(), "status");
        assert_eq!(first.address.as_deref(), Some("http://ctl"));
        let Record::NetworkAddress(second) = &records[1] else {
            panic!("expected a network address");
        };
        assert_eq!(second.address, None);
        assert_eq!(second.service_type_name(), "reserved[0x9]");
    }

    #[test]
    fn network_address_overrun_is_short_descriptor() {
        let body = [0x00, 0, 0, 0x10, b'x'];
        let mut sink = RecordSink::new();
        let err = decode_network_addresses(&page(0x85, &body), &mut sink).unwrap_err();
        assert_eq!(
            err,
            PageError::ShortDescriptor {
                page: "Management network addresses",
                needed: 20,
                left: 5
            }
        );
    }

    #[test]
    fn mode_page_policies() {
        let body = [0x48, 0x00, 0x82, 0x00, 0x1c, 0x01, 0x01, 0x00];
        let mut sink = RecordSink::new();
        decode_mode_page_policy(&page(0x87, &body), &mut sink).unwrap();
        let (records, _) = sink.into_parts();
        assert_eq!(
            records[0],
            Record::ModePagePolicy(ModePagePolicy {
                page_code: 0x08,
                subpage_code: 0,
                mlus: true,
                policy: 2
            })
        );
        let Record::ModePagePolicy(second) = &records[1] else {
            panic!("expected a policy");
        };
        assert_eq!(second.policy_name(), "per target port");
        assert_eq!(second.subpage_code, 1);
    }

    #[test]
    fn mode_page_policy_partial_descriptor() {
        let body = [0x48, 0x00, 0x82, 0x00, 0x1c, 0x01];
        let mut sink = RecordSink::new();
        let err = decode_mode_page_policy(&page(0x87, &body), &mut sink).unwrap_err();
        assert!(matches!(err, PageError::ShortDescriptor { needed: 4, left: 2, .. }));
        assert_eq!(sink.records().len(), 1);
    }

    #[test]
    fn sas_logical_unit_tlr_control() {
        let body = [
            0x00, 0x01, 0x06, 0, 0, 0, 0x00, 0x04, 0x01, 0, 0, 0, // SAS, TLR set
            0x00, 0x02, 0x06, 0, 0, 0, 0x00, 0x00, // empty descriptor
        ];
        let mut sink = RecordSink::new();
        decode_protocol_specific(&page(0x90, &body), true, &mut sink).unwrap();
        let (records, diagnostics) = sink.into_parts();
        assert!(diagnostics.is_empty());
        assert_eq!(
            records,
            vec![
                Record::RelativePort { port: 1 },
                Record::ProtocolSpecific(ProtocolSpecific {
                    protocol: ProtocolId::Sas,
                    tlr_control_supported: true
                }),
                Record::RelativePort { port: 2 },
            ]
        );
    }

    #[test]
    fn port_page_has_no_known_protocol_fields() {
        let body = [0x00, 0x03, 0x06, 0, 0, 0, 0x00, 0x04, 0x01, 0, 0, 0];
        let mut sink = RecordSink::new();
        decode_protocol_specific(&page(0x91, &body), false, &mut sink).unwrap();
        let (records, diagnostics) = sink.into_parts();
        assert_eq!(diagnostics[0].message, "Unexpected proto=6");
        assert_eq!(
            records[1],
            Record::Hex {
                label: None,
                bytes: body.to_vec()
            }
        );
    }
}

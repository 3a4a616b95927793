use serde::{Deserialize, Serialize};

use super::error::{DesignatorError, DesignatorProblem};
use super::layout;
use super::reader::DesignatorReader;
use crate::codes::{Association, CodeSet, DesignatorType, ProtocolId};
use crate::hex::{hex_bytes, hex_bytes_opt, text_until_nul};

/// Borrowed view of one identification descriptor inside a page body.
///
/// Constructed only through [`parse_descriptor`], which guarantees the whole
/// designator lies inside the buffer it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor<'a> {
    /// Offset of the descriptor header within the descriptor list.
    pub offset: usize,
    pub protocol_id: ProtocolId,
    pub code_set: CodeSet,
    pub piv: bool,
    pub association: Association,
    pub designator_type: DesignatorType,
    pub designator: &'a [u8],
}

impl<'a> Descriptor<'a> {
    /// Header plus designator bytes.
    pub fn total_len(&self) -> usize {
        layout::HEADER_LEN + self.designator.len()
    }

    /// Transport protocol, only meaningful for port and device associations.
    pub fn transport(&self) -> Option<ProtocolId> {
        let port_scoped = matches!(
            self.association,
            Association::TargetPort | Association::TargetDevice
        );
        (self.piv && port_scoped).then_some(self.protocol_id)
    }

    pub fn is_sas(&self) -> bool {
        self.piv && self.protocol_id == ProtocolId::Sas
    }

    /// SAS, binary, target port association, four bytes.
    pub(crate) fn is_sas_relative_port(&self) -> bool {
        self.is_sas()
            && self.designator_type == DesignatorType::RelativeTargetPort
            && self.code_set == CodeSet::Binary
            && self.association == Association::TargetPort
            && self.designator.len() == layout::PORT_GROUP_LEN
    }
}

/// Reads the descriptor header at `offset` and bounds-checks its payload.
pub fn parse_descriptor(buf: &[u8], offset: usize) -> Result<Descriptor<'_>, DesignatorError> {
    let remaining = buf.len().saturating_sub(offset);
    let overrun = |needed| DesignatorError::Overrun {
        offset,
        needed,
        remaining,
    };
    if remaining < layout::HEADER_LEN {
        return Err(overrun(layout::HEADER_LEN));
    }

    let reader = DesignatorReader::new(buf);
    let byte0 = reader.read_u8(offset + layout::PROTOCOL_CODE_SET_OFFSET)?;
    let byte1 = reader.read_u8(offset + layout::FLAGS_OFFSET)?;
    let designator_len = usize::from(reader.read_u8(offset + layout::LENGTH_OFFSET)?);

    let needed = layout::HEADER_LEN + designator_len;
    if needed > remaining {
        return Err(overrun(needed));
    }
    let start = offset + layout::HEADER_LEN;
    let designator = reader.read_slice(start..start + designator_len)?;

    Ok(Descriptor {
        offset,
        protocol_id: ProtocolId::from_bits(byte0 >> layout::PROTOCOL_ID_SHIFT),
        code_set: CodeSet::from_bits(byte0 & layout::CODE_SET_MASK),
        piv: byte1 & layout::PIV_MASK != 0,
        association: Association::from_bits(
            (byte1 >> layout::ASSOCIATION_SHIFT) & layout::ASSOCIATION_MASK,
        ),
        designator_type: DesignatorType::from_bits(byte1 & layout::DESIGNATOR_TYPE_MASK),
        designator,
    })
}

/// Decoded EUI-64 based designator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eui64 {
    #[serde(with = "hex_bytes")]
    pub raw: Vec<u8>,
    /// Leading eight bytes of a 16 byte designator.
    #[serde(
        default,
        with = "hex_bytes_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub identifier_extension: Option<Vec<u8>>,
    pub company_id: u32,
    pub vendor_specific_extension: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_id: Option<u32>,
}

/// One designator, decoded according to its type.
///
/// Designators whose code set, association or length requirements are not
/// met become [`Designator::Fallback`] so the rest of the page still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Designator {
    VendorSpecific {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
    T10VendorId {
        vendor: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extra: Option<String>,
    },
    Eui64(Eui64),
    Naa2 {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
        vendor_specific_a: u16,
        company_id: u32,
        vendor_specific_b: u32,
    },
    Naa5 {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
        company_id: u32,
        vendor_specific_id: u64,
    },
    Naa6 {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
        company_id: u32,
        vendor_specific_id: u64,
        vendor_specific_extension: u64,
    },
    RelativeTargetPort {
        port: u16,
    },
    TargetPortGroup {
        group: u16,
    },
    LogicalUnitGroup {
        group: u16,
    },
    Md5LogicalUnitId {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
    ScsiNameString {
        name: String,
    },
    Reserved {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
    Fallback {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
        #[serde(flatten)]
        problem: DesignatorProblem,
    },
}

impl Designator {
    pub fn problem(&self) -> Option<&DesignatorProblem> {
        match self {
            Designator::Fallback { problem, .. } => Some(problem),
            _ => None,
        }
    }
}

fn fallback(raw: &[u8], problem: DesignatorProblem) -> Designator {
    Designator::Fallback {
        raw: raw.to_vec(),
        problem,
    }
}

/// Decodes the designator bytes of `desc` according to its type.
pub fn decode_designator(desc: &Descriptor<'_>) -> Designator {
    let raw = desc.designator;
    let decoded = match desc.designator_type {
        DesignatorType::VendorSpecific => Ok(Designator::VendorSpecific { raw: raw.to_vec() }),
        DesignatorType::T10VendorId => Ok(decode_t10(raw)),
        DesignatorType::Eui64 => decode_eui64(desc.code_set, raw),
        DesignatorType::Naa => decode_naa(desc.code_set, raw),
        DesignatorType::RelativeTargetPort | DesignatorType::TargetPortGroup => {
            decode_port_group(desc)
        }
        DesignatorType::LogicalUnitGroup => decode_lu_group(desc),
        DesignatorType::Md5LogicalUnitId => {
            if desc.code_set == CodeSet::Binary && desc.association == Association::LogicalUnit {
                Ok(Designator::Md5LogicalUnitId { raw: raw.to_vec() })
            } else {
                Err(DesignatorProblem::Md5Prerequisite)
            }
        }
        DesignatorType::ScsiNameString => {
            if desc.code_set == CodeSet::Utf8 {
                Ok(Designator::ScsiNameString {
                    name: text_until_nul(raw),
                })
            } else {
                Err(DesignatorProblem::ScsiNameCodeSet)
            }
        }
        DesignatorType::Reserved(_) => Ok(Designator::Reserved { raw: raw.to_vec() }),
    };
    decoded.unwrap_or_else(|problem| fallback(raw, problem))
}

fn decode_t10(raw: &[u8]) -> Designator {
    let split = raw.len().min(layout::T10_VENDOR_LEN);
    let (vendor, extra) = raw.split_at(split);
    Designator::T10VendorId {
        vendor: text_until_nul(vendor),
        extra: (!extra.is_empty()).then(|| text_until_nul(extra)),
    }
}

fn decode_eui64(code_set: CodeSet, raw: &[u8]) -> Result<Designator, DesignatorProblem> {
    if code_set != CodeSet::Binary {
        return Err(DesignatorProblem::Eui64CodeSet);
    }
    let length = raw.len();
    let reader = DesignatorReader::new(raw);
    let field_start = match length {
        layout::EUI64_LEN | layout::EUI64_DIRECTORY_LEN => 0,
        layout::EUI64_EXTENDED_LEN => layout::EUI64_EXTENSION_RANGE.end,
        _ => return Err(DesignatorProblem::Eui64Length { length }),
    };
    let to_problem = |_| DesignatorProblem::Eui64Length { length };

    let identifier_extension = if field_start > 0 {
        Some(
            reader
                .read_slice(layout::EUI64_EXTENSION_RANGE)
                .map_err(to_problem)?
                .to_vec(),
        )
    } else {
        None
    };
    let company_end = field_start + layout::EUI64_COMPANY_ID_LEN;
    let company_id = reader
        .read_be_uint(field_start..company_end)
        .map_err(to_problem)? as u32;
    let vendor_specific_extension = reader
        .read_be_uint(company_end..company_end + layout::EUI64_VENDOR_EXTENSION_LEN)
        .map_err(to_problem)?;
    let directory_id = if length == layout::EUI64_DIRECTORY_LEN {
        Some(
            reader
                .read_be_uint(layout::EUI64_DIRECTORY_ID_RANGE)
                .map_err(to_problem)? as u32,
        )
    } else {
        None
    };

    Ok(Designator::Eui64(Eui64 {
        raw: raw.to_vec(),
        identifier_extension,
        company_id,
        vendor_specific_extension,
        directory_id,
    }))
}

fn decode_naa(code_set: CodeSet, raw: &[u8]) -> Result<Designator, DesignatorProblem> {
    if code_set != CodeSet::Binary {
        return Err(DesignatorProblem::NaaCodeSet {
            code_set: code_set.bits(),
        });
    }
    let reader = DesignatorReader::new(raw);
    let naa = reader
        .read_nibble_high(0)
        .map_err(|_| DesignatorProblem::Empty)?;
    let expected_len = match naa {
        layout::NAA_IEEE_EXTENDED => layout::NAA2_LEN,
        layout::NAA_IEEE_REGISTERED => layout::NAA5_LEN,
        layout::NAA_IEEE_REGISTERED_EXTENDED => layout::NAA6_LEN,
        _ => return Err(DesignatorProblem::UnknownNaa { naa }),
    };
    let length = raw.len();
    if length != expected_len {
        return Err(DesignatorProblem::NaaLength { naa, length });
    }
    let to_problem = |_| DesignatorProblem::NaaLength { naa, length };

    if naa == layout::NAA_IEEE_EXTENDED {
        let vendor_specific_a = reader.read_u16_be(0..2).map_err(to_problem)? & 0x0fff;
        let company_id = reader
            .read_be_uint(layout::NAA2_COMPANY_ID_RANGE)
            .map_err(to_problem)? as u32;
        let vendor_specific_b = reader
            .read_be_uint(layout::NAA2_VENDOR_SPECIFIC_B_RANGE)
            .map_err(to_problem)? as u32;
        return Ok(Designator::Naa2 {
            raw: raw.to_vec(),
            vendor_specific_a,
            company_id,
            vendor_specific_b,
        });
    }

    // 24-bit company id straddles nibbles: low nibble of byte 0 through high nibble of byte 3.
    let company_id = ((reader
        .read_be_uint(layout::NAA_COMPANY_ID_RANGE)
        .map_err(to_problem)?
        >> layout::NAA_SHIFT)
        & 0x00ff_ffff) as u32;
    let vendor_specific_id = reader
        .read_be_uint(layout::NAA_VENDOR_SPECIFIC_RANGE)
        .map_err(to_problem)?
        & 0x000f_ffff_ffff;

    if naa == layout::NAA_IEEE_REGISTERED {
        return Ok(Designator::Naa5 {
            raw: raw.to_vec(),
            company_id,
            vendor_specific_id,
        });
    }
    let vendor_specific_extension = reader
        .read_be_uint(layout::NAA6_EXTENSION_RANGE)
        .map_err(to_problem)?;
    Ok(Designator::Naa6 {
        raw: raw.to_vec(),
        company_id,
        vendor_specific_id,
        vendor_specific_extension,
    })
}

fn read_group(desc: &Descriptor<'_>) -> Option<u16> {
    if desc.code_set != CodeSet::Binary || desc.designator.len() != layout::PORT_GROUP_LEN {
        return None;
    }
    DesignatorReader::new(desc.designator)
        .read_u16_be(layout::PORT_GROUP_RANGE)
        .ok()
}

fn decode_port_group(desc: &Descriptor<'_>) -> Result<Designator, DesignatorProblem> {
    let value = read_group(desc)
        .filter(|_| desc.association == Association::TargetPort)
        .ok_or(DesignatorProblem::TargetPortPrerequisite)?;
    Ok(match desc.designator_type {
        DesignatorType::RelativeTargetPort => Designator::RelativeTargetPort { port: value },
        _ => Designator::TargetPortGroup { group: value },
    })
}

fn decode_lu_group(desc: &Descriptor<'_>) -> Result<Designator, DesignatorProblem> {
    read_group(desc)
        .filter(|_| desc.association == Association::LogicalUnit)
        .map(|group| Designator::LogicalUnitGroup { group })
        .ok_or(DesignatorProblem::LogicalUnitGroupPrerequisite)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(byte0: u8, byte1: u8, payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![byte0, byte1, 0, payload.len() as u8];
        buf.extend_from_slice(payload);
        buf
    }

    fn decode(buf: &[u8]) -> Designator {
        let desc = parse_descriptor(buf, 0).unwrap();
        decode_designator(&desc)
    }

    #[test]
    fn parses_header_fields() {
        let buf = descriptor(0x61, 0x93, &[0x50, 0, 0, 0, 0, 0, 0, 1]);
        let desc = parse_descriptor(&buf, 0).unwrap();
        assert_eq!(desc.protocol_id, ProtocolId::Sas);
        assert_eq!(desc.code_set, CodeSet::Binary);
        assert!(desc.piv);
        assert_eq!(desc.association, Association::TargetPort);
        assert_eq!(desc.designator_type, DesignatorType::Naa);
        assert_eq!(desc.total_len(), 12);
        assert_eq!(desc.transport(), Some(ProtocolId::Sas));
    }

    #[test]
    fn transport_hidden_for_logical_unit_association() {
        let buf = descriptor(0x61, 0x83, &[0x50, 0, 0, 0, 0, 0, 0, 1]);
        let desc = parse_descriptor(&buf, 0).unwrap();
        assert_eq!(desc.transport(), None);
    }

    #[test]
    fn designator_past_end_is_overrun() {
        let mut buf = descriptor(0x01, 0x03, &[0u8; 20]);
        buf.truncate(14);
        let err = parse_descriptor(&buf, 0).unwrap_err();
        assert_eq!(
            err,
            DesignatorError::Overrun {
                offset: 0,
                needed: 24,
                remaining: 14
            }
        );
    }

    #[test]
    fn naa2_fields() {
        let buf = descriptor(0x01, 0x93, &[0x22, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0]);
        match decode(&buf) {
            Designator::Naa2 {
                raw,
                vendor_specific_a,
                company_id,
                vendor_specific_b,
            } => {
                assert_eq!(raw, vec![0x22, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0]);
                assert_eq!(vendor_specific_a, 0x234);
                assert_eq!(company_id, 0x56789a);
                assert_eq!(vendor_specific_b, 0xbcdef0);
            }
            other => panic!("unexpected designator: {other:?}"),
        }
    }

    #[test]
    fn naa5_splits_company_and_vendor_id() {
        let buf = descriptor(0x01, 0x03, &[0x50, 0x00, 0xc5, 0x00, 0x12, 0x34, 0x56, 0x78]);
        match decode(&buf) {
            Designator::Naa5 {
                company_id,
                vendor_specific_id,
                ..
            } => {
                assert_eq!(company_id, 0x000c50);
                assert_eq!(vendor_specific_id, 0x0_1234_5678);
            }
            other => panic!("unexpected designator: {other:?}"),
        }
    }

    #[test]
    fn naa6_carries_extension() {
        let mut payload = vec![0x60, 0x01, 0x40, 0x5f, 0xff, 0xff, 0xff, 0xff];
        payload.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0x12, 0x34]);
        let buf = descriptor(0x01, 0x03, &payload);
        match decode(&buf) {
            Designator::Naa6 {
                company_id,
                vendor_specific_id,
                vendor_specific_extension,
                ..
            } => {
                assert_eq!(company_id, 0x001405);
                assert_eq!(vendor_specific_id, 0xf_ffff_ffff);
                assert_eq!(vendor_specific_extension, 0x1234);
            }
            other => panic!("unexpected designator: {other:?}"),
        }
    }

    #[test]
    fn naa_nibble_and_length_must_agree() {
        let buf = descriptor(0x01, 0x03, &[0x60, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            decode(&buf).problem(),
            Some(&DesignatorProblem::NaaLength { naa: 6, length: 8 })
        );
        let buf = descriptor(0x01, 0x03, &[0x30, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            decode(&buf).problem(),
            Some(&DesignatorProblem::UnknownNaa { naa: 3 })
        );
        // Eight bytes is the NAA 2 length, but the nibble says 1.
        let buf = descriptor(0x01, 0x93, &[0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0]);
        assert_eq!(
            decode(&buf),
            Designator::Fallback {
                raw: vec![0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0],
                problem: DesignatorProblem::UnknownNaa { naa: 1 },
            }
        );
    }

    #[test]
    fn naa_requires_binary_code_set() {
        let buf = descriptor(0x02, 0x03, &[0x50, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            decode(&buf).problem(),
            Some(&DesignatorProblem::NaaCodeSet { code_set: 2 })
        );
    }

    #[test]
    fn eui64_lengths() {
        let buf = descriptor(
            0x01,
            0x02,
            &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0, 0, 0, 9],
        );
        match decode(&buf) {
            Designator::Eui64(eui) => {
                assert_eq!(eui.company_id, 0x001122);
                assert_eq!(eui.vendor_specific_extension, 0x33_4455_6677);
                assert_eq!(eui.directory_id, Some(9));
                assert_eq!(eui.identifier_extension, None);
            }
            other => panic!("unexpected designator: {other:?}"),
        }

        let mut payload = vec![0xaa; 8];
        payload.extend_from_slice(&[0x00, 0x11, 0x22, 0, 0, 0, 0, 1]);
        let buf = descriptor(0x01, 0x02, &payload);
        match decode(&buf) {
            Designator::Eui64(eui) => {
                assert_eq!(eui.identifier_extension, Some(vec![0xaa; 8]));
                assert_eq!(eui.company_id, 0x001122);
                assert_eq!(eui.vendor_specific_extension, 1);
            }
            other => panic!("unexpected designator: {other:?}"),
        }

        let buf = descriptor(0x01, 0x02, &[0u8; 10]);
        assert_eq!(
            decode(&buf).problem(),
            Some(&DesignatorProblem::Eui64Length { length: 10 })
        );
    }

    #[test]
    fn relative_port_requires_target_port_association() {
        let buf = descriptor(0x61, 0x94, &[0, 0, 0, 3]);
        assert_eq!(decode(&buf), Designator::RelativeTargetPort { port: 3 });
        let buf = descriptor(0x61, 0x84, &[0, 0, 0, 3]);
        assert_eq!(
            decode(&buf).problem(),
            Some(&DesignatorProblem::TargetPortPrerequisite)
        );
        let buf = descriptor(0x01, 0x15, &[0, 0, 0x01, 0x02]);
        assert_eq!(decode(&buf), Designator::TargetPortGroup { group: 0x102 });
    }

    #[test]
    fn logical_unit_group_and_md5() {
        let buf = descriptor(0x01, 0x06, &[0, 0, 0, 7]);
        assert_eq!(decode(&buf), Designator::LogicalUnitGroup { group: 7 });
        let buf = descriptor(0x01, 0x16, &[0, 0, 0, 7]);
        assert_eq!(
            decode(&buf).problem(),
            Some(&DesignatorProblem::LogicalUnitGroupPrerequisite)
        );
        let buf = descriptor(0x02, 0x07, &[1; 16]);
        assert_eq!(
            decode(&buf).problem(),
            Some(&DesignatorProblem::Md5Prerequisite)
        );
    }

    #[test]
    fn scsi_name_requires_utf8() {
        let buf = descriptor(0x53, 0xa8, b"iqn.2001-04.com.example\0\0");
        assert_eq!(
            decode(&buf),
            Designator::ScsiNameString {
                name: "iqn.2001-04.com.example".to_string()
            }
        );
        let buf = descriptor(0x52, 0xa8, b"iqn.x");
        assert_eq!(
            decode(&buf),
            Designator::Fallback {
                raw: b"iqn.x".to_vec(),
                problem: DesignatorProblem::ScsiNameCodeSet
            }
        );
    }

    #[test]
    fn eui64_requires_binary_code_set() {
        let buf = descriptor(0x02, 0x02, b"ABCDEFGH");
        assert_eq!(
            decode(&buf),
            Designator::Fallback {
                raw: b"ABCDEFGH".to_vec(),
                problem: DesignatorProblem::Eui64CodeSet
            }
        );
        let json = serde_json::to_value(decode(&buf)).unwrap();
        assert_eq!(json["problem"], "eui64_code_set");
    }

    #[test]
    fn t10_vendor_splits_at_eight_bytes() {
        let buf = descriptor(0x02, 0x01, b"ACME    disk-1234");
        assert_eq!(
            decode(&buf),
            Designator::T10VendorId {
                vendor: "ACME    ".to_string(),
                extra: Some("disk-1234".to_string())
            }
        );
    }

    #[test]
    fn fallback_serializes_problem_inline() {
        let designator = Designator::Fallback {
            raw: vec![0xde, 0xad],
            problem: DesignatorProblem::ScsiNameCodeSet,
        };
        let json = serde_json::to_value(&designator).unwrap();
        assert_eq!(json["type"], "fallback");
        assert_eq!(json["raw"], "dead");
        assert_eq!(json["problem"], "scsi_name_code_set");
    }
}

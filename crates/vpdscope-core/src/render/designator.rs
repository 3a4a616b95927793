use crate::descriptors::designator::{Designator, DesignatorRecord, Eui64, ShortIdentifier, ShortValue};
use crate::hex::{compact_hex, hex_dump};

pub(super) fn write_designator(out: &mut String, record: &DesignatorRecord, long: bool) {
    push_line!(
        out,
        "    designator type: {},  code_set: {}",
        record.designator_type, record.code_set
    );
    if let Some(transport) = record.transport {
        push_line!(out, "     transport: {transport}");
    }
    match &record.designator {
        Designator::T10VendorId { vendor, extra } => {
            push_line!(out, "      vendor id: {vendor}");
            if let Some(extra) = extra {
                push_line!(out, "      vendor specific: {extra}");
            }
        }
        Designator::Eui64(eui) => write_eui64(out, eui, long),
        Designator::Naa2 {
            raw,
            vendor_specific_a,
            company_id,
            vendor_specific_b,
        } => {
            if long {
                push_line!(out, "      NAA 2, vendor specific identifier A: 0x{vendor_specific_a:x}");
                push_line!(out, "      IEEE Company_id: 0x{company_id:x}");
                push_line!(out, "      vendor specific identifier B: 0x{vendor_specific_b:x}");
                push_line!(out, "      [{}]", compact_hex(raw));
            }
            push_line!(out, "      {}", compact_hex(raw));
        }
        Designator::Naa5 {
            raw,
            company_id,
            vendor_specific_id,
        } => {
            if long {
                push_line!(out, "      NAA 5, IEEE Company_id: 0x{company_id:x}");
                push_line!(out, "      Vendor Specific Identifier: 0x{vendor_specific_id:x}");
                push_line!(out, "      [{}]", compact_hex(raw));
            } else {
                push_line!(out, "      {}", compact_hex(raw));
            }
        }
        Designator::Naa6 {
            raw,
            company_id,
            vendor_specific_id,
            vendor_specific_extension,
        } => {
            if long {
                push_line!(out, "      NAA 6, IEEE Company_id: 0x{company_id:x}");
                push_line!(out, "      Vendor Specific Identifier: 0x{vendor_specific_id:x}");
                push_line!(
                    out,
                    "      Vendor Specific Identifier Extension: 0x{vendor_specific_extension:x}"
                );
                push_line!(out, "      [{}]", compact_hex(raw));
            } else {
                push_line!(out, "      {}", compact_hex(raw));
            }
        }
        Designator::RelativeTargetPort { port } => {
            push_line!(out, "      Relative target port: 0x{port:x}");
        }
        Designator::TargetPortGroup { group } => {
            push_line!(out, "      Target port group: 0x{group:x}");
        }
        Designator::LogicalUnitGroup { group } => {
            push_line!(out, "      Logical unit group: 0x{group:x}");
        }
        Designator::Md5LogicalUnitId { raw } => {
            out.push_str("      MD5 logical unit identifier:\n");
            out.push_str(&hex_dump(raw, true));
        }
        Designator::ScsiNameString { name } => {
            out.push_str("      SCSI name string:\n");
            push_line!(out, "      {name}");
        }
        Designator::VendorSpecific { raw } | Designator::Reserved { raw } | Designator::Fallback { raw, .. } => {
            out.push_str(&hex_dump(raw, true));
        }
    }
}

fn write_eui64(out: &mut String, eui: &Eui64, long: bool) {
    if !long {
        push_line!(out, "      {}", compact_hex(&eui.raw));
        return;
    }
    push_line!(out, "      EUI-64 based {} byte identifier", eui.raw.len());
    if let Some(extension) = &eui.identifier_extension {
        let value = extension.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        push_line!(out, "      Identifier extension: 0x{value:x}");
    }
    push_line!(out, "      IEEE Company_id: 0x{:x}", eui.company_id);
    push_line!(
        out,
        "      Vendor Specific Extension Identifier: 0x{:x}",
        eui.vendor_specific_extension
    );
    if let Some(directory_id) = eui.directory_id {
        push_line!(out, "      Directory ID: 0x{directory_id:x}");
    }
}

/// One identifier per line; a SAS port pair reads `address,0xPORT`.
pub(super) fn write_short_id(out: &mut String, id: &ShortIdentifier) {
    match &id.value {
        ShortValue::Hex { value } => {
            push_line!(out, "{}", compact_hex(value));
        }
        ShortValue::Name { text } => {
            push_line!(out, "{text}");
        }
        ShortValue::SasTargetPort {
            address,
            relative_port: Some(port),
        } => {
            push_line!(out, "{},0x{port:x}", compact_hex(address));
        }
        ShortValue::SasTargetPort {
            address,
            relative_port: None,
        } => {
            push_line!(out, "{}", compact_hex(address));
        }
        ShortValue::RelativePort { port } => {
            push_line!(out, ",0x{port:x}");
        }
        ShortValue::Raw { raw } => out.push_str(&hex_dump(raw, true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{Association, CodeSet, DesignatorType, ProtocolId};

    fn naa5_record() -> DesignatorRecord {
        DesignatorRecord {
            offset: 0,
            association: Association::TargetPort,
            designator_type: DesignatorType::Naa,
            code_set: CodeSet::Binary,
            transport: Some(ProtocolId::Sas),
            designator: Designator::Naa5 {
                raw: vec![0x50, 0x00, 0xc5, 0x00, 0x11, 0x22, 0x33, 0x44],
                company_id: 0x000c50,
                vendor_specific_id: 0x011223344,
            },
        }
    }

    #[test]
    fn naa5_short_and_long() {
        let mut short = String::new();
        write_designator(&mut short, &naa5_record(), false);
        assert_eq!(
            short,
            "    designator type: NAA,  code_set: Binary\n     transport: Serial Attached SCSI (SAS)\n      0x5000c50011223344\n"
        );

        let mut long = String::new();
        write_designator(&mut long, &naa5_record(), true);
        assert!(long.contains("      NAA 5, IEEE Company_id: 0xc50\n"));
        assert!(long.contains("      Vendor Specific Identifier: 0x11223344\n"));
        assert!(long.ends_with("      [0x5000c50011223344]\n"));
    }

    #[test]
    fn short_ids_pair_address_and_port() {
        let mut out = String::new();
        write_short_id(
            &mut out,
            &ShortIdentifier {
                offset: 12,
                value: ShortValue::SasTargetPort {
                    address: vec![0x50, 0x01],
                    relative_port: Some(3),
                },
            },
        );
        write_short_id(
            &mut out,
            &ShortIdentifier {
                offset: 24,
                value: ShortValue::Name {
                    text: "naa.5000".to_string(),
                },
            },
        );
        assert_eq!(out, "0x5001,0x3\nnaa.5000\n");
    }
}

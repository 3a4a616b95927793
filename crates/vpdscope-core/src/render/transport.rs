use crate::descriptors::transport_id::{TransportId, TransportIdRecord};
use crate::hex::hex_dump;

const LEADIN: &str = " ";

pub(super) fn write_transport_id(out: &mut String, record: &TransportIdRecord) {
    if let TransportId::Truncated { raw } = &record.id {
        push_line!(
            out,
            "{LEADIN}Transport Id short or not multiple of 4 [length={}]:",
            raw.len()
        );
        out.push_str(&hex_dump(raw, true));
        return;
    }
    push_line!(out, "{LEADIN}Transport Id of initiator:");
    let unexpected = |out: &mut String| {
        if let Some(code) = record.unexpected_format_code() {
            push_line!(out, "{LEADIN}  [Unexpected format code: {code}]");
        }
    };
    match &record.id {
        TransportId::FibreChannelWwn { wwn } => {
            push_line!(out, "{LEADIN}  FCP-2 World Wide Name:");
            unexpected(out);
            out.push_str(&hex_dump(wwn, true));
        }
        TransportId::ParallelScsiAddress { address, relative_port } => {
            push_line!(out, "{LEADIN}  Parallel SCSI initiator SCSI address: 0x{address:x}");
            unexpected(out);
            push_line!(
                out,
                "{LEADIN}  relative port number (of corresponding target): 0x{relative_port:x}"
            );
        }
        TransportId::Ssa { raw } => {
            push_line!(out, "{LEADIN}  SSA (transport id not defined):");
            push_line!(out, "{LEADIN}  format code: {}", record.format_code);
            out.push_str(&hex_dump(raw, true));
        }
        TransportId::Ieee1394Eui64 { eui64 } => {
            push_line!(out, "{LEADIN}  IEEE 1394 EUI-64 name:");
            unexpected(out);
            out.push_str(&hex_dump(eui64, true));
        }
        TransportId::SrpInitiatorId { id } => {
            push_line!(out, "{LEADIN}  RDMA initiator port identifier:");
            unexpected(out);
            out.push_str(&hex_dump(id, true));
        }
        TransportId::IscsiName { name } => {
            push_line!(out, "{LEADIN}  iSCSI name: {name}");
        }
        TransportId::IscsiWwuid { id } => {
            push_line!(out, "{LEADIN}  iSCSI world wide unique port id: {id}");
        }
        TransportId::IscsiOther { raw } => {
            push_line!(
                out,
                "{LEADIN}  iSCSI   [Unexpected format code: {}]",
                record.format_code
            );
            out.push_str(&hex_dump(raw, true));
        }
        TransportId::SasAddress { address } => {
            push_line!(out, "{LEADIN}  SAS address: 0x{address:x}");
            unexpected(out);
        }
        TransportId::Adt { raw } => {
            push_line!(out, "{LEADIN}  ADT:");
            push_line!(out, "{LEADIN}  format code: {}", record.format_code);
            out.push_str(&hex_dump(raw, true));
        }
        TransportId::AtaPacket { raw } => {
            push_line!(out, "{LEADIN}  ATAPI:");
            push_line!(out, "{LEADIN}  format code: {}", record.format_code);
            out.push_str(&hex_dump(raw, true));
        }
        TransportId::Unknown { raw } => {
            push_line!(
                out,
                "{LEADIN}  unknown protocol id=0x{:x}  format_code={}",
                record.protocol.bits(),
                record.format_code
            );
            out.push_str(&hex_dump(raw, true));
        }
        TransportId::Truncated { .. } => {}
    }
}

use serde::{Deserialize, Serialize};

use super::error::TransportIdError;
use super::layout;
use super::reader::TransportIdReader;
use crate::codes::ProtocolId;
use crate::hex::{hex_bytes, text_until_nul};
use crate::sink::RecordSink;

/// Initiator port identifier, keyed by protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportId {
    FibreChannelWwn {
        #[serde(with = "hex_bytes")]
        wwn: Vec<u8>,
    },
    ParallelScsiAddress {
        address: u16,
        relative_port: u16,
    },
    Ssa {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
    Ieee1394Eui64 {
        #[serde(with = "hex_bytes")]
        eui64: Vec<u8>,
    },
    SrpInitiatorId {
        #[serde(with = "hex_bytes")]
        id: Vec<u8>,
    },
    IscsiName {
        name: String,
    },
    IscsiWwuid {
        id: String,
    },
    /// iSCSI record with a reserved format code.
    IscsiOther {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
    SasAddress {
        address: u64,
    },
    Adt {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
    AtaPacket {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
    Unknown {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
    /// Record cut off before its protocol fields.
    Truncated {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportIdRecord {
    /// Offset of the record within the transport id list.
    pub offset: usize,
    pub format_code: u8,
    pub protocol: ProtocolId,
    pub id: TransportId,
}

impl TransportIdRecord {
    /// Format code for protocols that only define format 0, when it is not 0.
    pub fn unexpected_format_code(&self) -> Option<u8> {
        let fixed_format = matches!(
            self.protocol,
            ProtocolId::FibreChannel
                | ProtocolId::ParallelScsi
                | ProtocolId::Ieee1394
                | ProtocolId::Srp
                | ProtocolId::Sas
        );
        (fixed_format && self.format_code != 0).then_some(self.format_code)
    }
}

/// Walks a TransportID list forward; every record is consumed exactly once.
///
/// Records are 24 bytes except iSCSI, whose size is `max(24, 4 + length)`.
/// A record too short for its fields comes back as [`TransportId::Truncated`].
#[derive(Debug, Clone)]
pub struct TransportIdIter<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> TransportIdIter<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }
}

impl Iterator for TransportIdIter<'_> {
    type Item = TransportIdRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.buf.get(self.offset..).filter(|rest| !rest.is_empty())?;
        let offset = self.offset;
        let (record, consumed) = parse_record(offset, rest);
        self.offset = offset.saturating_add(consumed);
        Some(record)
    }
}

/// Length of the record starting at `rest`, before clipping to the buffer.
fn record_len(reader: &TransportIdReader<'_>, protocol: ProtocolId) -> usize {
    if protocol != ProtocolId::Iscsi {
        return layout::RECORD_LEN;
    }
    reader
        .read_u16_be(layout::ISCSI_LENGTH_RANGE)
        .map(|len| (layout::ISCSI_NAME_OFFSET + usize::from(len)).max(layout::RECORD_LEN))
        .unwrap_or(layout::RECORD_LEN)
}

fn parse_record(offset: usize, rest: &[u8]) -> (TransportIdRecord, usize) {
    let reader = TransportIdReader::new(rest);
    let (format_code, protocol_bits) = reader.read_header().unwrap_or_default();
    let protocol = ProtocolId::from_bits(protocol_bits);
    let consumed = record_len(&reader, protocol);
    let record = reader.read_prefix(consumed);

    let id = parse_id(record, format_code, protocol).unwrap_or_else(|err| {
        tracing::debug!(offset, error = %err, "transport id cut short");
        TransportId::Truncated {
            raw: record.to_vec(),
        }
    });
    (
        TransportIdRecord {
            offset,
            format_code,
            protocol,
            id,
        },
        consumed,
    )
}

fn parse_id(record: &[u8], format_code: u8, protocol: ProtocolId) -> Result<TransportId, TransportIdError> {
    let reader = TransportIdReader::new(record);
    let raw = || reader.read_prefix(layout::RECORD_LEN).to_vec();
    Ok(match protocol {
        ProtocolId::FibreChannel => TransportId::FibreChannelWwn {
            wwn: reader.read_slice(layout::FC_WWN_RANGE)?.to_vec(),
        },
        ProtocolId::ParallelScsi => TransportId::ParallelScsiAddress {
            address: reader.read_u16_be(layout::SPI_ADDRESS_RANGE)?,
            relative_port: reader.read_u16_be(layout::SPI_RELATIVE_PORT_RANGE)?,
        },
        ProtocolId::Ssa => TransportId::Ssa { raw: raw() },
        ProtocolId::Ieee1394 => TransportId::Ieee1394Eui64 {
            eui64: reader.read_slice(layout::IEEE1394_EUI64_RANGE)?.to_vec(),
        },
        ProtocolId::Srp => TransportId::SrpInitiatorId {
            id: reader.read_slice(layout::SRP_ID_RANGE)?.to_vec(),
        },
        ProtocolId::Iscsi => {
            let len = usize::from(reader.read_u16_be(layout::ISCSI_LENGTH_RANGE)?);
            let end = layout::ISCSI_NAME_OFFSET + len;
            match format_code {
                layout::ISCSI_FORMAT_NAME => TransportId::IscsiName {
                    name: text_until_nul(reader.read_slice(layout::ISCSI_NAME_OFFSET..end)?),
                },
                layout::ISCSI_FORMAT_WWUID => TransportId::IscsiWwuid {
                    id: text_until_nul(reader.read_slice(layout::ISCSI_NAME_OFFSET..end)?),
                },
                _ => TransportId::IscsiOther {
                    raw: reader.read_slice(0..end)?.to_vec(),
                },
            }
        }
        ProtocolId::Sas => TransportId::SasAddress {
            address: reader.read_u64_be(layout::SAS_ADDRESS_RANGE)?,
        },
        ProtocolId::Adt => TransportId::Adt { raw: raw() },
        ProtocolId::Ata => TransportId::AtaPacket { raw: raw() },
        ProtocolId::Reserved(_) | ProtocolId::NoSpecificProtocol => TransportId::Unknown { raw: raw() },
    })
}

/// Decodes a TransportID list into `sink`, reporting anomalies as diagnostics.
///
/// `base` is added to diagnostic offsets so they point into the enclosing page.
pub(crate) fn decode_transport_ids(buf: &[u8], base: usize, sink: &mut RecordSink) {
    if buf.len() < layout::RECORD_LEN || buf.len() % layout::BUFFER_LEN_MULTIPLE != 0 {
        sink.warn(
            Some(base),
            format!(
                "Transport Id short or not multiple of 4 [length={}]",
                buf.len()
            ),
        );
    }
    for record in TransportIdIter::new(buf) {
        let at = Some(base + record.offset);
        if let Some(format_code) = record.unexpected_format_code() {
            sink.warn(at, format!("Unexpected format code: {format_code}"));
        }
        match (&record.id, record.protocol) {
            (TransportId::Unknown { .. }, protocol) => sink.warn(
                at,
                format!(
                    "unknown protocol id=0x{:x}  format_code={}",
                    protocol.bits(),
                    record.format_code
                ),
            ),
            (TransportId::IscsiOther { .. }, _) => sink.warn(
                at,
                format!("Unexpected format code: {}", record.format_code),
            ),
            (TransportId::Truncated { raw }, _) => sink.warn(
                at,
                format!("transport id truncated at {} bytes", raw.len()),
            ),
            _ => {}
        }
        sink.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(byte0: u8, fill: impl FnOnce(&mut [u8])) -> Vec<u8> {
        let mut record = vec![0u8; layout::RECORD_LEN];
        record[0] = byte0;
        fill(&mut record);
        record
    }

    fn iscsi(format_code: u8, name: &[u8]) -> Vec<u8> {
        let mut record = vec![(format_code << 6) | 0x05, 0];
        record.extend_from_slice(&(name.len() as u16).to_be_bytes());
        record.extend_from_slice(name);
        record
    }

    #[test]
    fn decodes_fixed_size_records() {
        let mut buf = fixed(0x06, |r| r[4..12].copy_from_slice(&[0x50, 0, 0xc5, 0, 0, 0, 0, 1]));
        buf.extend(fixed(0x01, |r| {
            r[2..4].copy_from_slice(&[0, 7]);
            r[6..8].copy_from_slice(&[0, 2]);
        }));
        buf.extend(fixed(0x00, |r| r[8..16].copy_from_slice(&[0x21; 8])));

        let records: Vec<_> = TransportIdIter::new(&buf).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].id,
            TransportId::SasAddress {
                address: 0x5000_c500_0000_0001
            }
        );
        assert_eq!(
            records[1].id,
            TransportId::ParallelScsiAddress {
                address: 7,
                relative_port: 2
            }
        );
        assert_eq!(records[1].offset, 24);
        assert_eq!(records[2].id, TransportId::FibreChannelWwn { wwn: vec![0x21; 8] });
    }

    #[test]
    fn iscsi_record_length_follows_declared_name() {
        let name = b"iqn.2001-04.com.example:storage.disk1\0\0\0";
        let mut buf = iscsi(0, name);
        let first_len = buf.len();
        assert_eq!(first_len, 4 + name.len());
        buf.extend(fixed(0x06, |r| r[11] = 9));

        let records: Vec<_> = TransportIdIter::new(&buf).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].id,
            TransportId::IscsiName {
                name: "iqn.2001-04.com.example:storage.disk1".to_string()
            }
        );
        assert_eq!(records[1].offset, first_len);
        assert_eq!(records[1].id, TransportId::SasAddress { address: 9 });
    }

    #[test]
    fn short_iscsi_name_still_consumes_24_bytes() {
        let mut buf = iscsi(1, b"wwuid");
        buf.resize(layout::RECORD_LEN, 0);
        buf.extend(fixed(0x06, |_| {}));
        let records: Vec<_> = TransportIdIter::new(&buf).collect();
        assert_eq!(records[0].id, TransportId::IscsiWwuid { id: "wwuid".to_string() });
        assert_eq!(records[1].offset, 24);
    }

    #[test]
    fn truncated_record_does_not_panic() {
        let buf = fixed(0x04, |_| {});
        let records: Vec<_> = TransportIdIter::new(&buf[..12]).collect();
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0].id, TransportId::Truncated { .. }));

        let mut buf = iscsi(0, b"iqn.example");
        buf[3] = 0x40;
        let records: Vec<_> = TransportIdIter::new(&buf).collect();
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0].id, TransportId::Truncated { .. }));
    }

    #[test]
    fn diagnostics_for_short_buffer_and_unknown_protocol() {
        let mut sink = RecordSink::new();
        let buf = fixed(0x4a, |_| {});
        decode_transport_ids(&buf[..20], 8, &mut sink);
        let (records, diagnostics) = sink.into_parts();
        assert_eq!(records.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Transport Id short or not multiple of 4 [length=20]"
        );
        assert_eq!(diagnostics[1].offset, Some(8));
        assert_eq!(diagnostics[1].message, "unknown protocol id=0xa  format_code=1");
    }

    #[test]
    fn unexpected_format_code_only_for_fixed_format_protocols() {
        let buf = fixed(0x46, |_| {});
        let record = TransportIdIter::new(&buf).next().unwrap();
        assert_eq!(record.unexpected_format_code(), Some(1));

        let buf = fixed(0x47, |_| {});
        let record = TransportIdIter::new(&buf).next().unwrap();
        assert_eq!(record.unexpected_format_code(), None);
        assert!(matches!(record.id, TransportId::Adt { .. }));
    }
}

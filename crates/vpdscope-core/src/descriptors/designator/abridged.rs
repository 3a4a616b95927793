use serde::{Deserialize, Serialize};

use super::error::{DesignatorError, DesignatorProblem};
use super::iter::{DescriptorFilter, DescriptorIter};
use super::layout;
use super::parser::{Descriptor, Designator, decode_designator};
use crate::codes::{Association, DesignatorType};
use crate::hex::hex_bytes;
use crate::sink::RecordSink;

/// One externally usable identifier from the abridged listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortIdentifier {
    /// Offset of the descriptor that produced (or completed) this identifier.
    pub offset: usize,
    pub value: ShortValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum ShortValue {
    /// EUI-64 or NAA identifier.
    Hex {
        #[serde(with = "hex_bytes")]
        value: Vec<u8>,
    },
    /// SCSI name string.
    Name { text: String },
    /// SAS target port address, paired with its relative port when one was seen.
    SasTargetPort {
        #[serde(with = "hex_bytes")]
        address: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        relative_port: Option<u16>,
    },
    /// SAS relative target port that never met its address.
    RelativePort { port: u16 },
    /// Designator that failed its prerequisites.
    Raw {
        #[serde(with = "hex_bytes")]
        raw: Vec<u8>,
    },
}

/// Pending halves of a SAS `address,port` pair. Lives for one walk only.
#[derive(Debug, Default)]
struct SasPortPairing {
    address: Option<(usize, Vec<u8>)>,
    port: Option<(usize, u16)>,
}

impl SasPortPairing {
    fn address(&mut self, offset: usize, address: &[u8], sink: &mut RecordSink) {
        if let Some((_, port)) = self.port.take() {
            push(sink, offset, sas_port(address.to_vec(), Some(port)));
        } else if let Some((prev, stale)) = self.address.replace((offset, address.to_vec())) {
            push(sink, prev, sas_port(stale, None));
        }
    }

    fn port(&mut self, offset: usize, port: u16, sink: &mut RecordSink) {
        if let Some((_, address)) = self.address.take() {
            push(sink, offset, sas_port(address, Some(port)));
        } else if let Some((prev, stale)) = self.port.replace((offset, port)) {
            push(sink, prev, ShortValue::RelativePort { port: stale });
        }
    }

    fn flush(self, sink: &mut RecordSink) {
        if let Some((offset, address)) = self.address {
            push(sink, offset, sas_port(address, None));
        }
        if let Some((offset, port)) = self.port {
            push(sink, offset, ShortValue::RelativePort { port });
        }
    }
}

fn sas_port(address: Vec<u8>, relative_port: Option<u16>) -> ShortValue {
    ShortValue::SasTargetPort {
        address,
        relative_port,
    }
}

fn push(sink: &mut RecordSink, offset: usize, value: ShortValue) {
    sink.push(ShortIdentifier { offset, value });
}

fn fallback(desc: &Descriptor<'_>, problem: &DesignatorProblem, sink: &mut RecordSink) {
    sink.warn(Some(desc.offset), problem.to_string());
    push(
        sink,
        desc.offset,
        ShortValue::Raw {
            raw: desc.designator.to_vec(),
        },
    );
}

/// Emits only identifiers usable outside the device, pairing SAS target port
/// addresses with relative port numbers.
///
/// Pairing state starts empty on every call. Unpaired halves are flushed when
/// the walk ends, including when it ends on a malformed descriptor.
pub(crate) fn decode_abridged(
    buf: &[u8],
    filter: DescriptorFilter,
    sink: &mut RecordSink,
) -> Result<(), DesignatorError> {
    let mut pairing = SasPortPairing::default();
    for desc in DescriptorIter::new(buf, filter) {
        let desc = match desc {
            Ok(desc) => desc,
            Err(err) => {
                pairing.flush(sink);
                return Err(err);
            }
        };
        match desc.designator_type {
            DesignatorType::Eui64 => {
                let length = desc.designator.len();
                if !matches!(
                    length,
                    layout::EUI64_LEN | layout::EUI64_DIRECTORY_LEN | layout::EUI64_EXTENDED_LEN
                ) {
                    sink.warn(
                        Some(desc.offset),
                        DesignatorProblem::Eui64Length { length }.to_string(),
                    );
                }
                push(
                    sink,
                    desc.offset,
                    ShortValue::Hex {
                        value: desc.designator.to_vec(),
                    },
                );
            }
            DesignatorType::Naa => match decode_designator(&desc) {
                Designator::Naa5 { raw, .. }
                    if desc.is_sas() && desc.association == Association::TargetPort =>
                {
                    pairing.address(desc.offset, &raw, sink);
                }
                Designator::Naa2 { raw, .. }
                | Designator::Naa5 { raw, .. }
                | Designator::Naa6 { raw, .. } => {
                    push(sink, desc.offset, ShortValue::Hex { value: raw });
                }
                Designator::Fallback { problem, .. } => fallback(&desc, &problem, sink),
                _ => {}
            },
            DesignatorType::RelativeTargetPort if desc.is_sas_relative_port() => {
                if let Designator::RelativeTargetPort { port } = decode_designator(&desc) {
                    pairing.port(desc.offset, port, sink);
                }
            }
            DesignatorType::ScsiNameString => match decode_designator(&desc) {
                Designator::ScsiNameString { name } => {
                    push(sink, desc.offset, ShortValue::Name { text: name });
                }
                Designator::Fallback { problem, .. } => fallback(&desc, &problem, sink),
                _ => {}
            },
            _ => {}
        }
    }
    pairing.flush(sink);
    Ok(())
}

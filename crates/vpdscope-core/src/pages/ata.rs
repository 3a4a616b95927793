//! ATA information page (SAT, 0x89).

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::error::PageError;
use super::header::VpdPage;
use super::layout;
use super::reader::PageReader;
use crate::Record;
use crate::hex::hex_bytes_opt;
use crate::sink::RecordSink;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtaInformation {
    pub vendor: String,
    pub product: String,
    pub revision: String,
    /// Device to host FIS, present when the page reaches 56 bytes.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hex_bytes_opt")]
    pub signature: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_code: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identify: Option<AtaIdentifySummary>,
    /// The 512 byte IDENTIFY (PACKET) DEVICE response.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hex_bytes_opt")]
    pub identify_data: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtaIdentifySummary {
    /// IDENTIFY PACKET DEVICE rather than IDENTIFY DEVICE.
    pub packet: bool,
    pub model: String,
    pub serial: String,
    pub firmware: String,
}

pub(crate) fn decode_ata_information(page: &VpdPage, sink: &mut RecordSink) -> Result<(), PageError> {
    let reader = PageReader::new(page.response());
    reader.require_len(layout::ATA_MIN_LEN)?;
    let mut info = AtaInformation {
        vendor: reader.read_text(layout::ATA_VENDOR_RANGE)?,
        product: reader.read_text(layout::ATA_PRODUCT_RANGE)?,
        revision: reader.read_text(layout::ATA_REVISION_RANGE)?,
        signature: None,
        command_code: None,
        identify: None,
        identify_data: None,
    };
    if reader.len() >= layout::ATA_SIGNATURE_RANGE.end {
        info.signature = Some(reader.read_slice(layout::ATA_SIGNATURE_RANGE)?.to_vec());
    }
    if reader.len() >= layout::ATA_COMMAND_MIN_LEN {
        let command = reader.read_u8(layout::ATA_COMMAND_CODE_OFFSET)?;
        info.command_code = Some(command);
        if matches!(
            command,
            layout::ATA_IDENTIFY_DEVICE | layout::ATA_IDENTIFY_PACKET_DEVICE
        ) {
            let identify = reader.read_tail(layout::ATA_IDENTIFY_OFFSET)?;
            info.identify = Some(AtaIdentifySummary {
                packet: command == layout::ATA_IDENTIFY_PACKET_DEVICE,
                model: ata_string(identify, layout::ATA_MODEL_WORDS),
                serial: ata_string(identify, layout::ATA_SERIAL_WORDS),
                firmware: ata_string(identify, layout::ATA_FIRMWARE_WORDS),
            });
        }
    }
    let identify_end = layout::ATA_IDENTIFY_OFFSET + layout::ATA_IDENTIFY_LEN;
    if reader.len() >= identify_end {
        info.identify_data = Some(
            reader
                .read_slice(layout::ATA_IDENTIFY_OFFSET..identify_end)?
                .to_vec(),
        );
    }
    sink.push(Record::AtaInformation(info));
    Ok(())
}

/// ATA string from little-endian 16-bit words: high byte first, ends at NUL.
/// Words past the end of `identify` are ignored.
fn ata_string(identify: &[u8], words: Range<usize>) -> String {
    let end = (words.end * 2).min(identify.len());
    let bytes = identify.get(words.start * 2..end).unwrap_or_default();
    let mut text = Vec::with_capacity(bytes.len());
    'words: for word in bytes.chunks_exact(2) {
        let &[low, high] = word else { break };
        for b in [high, low] {
            if b == 0 {
                break 'words;
            }
            text.push(b);
        }
    }
    String::from_utf8_lossy(&text).into_owned()
}

//! Pages 0xb0 and 0xb1, whose meaning depends on the peripheral device type.

use serde::{Deserialize, Serialize};

use super::error::PageError;
use super::header::VpdPage;
use super::kind::{CharacteristicsPage, LimitsPage};
use super::layout;
use super::reader::PageReader;
use crate::Record;
use crate::hex::text_until_nul;
use crate::sink::RecordSink;

/// Block limits (SBC), all lengths in logical blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLimits {
    pub optimal_transfer_length_granularity: u16,
    pub maximum_transfer_length: u32,
    pub optimal_transfer_length: u32,
    /// Maximum prefetch, xdread, xdwrite transfer length (SBC-3 and later).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_prefetch_length: Option<u32>,
}

/// Block device characteristics (SBC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDeviceCharacteristics {
    pub rotation_rate: u16,
    pub form_factor: u8,
}

impl BlockDeviceCharacteristics {
    pub fn rotation_text(&self) -> String {
        match self.rotation_rate {
            0 => "Medium rotation rate is not reported".to_string(),
            1 => "Non-rotating medium (e.g. solid state)".to_string(),
            rate if rate < 0x401 || rate == 0xffff => format!("Reserved [0x{rate:x}]"),
            rate => format!("Nominal rotation rate: {rate} rpm"),
        }
    }

    /// Suffix printed after the "Nominal form factor" label.
    pub fn form_factor_suffix(&self) -> &'static str {
        match self.form_factor {
            0 => " not reported",
            1 => ": 5.25 inch",
            2 => ": 3.5 inch",
            3 => ": 2.5 inch",
            4 => ": 1.8 inch",
            5 => ": less then 1.8 inch",
            _ => ": reserved",
        }
    }
}

pub(crate) fn decode_limits(page: &VpdPage, kind: LimitsPage, sink: &mut RecordSink) -> Result<(), PageError> {
    let reader = PageReader::new(page.response());
    match kind {
        LimitsPage::BlockLimits => {
            reader.require_len(layout::BLOCK_LIMITS_MIN_LEN)?;
            let maximum_prefetch_length = if reader.len() >= layout::BLOCK_LIMITS_PREFETCH_MIN_LEN {
                Some(reader.read_u32_be(layout::MAX_PREFETCH_RANGE)?)
            } else {
                None
            };
            sink.push(Record::BlockLimits(BlockLimits {
                optimal_transfer_length_granularity: reader.read_u16_be(layout::OPTIMAL_GRANULARITY_RANGE)?,
                maximum_transfer_length: reader.read_u32_be(layout::MAX_TRANSFER_RANGE)?,
                optimal_transfer_length: reader.read_u32_be(layout::OPTIMAL_TRANSFER_RANGE)?,
                maximum_prefetch_length,
            }));
        }
        LimitsPage::SequentialAccessCapabilities => {
            let worm = reader.read_flag(layout::WORM_OFFSET, 0x01)?;
            sink.push(Record::SequentialAccessCapabilities { worm });
        }
        LimitsPage::OsdInformation | LimitsPage::Other(_) => undecoded(page, sink),
    }
    Ok(())
}

pub(crate) fn decode_characteristics(
    page: &VpdPage,
    kind: CharacteristicsPage,
    sink: &mut RecordSink,
) -> Result<(), PageError> {
    let reader = PageReader::new(page.response());
    match kind {
        CharacteristicsPage::BlockDeviceCharacteristics => {
            reader.require_len(layout::BLOCK_CHARACTERISTICS_MIN_LEN)?;
            sink.push(Record::BlockDeviceCharacteristics(BlockDeviceCharacteristics {
                rotation_rate: reader.read_u16_be(layout::ROTATION_RATE_RANGE)?,
                form_factor: reader.read_u8(layout::FORM_FACTOR_OFFSET)? & layout::FORM_FACTOR_MASK,
            }));
        }
        CharacteristicsPage::ManufacturerSerialNumber | CharacteristicsPage::AdcManufacturerSerialNumber => {
            let serial = reader
                .read_tail(layout::MANUFACTURER_SERIAL_OFFSET)
                .map(text_until_nul)?;
            sink.push(Record::ManufacturerSerialNumber { serial });
        }
        CharacteristicsPage::SecurityToken | CharacteristicsPage::Other(_) => undecoded(page, sink),
    }
    Ok(())
}

fn undecoded(page: &VpdPage, sink: &mut RecordSink) {
    sink.push(Record::Hex {
        label: Some(format!(
            "Unable to decode pdt=0x{:x}, in hex",
            page.peripheral_device_type()
        )),
        bytes: page.response().to_vec(),
    });
}

//! Pages read at fixed offsets: supported pages, unit serial number,
//! software interface identification and extended INQUIRY data.

use serde::{Deserialize, Serialize};

use super::error::PageError;
use super::header::VpdPage;
use super::layout;
use super::reader::PageReader;
use super::table::lookup;
use crate::Record;
use crate::sink::RecordSink;

/// One entry of the supported VPD pages list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedPage {
    pub code: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
}

/// Extended INQUIRY data flags (page 0x86).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedInquiry {
    pub spt: u8,
    pub grd_chk: bool,
    pub app_chk: bool,
    pub ref_chk: bool,
    pub grp_sup: bool,
    pub prior_sup: bool,
    pub headsup: bool,
    pub ordsup: bool,
    pub simpsup: bool,
    pub corr_d_sup: bool,
    pub nv_sup: bool,
    pub v_sup: bool,
    pub luiclr: bool,
}

pub(crate) fn decode_supported_pages(page: &VpdPage, sink: &mut RecordSink) -> Result<(), PageError> {
    let pdt = page.peripheral_device_type();
    for &code in page.body() {
        let entry = lookup(code, None, Some(pdt));
        sink.push(Record::SupportedPage(SupportedPage {
            code,
            name: entry.map(|e| e.name.to_string()),
            acronym: entry.map(|e| e.acronym.to_string()),
        }));
    }
    Ok(())
}

pub(crate) fn decode_unit_serial_number(page: &VpdPage, sink: &mut RecordSink) -> Result<(), PageError> {
    let reader = PageReader::new(page.response());
    let serial = reader.read_text(layout::HEADER_LEN..reader.len())?;
    sink.push(Record::UnitSerialNumber { serial });
    Ok(())
}

/// Six byte identifiers; a shorter remainder is ignored.
pub(crate) fn decode_software_interface_ids(page: &VpdPage, sink: &mut RecordSink) -> Result<(), PageError> {
    for id in page.body().chunks_exact(layout::SOFTWARE_INTERFACE_ID_LEN) {
        sink.push(Record::SoftwareInterfaceId { id: id.to_vec() });
    }
    Ok(())
}

pub(crate) fn decode_extended_inquiry(page: &VpdPage, sink: &mut RecordSink) -> Result<(), PageError> {
    let reader = PageReader::new(page.response());
    reader.require_len(layout::EXTENDED_INQUIRY_MIN_LEN)?;
    let protection = reader.read_u8(layout::EXTENDED_INQUIRY_PROTECTION_OFFSET)?;
    let task = layout::EXTENDED_INQUIRY_TASK_OFFSET;
    let volatile = layout::EXTENDED_INQUIRY_VOLATILE_OFFSET;
    sink.push(Record::ExtendedInquiry(ExtendedInquiry {
        spt: (protection >> layout::SPT_SHIFT) & layout::SPT_MASK,
        grd_chk: protection & 0x04 != 0,
        app_chk: protection & 0x02 != 0,
        ref_chk: protection & 0x01 != 0,
        grp_sup: reader.read_flag(task, 0x10)?,
        prior_sup: reader.read_flag(task, 0x08)?,
        headsup: reader.read_flag(task, 0x04)?,
        ordsup: reader.read_flag(task, 0x02)?,
        simpsup: reader.read_flag(task, 0x01)?,
        corr_d_sup: reader.read_flag(volatile, 0x04)?,
        nv_sup: reader.read_flag(volatile, 0x02)?,
        v_sup: reader.read_flag(volatile, 0x01)?,
        luiclr: reader.read_flag(layout::EXTENDED_INQUIRY_LUICLR_OFFSET, 0x01)?,
    }));
    Ok(())
}

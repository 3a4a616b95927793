use serde::Serialize;

use super::layout;

/// Known VPD page: code, subvalue, device type (`None` = any) and names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub code: u8,
    pub subvalue: u8,
    pub pdt: Option<u8>,
    pub acronym: &'static str,
    pub name: &'static str,
}

const fn entry(
    code: u8,
    subvalue: u8,
    pdt: Option<u8>,
    acronym: &'static str,
    name: &'static str,
) -> PageEntry {
    PageEntry {
        code,
        subvalue,
        pdt,
        acronym,
        name,
    }
}

// Enumeration order; lookups return the first match.
static PAGE_TABLE: [PageEntry; 25] = [
    entry(layout::ATA_INFORMATION, 0, None, "ai", "ATA information (SAT)"),
    entry(
        layout::ASCII_OPERATING_DEFINITION,
        0,
        None,
        "aod",
        "ASCII implemented operating definition (obs)",
    ),
    entry(layout::DEVICE_CLASS_B0, 0, Some(layout::PDT_DISK), "bl", "Block limits (SBC)"),
    entry(
        layout::DEVICE_CLASS_B1,
        0,
        Some(layout::PDT_DISK),
        "bdc",
        "Block device characteristics (SBC)",
    ),
    entry(layout::DEVICE_IDENTIFICATION, 0, None, "di", "Device identification"),
    entry(
        layout::DEVICE_IDENTIFICATION,
        layout::DI_SELECT_AS_IS,
        None,
        "di_asis",
        "Like 'di' but designators ordered as found",
    ),
    entry(
        layout::DEVICE_IDENTIFICATION,
        layout::DI_SELECT_LU,
        None,
        "di_lu",
        "Device identification, lu only",
    ),
    entry(
        layout::DEVICE_IDENTIFICATION,
        layout::DI_SELECT_TARGET_PORT,
        None,
        "di_port",
        "Device identification, target port only",
    ),
    entry(
        layout::DEVICE_IDENTIFICATION,
        layout::DI_SELECT_TARGET_DEVICE,
        None,
        "di_target",
        "Device identification, target device only",
    ),
    entry(layout::EXTENDED_INQUIRY, 0, None, "ei", "Extended inquiry data"),
    entry(
        layout::IMPLEMENTED_OPERATING_DEFINITION,
        0,
        None,
        "iod",
        "Implemented operating definition (obs)",
    ),
    entry(
        layout::DEVICE_CLASS_B1,
        0,
        Some(layout::PDT_TAPE),
        "mas",
        "Manufacturer assigned serial number (SSC)",
    ),
    entry(
        layout::DEVICE_CLASS_B1,
        0,
        Some(layout::PDT_ADC),
        "masa",
        "Manufacturer assigned serial number (ADC)",
    ),
    entry(
        layout::MANAGEMENT_NETWORK_ADDRESSES,
        0,
        None,
        "mna",
        "Management network addresses",
    ),
    entry(layout::MODE_PAGE_POLICY, 0, None, "mpp", "Mode page policy"),
    entry(layout::DEVICE_CLASS_B0, 0, Some(layout::PDT_OSD), "oi", "OSD information"),
    entry(
        layout::PROTOCOL_SPECIFIC_LU,
        0,
        Some(layout::PDT_DISK),
        "pslu",
        "Protocol-specific logical unit information",
    ),
    entry(
        layout::PROTOCOL_SPECIFIC_PORT,
        0,
        Some(layout::PDT_DISK),
        "pspo",
        "Protocol-specific port information",
    ),
    entry(
        layout::DEVICE_CLASS_B0,
        0,
        Some(layout::PDT_TAPE),
        "sad",
        "Sequential access device capabilities (SSC)",
    ),
    entry(
        layout::SOFTWARE_INTERFACE_IDENTIFICATION,
        0,
        None,
        "sii",
        "Software interface identification",
    ),
    entry(layout::UNIT_SERIAL_NUMBER, 0, None, "sn", "Unit serial number"),
    entry(layout::SCSI_PORTS, 0, None, "sp", "SCSI ports"),
    entry(layout::DEVICE_CLASS_B1, 0, Some(layout::PDT_OSD), "st", "Security token (OSD)"),
    entry(layout::SUPPORTED_VPD_PAGES, 0, None, "sv", "Supported VPD pages"),
    entry(
        layout::DEVICE_CLASS_B2,
        0,
        Some(layout::PDT_TAPE),
        "tas",
        "TapeAlert supported flags (SSC)",
    ),
];

/// All known pages, in enumeration order.
pub fn entries() -> &'static [PageEntry] {
    &PAGE_TABLE
}

/// Exact acronym match.
///
/// # Examples
/// ```
/// use vpdscope_core::pages::find_by_acronym;
///
/// let entry = find_by_acronym("di_lu").unwrap();
/// assert_eq!((entry.code, entry.subvalue), (0x83, 0x01));
/// assert!(find_by_acronym("nope").is_none());
/// ```
pub fn find_by_acronym(acronym: &str) -> Option<&'static PageEntry> {
    PAGE_TABLE.iter().find(|entry| entry.acronym == acronym)
}

/// Finds the entry for a page, relaxing the key step by step.
///
/// `None` for `subvalue` or `pdt` is a wildcard. The keys tried, in order,
/// are (subvalue, pdt), (subvalue, any pdt) and (any subvalue, any pdt). A
/// concrete `pdt` only matches entries registered for that device type.
pub fn lookup(code: u8, subvalue: Option<u8>, pdt: Option<u8>) -> Option<&'static PageEntry> {
    let keys = [(subvalue, pdt), (subvalue, None), (None, None)];
    keys.iter().find_map(|&(subvalue, pdt)| {
        PAGE_TABLE.iter().find(|entry| {
            entry.code == code
                && subvalue.is_none_or(|sub| sub == entry.subvalue)
                && pdt.is_none_or(|pdt| entry.pdt == Some(pdt))
        })
    })
}

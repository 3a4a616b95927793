use super::layout;

/// Meaning of page 0xb0 for the responding device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitsPage {
    BlockLimits,
    SequentialAccessCapabilities,
    OsdInformation,
    Other(u8),
}

/// Meaning of page 0xb1 for the responding device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacteristicsPage {
    BlockDeviceCharacteristics,
    ManufacturerSerialNumber,
    SecurityToken,
    AdcManufacturerSerialNumber,
    Other(u8),
}

/// Standard page decoders, selected by page code and, for the two
/// overloaded codes only, by peripheral device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    SupportedPages,
    UnitSerialNumber,
    DeviceIdentification,
    SoftwareInterfaceIdentification,
    ManagementNetworkAddresses,
    ExtendedInquiry,
    ModePagePolicy,
    ScsiPorts,
    AtaInformation,
    ProtocolSpecificLogicalUnit,
    ProtocolSpecificPort,
    Limits(LimitsPage),
    Characteristics(CharacteristicsPage),
}

impl PageKind {
    /// `None` means no standard decoder exists for the page.
    ///
    /// # Examples
    /// ```
    /// use vpdscope_core::pages::{LimitsPage, PageKind};
    ///
    /// assert_eq!(PageKind::resolve(0xb0, 0x01), Some(PageKind::Limits(LimitsPage::SequentialAccessCapabilities)));
    /// assert_eq!(PageKind::resolve(0xc0, 0x00), None);
    /// ```
    pub fn resolve(page_code: u8, pdt: u8) -> Option<Self> {
        let kind = match page_code {
            layout::SUPPORTED_VPD_PAGES => PageKind::SupportedPages,
            layout::UNIT_SERIAL_NUMBER => PageKind::UnitSerialNumber,
            layout::DEVICE_IDENTIFICATION => PageKind::DeviceIdentification,
            layout::SOFTWARE_INTERFACE_IDENTIFICATION => PageKind::SoftwareInterfaceIdentification,
            layout::MANAGEMENT_NETWORK_ADDRESSES => PageKind::ManagementNetworkAddresses,
            layout::EXTENDED_INQUIRY => PageKind::ExtendedInquiry,
            layout::MODE_PAGE_POLICY => PageKind::ModePagePolicy,
            layout::SCSI_PORTS => PageKind::ScsiPorts,
            layout::ATA_INFORMATION => PageKind::AtaInformation,
            layout::PROTOCOL_SPECIFIC_LU => PageKind::ProtocolSpecificLogicalUnit,
            layout::PROTOCOL_SPECIFIC_PORT => PageKind::ProtocolSpecificPort,
            layout::DEVICE_CLASS_B0 => PageKind::Limits(match pdt {
                layout::PDT_DISK | layout::PDT_WORM | layout::PDT_OPTICAL => LimitsPage::BlockLimits,
                layout::PDT_TAPE | layout::PDT_CHANGER => LimitsPage::SequentialAccessCapabilities,
                layout::PDT_OSD => LimitsPage::OsdInformation,
                other => LimitsPage::Other(other),
            }),
            layout::DEVICE_CLASS_B1 => PageKind::Characteristics(match pdt {
                layout::PDT_DISK | layout::PDT_WORM | layout::PDT_OPTICAL => {
                    CharacteristicsPage::BlockDeviceCharacteristics
                }
                layout::PDT_TAPE | layout::PDT_CHANGER => CharacteristicsPage::ManufacturerSerialNumber,
                layout::PDT_OSD => CharacteristicsPage::SecurityToken,
                layout::PDT_ADC => CharacteristicsPage::AdcManufacturerSerialNumber,
                other => CharacteristicsPage::Other(other),
            }),
            _ => return None,
        };
        Some(kind)
    }

    pub fn title(self) -> String {
        let title = match self {
            PageKind::SupportedPages => "Supported VPD pages VPD page",
            PageKind::UnitSerialNumber => "Unit serial number VPD page",
            PageKind::DeviceIdentification => "Device Identification VPD page",
            PageKind::SoftwareInterfaceIdentification => "Software interface identification VPD page",
            PageKind::ManagementNetworkAddresses => "Management network addresses VPD page",
            PageKind::ExtendedInquiry => "extended INQUIRY data VPD page",
            PageKind::ModePagePolicy => "Mode page VPD policy",
            PageKind::ScsiPorts => "SCSI Ports VPD page",
            PageKind::AtaInformation => "ATA information VPD page",
            PageKind::ProtocolSpecificLogicalUnit => "Protocol-specific logical unit information",
            PageKind::ProtocolSpecificPort => "Protocol-specific port information",
            PageKind::Limits(LimitsPage::BlockLimits) => "Block limits VPD page (SBC)",
            PageKind::Limits(LimitsPage::SequentialAccessCapabilities) => {
                "Sequential access device capabilities VPD page (SSC)"
            }
            PageKind::Limits(LimitsPage::OsdInformation) => "OSD information VPD page (OSD)",
            PageKind::Limits(LimitsPage::Other(pdt)) => {
                return format!("VPD page=0x{:x}, pdt=0x{pdt:x}", layout::DEVICE_CLASS_B0);
            }
            PageKind::Characteristics(CharacteristicsPage::BlockDeviceCharacteristics) => {
                "Block device characteristics VPD page (SBC)"
            }
            PageKind::Characteristics(CharacteristicsPage::ManufacturerSerialNumber) => {
                "Manufactured assigned serial number VPD page (SSC)"
            }
            PageKind::Characteristics(CharacteristicsPage::SecurityToken) => "Security token VPD page (OSD)",
            PageKind::Characteristics(CharacteristicsPage::AdcManufacturerSerialNumber) => {
                "Manufactured assigned serial number VPD page (ADC)"
            }
            PageKind::Characteristics(CharacteristicsPage::Other(pdt)) => {
                return format!("VPD page=0x{:x}, pdt=0x{pdt:x}", layout::DEVICE_CLASS_B1);
            }
        };
        title.to_string()
    }
}

/// Allocation length for the first fetch of `page_code`.
pub fn default_alloc_len(page_code: u8) -> u16 {
    match page_code {
        layout::ATA_INFORMATION => layout::ATA_INFORMATION_ALLOC_LEN,
        _ => layout::DEFAULT_ALLOC_LEN,
    }
}

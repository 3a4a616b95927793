//! SCSI code tables shared by the designator, transport id and page decoders.
//!
//! Every table is total: values outside the assigned range decode to a
//! reserved variant that keeps the raw number, so no lookup can panic on
//! device-supplied input.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scope of a designator (bits 5..4 of descriptor byte 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Association {
    LogicalUnit,
    TargetPort,
    TargetDevice,
    Reserved,
}

impl Association {
    /// The three assigned associations, in the order the page is walked.
    pub const ALL: [Association; 3] = [
        Association::LogicalUnit,
        Association::TargetPort,
        Association::TargetDevice,
    ];

    pub fn from_bits(value: u8) -> Self {
        match value & 0x3 {
            0 => Association::LogicalUnit,
            1 => Association::TargetPort,
            2 => Association::TargetDevice,
            _ => Association::Reserved,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Association::LogicalUnit => 0,
            Association::TargetPort => 1,
            Association::TargetDevice => 2,
            Association::Reserved => 3,
        }
    }

    /// Bit used by the device identification association selection mask.
    pub fn selection_bit(self) -> u8 {
        1 << self.bits()
    }

    pub fn name(self) -> &'static str {
        match self {
            Association::LogicalUnit => "Addressed logical unit",
            Association::TargetPort => "Target port",
            Association::TargetDevice => "Target device that contains addressed lu",
            Association::Reserved => "Reserved [0x3]",
        }
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encoding of a designator payload (low nibble of descriptor byte 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeSet {
    Binary,
    Ascii,
    Utf8,
    Reserved(u8),
}

impl CodeSet {
    pub fn from_bits(value: u8) -> Self {
        match value & 0xf {
            1 => CodeSet::Binary,
            2 => CodeSet::Ascii,
            3 => CodeSet::Utf8,
            other => CodeSet::Reserved(other),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            CodeSet::Binary => 1,
            CodeSet::Ascii => 2,
            CodeSet::Utf8 => 3,
            CodeSet::Reserved(value) => value & 0xf,
        }
    }
}

impl fmt::Display for CodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeSet::Binary => f.write_str("Binary"),
            CodeSet::Ascii => f.write_str("ASCII"),
            CodeSet::Utf8 => f.write_str("UTF-8"),
            CodeSet::Reserved(value) => write!(f, "Reserved [0x{value:x}]"),
        }
    }
}

/// Designator type (low nibble of descriptor byte 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignatorType {
    VendorSpecific,
    T10VendorId,
    Eui64,
    Naa,
    RelativeTargetPort,
    TargetPortGroup,
    LogicalUnitGroup,
    Md5LogicalUnitId,
    ScsiNameString,
    Reserved(u8),
}

impl DesignatorType {
    pub fn from_bits(value: u8) -> Self {
        match value & 0xf {
            0 => DesignatorType::VendorSpecific,
            1 => DesignatorType::T10VendorId,
            2 => DesignatorType::Eui64,
            3 => DesignatorType::Naa,
            4 => DesignatorType::RelativeTargetPort,
            5 => DesignatorType::TargetPortGroup,
            6 => DesignatorType::LogicalUnitGroup,
            7 => DesignatorType::Md5LogicalUnitId,
            8 => DesignatorType::ScsiNameString,
            other => DesignatorType::Reserved(other),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            DesignatorType::VendorSpecific => 0,
            DesignatorType::T10VendorId => 1,
            DesignatorType::Eui64 => 2,
            DesignatorType::Naa => 3,
            DesignatorType::RelativeTargetPort => 4,
            DesignatorType::TargetPortGroup => 5,
            DesignatorType::LogicalUnitGroup => 6,
            DesignatorType::Md5LogicalUnitId => 7,
            DesignatorType::ScsiNameString => 8,
            DesignatorType::Reserved(value) => value & 0xf,
        }
    }
}

impl fmt::Display for DesignatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignatorType::VendorSpecific => f.write_str("vendor specific [0x0]"),
            DesignatorType::T10VendorId => f.write_str("T10 vendor identification"),
            DesignatorType::Eui64 => f.write_str("EUI-64 based"),
            DesignatorType::Naa => f.write_str("NAA"),
            DesignatorType::RelativeTargetPort => f.write_str("Relative target port"),
            DesignatorType::TargetPortGroup => f.write_str("Target port group"),
            DesignatorType::LogicalUnitGroup => f.write_str("Logical unit group"),
            DesignatorType::Md5LogicalUnitId => f.write_str("MD5 logical unit identifier"),
            DesignatorType::ScsiNameString => f.write_str("SCSI name string"),
            DesignatorType::Reserved(value) => write!(f, "Reserved [0x{value:x}]"),
        }
    }
}

/// Transport protocol identifier (SPC protocol identifier values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolId {
    FibreChannel,
    ParallelScsi,
    Ssa,
    Ieee1394,
    Srp,
    Iscsi,
    Sas,
    Adt,
    Ata,
    Reserved(u8),
    NoSpecificProtocol,
}

impl ProtocolId {
    pub fn from_bits(value: u8) -> Self {
        match value & 0xf {
            0x0 => ProtocolId::FibreChannel,
            0x1 => ProtocolId::ParallelScsi,
            0x2 => ProtocolId::Ssa,
            0x3 => ProtocolId::Ieee1394,
            0x4 => ProtocolId::Srp,
            0x5 => ProtocolId::Iscsi,
            0x6 => ProtocolId::Sas,
            0x7 => ProtocolId::Adt,
            0x8 => ProtocolId::Ata,
            0xf => ProtocolId::NoSpecificProtocol,
            other => ProtocolId::Reserved(other),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            ProtocolId::FibreChannel => 0x0,
            ProtocolId::ParallelScsi => 0x1,
            ProtocolId::Ssa => 0x2,
            ProtocolId::Ieee1394 => 0x3,
            ProtocolId::Srp => 0x4,
            ProtocolId::Iscsi => 0x5,
            ProtocolId::Sas => 0x6,
            ProtocolId::Adt => 0x7,
            ProtocolId::Ata => 0x8,
            ProtocolId::Reserved(value) => value & 0xf,
            ProtocolId::NoSpecificProtocol => 0xf,
        }
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolId::FibreChannel => f.write_str("Fibre Channel (FCP-2)"),
            ProtocolId::ParallelScsi => f.write_str("Parallel SCSI (SPI-4)"),
            ProtocolId::Ssa => f.write_str("SSA (SSA-S3P)"),
            ProtocolId::Ieee1394 => f.write_str("IEEE 1394 (SBP-3)"),
            ProtocolId::Srp => f.write_str("Remote Direct Memory Access (RDMA)"),
            ProtocolId::Iscsi => f.write_str("Internet SCSI (iSCSI)"),
            ProtocolId::Sas => f.write_str("Serial Attached SCSI (SAS)"),
            ProtocolId::Adt => f.write_str("Automation/Drive Interface (ADT)"),
            ProtocolId::Ata => f.write_str("ATA Packet Interface (ATA/ATAPI-7)"),
            ProtocolId::Reserved(value) => write!(f, "Reserved [0x{value:x}]"),
            ProtocolId::NoSpecificProtocol => f.write_str("No specific protocol"),
        }
    }
}

/// Human-readable name of a peripheral device type (5-bit value).
pub fn peripheral_device_type_name(pdt: u8) -> &'static str {
    match pdt & 0x1f {
        0x00 => "disk",
        0x01 => "tape",
        0x02 => "printer",
        0x03 => "processor",
        0x04 => "write once optical disk",
        0x05 => "cd/dvd",
        0x06 => "scanner",
        0x07 => "optical memory device",
        0x08 => "medium changer",
        0x09 => "communications",
        0x0a | 0x0b => "graphics",
        0x0c => "storage array controller",
        0x0d => "enclosure services device",
        0x0e => "simplified direct access device",
        0x0f => "optical card reader/writer device",
        0x10 => "bridge controller commands",
        0x11 => "object based storage",
        0x12 => "automation/drive interface",
        0x1e => "well known logical unit",
        0x1f => "no physical device on this lu",
        _ => "reserved",
    }
}

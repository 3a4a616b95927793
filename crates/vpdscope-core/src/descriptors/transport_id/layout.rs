// TransportID layout (SPC-4 7.6.4); every record is at least 24 bytes.
pub const RECORD_LEN: usize = 24;
pub const BUFFER_LEN_MULTIPLE: usize = 4;

pub const HEADER_OFFSET: usize = 0;
pub const FORMAT_CODE_SHIFT: u8 = 6;
pub const FORMAT_CODE_MASK: u8 = 0x03;
pub const PROTOCOL_ID_MASK: u8 = 0x0f;

pub const FC_WWN_RANGE: std::ops::Range<usize> = 8..16;
pub const SPI_ADDRESS_RANGE: std::ops::Range<usize> = 2..4;
pub const SPI_RELATIVE_PORT_RANGE: std::ops::Range<usize> = 6..8;
pub const IEEE1394_EUI64_RANGE: std::ops::Range<usize> = 8..16;
pub const SRP_ID_RANGE: std::ops::Range<usize> = 8..24;
pub const SAS_ADDRESS_RANGE: std::ops::Range<usize> = 4..12;

pub const ISCSI_LENGTH_RANGE: std::ops::Range<usize> = 2..4;
pub const ISCSI_NAME_OFFSET: usize = 4;
pub const ISCSI_FORMAT_NAME: u8 = 0;
pub const ISCSI_FORMAT_WWUID: u8 = 1;

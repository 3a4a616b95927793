// Identification descriptor header (SPC-4, device identification VPD page).
pub const HEADER_LEN: usize = 4;
pub const PROTOCOL_CODE_SET_OFFSET: usize = 0;
pub const FLAGS_OFFSET: usize = 1;
pub const LENGTH_OFFSET: usize = 3;

pub const PROTOCOL_ID_SHIFT: u8 = 4;
pub const CODE_SET_MASK: u8 = 0x0f;
pub const PIV_MASK: u8 = 0x80;
pub const ASSOCIATION_SHIFT: u8 = 4;
pub const ASSOCIATION_MASK: u8 = 0x03;
pub const DESIGNATOR_TYPE_MASK: u8 = 0x0f;

// T10 vendor identification.
pub const T10_VENDOR_LEN: usize = 8;

// EUI-64 based designators.
pub const EUI64_LEN: usize = 8;
pub const EUI64_DIRECTORY_LEN: usize = 12;
pub const EUI64_EXTENDED_LEN: usize = 16;
pub const EUI64_EXTENSION_RANGE: std::ops::Range<usize> = 0..8;
pub const EUI64_COMPANY_ID_LEN: usize = 3;
pub const EUI64_VENDOR_EXTENSION_LEN: usize = 5;
pub const EUI64_DIRECTORY_ID_RANGE: std::ops::Range<usize> = 8..12;

// NAA designators.
pub const NAA_SHIFT: u8 = 4;
pub const NAA_IEEE_EXTENDED: u8 = 2;
pub const NAA_IEEE_REGISTERED: u8 = 5;
pub const NAA_IEEE_REGISTERED_EXTENDED: u8 = 6;
pub const NAA2_LEN: usize = 8;
pub const NAA5_LEN: usize = 8;
pub const NAA6_LEN: usize = 16;
pub const NAA2_COMPANY_ID_RANGE: std::ops::Range<usize> = 2..5;
pub const NAA2_VENDOR_SPECIFIC_B_RANGE: std::ops::Range<usize> = 5..8;
pub const NAA_COMPANY_ID_RANGE: std::ops::Range<usize> = 0..4;
pub const NAA_VENDOR_SPECIFIC_RANGE: std::ops::Range<usize> = 3..8;
pub const NAA6_EXTENSION_RANGE: std::ops::Range<usize> = 8..16;

// Relative target port, target port group and logical unit group.
pub const PORT_GROUP_LEN: usize = 4;
pub const PORT_GROUP_RANGE: std::ops::Range<usize> = 2..4;

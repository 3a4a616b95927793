use std::ops::Range;

// VPD response header (SPC-4 7.8.1).
pub const HEADER_LEN: usize = 4;
pub const PERIPHERAL_OFFSET: usize = 0;
pub const PAGE_CODE_OFFSET: usize = 1;
pub const PAGE_LENGTH_RANGE: Range<usize> = 2..4;
pub const QUALIFIER_SHIFT: u8 = 5;
pub const QUALIFIER_MASK: u8 = 0x07;
pub const PDT_MASK: u8 = 0x1f;

// Allocation lengths.
pub const DEFAULT_ALLOC_LEN: u16 = 252;
pub const ATA_INFORMATION_ALLOC_LEN: u16 = 572;
pub const MAX_RESPONSE_LEN: usize = 0xc000 + 0x80;
pub const BAD_RESPONSE_DUMP_LEN: usize = 32;

// Page codes.
pub const SUPPORTED_VPD_PAGES: u8 = 0x00;
pub const UNIT_SERIAL_NUMBER: u8 = 0x80;
pub const IMPLEMENTED_OPERATING_DEFINITION: u8 = 0x81;
pub const ASCII_OPERATING_DEFINITION: u8 = 0x82;
pub const DEVICE_IDENTIFICATION: u8 = 0x83;
pub const SOFTWARE_INTERFACE_IDENTIFICATION: u8 = 0x84;
pub const MANAGEMENT_NETWORK_ADDRESSES: u8 = 0x85;
pub const EXTENDED_INQUIRY: u8 = 0x86;
pub const MODE_PAGE_POLICY: u8 = 0x87;
pub const SCSI_PORTS: u8 = 0x88;
pub const ATA_INFORMATION: u8 = 0x89;
pub const PROTOCOL_SPECIFIC_LU: u8 = 0x90;
pub const PROTOCOL_SPECIFIC_PORT: u8 = 0x91;
pub const DEVICE_CLASS_B0: u8 = 0xb0;
pub const DEVICE_CLASS_B1: u8 = 0xb1;
pub const DEVICE_CLASS_B2: u8 = 0xb2;

// Device identification subvalues.
pub const DI_SELECT_ALL: u8 = 0;
pub const DI_SELECT_LU: u8 = 0x01;
pub const DI_SELECT_TARGET_PORT: u8 = 0x02;
pub const DI_SELECT_TARGET_DEVICE: u8 = 0x04;
pub const DI_SELECT_AS_IS: u8 = 0x20;

// Software interface identification: 6 byte identifiers from byte 4.
pub const SOFTWARE_INTERFACE_ID_LEN: usize = 6;

// Management network address descriptor.
pub const NETWORK_ADDRESS_HEADER_LEN: usize = 4;
pub const NETWORK_ASSOCIATION_SHIFT: u8 = 5;
pub const NETWORK_SERVICE_TYPE_MASK: u8 = 0x1f;
pub const NETWORK_ADDRESS_LENGTH_RANGE: Range<usize> = 2..4;

// Extended INQUIRY data.
pub const EXTENDED_INQUIRY_MIN_LEN: usize = 8;
pub const EXTENDED_INQUIRY_PROTECTION_OFFSET: usize = 4;
pub const EXTENDED_INQUIRY_TASK_OFFSET: usize = 5;
pub const EXTENDED_INQUIRY_VOLATILE_OFFSET: usize = 6;
pub const EXTENDED_INQUIRY_LUICLR_OFFSET: usize = 7;
pub const SPT_SHIFT: u8 = 3;
pub const SPT_MASK: u8 = 0x07;

// Mode page policy descriptor.
pub const MODE_POLICY_DESCRIPTOR_LEN: usize = 4;
pub const MODE_POLICY_PAGE_CODE_MASK: u8 = 0x3f;
pub const MODE_POLICY_MLUS_MASK: u8 = 0x80;
pub const MODE_POLICY_MASK: u8 = 0x03;

// SCSI ports designation descriptor.
pub const PORT_HEADER_LEN: usize = 8;
pub const PORT_RELATIVE_PORT_RANGE: Range<usize> = 2..4;
pub const PORT_INITIATOR_ID_LENGTH_RANGE: Range<usize> = 6..8;
pub const TARGET_DESCRIPTORS_HEADER_LEN: usize = 4;
pub const TARGET_DESCRIPTORS_LENGTH_RANGE: Range<usize> = 2..4;

// ATA information (SAT).
pub const ATA_MIN_LEN: usize = 36;
pub const ATA_VENDOR_RANGE: Range<usize> = 8..16;
pub const ATA_PRODUCT_RANGE: Range<usize> = 16..32;
pub const ATA_REVISION_RANGE: Range<usize> = 32..36;
pub const ATA_SIGNATURE_RANGE: Range<usize> = 36..56;
pub const ATA_COMMAND_CODE_OFFSET: usize = 56;
pub const ATA_COMMAND_MIN_LEN: usize = 60;
pub const ATA_IDENTIFY_OFFSET: usize = 60;
pub const ATA_IDENTIFY_LEN: usize = 512;
pub const ATA_IDENTIFY_DEVICE: u8 = 0xec;
pub const ATA_IDENTIFY_PACKET_DEVICE: u8 = 0xa1;
pub const ATA_SERIAL_WORDS: Range<usize> = 10..20;
pub const ATA_FIRMWARE_WORDS: Range<usize> = 23..27;
pub const ATA_MODEL_WORDS: Range<usize> = 27..47;

// Protocol-specific logical unit / port descriptors.
pub const PROTOCOL_DESCRIPTOR_HEADER_LEN: usize = 8;
pub const PROTOCOL_RELATIVE_PORT_RANGE: Range<usize> = 0..2;
pub const PROTOCOL_ID_OFFSET: usize = 2;
pub const PROTOCOL_ID_MASK: u8 = 0x0f;
pub const PROTOCOL_DESCRIPTOR_LENGTH_RANGE: Range<usize> = 6..8;
pub const SAS_TLR_CONTROL_MASK: u8 = 0x01;

// Block limits (SBC).
pub const BLOCK_LIMITS_MIN_LEN: usize = 16;
pub const BLOCK_LIMITS_PREFETCH_MIN_LEN: usize = 20;
pub const OPTIMAL_GRANULARITY_RANGE: Range<usize> = 6..8;
pub const MAX_TRANSFER_RANGE: Range<usize> = 8..12;
pub const OPTIMAL_TRANSFER_RANGE: Range<usize> = 12..16;
pub const MAX_PREFETCH_RANGE: Range<usize> = 16..20;

// Sequential access device capabilities (SSC).
pub const WORM_OFFSET: usize = 4;

// Block device characteristics (SBC).
pub const BLOCK_CHARACTERISTICS_MIN_LEN: usize = 64;
pub const ROTATION_RATE_RANGE: Range<usize> = 4..6;
pub const FORM_FACTOR_OFFSET: usize = 7;
pub const FORM_FACTOR_MASK: u8 = 0x0f;

// Manufacturer-assigned serial number (SSC/ADC).
pub const MANUFACTURER_SERIAL_OFFSET: usize = 4;

// Peripheral device types that overload 0xb0/0xb1.
pub const PDT_DISK: u8 = 0x00;
pub const PDT_TAPE: u8 = 0x01;
pub const PDT_WORM: u8 = 0x04;
pub const PDT_OPTICAL: u8 = 0x07;
pub const PDT_CHANGER: u8 = 0x08;
pub const PDT_OSD: u8 = 0x11;
pub const PDT_ADC: u8 = 0x12;

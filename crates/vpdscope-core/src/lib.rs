//! vpdscope core library for SCSI Vital Product Data decoding.
//!
//! This crate implements the decode pipeline used by the CLI: a page fetcher
//! (a capture directory, a single response file or an in-memory map) hands
//! raw INQUIRY responses to the dispatcher, which validates them and runs an
//! ordered chain of page handlers (standard pages, vendor pages, raw hex).
//! Handlers drive the descriptor decoders (layout/reader/parser) and emit
//! structured records; rendering to text is a separate layer. Decoding is
//! byte-oriented and side-effect free; all I/O is isolated in `source`.
//!
//! Invariants:
//! - No decoder reads outside the fetched response; a descriptor that does
//!   not fit aborts only its own page, keeping what was decoded before it.
//! - Per-designator anomalies become diagnostics plus a raw fallback.
//! - Decoding the same response twice yields the same report.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use vpdscope_core::{DecodeOptions, PageRequest, decode_capture};
//!
//! let requests = [PageRequest::new(0x83)];
//! let report = decode_capture(Path::new("capture/"), &requests, DecodeOptions::default())?;
//! println!("report version: {}", report.report_version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

/// Appends formatted text to a `String`.
macro_rules! push_fmt {
    ($out:expr, $($arg:tt)*) => {
        $out.push_str(&format!($($arg)*))
    };
}

/// Appends a formatted line to a `String`.
macro_rules! push_line {
    ($out:expr) => {
        $out.push('\n')
    };
    ($out:expr, $($arg:tt)*) => {
        $out.push_str(&format!("{}\n", format_args!($($arg)*)))
    };
}

pub mod codes;
pub mod descriptors;
mod dispatch;
mod hex;
pub mod pages;
pub mod render;
mod session;
mod sink;
mod source;

pub use descriptors::designator::{DesignatorError, DesignatorRecord, ShortIdentifier};
pub use descriptors::transport_id::TransportIdRecord;
pub use dispatch::{
    DecodeError, DecodeOptions, Dispatcher, PageHandler, PageRequest, RawPages, StandardPages, decode_page,
    fetch_vpd_page, finish_page,
};
pub use hex::{compact_hex, hex_dump, hex_string, parse_hex};
pub use pages::{
    AtaInformation, BlockDeviceCharacteristics, BlockLimits, ExtendedInquiry, ModePagePolicy, NetworkAddress,
    PageError, ProtocolSpecific, SupportedPage, VpdPage,
};
pub use session::{SessionError, decode_capture, decode_source};
pub use sink::RecordSink;
pub use source::{CaptureFetcher, FetchError, MemoryFetcher, PageFetcher};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the capture has no usable modification time.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decode report for one capture, pages in request order.
///
/// # Examples
/// ```
/// use vpdscope_core::make_stub_report;
///
/// let report = make_stub_report("capture/", 512);
/// assert_eq!(report.report_version, vpdscope_core::REPORT_VERSION);
/// assert!(report.pages.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp; the capture's modification time when known.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Decoded pages, including the partial output of malformed ones.
    pub pages: Vec<PageReport>,
    /// Pages that could not be decoded completely.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PageFailure>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use vpdscope_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "vpdscope".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "vpdscope");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "vpdscope").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use vpdscope_core::InputInfo;
///
/// let input = InputInfo {
///     path: "capture/".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Total size of the captured responses in bytes.
    pub bytes: u64,
}

/// Why one requested page is missing from, or incomplete in, the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    pub page_code: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subvalue: Option<u8>,
    /// `malformed`, `unsupported` or `io`.
    pub kind: String,
    pub message: String,
}

/// Structured output of one page decode.
///
/// # Examples
/// ```
/// use vpdscope_core::{DecodeOptions, MemoryFetcher, PageRequest, Record, decode_page};
///
/// let mut fetcher = MemoryFetcher::new().with_page(0x80, vec![0x00, 0x80, 0x00, 0x04, b'S', b'N', b'4', b'2']);
/// let report = decode_page(&mut fetcher, &PageRequest::new(0x80), DecodeOptions::default())?;
/// assert_eq!(report.acronym.as_deref(), Some("sn"));
/// assert_eq!(report.records, vec![Record::UnitSerialNumber { serial: "SN42".to_string() }]);
/// # Ok::<(), vpdscope_core::DecodeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    pub page_code: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subvalue: Option<u8>,
    pub title: String,
    /// Page table acronym, when the page is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    /// Name of the handler that produced the records.
    pub decoder: String,
    pub peripheral_qualifier: u8,
    pub peripheral_device_type: u8,
    pub declared_length: usize,
    /// Response header and body, cut to the declared length.
    #[serde(with = "hex::hex_bytes")]
    pub raw: Vec<u8>,
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Non-fatal anomaly found while decoding a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Offset the anomaly refers to, relative to the list being decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    pub message: String,
}

/// One decoded item, in the order the page yields them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// Heading that groups the records following it.
    Section { title: String },
    Designator(DesignatorRecord),
    ShortId(ShortIdentifier),
    TransportId(TransportIdRecord),
    SupportedPage(SupportedPage),
    UnitSerialNumber { serial: String },
    SoftwareInterfaceId {
        #[serde(with = "hex::hex_bytes")]
        id: Vec<u8>,
    },
    NetworkAddress(NetworkAddress),
    ExtendedInquiry(ExtendedInquiry),
    ModePagePolicy(ModePagePolicy),
    RelativePort { port: u16 },
    ProtocolSpecific(ProtocolSpecific),
    AtaInformation(AtaInformation),
    BlockLimits(BlockLimits),
    SequentialAccessCapabilities { worm: bool },
    BlockDeviceCharacteristics(BlockDeviceCharacteristics),
    ManufacturerSerialNumber { serial: String },
    /// Bytes shown as a hex dump, optionally introduced by a label.
    Hex {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(with = "hex::hex_bytes")]
        bytes: Vec<u8>,
    },
}

impl From<DesignatorRecord> for Record {
    fn from(record: DesignatorRecord) -> Self {
        Record::Designator(record)
    }
}

impl From<ShortIdentifier> for Record {
    fn from(id: ShortIdentifier) -> Self {
        Record::ShortId(id)
    }
}

impl From<TransportIdRecord> for Record {
    fn from(record: TransportIdRecord) -> Self {
        Record::TransportId(record)
    }
}

/// Build an empty report with tool and input metadata.
///
/// # Examples
/// ```
/// use vpdscope_core::make_stub_report;
///
/// let report = make_stub_report("vpd_83.bin", 64);
/// assert_eq!(report.input.bytes, 64);
/// assert_eq!(report.generated_at, vpdscope_core::DEFAULT_GENERATED_AT);
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "vpdscope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        pages: Vec::new(),
        failures: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{Association, CodeSet, DesignatorType, ProtocolId};
    use crate::descriptors::designator::Designator;

    #[test]
    fn push_macros_append_to_string() {
        let mut out = String::from("a");
        let port = 7;
        push_fmt!(out, "{}-", 0x1);
        push_line!(out, "port {port:#x}");
        push_line!(out);
        assert_eq!(out, "a1-port 0x7\n\n");
    }

    #[test]
    fn stub_report_serializes_without_failures() {
        let report = make_stub_report("capture/", 0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tool"]["name"], "vpdscope");
        assert!(json.get("failures").is_none());
        assert_eq!(json["pages"], serde_json::json!([]));
    }

    #[test]
    fn records_are_tagged_by_kind() {
        let record = Record::Designator(DesignatorRecord {
            offset: 0,
            association: Association::TargetPort,
            designator_type: DesignatorType::RelativeTargetPort,
            code_set: CodeSet::Binary,
            transport: Some(ProtocolId::Sas),
            designator: Designator::RelativeTargetPort { port: 2 },
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "designator");
        assert_eq!(json["association"], "target_port");
        assert_eq!(json["designator"]["type"], "relative_target_port");
        assert_eq!(json["designator"]["port"], 2);

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn hex_record_omits_missing_label() {
        let record = Record::Hex {
            label: None,
            bytes: vec![0xde, 0xad],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "hex", "bytes": "dead"}));
    }

    #[test]
    fn diagnostics_skip_absent_offset() {
        let diagnostic = Diagnostic {
            offset: None,
            message: "peripheral device type differs".to_string(),
        };
        let json = serde_json::to_string(&diagnostic).unwrap();
        assert_eq!(json, r#"{"message":"peripheral device type differs"}"#);
    }
}

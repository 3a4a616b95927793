//! Human-readable rendering of page reports.
//!
//! Decoders only produce [`Record`]s; everything that looks like terminal
//! output lives here. Diagnostics are rendered separately so callers can
//! send them to the error stream.

mod designator;
mod transport;

use crate::codes::{ProtocolId, peripheral_device_type_name};
use crate::dispatch::DecodeError;
use crate::hex::{hex_dump, hex_string};
use crate::pages::{AtaInformation, BlockLimits, PageError};
use crate::{PageReport, Record};

/// Output switches that only affect presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Break identifiers into their fields.
    pub long: bool,
    pub verbose: bool,
    /// Omit the page title.
    pub quiet: bool,
}

/// Renders the records of one page as text.
///
/// # Examples
/// ```
/// use vpdscope_core::render::{RenderOptions, render_text};
/// use vpdscope_core::{DecodeOptions, MemoryFetcher, PageRequest, decode_page};
///
/// let mut fetcher = MemoryFetcher::new().with_page(0x80, vec![0x00, 0x80, 0x00, 0x02, b'4', b'2']);
/// let report = decode_page(&mut fetcher, &PageRequest::new(0x80), DecodeOptions::default())?;
/// let text = render_text(&report, &RenderOptions::default());
/// assert_eq!(text, "Unit serial number VPD page:\n  Unit serial number: 42\n");
/// # Ok::<(), vpdscope_core::DecodeError>(())
/// ```
pub fn render_text(report: &PageReport, options: &RenderOptions) -> String {
    let mut out = String::new();
    write_heading(&mut out, report, options);
    for record in &report.records {
        write_record(&mut out, record, options);
    }
    out
}

/// Title followed by a hex dump of the whole response.
pub fn render_hex(report: &PageReport, options: &RenderOptions) -> String {
    let mut out = String::new();
    write_heading(&mut out, report, options);
    out.push_str(&hex_dump(&report.raw, true));
    out
}

/// Diagnostics, one per line, for the error stream.
pub fn render_diagnostics(report: &PageReport) -> String {
    let mut out = String::new();
    for diagnostic in &report.diagnostics {
        match diagnostic.offset {
            Some(offset) => {
                push_line!(out, "      << {} (offset {offset})>>", diagnostic.message);
            }
            None => {
                push_line!(out, "      << {}>>", diagnostic.message);
            }
        }
    }
    out
}

/// Error text for a page that could not be decoded.
pub fn render_error(err: &DecodeError, options: &RenderOptions) -> String {
    let mut out = String::new();
    if let DecodeError::Malformed {
        source: PageError::EchoMismatch { head, .. },
        ..
    } = err
    {
        out.push_str("invalid VPD response; probably a STANDARD INQUIRY response\n");
        if options.verbose {
            out.push_str("First 32 bytes of bad response\n");
            out.push_str(&hex_dump(head, true));
        }
        return out;
    }
    push_line!(out, "{err}");
    out
}

fn write_heading(out: &mut String, report: &PageReport, options: &RenderOptions) {
    if options.quiet {
        return;
    }
    push_line!(out, "{}:", report.title);
    if options.verbose || options.long {
        push_line!(
            out,
            "   [PQual={}  Peripheral device type: {}]",
            report.peripheral_qualifier,
            peripheral_device_type_name(report.peripheral_device_type)
        );
    }
}

fn write_record(out: &mut String, record: &Record, options: &RenderOptions) {
    match record {
        Record::Section { title } => {
            push_line!(out, "  {title}:");
        }
        Record::Designator(record) => designator::write_designator(out, record, options.long),
        Record::ShortId(id) => designator::write_short_id(out, id),
        Record::TransportId(record) => transport::write_transport_id(out, record),
        Record::SupportedPage(page) => match (&page.name, &page.acronym) {
            (Some(name), Some(acronym)) => {
                push_line!(out, "  {name} [{acronym}]");
            }
            _ => {
                push_line!(out, "  0x{:x}", page.code);
            }
        },
        Record::UnitSerialNumber { serial } => {
            push_line!(out, "  Unit serial number: {serial}");
        }
        Record::SoftwareInterfaceId { id } => {
            push_line!(out, "    {}", hex_string(id));
        }
        Record::NetworkAddress(address) => {
            push_line!(
                out,
                "  {}, Service type: {}",
                address.association.name(),
                address.service_type_name()
            );
            if let Some(text) = &address.address {
                push_line!(out, "    {text}");
            }
        }
        Record::ExtendedInquiry(ei) => {
            push_line!(
                out,
                "  SPT={} GRD_CHK={} APP_CHK={} REF_CHK={}",
                ei.spt,
                u8::from(ei.grd_chk),
                u8::from(ei.app_chk),
                u8::from(ei.ref_chk)
            );
            push_line!(
                out,
                "  GRP_SUP={} PRIOR_SUP={} HEADSUP={} ORDSUP={} SIMPSUP={}",
                u8::from(ei.grp_sup),
                u8::from(ei.prior_sup),
                u8::from(ei.headsup),
                u8::from(ei.ordsup),
                u8::from(ei.simpsup)
            );
            push_line!(
                out,
                "  CORR_D_SUP={} NV_SUP={} V_SUP={} LUICLR={}",
                u8::from(ei.corr_d_sup),
                u8::from(ei.nv_sup),
                u8::from(ei.v_sup),
                u8::from(ei.luiclr)
            );
        }
        Record::ModePagePolicy(policy) => {
            push_fmt!(out, "  Policy page code: 0x{:x}", policy.page_code);
            if policy.subpage_code != 0 {
                push_fmt!(out, ",  subpage code: 0x{:x}", policy.subpage_code);
            }
            push_line!(out);
            push_line!(
                out,
                "    MLUS={},  Policy: {}",
                u8::from(policy.mlus),
                policy.policy_name()
            );
        }
        Record::RelativePort { port } => {
            push_line!(out, "Relative port={port}");
        }
        Record::ProtocolSpecific(info) => {
            if info.protocol == ProtocolId::Sas {
                out.push_str(" Protocol identifier: SAS\n");
            } else {
                push_line!(out, " Protocol identifier: {}", info.protocol);
            }
            push_line!(out, " TLR control supported: {}", u8::from(info.tlr_control_supported));
        }
        Record::AtaInformation(info) => write_ata(out, info, options.long),
        Record::BlockLimits(limits) => write_block_limits(out, limits),
        Record::SequentialAccessCapabilities { worm } => {
            push_line!(out, "  WORM={}", u8::from(*worm));
        }
        Record::BlockDeviceCharacteristics(chars) => {
            push_line!(out, "  {}", chars.rotation_text());
            push_line!(out, "  Nominal form factor{}", chars.form_factor_suffix());
        }
        Record::ManufacturerSerialNumber { serial } => {
            push_line!(out, "  Manufacturer-assigned serial number: {serial}");
        }
        Record::Hex { label, bytes } => {
            if let Some(label) = label {
                push_line!(out, "  {label}:");
            }
            out.push_str(&hex_dump(bytes, true));
        }
    }
}

fn write_block_limits(out: &mut String, limits: &BlockLimits) {
    push_line!(
        out,
        "  Optimal transfer length granularity: {} blocks",
        limits.optimal_transfer_length_granularity
    );
    push_line!(out, "  Maximum transfer length: {} blocks", limits.maximum_transfer_length);
    push_line!(out, "  Optimal transfer length: {} blocks", limits.optimal_transfer_length);
    if let Some(prefetch) = limits.maximum_prefetch_length {
        push_line!(
            out,
            "  Maximum prefetch, xdread, xdwrite transfer length: {prefetch} blocks"
        );
    }
}

fn write_ata(out: &mut String, info: &AtaInformation, long: bool) {
    push_line!(out, "  SAT Vendor identification: {}", info.vendor);
    push_line!(out, "  SAT Product identification: {}", info.product);
    push_line!(out, "  SAT Product revision level: {}", info.revision);
    if let (true, Some(signature)) = (long, &info.signature) {
        out.push_str("  Signature (Device to host FIS):\n");
        out.push_str(&hex_dump(signature, false));
    }
    let packet = |packet: bool| if packet { "PACKET " } else { "" };
    if let Some(summary) = &info.identify {
        push_line!(
            out,
            "  ATA command IDENTIFY {}DEVICE response summary:",
            packet(summary.packet)
        );
        push_line!(out, "    model: {}", summary.model);
        push_line!(out, "    serial number: {}", summary.serial);
        push_line!(out, "    firmware revision: {}", summary.firmware);
    }
    if !long {
        return;
    }
    if let Some(data) = &info.identify_data {
        match (&info.identify, info.command_code) {
            (Some(summary), _) => {
                push_line!(
                    out,
                    "  ATA command IDENTIFY {}DEVICE response in hex:",
                    packet(summary.packet)
                );
            }
            (None, Some(code)) => {
                push_line!(out, "  ATA command 0x{code:x} got following response:");
            }
            (None, None) => {}
        }
        out.push_str(&hex_dump(data, false));
    }
}

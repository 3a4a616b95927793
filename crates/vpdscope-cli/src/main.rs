use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use vpdscope_core::pages::{self, PageEntry};
use vpdscope_core::render::{RenderOptions, render_diagnostics, render_error, render_hex, render_text};
use vpdscope_core::{CaptureFetcher, DecodeError, DecodeOptions, Dispatcher, PageReport, PageRequest};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("VPDSCOPE_BUILD_COMMIT"),
    ", ",
    env!("VPDSCOPE_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  vpdscope decode capture/ -p di\n  vpdscope decode capture/ -ii\n  vpdscope decode capture/ -p 0xb0 --json --pretty\n  vpdscope pages";

const SUPPORTED_PAGES: u8 = 0x00;
const DEVICE_IDENTIFICATION: u8 = 0x83;
// Device identification subvalue: logical unit designators only.
const DI_LOGICAL_UNIT: u8 = 0x01;

#[derive(Parser, Debug)]
#[command(name = "vpdscope")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for SCSI Vital Product Data (VPD) pages.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one VPD page from a capture directory or a single response file.
    #[command(after_help = EXAMPLES)]
    Decode(DecodeArgs),
    /// List the known VPD pages with their acronyms.
    #[command(alias = "enumerate")]
    Pages {
        /// Emit the page table as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Capture directory (vpd_XX.bin files) or a single response file
    input: PathBuf,

    /// Page acronym, or page code (decimal or 0x hex) with an optional ",subvalue"
    #[arg(short = 'p', long)]
    page: Option<String>,

    /// Device identification page; twice for the short logical unit designator
    #[arg(short = 'i', long, action = ArgAction::Count)]
    ident: u8,

    /// Break identifiers into their fields
    #[arg(short = 'l', long)]
    long: bool,

    /// Omit page titles and list only externally usable identifiers
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Hex dump of the whole response
    #[arg(short = 'H', long)]
    hex: bool,

    /// Write the response bytes unchanged
    #[arg(short = 'r', long)]
    raw: bool,

    /// Emit a versioned JSON report
    #[arg(long, conflicts_with_all = ["hex", "raw"])]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pretty: bool,

    /// Increase verbosity (-v debug logging, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode(args) => {
            init_tracing(args.verbose);
            cmd_decode(&args)
        }
        Commands::Pages { json } => {
            init_tracing(0);
            cmd_pages(json)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

/// RUST_LOG wins over the -v count.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn cmd_decode(args: &DecodeArgs) -> Result<(), CliError> {
    if args.hex && args.raw {
        return Err(CliError::new(
            "cannot use --hex and --raw together",
            Some("choose one output format".to_string()),
        ));
    }
    let input = resolve_input_path(&args.input)?;
    validate_input(&input)?;

    let (request, abridged) = resolve_request(args.page.as_deref(), args.ident, args.long)?;
    let quiet = args.quiet || abridged;
    let options = DecodeOptions { quiet };
    tracing::debug!(
        input = %input.display(),
        page_code = request.page_code,
        subvalue = ?request.subvalue,
        pdt_hint = ?request.pdt_hint,
        "decoding"
    );

    if args.json {
        let report = vpdscope_core::decode_capture(&input, std::slice::from_ref(&request), options)
            .with_context(|| format!("Failed to read capture: {}", input.display()))?;
        let json = serialize_json(&report, args.pretty)?;
        write_stdout(json.as_bytes())?;
        write_stdout(b"\n")?;
        return match report.failures.first() {
            None => Ok(()),
            Some(failure) => Err(CliError::new(
                format!("decoding VPD page 0x{:02x} failed: {}", failure.page_code, failure.message),
                Some("the report lists the failure and any partial decode".to_string()),
            )),
        };
    }

    let mut fetcher = CaptureFetcher::open(&input)
        .with_context(|| format!("Failed to open capture: {}", input.display()))?;
    let render = RenderOptions {
        long: args.long,
        verbose: args.verbose > 0,
        quiet,
    };
    match Dispatcher::new().decode_page(&mut fetcher, &request, options) {
        Ok(report) => write_page(&report, args, &render),
        Err(err) => {
            if let Some(partial) = err.partial() {
                write_page(partial, args, &render)?;
            }
            eprint!("{}", render_error(&err, &render));
            Err(decode_failure(&err, request.page_code))
        }
    }
}

fn cmd_pages(json: bool) -> Result<(), CliError> {
    if json {
        #[derive(Serialize)]
        struct PageListing {
            pages: &'static [PageEntry],
        }
        let listing = PageListing {
            pages: pages::entries(),
        };
        let json = serialize_json(&listing, true)?;
        write_stdout(json.as_bytes())?;
        return write_stdout(b"\n");
    }
    let mut out = String::from("Standard VPD pages:\n");
    for entry in pages::entries() {
        out.push_str(&format!(
            "  {:<10} 0x{:02x}      {}\n",
            entry.acronym, entry.code, entry.name
        ));
    }
    write_stdout(out.as_bytes())
}

fn write_page(report: &PageReport, args: &DecodeArgs, render: &RenderOptions) -> Result<(), CliError> {
    if args.raw {
        write_stdout(&report.raw)?;
    } else if args.hex {
        write_stdout(render_hex(report, render).as_bytes())?;
    } else {
        write_stdout(render_text(report, render).as_bytes())?;
    }
    eprint!("{}", render_diagnostics(report));
    Ok(())
}

fn decode_failure(err: &DecodeError, page_code: u8) -> CliError {
    let hint = match err {
        DecodeError::Io(_) => "check that the capture holds a vpd_XX.bin file for this page",
        DecodeError::Malformed { .. } => "run with -v to see the start of the response",
        DecodeError::Unsupported { .. } => "use --hex or --raw to inspect the response",
    };
    CliError::new(
        format!("decoding VPD page 0x{page_code:02x} failed"),
        Some(hint.to_string()),
    )
}

fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn write_stdout(bytes: &[u8]) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    out.write_all(bytes)
        .and_then(|()| out.flush())
        .context("Failed to write to stdout")
        .map_err(Into::into)
}

/// Page request from `-p`/`-i`, plus whether the abridged listing is forced.
///
/// `-i` overrides `-p`; with neither, the supported pages list is decoded.
fn resolve_request(page: Option<&str>, ident: u8, long: bool) -> Result<(PageRequest, bool), CliError> {
    if ident > 0 {
        let request = PageRequest::new(DEVICE_IDENTIFICATION);
        if ident > 1 {
            return Ok((request.with_subvalue(DI_LOGICAL_UNIT), !long));
        }
        return Ok((request, false));
    }
    match page {
        Some(text) => parse_page(text).map(|request| (request, false)),
        None => Ok((PageRequest::new(SUPPORTED_PAGES), false)),
    }
}

fn parse_page(text: &str) -> Result<PageRequest, CliError> {
    let text = text.trim();
    if text.starts_with(|c: char| c.is_ascii_alphabetic()) {
        let entry = pages::find_by_acronym(text).ok_or_else(|| {
            CliError::new(
                format!("abbreviation '{text}' doesn't match a VPD page"),
                Some("run `vpdscope pages` to list the known acronyms".to_string()),
            )
        })?;
        let mut request = PageRequest::new(entry.code);
        if entry.subvalue != 0 {
            request = request.with_subvalue(entry.subvalue);
        }
        if let Some(pdt) = entry.pdt {
            request = request.with_pdt_hint(pdt);
        }
        return Ok(request);
    }

    let (code, subvalue) = match text.split_once(',') {
        Some((code, subvalue)) => (code, Some(subvalue)),
        None => (text, None),
    };
    let code = parse_number(code).ok_or_else(|| {
        CliError::new(
            format!("bad page code value '{code}'"),
            Some("expected 0..255, decimal or with a 0x prefix".to_string()),
        )
    })?;
    let mut request = PageRequest::new(code);
    if let Some(subvalue) = subvalue {
        let subvalue = parse_number(subvalue).ok_or_else(|| {
            CliError::new(
                format!("bad subvalue '{subvalue}'"),
                Some("expected 0..255, decimal or with a 0x prefix".to_string()),
            )
        })?;
        request = request.with_subvalue(subvalue);
    }
    Ok(request)
}

/// Decimal, `0x`-prefixed hex, or hex with an `h` suffix.
fn parse_number(text: &str) -> Option<u8> {
    let text = text.trim();
    let value = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(hex) = text.strip_suffix('h').or_else(|| text.strip_suffix('H')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        text.parse::<u32>().ok()?
    };
    u8::try_from(value).ok()
}

fn validate_input(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input not found: {}", input.display()),
            Some("pass a capture directory of vpd_XX.bin files or a single response file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.exists() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no captures match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple captures match pattern '{}' ({} matches); matches: {listed}{more}",
                pattern,
                matches.len()
            ),
            Some("pass a single capture, or run once per capture".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_accept_decimal_and_hex() {
        assert_eq!(parse_number("131"), Some(0x83));
        assert_eq!(parse_number("0x83"), Some(0x83));
        assert_eq!(parse_number("83h"), Some(0x83));
        assert_eq!(parse_number("256"), None);
        assert_eq!(parse_number("0xzz"), None);
    }

    #[test]
    fn acronym_carries_subvalue_and_device_type() {
        let request = parse_page("di_port").unwrap();
        assert_eq!((request.page_code, request.subvalue), (0x83, Some(0x02)));
        let request = parse_page("sad").unwrap();
        assert_eq!((request.page_code, request.pdt_hint), (0xb0, Some(0x01)));
        assert!(parse_page("nope").is_err());
    }

    #[test]
    fn numeric_page_with_subvalue() {
        let request = parse_page("0x83,2").unwrap();
        assert_eq!((request.page_code, request.subvalue), (0x83, Some(0x02)));
        assert!(parse_page("0x83,300").is_err());
    }

    #[test]
    fn double_ident_selects_logical_unit_abridged() {
        let (request, abridged) = resolve_request(Some("sn"), 2, false).unwrap();
        assert_eq!((request.page_code, request.subvalue), (0x83, Some(DI_LOGICAL_UNIT)));
        assert!(abridged);
        let (_, abridged) = resolve_request(None, 2, true).unwrap();
        assert!(!abridged);
        let (request, _) = resolve_request(None, 0, false).unwrap();
        assert_eq!(request.page_code, 0x00);
    }
}

//! Page dispatch: two-phase fetch, then an ordered chain of page handlers.
//!
//! Phase one fetches the page at its default allocation length, checks the
//! echoed page code and re-fetches when the declared length did not fit.
//! Phase two hands the validated [`VpdPage`] to each handler in turn; a
//! handler answers [`DecodeError::Unsupported`] to pass the page on. The
//! raw-hex handler ends every chain and never declines.

mod handlers;

use thiserror::Error;

pub use handlers::{RawPages, StandardPages, finish_page};

use crate::pages::{self, PageError, ResponseHeader, VpdPage};
use crate::source::{FetchError, PageFetcher};
use crate::{Diagnostic, PageReport};

/// One page to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_code: u8,
    /// Association mask for device identification, otherwise page specific.
    pub subvalue: Option<u8>,
    /// Device type the caller expects; the response header decides.
    pub pdt_hint: Option<u8>,
}

impl PageRequest {
    pub fn new(page_code: u8) -> Self {
        Self {
            page_code,
            subvalue: None,
            pdt_hint: None,
        }
    }

    pub fn with_subvalue(mut self, subvalue: u8) -> Self {
        self.subvalue = Some(subvalue);
        self
    }

    pub fn with_pdt_hint(mut self, pdt: u8) -> Self {
        self.pdt_hint = Some(pdt);
        self
    }
}

/// Options that change what the decoders emit (rendering has its own).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// List designators in abridged form.
    pub quiet: bool,
}

/// Why a page produced no complete report.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Structural fault; `partial` keeps what was decoded before it.
    #[error("VPD page 0x{page_code:02x}: {source}")]
    Malformed {
        page_code: u8,
        source: PageError,
        partial: Option<Box<PageReport>>,
    },
    /// The handler has no decoder for this page; the next one may.
    #[error("VPD page 0x{page_code:02x} not decoded by {handler}")]
    Unsupported { page_code: u8, handler: &'static str },
    #[error("fetch failed: {0}")]
    Io(#[from] FetchError),
}

impl DecodeError {
    /// Short label used in reports: `malformed`, `unsupported` or `io`.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::Malformed { .. } => "malformed",
            DecodeError::Unsupported { .. } => "unsupported",
            DecodeError::Io(_) => "io",
        }
    }

    /// Report holding the output decoded before a malformed page aborted.
    pub fn partial(&self) -> Option<&PageReport> {
        match self {
            DecodeError::Malformed { partial, .. } => partial.as_deref(),
            _ => None,
        }
    }

    fn malformed(page_code: u8, source: PageError) -> Self {
        DecodeError::Malformed {
            page_code,
            source,
            partial: None,
        }
    }
}

/// A page decoder in the dispatch chain.
pub trait PageHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decodes `page`, or returns [`DecodeError::Unsupported`] to pass it on.
    fn decode(
        &self,
        page: &VpdPage,
        request: &PageRequest,
        options: DecodeOptions,
    ) -> Result<PageReport, DecodeError>;
}

/// Fetches one page, re-fetching once when the declared length did not fit.
pub fn fetch_vpd_page<F>(fetcher: &mut F, page_code: u8) -> Result<VpdPage, DecodeError>
where
    F: PageFetcher + ?Sized,
{
    let alloc_len = pages::default_alloc_len(page_code);
    let mut response = fetcher.fetch_page(page_code, alloc_len)?;
    let header = ResponseHeader::parse(&response).map_err(|e| DecodeError::malformed(page_code, e))?;
    header
        .check_echo(page_code, &response)
        .map_err(|e| DecodeError::malformed(page_code, e))?;

    let total = header.total_len();
    if total > pages::MAX_RESPONSE_LEN {
        return Err(DecodeError::malformed(
            page_code,
            PageError::TooLong {
                length: total,
                max: pages::MAX_RESPONSE_LEN,
            },
        ));
    }
    if total > usize::from(alloc_len) {
        let enlarged = u16::try_from(total).map_err(|_| {
            DecodeError::malformed(
                page_code,
                PageError::TooLong {
                    length: total,
                    max: pages::MAX_RESPONSE_LEN,
                },
            )
        })?;
        tracing::debug!(page_code, alloc_len, enlarged, "re-fetching VPD page with larger allocation");
        response = fetcher.fetch_page(page_code, enlarged)?;
    }
    VpdPage::from_response(page_code, response).map_err(|e| DecodeError::malformed(page_code, e))
}

/// Ordered handler chain: standard pages, vendor pages, raw hex.
pub struct Dispatcher {
    handlers: Vec<Box<dyn PageHandler>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: vec![Box::new(StandardPages), Box::new(RawPages)],
        }
    }

    /// Adds a handler tried after the standard pages and earlier vendor
    /// handlers, before the raw-hex fallback.
    pub fn with_vendor_handler(mut self, handler: impl PageHandler + 'static) -> Self {
        let at = self.handlers.len().saturating_sub(1);
        self.handlers.insert(at, Box::new(handler));
        self
    }

    /// Handler names in the order they are tried.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn decode_page<F>(
        &self,
        fetcher: &mut F,
        request: &PageRequest,
        options: DecodeOptions,
    ) -> Result<PageReport, DecodeError>
    where
        F: PageFetcher + ?Sized,
    {
        let page = fetch_vpd_page(fetcher, request.page_code)?;
        self.decode_fetched(&page, request, options)
    }

    /// Runs the chain over an already fetched page.
    pub fn decode_fetched(
        &self,
        page: &VpdPage,
        request: &PageRequest,
        options: DecodeOptions,
    ) -> Result<PageReport, DecodeError> {
        let hint = hint_mismatch(page, request);
        for handler in &self.handlers {
            match handler.decode(page, request, options) {
                Err(DecodeError::Unsupported { handler: name, .. }) => {
                    tracing::debug!(page_code = page.page_code(), handler = name, "handler declined page");
                }
                Ok(mut report) => {
                    tracing::debug!(page_code = page.page_code(), handler = handler.name(), "page decoded");
                    prepend(&mut report, hint);
                    return Ok(report);
                }
                Err(DecodeError::Malformed {
                    page_code,
                    source,
                    mut partial,
                }) => {
                    if let Some(report) = partial.as_deref_mut() {
                        prepend(report, hint);
                    }
                    return Err(DecodeError::Malformed {
                        page_code,
                        source,
                        partial,
                    });
                }
                Err(other) => return Err(other),
            }
        }
        Err(DecodeError::Unsupported {
            page_code: page.page_code(),
            handler: "dispatcher",
        })
    }
}

/// Decodes one page with the default handler chain.
pub fn decode_page<F>(fetcher: &mut F, request: &PageRequest, options: DecodeOptions) -> Result<PageReport, DecodeError>
where
    F: PageFetcher + ?Sized,
{
    Dispatcher::new().decode_page(fetcher, request, options)
}

fn hint_mismatch(page: &VpdPage, request: &PageRequest) -> Option<Diagnostic> {
    let hint = request.pdt_hint?;
    let pdt = page.peripheral_device_type();
    if hint == pdt {
        return None;
    }
    let message = format!("pdt hint 0x{hint:x} differs from response pdt 0x{pdt:x}; decoding with 0x{pdt:x}");
    tracing::warn!(page_code = page.page_code(), "{message}");
    Some(Diagnostic { offset: None, message })
}

fn prepend(report: &mut PageReport, diagnostic: Option<Diagnostic>) {
    if let Some(diagnostic) = diagnostic {
        report.diagnostics.insert(0, diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryFetcher;
    use crate::{Record, RecordSink};

    struct VendorSerial;

    impl PageHandler for VendorSerial {
        fn name(&self) -> &'static str {
            "vendor-c0"
        }

        fn decode(
            &self,
            page: &VpdPage,
            request: &PageRequest,
            _options: DecodeOptions,
        ) -> Result<PageReport, DecodeError> {
            if page.page_code() != 0xc0 {
                return Err(DecodeError::Unsupported {
                    page_code: page.page_code(),
                    handler: self.name(),
                });
            }
            let mut sink = RecordSink::new();
            sink.push(Record::UnitSerialNumber {
                serial: String::from_utf8_lossy(page.body()).into_owned(),
            });
            finish_page(page, request, self.name(), "Vendor serial".to_string(), sink, Ok(()))
        }
    }

    fn response(pdt: u8, code: u8, body: &[u8]) -> Vec<u8> {
        let mut out = vec![pdt, code];
        out.extend_from_slice(&(body.len() as u16).to_be_bytes());
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn long_page_is_fetched_twice() {
        let body = vec![0x41; 300];
        let mut fetcher = MemoryFetcher::new().with_page(0x80, response(0, 0x80, &body));
        let page = fetch_vpd_page(&mut fetcher, 0x80).unwrap();
        assert_eq!(page.body().len(), 300);
        assert_eq!(fetcher.requests(), &[(0x80, 252), (0x80, 304)]);
    }

    #[test]
    fn short_page_is_fetched_once() {
        let mut fetcher = MemoryFetcher::new().with_page(0x80, response(0, 0x80, b"X1"));
        fetch_vpd_page(&mut fetcher, 0x80).unwrap();
        assert_eq!(fetcher.requests(), &[(0x80, 252)]);
    }

    #[test]
    fn oversized_declaration_is_malformed_without_refetch() {
        let mut fetcher = MemoryFetcher::new().with_page(0x83, vec![0, 0x83, 0xff, 0xff]);
        let err = fetch_vpd_page(&mut fetcher, 0x83).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Malformed {
                source: PageError::TooLong { .. },
                ..
            }
        ));
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[test]
    fn unknown_page_falls_through_to_raw() {
        let mut fetcher = MemoryFetcher::new().with_page(0xc1, response(0, 0xc1, &[1, 2, 3]));
        let report = decode_page(&mut fetcher, &PageRequest::new(0xc1), DecodeOptions::default()).unwrap();
        assert_eq!(report.decoder, "raw");
        assert_eq!(report.title, "VPD page code=0xc1");
    }

    #[test]
    fn vendor_handler_runs_before_raw() {
        let dispatcher = Dispatcher::new().with_vendor_handler(VendorSerial);
        assert_eq!(dispatcher.handler_names(), vec!["standard", "vendor-c0", "raw"]);
        let mut fetcher = MemoryFetcher::new().with_page(0xc0, response(0, 0xc0, b"V1"));
        let report = dispatcher
            .decode_page(&mut fetcher, &PageRequest::new(0xc0), DecodeOptions::default())
            .unwrap();
        assert_eq!(report.decoder, "vendor-c0");
        assert_eq!(
            report.records,
            vec![Record::UnitSerialNumber {
                serial: "V1".to_string()
            }]
        );
    }

    #[test]
    fn pdt_hint_mismatch_is_a_diagnostic() {
        let mut fetcher = MemoryFetcher::new().with_page(0xb0, response(0x01, 0xb0, &[0x01, 0, 0, 0]));
        let request = PageRequest::new(0xb0).with_pdt_hint(0x00);
        let report = decode_page(&mut fetcher, &request, DecodeOptions::default()).unwrap();
        assert_eq!(report.records, vec![Record::SequentialAccessCapabilities { worm: true }]);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].message.contains("pdt hint 0x0"));
    }

    #[test]
    fn missing_page_passes_io_error_through() {
        let mut fetcher = MemoryFetcher::new();
        let err = decode_page(&mut fetcher, &PageRequest::new(0x80), DecodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "io");
    }
}

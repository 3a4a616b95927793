use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::dispatch::{DecodeError, DecodeOptions, Dispatcher, PageRequest};
use crate::source::{CaptureFetcher, FetchError, PageFetcher};
use crate::{DEFAULT_GENERATED_AT, InputInfo, PageFailure, Report, make_stub_report};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture error: {0}")]
    Fetch(#[from] FetchError),
}

/// Decodes the requested pages of a capture directory or response file.
pub fn decode_capture(
    path: &Path,
    requests: &[PageRequest],
    options: DecodeOptions,
) -> Result<Report, SessionError> {
    let mut fetcher = CaptureFetcher::open(path)?;
    let input = InputInfo {
        path: path.display().to_string(),
        bytes: fetcher.total_bytes()?,
    };
    let mut report = decode_source(input, &mut fetcher, &Dispatcher::new(), requests, options);
    report.generated_at = modified_rfc3339(path).unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    Ok(report)
}

/// Decodes each request in order; a failing page never stops the others.
///
/// Malformed pages contribute their partial report to `pages` and a
/// [`PageFailure`] to `failures`.
pub fn decode_source<F>(
    input: InputInfo,
    fetcher: &mut F,
    dispatcher: &Dispatcher,
    requests: &[PageRequest],
    options: DecodeOptions,
) -> Report
where
    F: PageFetcher + ?Sized,
{
    let mut report = make_stub_report(&input.path, input.bytes);
    for request in requests {
        match dispatcher.decode_page(fetcher, request, options) {
            Ok(page) => report.pages.push(page),
            Err(err) => {
                tracing::debug!(page_code = request.page_code, error = %err, "page failed");
                report.failures.push(PageFailure {
                    page_code: request.page_code,
                    subvalue: request.subvalue,
                    kind: err.kind().to_string(),
                    message: err.to_string(),
                });
                if let DecodeError::Malformed {
                    partial: Some(partial), ..
                } = err
                {
                    report.pages.push(*partial);
                }
            }
        }
    }
    report
}

fn modified_rfc3339(path: &Path) -> Option<String> {
    let modified = path.metadata().ok()?.modified().ok()?;
    OffsetDateTime::from(modified).format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFetcher;

    #[test]
    fn failures_do_not_stop_later_pages() {
        let mut fetcher = MemoryFetcher::new()
            .with_page(0x80, vec![0, 0x80, 0, 2, b'O', b'K'])
            .with_page(0x83, vec![0, 0x83, 0, 6, 0x01, 0x03, 0x00, 0x20, 0x50, 0x00]);
        let requests = [PageRequest::new(0x83), PageRequest::new(0x89), PageRequest::new(0x80)];
        let input = InputInfo {
            path: "memory".to_string(),
            bytes: 0,
        };
        let report = decode_source(
            input,
            &mut fetcher,
            &Dispatcher::new(),
            &requests,
            DecodeOptions::default(),
        );

        let kinds: Vec<_> = report.failures.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, vec!["malformed", "io"]);
        let codes: Vec<_> = report.pages.iter().map(|p| p.page_code).collect();
        assert_eq!(codes, vec![0x83, 0x80]);
        assert_eq!(report.generated_at, DEFAULT_GENERATED_AT);
    }
}

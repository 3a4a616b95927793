use super::{DecodeError, DecodeOptions, PageHandler, PageRequest};
use crate::pages::{self, PageError, VpdPage};
use crate::sink::RecordSink;
use crate::{PageReport, Record};

const RAW_NOTE: &str = "Only hex output supported";

/// Decoders for the standard pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPages;

impl PageHandler for StandardPages {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn decode(
        &self,
        page: &VpdPage,
        request: &PageRequest,
        options: DecodeOptions,
    ) -> Result<PageReport, DecodeError> {
        let Some(kind) = page.kind() else {
            return Err(DecodeError::Unsupported {
                page_code: page.page_code(),
                handler: self.name(),
            });
        };
        tracing::debug!(page_code = page.page_code(), ?kind, "standard decoder selected");
        let mut sink = RecordSink::new();
        let result = pages::decode_standard(
            page,
            kind,
            request.subvalue.unwrap_or_default(),
            options.quiet,
            &mut sink,
        );
        finish_page(page, request, self.name(), kind.title(), sink, result)
    }
}

/// Last resort: the whole response as hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPages;

impl PageHandler for RawPages {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn decode(
        &self,
        page: &VpdPage,
        request: &PageRequest,
        _options: DecodeOptions,
    ) -> Result<PageReport, DecodeError> {
        let mut title = format!("VPD page code=0x{:02x}", page.page_code());
        if let Some(subvalue) = request.subvalue {
            title.push_str(&format!(", subvalue=0x{subvalue:02x}"));
        }
        let mut sink = RecordSink::new();
        sink.push(Record::Hex {
            label: Some(RAW_NOTE.to_string()),
            bytes: page.response().to_vec(),
        });
        finish_page(page, request, self.name(), title, sink, Ok(()))
    }
}

/// Turns a handler's sink into its report.
///
/// When `result` is an error the report becomes the partial output of
/// [`DecodeError::Malformed`].
pub fn finish_page(
    page: &VpdPage,
    request: &PageRequest,
    decoder: &str,
    title: String,
    sink: RecordSink,
    result: Result<(), PageError>,
) -> Result<PageReport, DecodeError> {
    let (records, diagnostics) = sink.into_parts();
    let acronym = pages::lookup(page.page_code(), request.subvalue, Some(page.peripheral_device_type()))
        .map(|entry| entry.acronym.to_string());
    let report = PageReport {
        page_code: page.page_code(),
        subvalue: request.subvalue,
        title,
        acronym,
        decoder: decoder.to_string(),
        peripheral_qualifier: page.peripheral_qualifier(),
        peripheral_device_type: page.peripheral_device_type(),
        declared_length: page.declared_length(),
        raw: page.response().to_vec(),
        records,
        diagnostics,
    };
    match result {
        Ok(()) => Ok(report),
        Err(source) => {
            tracing::warn!(page_code = page.page_code(), error = %source, "page decode aborted");
            Err(DecodeError::Malformed {
                page_code: page.page_code(),
                source,
                partial: Some(Box::new(report)),
            })
        }
    }
}

use crate::{Diagnostic, Record};

/// Collects records and diagnostics while one page is decoded.
///
/// A sink is created per page decode and never shared, so the output of a
/// page that aborts part-way still holds everything decoded before the fault.
/// Vendor page handlers fill one the same way the standard decoders do.
#[derive(Debug, Default)]
pub struct RecordSink {
    records: Vec<Record>,
    diagnostics: Vec<Diagnostic>,
}

impl RecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: impl Into<Record>) {
        self.records.push(record.into());
    }

    /// Record a non-fatal anomaly and emit it as a `tracing` warning.
    pub fn warn(&mut self, offset: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(offset = ?offset, "{message}");
        self.diagnostics.push(Diagnostic { offset, message });
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_parts(self) -> (Vec<Record>, Vec<Diagnostic>) {
        (self.records, self.diagnostics)
    }
}

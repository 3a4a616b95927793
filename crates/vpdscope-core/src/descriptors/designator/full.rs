use serde::{Deserialize, Serialize};

use super::error::DesignatorError;
use super::iter::{DescriptorFilter, DescriptorIter};
use super::parser::{Designator, decode_designator};
use crate::Record;
use crate::codes::{Association, CodeSet, DesignatorType, ProtocolId};
use crate::sink::RecordSink;

/// One designator with the header fields the full listing shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignatorRecord {
    pub offset: usize,
    pub association: Association,
    pub designator_type: DesignatorType,
    pub code_set: CodeSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<ProtocolId>,
    pub designator: Designator,
}

/// Section headings emitted while listing designators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading<'h> {
    /// No headings; the caller already emitted one.
    None,
    /// One heading, emitted before the first match only.
    Once(&'h str),
    /// Each designator is preceded by its association name.
    PerAssociation,
}

/// Lists every designator in `buf` matching `filter`, in buffer order.
///
/// Returns how many designators were emitted. A descriptor that overruns the
/// buffer stops the walk; records pushed before it stay in `sink`.
pub(crate) fn decode_full(
    buf: &[u8],
    filter: DescriptorFilter,
    heading: Heading<'_>,
    sink: &mut RecordSink,
) -> Result<usize, DesignatorError> {
    let mut emitted = 0;
    for desc in DescriptorIter::new(buf, filter) {
        let desc = desc?;
        match heading {
            Heading::Once(title) if emitted == 0 => sink.push(Record::Section {
                title: title.to_string(),
            }),
            Heading::PerAssociation => sink.push(Record::Section {
                title: desc.association.name().to_string(),
            }),
            _ => {}
        }

        let designator = decode_designator(&desc);
        if let Some(problem) = designator.problem() {
            sink.warn(Some(desc.offset), problem.to_string());
        }
        sink.push(DesignatorRecord {
            offset: desc.offset,
            association: desc.association,
            designator_type: desc.designator_type,
            code_set: desc.code_set,
            transport: desc.transport(),
            designator,
        });
        emitted += 1;
    }
    Ok(emitted)
}

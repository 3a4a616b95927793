//! Device identification page (0x83) and the association selection policy.

use super::error::PageError;
use super::header::VpdPage;
use super::layout;
use crate::codes::Association;
use crate::descriptors::designator::abridged::decode_abridged;
use crate::descriptors::designator::full::decode_full;
use crate::descriptors::designator::{DescriptorFilter, DesignatorError, Heading};
use crate::sink::RecordSink;

/// Which associations are listed, and how, as selected by the subvalue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceIdSelection {
    /// Logical unit, then target port, then target device.
    AllInTurn,
    /// No association filter; designators in buffer order.
    AsIs,
    /// Bit mask over [`Association::selection_bit`].
    Mask(u8),
}

impl DeviceIdSelection {
    pub fn from_subvalue(subvalue: u8) -> Self {
        match subvalue {
            layout::DI_SELECT_ALL => DeviceIdSelection::AllInTurn,
            layout::DI_SELECT_AS_IS => DeviceIdSelection::AsIs,
            mask => DeviceIdSelection::Mask(mask),
        }
    }

    /// Associations walked one pass each; empty for [`DeviceIdSelection::AsIs`].
    pub fn associations(self) -> Vec<Association> {
        match self {
            DeviceIdSelection::AllInTurn => Association::ALL.to_vec(),
            DeviceIdSelection::AsIs => Vec::new(),
            DeviceIdSelection::Mask(mask) => Association::ALL
                .into_iter()
                .filter(|a| mask & a.selection_bit() != 0)
                .collect(),
        }
    }
}

pub(crate) fn decode_device_identification(
    page: &VpdPage,
    selection: DeviceIdSelection,
    abridged: bool,
    sink: &mut RecordSink,
) -> Result<(), PageError> {
    let body = page.body();
    if selection == DeviceIdSelection::AsIs {
        list_designators(body, DescriptorFilter::any(), Heading::PerAssociation, abridged, sink)?;
        return Ok(());
    }
    for association in selection.associations() {
        list_designators(
            body,
            DescriptorFilter::association(association),
            Heading::Once(association.name()),
            abridged,
            sink,
        )?;
    }
    Ok(())
}

/// One pass over a designator list in the selected listing mode.
pub(crate) fn list_designators(
    buf: &[u8],
    filter: DescriptorFilter,
    heading: Heading<'_>,
    abridged: bool,
    sink: &mut RecordSink,
) -> Result<(), DesignatorError> {
    if abridged {
        decode_abridged(buf, filter, sink)
    } else {
        decode_full(buf, filter, heading, sink).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use crate::descriptors::designator::DesignatorRecord;

    fn page(body: &[u8]) -> VpdPage {
        let mut response = vec![0, 0x83, 0, body.len() as u8];
        response.extend_from_slice(body);
        VpdPage::from_response(0x83, response).unwrap()
    }

    fn mixed_body() -> Vec<u8> {
        vec![
            0x61, 0x94, 0x00, 0x04, 0x00, 0x00, 0x00, 0x02, // target port RTP
            0x01, 0x03, 0x00, 0x08, 0x60, 0x00, 0xc5, 0x00, 0, 0, 0, 1, // LU NAA-6 (short)
            0x53, 0xa8, 0x00, 0x04, b'n', b'a', b'm', b'e', // target device name
        ]
    }

    fn titles_and_offsets(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| match r {
                Record::Section { title } => title.clone(),
                Record::Designator(DesignatorRecord { offset, .. }) => offset.to_string(),
                other => panic!("unexpected record: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn selection_from_subvalue() {
        assert_eq!(DeviceIdSelection::from_subvalue(0), DeviceIdSelection::AllInTurn);
        assert_eq!(DeviceIdSelection::from_subvalue(0x20), DeviceIdSelection::AsIs);
        assert_eq!(
            DeviceIdSelection::from_subvalue(0x05).associations(),
            vec![Association::LogicalUnit, Association::TargetDevice]
        );
        assert!(DeviceIdSelection::AsIs.associations().is_empty());
    }

    #[test]
    fn all_in_turn_groups_by_association() {
        let mut sink = RecordSink::new();
        decode_device_identification(&page(&mixed_body()), DeviceIdSelection::AllInTurn, false, &mut sink)
            .unwrap();
        assert_eq!(
            titles_and_offsets(sink.records()),
            vec![
                "Addressed logical unit",
                "8",
                "Target port",
                "0",
                "Target device that contains addressed lu",
                "20"
            ]
        );
    }

    #[test]
    fn as_is_keeps_buffer_order() {
        let mut sink = RecordSink::new();
        decode_device_identification(&page(&mixed_body()), DeviceIdSelection::AsIs, false, &mut sink).unwrap();
        assert_eq!(
            titles_and_offsets(sink.records()),
            vec![
                "Target port",
                "0",
                "Addressed logical unit",
                "8",
                "Target device that contains addressed lu",
                "20"
            ]
        );
    }

    #[test]
    fn mask_skips_unselected_associations_without_headings() {
        let mut sink = RecordSink::new();
        decode_device_identification(&page(&mixed_body()), DeviceIdSelection::Mask(0x02), false, &mut sink)
            .unwrap();
        assert_eq!(titles_and_offsets(sink.records()), vec!["Target port", "0"]);

        let mut sink = RecordSink::new();
        let full = mixed_body();
        let body = &full[8..20];
        decode_device_identification(&page(body), DeviceIdSelection::Mask(0x04), false, &mut sink).unwrap();
        assert!(sink.records().is_empty());
    }

    #[test]
    fn overrun_aborts_after_earlier_passes() {
        let mut body = mixed_body();
        body.extend_from_slice(&[0x01, 0x03, 0x00, 0x20, 0x50]);
        let mut sink = RecordSink::new();
        let err = decode_device_identification(&page(&body), DeviceIdSelection::AllInTurn, false, &mut sink)
            .unwrap_err();
        assert!(matches!(
            err,
            PageError::Designator(DesignatorError::Overrun { offset: 28, .. })
        ));
        assert_eq!(titles_and_offsets(sink.records()), vec!["Addressed logical unit", "8"]);
    }
}

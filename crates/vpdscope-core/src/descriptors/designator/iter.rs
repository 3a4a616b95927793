use super::error::DesignatorError;
use super::parser::{Descriptor, parse_descriptor};
use crate::codes::{Association, CodeSet, DesignatorType};

/// Optional association, type and code set constraints; `None` matches anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptorFilter {
    pub association: Option<Association>,
    pub designator_type: Option<DesignatorType>,
    pub code_set: Option<CodeSet>,
}

impl DescriptorFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn association(association: Association) -> Self {
        Self {
            association: Some(association),
            ..Self::default()
        }
    }

    pub fn matches(&self, desc: &Descriptor<'_>) -> bool {
        self.association.is_none_or(|a| a == desc.association)
            && self
                .designator_type
                .is_none_or(|t| t == desc.designator_type)
            && self.code_set.is_none_or(|c| c == desc.code_set)
    }
}

/// Outcome of one [`next_descriptor`] step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterStep<'a> {
    Found(Descriptor<'a>),
    Exhausted,
    Malformed(DesignatorError),
}

/// Finds the first descriptor at or after `cursor` that satisfies `filter`.
///
/// `None` starts before the first descriptor. Callers resume with the
/// previous hit's `offset + total_len()`. Descriptors that fail the filter are
/// stepped over, but each one is still bounds-checked; a descriptor that does
/// not fit in `buf` ends the walk with [`IterStep::Malformed`].
///
/// # Examples
/// ```
/// use vpdscope_core::descriptors::designator::{DescriptorFilter, IterStep, next_descriptor};
///
/// let buf = [0x01, 0x03, 0x00, 0x02, 0xaa, 0xbb];
/// let IterStep::Found(desc) = next_descriptor(&buf, None, DescriptorFilter::any()) else {
///     panic!("expected a descriptor");
/// };
/// assert_eq!(desc.designator, &[0xaa, 0xbb]);
/// let next = Some(desc.offset + desc.total_len());
/// assert_eq!(next_descriptor(&buf, next, DescriptorFilter::any()), IterStep::Exhausted);
/// ```
pub fn next_descriptor(buf: &[u8], cursor: Option<usize>, filter: DescriptorFilter) -> IterStep<'_> {
    let mut offset = cursor.unwrap_or(0);
    loop {
        if offset >= buf.len() {
            return IterStep::Exhausted;
        }
        let desc = match parse_descriptor(buf, offset) {
            Ok(desc) => desc,
            Err(err) => return IterStep::Malformed(err),
        };
        if filter.matches(&desc) {
            return IterStep::Found(desc);
        }
        offset += desc.total_len();
    }
}

/// Iterator over matching descriptors; yields one error and then stops.
#[derive(Debug, Clone)]
pub struct DescriptorIter<'a> {
    buf: &'a [u8],
    cursor: Option<usize>,
    filter: DescriptorFilter,
    done: bool,
}

impl<'a> DescriptorIter<'a> {
    pub fn new(buf: &'a [u8], filter: DescriptorFilter) -> Self {
        Self {
            buf,
            cursor: None,
            filter,
            done: false,
        }
    }
}

impl<'a> Iterator for DescriptorIter<'a> {
    type Item = Result<Descriptor<'a>, DesignatorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match next_descriptor(self.buf, self.cursor, self.filter) {
            IterStep::Found(desc) => {
                self.cursor = Some(desc.offset + desc.total_len());
                Some(Ok(desc))
            }
            IterStep::Exhausted => {
                self.done = true;
                None
            }
            IterStep::Malformed(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for DescriptorIter<'_> {}

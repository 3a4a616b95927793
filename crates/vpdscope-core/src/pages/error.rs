use thiserror::Error;

use crate::descriptors::designator::DesignatorError;

/// Structural faults that abort one page's decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error(
        "invalid VPD response; probably a STANDARD INQUIRY response (page code 0x{actual:02x}, expected 0x{expected:02x})"
    )]
    EchoMismatch {
        expected: u8,
        actual: u8,
        /// Leading bytes of the rejected response.
        head: Vec<u8>,
    },
    #[error("response length too long: {length} > {max}")]
    TooLong { length: usize, max: usize },
    #[error("response truncated: page declares {declared} bytes, got {actual}")]
    Truncated { declared: usize, actual: usize },
    #[error("{page} VPD page, short descriptor length={needed}, left={left}")]
    ShortDescriptor {
        page: &'static str,
        needed: usize,
        left: usize,
    },
    #[error("VPD page error: {0}")]
    Designator(#[from] DesignatorError),
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors while walking identification descriptors.
///
/// Only structural faults live here: a descriptor that does not fit in the
/// remaining buffer aborts the page. Prerequisite violations of a single
/// designator are reported as [`DesignatorProblem`] instead.
///
/// # Examples
/// ```
/// use vpdscope_core::DesignatorError;
///
/// let err = DesignatorError::Overrun { offset: 8, needed: 24, remaining: 10 };
/// assert!(err.to_string().contains("offset 8"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesignatorError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error(
        "designator at offset {offset} longer than remaining response: needs {needed} bytes, {remaining} remain"
    )]
    Overrun {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
}

/// Why a designator was degraded to its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum DesignatorProblem {
    #[error("empty designator")]
    Empty,
    #[error("expect 8, 12 and 16 byte EUI, got {length}")]
    Eui64Length { length: usize },
    #[error("expected binary code_set")]
    Eui64CodeSet,
    #[error("unexpected code set {code_set} for NAA")]
    NaaCodeSet { code_set: u8 },
    #[error("unexpected NAA [0x{naa:x}]")]
    UnknownNaa { naa: u8 },
    #[error("unexpected NAA {naa} identifier length: 0x{length:x}")]
    NaaLength { naa: u8, length: usize },
    #[error("expected binary code_set, target port association, length 4")]
    TargetPortPrerequisite,
    #[error("expected binary code_set, logical unit association, length 4")]
    LogicalUnitGroupPrerequisite,
    #[error("expected binary code_set, logical unit association")]
    Md5Prerequisite,
    #[error("expected UTF-8 code_set")]
    ScsiNameCodeSet,
}

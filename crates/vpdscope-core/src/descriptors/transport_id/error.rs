use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportIdError {
    #[error("transport id too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}

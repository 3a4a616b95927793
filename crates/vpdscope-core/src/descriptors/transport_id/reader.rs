use super::error::TransportIdError;
use super::layout;

/// Bounds-checked access to one TransportID record.
pub struct TransportIdReader<'a> {
    record: &'a [u8],
}

impl<'a> TransportIdReader<'a> {
    pub fn new(record: &'a [u8]) -> Self {
        Self { record }
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, TransportIdError> {
        self.record
            .get(offset)
            .copied()
            .ok_or(TransportIdError::TooShort {
                needed: offset + 1,
                actual: self.record.len(),
            })
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, TransportIdError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(TransportIdError::TooShort {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u64_be(&self, range: std::ops::Range<usize>) -> Result<u64, TransportIdError> {
        let bytes = self.read_slice(range)?;
        let array: [u8; 8] = bytes.try_into().map_err(|_| TransportIdError::TooShort {
            needed: 8,
            actual: bytes.len(),
        })?;
        Ok(u64::from_be_bytes(array))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], TransportIdError> {
        self.record
            .get(range.clone())
            .ok_or(TransportIdError::TooShort {
                needed: range.end,
                actual: self.record.len(),
            })
    }

    /// Up to the first `len` bytes, clipped to what the record holds.
    pub fn read_prefix(&self, len: usize) -> &'a [u8] {
        &self.record[..len.min(self.record.len())]
    }

    /// Format code (bits 7..6) and protocol identifier (bits 3..0) of byte 0.
    pub fn read_header(&self) -> Result<(u8, u8), TransportIdError> {
        let byte0 = self.read_u8(layout::HEADER_OFFSET)?;
        Ok((
            (byte0 >> layout::FORMAT_CODE_SHIFT) & layout::FORMAT_CODE_MASK,
            byte0 & layout::PROTOCOL_ID_MASK,
        ))
    }
}

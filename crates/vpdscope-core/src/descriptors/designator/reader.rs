use super::error::DesignatorError;

/// Bounds-checked access to a descriptor list or a single designator payload.
pub struct DesignatorReader<'a> {
    payload: &'a [u8],
}

impl<'a> DesignatorReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DesignatorError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(DesignatorError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, DesignatorError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(DesignatorError::TooShort {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Big-endian unsigned value of up to eight bytes.
    pub fn read_be_uint(&self, range: std::ops::Range<usize>) -> Result<u64, DesignatorError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() > 8 {
            return Err(DesignatorError::TooShort {
                needed: 8,
                actual: bytes.len(),
            });
        }
        Ok(bytes
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], DesignatorError> {
        self.payload
            .get(range.clone())
            .ok_or(DesignatorError::TooShort {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    pub fn read_nibble_high(&self, offset: usize) -> Result<u8, DesignatorError> {
        Ok(self.read_u8(offset)? >> super::layout::NAA_SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::DesignatorReader;
    use crate::descriptors::designator::error::DesignatorError;

    #[test]
    fn read_be_uint_folds_bytes() {
        let payload = [0x01, 0x02, 0x03, 0x04, 0x05];
        let reader = DesignatorReader::new(&payload);
        assert_eq!(reader.read_be_uint(0..5).unwrap(), 0x01_0203_0405);
        assert_eq!(reader.read_u16_be(3..5).unwrap(), 0x0405);
    }

    #[test]
    fn nibble_high_is_the_naa_field() {
        let reader = DesignatorReader::new(&[0x6a, 0x5f]);
        assert_eq!(reader.read_nibble_high(0).unwrap(), 6);
        assert_eq!(reader.read_nibble_high(1).unwrap(), 5);
    }

    #[test]
    fn reads_past_end_are_errors() {
        let payload = [0u8; 3];
        let reader = DesignatorReader::new(&payload);
        let err = reader.read_slice(1..4).unwrap_err();
        assert_eq!(err, DesignatorError::TooShort { needed: 4, actual: 3 });
        assert!(reader.read_u8(3).is_err());
    }
}

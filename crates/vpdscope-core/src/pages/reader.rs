use super::error::PageError;
use crate::hex::text_until_nul;

/// Bounds-checked access to a VPD response or a slice of one.
pub struct PageReader<'a> {
    response: &'a [u8],
}

impl<'a> PageReader<'a> {
    pub fn new(response: &'a [u8]) -> Self {
        Self { response }
    }

    pub fn len(&self) -> usize {
        self.response.len()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), PageError> {
        if self.response.len() < needed {
            return Err(PageError::TooShort {
                needed,
                actual: self.response.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, PageError> {
        self.response
            .get(offset)
            .copied()
            .ok_or(PageError::TooShort {
                needed: offset + 1,
                actual: self.response.len(),
            })
    }

    pub fn read_flag(&self, offset: usize, mask: u8) -> Result<bool, PageError> {
        Ok(self.read_u8(offset)? & mask != 0)
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, PageError> {
        let bytes = self.read_slice(range)?;
        let array: [u8; 2] = bytes.try_into().map_err(|_| PageError::TooShort {
            needed: 2,
            actual: bytes.len(),
        })?;
        Ok(u16::from_be_bytes(array))
    }

    pub fn read_u32_be(&self, range: std::ops::Range<usize>) -> Result<u32, PageError> {
        let bytes = self.read_slice(range)?;
        let array: [u8; 4] = bytes.try_into().map_err(|_| PageError::TooShort {
            needed: 4,
            actual: bytes.len(),
        })?;
        Ok(u32::from_be_bytes(array))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], PageError> {
        self.response
            .get(range.clone())
            .ok_or(PageError::TooShort {
                needed: range.end,
                actual: self.response.len(),
            })
    }

    /// Bytes from `offset` to the end of the response.
    pub fn read_tail(&self, offset: usize) -> Result<&'a [u8], PageError> {
        self.read_slice(offset..self.response.len().max(offset))
    }

    pub fn read_text(&self, range: std::ops::Range<usize>) -> Result<String, PageError> {
        Ok(text_until_nul(self.read_slice(range)?))
    }

    /// Size of the descriptor at `offset`: `header_len` plus the u16 length
    /// stored at `length_range` (relative to the descriptor). Fails when the
    /// header or the whole descriptor does not fit in what is left.
    pub fn descriptor_len(
        &self,
        offset: usize,
        header_len: usize,
        length_range: std::ops::Range<usize>,
        page: &'static str,
    ) -> Result<usize, PageError> {
        let left = self.response.len().saturating_sub(offset);
        let short = |needed| PageError::ShortDescriptor { page, needed, left };
        if left < header_len {
            return Err(short(header_len));
        }
        let length = self.read_u16_be(offset + length_range.start..offset + length_range.end)?;
        let needed = header_len + usize::from(length);
        if needed > left {
            return Err(short(needed));
        }
        Ok(needed)
    }
}

#[cfg(test)]
mod tests {
    use super::PageReader;
    use crate::pages::error::PageError;

    #[test]
    fn reads_big_endian_fields() {
        let response = [0, 0xb0, 0, 4, 0x12, 0x34, 0x56, 0x78];
        let reader = PageReader::new(&response);
        assert_eq!(reader.read_u16_be(2..4).unwrap(), 4);
        assert_eq!(reader.read_u32_be(4..8).unwrap(), 0x1234_5678);
        assert_eq!(reader.read_tail(4).unwrap(), &[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn descriptor_len_checks_header_and_body() {
        let body = [0x00, 0x00, 0x00, 0x02, 0xaa, 0xbb, 0x00, 0x00, 0x00, 0x09];
        let reader = PageReader::new(&body);
        assert_eq!(reader.descriptor_len(0, 4, 2..4, "Test").unwrap(), 6);
        assert_eq!(
            reader.descriptor_len(6, 4, 2..4, "Test").unwrap_err(),
            PageError::ShortDescriptor {
                page: "Test",
                needed: 13,
                left: 4
            }
        );
        assert_eq!(
            reader.descriptor_len(8, 4, 2..4, "Test").unwrap_err(),
            PageError::ShortDescriptor {
                page: "Test",
                needed: 4,
                left: 2
            }
        );
    }

    #[test]
    fn tail_past_end_is_error() {
        let response = [0u8; 4];
        let reader = PageReader::new(&response);
        assert_eq!(reader.read_tail(4).unwrap(), &[] as &[u8]);
        assert_eq!(
            reader.read_tail(6).unwrap_err(),
            PageError::TooShort { needed: 6, actual: 4 }
        );
    }
}

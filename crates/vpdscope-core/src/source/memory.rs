use std::collections::HashMap;

use super::{FetchError, PageFetcher, honour_alloc_len};

/// Responses held in memory, keyed by page code.
///
/// Every request is recorded so callers can check the allocation lengths
/// that were asked for.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    pages: HashMap<u8, Vec<u8>>,
    requests: Vec<(u8, u16)>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page_code: u8, response: Vec<u8>) -> Self {
        self.insert(page_code, response);
        self
    }

    pub fn insert(&mut self, page_code: u8, response: Vec<u8>) {
        self.pages.insert(page_code, response);
    }

    /// `(page_code, alloc_len)` of every fetch, in order.
    pub fn requests(&self) -> &[(u8, u16)] {
        &self.requests
    }
}

impl PageFetcher for MemoryFetcher {
    fn fetch_page(&mut self, page_code: u8, alloc_len: u16) -> Result<Vec<u8>, FetchError> {
        self.requests.push((page_code, alloc_len));
        let response = self
            .pages
            .get(&page_code)
            .cloned()
            .ok_or_else(|| FetchError::missing_page(page_code))?;
        Ok(honour_alloc_len(response, alloc_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_allocation_length() {
        let mut fetcher = MemoryFetcher::new().with_page(0x80, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(fetcher.fetch_page(0x80, 4).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(fetcher.fetch_page(0x80, 64).unwrap().len(), 6);
        assert_eq!(fetcher.requests(), &[(0x80, 4), (0x80, 64)]);
    }

    #[test]
    fn missing_page_is_not_found() {
        let mut fetcher = MemoryFetcher::new();
        let FetchError::Io(err) = fetcher.fetch_page(0x83, 252).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}

mod capture;
mod memory;

pub use capture::CaptureFetcher;
pub use memory::MemoryFetcher;

use thiserror::Error;

/// Answers INQUIRY requests for VPD pages.
///
/// A fetcher behaves like a device: it returns at most `alloc_len` bytes of
/// the page, so callers must re-fetch when the page declares more.
pub trait PageFetcher {
    fn fetch_page(&mut self, page_code: u8, alloc_len: u16) -> Result<Vec<u8>, FetchError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &mut F {
    fn fetch_page(&mut self, page_code: u8, alloc_len: u16) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_page(page_code, alloc_len)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    pub(crate) fn missing_page(page_code: u8) -> Self {
        FetchError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no response for VPD page 0x{page_code:02x}"),
        ))
    }
}

/// Cuts a stored response to what a device would return for `alloc_len`.
fn honour_alloc_len(mut response: Vec<u8>, alloc_len: u16) -> Vec<u8> {
    response.truncate(usize::from(alloc_len));
    response
}

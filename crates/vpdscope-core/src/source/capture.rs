use std::fs;
use std::path::{Path, PathBuf};

use super::{FetchError, PageFetcher, honour_alloc_len};

/// Captured VPD responses on disk.
///
/// A directory holds one raw response per page, named `vpd_XX.bin` with the
/// page code in lower-case hex. A single file answers every request.
#[derive(Debug)]
pub struct CaptureFetcher {
    inner: Capture,
}

#[derive(Debug)]
enum Capture {
    Directory(PathBuf),
    SingleFile(Vec<u8>),
}

impl CaptureFetcher {
    pub fn open(path: &Path) -> Result<Self, FetchError> {
        let inner = if fs::metadata(path)?.is_dir() {
            Capture::Directory(path.to_path_buf())
        } else {
            Capture::SingleFile(fs::read(path)?)
        };
        Ok(Self { inner })
    }

    /// File name of the response for `page_code` inside a capture directory.
    pub fn page_file_name(page_code: u8) -> String {
        format!("vpd_{page_code:02x}.bin")
    }

    /// Total size of the captured responses.
    pub fn total_bytes(&self) -> std::io::Result<u64> {
        match &self.inner {
            Capture::SingleFile(bytes) => Ok(bytes.len() as u64),
            Capture::Directory(dir) => {
                let mut total = 0;
                for entry in fs::read_dir(dir)? {
                    let entry = entry?;
                    let name = entry.file_name();
                    let is_page = name
                        .to_str()
                        .is_some_and(|name| name.starts_with("vpd_") && name.ends_with(".bin"));
                    if is_page {
                        total += entry.metadata()?.len();
                    }
                }
                Ok(total)
            }
        }
    }
}

impl PageFetcher for CaptureFetcher {
    fn fetch_page(&mut self, page_code: u8, alloc_len: u16) -> Result<Vec<u8>, FetchError> {
        let response = match &self.inner {
            Capture::SingleFile(bytes) => bytes.clone(),
            Capture::Directory(dir) => {
                let path = dir.join(Self::page_file_name(page_code));
                tracing::debug!(path = %path.display(), alloc_len, "reading captured response");
                fs::read(&path).map_err(|err| {
                    if err.kind() == std::io::ErrorKind::NotFound {
                        FetchError::missing_page(page_code)
                    } else {
                        FetchError::Io(err)
                    }
                })?
            }
        };
        Ok(honour_alloc_len(response, alloc_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_file_names_use_lower_case_hex() {
        assert_eq!(CaptureFetcher::page_file_name(0xb0), "vpd_b0.bin");
        assert_eq!(CaptureFetcher::page_file_name(0x00), "vpd_00.bin");
    }

    #[test]
    fn missing_capture_path_is_io_error() {
        let err = CaptureFetcher::open(Path::new("/nonexistent/vpdscope/capture")).unwrap_err();
        let FetchError::Io(err) = err;
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}

use super::error::PageError;
use super::kind::PageKind;
use super::layout;
use super::reader::PageReader;

/// The four byte header every VPD response starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub peripheral_qualifier: u8,
    pub peripheral_device_type: u8,
    pub page_code: u8,
    /// Page length field: bytes following the header.
    pub declared_length: usize,
}

impl ResponseHeader {
    pub fn parse(response: &[u8]) -> Result<Self, PageError> {
        let reader = PageReader::new(response);
        reader.require_len(layout::HEADER_LEN)?;
        let peripheral = reader.read_u8(layout::PERIPHERAL_OFFSET)?;
        Ok(Self {
            peripheral_qualifier: (peripheral >> layout::QUALIFIER_SHIFT) & layout::QUALIFIER_MASK,
            peripheral_device_type: peripheral & layout::PDT_MASK,
            page_code: reader.read_u8(layout::PAGE_CODE_OFFSET)?,
            declared_length: usize::from(reader.read_u16_be(layout::PAGE_LENGTH_RANGE)?),
        })
    }

    /// Header plus declared body.
    pub fn total_len(&self) -> usize {
        layout::HEADER_LEN + self.declared_length
    }

    /// Rejects a response whose page code is not the one requested.
    pub fn check_echo(&self, requested: u8, response: &[u8]) -> Result<(), PageError> {
        if self.page_code == requested {
            return Ok(());
        }
        let head = &response[..response.len().min(layout::BAD_RESPONSE_DUMP_LEN)];
        Err(PageError::EchoMismatch {
            expected: requested,
            actual: self.page_code,
            head: head.to_vec(),
        })
    }
}

/// A validated VPD response, owned by one decode call.
///
/// The response is cut to exactly header plus declared length, so every
/// decoder sees `body().len() == declared_length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpdPage {
    header: ResponseHeader,
    response: Vec<u8>,
}

impl VpdPage {
    /// Validates the echo, the hard size limit and the declared length.
    ///
    /// # Examples
    /// ```
    /// use vpdscope_core::VpdPage;
    ///
    /// let page = VpdPage::from_response(0x80, vec![0x00, 0x80, 0x00, 0x03, b'A', b'B', b'C', 0xff]).unwrap();
    /// assert_eq!(page.body(), b"ABC");
    /// assert_eq!(page.peripheral_device_type(), 0);
    /// ```
    pub fn from_response(requested: u8, mut response: Vec<u8>) -> Result<Self, PageError> {
        let header = ResponseHeader::parse(&response)?;
        header.check_echo(requested, &response)?;
        let total = header.total_len();
        if total > layout::MAX_RESPONSE_LEN {
            return Err(PageError::TooLong {
                length: total,
                max: layout::MAX_RESPONSE_LEN,
            });
        }
        if response.len() < total {
            return Err(PageError::Truncated {
                declared: total,
                actual: response.len(),
            });
        }
        response.truncate(total);
        Ok(Self { header, response })
    }

    pub fn page_code(&self) -> u8 {
        self.header.page_code
    }

    pub fn peripheral_qualifier(&self) -> u8 {
        self.header.peripheral_qualifier
    }

    pub fn peripheral_device_type(&self) -> u8 {
        self.header.peripheral_device_type
    }

    pub fn declared_length(&self) -> usize {
        self.header.declared_length
    }

    /// Full response including the header.
    pub fn response(&self) -> &[u8] {
        &self.response
    }

    pub fn body(&self) -> &[u8] {
        self.response.get(layout::HEADER_LEN..).unwrap_or_default()
    }

    /// Standard decoder for this page, selected by code and device type.
    pub fn kind(&self) -> Option<PageKind> {
        PageKind::resolve(self.page_code(), self.peripheral_device_type())
    }
}

//! Hex and text helpers shared by decoders, records and the renderer.

/// Bytes as contiguous lower-case hex, e.g. `5000c500`.
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        push_fmt!(out, "{:02x}", b);
    }
    out
}

/// Compact identifier form used for designators: `0x` followed by the bytes.
///
/// # Examples
/// ```
/// use vpdscope_core::compact_hex;
///
/// assert_eq!(compact_hex(&[0x50, 0x00, 0xc5]), "0x5000c5");
/// ```
pub fn compact_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex_string(bytes))
}

/// Parse contiguous hex text (as produced by [`hex_string`]).
pub fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| text.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

/// Offset-prefixed hex dump, 16 bytes per line, optionally with an ASCII column.
///
/// # Examples
/// ```
/// use vpdscope_core::hex_dump;
///
/// let dump = hex_dump(b"ABC", true);
/// assert!(dump.starts_with(" 00     41 42 43"));
/// assert!(dump.trim_end().ends_with("ABC"));
/// ```
pub fn hex_dump(bytes: &[u8], with_ascii: bool) -> String {
    const HEX_COLUMN_WIDTH: usize = 50;
    let mut out = String::new();
    for (line, chunk) in bytes.chunks(16).enumerate() {
        let mut hex = String::with_capacity(HEX_COLUMN_WIDTH);
        for (i, b) in chunk.iter().enumerate() {
            if i == 8 {
                hex.push(' ');
            }
            push_fmt!(hex, "{:02x} ", b);
        }
        push_fmt!(out, " {:02x}     ", line * 16);
        if with_ascii {
            let ascii: String = chunk
                .iter()
                .map(|&b| if (0x20..0x7f).contains(&b) { b as char } else { '.' })
                .collect();
            push_line!(out, "{:<width$}{}", hex, ascii, width = HEX_COLUMN_WIDTH);
        } else {
            push_line!(out, "{}", hex.trim_end());
        }
    }
    out
}

/// ASCII/UTF-8 text up to the first NUL, lossily decoded.
pub fn text_until_nul(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Serde adapter storing byte vectors as hex strings.
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S, T>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&super::hex_string(bytes.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_hex(&text).ok_or_else(|| D::Error::custom("invalid hex string"))
    }
}

/// Serde adapter for optional byte vectors stored as hex strings.
pub(crate) mod hex_bytes_opt {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(bytes) => serializer.serialize_some(&super::hex_string(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => super::parse_hex(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom("invalid hex string")),
            None => Ok(None),
        }
    }
}

//! Byte-level primitives shared by the header and transaction codecs.

use std::borrow::Cow;

use crate::error::ParseError;

/// Presentation of decoded identifiers and serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Raw bytes.
    Binary,
    /// Lowercase hex string of the raw bytes.
    #[default]
    Hex,
}

impl Encoding {
    pub fn encode(&self, bytes: &[u8]) -> Encoded {
        match self {
            Encoding::Binary => Encoded::Binary(bytes.to_vec()),
            Encoding::Hex => Encoded::Hex(hex::encode(bytes)),
        }
    }
}

/// A value presented in a chosen [`Encoding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Binary(Vec<u8>),
    Hex(String),
}

impl Encoded {
    /// Recover the underlying bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ParseError> {
        match self {
            Encoded::Binary(bytes) => Ok(bytes.clone()),
            Encoded::Hex(s) => Ok(hex::decode(s)?),
        }
    }
}

/// Untrusted input as handed over by a peer or storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInput<'a> {
    Binary(&'a [u8]),
    Hex(&'a str),
}

impl<'a> RawInput<'a> {
    /// The encoding the input arrived in.
    pub fn encoding(&self) -> Encoding {
        match self {
            RawInput::Binary(_) => Encoding::Binary,
            RawInput::Hex(_) => Encoding::Hex,
        }
    }

    /// Resolve the input to bytes, decoding hex if needed.
    pub fn to_bytes(&self) -> Result<Cow<'a, [u8]>, ParseError> {
        match *self {
            RawInput::Binary(bytes) => Ok(Cow::Borrowed(bytes)),
            RawInput::Hex(s) => Ok(Cow::Owned(hex::decode(s.trim())?)),
        }
    }
}

impl<'a> From<&'a [u8]> for RawInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        RawInput::Binary(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for RawInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        RawInput::Binary(bytes)
    }
}

impl<'a> From<&'a str> for RawInput<'a> {
    fn from(s: &'a str) -> Self {
        RawInput::Hex(s)
    }
}

/// Bounds-checked little-endian cursor over a byte slice.
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Look at the byte `ahead` positions past the cursor without consuming.
    pub fn peek(&self, ahead: usize) -> Option<u8> {
        self.data.get(self.offset + ahead).copied()
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ParseError> {
        if self.remaining() < len {
            return Err(ParseError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u32_le(&mut self) -> Result<u32, ParseError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32, ParseError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, ParseError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a Bitcoin CompactSize variable-length integer.
    pub fn read_varint(&mut self) -> Result<u64, ParseError> {
        match self.read_u8()? {
            0xfd => Ok(u16::from_le_bytes(self.read_array()?) as u64),
            0xfe => Ok(u32::from_le_bytes(self.read_array()?) as u64),
            0xff => self.read_u64_le(),
            n => Ok(n as u64),
        }
    }

    /// Read a varint length prefix followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], ParseError> {
        let len = self.read_varint()?;
        if len > self.remaining() as u64 {
            return Err(ParseError::Truncated {
                offset: self.offset,
                needed: len.min(usize::MAX as u64) as usize,
                available: self.remaining(),
            });
        }
        self.read_bytes(len as usize)
    }
}

/// Encode a variable-length integer (Bitcoin varint).
pub fn encode_varint(value: u64, output: &mut Vec<u8>) {
    if value < 0xfd {
        output.push(value as u8);
    } else if value <= 0xffff {
        output.push(0xfd);
        output.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffffffff {
        output.push(0xfe);
        output.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        output.push(0xff);
        output.extend_from_slice(&value.to_le_bytes());
    }
}

/// Encode a varint length prefix followed by `bytes`.
pub fn encode_var_bytes(bytes: &[u8], output: &mut Vec<u8>) {
    encode_varint(bytes.len() as u64, output);
    output.extend_from_slice(bytes);
}

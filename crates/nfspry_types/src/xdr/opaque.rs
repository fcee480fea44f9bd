use std::borrow::Cow;
use std::io::{Read, Write};

use crate::xdr::util::{padded, padding_len, zero_padding};
use crate::xdr::{Error, Pack, Result, Unpack};

/// Variable-length opaque data, length-prefixed on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque<'a>(pub Cow<'a, [u8]>);

impl Opaque<'static> {
    pub fn owned(data: Vec<u8>) -> Self {
        Opaque(Cow::Owned(data))
    }
}

impl<'a> Opaque<'a> {
    pub const fn borrowed(data: &'a [u8]) -> Self {
        Opaque(Cow::Borrowed(data))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extracts the owned data, cloning if it is borrowed.
    pub fn into_owned(self) -> Vec<u8> {
        self.0.into_owned()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl Pack for Opaque<'_> {
    fn packed_size(&self) -> usize {
        4 + padded(self.0.len())
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let len: u32 = self
            .0
            .len()
            .try_into()
            .map_err(|_| Error::ObjectTooLarge(self.0.len()))?;
        let mut written = len.pack(out)?;

        out.write_all(&self.0).map_err(Error::Io)?;
        written += self.0.len();

        let pad = zero_padding(self.0.len());
        out.write_all(pad).map_err(Error::Io)?;
        Ok(written + pad.len())
    }
}

impl Unpack for Opaque<'static> {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (len, mut read) = u32::unpack(input)?;
        let len = len as usize;

        let mut buf = vec![0u8; len];
        input.read_exact(&mut buf).map_err(Error::Io)?;
        read += len;

        let pad = padding_len(len);
        if pad > 0 {
            let mut pad_buf = [0u8; 4];
            input.read_exact(&mut pad_buf[..pad]).map_err(Error::Io)?;
            read += pad;
        }

        Ok((Opaque(Cow::Owned(buf)), read))
    }
}

impl AsRef<[u8]> for Opaque<'_> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<Vec<u8>> for Opaque<'static> {
    fn from(vec: Vec<u8>) -> Self {
        Opaque(Cow::Owned(vec))
    }
}

impl<'a> From<&'a [u8]> for Opaque<'a> {
    fn from(slice: &'a [u8]) -> Self {
        Opaque(Cow::Borrowed(slice))
    }
}

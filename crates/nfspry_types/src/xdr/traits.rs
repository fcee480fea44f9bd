use std::io::{Read, Write};

use crate::xdr::{Error, Result};

/// Serializes a value as XDR.
pub trait Pack {
    /// Size of the encoded value in bytes, padding included.
    fn packed_size(&self) -> usize;

    /// Writes the encoded value and returns the number of bytes written.
    fn pack(&self, out: &mut impl Write) -> Result<usize>;
}

/// Deserializes a value from XDR.
pub trait Unpack: Sized {
    /// Reads a value and returns it with the number of bytes consumed.
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)>;
}

impl Pack for u32 {
    fn packed_size(&self) -> usize {
        4
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        out.write_all(&self.to_be_bytes()).map_err(Error::Io)?;
        Ok(4)
    }
}

impl Unpack for u32 {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let mut buf = [0u8; 4];
        input.read_exact(&mut buf).map_err(Error::Io)?;
        Ok((Self::from_be_bytes(buf), 4))
    }
}

impl Pack for i32 {
    fn packed_size(&self) -> usize {
        4
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        out.write_all(&self.to_be_bytes()).map_err(Error::Io)?;
        Ok(4)
    }
}

impl Unpack for i32 {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let mut buf = [0u8; 4];
        input.read_exact(&mut buf).map_err(Error::Io)?;
        Ok((Self::from_be_bytes(buf), 4))
    }
}

impl Pack for u64 {
    fn packed_size(&self) -> usize {
        8
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        out.write_all(&self.to_be_bytes()).map_err(Error::Io)?;
        Ok(8)
    }
}

impl Unpack for u64 {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let mut buf = [0u8; 8];
        input.read_exact(&mut buf).map_err(Error::Io)?;
        Ok((Self::from_be_bytes(buf), 8))
    }
}

impl Pack for bool {
    fn packed_size(&self) -> usize {
        4
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        u32::from(*self).pack(out)
    }
}

impl Unpack for bool {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (value, read) = u32::unpack(input)?;
        match value {
            0 => Ok((false, read)),
            1 => Ok((true, read)),
            _ => Err(Error::InvalidEnumValue(value)),
        }
    }
}

// Variable-length array of u32, used for auth flavor and group lists.
impl Pack for Vec<u32> {
    fn packed_size(&self) -> usize {
        4 + self.len() * 4
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let mut written = u32::try_from(self.len())
            .map_err(|_| Error::ObjectTooLarge(self.len()))?
            .pack(out)?;
        for item in self {
            written += item.pack(out)?;
        }
        Ok(written)
    }
}

impl Unpack for Vec<u32> {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (len, mut read) = u32::unpack(input)?;
        let mut items = Self::with_capacity(len as usize);
        for _ in 0..len {
            let (item, n) = u32::unpack(input)?;
            read += n;
            items.push(item);
        }
        Ok((items, read))
    }
}

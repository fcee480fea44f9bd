use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// An error occurred while reading or writing data.
    Io(std::io::Error),

    /// An invalid value was encountered for an enum/bool type.
    InvalidEnumValue(u32),

    /// A length prefix exceeded the limit of its field.
    InvalidLength(usize),

    /// An object is too large to be packed.
    ObjectTooLarge(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::InvalidEnumValue(value) => write!(f, "invalid XDR enum value: {value}"),
            Self::InvalidLength(len) => write!(f, "invalid XDR length: {len}"),
            Self::ObjectTooLarge(len) => write!(f, "object too large to pack: {len} bytes"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

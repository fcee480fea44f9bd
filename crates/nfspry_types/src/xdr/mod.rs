//! XDR (RFC 1832) serialization primitives.

pub(crate) mod error;
pub(crate) mod list;
pub(crate) mod opaque;
pub(crate) mod traits;
pub(crate) mod util;
pub(crate) mod void;

/// Derive macro that implements [`Pack`] and [`Unpack`] traits.
pub use nfspry_macros::XdrCodec;

pub use self::error::Error;
pub use self::list::List;
pub use self::opaque::Opaque;
pub use self::traits::{Pack, Unpack};
pub use self::util::{pack_opaque_fixed, unpack_opaque_fixed};
pub use self::void::Void;

pub type Result<T> = std::result::Result<T, Error>;

//! Tokens: claim sets, expiry specs, keys, and the codec seam

pub mod claims;
pub mod codec;
pub mod duration;
pub mod keys;

pub use claims::{ClaimSet, RESERVED_CLAIMS};
pub use codec::{JwtCodec, TokenCodec};
pub use duration::{DEFAULT_EXPIRES_IN, ExpirySpec, parse_duration};
pub use keys::{Algorithm, KeyFamily, SigningKeys};

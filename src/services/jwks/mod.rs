//! JWKS (JSON Web Key Set) key resolution.
//!
//! - `KeySource`: where key sets come from (HTTP in production, in-memory in tests)
//! - `SigningKeyCache`: process-wide `kid` -> `DecodingKey` cache in front of a source

mod cache;
mod error;
mod source;

pub use cache::SigningKeyCache;
pub use error::KeyLookupError;
pub use source::{HttpKeySource, KeySource};

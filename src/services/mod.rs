pub mod gate;
pub mod jwks;

//! Non-interactive zero-knowledge glue.

pub mod chaum_pedersen;
pub mod schnorr;

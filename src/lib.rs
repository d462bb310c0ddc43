//! Pairing-based group signatures with user-chosen pseudonyms.
//!
//! A group issuer admits users via an interactive join protocol; admitted
//! users sign messages in a way that proves group membership and exposes a
//! pseudonym that is stable per (user, basename) but unlinkable across
//! basenames. Built on BN254 via `ark-ec`/`ark-bn254`.

pub mod codec;
pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod hash_to_curve;
pub mod join;
pub mod keys;
pub mod nizk;
pub mod pairing_check;
pub mod serde_support;
pub mod signature;
pub mod transcript;

pub use engine::Engine;
pub use error::GsError;

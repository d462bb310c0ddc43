//! State machine and API surface.
//!
//! Tracks the four operation preconditions as typed state instead of bit
//! flags: key state collapses into an exhaustive [`KeyState`] (a private
//! key always carries its own public key, so "have private" implies "have
//! public" becomes a single variant instead of two bits to keep in sync),
//! while seeded-ness and user credentials stay as their own `Option`
//! fields, since loading a key and loading user credentials clear and set
//! independently of each other.

use crate::codec::{Reader, Writer};
use crate::config::{hash_to_mb, MIN_SEED_LEN};
use crate::credentials::{self, UserPrivateKey, USER_CREDENTIALS_LEN, USER_PRIVATE_KEY_LEN};
use crate::error::GsError;
use crate::join::{self, JOIN_MESSAGE_LEN, JOIN_RESPONSE_LEN};
use crate::keys::{self, GroupPrivateKey, GroupPublicKey, GROUP_PRIVATE_KEY_LEN, GROUP_PUBLIC_KEY_LEN};
use crate::signature::{self, SIGNATURE_LEN, SIGNATURE_TAG_LEN};
use ark_std::rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const LOG_TARGET: &str = "group_sign::engine";

/// Curve name exposed via the API surface.
pub const CURVE_NAME: &str = crate::config::CURVE_NAME;
/// Crate version exposed via the API surface.
pub const VERSION: &str = crate::config::VERSION;

#[derive(Default)]
enum KeyState {
    #[default]
    None,
    PublicOnly(GroupPublicKey),
    Full(GroupPrivateKey),
}

impl KeyState {
    fn public(&self) -> Option<&GroupPublicKey> {
        match self {
            KeyState::None => None,
            KeyState::PublicOnly(pk) => Some(pk),
            KeyState::Full(sk) => Some(&sk.public),
        }
    }

    fn private(&self) -> Option<&GroupPrivateKey> {
        match self {
            KeyState::Full(sk) => Some(sk),
            _ => None,
        }
    }
}

/// The process-scoped engine: an owned CSPRNG plus zero or one of
/// {issuer private key, issuer public key} and independently zero or one
/// user credential set.
#[derive(Default)]
pub struct Engine {
    rng: Option<ChaCha20Rng>,
    keys: KeyState,
    user_credentials: Option<UserPrivateKey>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    fn rng_mut(&mut self) -> Result<&mut ChaCha20Rng, GsError> {
        self.rng.as_mut().ok_or(GsError::Precondition("engine is not seeded"))
    }

    /// Replaces RNG state entirely from a seed of at least 128 bytes;
    /// every other flag is left untouched.
    pub fn seed(&mut self, bytes: &[u8]) -> Result<(), GsError> {
        if bytes.len() < MIN_SEED_LEN {
            return Err(GsError::SeedTooSmall(bytes.len()));
        }
        self.rng = Some(ChaCha20Rng::from_seed(hash_to_mb(bytes)));
        tracing::debug!(target: LOG_TARGET, len = bytes.len(), "engine seeded");
        Ok(())
    }

    pub fn is_seeded(&self) -> bool {
        self.rng.is_some()
    }

    pub fn has_group_public_key(&self) -> bool {
        self.keys.public().is_some()
    }

    pub fn has_group_private_key(&self) -> bool {
        self.keys.private().is_some()
    }

    pub fn has_user_credentials(&self) -> bool {
        self.user_credentials.is_some()
    }

    /// Requires the engine to be seeded. Clears all key state and sets
    /// both the private and public key.
    pub fn setup_group(&mut self) -> Result<(), GsError> {
        let rng = self.rng_mut()?;
        let sk = keys::setup(rng);
        self.keys = KeyState::Full(sk);
        self.user_credentials = None;
        tracing::debug!(target: LOG_TARGET, "setup-group: key state -> Full");
        Ok(())
    }

    /// Validates on load. Clears all key/user state except seeded-ness,
    /// then sets both the private and public key.
    pub fn load_group_private_key(&mut self, bytes: &[u8]) -> Result<(), GsError> {
        let mut r = Reader::new(bytes);
        let sk = keys::read_private(&mut r)?;
        self.keys = KeyState::Full(sk);
        self.user_credentials = None;
        tracing::debug!(target: LOG_TARGET, "load-group-private: key state -> Full");
        Ok(())
    }

    /// Validates on load. Clears private-key/user state, sets the public
    /// key only.
    pub fn load_group_public_key(&mut self, bytes: &[u8]) -> Result<(), GsError> {
        let mut r = Reader::new(bytes);
        let pk = keys::read_public(&mut r)?;
        self.keys = KeyState::PublicOnly(pk);
        self.user_credentials = None;
        tracing::debug!(target: LOG_TARGET, "load-group-public: key state -> PublicOnly");
        Ok(())
    }

    /// Independent of key state. Clears then sets user credentials.
    pub fn load_user_credentials(&mut self, bytes: &[u8]) -> Result<(), GsError> {
        let mut r = Reader::new(bytes);
        let upk = credentials::read_private(&mut r)?;
        self.user_credentials = Some(upk);
        tracing::debug!(target: LOG_TARGET, "load-user-credentials: USERCREDS set");
        Ok(())
    }

    pub fn export_group_private_key(&self, out: &mut [u8]) -> Result<usize, GsError> {
        let sk = self
            .keys
            .private()
            .ok_or(GsError::Precondition("no group private key loaded"))?;
        let mut w = Writer::with_capacity(out.len());
        keys::write_private(&mut w, sk)?;
        let bytes = w.into_bytes();
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    pub fn export_group_public_key(&self, out: &mut [u8]) -> Result<usize, GsError> {
        let pk = self
            .keys
            .public()
            .ok_or(GsError::Precondition("no group public key loaded"))?;
        let mut w = Writer::with_capacity(out.len());
        keys::write_public(&mut w, pk)?;
        let bytes = w.into_bytes();
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    pub fn export_user_credentials(&self, out: &mut [u8]) -> Result<usize, GsError> {
        let upk = self
            .user_credentials
            .as_ref()
            .ok_or(GsError::Precondition("no user credentials loaded"))?;
        let mut w = Writer::with_capacity(out.len());
        credentials::write_private(&mut w, upk)?;
        let bytes = w.into_bytes();
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Requires the engine to be seeded. Returns the wire-encoded join
    /// message; the user's `gsk` is returned to the caller to retain for
    /// `finish_join`. The engine itself does not store it.
    pub fn start_join(&mut self, challenge: &[u8], out: &mut [u8]) -> Result<(usize, [u8; 32]), GsError> {
        let rng = self.rng_mut()?;
        let (gsk, jm) = join::start_join(rng, challenge);
        let mut w = Writer::with_capacity(out.len());
        join::write_join_message(&mut w, &jm)?;
        let bytes = w.into_bytes();
        out[..bytes.len()].copy_from_slice(&bytes);
        let mut gsk_bytes = [0u8; 32];
        let mut gw = Writer::with_capacity(32);
        crate::codec::write_scalar(&mut gw, &gsk)?;
        gsk_bytes.copy_from_slice(gw.as_slice());
        Ok((bytes.len(), gsk_bytes))
    }

    /// Requires the engine to be seeded and hold a group private key.
    pub fn process_join(
        &mut self,
        message_bytes: &[u8],
        challenge: &[u8],
        out: &mut [u8],
    ) -> Result<usize, GsError> {
        let mut mr = Reader::new(message_bytes);
        let message = join::read_join_message(&mut mr)?;
        let issuer = self
            .keys
            .private()
            .ok_or(GsError::Precondition("no group private key loaded"))?
            .clone();
        let rng = self.rng_mut()?;
        let response = join::process_join(rng, &issuer, &message, challenge)?;
        let mut w = Writer::with_capacity(out.len());
        join::write_join_response(&mut w, &response)?;
        let bytes = w.into_bytes();
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Uses only its explicit inputs (group public key, `gsk`, join
    /// response), not engine-loaded state; no flag effects. Output is a
    /// full `UserPrivateKey` record (credentials plus `gsk`), ready to
    /// hand straight to `load_user_credentials`.
    pub fn finish_join(
        public_key_bytes: &[u8],
        gsk_bytes: &[u8],
        response_bytes: &[u8],
        out: &mut [u8],
    ) -> Result<usize, GsError> {
        let mut pr = Reader::new(public_key_bytes);
        let public = keys::read_public(&mut pr)?;
        let mut gr = Reader::new(gsk_bytes);
        let gsk = crate::codec::read_scalar(&mut gr)?;
        let mut rr = Reader::new(response_bytes);
        let response = join::read_join_response(&mut rr)?;
        let credentials = join::finish_join(&public, &gsk, &response)?;
        let mut w = Writer::with_capacity(out.len());
        credentials::write_private(&mut w, &UserPrivateKey { credentials, gsk })?;
        let bytes = w.into_bytes();
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Requires the engine to be seeded and hold user credentials.
    pub fn sign(&mut self, msg: &[u8], bsn: &[u8], out: &mut [u8]) -> Result<usize, GsError> {
        let sk = self
            .user_credentials
            .as_ref()
            .ok_or(GsError::Precondition("no user credentials loaded"))?
            .clone();
        let rng = self.rng_mut()?;
        let sig = signature::sign(rng, &sk, msg, bsn);
        let mut w = Writer::with_capacity(out.len());
        signature::write_signature(&mut w, &sig)?;
        let bytes = w.into_bytes();
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Requires a loaded group public key. Uses the engine RNG if seeded,
    /// falling back to a fresh unseeded CSPRNG otherwise: verification's
    /// masks need only be unpredictable to a credential forger, not
    /// durable engine state.
    pub fn verify(&mut self, msg: &[u8], bsn: &[u8], sig_bytes: &[u8]) -> Result<bool, GsError> {
        let pk = self
            .keys
            .public()
            .ok_or(GsError::Precondition("no group public key loaded"))?
            .clone();
        let mut r = Reader::new(sig_bytes);
        let sig = signature::read_signature(&mut r)?;
        let result = match &mut self.rng {
            Some(rng) => signature::verify(rng, &pk, msg, bsn, &sig),
            None => signature::verify(&mut ChaCha20Rng::from_entropy(), &pk, msg, bsn, &sig),
        };
        tracing::debug!(target: LOG_TARGET, result, "verify completed");
        Ok(result)
    }

    pub fn signature_tag(sig_bytes: &[u8], out: &mut [u8]) -> Result<usize, GsError> {
        let mut r = Reader::new(sig_bytes);
        let sig = signature::read_signature(&mut r)?;
        let mut w = Writer::with_capacity(out.len());
        signature::write_tag(&mut w, &sig)?;
        let bytes = w.into_bytes();
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Wire record lengths, by name.
    pub fn state_size(record: &str) -> Option<usize> {
        Some(match record {
            "group_public_key" => GROUP_PUBLIC_KEY_LEN,
            "group_private_key" => GROUP_PRIVATE_KEY_LEN,
            "join_message" => JOIN_MESSAGE_LEN,
            "join_response" => JOIN_RESPONSE_LEN,
            "user_credentials" => USER_CREDENTIALS_LEN,
            "user_private_key" => USER_PRIVATE_KEY_LEN,
            "signature" => SIGNATURE_LEN,
            "signature_tag" => SIGNATURE_TAG_LEN,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Engine {
        let mut e = Engine::new();
        e.seed(&[1u8; 128]).unwrap();
        e
    }

    #[test]
    fn happy_path_end_to_end() {
        let mut issuer = seeded();
        issuer.setup_group().unwrap();
        let mut pk_buf = [0u8; GROUP_PUBLIC_KEY_LEN];
        let pk_len = issuer.export_group_public_key(&mut pk_buf).unwrap();
        let pk_bytes = &pk_buf[..pk_len];

        let mut user = seeded();
        user.load_group_public_key(pk_bytes).unwrap();

        let challenge = b"nonce-0123456789";
        let mut jm_buf = [0u8; JOIN_MESSAGE_LEN];
        let (jm_len, gsk_bytes) = user.start_join(challenge, &mut jm_buf).unwrap();

        let mut jr_buf = [0u8; JOIN_RESPONSE_LEN];
        let jr_len = issuer
            .process_join(&jm_buf[..jm_len], challenge, &mut jr_buf)
            .unwrap();

        let mut upk_buf = [0u8; USER_PRIVATE_KEY_LEN];
        let upk_len = Engine::finish_join(
            pk_bytes,
            &gsk_bytes,
            &jr_buf[..jr_len],
            &mut upk_buf,
        )
        .unwrap();
        user.load_user_credentials(&upk_buf[..upk_len]).unwrap();

        let mut sig_buf = [0u8; SIGNATURE_LEN];
        let sig_len = user.sign(b"hello", b"bsn1", &mut sig_buf).unwrap();

        let mut verifier = Engine::new();
        verifier.load_group_public_key(pk_bytes).unwrap();
        assert!(verifier
            .verify(b"hello", b"bsn1", &sig_buf[..sig_len])
            .unwrap());
    }

    #[test]
    fn seed_too_small_is_rejected() {
        let mut e = Engine::new();
        assert_eq!(e.seed(&[0u8; 127]), Err(GsError::SeedTooSmall(127)));
        assert!(!e.is_seeded());
    }

    #[test]
    fn sign_without_credentials_is_a_precondition_error() {
        let mut e = seeded();
        let mut buf = [0u8; SIGNATURE_LEN];
        assert!(matches!(
            e.sign(b"m", b"b", &mut buf),
            Err(GsError::Precondition(_))
        ));
    }

    #[test]
    fn tampered_public_key_is_rejected_on_load() {
        let mut issuer = seeded();
        issuer.setup_group().unwrap();
        let mut pk_buf = [0u8; GROUP_PUBLIC_KEY_LEN];
        let pk_len = issuer.export_group_public_key(&mut pk_buf).unwrap();
        pk_buf[0] ^= 0xFF;
        let mut user = Engine::new();
        assert_eq!(
            user.load_group_public_key(&pk_buf[..pk_len]),
            Err(GsError::InvalidGroupPublicKey)
        );
    }
}

//! User-held credential and secret types.

use crate::codec::{read_g1, read_scalar, write_g1, write_scalar, Reader, Writer};
use crate::config::{ScalarField, G1, MB};
use crate::error::GsError;
use zeroize::Zeroize;

/// Issuer-signed tuple tying a user's `gsk` to the group: `B = A^y`,
/// `D = Q^(r·y)`, `C = (A+D)^x`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserCredentials {
    #[serde(with = "crate::serde_support::point")]
    pub a: G1,
    #[serde(with = "crate::serde_support::point")]
    pub b: G1,
    #[serde(with = "crate::serde_support::point")]
    pub c: G1,
    #[serde(with = "crate::serde_support::point")]
    pub d: G1,
}

/// A user's persistent secret plus its issued credentials.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct UserPrivateKey {
    pub credentials: UserCredentials,
    #[serde(with = "crate::serde_support::field")]
    pub gsk: ScalarField,
}

impl Drop for UserPrivateKey {
    fn drop(&mut self) {
        self.gsk.zeroize();
    }
}

/// Wire width of [`UserCredentials`]: `4·(2·MB+1)` bytes.
pub const USER_CREDENTIALS_LEN: usize = 4 * (2 * MB + 1);
/// Wire width of [`UserPrivateKey`]: credentials plus `gsk`.
pub const USER_PRIVATE_KEY_LEN: usize = USER_CREDENTIALS_LEN + MB;

pub fn write_credentials(w: &mut Writer, creds: &UserCredentials) -> Result<(), GsError> {
    write_g1(w, &creds.a)?;
    write_g1(w, &creds.b)?;
    write_g1(w, &creds.c)?;
    write_g1(w, &creds.d)?;
    Ok(())
}

pub fn read_credentials(r: &mut Reader) -> Result<UserCredentials, GsError> {
    let a = read_g1(r).map_err(|_| GsError::InvalidUserCredentials)?;
    let b = read_g1(r).map_err(|_| GsError::InvalidUserCredentials)?;
    let c = read_g1(r).map_err(|_| GsError::InvalidUserCredentials)?;
    let d = read_g1(r).map_err(|_| GsError::InvalidUserCredentials)?;
    Ok(UserCredentials { a, b, c, d })
}

pub fn write_private(w: &mut Writer, sk: &UserPrivateKey) -> Result<(), GsError> {
    write_credentials(w, &sk.credentials)?;
    write_scalar(w, &sk.gsk)?;
    Ok(())
}

pub fn read_private(r: &mut Reader) -> Result<UserPrivateKey, GsError> {
    let credentials = read_credentials(r).map_err(|_| GsError::InvalidUserPrivateKey)?;
    let gsk = read_scalar(r).map_err(|_| GsError::InvalidUserPrivateKey)?;
    Ok(UserPrivateKey { credentials, gsk })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::g1_generator;
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn credentials_round_trip() {
        let mut rng = test_rng();
        let creds = UserCredentials {
            a: g1_generator() * ScalarField::rand(&mut rng),
            b: g1_generator() * ScalarField::rand(&mut rng),
            c: g1_generator() * ScalarField::rand(&mut rng),
            d: g1_generator() * ScalarField::rand(&mut rng),
        };
        let mut w = Writer::with_capacity(USER_CREDENTIALS_LEN);
        write_credentials(&mut w, &creds).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), USER_CREDENTIALS_LEN);
        let mut r = Reader::new(&bytes);
        assert_eq!(read_credentials(&mut r).unwrap(), creds);
    }
}

//! Fixed-width wire codec for scalars and curve points.
//!
//! Widths are frozen: a scalar is `MB` bytes; a G1 point is `2*MB+1` bytes
//! (one format tag, then big-endian x, y); a G2 point uses the legacy
//! four-limb layout `(x.c0, x.c1, y.c0, y.c1)`, `4*MB` bytes, with no tag
//! byte. Composite records are just concatenation of fields in struct
//! order. Callers build them by chaining `write_*` calls into one
//! [`Writer`].

use crate::config::{BaseField, G1Aff, G2Aff, ScalarField, G1, G2, MB};
use crate::error::GsError;
use ark_ec::{short_weierstrass::Affine, AffineRepr, CurveGroup};
use ark_ff::{BigInteger, Field, PrimeField};

const G1_TAG_INFINITY: u8 = 0x00;
const G1_TAG_UNCOMPRESSED: u8 = 0x04;

/// Append-only cursor over a caller-sized output buffer. Replaces the
/// mutable `(buf, len, max)` triple with a small writer/reader pair.
pub struct Writer {
    buf: Vec<u8>,
    max: usize,
}

impl Writer {
    pub fn with_capacity(max: usize) -> Self {
        Writer {
            buf: Vec::with_capacity(max.min(1 << 16)),
            max,
        }
    }

    pub fn put_fixed(&mut self, bytes: &[u8]) -> Result<(), GsError> {
        if self.buf.len() + bytes.len() > self.max {
            return Err(GsError::OutputBufferTooSmall);
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

/// Consuming cursor over an input buffer.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    pub fn take_fixed(&mut self, n: usize) -> Result<&'a [u8], GsError> {
        if self.pos + n > self.buf.len() {
            return Err(GsError::InputTooShort);
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn finished(&self) -> bool {
        self.pos == self.buf.len()
    }
}

fn field_to_mb_bytes<F: PrimeField>(f: &F) -> [u8; MB] {
    let bytes = f.into_bigint().to_bytes_be();
    let mut out = [0u8; MB];
    // BigInteger::to_bytes_be is already exactly MB bytes wide for BN254's
    // Fr/Fq (4 limbs of u64 = 32 bytes), but pad defensively on the left.
    let start = MB - bytes.len().min(MB);
    out[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(MB)..]);
    out
}

pub fn write_scalar(w: &mut Writer, s: &ScalarField) -> Result<(), GsError> {
    w.put_fixed(&field_to_mb_bytes(s))
}

pub fn read_scalar(r: &mut Reader) -> Result<ScalarField, GsError> {
    let bytes = r.take_fixed(MB)?;
    Ok(ScalarField::from_be_bytes_mod_order(bytes))
}

pub fn write_g1(w: &mut Writer, p: &G1) -> Result<(), GsError> {
    let affine = p.into_affine();
    if affine.is_zero() {
        w.put_fixed(&[G1_TAG_INFINITY])?;
        w.put_fixed(&[0u8; MB])?;
        w.put_fixed(&[0u8; MB])?;
        return Ok(());
    }
    let (x, y) = affine.xy().expect("non-infinite affine point has coordinates");
    w.put_fixed(&[G1_TAG_UNCOMPRESSED])?;
    w.put_fixed(&field_to_mb_bytes(x))?;
    w.put_fixed(&field_to_mb_bytes(y))?;
    Ok(())
}

pub fn read_g1(r: &mut Reader) -> Result<G1, GsError> {
    let tag = r.take_fixed(1)?[0];
    let x_bytes = r.take_fixed(MB)?;
    let y_bytes = r.take_fixed(MB)?;
    match tag {
        G1_TAG_INFINITY => {
            if x_bytes.iter().any(|&b| b != 0) || y_bytes.iter().any(|&b| b != 0) {
                return Err(GsError::InvalidPointEncoding);
            }
            Ok(G1::zero())
        }
        G1_TAG_UNCOMPRESSED => {
            let x = BaseField::from_be_bytes_mod_order(x_bytes);
            let y = BaseField::from_be_bytes_mod_order(y_bytes);
            let affine = G1Aff::new_unchecked(x, y);
            if !affine.is_on_curve() || !affine.is_in_correct_subgroup_assuming_on_curve() {
                return Err(GsError::InvalidPointEncoding);
            }
            Ok(affine.into_group())
        }
        _ => Err(GsError::InvalidPointEncoding),
    }
}

pub fn write_g2(w: &mut Writer, p: &G2) -> Result<(), GsError> {
    let affine = p.into_affine();
    // The legacy layout carries no infinity marker; G2 usage is limited to
    // issuer keys, which are never the identity except with negligible
    // probability, so an attempt to encode O simply fails like any other
    // malformed point would on read-back.
    let (x, y) = affine
        .xy()
        .ok_or(GsError::InvalidPointEncoding)?;
    w.put_fixed(&field_to_mb_bytes(&x.c0))?;
    w.put_fixed(&field_to_mb_bytes(&x.c1))?;
    w.put_fixed(&field_to_mb_bytes(&y.c0))?;
    w.put_fixed(&field_to_mb_bytes(&y.c1))?;
    Ok(())
}

pub fn read_g2(r: &mut Reader) -> Result<G2, GsError> {
    use ark_bn254::Fq2;
    let xa = r.take_fixed(MB)?;
    let xb = r.take_fixed(MB)?;
    let ya = r.take_fixed(MB)?;
    let yb = r.take_fixed(MB)?;
    let x = Fq2::new(
        BaseField::from_be_bytes_mod_order(xa),
        BaseField::from_be_bytes_mod_order(xb),
    );
    let y = Fq2::new(
        BaseField::from_be_bytes_mod_order(ya),
        BaseField::from_be_bytes_mod_order(yb),
    );
    let affine: Affine<ark_bn254::g2::Config> = Affine::new_unchecked(x, y);
    if !affine.is_on_curve() || !affine.is_in_correct_subgroup_assuming_on_curve() {
        return Err(GsError::InvalidPointEncoding);
    }
    Ok(affine.into_group())
}

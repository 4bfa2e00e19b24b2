//! Hashing to curves and fields ([RFC 9380]).
//!
//! This module provides the curve-independent parts of hash-to-curve:
//! message expansion (`expand_message_xmd` with SHA-256 or SHA-512,
//! `expand_message_xof` with SHAKE256), and hashing into a field
//! (`hash_to_field`). The curve-specific maps (Elligator2 for the
//! curve25519 family, Simplified SWU for P-256 and secp256k1) live in
//! the respective curve modules, which expose `hash_to_curve()`,
//! `encode_to_curve()` and `hash_to_scalar()` functions.
//!
//! All the fields in this crate have 256-bit moduli and a target
//! security level of 128 bits, so each field element is obtained from
//! `L = 48` bytes of expanded output, interpreted in big-endian
//! convention (`OS2IP`) and reduced modulo the field prime.
//!
//! Domain separation tags (DST) are byte strings chosen by the caller.
//! Functions that do not take an explicit DST use `default_dst()`, i.e.
//! the concatenation of `APP_TAG` and the suite identifier.
//!
//! [RFC 9380]: https://datatracker.ietf.org/doc/html/rfc9380

use sha2::{Digest, Sha256, Sha512};
use sha3::Shake256;
use tracing::trace;

use crate::backend::ModInt256;
use crate::error::{Error, Result};

/// Application tag prepended to suite identifiers to build default DSTs.
pub const APP_TAG: &str = "CURVEALG-V01-CS02-with-";

/// Length (in bytes) of the expanded output per field element.
pub const L: usize = 48;

const OVERSIZE_PREFIX: &[u8] = b"H2C-OVERSIZE-DST-";

/// Builds the default DST for a suite: `APP_TAG || suite`.
pub fn default_dst(suite: &str) -> Vec<u8> {
    let mut dst = Vec::with_capacity(APP_TAG.len() + suite.len());
    dst.extend_from_slice(APP_TAG.as_bytes());
    dst.extend_from_slice(suite.as_bytes());
    dst
}

/// Message expansion function of a hash-to-curve suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expander {
    /// `expand_message_xmd` with SHA-256
    XmdSha256,
    /// `expand_message_xmd` with SHA-512
    XmdSha512,
    /// `expand_message_xof` with SHAKE256
    XofShake256,
}

impl Expander {

    /// Expands `msg` into `len` pseudorandom bytes, under the DST `dst`.
    pub fn expand_message(self, msg: &[u8], dst: &[u8], len: usize)
        -> Result<Vec<u8>>
    {
        match self {
            Expander::XmdSha256 => expand_message_xmd::<Sha256>(msg, dst, len, 64),
            Expander::XmdSha512 => expand_message_xmd::<Sha512>(msg, dst, len, 128),
            Expander::XofShake256 => expand_message_xof(msg, dst, len),
        }
    }
}

fn check_params(dst: &[u8], len: usize) -> Result<()> {
    if dst.is_empty() {
        return Err(Error::HashToCurve("empty DST"));
    }
    if len > 65535 {
        return Err(Error::HashToCurve("output length exceeds 65535 bytes"));
    }
    Ok(())
}

/// `expand_message_xmd` (RFC 9380, section 5.3.1) over the hash
/// function `D`, whose input block size is `block_len` bytes.
///
/// Fails if the requested length exceeds 65535 bytes, or 255 output
/// blocks of `D`, or if the DST is empty. A DST longer than 255 bytes
/// is first replaced with `D("H2C-OVERSIZE-DST-" || dst)`.
pub fn expand_message_xmd<D: Digest>(msg: &[u8], dst: &[u8], len: usize,
    block_len: usize) -> Result<Vec<u8>>
{
    check_params(dst, len)?;
    let b_len = <D as Digest>::output_size();
    let ell = (len + b_len - 1) / b_len;
    if ell > 255 {
        return Err(Error::HashToCurve("too many output blocks"));
    }

    let reduced;
    let dst = if dst.len() > 255 {
        trace!(dst_len = dst.len(), "Reducing oversize DST");
        let mut h = D::new();
        h.update(OVERSIZE_PREFIX);
        h.update(dst);
        reduced = h.finalize();
        &reduced[..]
    } else {
        dst
    };
    let dst_len = [dst.len() as u8];

    // b_0 = H(Z_pad || msg || I2OSP(len, 2) || I2OSP(0, 1) || DST_prime)
    let mut h = D::new();
    h.update(vec![0u8; block_len]);
    h.update(msg);
    h.update((len as u16).to_be_bytes());
    h.update([0u8]);
    h.update(dst);
    h.update(dst_len);
    let b0 = h.finalize();

    // b_i = H(strxor(b_0, b_(i-1)) || I2OSP(i, 1) || DST_prime)
    let mut out = Vec::with_capacity(ell * b_len);
    let mut bi = vec![0u8; b_len];
    for i in 1..=ell {
        let mut h = D::new();
        for j in 0..b_len {
            bi[j] ^= b0[j];
        }
        h.update(&bi);
        h.update([i as u8]);
        h.update(dst);
        h.update(dst_len);
        bi.copy_from_slice(&h.finalize());
        out.extend_from_slice(&bi);
    }
    out.truncate(len);
    Ok(out)
}

/// `expand_message_xof` (RFC 9380, section 5.3.2) over SHAKE256.
///
/// A DST longer than 255 bytes is replaced with 64 bytes of
/// `SHAKE256("H2C-OVERSIZE-DST-" || dst)`.
pub fn expand_message_xof(msg: &[u8], dst: &[u8], len: usize)
    -> Result<Vec<u8>>
{
    use sha3::digest::{ExtendableOutput, Update, XofReader};

    check_params(dst, len)?;
    let mut reduced = [0u8; 64];
    let dst = if dst.len() > 255 {
        trace!(dst_len = dst.len(), "Reducing oversize DST");
        let mut h = Shake256::default();
        h.update(OVERSIZE_PREFIX);
        h.update(dst);
        h.finalize_xof().read(&mut reduced);
        &reduced[..]
    } else {
        dst
    };

    let mut h = Shake256::default();
    h.update(msg);
    h.update(&(len as u16).to_be_bytes());
    h.update(dst);
    h.update(&[dst.len() as u8]);
    let mut out = vec![0u8; len];
    h.finalize_xof().read(&mut out);
    Ok(out)
}

/// Hashes `msg` into `count` elements of the field of integers modulo
/// `M0..M3` (RFC 9380, section 5.2), using `L = 48` bytes per element.
pub fn hash_to_field<const M0: u64, const M1: u64, const M2: u64, const M3: u64>(
    exp: Expander, msg: &[u8], dst: &[u8], count: usize)
    -> Result<Vec<ModInt256<M0, M1, M2, M3>>>
{
    let uniform = exp.expand_message(msg, dst, count * L)?;
    Ok(uniform
        .chunks(L)
        .map(ModInt256::<M0, M1, M2, M3>::decode_reduce_be)
        .collect())
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::field::{GFp256, GF25519};

    #[test]
    fn xmd_sha256() {
        let dst = b"QUUX-V01-CS02-with-expander-SHA256-128";
        let v = Expander::XmdSha256.expand_message(b"", dst, 32).unwrap();
        assert_eq!(hex::encode(v),
            "68a985b87eb6b46952128911f2a4412bbc302a9d759667f87f7a21d803f07235");
        let v = Expander::XmdSha256.expand_message(b"abc", dst, 32).unwrap();
        assert_eq!(hex::encode(v),
            "d8ccab23b5985ccea865c6c97b6e5b8350e794e603b4b97902f53a8a0d605615");
        let v = Expander::XmdSha256.expand_message(b"abc", dst, 0x80).unwrap();
        assert_eq!(hex::encode(v),
            "abba86a6129e366fc877aab32fc4ffc70120d8996c88aee2fe4b32d6c7b6437a\
             647e6c3163d40b76a73cf6a5674ef1d890f95b664ee0afa5359a5c4e07985635\
             bbecbac65d747d3d2da7ec2b8221b17b0ca9dc8a1ac1c07ea6a1e60583e2cb00\
             058e77b7b72a298425cd1b941ad4ec65e8afc50303a22c0f99b0509b4c895f40");
    }

    #[test]
    fn xmd_sha512() {
        let dst = b"QUUX-V01-CS02-with-expander-SHA512-256";
        let v = Expander::XmdSha512.expand_message(b"", dst, 32).unwrap();
        assert_eq!(hex::encode(v),
            "6b9a7312411d92f921c6f68ca0b6380730a1a4d982c507211a90964c394179ba");
    }

    #[test]
    fn xof_shake256() {
        let dst = b"QUUX-V01-CS02-with-expander-SHAKE256";
        let v = Expander::XofShake256.expand_message(b"", dst, 32).unwrap();
        assert_eq!(hex::encode(v),
            "2ffc05c48ed32b95d72e807f6eab9f7530dd1c2f013914c8fed38c5ccc15ad76");
        let v = Expander::XofShake256.expand_message(b"abc", dst, 32).unwrap();
        assert_eq!(hex::encode(v),
            "b39e493867e2767216792abce1f2676c197c0692aed061560ead251821808e07");
    }

    #[test]
    fn oversize_dst() {
        let mut dst = b"QUUX-V01-CS02-with-expander-SHA256-128-long-DST-".to_vec();
        dst.extend_from_slice(&[b'1'; 256]);
        let v = Expander::XmdSha256.expand_message(b"", &dst, 32).unwrap();
        assert_eq!(hex::encode(&v),
            "f6086d6dab362e81827a150c31c1834825c4a98836296a797127437bed6171a4");

        let mut h = Sha256::new();
        h.update(b"H2C-OVERSIZE-DST-");
        h.update(&dst);
        let short = h.finalize();
        let w = Expander::XmdSha256.expand_message(b"", &short, 32).unwrap();
        assert_eq!(v, w);
    }

    #[test]
    fn limits() {
        let dst = b"QUUX-V01-CS02-with-expander-SHA256-128";
        assert!(Expander::XmdSha256.expand_message(b"", dst, 255 * 32).is_ok());
        assert_eq!(Expander::XmdSha256.expand_message(b"", dst, 255 * 32 + 1).unwrap_err(),
            Error::HashToCurve("too many output blocks"));
        assert!(Expander::XmdSha512.expand_message(b"", dst, 65535).is_err());
        assert!(Expander::XofShake256.expand_message(b"", dst, 65535).is_ok());
        assert!(Expander::XofShake256.expand_message(b"", dst, 65536).is_err());
        assert!(Expander::XmdSha256.expand_message(b"", b"", 32).is_err());
        assert!(Expander::XmdSha256.expand_message(b"", dst, 0).unwrap().is_empty());
    }

    #[test]
    fn field_elements() {
        let dst = b"QUUX-V01-CS02-with-P256_XMD:SHA-256_SSWU_RO_";
        let u = hash_to_field::<0xFFFFFFFFFFFFFFFF, 0x00000000FFFFFFFF,
            0x0000000000000000, 0xFFFFFFFF00000001>(
            Expander::XmdSha256, b"abc", dst, 2).unwrap();
        assert_eq!(u.len(), 2);
        let raw = Expander::XmdSha256.expand_message(b"abc", dst, 96).unwrap();
        assert!(u[0].equals(GFp256::decode_reduce_be(&raw[..48])) == 0xFFFFFFFF);
        assert!(u[1].equals(GFp256::decode_reduce_be(&raw[48..])) == 0xFFFFFFFF);

        let v: Vec<GF25519> = hash_to_field(Expander::XmdSha512, b"", dst, 1).unwrap();
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn default_dst_tag() {
        assert_eq!(default_dst("P256_XMD:SHA-256_SSWU_RO_"),
            b"CURVEALG-V01-CS02-with-P256_XMD:SHA-256_SSWU_RO_".to_vec());
    }
}

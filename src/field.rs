//! Finite fields.
//!
//! This module defines the base fields and scalar fields of the curves
//! implemented by this crate. All of them are specializations of the
//! backend-provided `ModInt256` type; they only differ by their modulus
//! and by the byte order of their canonical encoding (little-endian for
//! the curve25519 family, big-endian for the NIST and SEC curves).
//!
//! Each type provides `encode()` (32 bytes, canonical), `decode()`
//! (public data, typed error on failure), `decode_ct()` (constant-time,
//! with a `u32` success flag) and `random()` (uniform sampling from a
//! cryptographically secure RNG).

use crate::{CryptoRng, RngCore};
use crate::error::{Error, Result};

pub use crate::backend::ModInt256;

/// Field of integers modulo p = 2^255 - 19 (base field of Curve25519).
pub type GF25519 = ModInt256<
    0xFFFFFFFFFFFFFFED, 0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF, 0x7FFFFFFFFFFFFFFF>;

/// Integers modulo the prime order of the Curve25519 subgroup,
/// l = 2^252 + 27742317777372353535851937790883648493.
pub type Scalar25519 = ModInt256<
    0x5812631A5CF5D3ED, 0x14DEF9DEA2F79CD6,
    0x0000000000000000, 0x1000000000000000>;

/// Base field of NIST P-256, p = 2^256 - 2^224 + 2^192 + 2^96 - 1.
pub type GFp256 = ModInt256<
    0xFFFFFFFFFFFFFFFF, 0x00000000FFFFFFFF,
    0x0000000000000000, 0xFFFFFFFF00000001>;

/// Integers modulo the order of NIST P-256.
pub type ScalarP256 = ModInt256<
    0xF3B9CAC2FC632551, 0xBCE6FAADA7179E84,
    0xFFFFFFFFFFFFFFFF, 0xFFFFFFFF00000000>;

/// Base field of secp256k1, p = 2^256 - 2^32 - 977.
pub type GFsecp256k1 = ModInt256<
    0xFFFFFFFEFFFFFC2F, 0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF>;

/// Integers modulo the order of secp256k1.
pub type ScalarSecp256k1 = ModInt256<
    0xBFD25E8CD0364141, 0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE, 0xFFFFFFFFFFFFFFFF>;

macro_rules! field_codec {
    ($typename:ident, $enc:ident, $dec:ident) => {
        impl $typename {
            /// Encodes this element over exactly 32 bytes (canonical).
            #[inline(always)]
            pub fn encode(self) -> [u8; 32] {
                self.$enc()
            }

            /// Decodes 32 bytes. Returns the element and 0xFFFFFFFF on
            /// success; on failure (wrong length, non-canonical value),
            /// zero and 0 are returned.
            #[inline(always)]
            pub fn decode_ct(buf: &[u8]) -> (Self, u32) {
                Self::$dec(buf)
            }

            /// Decodes 32 bytes into an element. Only for public data:
            /// the outcome is reported through the control flow.
            pub fn decode(buf: &[u8]) -> Result<Self> {
                if buf.len() != 32 {
                    return Err(Error::InvalidLength {
                        expected: 32,
                        actual: buf.len(),
                    });
                }
                let (r, cc) = Self::$dec(buf);
                if cc == 0 {
                    return Err(Error::InvalidEncoding);
                }
                Ok(r)
            }

            /// Square root of a public value; the root with an even
            /// canonical representative is returned. Fails with
            /// `NotQuadraticResidue` if there is no root.
            pub fn try_sqrt(self) -> Result<Self> {
                let (r, cc) = self.sqrt();
                if cc == 0 {
                    return Err(Error::NotQuadraticResidue);
                }
                Ok(r)
            }

            /// Samples a uniform element (64 random bytes, reduced).
            pub fn random<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
                let mut buf = [0u8; 64];
                rng.fill_bytes(&mut buf);
                Self::decode_reduce(&buf)
            }
        }
    };
}

field_codec!(GF25519, encode32, decode32);
field_codec!(Scalar25519, encode32, decode32);
field_codec!(GFp256, encode32_be, decode32_be);
field_codec!(ScalarP256, encode32_be, decode32_be);
field_codec!(GFsecp256k1, encode32_be, decode32_be);
field_codec!(ScalarSecp256k1, encode32_be, decode32_be);

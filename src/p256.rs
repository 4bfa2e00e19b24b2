//! NIST P-256 curve implementation.
//!
//! This module implements group operations on the NIST P-256 elliptic
//! curve, a short Weierstraß curve with equation `y^2 = x^3 - 3*x + b`
//! for a given constant `b`. This curve is standardized in [FIPS 186-4]
//! as well as in other standards such as SEC 2 or ANSI X9.62. It is
//! also known under the names "secp256r1" and "prime256v1".
//!
//! The curve has prime order. "Scalars" are integers modulo that prime
//! order (`Scalar` type). Their canonical encoding is 32 bytes in
//! unsigned big-endian convention, as in SEC 1.
//!
//! Points use Jacobian coordinates. Points can be encoded in compressed
//! (33 bytes) or uncompressed (65 bytes) SEC 1 formats; the neutral is
//! encoded as 33 or 65 zeros by the fixed-length encoders, and decoding
//! also accepts the single-byte encoding 0x00. All decoding operations
//! enforce canonicality of encoding, and verify that the point is
//! indeed on the curve.
//!
//! Hashing to the curve follows [RFC 9380], suite
//! `P256_XMD:SHA-256_SSWU_RO_` (Simplified SWU with `Z = -10`).
//!
//! [FIPS 186-4]: https://csrc.nist.gov/publications/detail/fips/186/4/final
//! [RFC 9380]: https://datatracker.ietf.org/doc/html/rfc9380

#![allow(non_snake_case)]

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use tracing::trace;

use crate::{CryptoRng, RngCore};
use crate::error::{Error, Result};
use crate::field::{GFp256, ScalarP256};
use crate::hash2curve::{self, Expander};
use crate::msm::mul_window;

/// Integers modulo the curve order n.
pub type Scalar = ScalarP256;

/// Hash-to-curve suite (random oracle).
pub const HASH_SUITE: &str = "P256_XMD:SHA-256_SSWU_RO_";

/// Encode-to-curve suite (non-uniform).
pub const ENCODE_SUITE: &str = "P256_XMD:SHA-256_SSWU_NU_";

/// Hash-to-scalar suite.
pub const SCALAR_SUITE: &str = "P256_XMD:SHA-256_SC_";

weierstrass_point!(GFp256, "P-256", Expander::XmdSha256);

impl Point {

    /// The conventional base point in the curve.
    ///
    /// Like all non-neutral points in P-256, it generates the whole curve.
    pub const BASE: Self = Self {
        X: GFp256::w64be(
            0x6B17D1F2E12C4247, 0xF8BCE6E563A440F2,
            0x77037D812DEB33A0, 0xF4A13945D898C296),
        Y: GFp256::w64be(
            0x4FE342E2FE1A7F9B, 0x8EE7EB4A7C0F9E16,
            0x2BCE33576B315ECE, 0xCBB6406837BF51F5),
        Z: GFp256::ONE,
    };

    /// Curve equation parameter b.
    const B: GFp256 = GFp256::w64be(
        0x5AC635D8AA3A93E7, 0xB3EBBD55769886BC,
        0x651D06B0CC53B0F6, 0x3BCE3C3E27D2604B);

    const SSWU_A: GFp256 = GFp256::w64be(
        0xFFFFFFFF00000001, 0x0000000000000000,
        0x00000000FFFFFFFF, 0xFFFFFFFFFFFFFFFC);
    const SSWU_B: GFp256 = Self::B;
    const SSWU_Z: GFp256 = GFp256::w64be(
        0xFFFFFFFF00000001, 0x0000000000000000,
        0x00000000FFFFFFFF, 0xFFFFFFFFFFFFFFF5);

    // -B/A
    const SSWU_C1: GFp256 = GFp256::w64be(
        0x73976747E368DBF8, 0x3BF93F1C7CDD823E,
        0xCC5F023B441BE5A7, 0x6944BEBF629B756E);

    // B/(Z*A)
    const SSWU_C2: GFp256 = GFp256::w64be(
        0xA528BD8696BDAF99, 0x6C65B982D94959D3,
        0x146FE6A020693090, 0xBDBA13132375F224);

    // x^3 - 3*x + b
    fn rhs(x: GFp256) -> GFp256 {
        (x.square() - GFp256::from_u32(3)) * x + Self::B
    }

    /// Doubles this point (in place).
    pub fn set_double(&mut self) {
        let (X, Y, Z) = (&self.X, &self.Y, &self.Z);

        // Formulas for a = -3:
        // https://www.hyperelliptic.org/EFD/g1p/auto-shortw-jacobian-3.html#doubling-dbl-2001-b
        // The neutral (Z = 0) yields Z3 = 0.
        let delta = Z.square();
        let gamma = Y.square();
        let beta = X * gamma;
        let alpha = ((X - delta) * (X + delta)).mul3();
        let X3 = alpha.square() - beta.mul8();
        let Z3 = (Y + Z).square() - gamma - delta;
        let Y3 = alpha * (beta.mul4() - X3) - gamma.square().mul8();

        self.X = X3;
        self.Y = Y3;
        self.Z = Z3;
    }

    /// Maps a field element to a curve point (Simplified SWU).
    pub fn map_to_curve(u: &GFp256) -> Self {
        let (x, y) = Self::map_sswu(u);
        Self { X: x, Y: y, Z: GFp256::ONE }
    }
}

//! Edwards25519 curve implementation.
//!
//! This module implements group operations on the twisted Edwards curve
//! of equation `-x^2 + y^2 = 1 + d*x^2*y^2`, over the finite field
//! GF(2^255 - 19), for the constant `d` = -121665/121666. This curve is
//! described in [RFC 7748]; it is birationally equivalent to the
//! Montgomery curve curve25519 (see the `curve25519` module).
//!
//! The curve has order `8*L` for a prime `L` slightly above 2^252. The
//! conventional base point (`Point::BASE`) generates the subgroup of
//! order `L`. `Point` represents any curve point, including the points
//! of low order; `SubgroupPoint` is a wrapper that can only hold points
//! of the prime-order subgroup, which is checked when it is built.
//!
//! Points use extended coordinates (X:Y:Z:T), with `x = X/Z`,
//! `y = Y/Z` and `x*y = T/Z`. Additions use the complete formulas from
//! [RFC 8032]: there is no exceptional case, in particular for adding a
//! point to itself or to the neutral. `Point` instances can be used with
//! the usual `+`, `-` and `*` operators (with a `Scalar` or a `u64`), on
//! values and references.
//!
//! Compressed encoding is the one from RFC 8032 (32 bytes: the `y`
//! coordinate, with the sign of `x` in the top bit). Uncompressed
//! encoding is `x` followed by `y`, both over 32 bytes, little-endian.
//!
//! Hashing to the curve follows [RFC 9380] (suite
//! `edwards25519_XMD:SHA-512_ELL2_RO_`): Elligator2 on curve25519, then
//! the rational map to edwards25519, then clearing of the cofactor.
//!
//! [RFC 7748]: https://datatracker.ietf.org/doc/html/rfc7748
//! [RFC 8032]: https://datatracker.ietf.org/doc/html/rfc8032
//! [RFC 9380]: https://datatracker.ietf.org/doc/html/rfc9380

// Projective/fractional coordinates traditionally use uppercase letters,
// using lowercase only for affine coordinates.
#![allow(non_snake_case)]

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use tracing::trace;

use crate::{CryptoRng, RngCore};
use crate::error::{Error, Result};
use crate::field::{GF25519, Scalar25519};
use crate::hash2curve::{self, Expander};
use crate::msm::mul_window;
use crate::weierstrass::bytes_are_zero;

/// Integers modulo L = 2^252 + 27742317777372353535851937790883648493.
pub type Scalar = Scalar25519;

/// Hash-to-curve suite (random oracle).
pub const HASH_SUITE: &str = "edwards25519_XMD:SHA-512_ELL2_RO_";

/// Encode-to-curve suite (non-uniform).
pub const ENCODE_SUITE: &str = "edwards25519_XMD:SHA-512_ELL2_NU_";

/// Hash-to-scalar suite.
pub const SCALAR_SUITE: &str = "edwards25519_XMD:SHA-512_SC_";

/// A point on the twisted Edwards curve edwards25519.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub(crate) X: GF25519,
    pub(crate) Y: GF25519,
    pub(crate) Z: GF25519,
    pub(crate) T: GF25519,
}

impl Point {

    /// The group neutral (identity point) in the curve.
    ///
    /// Affine coordinates of the neutral are (0,1).
    pub const NEUTRAL: Self = Self {
        X: GF25519::ZERO,
        Y: GF25519::ONE,
        Z: GF25519::ONE,
        T: GF25519::ZERO,
    };

    /// The conventional base point in the curve.
    ///
    /// This point generates the subgroup of prime order L.
    pub const BASE: Self = Self {
        X: GF25519::w64be(
            0x216936D3CD6E53FE, 0xC0A4E231FDD6DC5C,
            0x692CC7609525A7B2, 0xC9562D608F25D51A),
        Y: GF25519::w64be(
            0x6666666666666666, 0x6666666666666666,
            0x6666666666666666, 0x6666666666666658),
        Z: GF25519::ONE,
        T: GF25519::w64be(
            0x67875F0FD78B7665, 0x66EA4E8E64ABE37D,
            0x20F09F80775152F5, 0x6DDE8AB3A5B7DDA3),
    };

    /// Curve equation parameter d = -121665 / 121666.
    pub(crate) const D: GF25519 = GF25519::w64be(
        0x52036CEE2B6FFE73, 0x8CC740797779E898,
        0x00700A4D4141D8AB, 0x75EB4DCA135978A3);

    const D2: GF25519 = GF25519::w64be(
        0x2406D9DC56DFFCE7, 0x198E80F2EEF3D130,
        0x00E0149A8283B156, 0xEBD69B9426B2F159);

    /// 2^((p-1)/4), which is a square root of -1 in GF(2^255-19)
    pub(crate) const SQRT_M1: GF25519 = GF25519::w64be(
        0x2B8324804FC1DF0B, 0x2B4D00993DFBD7A7,
        0x2F431806AD2FE478, 0xC4EE1B274A0EA0B0);

    // sqrt(-486664), even root; scaling factor of the birational map
    // between curve25519 and edwards25519.
    pub(crate) const SQRT_M486664: GF25519 = GF25519::w64be(
        0x0F26EDF460A006BB, 0xD27B08DC03FC4F7E,
        0xC5A1D3D14B7D1A82, 0xCC6E04AAFF457E06);

    // Montgomery curve parameter A.
    pub(crate) const J: GF25519 = GF25519::w64le(486662, 0, 0, 0);

    // Solves the curve equation for x, given y. The returned x has the
    // requested sign (0 = even, 1 = odd). The flag is 0x00000000 if
    // there is no solution, or if x = 0 and the sign is 1.
    fn recover_x(y: GF25519, sign: u32) -> (GF25519, u32) {
        // x^2 = (y^2 - 1) / (d*y^2 + 1); the denominator is never zero
        // since -1/d is not a square.
        let y2 = y.square();
        let (mut x, r) = ((y2 - GF25519::ONE) / (Self::D * y2 + GF25519::ONE)).sqrt();
        let neg = sign.wrapping_neg();
        let r = r & !(x.iszero() & neg);
        x.set_condneg(neg);
        (x, r)
    }

    // Decodes 32 bytes. Returns the point (the neutral on failure), then
    // the flags for a canonical y coordinate and for a solvable x.
    fn decode_inner(buf: &[u8]) -> (Self, u32, u32) {
        let mut bb = [0u8; 32];
        bb[..].copy_from_slice(buf);
        let sign_x = (bb[31] >> 7) as u32;
        bb[31] &= 0x7F;

        let (mut y, ry) = GF25519::decode32(&bb[..]);
        let (mut x, mut rx) = Self::recover_x(y, sign_x);
        rx &= ry;

        x.set_cond(&GF25519::ZERO, !rx);
        y.set_cond(&GF25519::ONE, !rx);
        let P = Self { X: x, Y: y, Z: GF25519::ONE, T: x * y };
        (P, ry, rx)
    }

    /// Tries to decode a point from bytes (RFC 8032 encoding).
    ///
    /// On success, this point is set to the decoded point and
    /// 0xFFFFFFFF is returned. On failure (wrong length, non-canonical
    /// encoding, no matching curve point), this point is set to the
    /// neutral and 0x00000000 is returned.
    ///
    /// If the source length is exactly 32 bytes, then the decoding
    /// outcome should remain hidden from timing-based side channels.
    pub fn set_decode(&mut self, buf: &[u8]) -> u32 {
        if buf.len() != 32 {
            *self = Self::NEUTRAL;
            return 0;
        }
        let (P, _, r) = Self::decode_inner(buf);
        *self = P;
        r
    }

    /// Decodes a point from its compressed encoding.
    ///
    /// The outcome of decoding is reported through the returned value
    /// and thus leaks; this function is meant for public data.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != 32 {
            trace!(curve = "edwards25519", len = buf.len(), "Rejected point encoding length");
            return Err(Error::InvalidLength { expected: 32, actual: buf.len() });
        }
        let (P, ry, rx) = Self::decode_inner(buf);
        if ry == 0 {
            trace!(curve = "edwards25519", "Rejected non-canonical y coordinate");
            return Err(Error::InvalidEncoding);
        }
        if rx == 0 {
            trace!(curve = "edwards25519", "Rejected encoding with no matching point");
            return Err(Error::NotOnCurve);
        }
        Ok(P)
    }

    /// Encodes this point into exactly 32 bytes.
    ///
    /// Encoding is always canonical.
    pub fn encode(self) -> [u8; 32] {
        let (x, y, _) = self.to_affine();
        let mut r = y.encode();
        r[31] |= ((x.is_odd() & 1) as u8) << 7;
        r
    }

    /// Encodes this point into 64 bytes (x then y, little-endian).
    pub fn encode_uncompressed(self) -> [u8; 64] {
        let (x, y, _) = self.to_affine();
        let mut r = [0u8; 64];
        r[..32].copy_from_slice(&x.encode());
        r[32..].copy_from_slice(&y.encode());
        r
    }

    /// Decodes a point from its uncompressed encoding (64 bytes).
    ///
    /// 64 zeros are also accepted as the neutral: (0, 0) is not on the
    /// curve, so no point is shadowed. The neutral still encodes as
    /// (0, 1).
    pub fn decode_uncompressed(buf: &[u8]) -> Result<Self> {
        if buf.len() != 64 {
            trace!(curve = "edwards25519", len = buf.len(), "Rejected point encoding length");
            return Err(Error::InvalidLength { expected: 64, actual: buf.len() });
        }
        if bytes_are_zero(buf) != 0 {
            return Ok(Self::NEUTRAL);
        }
        Self::from_affine_bytes(&buf[..32], &buf[32..])
    }

    /// Builds a point from its affine coordinates.
    ///
    /// The x coordinate is recomputed from y, and must match `x` with
    /// one of the two possible signs; otherwise, `NotOnCurve` is
    /// returned.
    pub fn from_affine(x: GF25519, y: GF25519) -> Result<Self> {
        let (x0, r) = Self::recover_x(y, 0);
        if (r & (x.equals(x0) | x.equals(-x0))) == 0 {
            trace!(curve = "edwards25519", "Rejected affine coordinates");
            return Err(Error::NotOnCurve);
        }
        Ok(Self { X: x, Y: y, Z: GF25519::ONE, T: x * y })
    }

    /// Builds a point from encoded affine coordinates (32 bytes each,
    /// little-endian, canonical).
    pub fn from_affine_bytes(x: &[u8], y: &[u8]) -> Result<Self> {
        Self::from_affine(GF25519::decode(x)?, GF25519::decode(y)?)
    }

    /// Gets the affine coordinates (x, y) of this point.
    ///
    /// The returned flag is 0xFFFFFFFF; the Z coordinate of a valid
    /// point is never zero.
    pub fn to_affine(self) -> (GF25519, GF25519, u32) {
        let (iZ, r) = self.Z.invert();
        (self.X * iZ, self.Y * iZ, r)
    }

    /// Gets the affine x coordinate of this point.
    pub fn affine_x(self) -> Result<GF25519> {
        let (iZ, r) = self.Z.invert();
        if r == 0 {
            return Err(Error::IdentityEncountered);
        }
        Ok(self.X * iZ)
    }

    /// Gets the affine y coordinate of this point.
    pub fn affine_y(self) -> Result<GF25519> {
        let (iZ, r) = self.Z.invert();
        if r == 0 {
            return Err(Error::IdentityEncountered);
        }
        Ok(self.Y * iZ)
    }

    /// Adds another point (`rhs`) to this point.
    fn set_add(&mut self, rhs: &Self) {
        let (X1, Y1, Z1, T1) = (&self.X, &self.Y, &self.Z, &self.T);
        let (X2, Y2, Z2, T2) = (&rhs.X, &rhs.Y, &rhs.Z, &rhs.T);

        // Formulas from RFC 8032, section 5.1.4.
        let A = (Y1 - X1) * (Y2 - X2);
        let B = (Y1 + X1) * (Y2 + X2);
        let C = T1 * Self::D2 * T2;
        let D = Z1.mul2() * Z2;
        let E = B - A;
        let F = D - C;
        let G = D + C;
        let H = B + A;
        self.X = E * F;
        self.Y = G * H;
        self.T = E * H;
        self.Z = F * G;
    }

    /// Subtracts another point (`rhs`) from this point.
    fn set_sub(&mut self, rhs: &Self) {
        self.set_add(&-rhs);
    }

    /// Doubles this point (in place).
    pub fn set_double(&mut self) {
        self.set_xdouble(1);
    }

    /// Doubles this point.
    #[inline(always)]
    pub fn double(self) -> Self {
        let mut r = self;
        r.set_double();
        r
    }

    /// Doubles this point n times (in place).
    pub fn set_xdouble(&mut self, n: u32) {
        // The doubling formulas do not use T on input, so it is only
        // computed on the last iteration.
        for i in 0..n {
            let (X, Y, Z) = (self.X, self.Y, self.Z);
            let A = X.square();
            let B = Y.square();
            let C = Z.square().mul2();
            let H = A + B;
            let E = H - (X + Y).square();
            let G = A - B;
            let F = C + G;
            self.X = E * F;
            self.Y = G * H;
            self.Z = F * G;
            if i == n - 1 {
                self.T = E * H;
            }
        }
    }

    /// Doubles this point n times.
    #[inline(always)]
    pub fn xdouble(self, n: u32) -> Self {
        let mut r = self;
        r.set_xdouble(n);
        r
    }

    /// Negates this point (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.X.set_neg();
        self.T.set_neg();
    }

    /// Multiplies this point by a scalar (in place).
    ///
    /// This operation is constant-time with regard to both the point
    /// and the scalar.
    pub fn set_mul(&mut self, n: &Scalar) {
        *self = mul_window(self, &n.encode32());
    }

    /// Multiplies this point by a small integer.
    ///
    /// This operation is constant-time with regard to the source point,
    /// but NOT with regard to the multiplier; the multiplier `n` MUST
    /// NOT be secret.
    pub fn set_mul_small(&mut self, n: u64) {
        if n == 0 {
            *self = Self::NEUTRAL;
            return;
        }
        if n == 1 {
            return;
        }

        let nlen = 64 - n.leading_zeros();
        let T = *self;
        let mut ndbl = 0u32;
        for i in (0..(nlen - 1)).rev() {
            ndbl += 1;
            if ((n >> i) & 1) == 0 {
                continue;
            }
            self.set_xdouble(ndbl);
            ndbl = 0;
            self.set_add(&T);
        }
        self.set_xdouble(ndbl);
    }

    /// Returns this point multiplied by a small (public) integer.
    #[inline(always)]
    pub fn mul_small(self, n: u64) -> Self {
        let mut r = self;
        r.set_mul_small(n);
        r
    }

    /// Compares two points for equality.
    ///
    /// Returned value is 0xFFFFFFFF if the two points are equal,
    /// 0x00000000 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        (self.X * rhs.Z).equals(rhs.X * self.Z)
        & (self.Y * rhs.Z).equals(rhs.Y * self.Z)
    }

    /// Tests whether this point is the neutral (identity point on the
    /// curve).
    #[inline(always)]
    pub fn isneutral(self) -> u32 {
        // The neutral is the only point with y == 1.
        self.Y.equals(self.Z)
    }

    /// Tests whether this point is a low-order point, i.e. a point of
    /// order 1, 2, 4 or 8.
    pub fn has_low_order(self) -> u32 {
        // E[4] is exactly the set of points with x = 0 or y = 0. A point
        // is in E[8] if its double is in E[4]; in the doubling formulas,
        // this happens when X*Y = 0 or X^2 + Y^2 = 0, i.e. X = i*Y or
        // X = -i*Y.
        let X = self.X;
        let Y = self.Y;
        let iY = Y * Self::SQRT_M1;
        X.iszero() | Y.iszero() | iY.equals(X) | iY.equals(-X)
    }

    /// Tests whether this point is in the subgroup of prime order L.
    ///
    /// The point is multiplied by L and compared with the neutral.
    pub fn is_torsion_free(self) -> u32 {
        // L*P = (L-1)*P + P
        let mut Q = self;
        Q.set_mul(&Scalar::MINUS_ONE);
        Q.set_add(&self);
        Q.isneutral()
    }

    /// Multiplies this point by the cofactor (8).
    #[inline(always)]
    pub fn clear_cofactor(self) -> Self {
        self.xdouble(3)
    }

    /// Conditionally copies the provided point (`P`) into `self`.
    ///
    /// `ctl` MUST be equal to 0x00000000 or 0xFFFFFFFF.
    #[inline]
    pub fn set_cond(&mut self, P: &Self, ctl: u32) {
        self.X.set_cond(&P.X, ctl);
        self.Y.set_cond(&P.Y, ctl);
        self.Z.set_cond(&P.Z, ctl);
        self.T.set_cond(&P.T, ctl);
    }

    /// Returns a point equal to `P0` (if `ctl` = 0x00000000) or `P1` (if
    /// `ctl` = 0xFFFFFFFF).
    #[inline(always)]
    pub fn select(P0: &Self, P1: &Self, ctl: u32) -> Self {
        let mut P = *P0;
        P.set_cond(P1, ctl);
        P
    }

    /// Conditionally negates this point.
    #[inline]
    pub fn set_condneg(&mut self, ctl: u32) {
        self.X.set_condneg(ctl);
        self.T.set_condneg(ctl);
    }

    /// Maps this point to the Montgomery curve curve25519, and returns
    /// the affine (u, v) coordinates.
    ///
    /// The neutral and the point of order 2 (0,-1) both map to (0, 0).
    pub fn to_montgomery(self) -> (GF25519, GF25519) {
        // u = (Z + Y)/(Z - Y)
        // v = sqrt(-486664)*u/x
        // with a single inversion of (Z - Y)*X.
        let ZpY = self.Z + self.Y;
        let (iden, _) = ((self.Z - self.Y) * self.X).invert();
        let u = ZpY * self.X * iden;
        let v = Self::SQRT_M486664 * ZpY * self.Z * iden;
        (u, v)
    }

    /// Maps a point of curve25519, given by its affine coordinates, to
    /// edwards25519.
    ///
    /// The coordinates are not validated. Points with v = 0 or u = -1
    /// map to the neutral.
    pub fn from_montgomery(u: GF25519, v: GF25519) -> Self {
        // x = sqrt(-486664)*u/v
        // y = (u - 1)/(u + 1)
        let up1 = u + GF25519::ONE;
        let (iden, r) = (v * up1).invert();
        let x = Self::SQRT_M486664 * u * up1 * iden;
        let mut y = (u - GF25519::ONE) * v * iden;
        y.set_cond(&GF25519::ONE, !r);
        Self { X: x, Y: y, Z: GF25519::ONE, T: x * y }
    }

    /// Elligator2 map (RFC 9380, section 6.7.1) from a field element to
    /// a point of curve25519, returned as affine (u, v) coordinates.
    pub(crate) fn elligator2(e: &GF25519) -> (GF25519, GF25519) {
        let J = Self::J;
        let (tv1, _) = (e.square().mul2() + GF25519::ONE).invert();
        let mut x1 = -(J * tv1);
        x1.set_cond(&-J, x1.iszero());
        let gx1 = ((x1 + J) * x1 + GF25519::ONE) * x1;
        let x2 = -x1 - J;
        let gx2 = ((x2 + J) * x2 + GF25519::ONE) * x2;
        let (y1, e1) = gx1.sqrt();
        let (y2, _) = gx2.sqrt();
        let x = GF25519::select(&x2, &x1, e1);
        let mut y = GF25519::select(&y2, &y1, e1);

        // sqrt() returns the even root; the odd one is used for x1.
        y.set_condneg(e1);
        (x, y)
    }

    /// Maps a field element to a curve point (Elligator2, then the
    /// rational map). The cofactor is not cleared.
    pub fn map_to_curve(e: &GF25519) -> Self {
        let (u, v) = Self::elligator2(e);
        Self::from_montgomery(u, v)
    }

    /// Hashes a message to a point of the prime-order subgroup (RFC 9380
    /// `hash_to_curve`, random oracle variant).
    pub fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self> {
        let u: Vec<GF25519> = hash2curve::hash_to_field(
            Expander::XmdSha512, msg, dst, 2)?;
        let Q = Self::map_to_curve(&u[0]) + Self::map_to_curve(&u[1]);
        Ok(Q.clear_cofactor())
    }

    /// Encodes a message to a point of the prime-order subgroup (RFC 9380
    /// `encode_to_curve`, non-uniform variant).
    pub fn encode_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self> {
        let u: Vec<GF25519> = hash2curve::hash_to_field(
            Expander::XmdSha512, msg, dst, 1)?;
        Ok(Self::map_to_curve(&u[0]).clear_cofactor())
    }

    /// Hashes a message to a point with the default DST.
    pub fn hash(msg: &[u8]) -> Result<Self> {
        Self::hash_to_curve(msg, &hash2curve::default_dst(HASH_SUITE))
    }

    /// Samples a uniform point of the prime-order subgroup.
    pub fn random<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        let e0 = GF25519::random(rng);
        let e1 = GF25519::random(rng);
        (Self::map_to_curve(&e0) + Self::map_to_curve(&e1)).clear_cofactor()
    }
}

point_ops!(Point, Scalar);
impl_curve_point!(Point, Scalar, GF25519, 32, 64);

/// Hashes a message to a scalar (RFC 9380 `hash_to_field` modulo L).
pub fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Scalar> {
    let k: Vec<Scalar> = hash2curve::hash_to_field(Expander::XmdSha512, msg, dst, 1)?;
    Ok(k[0])
}

/// A point of the prime-order subgroup of edwards25519.
#[derive(Clone, Copy, Debug)]
pub struct SubgroupPoint(Point);

impl SubgroupPoint {

    /// The group neutral.
    pub const NEUTRAL: Self = Self(Point::NEUTRAL);

    /// The conventional generator.
    pub const BASE: Self = Self(Point::BASE);

    /// Returns the underlying curve point.
    #[inline(always)]
    pub fn point(self) -> Point {
        self.0
    }

    /// Decodes a point and checks that it is in the subgroup.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        Self::try_from(Point::decode(buf)?)
    }

    /// Encodes this point into 32 bytes.
    #[inline(always)]
    pub fn encode(self) -> [u8; 32] {
        self.0.encode()
    }

    #[inline(always)]
    pub fn equals(self, rhs: Self) -> u32 {
        self.0.equals(rhs.0)
    }

    #[inline(always)]
    pub fn isneutral(self) -> u32 {
        self.0.isneutral()
    }

    fn set_add(&mut self, rhs: &Self) {
        self.0.set_add(&rhs.0);
    }

    fn set_sub(&mut self, rhs: &Self) {
        self.0.set_sub(&rhs.0);
    }

    fn set_neg(&mut self) {
        self.0.set_neg();
    }

    fn set_mul(&mut self, n: &Scalar) {
        self.0.set_mul(n);
    }

    fn set_mul_small(&mut self, n: u64) {
        self.0.set_mul_small(n);
    }

    /// Hashes a message to a subgroup point.
    pub fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self> {
        Ok(Self(Point::hash_to_curve(msg, dst)?))
    }
}

impl TryFrom<Point> for SubgroupPoint {
    type Error = Error;

    fn try_from(P: Point) -> Result<Self> {
        if P.is_torsion_free() == 0 {
            trace!(curve = "edwards25519", "Rejected point outside of the prime-order subgroup");
            return Err(Error::NotOnCurve);
        }
        Ok(Self(P))
    }
}

impl From<SubgroupPoint> for Point {
    fn from(P: SubgroupPoint) -> Point {
        P.0
    }
}

point_ops!(SubgroupPoint, Scalar);

#[cfg(test)]
mod tests {

    use super::*;
    use crate::test_rng::Sha256Rng;
    use sha2::{Digest, Sha256, Sha512};

    // Encodings of the eight points of order 1, 2, 4 and 8.
    const LOW_ORDER: [&str; 8] = [
        "0100000000000000000000000000000000000000000000000000000000000000",
        "ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000080",
        "c7176a703d4dd84fba3c0b760d10670f2a2053fa2c39ccc64ec7fd7792ac037a",
        "c7176a703d4dd84fba3c0b760d10670f2a2053fa2c39ccc64ec7fd7792ac03fa",
        "26e8958fc2b227b045c3f489f2ef98f0d5dfac05d3c63339b13802886d53fc05",
        "26e8958fc2b227b045c3f489f2ef98f0d5dfac05d3c63339b13802886d53fc85",
    ];

    fn rand_scalar(sh: &mut Sha256, i: u64) -> Scalar {
        sh.update(i.to_le_bytes());
        Scalar::decode_reduce(&sh.finalize_reset())
    }

    #[test]
    fn base_encoding() {
        assert_eq!(hex::encode(Point::BASE.encode()),
            "5866666666666666666666666666666666666666666666666666666666666666");
        let P = Point::decode(&Point::BASE.encode()).unwrap();
        assert!(P.equals(Point::BASE) == 0xFFFFFFFF);
        assert_eq!(hex::encode(Point::NEUTRAL.encode()),
            "0100000000000000000000000000000000000000000000000000000000000000");
    }

    #[test]
    fn rfc8032_public_key() {
        // Test 1 from RFC 8032: public key derived from a seed, through
        // SHA-512 and clamping.
        let seed = hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60").unwrap();
        let h = Sha512::digest(&seed);
        let mut k = [0u8; 32];
        k.copy_from_slice(&h[..32]);
        k[0] &= 248;
        k[31] &= 127;
        k[31] |= 64;
        let A = mul_window(&Point::BASE, &k);
        assert_eq!(hex::encode(A.encode()),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a");
        let A2 = Point::BASE * Scalar::decode_reduce(&k);
        assert!(A.equals(A2) == 0xFFFFFFFF);
    }

    #[test]
    fn group_law() {
        let mut sh = Sha256::new();
        let O = Point::NEUTRAL;
        for i in 0..20 {
            let a = rand_scalar(&mut sh, 3 * i);
            let b = rand_scalar(&mut sh, 3 * i + 1);
            let c = rand_scalar(&mut sh, 3 * i + 2);
            let P = Point::BASE * a;
            let Q = Point::BASE * b;
            let R = Point::BASE * c;

            assert!(((P + Q) + R).equals(P + (Q + R)) == 0xFFFFFFFF);
            assert!((P + Q).equals(Q + P) == 0xFFFFFFFF);
            assert!((P + O).equals(P) == 0xFFFFFFFF);
            assert!((P - P).isneutral() == 0xFFFFFFFF);
            assert!((P + P).equals(P.double()) == 0xFFFFFFFF);
            assert!(P.xdouble(5).equals(P * 32u64) == 0xFFFFFFFF);
            assert!((P * 7u64).equals(P.double().double() + P.double() + P) == 0xFFFFFFFF);

            // Scalar distributivity.
            assert!((Point::BASE * (a + b)).equals(P + Q) == 0xFFFFFFFF);
            assert!((Point::BASE * (a * b)).equals(P * b) == 0xFFFFFFFF);
            assert!((a * Q).equals(Q * a) == 0xFFFFFFFF);

            // Round-trips.
            let P2 = Point::decode(&P.encode()).unwrap();
            assert!(P2.equals(P) == 0xFFFFFFFF);
            let P3 = Point::decode_uncompressed(&P.encode_uncompressed()).unwrap();
            assert!(P3.equals(P) == 0xFFFFFFFF);
            let (x, y, ok) = P.to_affine();
            assert!(ok == 0xFFFFFFFF);
            assert!(Point::from_affine(x, y).unwrap().equals(P) == 0xFFFFFFFF);
            assert!(Point::from_affine(-x, y).unwrap().equals(-P) == 0xFFFFFFFF);
            assert!(P.affine_x().unwrap().equals(x) == 0xFFFFFFFF);
            assert!(P.affine_y().unwrap().equals(y) == 0xFFFFFFFF);

            let mut Q2 = Point::NEUTRAL;
            assert!(Q2.set_decode(&Q.encode()) == 0xFFFFFFFF);
            assert!(Q2.equals(Q) == 0xFFFFFFFF);
        }
        assert!((Point::BASE * Scalar::ZERO).isneutral() == 0xFFFFFFFF);
        assert!((Point::BASE * 0u64).isneutral() == 0xFFFFFFFF);
    }

    #[test]
    fn decode_failures() {
        assert_eq!(Point::decode(&[0u8; 31]).unwrap_err(),
            Error::InvalidLength { expected: 32, actual: 31 });

        // y = p is not canonical.
        let mut buf = [0xFFu8; 32];
        buf[0] = 0xED;
        buf[31] = 0x7F;
        assert_eq!(Point::decode(&buf).unwrap_err(), Error::InvalidEncoding);

        // y = 2 has no matching x.
        let mut buf = [0u8; 32];
        buf[0] = 2;
        assert_eq!(Point::decode(&buf).unwrap_err(), Error::NotOnCurve);
        let mut P = Point::BASE;
        assert!(P.set_decode(&buf) == 0);
        assert!(P.isneutral() == 0xFFFFFFFF);

        // Neutral with the sign bit set (x = 0, "negative").
        let mut buf = [0u8; 32];
        buf[0] = 1;
        buf[31] = 0x80;
        assert_eq!(Point::decode(&buf).unwrap_err(), Error::NotOnCurve);

        let (x, y, _) = Point::BASE.to_affine();
        assert_eq!(Point::from_affine(x + GF25519::ONE, y).unwrap_err(),
            Error::NotOnCurve);
        assert_eq!(Point::decode_uncompressed(&[0u8; 63]).unwrap_err(),
            Error::InvalidLength { expected: 64, actual: 63 });
    }

    #[test]
    fn uncompressed_neutral() {
        // Both (0, 1) and 64 zeros decode to the neutral.
        let enc = Point::NEUTRAL.encode_uncompressed();
        assert!(enc[32] == 1);
        assert!(Point::decode_uncompressed(&enc).unwrap().isneutral() == 0xFFFFFFFF);
        assert!(Point::decode_uncompressed(&[0u8; 64]).unwrap().isneutral() == 0xFFFFFFFF);

        // (0, 2) is still rejected.
        let mut buf = [0u8; 64];
        buf[32] = 2;
        assert_eq!(Point::decode_uncompressed(&buf).unwrap_err(), Error::NotOnCurve);
    }

    #[test]
    fn low_order_points() {
        let mut orders = [0u32; 8];
        for (i, s) in LOW_ORDER.iter().enumerate() {
            let P = Point::decode(&hex::decode(s).unwrap()).unwrap();
            assert!(P.has_low_order() == 0xFFFFFFFF);
            assert!(P.xdouble(3).isneutral() == 0xFFFFFFFF);
            assert!(P.encode()[..] == hex::decode(s).unwrap()[..]);
            for k in 0..4 {
                if P.xdouble(k).isneutral() != 0 {
                    orders[i] = 1 << k;
                    break;
                }
            }

            // Only the neutral is in the prime-order subgroup.
            if i == 0 {
                assert!(P.is_torsion_free() == 0xFFFFFFFF);
            } else {
                assert!(P.is_torsion_free() == 0);
                assert!((Point::BASE + P).is_torsion_free() == 0);
                assert!((Point::BASE + P).has_low_order() == 0);
                assert_eq!(SubgroupPoint::try_from(P).unwrap_err(), Error::NotOnCurve);
            }
        }
        assert_eq!(orders, [1, 2, 4, 4, 8, 8, 8, 8]);
        assert!(Point::BASE.is_torsion_free() == 0xFFFFFFFF);
        assert!(Point::BASE.has_low_order() == 0);
    }

    #[test]
    fn subgroup_wrapper() {
        let G = SubgroupPoint::try_from(Point::BASE).unwrap();
        let s = Scalar::from_u32(12345);
        let P = G * s;
        assert!(P.point().equals(Point::BASE * s) == 0xFFFFFFFF);
        assert!((P - P).isneutral() == 0xFFFFFFFF);
        assert!((P + G).equals(G * Scalar::from_u32(12346)) == 0xFFFFFFFF);
        assert!((-G + G).isneutral() == 0xFFFFFFFF);
        let Q = SubgroupPoint::decode(&P.encode()).unwrap();
        assert!(Q.equals(P) == 0xFFFFFFFF);
        let R: Point = Q.into();
        assert!(R.equals(Point::BASE * 12345u64) == 0xFFFFFFFF);

        let bad = hex::decode(LOW_ORDER[4]).unwrap();
        assert_eq!(SubgroupPoint::decode(&bad).unwrap_err(), Error::NotOnCurve);
    }

    #[test]
    fn montgomery_map() {
        let (u, v) = Point::BASE.to_montgomery();
        assert!(u.equals(GF25519::from_u32(9)) == 0xFFFFFFFF);
        assert!(v.equals(GF25519::w64be(
            0x5F51E65E475F794B, 0x1FE122D388B72EB3,
            0x6DC2B28192839E4D, 0xD6163A5D81312C14)) == 0xFFFFFFFF);
        let P = Point::from_montgomery(u, v);
        assert!(P.equals(Point::BASE) == 0xFFFFFFFF);

        let (u, v) = Point::NEUTRAL.to_montgomery();
        assert!((u.iszero() & v.iszero()) == 0xFFFFFFFF);
        assert!(Point::from_montgomery(u, v).isneutral() == 0xFFFFFFFF);

        let mut sh = Sha256::new();
        for i in 0..10 {
            let P = Point::BASE * rand_scalar(&mut sh, i);
            let (u, v) = P.to_montgomery();
            // v^2 = u^3 + A*u^2 + u
            assert!(v.square().equals(((u + Point::J) * u + GF25519::ONE) * u) == 0xFFFFFFFF);
            assert!(Point::from_montgomery(u, v).equals(P) == 0xFFFFFFFF);
        }
    }

    fn check_h2c(P: Point, x: &str, y: &str) {
        let (px, py, _) = P.to_affine();
        let mut bx = px.encode();
        let mut by = py.encode();
        bx.reverse();
        by.reverse();
        assert_eq!(hex::encode(bx), x);
        assert_eq!(hex::encode(by), y);
    }

    #[test]
    fn hash_to_curve_vectors() {
        let ro = b"QUUX-V01-CS02-with-edwards25519_XMD:SHA-512_ELL2_RO_";
        let nu = b"QUUX-V01-CS02-with-edwards25519_XMD:SHA-512_ELL2_NU_";
        check_h2c(Point::hash_to_curve(b"", ro).unwrap(),
            "3c3da6925a3c3c268448dcabb47ccde5439559d9599646a8260e47b1e4822fc6",
            "09a6c8561a0b22bef63124c588ce4c62ea83a3c899763af26d795302e115dc21");
        check_h2c(Point::hash_to_curve(b"abc", ro).unwrap(),
            "608040b42285cc0d72cbb3985c6b04c935370c7361f4b7fbdb1ae7f8c1a8ecad",
            "1a8395b88338f22e435bbd301183e7f20a5f9de643f11882fb237f88268a5531");
        check_h2c(Point::encode_to_curve(b"", nu).unwrap(),
            "1ff2b70ecf862799e11b7ae744e3489aa058ce805dd323a936375a84695e76da",
            "222e314d04a4d5725e9f2aff9fb2a6b69ef375a1214eb19021ceab2d687f0f9b");
        check_h2c(Point::encode_to_curve(b"abc", nu).unwrap(),
            "5f13cc69c891d86927eb37bd4afc6672360007c63f68a33ab423a3aa040fd2a8",
            "67732d50f9a26f73111dd1ed5dba225614e538599db58ba30aaea1f5c827fa42");

        let P = Point::hash(b"abc").unwrap();
        let Q = Point::hash(b"abc").unwrap();
        assert!(P.equals(Q) == 0xFFFFFFFF);
        assert!(P.is_torsion_free() == 0xFFFFFFFF);
        assert!(P.equals(Point::hash_to_curve(b"abc", ro).unwrap()) == 0);
    }

    #[test]
    fn scalar_hash() {
        let k = hash_to_scalar(b"abc", b"QUUX-V01-CS02-with-edwards25519_XMD:SHA-512_SC_").unwrap();
        assert_eq!(hex::encode(k.encode()),
            "9b37463197689c4c01698675e992667063543f696f88d1174bccb6c7edb8f502");
    }

    #[test]
    fn random_points() {
        let mut rng = Sha256Rng::new(b"edwards25519");
        let P = Point::random(&mut rng);
        let Q = Point::random(&mut rng);
        assert!(P.is_torsion_free() == 0xFFFFFFFF);
        assert!(P.equals(Q) == 0);
        assert!(P.isneutral() == 0);
    }
}

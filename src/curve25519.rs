//! Curve25519 (Montgomery form) and the X25519 function.
//!
//! Curve25519 is the Montgomery curve `v^2 = u^3 + 486662*u^2 + u` over
//! GF(2^255 - 19). It is birationally equivalent to edwards25519; this
//! module represents its points internally as edwards25519 points, so
//! that all group operations use the complete Edwards formulas, and
//! only converts to (u, v) coordinates for encoding and decoding.
//!
//! Compressed encoding of a point is the little-endian encoding of its
//! u coordinate (32 bytes); uncompressed encoding is u followed by v
//! (64 bytes). The neutral (point-at-infinity) has no affine
//! coordinates; it is encoded as all-zero bytes, and all-zero bytes
//! decode to the neutral. The point of order 2 (0, 0) thus shares its
//! encoding with the neutral. Decoding recovers v from u and uses the
//! root with an even representative.
//!
//! The `x25519()` function implements the X25519 primitive of
//! [RFC 7748] with the Montgomery ladder; it accepts any u coordinate
//! (including points on the quadratic twist) and is fully compatible
//! with `Point::mul_clamped()` for points of the curve.
//!
//! [RFC 7748]: https://datatracker.ietf.org/doc/html/rfc7748

#![allow(non_snake_case)]

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use tracing::trace;

use crate::{CryptoRng, RngCore};
use crate::edwards25519;
use crate::error::{Error, Result};
use crate::field::{GF25519, Scalar25519};
use crate::hash2curve::{self, Expander};
use crate::msm::mul_window;
use crate::weierstrass::bytes_are_zero;

/// Integers modulo the prime order of the curve25519 subgroup.
pub type Scalar = Scalar25519;

/// Hash-to-curve suite (random oracle).
pub const HASH_SUITE: &str = "curve25519_XMD:SHA-512_ELL2_RO_";

/// Encode-to-curve suite (non-uniform).
pub const ENCODE_SUITE: &str = "curve25519_XMD:SHA-512_ELL2_NU_";

/// Hash-to-scalar suite.
pub const SCALAR_SUITE: &str = "curve25519_XMD:SHA-512_SC_";

// (A - 2)/4 for the ladder.
const A24: GF25519 = GF25519::w64le(121665, 0, 0, 0);

/// A point on curve25519.
#[derive(Clone, Copy, Debug)]
pub struct Point(pub(crate) edwards25519::Point);

impl Point {

    /// The group neutral (point-at-infinity).
    pub const NEUTRAL: Self = Self(edwards25519::Point::NEUTRAL);

    /// The conventional base point (u = 9).
    pub const BASE: Self = Self(edwards25519::Point::BASE);

    // Right-hand side of the curve equation: u^3 + A*u^2 + u
    #[inline]
    fn rhs(u: GF25519) -> GF25519 {
        ((u + edwards25519::Point::J) * u + GF25519::ONE) * u
    }

    /// Returns the underlying edwards25519 point.
    #[inline(always)]
    pub fn to_edwards(self) -> edwards25519::Point {
        self.0
    }

    /// Builds a curve25519 point from an edwards25519 point.
    #[inline(always)]
    pub fn from_edwards(P: edwards25519::Point) -> Self {
        Self(P)
    }

    /// Gets the affine (u, v) coordinates of this point.
    ///
    /// The flag is 0xFFFFFFFF, except for the neutral, which yields
    /// (0, 0) and 0x00000000.
    pub fn to_affine(self) -> (GF25519, GF25519, u32) {
        let (u, v) = self.0.to_montgomery();
        (u, v, !self.0.isneutral())
    }

    /// Gets the affine u coordinate of this point.
    pub fn affine_x(self) -> Result<GF25519> {
        let (u, _, r) = self.to_affine();
        if r == 0 {
            return Err(Error::IdentityEncountered);
        }
        Ok(u)
    }

    /// Gets the affine v coordinate of this point.
    pub fn affine_y(self) -> Result<GF25519> {
        let (_, v, r) = self.to_affine();
        if r == 0 {
            return Err(Error::IdentityEncountered);
        }
        Ok(v)
    }

    /// Builds a point from affine coordinates.
    ///
    /// The v coordinate is recomputed from u and must match `v` up to
    /// the sign. (0, 0) is interpreted as the neutral.
    pub fn from_affine(u: GF25519, v: GF25519) -> Result<Self> {
        if (u.iszero() & v.iszero()) != 0 {
            return Ok(Self::NEUTRAL);
        }
        let (v0, r) = Self::rhs(u).sqrt();
        if (r & (v.equals(v0) | v.equals(-v0))) == 0 {
            trace!(curve = "curve25519", "Rejected affine coordinates");
            return Err(Error::NotOnCurve);
        }
        Ok(Self(edwards25519::Point::from_montgomery(u, v)))
    }

    /// Builds a point from encoded affine coordinates (32 bytes each,
    /// little-endian, canonical).
    pub fn from_affine_bytes(u: &[u8], v: &[u8]) -> Result<Self> {
        Self::from_affine(GF25519::decode(u)?, GF25519::decode(v)?)
    }

    /// Encodes this point (u coordinate, 32 bytes).
    pub fn encode(self) -> [u8; 32] {
        self.0.to_montgomery().0.encode()
    }

    /// Encodes this point (u then v, 64 bytes).
    pub fn encode_uncompressed(self) -> [u8; 64] {
        let (u, v) = self.0.to_montgomery();
        let mut r = [0u8; 64];
        r[..32].copy_from_slice(&u.encode());
        r[32..].copy_from_slice(&v.encode());
        r
    }

    /// Decodes a point from its u coordinate (32 bytes).
    ///
    /// The value must be canonical (in particular, the top bit must be
    /// zero). `NotOnCurve` is returned if u designates a point on the
    /// quadratic twist.
    ///
    /// The compressed encoding does not carry the sign of v; the
    /// returned point is the one whose v is even. Thus,
    /// `decode(encode(P))` is P or -P.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != 32 {
            trace!(curve = "curve25519", len = buf.len(), "Rejected point encoding length");
            return Err(Error::InvalidLength { expected: 32, actual: buf.len() });
        }
        let u = GF25519::decode(buf).map_err(|e| {
            trace!(curve = "curve25519", error = %e, "Rejected u coordinate");
            e
        })?;
        if u.iszero() != 0 {
            return Ok(Self::NEUTRAL);
        }
        let (v, r) = Self::rhs(u).sqrt();
        if r == 0 {
            trace!(curve = "curve25519", "Rejected u coordinate on the twist");
            return Err(Error::NotOnCurve);
        }
        Ok(Self(edwards25519::Point::from_montgomery(u, v)))
    }

    /// Decodes a point from its uncompressed encoding (64 bytes).
    pub fn decode_uncompressed(buf: &[u8]) -> Result<Self> {
        if buf.len() != 64 {
            return Err(Error::InvalidLength { expected: 64, actual: buf.len() });
        }
        Self::from_affine_bytes(&buf[..32], &buf[32..])
    }

    fn set_add(&mut self, rhs: &Self) {
        self.0 += rhs.0;
    }

    fn set_sub(&mut self, rhs: &Self) {
        self.0 -= rhs.0;
    }

    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.0.set_neg();
    }

    #[inline(always)]
    pub fn double(self) -> Self {
        Self(self.0.double())
    }

    #[inline(always)]
    pub fn xdouble(self, n: u32) -> Self {
        Self(self.0.xdouble(n))
    }

    /// Multiplies this point by a scalar (in place).
    pub fn set_mul(&mut self, n: &Scalar) {
        self.0.set_mul(n);
    }

    /// Multiplies this point by a small integer (not constant-time with
    /// regard to `n`).
    pub fn set_mul_small(&mut self, n: u64) {
        self.0.set_mul_small(n);
    }

    /// Multiplies this point by a 32-byte scalar after X25519 clamping
    /// (bits 0, 1, 2 and 255 cleared, bit 254 set). The clamped value is
    /// used as an integer, without reduction.
    pub fn mul_clamped(self, scalar: &[u8; 32]) -> Self {
        let mut k = *scalar;
        k[0] &= 248;
        k[31] &= 127;
        k[31] |= 64;
        Self(mul_window(&self.0, &k))
    }

    #[inline(always)]
    pub fn equals(self, rhs: Self) -> u32 {
        self.0.equals(rhs.0)
    }

    #[inline(always)]
    pub fn isneutral(self) -> u32 {
        self.0.isneutral()
    }

    #[inline(always)]
    pub fn has_low_order(self) -> u32 {
        self.0.has_low_order()
    }

    #[inline(always)]
    pub fn is_torsion_free(self) -> u32 {
        self.0.is_torsion_free()
    }

    #[inline(always)]
    pub fn set_cond(&mut self, P: &Self, ctl: u32) {
        self.0.set_cond(&P.0, ctl);
    }

    #[inline(always)]
    pub fn select(P0: &Self, P1: &Self, ctl: u32) -> Self {
        Self(edwards25519::Point::select(&P0.0, &P1.0, ctl))
    }

    #[inline(always)]
    pub fn set_condneg(&mut self, ctl: u32) {
        self.0.set_condneg(ctl);
    }

    /// Maps a field element to a curve point with Elligator2. The
    /// cofactor is not cleared.
    pub fn map_to_curve(e: &GF25519) -> Self {
        Self(edwards25519::Point::map_to_curve(e))
    }

    /// Hashes a message to a point of the prime-order subgroup (RFC 9380
    /// `hash_to_curve`).
    pub fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self> {
        Ok(Self(edwards25519::Point::hash_to_curve(msg, dst)?))
    }

    /// Encodes a message to a point of the prime-order subgroup (RFC 9380
    /// `encode_to_curve`).
    pub fn encode_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self> {
        Ok(Self(edwards25519::Point::encode_to_curve(msg, dst)?))
    }

    /// Hashes a message to a point with the default DST.
    pub fn hash(msg: &[u8]) -> Result<Self> {
        Self::hash_to_curve(msg, &hash2curve::default_dst(HASH_SUITE))
    }

    /// Samples a uniform point of the prime-order subgroup.
    pub fn random<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        Self(edwards25519::Point::random(rng))
    }
}

point_ops!(Point, Scalar);
impl_curve_point!(Point, Scalar, GF25519, 32, 64);

/// Hashes a message to a scalar (RFC 9380 `hash_to_field` modulo the
/// subgroup order).
pub fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Scalar> {
    let k: Vec<Scalar> = hash2curve::hash_to_field(Expander::XmdSha512, msg, dst, 1)?;
    Ok(k[0])
}

// u coordinates of the points of order 4 and 8 (the other low-order
// points have u = 0, 1 or -1).
const ORDER8_U1: GF25519 = GF25519::w64be(
    0x00B8495F16056286, 0xFDB1329CEB8D09DA,
    0x6AC49FF1FAE35616, 0xAEB8413B7C7AEBE0);
const ORDER8_U2: GF25519 = GF25519::w64be(
    0x57119FD0DD4E22D8, 0x868E1C58C45C4404,
    0x5BEF839C55B1D0B1, 0x248C50A3BC959C5F);

/// Tests whether the raw 32 bytes of a u coordinate are one of the 12
/// usual low-order public key encodings.
///
/// All 256 bits are interpreted (the top bit is not masked), then the
/// value is reduced modulo p; the list thus includes the non-canonical
/// forms of u = 0, 1 and -1 and the top-bit-set forms of the order-8
/// u coordinates. This is a filter on bytes, not on the point that
/// `x25519()` sees: five listed encodings designate, once the top bit
/// is cleared, ordinary points; conversely, some encodings not in the
/// list (e.g. p + 1 with the top bit set) are low-order for `x25519()`.
/// Use `x25519_checked()` to reject both kinds.
///
/// Returned value is 0xFFFFFFFF for a listed encoding, 0x00000000
/// otherwise. This function is constant-time.
pub fn is_small_order_u(u: &[u8; 32]) -> u32 {
    // All 256 bits are used, then reduced.
    let x = GF25519::decode_reduce(&u[..]);
    x.iszero()
        | x.equals(GF25519::ONE)
        | x.equals(GF25519::MINUS_ONE)
        | x.equals(ORDER8_U1)
        | x.equals(ORDER8_U2)
}

/// X25519 function (RFC 7748, section 5).
///
/// The scalar is clamped, then used to multiply the point of u
/// coordinate `u` (little-endian; the top bit is ignored, non-canonical
/// values are accepted). The u coordinate of the result is returned.
/// No input is rejected; if the input, with its top bit cleared,
/// designates a low-order point, then the output is all-zero.
pub fn x25519(scalar: &[u8; 32], u: &[u8; 32]) -> [u8; 32] {
    let mut s = *scalar;
    s[0] &= 248;
    s[31] &= 127;
    s[31] |= 64;

    let mut ub = *u;
    ub[31] &= 127;
    let x1 = GF25519::decode_reduce(&ub[..]);

    let mut x2 = GF25519::ONE;
    let mut z2 = GF25519::ZERO;
    let mut x3 = x1;
    let mut z3 = GF25519::ONE;
    let mut swap = 0u32;

    for t in (0..255).rev() {
        let kt = (((s[t >> 3] >> (t & 7)) & 1) as u32).wrapping_neg();
        swap ^= kt;
        GF25519::cswap(&mut x2, &mut x3, swap);
        GF25519::cswap(&mut z2, &mut z3, swap);
        swap = kt;

        let A = x2 + z2;
        let B = x2 - z2;
        let AA = A.square();
        let BB = B.square();
        let C = x3 + z3;
        let D = x3 - z3;
        let E = AA - BB;
        let DA = D * A;
        let CB = C * B;
        x3 = (DA + CB).square();
        z3 = x1 * (DA - CB).square();
        x2 = AA * BB;
        z2 = E * (AA + A24 * E);
    }
    GF25519::cswap(&mut x2, &mut x3, swap);
    GF25519::cswap(&mut z2, &mut z3, swap);

    (x2 / z2).encode()
}

/// X25519 function with public key validation.
///
/// `IdentityEncountered` is returned if `u` is one of the encodings
/// flagged by `is_small_order_u()`, or if the output is all-zero (the
/// input designates a low-order point once its top bit is cleared).
/// Otherwise, this is the same as `x25519()`.
pub fn x25519_checked(scalar: &[u8; 32], u: &[u8; 32]) -> Result<[u8; 32]> {
    let r = x25519(scalar, u);
    if (is_small_order_u(u) | bytes_are_zero(&r)) != 0 {
        trace!(curve = "curve25519", "Rejected low-order u coordinate");
        return Err(Error::IdentityEncountered);
    }
    Ok(r)
}

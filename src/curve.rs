//! Curve facade.
//!
//! `CurvePoint` is the operation set shared by the four point types of
//! this crate; generic code (multi-scalar multiplication, protocol code
//! built on top of this crate) is written against it. `Curve` binds, for
//! a given curve, the point and scalar types together with the curve
//! parameters (`CurveParams`), and offers the entry points used by
//! consumers: sampling, decoding, hashing and multiplications.
//!
//! The curves are the unit structs `Edwards25519`, `Curve25519`, `P256`
//! and `Secp256k1`. Their parameters are built on first access and then
//! shared for the lifetime of the process; concurrent first accesses
//! all observe the same, fully initialized instance.

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Neg, Sub};
use std::sync::OnceLock;

use tracing::debug;

use crate::{CryptoRng, RngCore};
use crate::{curve25519, edwards25519, p256, secp256k1};
use crate::error::Result;
use crate::field::{GF25519, GFp256, GFsecp256k1};
use crate::hash2curve;
use crate::msm;

/// Operations shared by all point types.
///
/// Functions returning a `u32` use the crate-wide convention:
/// 0xFFFFFFFF for true, 0x00000000 for false. Constant-time behaviour
/// is the same as for the corresponding inherent methods of each point
/// type.
pub trait CurvePoint:
    Copy + Debug + Send + Sync + 'static
    + Add<Output = Self> + AddAssign + Sub<Output = Self> + Neg<Output = Self>
{
    /// Integers modulo the order of the prime-order subgroup.
    type Scalar: Copy + Debug + Send + Sync;

    /// Base field of the affine coordinates.
    type Field: Copy + Debug + Send + Sync;

    /// Length of the compressed encoding, in bytes.
    const COMPRESSED_LEN: usize;

    /// Length of the uncompressed encoding, in bytes.
    const UNCOMPRESSED_LEN: usize;

    /// Returns the group identity.
    fn identity() -> Self;

    /// Returns the conventional generator.
    fn generator() -> Self;

    /// Tests whether this point is the identity.
    fn is_identity(&self) -> u32;

    /// Tests whether two points are equal.
    fn equals(&self, other: &Self) -> u32;

    /// Returns the double of this point.
    fn double(&self) -> Self;

    /// Returns this point doubled `n` times.
    fn xdouble(&self, n: u32) -> Self;

    /// Replaces this point with `other` if `ctl` is 0xFFFFFFFF.
    fn set_cond(&mut self, other: &Self, ctl: u32);

    /// Multiplies this point by a scalar.
    fn mul_scalar(&self, s: &Self::Scalar) -> Self;

    /// Tests whether this point is in the prime-order subgroup.
    fn is_torsion_free(&self) -> u32;

    /// Compressed encoding (`COMPRESSED_LEN` bytes).
    fn to_compressed(&self) -> Vec<u8>;

    /// Uncompressed encoding (`UNCOMPRESSED_LEN` bytes).
    fn to_uncompressed(&self) -> Vec<u8>;

    /// Decodes a compressed encoding.
    fn from_compressed(buf: &[u8]) -> Result<Self>;

    /// Decodes an uncompressed encoding.
    fn from_uncompressed(buf: &[u8]) -> Result<Self>;

    /// Samples a uniform point of the prime-order subgroup.
    fn random<T: CryptoRng + RngCore>(rng: &mut T) -> Self;

    /// Builds a point from affine coordinates, checking the curve
    /// equation.
    fn from_affine_coords(x: Self::Field, y: Self::Field) -> Result<Self>;

    /// Gets the affine coordinates. `IdentityEncountered` is returned
    /// for an identity without affine coordinates (all curves except
    /// edwards25519, whose identity is (0, 1)).
    fn affine_coords(&self) -> Result<(Self::Field, Self::Field)>;
}

/// Parameters of a curve.
#[derive(Clone, Debug)]
pub struct CurveParams<P> {
    /// Curve name.
    pub name: &'static str,
    /// Size of an encoded field element or scalar, in bytes.
    pub element_size: usize,
    /// Size of a compressed point, in bytes.
    pub compressed_size: usize,
    /// Size of an uncompressed point, in bytes.
    pub uncompressed_size: usize,
    /// Base field modulus (unsigned big-endian).
    pub modulus: [u8; 32],
    /// Prime order of the generator (unsigned big-endian).
    pub order: [u8; 32],
    /// Ratio between the curve order and the subgroup order.
    pub cofactor: u64,
    /// Conventional generator.
    pub generator: P,
    /// Hash-to-curve suite identifier.
    pub hash_suite: &'static str,
    /// DST used by `Curve::hash()`.
    pub default_dst: Vec<u8>,
}

fn be_bytes(limbs: &[u64; 4]) -> [u8; 32] {
    let mut r = [0u8; 32];
    for i in 0..4 {
        r[(24 - 8 * i)..(32 - 8 * i)].copy_from_slice(&limbs[i].to_be_bytes());
    }
    r
}

fn make_params<P: CurvePoint>(name: &'static str, modulus: &[u64; 4],
    order: &[u64; 4], cofactor: u64, hash_suite: &'static str)
    -> CurveParams<P>
{
    debug!(curve = name, "Initializing curve parameters");
    CurveParams {
        name,
        element_size: 32,
        compressed_size: P::COMPRESSED_LEN,
        uncompressed_size: P::UNCOMPRESSED_LEN,
        modulus: be_bytes(modulus),
        order: be_bytes(order),
        cofactor,
        generator: P::generator(),
        hash_suite,
        default_dst: hash2curve::default_dst(hash_suite),
    }
}

/// A curve, with its point and scalar types and its parameters.
pub trait Curve {
    /// Point type.
    type Point: CurvePoint<Scalar = Self::Scalar, Field = Self::Field>;
    /// Scalar type (integers modulo the subgroup order).
    type Scalar: Copy + Debug + Send + Sync;
    /// Base field type.
    type Field: Copy + Debug + Send + Sync;

    /// Returns the curve parameters (built on first call).
    fn params() -> &'static CurveParams<Self::Point>;

    /// Decodes a scalar (canonical encoding, curve endianness).
    fn scalar_from_bytes(buf: &[u8]) -> Result<Self::Scalar>;

    /// Samples a uniform scalar.
    fn random_scalar<T: CryptoRng + RngCore>(rng: &mut T) -> Self::Scalar;

    /// Builds a point from its encoded affine coordinates, verifying
    /// that they match the curve equation.
    fn point_from_affine(x: &[u8], y: &[u8]) -> Result<Self::Point>;

    /// Hashes a message to a point, with an explicit DST.
    fn hash_with_dst(msg: &[u8], dst: &[u8]) -> Result<Self::Point>;

    /// Hashes a message to a scalar, with an explicit DST.
    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Self::Scalar>;

    /// Curve name.
    fn name() -> &'static str {
        Self::params().name
    }

    /// Conventional generator.
    fn generator() -> Self::Point {
        Self::params().generator
    }

    /// Group identity.
    fn identity() -> Self::Point {
        <Self::Point as CurvePoint>::identity()
    }

    /// Samples a uniform point of the prime-order subgroup.
    fn random_point<T: CryptoRng + RngCore>(rng: &mut T) -> Self::Point {
        <Self::Point as CurvePoint>::random(rng)
    }

    /// Decodes a compressed point.
    fn point_from_compressed(buf: &[u8]) -> Result<Self::Point> {
        <Self::Point as CurvePoint>::from_compressed(buf)
    }

    /// Decodes an uncompressed point.
    fn point_from_uncompressed(buf: &[u8]) -> Result<Self::Point> {
        <Self::Point as CurvePoint>::from_uncompressed(buf)
    }

    /// Hashes a message to a point, with the curve's default DST.
    fn hash(msg: &[u8]) -> Result<Self::Point> {
        Self::hash_with_dst(msg, &Self::params().default_dst)
    }

    /// Multiplies a point by a scalar.
    fn scalar_mul(p: &Self::Point, s: &Self::Scalar) -> Self::Point {
        p.mul_scalar(s)
    }

    /// Computes a linear combination of points.
    fn multi_scalar_mul(scalars: &[Self::Scalar], points: &[Self::Point])
        -> Result<Self::Point>
    {
        msm::multi_scalar_mul(scalars, points)
    }

    /// Builds a point from decoded affine coordinates.
    fn point_from_coords(x: Self::Field, y: Self::Field) -> Result<Self::Point> {
        <Self::Point as CurvePoint>::from_affine_coords(x, y)
    }

    /// Gets the affine coordinates of a point.
    fn point_coords(p: &Self::Point) -> Result<(Self::Field, Self::Field)> {
        p.affine_coords()
    }

    /// Tests whether a point is in the prime-order subgroup.
    fn is_torsion_free(p: &Self::Point) -> bool {
        p.is_torsion_free() != 0
    }
}

/// Twisted Edwards curve edwards25519.
#[derive(Clone, Copy, Debug)]
pub struct Edwards25519;

/// Montgomery curve curve25519.
#[derive(Clone, Copy, Debug)]
pub struct Curve25519;

/// NIST curve P-256 (secp256r1).
#[derive(Clone, Copy, Debug)]
pub struct P256;

/// SEC curve secp256k1.
#[derive(Clone, Copy, Debug)]
pub struct Secp256k1;

impl Curve for Edwards25519 {
    type Point = edwards25519::Point;
    type Scalar = edwards25519::Scalar;
    type Field = GF25519;

    fn params() -> &'static CurveParams<Self::Point> {
        static PARAMS: OnceLock<CurveParams<edwards25519::Point>> = OnceLock::new();
        PARAMS.get_or_init(|| make_params("edwards25519", &GF25519::MODULUS,
            &edwards25519::Scalar::MODULUS, 8, edwards25519::HASH_SUITE))
    }

    fn scalar_from_bytes(buf: &[u8]) -> Result<Self::Scalar> {
        edwards25519::Scalar::decode(buf)
    }

    fn random_scalar<T: CryptoRng + RngCore>(rng: &mut T) -> Self::Scalar {
        edwards25519::Scalar::random(rng)
    }

    fn point_from_affine(x: &[u8], y: &[u8]) -> Result<Self::Point> {
        edwards25519::Point::from_affine_bytes(x, y)
    }

    fn hash_with_dst(msg: &[u8], dst: &[u8]) -> Result<Self::Point> {
        edwards25519::Point::hash_to_curve(msg, dst)
    }

    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Self::Scalar> {
        edwards25519::hash_to_scalar(msg, dst)
    }
}

impl Curve for Curve25519 {
    type Point = curve25519::Point;
    type Scalar = curve25519::Scalar;
    type Field = GF25519;

    fn params() -> &'static CurveParams<Self::Point> {
        static PARAMS: OnceLock<CurveParams<curve25519::Point>> = OnceLock::new();
        PARAMS.get_or_init(|| make_params("curve25519", &GF25519::MODULUS,
            &curve25519::Scalar::MODULUS, 8, curve25519::HASH_SUITE))
    }

    fn scalar_from_bytes(buf: &[u8]) -> Result<Self::Scalar> {
        curve25519::Scalar::decode(buf)
    }

    fn random_scalar<T: CryptoRng + RngCore>(rng: &mut T) -> Self::Scalar {
        curve25519::Scalar::random(rng)
    }

    fn point_from_affine(u: &[u8], v: &[u8]) -> Result<Self::Point> {
        curve25519::Point::from_affine_bytes(u, v)
    }

    fn hash_with_dst(msg: &[u8], dst: &[u8]) -> Result<Self::Point> {
        curve25519::Point::hash_to_curve(msg, dst)
    }

    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Self::Scalar> {
        curve25519::hash_to_scalar(msg, dst)
    }
}

impl Curve for P256 {
    type Point = p256::Point;
    type Scalar = p256::Scalar;
    type Field = GFp256;

    fn params() -> &'static CurveParams<Self::Point> {
        static PARAMS: OnceLock<CurveParams<p256::Point>> = OnceLock::new();
        PARAMS.get_or_init(|| make_params("P-256", &GFp256::MODULUS,
            &p256::Scalar::MODULUS, 1, p256::HASH_SUITE))
    }

    fn scalar_from_bytes(buf: &[u8]) -> Result<Self::Scalar> {
        p256::Scalar::decode(buf)
    }

    fn random_scalar<T: CryptoRng + RngCore>(rng: &mut T) -> Self::Scalar {
        p256::Scalar::random(rng)
    }

    fn point_from_affine(x: &[u8], y: &[u8]) -> Result<Self::Point> {
        p256::Point::from_affine_bytes(x, y)
    }

    fn hash_with_dst(msg: &[u8], dst: &[u8]) -> Result<Self::Point> {
        p256::Point::hash_to_curve(msg, dst)
    }

    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Self::Scalar> {
        p256::hash_to_scalar(msg, dst)
    }
}

impl Curve for Secp256k1 {
    type Point = secp256k1::Point;
    type Scalar = secp256k1::Scalar;
    type Field = GFsecp256k1;

    fn params() -> &'static CurveParams<Self::Point> {
        static PARAMS: OnceLock<CurveParams<secp256k1::Point>> = OnceLock::new();
        PARAMS.get_or_init(|| make_params("secp256k1", &GFsecp256k1::MODULUS,
            &secp256k1::Scalar::MODULUS, 1, secp256k1::HASH_SUITE))
    }

    fn scalar_from_bytes(buf: &[u8]) -> Result<Self::Scalar> {
        secp256k1::Scalar::decode(buf)
    }

    fn random_scalar<T: CryptoRng + RngCore>(rng: &mut T) -> Self::Scalar {
        secp256k1::Scalar::random(rng)
    }

    fn point_from_affine(x: &[u8], y: &[u8]) -> Result<Self::Point> {
        secp256k1::Point::from_affine_bytes(x, y)
    }

    fn hash_with_dst(msg: &[u8], dst: &[u8]) -> Result<Self::Point> {
        secp256k1::Point::hash_to_curve(msg, dst)
    }

    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Self::Scalar> {
        secp256k1::hash_to_scalar(msg, dst)
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {

    use super::*;
    use crate::error::Error;
    use crate::test_rng::Sha256Rng;

    fn check_curve<C: Curve>(rng: &mut Sha256Rng, zero_identity: bool) {
        let G = C::generator();
        let O = C::identity();
        assert!(O.is_identity() == 0xFFFFFFFF);
        assert!(G.is_identity() == 0);
        assert!(C::is_torsion_free(&G));

        // Identity encoding decodes back; it is all zeros except for
        // edwards25519 (y = 1).
        let enc = O.to_compressed();
        assert_eq!(enc.len(), C::params().compressed_size);
        assert_eq!(enc.iter().all(|&b| b == 0), zero_identity);
        let O2 = C::point_from_compressed(&enc).unwrap();
        assert!(O2.is_identity() == 0xFFFFFFFF);

        let s = C::random_scalar(rng);
        let t = C::random_scalar(rng);
        let P = C::scalar_mul(&G, &s);
        let Q = C::random_point(rng);
        assert!(C::is_torsion_free(&Q));

        // Compressed curve25519 points lose the sign of v.
        let R = C::point_from_compressed(&P.to_compressed()).unwrap();
        assert!((R.equals(&P) | R.equals(&-P)) == 0xFFFFFFFF);
        assert_eq!(R.to_compressed(), P.to_compressed());
        let R = C::point_from_uncompressed(&P.to_uncompressed()).unwrap();
        assert!(R.equals(&P) == 0xFFFFFFFF);
        assert_eq!(P.to_uncompressed().len(), C::params().uncompressed_size);

        let M = C::multi_scalar_mul(&[s, t], &[G, Q]).unwrap();
        let N = C::scalar_mul(&G, &s) + C::scalar_mul(&Q, &t);
        assert!(M.equals(&N) == 0xFFFFFFFF);
        assert_eq!(C::multi_scalar_mul(&[s], &[G, Q]).unwrap_err(),
            Error::MismatchedLengths { scalars: 1, points: 2 });

        let H1 = C::hash(b"facade").unwrap();
        let H2 = C::hash_with_dst(b"facade", &C::params().default_dst).unwrap();
        let H3 = C::hash_with_dst(b"facade", b"another DST").unwrap();
        assert!(H1.equals(&H2) == 0xFFFFFFFF);
        assert!(H1.equals(&H3) == 0);
        assert!(C::is_torsion_free(&H1));

        let k1 = C::hash_to_scalar(b"facade", b"DST").unwrap();
        let k2 = C::hash_to_scalar(b"facade", b"DST").unwrap();
        let P1 = C::scalar_mul(&G, &k1);
        let P2 = C::scalar_mul(&G, &k2);
        assert!(P1.equals(&P2) == 0xFFFFFFFF);
    }

    #[test]
    fn curves() {
        let mut rng = Sha256Rng::new(b"curve facade");
        check_curve::<Edwards25519>(&mut rng, false);
        check_curve::<Curve25519>(&mut rng, true);
        check_curve::<P256>(&mut rng, true);
        check_curve::<Secp256k1>(&mut rng, true);
    }

    #[test]
    fn params() {
        let p = P256::params();
        assert_eq!(p.name, "P-256");
        assert_eq!(p.cofactor, 1);
        assert_eq!(hex::encode(p.order),
            "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");
        assert_eq!(hex::encode(Edwards25519::params().modulus),
            "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed");
        assert_eq!(Curve25519::name(), "curve25519");
        assert_eq!(Secp256k1::params().compressed_size, 33);
        assert_eq!(Edwards25519::params().uncompressed_size, 64);
        assert!(core::ptr::eq(P256::params(), P256::params()));
    }

    #[test]
    fn concurrent_init() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| Secp256k1::params() as *const _ as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.iter().all(|&a| a == addrs[0]));
    }

    #[test]
    fn affine_entry_point() {
        let G = P256::generator();
        let (x, y, ok) = G.to_affine();
        assert!(ok == 0xFFFFFFFF);
        let P = P256::point_from_affine(&x.encode(), &y.encode()).unwrap();
        assert!(P.equals(G) == 0xFFFFFFFF);
        let y1 = y + GFp256::ONE;
        assert_eq!(P256::point_from_affine(&x.encode(), &y1.encode()).unwrap_err(),
            Error::NotOnCurve);
        assert_eq!(P256::point_from_affine(&x.encode()[..31], &y.encode()).unwrap_err(),
            Error::InvalidLength { expected: 32, actual: 31 });
    }

    fn check_coords<C: Curve>(rng: &mut Sha256Rng, affine_identity: bool) {
        let P = C::random_point(rng);
        let (x, y) = C::point_coords(&P).unwrap();
        let Q = C::point_from_coords(x, y).unwrap();
        assert!(Q.equals(&P) == 0xFFFFFFFF);
        match C::point_coords(&C::identity()) {
            Ok((x0, y0)) => {
                assert!(affine_identity);
                let O = C::point_from_coords(x0, y0).unwrap();
                assert!(O.is_identity() == 0xFFFFFFFF);
            }
            Err(e) => {
                assert!(!affine_identity);
                assert_eq!(e, Error::IdentityEncountered);
            }
        }
        // Swapped coordinates are not on the curve for a random point.
        assert_eq!(C::point_from_coords(y, x).unwrap_err(), Error::NotOnCurve);
    }

    #[test]
    fn field_coords() {
        let mut rng = Sha256Rng::new(b"field coords");
        check_coords::<Edwards25519>(&mut rng, true);
        check_coords::<Curve25519>(&mut rng, false);
        check_coords::<P256>(&mut rng, false);
        check_coords::<Secp256k1>(&mut rng, false);
    }
}

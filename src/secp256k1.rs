//! secp256k1 curve implementation.
//!
//! This module implements group operations on the secp256k1 elliptic
//! curve, a short Weierstraß curve with equation `y^2 = x^3 + 7`. This
//! curve is standardized in SEC 2.
//!
//! The curve has prime order. "Scalars" are integers modulo that prime
//! order (`Scalar` type), encoded over 32 bytes in unsigned big-endian
//! convention.
//!
//! Points use Jacobian coordinates, with the same SEC 1 encodings as
//! the `p256` module (33 bytes compressed, 65 bytes uncompressed, zeros
//! or a single 0x00 byte for the point-at-infinity).
//!
//! Since `a = 0` for this curve, the Simplified SWU map cannot be
//! applied directly: hashing to the curve ([RFC 9380], suite
//! `secp256k1_XMD:SHA-256_SSWU_RO_`) maps to a 3-isogenous curve
//! `y^2 = x^3 + A'*x + B'`, then applies the isogeny.
//!
//! [RFC 9380]: https://datatracker.ietf.org/doc/html/rfc9380

#![allow(non_snake_case)]

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use tracing::trace;

use crate::{CryptoRng, RngCore};
use crate::error::{Error, Result};
use crate::field::{GFsecp256k1, ScalarSecp256k1};
use crate::hash2curve::{self, Expander};
use crate::msm::mul_window;

/// Integers modulo the curve order n.
pub type Scalar = ScalarSecp256k1;

/// Hash-to-curve suite (random oracle).
pub const HASH_SUITE: &str = "secp256k1_XMD:SHA-256_SSWU_RO_";

/// Encode-to-curve suite (non-uniform).
pub const ENCODE_SUITE: &str = "secp256k1_XMD:SHA-256_SSWU_NU_";

/// Hash-to-scalar suite.
pub const SCALAR_SUITE: &str = "secp256k1_XMD:SHA-256_SC_";

weierstrass_point!(GFsecp256k1, "secp256k1", Expander::XmdSha256);

impl Point {

    /// The conventional base point in the curve.
    pub const BASE: Self = Self {
        X: GFsecp256k1::w64be(
            0x79BE667EF9DCBBAC, 0x55A06295CE870B07,
            0x029BFCDB2DCE28D9, 0x59F2815B16F81798),
        Y: GFsecp256k1::w64be(
            0x483ADA7726A3C465, 0x5DA4FBFC0E1108A8,
            0xFD17B448A6855419, 0x9C47D08FFB10D4B8),
        Z: GFsecp256k1::ONE,
    };

    const B: GFsecp256k1 = GFsecp256k1::w64be(0, 0, 0, 7);

    // Isogenous curve y^2 = x^3 + A'*x + B', with Z = -11.
    const SSWU_A: GFsecp256k1 = GFsecp256k1::w64be(
        0x3F8731ABDD661ADC, 0xA08A5558F0F5D272,
        0xE953D363CB6F0E5D, 0x405447C01A444533);
    const SSWU_B: GFsecp256k1 = GFsecp256k1::w64be(0, 0, 0, 1771);
    const SSWU_Z: GFsecp256k1 = GFsecp256k1::w64be(
        0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF,
        0xFFFFFFFFFFFFFFFF, 0xFFFFFFFEFFFFFC24);

    // -B'/A'
    const SSWU_C1: GFsecp256k1 = GFsecp256k1::w64be(
        0x0BC56CEE718538B2, 0xA00C4DF5D3E87B0C,
        0x6DF4FF98E82D74FD, 0xAA01D58E8D2345C3);

    // B'/(Z*A')
    const SSWU_C2: GFsecp256k1 = GFsecp256k1::w64be(
        0xBB407E4438DD90CA, 0x6BA4071659152275,
        0x7E5C173C7232AD8B, 0x6C8BCD97DE490391);

    // Coefficients of the 3-isogeny map (RFC 9380, appendix E.1), in
    // order: k_(1,0..3), k_(2,0..1), k_(3,0..3), k_(4,0..2).
    const ISO_K: [GFsecp256k1; 13] = [
        GFsecp256k1::w64be(
            0x8E38E38E38E38E38, 0xE38E38E38E38E38E,
            0x38E38E38E38E38E3, 0x8E38E38DAAAAA8C7),
        GFsecp256k1::w64be(
            0x07D3D4C80BC321D5, 0xB9F315CEA7FD44C5,
            0xD595D2FC0BF63B92, 0xDFFF1044F17C6581),
        GFsecp256k1::w64be(
            0x534C328D23F234E6, 0xE2A413DECA25CAEC,
            0xE4506144037C4031, 0x4ECBD0B53D9DD262),
        GFsecp256k1::w64be(
            0x8E38E38E38E38E38, 0xE38E38E38E38E38E,
            0x38E38E38E38E38E3, 0x8E38E38DAAAAA88C),
        GFsecp256k1::w64be(
            0xD35771193D94918A, 0x9CA34CCBB7B640DD,
            0x86CD409542F8487D, 0x9FE6B745781EB49B),
        GFsecp256k1::w64be(
            0xEDADC6F64383DC1D, 0xF7C4B2D51B542254,
            0x06D36B641F5E41BB, 0xC52A56612A8C6D14),
        GFsecp256k1::w64be(
            0x4BDA12F684BDA12F, 0x684BDA12F684BDA1,
            0x2F684BDA12F684BD, 0xA12F684B8E38E23C),
        GFsecp256k1::w64be(
            0xC75E0C32D5CB7C0F, 0xA9D0A54B12A0A6D5,
            0x647AB046D686DA6F, 0xDFFC90FC201D71A3),
        GFsecp256k1::w64be(
            0x29A6194691F91A73, 0x715209EF6512E576,
            0x722830A201BE2018, 0xA765E85A9ECEE931),
        GFsecp256k1::w64be(
            0x2F684BDA12F684BD, 0xA12F684BDA12F684,
            0xBDA12F684BDA12F6, 0x84BDA12F38E38D84),
        GFsecp256k1::w64be(
            0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF,
            0xFFFFFFFFFFFFFFFF, 0xFFFFFFFEFFFFF93B),
        GFsecp256k1::w64be(
            0x7A06534BB8BDB49F, 0xD5E9E6632722C298,
            0x9467C1BFC8E8D978, 0xDFB425D2685C2573),
        GFsecp256k1::w64be(
            0x6484AA716545CA2C, 0xF3A70C3FA8FE337E,
            0x0A3D21162F0D6299, 0xA7BF8192BFD2A76F),
    ];

    // x^3 + 7
    fn rhs(x: GFsecp256k1) -> GFsecp256k1 {
        x.square() * x + Self::B
    }

    /// Doubles this point (in place).
    pub fn set_double(&mut self) {
        let (X, Y, Z) = (&self.X, &self.Y, &self.Z);

        // Formulas for a = 0:
        // https://www.hyperelliptic.org/EFD/g1p/auto-shortw-jacobian-0.html#doubling-dbl-2009-l
        let A = X.square();
        let B = Y.square();
        let C = B.square();
        let D = ((X + B).square() - A - C).mul2();
        let E = A.mul3();
        let X3 = E.square() - D.mul2();
        let Y3 = E * (D - X3) - C.mul8();
        let Z3 = (Y * Z).mul2();

        self.X = X3;
        self.Y = Y3;
        self.Z = Z3;
    }

    // Applies the 3-isogeny to the affine point (x, y) of the isogenous
    // curve. The output is in Jacobian coordinates, with Z = xd*yd for
    // the denominators xd and yd of the rational maps; it is the
    // neutral when one of them is zero.
    fn iso_map(x: GFsecp256k1, y: GFsecp256k1) -> Self {
        let k = &Self::ISO_K;
        let xn = ((k[3] * x + k[2]) * x + k[1]) * x + k[0];
        let xd = (x + k[5]) * x + k[4];
        let yn = ((k[9] * x + k[8]) * x + k[7]) * x + k[6];
        let yd = ((x + k[12]) * x + k[11]) * x + k[10];
        let t = xd * yd;
        Self {
            X: xn * yd * t,
            Y: y * yn * t.square() * xd,
            Z: t,
        }
    }

    /// Maps a field element to a curve point (Simplified SWU on the
    /// isogenous curve, then the isogeny).
    pub fn map_to_curve(u: &GFsecp256k1) -> Self {
        let (x, y) = Self::map_sswu(u);
        Self::iso_map(x, y)
    }
}

#[cfg(test)]
mod tests {

    use super::{Point, Scalar, hash_to_scalar};
    use crate::error::Error;
    use crate::field::GFsecp256k1;
    use crate::test_rng::Sha256Rng;

    fn check_h2c(P: Point, ex: &str, ey: &str) {
        let (x, y, ok) = P.to_affine();
        assert!(ok == 0xFFFFFFFF);
        assert_eq!(hex::encode(x.encode()), ex);
        assert_eq!(hex::encode(y.encode()), ey);
    }

    #[test]
    fn base_encoding() {
        let G = Point::BASE;
        assert_eq!(hex::encode(G.encode()),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        assert!(Point::decode(&G.encode()).unwrap().equals(G) == 0xFFFFFFFF);
        let P = Point::decode_uncompressed(&G.encode_uncompressed()).unwrap();
        assert!(P.equals(G) == 0xFFFFFFFF);
        assert_eq!(hex::encode(&G.encode_uncompressed()[33..]),
            "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");
    }

    #[test]
    fn group_law() {
        let G = Point::BASE;
        let G2 = G + G;
        let G3 = G2 + G;
        assert_eq!(hex::encode(G2.encode()),
            "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5");
        assert_eq!(hex::encode(G3.encode()),
            "02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9");
        assert!(G2.equals(G.double()) == 0xFFFFFFFF);
        assert!((G3 - G2).equals(G) == 0xFFFFFFFF);
        assert!((G3 + (-G3)).isneutral() == 0xFFFFFFFF);
        assert!((G * 8u64).equals(G.xdouble(3)) == 0xFFFFFFFF);
        assert!((G * 0u64).isneutral() == 0xFFFFFFFF);
        assert!((G2 + Point::NEUTRAL).equals(G2) == 0xFFFFFFFF);
        assert!((Point::NEUTRAL + Point::NEUTRAL).isneutral() == 0xFFFFFFFF);
    }

    #[test]
    fn scalar_mul() {
        let G = Point::BASE;
        assert_eq!(hex::encode((G * Scalar::MINUS_ONE).encode()),
            "0379be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        let k = Scalar::decode(&hex::decode(
            "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef")
            .unwrap()).unwrap();
        assert_eq!(hex::encode((G * k).encode()),
            "034646ae5047316b4230d0086c8acec687f00b1cd9d1dc634f6cb358ac0a9a8fff");
        let a = Scalar::from_u32(1000);
        let b = Scalar::from_u32(337);
        assert!((G * a + G * b).equals(G * (a + b)) == 0xFFFFFFFF);
        assert!(((G * a) * b).equals(G * (a * b)) == 0xFFFFFFFF);
    }

    #[test]
    fn decode_failures() {
        let G = Point::BASE;
        let mut buf = G.encode();
        buf[0] = 0x00;
        assert_eq!(Point::decode(&buf).unwrap_err(), Error::InvalidEncoding);

        // x = 0: 7 is not a square modulo p.
        let mut buf = [0u8; 33];
        buf[0] = 0x03;
        assert_eq!(Point::decode(&buf).unwrap_err(), Error::NotOnCurve);
        assert_eq!(GFsecp256k1::from_u32(7).try_sqrt().unwrap_err(),
            Error::NotQuadraticResidue);

        assert_eq!(Point::decode(&[0u8; 64]).unwrap_err(),
            Error::InvalidLength { expected: 65, actual: 64 });
        assert_eq!(Point::decode(&[0u8; 66]).unwrap_err(),
            Error::InvalidLength { expected: 65, actual: 66 });
        assert_eq!(Point::decode(&[0u8; 32]).unwrap_err(),
            Error::InvalidLength { expected: 33, actual: 32 });
        assert_eq!(Point::decode(&[]).unwrap_err(),
            Error::InvalidLength { expected: 33, actual: 0 });
        assert_eq!(Point::decode_uncompressed(&[0u8; 33]).unwrap_err(),
            Error::InvalidLength { expected: 65, actual: 33 });
    }

    #[test]
    fn hash_to_curve_vectors() {
        let ro = b"QUUX-V01-CS02-with-secp256k1_XMD:SHA-256_SSWU_RO_";
        let nu = b"QUUX-V01-CS02-with-secp256k1_XMD:SHA-256_SSWU_NU_";
        check_h2c(Point::hash_to_curve(b"", ro).unwrap(),
            "c1cae290e291aee617ebaef1be6d73861479c48b841eaba9b7b5852ddfeb1346",
            "64fa678e07ae116126f08b022a94af6de15985c996c3a91b64c406a960e51067");
        check_h2c(Point::hash_to_curve(b"abc", ro).unwrap(),
            "3377e01eab42db296b512293120c6cee72b6ecf9f9205760bd9ff11fb3cb2c4b",
            "7f95890f33efebd1044d382a01b1bee0900fb6116f94688d487c6c7b9c8371f6");
        check_h2c(Point::encode_to_curve(b"", nu).unwrap(),
            "a4792346075feae77ac3b30026f99c1441b4ecf666ded19b7522cf65c4c55c5b",
            "62c59e2a6aeed1b23be5883e833912b08ba06be7f57c0e9cdc663f31639ff3a7");
        check_h2c(Point::encode_to_curve(b"abc", nu).unwrap(),
            "3f3b5842033fff837d504bb4ce2a372bfeadbdbd84a1d2b678b6e1d7ee426b9d",
            "902910d1fef15d8ae2006fc84f2a5a7bda0e0407dc913062c3a493c4f5d876a5");
    }

    #[test]
    fn scalar_hash() {
        let dst = b"QUUX-V01-CS02-with-secp256k1_XMD:SHA-256_SC_";
        let k = hash_to_scalar(b"abc", dst).unwrap();
        assert_eq!(hex::encode(k.encode()),
            "b517684bf53ea98cdb334d3010868c9ca5d7f25406e0d8ae95bc8b7e9de49afc");
    }

    #[test]
    fn random_points() {
        let mut rng = Sha256Rng::new(b"secp256k1");
        let P = Point::random(&mut rng);
        assert!(P.isneutral() == 0);
        let (x, y, _) = P.to_affine();
        assert!(Point::from_affine(x, y).unwrap().equals(P) == 0xFFFFFFFF);
        let s = Scalar::random(&mut rng);
        let t = Scalar::decode(&s.encode()).unwrap();
        assert!((P * s).equals(P * t) == 0xFFFFFFFF);
    }
}

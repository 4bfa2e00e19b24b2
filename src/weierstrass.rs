// Short Weierstrass curves y^2 = x^3 + a*x + b in Jacobian coordinates
// (X:Y:Z), with x = X/Z^2 and y = Y/Z^3; the neutral has Z = 0.
//
// The `weierstrass_point!` macro generates the `Point` type shared by
// the p256 and secp256k1 modules. The including module must bring into
// scope the `Scalar` type, the suite constants, `Error`, `Result`,
// `trace!`, `mul_window`, `hash2curve`, `Expander`, `CryptoRng`,
// `RngCore` and the operator traits, and must provide, in an
// `impl Point` block:
//
//  - `BASE` (the conventional generator);
//  - `fn rhs(x)`, the right-hand side x^3 + a*x + b;
//  - `fn set_double(&mut self)`, doubling for the curve's `a`;
//  - `SSWU_A`, `SSWU_B`, `SSWU_Z`, `SSWU_C1` (= -B/A) and `SSWU_C2`
//    (= B/(Z*A)), parameters of the curve on which the Simplified SWU
//    map is applied (the curve itself, or an isogenous curve);
//  - `fn map_to_curve(u)`, the complete map from a field element.
//
// Point addition uses the generic Jacobian formulas, which are not
// complete: the cases where one operand is the neutral, or where both
// operands are equal, are detected with masks and the correct result
// is selected in constant time. The other exceptional case (P + (-P))
// already yields Z = 0 with the generic formulas.

// Returns 0xFFFFFFFF if all bytes are zero, 0x00000000 otherwise.
#[inline]
pub(crate) fn bytes_are_zero(buf: &[u8]) -> u32 {
    let mut z = 0u32;
    for &b in buf {
        z |= b as u32;
    }
    ((z | z.wrapping_neg()) >> 31).wrapping_sub(1)
}

// Returns 0xFFFFFFFF if x == y, 0x00000000 otherwise.
#[inline(always)]
pub(crate) fn byte_eq(x: u8, y: u8) -> u32 {
    let d = (x ^ y) as u32;
    ((d | d.wrapping_neg()) >> 31).wrapping_sub(1)
}

macro_rules! weierstrass_point {
    ($F:ident, $name:expr, $exp:expr) => {

        /// A point on the curve, in Jacobian coordinates.
        #[derive(Clone, Copy, Debug)]
        pub struct Point {
            pub(crate) X: $F,
            pub(crate) Y: $F,
            pub(crate) Z: $F,
        }

        impl Point {

            /// The neutral element (point-at-infinity) in the curve.
            pub const NEUTRAL: Self = Self {
                X: $F::ZERO,
                Y: $F::ONE,
                Z: $F::ZERO,
            };

            // Decodes a compressed or uncompressed SEC1 encoding with
            // the length already checked to be 33 or 65. Returned
            // values are the point (the neutral on failure), a flag for
            // a well-formed encoding (tag and canonical coordinates),
            // and a flag for a point on the curve. An all-zero buffer
            // is the neutral. Constant-time.
            fn decode_inner(buf: &[u8]) -> (Self, u32, u32) {
                let zz = crate::weierstrass::bytes_are_zero(buf);
                let (x, rx) = $F::decode32_be(&buf[1..33]);
                let (y, rt, ry) = if buf.len() == 33 {
                    let rt = crate::weierstrass::byte_eq(buf[0] & 0xFE, 0x02);
                    let (mut y, ry) = Self::rhs(x).sqrt();
                    let sy = ((buf[0] & 1) as u32).wrapping_neg();
                    y.set_condneg(sy ^ y.is_odd());
                    (y, rt, ry)
                } else {
                    let rt = crate::weierstrass::byte_eq(buf[0], 0x04);
                    let (y, ry) = $F::decode32_be(&buf[33..65]);
                    let rc = y.square().equals(Self::rhs(x));
                    (y, rt & ry, rc)
                };
                let rf = rt & rx;
                let ok = rf & ry;
                let mut P = Self::NEUTRAL;
                P.X.set_cond(&x, ok);
                P.Y.set_cond(&y, ok);
                P.Z.set_cond(&$F::ONE, ok);
                (P, rf | zz, ry | zz)
            }

            /// Tries to decode a point.
            ///
            /// Accepted encodings are: a single byte of value 0x00 (the
            /// neutral), 33 bytes (tag 0x02 or 0x03, then `x` in
            /// big-endian), 65 bytes (tag 0x04, then `x` and `y` in
            /// big-endian), and 33 or 65 zeros (the neutral, as
            /// produced by the fixed-length encoders).
            ///
            /// On success, this structure is set to the decoded point
            /// and 0xFFFFFFFF is returned. On failure, it is set to the
            /// neutral and 0x00000000 is returned. Timing may leak the
            /// encoding length, but neither the point nor the decoding
            /// outcome.
            pub fn set_decode(&mut self, buf: &[u8]) -> u32 {
                *self = Self::NEUTRAL;
                match buf.len() {
                    1 => crate::weierstrass::byte_eq(buf[0], 0x00),
                    33 | 65 => {
                        let (P, rf, rc) = Self::decode_inner(buf);
                        *self = P;
                        rf & rc
                    }
                    _ => 0,
                }
            }

            /// Decodes a point (SEC1 encoding, compressed or
            /// uncompressed, or the neutral).
            ///
            /// This function is meant for public data: the outcome is
            /// reported through the returned `Result`. On a bad length,
            /// the reported expected length is 65 for buffers longer
            /// than 33 bytes, 33 otherwise.
            pub fn decode(buf: &[u8]) -> Result<Self> {
                match buf.len() {
                    1 => {
                        if buf[0] != 0x00 {
                            trace!(curve = $name, "Rejected one-byte encoding");
                            return Err(Error::InvalidEncoding);
                        }
                        Ok(Self::NEUTRAL)
                    }
                    33 | 65 => {
                        let (P, rf, rc) = Self::decode_inner(buf);
                        if rf == 0 {
                            trace!(curve = $name, tag = buf[0], "Rejected malformed point encoding");
                            return Err(Error::InvalidEncoding);
                        }
                        if rc == 0 {
                            trace!(curve = $name, "Rejected encoding with no matching point");
                            return Err(Error::NotOnCurve);
                        }
                        Ok(P)
                    }
                    n => {
                        trace!(curve = $name, len = n, "Rejected point encoding length");
                        // Report the closest valid length.
                        let expected = if n > 33 { 65 } else { 33 };
                        Err(Error::InvalidLength { expected, actual: n })
                    }
                }
            }

            /// Decodes a point from exactly 65 bytes (uncompressed SEC1
            /// encoding, or 65 zeros for the neutral).
            pub fn decode_uncompressed(buf: &[u8]) -> Result<Self> {
                if buf.len() != 65 {
                    trace!(curve = $name, len = buf.len(), "Rejected point encoding length");
                    return Err(Error::InvalidLength { expected: 65, actual: buf.len() });
                }
                Self::decode(buf)
            }

            /// Encodes this point in compressed format (33 bytes).
            ///
            /// The neutral yields 33 zeros.
            pub fn encode(self) -> [u8; 33] {
                let (x, y, ok) = self.to_affine();
                let mut r = [0u8; 33];
                r[0] = 0x02 | ((y.is_odd() & 1) as u8);
                r[1..33].copy_from_slice(&x.encode32_be());
                let m = ok as u8;
                for b in r.iter_mut() {
                    *b &= m;
                }
                r
            }

            /// Encodes this point in uncompressed format (65 bytes).
            ///
            /// The neutral yields 65 zeros.
            pub fn encode_uncompressed(self) -> [u8; 65] {
                let (x, y, ok) = self.to_affine();
                let mut r = [0u8; 65];
                r[0] = 0x04;
                r[1..33].copy_from_slice(&x.encode32_be());
                r[33..65].copy_from_slice(&y.encode32_be());
                let m = ok as u8;
                for b in r.iter_mut() {
                    *b &= m;
                }
                r
            }

            /// Builds a point from its affine coordinates, which must
            /// fulfill the curve equation.
            pub fn from_affine(x: $F, y: $F) -> Result<Self> {
                if y.square().equals(Self::rhs(x)) == 0 {
                    trace!(curve = $name, "Rejected affine coordinates");
                    return Err(Error::NotOnCurve);
                }
                Ok(Self { X: x, Y: y, Z: $F::ONE })
            }

            /// Builds a point from the big-endian encodings of its
            /// affine coordinates (32 bytes each).
            pub fn from_affine_bytes(x: &[u8], y: &[u8]) -> Result<Self> {
                Self::from_affine($F::decode(x)?, $F::decode(y)?)
            }

            /// Gets the affine coordinates (x, y) of this point.
            ///
            /// For the neutral, which has no affine coordinates, (0, 0)
            /// is returned, with a 0x00000000 flag; the flag is
            /// 0xFFFFFFFF otherwise.
            pub fn to_affine(self) -> ($F, $F, u32) {
                let (iZ, ok) = self.Z.invert();
                let iZ2 = iZ.square();
                (self.X * iZ2, self.Y * iZ2 * iZ, ok)
            }

            /// Gets the affine x coordinate of this point.
            pub fn affine_x(self) -> Result<$F> {
                let (x, _, ok) = self.to_affine();
                if ok == 0 {
                    return Err(Error::IdentityEncountered);
                }
                Ok(x)
            }

            /// Gets the affine y coordinate of this point.
            pub fn affine_y(self) -> Result<$F> {
                let (_, y, ok) = self.to_affine();
                if ok == 0 {
                    return Err(Error::IdentityEncountered);
                }
                Ok(y)
            }

            /// Adds point `rhs` to `self`.
            pub fn set_add(&mut self, rhs: &Self) {
                let (X1, Y1, Z1) = (&self.X, &self.Y, &self.Z);
                let (X2, Y2, Z2) = (&rhs.X, &rhs.Y, &rhs.Z);

                // https://www.hyperelliptic.org/EFD/g1p/auto-shortw-jacobian.html#addition-add-2007-bl
                let Z1Z1 = Z1.square();
                let Z2Z2 = Z2.square();
                let U1 = X1 * Z2Z2;
                let U2 = X2 * Z1Z1;
                let S1 = Y1 * Z2 * Z2Z2;
                let S2 = Y2 * Z1 * Z1Z1;
                let H = U2 - U1;
                let I = H.mul2().square();
                let J = H * I;
                let R = (S2 - S1).mul2();
                let V = U1 * I;
                let X3 = R.square() - J - V.mul2();
                let Y3 = R * (V - X3) - (S1 * J).mul2();
                let Z3 = ((Z1 + Z2).square() - Z1Z1 - Z2Z2) * H;

                let z1 = Z1.iszero();
                let z2 = Z2.iszero();
                let same = H.iszero() & R.iszero() & !z1 & !z2;
                let P1 = *self;
                let D = P1.double();

                self.X = X3;
                self.Y = Y3;
                self.Z = Z3;
                self.set_cond(&D, same);
                self.set_cond(rhs, z1);
                self.set_cond(&P1, z2 & !z1);
            }

            /// Subtracts point `rhs` from `self`.
            #[inline(always)]
            pub fn set_sub(&mut self, rhs: &Self) {
                self.set_add(&-rhs);
            }

            /// Negates this point (in place).
            #[inline(always)]
            pub fn set_neg(&mut self) {
                self.Y.set_neg();
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
                for _ in 0..n {
                    self.set_double();
                }
            }

            /// Doubles this point n times.
            #[inline(always)]
            pub fn xdouble(self, n: u32) -> Self {
                let mut r = self;
                r.set_xdouble(n);
                r
            }

            /// Multiplies this point by a scalar (in place).
            ///
            /// This operation is constant-time with regard to both the
            /// point and the scalar.
            pub fn set_mul(&mut self, n: &Scalar) {
                *self = mul_window(self, &n.encode32());
            }

            /// Multiplies this point by a small integer.
            ///
            /// The multiplier `n` MUST NOT be secret.
            pub fn set_mul_small(&mut self, n: u64) {
                if n == 0 {
                    *self = Self::NEUTRAL;
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
            pub fn equals(self, rhs: Self) -> u32 {
                let z1 = self.Z.iszero();
                let z2 = rhs.Z.iszero();
                let Z1Z1 = self.Z.square();
                let Z2Z2 = rhs.Z.square();
                let ex = (self.X * Z2Z2).equals(rhs.X * Z1Z1);
                let ey = (self.Y * Z2Z2 * rhs.Z).equals(rhs.Y * Z1Z1 * self.Z);
                (z1 & z2) | (!z1 & !z2 & ex & ey)
            }

            /// Tests whether this point is the neutral (point-at-infinity).
            #[inline(always)]
            pub fn isneutral(self) -> u32 {
                self.Z.iszero()
            }

            /// The curve has prime order: all points are in the subgroup
            /// generated by `BASE`, and 0xFFFFFFFF is always returned.
            #[inline(always)]
            pub fn is_torsion_free(self) -> u32 {
                0xFFFFFFFF
            }

            /// Conditionally copies the provided point (`P`) into `self`.
            ///
            /// `ctl` MUST be equal to 0x00000000 or 0xFFFFFFFF.
            #[inline]
            pub fn set_cond(&mut self, P: &Self, ctl: u32) {
                self.X.set_cond(&P.X, ctl);
                self.Y.set_cond(&P.Y, ctl);
                self.Z.set_cond(&P.Z, ctl);
            }

            /// Returns a point equal to `P0` (if `ctl` = 0x00000000) or
            /// `P1` (if `ctl` = 0xFFFFFFFF).
            #[inline(always)]
            pub fn select(P0: &Self, P1: &Self, ctl: u32) -> Self {
                let mut P = *P0;
                P.set_cond(P1, ctl);
                P
            }

            /// Conditionally negates this point.
            #[inline(always)]
            pub fn set_condneg(&mut self, ctl: u32) {
                self.Y.set_condneg(ctl);
            }

            fn sswu_rhs(x: $F) -> $F {
                (x.square() + Self::SSWU_A) * x + Self::SSWU_B
            }

            // Simplified SWU map (RFC 9380, section 6.6.2), returning
            // affine coordinates on the curve y^2 = x^3 + A*x + B
            // (SSWU_A and SSWU_B). Constant-time.
            pub(crate) fn map_sswu(u: &$F) -> ($F, $F) {
                let tv = Self::SSWU_Z * u.square();
                let (t1, nz) = (tv.square() + tv).invert();
                let mut x1 = Self::SSWU_C1 * (t1 + $F::ONE);
                x1.set_cond(&Self::SSWU_C2, !nz);
                let x2 = tv * x1;
                let (y1, e1) = Self::sswu_rhs(x1).sqrt();
                let (y2, _) = Self::sswu_rhs(x2).sqrt();
                let x = $F::select(&x2, &x1, e1);
                let mut y = $F::select(&y2, &y1, e1);
                y.set_condneg(u.is_odd() ^ y.is_odd());
                (x, y)
            }

            /// Hashes a message to a point (RFC 9380 `hash_to_curve`,
            /// random oracle variant).
            pub fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self> {
                let u: Vec<$F> = hash2curve::hash_to_field($exp, msg, dst, 2)?;
                Ok(Self::map_to_curve(&u[0]) + Self::map_to_curve(&u[1]))
            }

            /// Encodes a message to a point (RFC 9380 `encode_to_curve`,
            /// non-uniform variant).
            pub fn encode_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self> {
                let u: Vec<$F> = hash2curve::hash_to_field($exp, msg, dst, 1)?;
                Ok(Self::map_to_curve(&u[0]))
            }

            /// Hashes a message to a point with the default DST.
            pub fn hash(msg: &[u8]) -> Result<Self> {
                Self::hash_to_curve(msg, &hash2curve::default_dst(HASH_SUITE))
            }

            /// Samples a uniform point.
            pub fn random<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
                let e0 = $F::random(rng);
                let e1 = $F::random(rng);
                Self::map_to_curve(&e0) + Self::map_to_curve(&e1)
            }
        }

        point_ops!(Point, Scalar);
        impl_curve_point!(Point, Scalar, $F, 33, 65);

        /// Hashes a message to a scalar (RFC 9380 `hash_to_field`
        /// modulo the curve order).
        pub fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Scalar> {
            let k: Vec<Scalar> = hash2curve::hash_to_field($exp, msg, dst, 1)?;
            Ok(k[0])
        }
    };
}

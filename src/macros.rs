// Operator implementations shared by the point types. A point type must
// provide set_add(&Self), set_sub(&Self), set_neg(), set_mul(&Scalar)
// and set_mul_small(u64); operators are then defined on values and on
// references, in all combinations.

macro_rules! static_assert {
    ($condition:expr) => {
        let _ = &[()][1 - ($condition) as usize];
    }
}

macro_rules! point_binop {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $set:ident,
     $Point:ty) => {
        impl $Op<$Point> for $Point {
            type Output = $Point;

            #[inline(always)]
            fn $op(self, other: $Point) -> $Point {
                let mut r = self;
                r.$set(&other);
                r
            }
        }

        impl $Op<&$Point> for $Point {
            type Output = $Point;

            #[inline(always)]
            fn $op(self, other: &$Point) -> $Point {
                let mut r = self;
                r.$set(other);
                r
            }
        }

        impl $Op<$Point> for &$Point {
            type Output = $Point;

            #[inline(always)]
            fn $op(self, other: $Point) -> $Point {
                let mut r = *self;
                r.$set(&other);
                r
            }
        }

        impl $Op<&$Point> for &$Point {
            type Output = $Point;

            #[inline(always)]
            fn $op(self, other: &$Point) -> $Point {
                let mut r = *self;
                r.$set(other);
                r
            }
        }

        impl $OpAssign<$Point> for $Point {
            #[inline(always)]
            fn $op_assign(&mut self, other: $Point) {
                self.$set(&other);
            }
        }

        impl $OpAssign<&$Point> for $Point {
            #[inline(always)]
            fn $op_assign(&mut self, other: &$Point) {
                self.$set(other);
            }
        }
    };
}

macro_rules! point_ops {
    ($Point:ty, $Scalar:ty) => {
        point_binop!(Add, add, AddAssign, add_assign, set_add, $Point);
        point_binop!(Sub, sub, SubAssign, sub_assign, set_sub, $Point);

        impl Neg for $Point {
            type Output = $Point;

            #[inline(always)]
            fn neg(self) -> $Point {
                let mut r = self;
                r.set_neg();
                r
            }
        }

        impl Neg for &$Point {
            type Output = $Point;

            #[inline(always)]
            fn neg(self) -> $Point {
                let mut r = *self;
                r.set_neg();
                r
            }
        }

        impl Mul<$Scalar> for $Point {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: $Scalar) -> $Point {
                let mut r = self;
                r.set_mul(&other);
                r
            }
        }

        impl Mul<&$Scalar> for $Point {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: &$Scalar) -> $Point {
                let mut r = self;
                r.set_mul(other);
                r
            }
        }

        impl Mul<$Scalar> for &$Point {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: $Scalar) -> $Point {
                let mut r = *self;
                r.set_mul(&other);
                r
            }
        }

        impl Mul<&$Scalar> for &$Point {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: &$Scalar) -> $Point {
                let mut r = *self;
                r.set_mul(other);
                r
            }
        }

        impl MulAssign<$Scalar> for $Point {
            #[inline(always)]
            fn mul_assign(&mut self, other: $Scalar) {
                self.set_mul(&other);
            }
        }

        impl MulAssign<&$Scalar> for $Point {
            #[inline(always)]
            fn mul_assign(&mut self, other: &$Scalar) {
                self.set_mul(other);
            }
        }

        impl Mul<$Point> for $Scalar {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: $Point) -> $Point {
                let mut r = other;
                r.set_mul(&self);
                r
            }
        }

        impl Mul<&$Point> for $Scalar {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: &$Point) -> $Point {
                let mut r = *other;
                r.set_mul(&self);
                r
            }
        }

        impl Mul<$Point> for &$Scalar {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: $Point) -> $Point {
                let mut r = other;
                r.set_mul(self);
                r
            }
        }

        impl Mul<&$Point> for &$Scalar {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: &$Point) -> $Point {
                let mut r = *other;
                r.set_mul(self);
                r
            }
        }

        impl Mul<u64> for $Point {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: u64) -> $Point {
                let mut r = self;
                r.set_mul_small(other);
                r
            }
        }

        impl Mul<u64> for &$Point {
            type Output = $Point;

            #[inline(always)]
            fn mul(self, other: u64) -> $Point {
                let mut r = *self;
                r.set_mul_small(other);
                r
            }
        }

        impl MulAssign<u64> for $Point {
            #[inline(always)]
            fn mul_assign(&mut self, other: u64) {
                self.set_mul_small(other);
            }
        }
    };
}

// Binds the inherent methods of a point type to the `CurvePoint` trait.
// Inherent methods are called through explicit paths, since several of
// them share their name with the trait method.
macro_rules! impl_curve_point {
    ($Point:ty, $Scalar:ty, $Field:ty, $clen:expr, $ulen:expr) => {
        impl crate::curve::CurvePoint for $Point {
            type Scalar = $Scalar;
            type Field = $Field;

            const COMPRESSED_LEN: usize = $clen;
            const UNCOMPRESSED_LEN: usize = $ulen;

            #[inline(always)]
            fn identity() -> Self {
                <$Point>::NEUTRAL
            }

            #[inline(always)]
            fn generator() -> Self {
                <$Point>::BASE
            }

            #[inline(always)]
            fn is_identity(&self) -> u32 {
                <$Point>::isneutral(*self)
            }

            #[inline(always)]
            fn equals(&self, other: &Self) -> u32 {
                <$Point>::equals(*self, *other)
            }

            #[inline(always)]
            fn double(&self) -> Self {
                <$Point>::double(*self)
            }

            #[inline(always)]
            fn xdouble(&self, n: u32) -> Self {
                <$Point>::xdouble(*self, n)
            }

            #[inline(always)]
            fn set_cond(&mut self, other: &Self, ctl: u32) {
                <$Point>::set_cond(self, other, ctl)
            }

            #[inline(always)]
            fn mul_scalar(&self, s: &$Scalar) -> Self {
                *self * s
            }

            #[inline(always)]
            fn is_torsion_free(&self) -> u32 {
                <$Point>::is_torsion_free(*self)
            }

            fn to_compressed(&self) -> Vec<u8> {
                <$Point>::encode(*self).to_vec()
            }

            fn to_uncompressed(&self) -> Vec<u8> {
                <$Point>::encode_uncompressed(*self).to_vec()
            }

            fn from_compressed(buf: &[u8]) -> crate::error::Result<Self> {
                <$Point>::decode(buf)
            }

            fn from_uncompressed(buf: &[u8]) -> crate::error::Result<Self> {
                <$Point>::decode_uncompressed(buf)
            }

            fn random<T: crate::CryptoRng + crate::RngCore>(rng: &mut T) -> Self {
                <$Point>::random(rng)
            }

            fn from_affine_coords(x: $Field, y: $Field) -> crate::error::Result<Self> {
                <$Point>::from_affine(x, y)
            }

            fn affine_coords(&self) -> crate::error::Result<($Field, $Field)> {
                let (x, y, ok) = <$Point>::to_affine(*self);
                if ok == 0 {
                    return Err(crate::error::Error::IdentityEncountered);
                }
                Ok((x, y))
            }
        }
    };
}

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{addcarry_u64, subborrow_u64, umull_add2, sgnw};

/// Integers modulo a 256-bit odd modulus m = M0 + M1*2^64 + M2*2^128 +
/// M3*2^192, stored in Montgomery representation (x*2^256 mod m). The
/// internal value is always fully reduced.
#[derive(Clone, Copy, Debug)]
pub struct ModInt256<const M0: u64, const M1: u64, const M2: u64, const M3: u64>([u64; 4]);

impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64> ModInt256<M0, M1, M2, M3> {

    // Modulus must be odd; top limb must not be zero (the modulus is at
    // least 193 bits, so that 2^192 < m, which the constant-building
    // code relies on).
    #[allow(dead_code)]
    const COMPILE_TIME_CHECKS: () = Self::compile_time_checks();
    const fn compile_time_checks() {
        static_assert!((M0 & 1) != 0);
        static_assert!(M3 != 0);
    }

    /// Modulus, in base 2^64 (low-to-high order).
    pub const MODULUS: [u64; 4] = [ M0, M1, M2, M3 ];

    pub const ZERO: Self = Self([ 0, 0, 0, 0 ]);
    pub const ONE: Self = Self::w64le(1, 0, 0, 0);
    pub const MINUS_ONE: Self = Self::w64le(M0 - 1, M1, M2, M3);

    // -1/m0 mod 2^64
    const M0I: u64 = Self::make_m0i();

    // 2^512 mod m (Montgomery representation of 2^256).
    const R2: Self = Self::make_r2();

    // Public exponents: m-2 (inversion), (m-1)/2 (Euler's criterion),
    // floor(m/4)+1 = (m+1)/4 when m = 3 mod 4, floor(m/8) = (m-5)/8 when
    // m = 5 mod 8.
    const QM2: [u64; 4] = Self::make_qm2();
    const QM1D2: [u64; 4] = Self::shr256(Self::MODULUS, 1);
    const QP1D4: [u64; 4] = Self::inc256(Self::shr256(Self::MODULUS, 2));
    const QM5D8: [u64; 4] = Self::shr256(Self::MODULUS, 3);

    // Tonelli-Shanks constants, for m = 1 mod 8:
    //   m - 1 = TS_C2 * 2^TS_C1, with TS_C2 odd
    //   TS_C3 = (TS_C2 - 1)/2
    //   TS_C5 = z^TS_C2 for the smallest non-residue z
    // TS_C5 is zero for the other modulus shapes (it is never used then).
    const TS_C1: u32 = Self::make_ts_c1();
    const TS_C2: [u64; 4] = Self::shr256(
        [ M0 & !1u64, M1, M2, M3 ], Self::TS_C1);
    const TS_C3: [u64; 4] = Self::shr256(Self::TS_C2, 1);
    const TS_C5: Self = Self::make_ts_c5();

    /// Creates an element from its four 64-bit limbs, in little-endian
    /// order (least significant limb first). The value is implicitly
    /// reduced. Usable in const contexts.
    pub const fn w64le(x0: u64, x1: u64, x2: u64, x3: u64) -> Self {
        Self(Self::mmul(&[ x0, x1, x2, x3 ], &Self::R2.0))
    }

    /// Creates an element from its four 64-bit limbs, in big-endian
    /// order (most significant limb first). The value is implicitly
    /// reduced. Usable in const contexts.
    pub const fn w64be(x3: u64, x2: u64, x1: u64, x0: u64) -> Self {
        Self(Self::mmul(&[ x0, x1, x2, x3 ], &Self::R2.0))
    }

    #[inline(always)]
    pub fn from_u32(x: u32) -> Self {
        Self::w64le(x as u64, 0, 0, 0)
    }

    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self::w64le(x, 0, 0, 0)
    }

    // Negative values are implicitly reduced modulo m.
    #[inline(always)]
    pub fn from_i64(x: i64) -> Self {
        let mut r = Self::from_u64(x.unsigned_abs());
        r.set_condneg((x >> 63) as u32);
        r
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        // Raw addition; the carry goes into d4.
        let (d0, cc) = addcarry_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = addcarry_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = addcarry_u64(self.0[2], rhs.0[2], cc);
        let (d3, cc) = addcarry_u64(self.0[3], rhs.0[3], cc);
        let d4 = cc as u64;

        // Subtract the modulus; e4 is -1 if the result went negative.
        let (e0, cc) = subborrow_u64(d0, M0, 0);
        let (e1, cc) = subborrow_u64(d1, M1, cc);
        let (e2, cc) = subborrow_u64(d2, M2, cc);
        let (e3, cc) = subborrow_u64(d3, M3, cc);
        let (e4, _)  = subborrow_u64(d4, 0, cc);

        let (d0, cc) = addcarry_u64(e0, e4 & M0, 0);
        let (d1, cc) = addcarry_u64(e1, e4 & M1, cc);
        let (d2, cc) = addcarry_u64(e2, e4 & M2, cc);
        let (d3, _)  = addcarry_u64(e3, e4 & M3, cc);
        self.0 = [ d0, d1, d2, d3 ];
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        let (d0, cc) = subborrow_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = subborrow_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = subborrow_u64(self.0[2], rhs.0[2], cc);
        let (d3, cc) = subborrow_u64(self.0[3], rhs.0[3], cc);

        // Add back the modulus on borrow.
        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(d0, w & M0, 0);
        let (d1, cc) = addcarry_u64(d1, w & M1, cc);
        let (d2, cc) = addcarry_u64(d2, w & M2, cc);
        let (d3, _)  = addcarry_u64(d3, w & M3, cc);
        self.0 = [ d0, d1, d2, d3 ];
    }

    #[inline(always)]
    pub fn set_neg(&mut self) {
        let mut r = Self::ZERO;
        r.set_sub(self);
        *self = r;
    }

    /// Negates this value if `ctl` is 0xFFFFFFFF; leaves it unchanged if
    /// `ctl` is 0.
    #[inline(always)]
    pub fn set_condneg(&mut self, ctl: u32) {
        let r = -(self as &Self);
        self.set_cond(&r, ctl);
    }

    /// Copies `a` into this value if `ctl` is 0xFFFFFFFF; leaves it
    /// unchanged if `ctl` is 0. `ctl` MUST be 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        for i in 0..4 {
            self.0[i] ^= cw & (self.0[i] ^ a.0[i]);
        }
    }

    /// Returns `a0` if `ctl` is 0, `a1` if `ctl` is 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    /// Exchanges `a` and `b` if `ctl` is 0xFFFFFFFF.
    #[inline(always)]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        for i in 0..4 {
            let t = cw & (a.0[i] ^ b.0[i]);
            a.0[i] ^= t;
            b.0[i] ^= t;
        }
    }

    #[inline(always)]
    fn set_mul(&mut self, rhs: &Self) {
        self.0 = Self::mmul(&self.0, &rhs.0);
    }

    #[inline(always)]
    pub fn set_square(&mut self) {
        self.0 = Self::mmul(&self.0, &self.0);
    }

    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    /// Squares this value `n` times in place.
    pub fn set_xsquare(&mut self, n: u32) {
        for _ in 0..n {
            self.set_square();
        }
    }

    #[inline(always)]
    pub fn xsquare(self, n: u32) -> Self {
        let mut r = self;
        r.set_xsquare(n);
        r
    }

    // Halving: add the modulus when odd, then shift right by one bit.
    #[inline(always)]
    pub fn set_half(&mut self) {
        let m = (self.0[0] & 1).wrapping_neg();
        let (d0, cc) = addcarry_u64(self.0[0], m & M0, 0);
        let (d1, cc) = addcarry_u64(self.0[1], m & M1, cc);
        let (d2, cc) = addcarry_u64(self.0[2], m & M2, cc);
        let (d3, cc) = addcarry_u64(self.0[3], m & M3, cc);
        self.0[0] = (d0 >> 1) | (d1 << 63);
        self.0[1] = (d1 >> 1) | (d2 << 63);
        self.0[2] = (d2 >> 1) | (d3 << 63);
        self.0[3] = (d3 >> 1) | ((cc as u64) << 63);
    }

    #[inline(always)]
    pub fn half(self) -> Self {
        let mut r = self;
        r.set_half();
        r
    }

    #[inline(always)]
    pub fn set_mul2(&mut self) {
        let r = *self;
        self.set_add(&r);
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    #[inline(always)]
    pub fn set_mul3(&mut self) {
        let r = *self;
        self.set_mul2();
        self.set_add(&r);
    }

    #[inline(always)]
    pub fn mul3(self) -> Self {
        let mut r = self;
        r.set_mul3();
        r
    }

    #[inline(always)]
    pub fn set_mul4(&mut self) {
        self.set_mul2();
        self.set_mul2();
    }

    #[inline(always)]
    pub fn mul4(self) -> Self {
        let mut r = self;
        r.set_mul4();
        r
    }

    #[inline(always)]
    pub fn set_mul8(&mut self) {
        self.set_mul4();
        self.set_mul2();
    }

    #[inline(always)]
    pub fn mul8(self) -> Self {
        let mut r = self;
        r.set_mul8();
        r
    }

    // Raise this value to a public exponent (four 64-bit limbs,
    // little-endian). Exponent bits may leak; the value does not.
    fn set_modpow_pubexp(&mut self, e: &[u64; 4]) {
        // win[i] = x^(i+1)
        let mut win = [Self::ZERO; 15];
        win[0] = *self;
        for i in 1..8 {
            let j = i * 2;
            win[j - 1] = win[i - 1].square();
            win[j] = win[j - 1] * win[0];
        }

        *self = Self::ONE;
        let mut started = false;
        for i in (0..64).rev() {
            let c = ((e[i >> 4] >> ((i & 15) << 2)) & 0x0F) as usize;
            if started {
                self.set_xsquare(4);
            }
            if c != 0 {
                if started {
                    self.set_mul(&win[c - 1]);
                } else {
                    *self = win[c - 1];
                    started = true;
                }
            }
        }
    }

    /// Inverts this value in place (Fermat's little theorem). Returns
    /// 0xFFFFFFFF on success, 0 if the value is zero (the value then
    /// stays zero). The modulus must be prime.
    pub fn set_invert(&mut self) -> u32 {
        let r = !self.iszero();
        self.set_modpow_pubexp(&Self::QM2);
        r
    }

    /// Returns the inverse of this value and a success flag
    /// (0xFFFFFFFF, or 0 when this value is zero; the returned value is
    /// then zero).
    #[inline(always)]
    pub fn invert(self) -> (Self, u32) {
        let mut r = self;
        let cc = r.set_invert();
        (r, cc)
    }

    // Division by zero yields zero.
    fn set_div(&mut self, y: &Self) {
        let (yi, _) = y.invert();
        self.set_mul(&yi);
    }

    /// Inverts all slice elements in place, with a single field
    /// inversion (Montgomery's trick). Zero elements stay zero.
    pub fn batch_invert(xx: &mut [Self]) {
        let n = xx.len();
        if n == 0 {
            return;
        }

        // tt[i] = product of all non-zero xx[j] for j <= i
        let mut tt = Vec::with_capacity(n);
        let mut acc = Self::ONE;
        for x in xx.iter() {
            let mut y = *x;
            y.set_cond(&Self::ONE, x.iszero());
            acc *= y;
            tt.push(acc);
        }

        let (mut k, _) = acc.invert();
        for i in (0..n).rev() {
            let x = xx[i];
            let zz = x.iszero();
            let prev = if i > 0 { tt[i - 1] } else { Self::ONE };
            xx[i].set_cond(&(k * prev), !zz);
            let mut y = x;
            y.set_cond(&Self::ONE, zz);
            k *= y;
        }
    }

    /// Legendre symbol of this value: 0 for zero, +1 for a non-zero
    /// square, -1 for a non-square. Constant-time (Euler's criterion).
    pub fn legendre(self) -> i32 {
        let mut y = self;
        y.set_modpow_pubexp(&Self::QM1D2);
        let p = y.equals(Self::ONE);
        let z = self.iszero();
        ((p & 1) as i32) - ((!(p | z) & 1) as i32)
    }

    // Candidate square root for m = 1 mod 8 (constant-time Tonelli-Shanks;
    // the number of iterations only depends on the modulus).
    fn set_sqrt_ts(&mut self) {
        let x = *self;
        let mut z = x;
        z.set_modpow_pubexp(&Self::TS_C3);
        let mut t = z.square() * x;
        z *= x;
        let mut b = t;
        let mut c = Self::TS_C5;
        let mut i = Self::TS_C1;
        while i >= 2 {
            b.set_xsquare(i - 2);
            let e = b.equals(Self::ONE);
            z.set_cond(&(z * c), !e);
            c.set_square();
            t.set_cond(&(t * c), !e);
            b = t;
            i -= 1;
        }
        *self = z;
    }

    /// Replaces this value with its square root. Returns 0xFFFFFFFF on
    /// success, or 0 if the value is not a quadratic residue (the value
    /// is then set to zero). On success, the returned root is the one
    /// whose canonical representative is even. The modulus must be prime.
    pub fn set_sqrt(&mut self) -> u32 {
        let x = *self;

        if (M0 & 3) == 3 {
            // m = 3 mod 4: candidate is x^((m+1)/4)
            self.set_modpow_pubexp(&Self::QP1D4);
        } else if (M0 & 7) == 5 {
            // m = 5 mod 8 (Atkin):
            //   b <- (2*x)^((m-5)/8)
            //   c <- 2*x*b^2
            //   y <- x*b*(c - 1)
            let mut b = self.mul2();
            b.set_modpow_pubexp(&Self::QM5D8);
            *self *= b;
            let c = ((self as &Self) * b).mul2();
            *self *= c - Self::ONE;
        } else {
            self.set_sqrt_ts();
        }

        self.set_condneg(self.is_odd());

        let r = self.square().equals(x);
        self.set_cond(&Self::ZERO, !r);
        r
    }

    #[inline(always)]
    pub fn sqrt(self) -> (Self, u32) {
        let mut x = self;
        let r = x.set_sqrt();
        (x, r)
    }

    // Canonical (non-Montgomery) limbs.
    #[inline(always)]
    fn montyred(self) -> [u64; 4] {
        Self::mmul(&self.0, &[ 1, 0, 0, 0 ])
    }

    /// Returns 0xFFFFFFFF if the canonical representative of this value
    /// is odd, 0 otherwise. This is the RFC 9380 sgn0() for prime fields.
    #[inline]
    pub fn is_odd(self) -> u32 {
        ((self.montyred()[0] & 1) as u32).wrapping_neg()
    }

    /// Constant-time equality: 0xFFFFFFFF on equality, 0 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        let r = (self.0[0] ^ rhs.0[0])
              | (self.0[1] ^ rhs.0[1])
              | (self.0[2] ^ rhs.0[2])
              | (self.0[3] ^ rhs.0[3]);
        ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
    }

    #[inline]
    pub fn iszero(self) -> u32 {
        let r = self.0[0] | self.0[1] | self.0[2] | self.0[3];
        ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
    }

    fn limbs_from_le(buf: &[u8]) -> [u64; 4] {
        let mut d = [0u64; 4];
        for i in 0..4 {
            let mut w = [0u8; 8];
            w.copy_from_slice(&buf[(8 * i)..(8 * i + 8)]);
            d[i] = u64::from_le_bytes(w);
        }
        d
    }

    fn limbs_from_be(buf: &[u8]) -> [u64; 4] {
        let mut d = [0u64; 4];
        for i in 0..4 {
            let mut w = [0u8; 8];
            w.copy_from_slice(&buf[(24 - 8 * i)..(32 - 8 * i)]);
            d[i] = u64::from_be_bytes(w);
        }
        d
    }

    // Converts raw limbs (any 256-bit value) into an element; the value
    // is reduced by the Montgomery multiplication.
    #[inline(always)]
    fn from_raw(d: [u64; 4]) -> Self {
        Self(Self::mmul(&d, &Self::R2.0))
    }

    // Imports canonical limbs; non-canonical input yields zero and a
    // zero flag.
    fn from_raw_canonical(d: [u64; 4]) -> (Self, u32) {
        let (_, cc) = subborrow_u64(d[0], M0, 0);
        let (_, cc) = subborrow_u64(d[1], M1, cc);
        let (_, cc) = subborrow_u64(d[2], M2, cc);
        let (_, cc) = subborrow_u64(d[3], M3, cc);
        let w = (cc as u64).wrapping_neg();
        let d = [ d[0] & w, d[1] & w, d[2] & w, d[3] & w ];
        (Self::from_raw(d), w as u32)
    }

    /// Encodes this value over 32 bytes (canonical, little-endian).
    #[inline]
    pub fn encode32(self) -> [u8; 32] {
        let r = self.montyred();
        let mut d = [0u8; 32];
        for i in 0..4 {
            d[(8 * i)..(8 * i + 8)].copy_from_slice(&r[i].to_le_bytes());
        }
        d
    }

    /// Encodes this value over 32 bytes (canonical, big-endian).
    #[inline]
    pub fn encode32_be(self) -> [u8; 32] {
        let r = self.montyred();
        let mut d = [0u8; 32];
        for i in 0..4 {
            d[(24 - 8 * i)..(32 - 8 * i)].copy_from_slice(&r[i].to_be_bytes());
        }
        d
    }

    /// Decodes exactly 32 bytes (little-endian). On success, returns the
    /// value and 0xFFFFFFFF; on failure (wrong length, non-canonical
    /// value), returns zero and 0. For a 32-byte input, the outcome is
    /// not leaked through timing.
    pub fn decode32(buf: &[u8]) -> (Self, u32) {
        if buf.len() != 32 {
            return (Self::ZERO, 0);
        }
        Self::from_raw_canonical(Self::limbs_from_le(buf))
    }

    /// Same as `decode32()`, with big-endian convention.
    pub fn decode32_be(buf: &[u8]) -> (Self, u32) {
        if buf.len() != 32 {
            return (Self::ZERO, 0);
        }
        Self::from_raw_canonical(Self::limbs_from_be(buf))
    }

    /// Decodes bytes of any length as an unsigned little-endian integer,
    /// reduced modulo m. Never fails; only the length may leak.
    pub fn decode_reduce(buf: &[u8]) -> Self {
        // Process 32-byte chunks from the most significant one:
        //   acc <- acc*2^256 + chunk
        let mut r = Self::ZERO;
        let mut n = buf.len();
        while n > 0 {
            let k = (n - 1) & !31usize;
            let mut tmp = [0u8; 32];
            tmp[..(n - k)].copy_from_slice(&buf[k..n]);
            r.set_mul(&Self::R2);
            r.set_add(&Self::from_raw(Self::limbs_from_le(&tmp)));
            n = k;
        }
        r
    }

    /// Same as `decode_reduce()`, with big-endian convention.
    pub fn decode_reduce_be(buf: &[u8]) -> Self {
        let mut r = Self::ZERO;
        let n = buf.len();
        if n == 0 {
            return r;
        }
        let mut j = 0;
        let mut clen = n - ((n - 1) & !31usize);
        while j < n {
            let mut tmp = [0u8; 32];
            tmp[(32 - clen)..].copy_from_slice(&buf[j..(j + clen)]);
            r.set_mul(&Self::R2);
            r.set_add(&Self::from_raw(Self::limbs_from_be(&tmp)));
            j += clen;
            clen = 32;
        }
        r
    }

    // ====================================================================
    // Const-evaluable support code. Montgomery multiplication below is
    // the one used at runtime too; it is constant-time.

    // Montgomery multiplication (CIOS): returns a*b/2^256 mod m, fully
    // reduced. b must be lower than m; a may be any 256-bit value.
    #[inline(always)]
    const fn mmul(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
        const fn adc(x: u64, y: u64) -> (u64, u64) {
            let z = (x as u128) + (y as u128);
            (z as u64, (z >> 64) as u64)
        }

        // Invariant: t < 2*m at the start of each round.
        let mut t = [0u64; 5];
        let mut i = 0;
        while i < 4 {
            let ai = a[i];
            let (d0, hi) = umull_add2(ai, b[0], t[0], 0);
            let (d1, hi) = umull_add2(ai, b[1], t[1], hi);
            let (d2, hi) = umull_add2(ai, b[2], t[2], hi);
            let (d3, hi) = umull_add2(ai, b[3], t[3], hi);
            let (d4, d5) = adc(t[4], hi);

            let f = d0.wrapping_mul(Self::M0I);
            let (_, hi)  = umull_add2(f, M0, d0, 0);
            let (e0, hi) = umull_add2(f, M1, d1, hi);
            let (e1, hi) = umull_add2(f, M2, d2, hi);
            let (e2, hi) = umull_add2(f, M3, d3, hi);
            let (e3, e4) = adc(d4, hi);
            t = [ e0, e1, e2, e3, e4 + d5 ];
            i += 1;
        }
        Self::reduce_once(t)
    }

    // Given t < 2*m (five limbs), returns t mod m.
    #[inline(always)]
    const fn reduce_once(t: [u64; 5]) -> [u64; 4] {
        const fn sbb(x: u64, y: u64, cc: u64) -> (u64, u64) {
            let z = (x as u128).wrapping_sub(y as u128).wrapping_sub(cc as u128);
            (z as u64, (z >> 127) as u64)
        }

        // e4 is -1 when t < m (keep t), 0 otherwise (keep t - m).
        let (e0, cc) = sbb(t[0], M0, 0);
        let (e1, cc) = sbb(t[1], M1, cc);
        let (e2, cc) = sbb(t[2], M2, cc);
        let (e3, cc) = sbb(t[3], M3, cc);
        let e4 = sgnw(t[4].wrapping_sub(cc));
        [ e0 ^ (e4 & (e0 ^ t[0])),
          e1 ^ (e4 & (e1 ^ t[1])),
          e2 ^ (e4 & (e2 ^ t[2])),
          e3 ^ (e4 & (e3 ^ t[3])) ]
    }

    const fn make_m0i() -> u64 {
        // Newton iteration: each step doubles the number of correct bits.
        let mut y = 2u64.wrapping_sub(M0);
        let mut i = 0;
        while i < 5 {
            y = y.wrapping_mul(2u64.wrapping_sub(y.wrapping_mul(M0)));
            i += 1;
        }
        y.wrapping_neg()
    }

    const fn make_r2() -> Self {
        // 2^512 mod m, by 512 modular doublings of 1.
        let mut r = [ 1u64, 0, 0, 0 ];
        let mut i = 0;
        while i < 512 {
            r = Self::reduce_once([
                r[0] << 1,
                (r[0] >> 63) | (r[1] << 1),
                (r[1] >> 63) | (r[2] << 1),
                (r[2] >> 63) | (r[3] << 1),
                r[3] >> 63,
            ]);
            i += 1;
        }
        Self(r)
    }

    const fn make_qm2() -> [u64; 4] {
        let (d0, b) = M0.overflowing_sub(2);
        let (d1, b) = M1.overflowing_sub(b as u64);
        let (d2, b) = M2.overflowing_sub(b as u64);
        let d3 = M3.wrapping_sub(b as u64);
        [ d0, d1, d2, d3 ]
    }

    const fn shr256(x: [u64; 4], s: u32) -> [u64; 4] {
        let mut r = x;
        let mut k = s;
        while k >= 64 {
            r = [ r[1], r[2], r[3], 0 ];
            k -= 64;
        }
        if k > 0 {
            r = [
                (r[0] >> k) | (r[1] << (64 - k)),
                (r[1] >> k) | (r[2] << (64 - k)),
                (r[2] >> k) | (r[3] << (64 - k)),
                r[3] >> k,
            ];
        }
        r
    }

    const fn inc256(x: [u64; 4]) -> [u64; 4] {
        let (d0, c) = x[0].overflowing_add(1);
        let (d1, c) = x[1].overflowing_add(c as u64);
        let (d2, c) = x[2].overflowing_add(c as u64);
        let d3 = x[3].wrapping_add(c as u64);
        [ d0, d1, d2, d3 ]
    }

    const fn make_ts_c1() -> u32 {
        // M0 is odd, so m - 1 only clears bit 0 of the low limb.
        let q = [ M0 & !1u64, M1, M2, M3 ];
        let mut i = 0;
        while i < 4 {
            if q[i] != 0 {
                return (i as u32) * 64 + q[i].trailing_zeros();
            }
            i += 1;
        }
        256
    }

    // x^e for a public exponent (const evaluation only; not constant-time
    // with regard to the exponent).
    const fn const_pow(x: Self, e: &[u64; 4]) -> Self {
        let mut r = Self::ONE;
        let mut i = 256;
        while i > 0 {
            i -= 1;
            r = Self(Self::mmul(&r.0, &r.0));
            if ((e[i >> 6] >> (i & 63)) & 1) != 0 {
                r = Self(Self::mmul(&r.0, &x.0));
            }
        }
        r
    }

    const fn const_eq(a: &Self, b: &Self) -> bool {
        a.0[0] == b.0[0] && a.0[1] == b.0[1]
            && a.0[2] == b.0[2] && a.0[3] == b.0[3]
    }

    const fn make_ts_c5() -> Self {
        if (M0 & 7) != 1 {
            return Self::ZERO;
        }

        // For z^c2 = c: z is a non-residue iff c^(2^(c1-1)) = -1.
        let mut z = 2u64;
        loop {
            let c = Self::const_pow(Self::w64le(z, 0, 0, 0), &Self::TS_C2);
            let mut t = c;
            let mut k = 1;
            while k < Self::TS_C1 {
                t = Self(Self::mmul(&t.0, &t.0));
                k += 1;
            }
            if Self::const_eq(&t, &Self::MINUS_ONE) {
                return c;
            }
            z += 1;
        }
    }
}

// ========================================================================
// Operators on values and references.

macro_rules! modint_binop {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $set:ident) => {
        impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64>
            $Op<ModInt256<M0, M1, M2, M3>> for ModInt256<M0, M1, M2, M3>
        {
            type Output = ModInt256<M0, M1, M2, M3>;

            #[inline(always)]
            fn $op(self, other: ModInt256<M0, M1, M2, M3>) -> Self::Output {
                let mut r = self;
                r.$set(&other);
                r
            }
        }

        impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64>
            $Op<&ModInt256<M0, M1, M2, M3>> for ModInt256<M0, M1, M2, M3>
        {
            type Output = ModInt256<M0, M1, M2, M3>;

            #[inline(always)]
            fn $op(self, other: &ModInt256<M0, M1, M2, M3>) -> Self::Output {
                let mut r = self;
                r.$set(other);
                r
            }
        }

        impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64>
            $Op<ModInt256<M0, M1, M2, M3>> for &ModInt256<M0, M1, M2, M3>
        {
            type Output = ModInt256<M0, M1, M2, M3>;

            #[inline(always)]
            fn $op(self, other: ModInt256<M0, M1, M2, M3>) -> Self::Output {
                let mut r = *self;
                r.$set(&other);
                r
            }
        }

        impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64>
            $Op<&ModInt256<M0, M1, M2, M3>> for &ModInt256<M0, M1, M2, M3>
        {
            type Output = ModInt256<M0, M1, M2, M3>;

            #[inline(always)]
            fn $op(self, other: &ModInt256<M0, M1, M2, M3>) -> Self::Output {
                let mut r = *self;
                r.$set(other);
                r
            }
        }

        impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64>
            $OpAssign<ModInt256<M0, M1, M2, M3>> for ModInt256<M0, M1, M2, M3>
        {
            #[inline(always)]
            fn $op_assign(&mut self, other: ModInt256<M0, M1, M2, M3>) {
                self.$set(&other);
            }
        }

        impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64>
            $OpAssign<&ModInt256<M0, M1, M2, M3>> for ModInt256<M0, M1, M2, M3>
        {
            #[inline(always)]
            fn $op_assign(&mut self, other: &ModInt256<M0, M1, M2, M3>) {
                self.$set(other);
            }
        }
    };
}

modint_binop!(Add, add, AddAssign, add_assign, set_add);
modint_binop!(Sub, sub, SubAssign, sub_assign, set_sub);
modint_binop!(Mul, mul, MulAssign, mul_assign, set_mul);
modint_binop!(Div, div, DivAssign, div_assign, set_div);

impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64>
    Neg for ModInt256<M0, M1, M2, M3>
{
    type Output = ModInt256<M0, M1, M2, M3>;

    #[inline(always)]
    fn neg(self) -> ModInt256<M0, M1, M2, M3> {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl<const M0: u64, const M1: u64, const M2: u64, const M3: u64>
    Neg for &ModInt256<M0, M1, M2, M3>
{
    type Output = ModInt256<M0, M1, M2, M3>;

    #[inline(always)]
    fn neg(self) -> ModInt256<M0, M1, M2, M3> {
        let mut r = *self;
        r.set_neg();
        r
    }
}

// ========================================================================

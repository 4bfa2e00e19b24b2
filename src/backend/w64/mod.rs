// 64-bit backend: Montgomery arithmetic modulo a generic 256-bit odd
// modulus. All fields of the crate (base fields and scalar fields) are
// instances of the single `ModInt256` type.

pub mod modint;
pub use modint::ModInt256;

// Carry propagation helpers. Carries and borrows are 0 or 1. On x86_64
// the intrinsics are used, since compilers do not reliably produce
// adc/sbb chains from the u128 expressions.

#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub(crate) fn addcarry_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let mut d = 0u64;
    // SAFETY: _addcarry_u64 is available on all x86_64 CPUs.
    let cc = unsafe { core::arch::x86_64::_addcarry_u64(c, x, y, &mut d) };
    (d, cc)
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub(crate) fn subborrow_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let mut d = 0u64;
    // SAFETY: _subborrow_u64 is available on all x86_64 CPUs.
    let cc = unsafe { core::arch::x86_64::_subborrow_u64(c, x, y, &mut d) };
    (d, cc)
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub(crate) const fn addcarry_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let (d, c1) = x.overflowing_add(y);
    let (d, c2) = d.overflowing_add(c as u64);
    (d, (c1 | c2) as u8)
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub(crate) const fn subborrow_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let (d, c1) = x.overflowing_sub(y);
    let (d, c2) = d.overflowing_sub(c as u64);
    (d, (c1 | c2) as u8)
}

// x*y + z1 + z2 as (lo, hi); at most (2^64-1)^2 + 2*(2^64-1) = 2^128-1.
#[inline(always)]
pub(crate) const fn umull_add2(x: u64, y: u64, z1: u64, z2: u64) -> (u64, u64) {
    let t = (x as u128) * (y as u128) + (z1 as u128) + (z2 as u128);
    (t as u64, (t >> 64) as u64)
}

// All-ones if the top bit of x is set, zero otherwise.
#[inline(always)]
pub(crate) const fn sgnw(x: u64) -> u64 {
    0u64.wrapping_sub(x >> 63)
}

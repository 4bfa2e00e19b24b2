//! Architecture-specific implementations of finite fields.
//!
//! All fields in this crate have a modulus of at most 256 bits, and are
//! implemented by `ModInt256`, which works over 64-bit limbs with
//! Montgomery multiplication. The type is specialized for a single
//! field through four type parameters, known at compile-time.
//!
//! In general, the following properties apply to field elements:
//!
//!  - An instance encapsulates a field element, in Montgomery
//!    representation.
//!
//!  - The constant values `Self::ZERO`, `Self::ONE` and
//!    `Self::MINUS_ONE` contain the elements of value 0, 1 and -1,
//!    respectively.
//!
//!  - Usual arithmetic operators can be used on field elements (`+`, `-`,
//!    `*`, `/`, and the compound assignments `+=`, `-=`, `*=` and `/=`).
//!    Division by zero is tolerated, and yields zero (regardless of the
//!    dividend). Operators can use both the raw types, and references
//!    thereof.
//!
//!  - Function `set_square(&mut self)` squares a field element (in place).
//!    Corresponding function `square(self) -> Self` returns the result
//!    as a new instance. Sequences of multiple squarings can be performed
//!    with `set_xsquare(&mut self, n: u32)` (and a corresponding
//!    `xsquare()` to get the result as a new instance).
//!
//!  - Function `set_cond(&mut self, a: &Self, ctl: u32)` sets the
//!    instance to the value of the other instance `a` if `ctl` is equal
//!    to 0xFFFFFFFF, or leaves the instance value unmodified if `ctl` is
//!    equal to 0x00000000. `select()` and `cswap()` work similarly.
//!
//!  - Functions `set_half()`, `set_mul2()`, `set_mul3()`, `set_mul4()`
//!    and `set_mul8()` multiply their operand (in place) by 1/2, 2, 3, 4
//!    or 8, respectively; `half()`, `mul2()`, and so on return a new
//!    instance.
//!
//!  - Constant values can be defined with the const-qualified `w64le()`
//!    and `w64be()` functions, which take the value as four 64-bit limbs
//!    in little-endian and big-endian order, respectively. The 256-bit
//!    value is implicitly reduced modulo the field order.
//!
//!  - `set_invert()` and `set_sqrt()` report success with a `u32` flag.
//!    Square roots are supported for all prime moduli; the returned root
//!    is the one with an even canonical representative.
//!
//!  - Function `encode32(self) -> [u8; 32]` encodes an element as
//!    exactly 32 bytes (little-endian); `encode32_be()` uses big-endian.
//!    `decode32()` and `decode32_be()` check canonicality and report the
//!    outcome with a `u32` flag; `decode_reduce()` and `decode_reduce_be()`
//!    accept any length and reduce the value modulo the field order.

pub mod w64;

/// Finite field: generic 256-bit modulus.
///
/// The modulus is provided as four 64-bit type parameters, that encode
/// the modulus in base 2^64 (`M0` is the least significant limb,
/// `M3` is the most significant limb). The modulus MUST have length
/// at least 193 bits (i.e. `M3` must not be zero). The modulus MUST be
/// odd (i.e. `M0` must be odd).
pub type ModInt256<const M0: u64, const M1: u64, const M2: u64, const M3: u64> =
    w64::modint::ModInt256<M0, M1, M2, M3>;

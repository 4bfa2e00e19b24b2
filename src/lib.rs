//! Curvealg is the curve algebra layer of a cryptographic toolkit.
//!
//! This library implements constant-time arithmetic in the prime fields
//! and on the elliptic curves used by higher-level protocols (key
//! agreement, commitments, threshold signatures): edwards25519 and its
//! Montgomery view curve25519, NIST P-256, and secp256k1. It provides
//! scalar and multi-scalar multiplication, and hashing to curves as
//! specified by RFC 9380.
//!
//! Finite fields are all instances of a single generic Montgomery type
//! (`backend::ModInt256`), with the modulus given as compile-time type
//! parameters; the concrete base fields and scalar fields are named in
//! the `field` module.
//!
//! Curve edwards25519 is implemented in `edwards25519` (including the
//! prime-order `SubgroupPoint` wrapper), and curve25519 (with X25519)
//! in `curve25519`. NIST curve P-256 (aka "secp256r1" and "prime256v1")
//! is implemented in the `p256` module, and the SEC curve secp256k1 in
//! `secp256k1`. The `curve` module gathers them behind the `Curve`
//! trait, with per-curve parameters built once on first access.
//!
//! # Features
//!
//! The `std` feature is enabled by default. The `parallel` feature
//! enables a `rayon`-based implementation of
//! `msm::multi_scalar_mul_parallel()`; without it, that function uses
//! the sequential code.
//!
//! # Conventions
//!
//! All implemented functions should be strictly constant-time, unless
//! explicitly documented otherwise. In order to avoid unwanted
//! side-channel leaks, Booleans are avoided (compilers tend to
//! "optimize" things a bit too eagerly when handling `bool` values).
//! All functions that return or use a potentially secret Boolean value
//! use the `u32` type; the convention is that 0xFFFFFFFF means "true",
//! and 0x00000000 means "false". No other value shall be used, for they
//! would lead to unpredictable results. Similarly, the `Eq` or
//! `PartialEq` traits are not implemented on field elements and points.
//!
//! Functions that process public data (decoding of points received from
//! the outside, parameter checks) report failures through
//! `Result<T, Error>` instead.
//!
//! Algebraic operations on field elements and curve points are performed
//! with the usual operators (e.g. `+`); appropriate traits are defined
//! so that structure types and pointers to structure types can be used
//! more or less interchangeably. Throughout the code, functions that
//! modify the object on which they are called tend to have a name in
//! `set_*()` (e.g. for a curve point `P`, if we want to compute the
//! double of that point, then `P.set_double()` modifies the point
//! structure in place, while `P.double()` leaves `P` unmodified and
//! returns the double as a new structure instance).

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

#[macro_use]
mod macros;

#[macro_use]
mod weierstrass;

pub mod backend;
pub mod error;
pub mod field;
pub mod hash2curve;
pub mod msm;
pub mod curve;
pub mod edwards25519;
pub mod curve25519;
pub mod p256;
pub mod secp256k1;

#[cfg(test)]
mod test_rng;

pub use error::{Error, Result};
pub use curve::{Curve, CurveParams, CurvePoint, Curve25519, Edwards25519, P256, Secp256k1};

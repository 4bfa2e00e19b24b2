//! Scalar multiplication and multi-scalar multiplication.
//!
//! `mul_window()` is the constant-time point multiplication used by all
//! point types of this crate (their `*` operator with a scalar ends up
//! here). `multi_scalar_mul()` computes a linear combination of points;
//! with the `parallel` feature, `multi_scalar_mul_parallel()` splits the
//! terms into chunks processed by `rayon` worker threads, and adds the
//! per-chunk partial sums on the calling thread.

use tracing::debug;

use crate::curve::CurvePoint;
use crate::error::{Error, Result};

// Returns win[idx - 1], or the neutral if idx == 0. All table entries
// are read; idx may be secret.
#[inline]
fn lookup<P: CurvePoint>(win: &[P; 15], idx: u32) -> P {
    let mut r = P::identity();
    for (i, w) in win.iter().enumerate() {
        let d = (i as u32 + 1) ^ idx;
        let m = ((d | d.wrapping_neg()) >> 31).wrapping_sub(1);
        r.set_cond(w, m);
    }
    r
}

/// Multiplies point `p` by the integer `k` (unsigned little-endian,
/// 32 bytes). The integer is used as is, without reduction modulo the
/// group order, so that it can carry clamped values.
///
/// A 4-bit fixed window is used: 15 precomputed multiples, then 4
/// doublings and one constant-time table lookup and addition per
/// nibble. Neither the point nor the integer leak through timing.
pub fn mul_window<P: CurvePoint>(p: &P, k: &[u8; 32]) -> P {
    // win[i] = (i + 1)*p
    let mut win = [P::identity(); 15];
    win[0] = *p;
    for i in 1..15 {
        win[i] = if (i & 1) == 1 {
            win[i >> 1].double()
        } else {
            win[i - 1] + *p
        };
    }

    let mut q = lookup(&win, (k[31] >> 4) as u32);
    for i in (0..63).rev() {
        let nib = (k[i >> 1] >> ((i & 1) << 2)) & 0x0F;
        q = q.xdouble(4);
        q += lookup(&win, nib as u32);
    }
    q
}

fn fold_terms<P: CurvePoint>(scalars: &[P::Scalar], points: &[P]) -> P {
    let mut acc = P::identity();
    for (s, p) in scalars.iter().zip(points.iter()) {
        acc += p.mul_scalar(s);
    }
    acc
}

fn check_lengths<P: CurvePoint>(scalars: &[P::Scalar], points: &[P]) -> Result<()> {
    if scalars.len() != points.len() {
        return Err(Error::MismatchedLengths {
            scalars: scalars.len(),
            points: points.len(),
        });
    }
    Ok(())
}

/// Computes `sum(scalars[i]*points[i])`.
///
/// Fails with `MismatchedLengths` (before any computation) if the two
/// slices do not have the same length. An empty input yields the
/// neutral.
pub fn multi_scalar_mul<P: CurvePoint>(scalars: &[P::Scalar], points: &[P])
    -> Result<P>
{
    check_lengths(scalars, points)?;
    Ok(fold_terms(scalars, points))
}

/// Same as `multi_scalar_mul()`, but with the work split over the
/// `rayon` thread pool. Without the `parallel` feature, this is the
/// sequential computation.
pub fn multi_scalar_mul_parallel<P: CurvePoint>(scalars: &[P::Scalar], points: &[P])
    -> Result<P>
{
    check_lengths(scalars, points)?;
    #[cfg(feature = "parallel")]
    {
        let chunk = 1024usize.max(points.len() / rayon::current_num_threads().max(1));
        Ok(chunked_sum(scalars, points, chunk))
    }
    #[cfg(not(feature = "parallel"))]
    {
        Ok(chunked_sum(scalars, points, 1024))
    }
}

#[cfg(feature = "parallel")]
fn chunked_sum<P: CurvePoint>(scalars: &[P::Scalar], points: &[P], chunk: usize) -> P {
    use rayon::prelude::*;

    debug!(terms = points.len(), chunk, "Parallel multi-scalar multiplication");
    let partial: Vec<P> = scalars
        .par_chunks(chunk)
        .zip(points.par_chunks(chunk))
        .map(|(sc, pc)| fold_terms(sc, pc))
        .collect();
    partial.iter().fold(P::identity(), |acc, q| acc + *q)
}

#[cfg(not(feature = "parallel"))]
fn chunked_sum<P: CurvePoint>(scalars: &[P::Scalar], points: &[P], chunk: usize) -> P {
    debug!(terms = points.len(), chunk, "Chunked multi-scalar multiplication");
    let mut acc = P::identity();
    for (sc, pc) in scalars.chunks(chunk).zip(points.chunks(chunk)) {
        acc += fold_terms(sc, pc);
    }
    acc
}

//! Dense real polynomials stored highest power first.
//!
//! `[1.0, 11.0, 10.0]` is `s^2 + 11 s + 10`. All helpers return vectors with
//! leading zeros removed; the zero polynomial is `[0.0]`.

use crate::Real;

/// Drop leading zero coefficients. The zero polynomial trims to `[0.0]`.
pub fn trim(coeffs: &[Real]) -> Vec<Real> {
    match coeffs.iter().position(|&c| c != 0.0) {
        Some(first) => coeffs[first..].to_vec(),
        None => vec![0.0],
    }
}

/// Degree of a trimmed or untrimmed polynomial. The zero polynomial has degree 0.
pub fn degree(coeffs: &[Real]) -> usize {
    trim(coeffs).len() - 1
}

pub fn is_zero(coeffs: &[Real]) -> bool {
    coeffs.iter().all(|&c| c == 0.0)
}

pub fn add(a: &[Real], b: &[Real]) -> Vec<Real> {
    let n = a.len().max(b.len());
    let mut out = vec![0.0; n];
    for (slot, &c) in out[n - a.len()..].iter_mut().zip(a) {
        *slot += c;
    }
    for (slot, &c) in out[n - b.len()..].iter_mut().zip(b) {
        *slot += c;
    }
    trim(&out)
}

pub fn mul(a: &[Real], b: &[Real]) -> Vec<Real> {
    if a.is_empty() || b.is_empty() {
        return vec![0.0];
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    trim(&out)
}

pub fn scale(a: &[Real], k: Real) -> Vec<Real> {
    trim(&a.iter().map(|&c| c * k).collect::<Vec<_>>())
}

/// Horner evaluation at a real point.
pub fn eval(coeffs: &[Real], x: Real) -> Real {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Left-pad with zeros to exactly `len` coefficients.
///
/// Callers must pass `len >= coeffs.len()`; longer inputs are returned as-is.
pub fn pad_to(coeffs: &[Real], len: usize) -> Vec<Real> {
    if coeffs.len() >= len {
        return coeffs.to_vec();
    }
    let mut out = vec![0.0; len - coeffs.len()];
    out.extend_from_slice(coeffs);
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coeffs() -> impl Strategy<Value = Vec<Real>> {
        prop::collection::vec(-10.0_f64..10.0_f64, 1..5)
    }

    proptest! {
        #[test]
        fn product_evaluates_to_product_of_values(
            a in coeffs(),
            b in coeffs(),
            x in -2.0_f64..2.0_f64,
        ) {
            let lhs = eval(&mul(&a, &b), x);
            let rhs = eval(&a, x) * eval(&b, x);
            prop_assert!((lhs - rhs).abs() <= 1e-9 * (1.0 + rhs.abs()));
        }

        #[test]
        fn sum_evaluates_to_sum_of_values(a in coeffs(), b in coeffs(), x in -2.0_f64..2.0_f64) {
            let lhs = eval(&add(&a, &b), x);
            let rhs = eval(&a, x) + eval(&b, x);
            prop_assert!((lhs - rhs).abs() <= 1e-9 * (1.0 + rhs.abs()));
        }
    }
}

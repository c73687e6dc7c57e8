//! Controllable-canonical state-space realization.

use nalgebra::{DMatrix, DVector, RowDVector};
use ps_core::poly;

use crate::error::{ModelError, ModelResult};
use crate::transfer_function::TransferFunction;

/// SISO state-space model `x' = A x + B u`, `y = C x + D u`.
///
/// Built from a proper [`TransferFunction`]; `n` equals the denominator
/// degree and may be zero for a pure static gain.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpaceModel {
    a: DMatrix<f64>,
    b: DVector<f64>,
    /// Output row, stored as a column for cheap dot products.
    c: DVector<f64>,
    d: f64,
}

impl StateSpaceModel {
    /// Realize `N(s)/D(s)` in controllable-canonical form.
    ///
    /// With the denominator normalized to `s^n + a1 s^(n-1) + ... + an` and
    /// the numerator padded to `b0 s^n + ... + bn`:
    ///
    /// ```text
    /// A = companion matrix, last row [-an ... -a1]
    /// B = [0 ... 0 1]^T
    /// C = [bn - an b0, ..., b1 - a1 b0]
    /// D = b0
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidModel` for improper transfer functions.
    pub fn from_transfer_function(tf: &TransferFunction) -> ModelResult<Self> {
        if !tf.is_proper() {
            return Err(ModelError::invalid(format!(
                "cannot realize improper transfer function {tf}"
            )));
        }

        let lead = tf.denominator()[0];
        let den: Vec<f64> = tf.denominator().iter().map(|c| c / lead).collect();
        let n = den.len() - 1;
        let num: Vec<f64> = poly::pad_to(tf.numerator(), n + 1)
            .iter()
            .map(|c| c / lead)
            .collect();
        let d = num[0];

        let mut a = DMatrix::zeros(n, n);
        for i in 0..n.saturating_sub(1) {
            a[(i, i + 1)] = 1.0;
        }
        for j in 0..n {
            a[(n - 1, j)] = -den[n - j];
        }

        let mut b = DVector::zeros(n);
        if n > 0 {
            b[n - 1] = 1.0;
        }

        let c = DVector::from_fn(n, |j, _| num[n - j] - den[n - j] * d);

        Ok(Self { a, b, c, d })
    }

    /// State dimension.
    pub fn order(&self) -> usize {
        self.b.len()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> RowDVector<f64> {
        self.c.transpose()
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    /// Plant at rest.
    pub fn zero_state(&self) -> DVector<f64> {
        DVector::zeros(self.order())
    }

    /// `A x + B u`
    pub fn derivative(&self, x: &DVector<f64>, u: f64) -> DVector<f64> {
        &self.a * x + &self.b * u
    }

    /// `C x + D u`
    pub fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        self.c.dot(x) + self.d * u
    }

    /// Static gain `D - C A^-1 B`, or `None` if `A` is singular.
    pub fn dc_gain(&self) -> Option<f64> {
        if self.order() == 0 {
            return Some(self.d);
        }
        let a_inv = self.a.clone().try_inverse()?;
        Some(self.d - self.c.dot(&(a_inv * &self.b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor() -> StateSpaceModel {
        TransferFunction::new(&[5.0], &[1.0, 11.0, 10.0])
            .unwrap()
            .to_state_space()
            .unwrap()
    }

    #[test]
    fn motor_realization_matrices() {
        let ss = motor();
        assert_eq!(ss.order(), 2);
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -10.0, -11.0]);
        assert_eq!(ss.a(), &a);
        assert_eq!(ss.b(), &DVector::from_vec(vec![0.0, 1.0]));
        let c = ss.c();
        assert_eq!((c.nrows(), c.ncols()), (1, 2));
        assert_eq!((c[0], c[1]), (5.0, 0.0));
        assert_eq!(ss.d(), 0.0);
    }

    #[test]
    fn eigenvalues_are_denominator_roots() {
        let ss = motor();
        let eig = ss.a().clone().complex_eigenvalues();
        let mut re: Vec<f64> = eig.iter().map(|z| z.re).collect();
        re.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((re[0] + 10.0).abs() < 1e-9);
        assert!((re[1] + 1.0).abs() < 1e-9);
        assert!(eig.iter().all(|z| z.im.abs() < 1e-9));
    }

    #[test]
    fn dc_gain_matches_transfer_function() {
        assert!((motor().dc_gain().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn biproper_realization_has_feedthrough() {
        // (2 s + 3) / (s + 1) = 2 + 1 / (s + 1)
        let ss = TransferFunction::new(&[2.0, 3.0], &[1.0, 1.0])
            .unwrap()
            .to_state_space()
            .unwrap();
        assert_eq!(ss.d(), 2.0);
        assert_eq!(ss.c()[0], 1.0);
        assert!((ss.dc_gain().unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn non_monic_denominator_is_normalized() {
        let ss = TransferFunction::new(&[10.0], &[2.0, 22.0, 20.0])
            .unwrap()
            .to_state_space()
            .unwrap();
        assert_eq!(ss, motor());
    }

    #[test]
    fn static_gain_has_empty_state() {
        let ss = TransferFunction::gain(4.0).unwrap().to_state_space().unwrap();
        assert_eq!(ss.order(), 0);
        assert_eq!(ss.output(&ss.zero_state(), 0.5), 2.0);
        assert_eq!(ss.dc_gain(), Some(4.0));
    }

    #[test]
    fn improper_model_is_not_realizable() {
        let pd = TransferFunction::new(&[1.0, 10.0], &[1.0]).unwrap();
        assert!(matches!(
            pd.to_state_space(),
            Err(ModelError::InvalidModel { .. })
        ));
    }

    #[test]
    fn derivative_applies_input_on_last_state() {
        let ss = motor();
        let x = DVector::from_vec(vec![1.0, 0.0]);
        let dx = ss.derivative(&x, 2.0);
        assert_eq!(dx, DVector::from_vec(vec![0.0, -10.0 + 2.0]));
        assert_eq!(ss.output(&x, 2.0), 5.0);
    }
}

//! Rational transfer functions `G(s) = N(s) / D(s)`.

use std::fmt;

use ps_core::{ensure_all_finite, poly};

use crate::error::{ModelError, ModelResult};
use crate::state_space::StateSpaceModel;

/// Continuous-time SISO transfer function.
///
/// Coefficients are stored highest power first. The numerator is kept with
/// leading zeros removed; the denominator always has a non-zero leading
/// coefficient. Instances are immutable once built.
///
/// Properness (`deg N <= deg D`) is a precondition for realization, not for
/// construction: an ideal PID `Kd s^2 + Kp s + Ki` over `s` is improper and
/// still needs to be representable so it can be composed with a plant.
/// Use [`TransferFunction::new_strict`] where an improper model is a
/// configuration mistake.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

impl TransferFunction {
    /// Build a transfer function from literal coefficients.
    ///
    /// # Errors
    ///
    /// `InvalidModel` if either polynomial is empty, the leading denominator
    /// coefficient is zero, or any coefficient is not finite.
    pub fn new(numerator: &[f64], denominator: &[f64]) -> ModelResult<Self> {
        if numerator.is_empty() {
            return Err(ModelError::invalid("numerator is empty"));
        }
        if denominator.is_empty() {
            return Err(ModelError::invalid("denominator is empty"));
        }
        ensure_all_finite(numerator, "numerator coefficient")?;
        ensure_all_finite(denominator, "denominator coefficient")?;
        if denominator[0] == 0.0 {
            return Err(ModelError::invalid(
                "leading denominator coefficient is zero",
            ));
        }
        Ok(Self {
            numerator: poly::trim(numerator),
            denominator: denominator.to_vec(),
        })
    }

    /// Like [`TransferFunction::new`], additionally rejecting improper models.
    pub fn new_strict(numerator: &[f64], denominator: &[f64]) -> ModelResult<Self> {
        let tf = Self::new(numerator, denominator)?;
        if !tf.is_proper() {
            return Err(ModelError::invalid(format!(
                "improper transfer function: numerator degree {} exceeds denominator degree {}",
                tf.numerator_degree(),
                tf.order()
            )));
        }
        Ok(tf)
    }

    /// Static gain `k / 1`.
    pub fn gain(k: f64) -> ModelResult<Self> {
        Self::new(&[k], &[1.0])
    }

    pub fn numerator(&self) -> &[f64] {
        &self.numerator
    }

    pub fn denominator(&self) -> &[f64] {
        &self.denominator
    }

    /// Denominator degree, i.e. the state dimension of a realization.
    pub fn order(&self) -> usize {
        self.denominator.len() - 1
    }

    pub fn numerator_degree(&self) -> usize {
        self.numerator.len() - 1
    }

    pub fn is_proper(&self) -> bool {
        self.numerator_degree() <= self.order()
    }

    pub fn is_strictly_proper(&self) -> bool {
        poly::is_zero(&self.numerator) || self.numerator_degree() < self.order()
    }

    /// Evaluate `N(s) / D(s)` at a real point.
    pub fn eval(&self, s: f64) -> f64 {
        poly::eval(&self.numerator, s) / poly::eval(&self.denominator, s)
    }

    /// Steady-state gain `G(0)`, or `None` for a pole at the origin.
    pub fn dc_gain(&self) -> Option<f64> {
        let den0 = poly::eval(&self.denominator, 0.0);
        if den0 == 0.0 {
            None
        } else {
            Some(poly::eval(&self.numerator, 0.0) / den0)
        }
    }

    /// Same function with a monic denominator.
    pub fn normalized(&self) -> Self {
        let lead = self.denominator[0];
        Self {
            numerator: poly::scale(&self.numerator, 1.0 / lead),
            denominator: self.denominator.iter().map(|c| c / lead).collect(),
        }
    }

    /// Series connection `self * other`.
    pub fn series(&self, other: &TransferFunction) -> ModelResult<Self> {
        Self::new(
            &poly::mul(&self.numerator, &other.numerator),
            &poly::mul(&self.denominator, &other.denominator),
        )
    }

    /// Unity negative feedback around `self`: `N / (D + N)`.
    pub fn feedback_unity(&self) -> ModelResult<Self> {
        let denominator = poly::add(&self.denominator, &self.numerator);
        if poly::is_zero(&denominator) {
            return Err(ModelError::invalid(
                "closed-loop characteristic polynomial vanishes",
            ));
        }
        Self::new(&self.numerator, &denominator)
    }

    /// Controllable-canonical realization of this transfer function.
    pub fn to_state_space(&self) -> ModelResult<StateSpaceModel> {
        StateSpaceModel::from_transfer_function(self)
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grouped(f, &self.numerator)?;
        write!(f, " / ")?;
        write_grouped(f, &self.denominator)
    }
}

fn nonzero_terms(coeffs: &[f64]) -> usize {
    coeffs.iter().filter(|&&c| c != 0.0).count()
}

fn write_grouped(f: &mut fmt::Formatter<'_>, coeffs: &[f64]) -> fmt::Result {
    if nonzero_terms(coeffs) > 1 {
        write!(f, "(")?;
        write_poly(f, coeffs)?;
        write!(f, ")")
    } else {
        write_poly(f, coeffs)
    }
}

fn write_poly(f: &mut fmt::Formatter<'_>, coeffs: &[f64]) -> fmt::Result {
    let n = coeffs.len() - 1;
    let mut first = true;
    for (i, &c) in coeffs.iter().enumerate() {
        if c == 0.0 {
            continue;
        }
        let power = n - i;
        if first {
            if c < 0.0 {
                write!(f, "-")?;
            }
        } else {
            write!(f, " {} ", if c < 0.0 { '-' } else { '+' })?;
        }
        let magnitude = c.abs();
        if power == 0 || magnitude != 1.0 {
            write!(f, "{magnitude}")?;
            if power > 0 {
                write!(f, " ")?;
            }
        }
        match power {
            0 => {}
            1 => write!(f, "s")?,
            p => write!(f, "s^{p}")?,
        }
        first = false;
    }
    if first {
        write!(f, "0")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor() -> TransferFunction {
        TransferFunction::new(&[5.0], &[1.0, 11.0, 10.0]).unwrap()
    }

    #[test]
    fn motor_plant_properties() {
        let g = motor();
        assert_eq!(g.order(), 2);
        assert!(g.is_proper());
        assert!(g.is_strictly_proper());
        assert_eq!(g.dc_gain(), Some(0.5));
    }

    #[test]
    fn rejects_malformed_denominators() {
        assert!(matches!(
            TransferFunction::new(&[1.0], &[]),
            Err(ModelError::InvalidModel { .. })
        ));
        assert!(matches!(
            TransferFunction::new(&[1.0], &[0.0, 1.0]),
            Err(ModelError::InvalidModel { .. })
        ));
        assert!(TransferFunction::new(&[1.0], &[1.0, f64::NAN]).is_err());
        assert!(TransferFunction::new(&[], &[1.0]).is_err());
    }

    #[test]
    fn strict_mode_rejects_improper() {
        assert!(TransferFunction::new(&[1.0, 0.0, 0.0], &[1.0, 1.0]).is_ok());
        let err = TransferFunction::new_strict(&[1.0, 0.0, 0.0], &[1.0, 1.0]).unwrap_err();
        assert!(err.to_string().contains("improper"));
    }

    #[test]
    fn numerator_leading_zeros_are_trimmed() {
        let g = TransferFunction::new(&[0.0, 0.0, 5.0], &[1.0, 11.0, 10.0]).unwrap();
        assert_eq!(g.numerator(), &[5.0]);
        assert_eq!(g, motor());
    }

    #[test]
    fn series_and_unity_feedback_match_hand_algebra() {
        // C(s) = (1.5 s^2 + 10 s + 40) / s
        let c = TransferFunction::new(&[1.5, 10.0, 40.0], &[1.0, 0.0]).unwrap();
        let open = c.series(&motor()).unwrap();
        assert_eq!(open.numerator(), &[7.5, 50.0, 200.0]);
        assert_eq!(open.denominator(), &[1.0, 11.0, 10.0, 0.0]);

        let closed = open.feedback_unity().unwrap();
        assert_eq!(closed.denominator(), &[1.0, 18.5, 60.0, 200.0]);
        assert!(closed.is_strictly_proper());
        assert_eq!(closed.dc_gain(), Some(1.0));
    }

    #[test]
    fn pole_at_origin_has_no_dc_gain() {
        let integrator = TransferFunction::new(&[1.0], &[1.0, 0.0]).unwrap();
        assert_eq!(integrator.dc_gain(), None);
    }

    #[test]
    fn normalized_is_monic() {
        let g = TransferFunction::new(&[10.0], &[2.0, 22.0, 20.0]).unwrap();
        let n = g.normalized();
        assert_eq!(n.denominator(), &[1.0, 11.0, 10.0]);
        assert_eq!(n.numerator(), &[5.0]);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(motor().to_string(), "5 / (s^2 + 11 s + 10)");
        let c = TransferFunction::new(&[-1.0, 0.0, 2.5], &[1.0, 0.0]).unwrap();
        assert_eq!(c.to_string(), "(-s^2 + 2.5) / s");
    }
}

use crate::{CoreError, CoreResult};

/// Floating point type used throughout the workspace
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check every entry of a slice, reporting the first offending value.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> CoreResult<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(CoreError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// `count` uniformly spaced points on `[start, end]`, both ends included.
///
/// Points are computed as `start + k * step` rather than by accumulation so
/// that the grid is reproducible and the last point lands on `end`.
pub fn linspace(start: Real, end: Real, count: usize) -> CoreResult<Vec<Real>> {
    ensure_finite(start, "linspace start")?;
    ensure_finite(end, "linspace end")?;
    if count < 2 {
        return Err(CoreError::InvalidArg {
            what: "linspace needs at least two points",
        });
    }
    let step = (end - start) / (count - 1) as Real;
    let mut points: Vec<Real> = (0..count).map(|k| start + k as Real * step).collect();
    points[count - 1] = end;
    Ok(points)
}

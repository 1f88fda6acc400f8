//! Finite-difference derivatives.

/// Central difference `(f(x + h) - f(x - h)) / 2h`.
pub fn central_diff<F>(f: F, x: f64, h: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// [`central_diff`] for a fallible function.
pub fn try_central_diff<F, E>(f: F, x: f64, h: f64) -> Result<f64, E>
where
    F: Fn(f64) -> Result<f64, E>,
{
    Ok((f(x + h)? - f(x - h)?) / (2.0 * h))
}

//! Synthetic right-censored exponential samples.
//!
//! Event times are drawn from `Exp(scale)` and, when censoring is enabled,
//! independent censoring times from `Exp(censor_scale)`. Each row records the
//! earlier of the two and whether the event was observed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Exp;

use crate::domain::{SurvivalData, SyntheticConfig};
use crate::error::AppError;

pub fn generate_sample(config: &SyntheticConfig) -> Result<SurvivalData, AppError> {
    if config.n == 0 {
        return Err(AppError::input("Sample count must be > 0."));
    }

    let event_dist = rate_dist(config.scale, "event")?;
    let censor_dist = config
        .censor_scale
        .map(|s| rate_dist(s, "censoring"))
        .transpose()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut event = Vec::with_capacity(config.n);
    let mut time = Vec::with_capacity(config.n);

    for _ in 0..config.n {
        let t_event: f64 = event_dist.sample(&mut rng);
        match &censor_dist {
            Some(c) => {
                let t_censor: f64 = c.sample(&mut rng);
                if t_event <= t_censor {
                    event.push(1.0);
                    time.push(t_event);
                } else {
                    event.push(0.0);
                    time.push(t_censor);
                }
            }
            None => {
                event.push(1.0);
                time.push(t_event);
            }
        }
    }

    SurvivalData::new(event, time)
}

fn rate_dist(scale: f64, label: &str) -> Result<Exp<f64>, AppError> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(AppError::input(format!(
            "Invalid {label} scale {scale} (must be finite and > 0)."
        )));
    }
    Exp::new(1.0 / scale)
        .map_err(|e| AppError::input(format!("Invalid {label} distribution: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(censor_scale: Option<f64>) -> SyntheticConfig {
        SyntheticConfig {
            n: 5_000,
            scale: 5.0,
            censor_scale,
            seed: 7,
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let a = generate_sample(&config(Some(10.0))).unwrap();
        let b = generate_sample(&config(Some(10.0))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn no_censoring_marks_every_row_observed() {
        let data = generate_sample(&config(None)).unwrap();
        assert!(data.event().iter().all(|&e| e == 1.0));
        let mean = data.time().iter().sum::<f64>() / data.len() as f64;
        assert!((mean - 5.0).abs() < 0.5, "mean={mean}");
    }

    #[test]
    fn censoring_fraction_follows_competing_rates() {
        // P(censored) = λc / (λe + λc) = (1/10) / (1/5 + 1/10) = 1/3
        let data = generate_sample(&config(Some(10.0))).unwrap();
        let frac = data.stats().unwrap().censored_fraction();
        assert!((frac - 1.0 / 3.0).abs() < 0.03, "censored fraction={frac}");
    }

    #[test]
    fn rejects_bad_settings() {
        let mut cfg = config(None);
        cfg.scale = 0.0;
        assert!(generate_sample(&cfg).is_err());

        let mut cfg = config(Some(-1.0));
        cfg.scale = 1.0;
        assert!(generate_sample(&cfg).is_err());

        let mut cfg = config(None);
        cfg.n = 0;
        assert!(generate_sample(&cfg).is_err());
    }
}

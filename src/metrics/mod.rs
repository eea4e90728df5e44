//! Derived metrics over an ascending monthly sequence.
//!
//! - MoM: change vs index `i - 1`
//! - YoY: change vs index `i - 12` (strict monthly cadence is assumed)
//! - rolling 12/36-month means of the MoM column, full windows only
//!
//! Absent inputs produce absent outputs. Nothing here divides by zero or
//! panics; a zero base simply yields `None` on the percent basis.

use crate::domain::{ChangeBasis, MetricsPolicy, Observation};

pub const MOM_LAG: usize = 1;
pub const YOY_LAG: usize = 12;
pub const SHORT_WINDOW: usize = 12;
pub const LONG_WINDOW: usize = 36;

/// Change from `base` to `current` on the given basis.
pub fn change(current: Option<f64>, base: Option<f64>, basis: ChangeBasis) -> Option<f64> {
    let (current, base) = (current?, base?);
    let out = match basis {
        ChangeBasis::Percent => {
            if base == 0.0 {
                return None;
            }
            (current - base) / base * 100.0
        }
        ChangeBasis::Points => current - base,
    };
    if out.is_finite() { Some(out) } else { None }
}

/// Change vs the value `lag` positions earlier; absent for the first `lag` entries.
pub fn lagged_change(values: &[Option<f64>], lag: usize, basis: ChangeBasis) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if lag == 0 || i < lag {
                None
            } else {
                change(values[i], values[i - lag], basis)
            }
        })
        .collect()
}

pub fn mom(values: &[Option<f64>], basis: ChangeBasis) -> Vec<Option<f64>> {
    lagged_change(values, MOM_LAG, basis)
}

pub fn yoy(values: &[Option<f64>], basis: ChangeBasis) -> Vec<Option<f64>> {
    lagged_change(values, YOY_LAG, basis)
}

/// Trailing mean over `[i - window + 1, i]`.
///
/// Present only when every slot in the window holds a value (no partial windows).
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let mut sum = 0.0;
            for v in slice {
                sum += (*v)?;
            }
            Some(sum / window as f64)
        })
        .collect()
}

/// Fill (or, with `policy.recompute`, replace) the derived fields.
///
/// Upstream values that are present win over recomputation unless recompute
/// is requested. Rolling means are computed from the resolved MoM column so a
/// series mixing upstream and computed MoM values stays consistent.
pub fn derive_metrics(observations: &[Observation], basis: ChangeBasis, policy: MetricsPolicy) -> Vec<Observation> {
    let values: Vec<Option<f64>> = observations.iter().map(|o| o.value).collect();

    let resolve = |upstream: Option<f64>, computed: Option<f64>| {
        if policy.recompute { computed } else { upstream.or(computed) }
    };

    let computed_mom = mom(&values, basis);
    let computed_yoy = yoy(&values, basis);

    let mom_column: Vec<Option<f64>> = observations
        .iter()
        .zip(&computed_mom)
        .map(|(o, &c)| resolve(o.mom_change, c))
        .collect();

    let avg_12 = rolling_mean(&mom_column, SHORT_WINDOW);
    let avg_36 = rolling_mean(&mom_column, LONG_WINDOW);

    observations
        .iter()
        .enumerate()
        .map(|(i, o)| Observation {
            date: o.date.clone(),
            value: o.value,
            mom_change: mom_column[i],
            yoy_change: resolve(o.yoy_change, computed_yoy[i]),
            mom_12mo_avg: resolve(o.mom_12mo_avg, avg_12[i]),
            mom_36mo_avg: resolve(o.mom_36mo_avg, avg_36[i]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationDate;

    fn monthly(values: &[f64]) -> Vec<Observation> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let date = format!("{}-{:02}", 2020 + i / 12, i % 12 + 1);
                Observation::raw(ObservationDate::parse(&date).unwrap(), Some(v))
            })
            .collect()
    }

    fn fill(obs: &[Observation]) -> Vec<Observation> {
        derive_metrics(obs, ChangeBasis::Percent, MetricsPolicy::default())
    }

    #[test]
    fn short_series_have_no_changes() {
        for obs in [monthly(&[]), monthly(&[100.0])] {
            for o in fill(&obs) {
                assert_eq!(o.mom_change, None);
                assert_eq!(o.yoy_change, None);
            }
        }
    }

    #[test]
    fn mom_basic_and_zero_base() {
        let out = fill(&monthly(&[100.0, 110.0, 0.0, 5.0]));
        assert_eq!(out[0].mom_change, None);
        assert!((out[1].mom_change.unwrap() - 10.0).abs() < 1e-12);
        assert!((out[2].mom_change.unwrap() + 100.0).abs() < 1e-12);
        // Previous value is zero: undefined, not infinite.
        assert_eq!(out[3].mom_change, None);
    }

    #[test]
    fn missing_previous_value_breaks_mom() {
        let values = [Some(100.0), None, Some(102.0)];
        let out = mom(&values, ChangeBasis::Percent);
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn yoy_needs_twelve_prior_observations() {
        let twelve: Vec<f64> = (1..=12).map(f64::from).collect();
        assert!(fill(&monthly(&twelve)).iter().all(|o| o.yoy_change.is_none()));

        let thirteen: Vec<f64> = (1..=13).map(f64::from).collect();
        let out = fill(&monthly(&thirteen));
        assert!(out[..12].iter().all(|o| o.yoy_change.is_none()));
        assert!((out[12].yoy_change.unwrap() - 1200.0).abs() < 1e-9);

        let mut zero_base = thirteen.clone();
        zero_base[0] = 0.0;
        assert_eq!(fill(&monthly(&zero_base))[12].yoy_change, None);
    }

    #[test]
    fn rolling_12_matches_hand_computed_mean() {
        // 100, 101, ..., 112: MoM[i] = 100 / (99 + i) for i in 1..=12.
        let values: Vec<f64> = (0..13).map(|i| 100.0 + f64::from(i)).collect();
        let out = fill(&monthly(&values));

        assert!(out[..12].iter().all(|o| o.mom_12mo_avg.is_none()));

        let expected = [
            1.0, 0.990_099_009_9, 0.980_392_156_9, 0.970_873_786_4, 0.961_538_461_5, 0.952_380_952_4,
            0.943_396_226_4, 0.934_579_439_3, 0.925_925_925_9, 0.917_431_192_7, 0.909_090_909_1, 0.900_900_900_9,
        ];
        let mean = expected.iter().sum::<f64>() / 12.0;
        assert!((out[12].mom_12mo_avg.unwrap() - mean).abs() < 1e-9);
        assert_eq!(out[12].mom_36mo_avg, None);
    }

    #[test]
    fn rolling_mean_rejects_partial_windows() {
        let values = [Some(1.0), None, Some(3.0), Some(5.0)];
        assert_eq!(rolling_mean(&values, 2), vec![None, None, None, Some(4.0)]);
        assert_eq!(rolling_mean(&values, 0), vec![None; 4]);
    }

    #[test]
    fn doubling_series_has_flat_rolling_average() {
        let values: Vec<f64> = (0..40).map(|i| 2f64.powi(i)).collect();
        let out = fill(&monthly(&values));
        assert!((out[12].mom_12mo_avg.unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(out[35].mom_36mo_avg, None);
        assert!((out[36].mom_36mo_avg.unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn upstream_values_win_unless_recompute() {
        let mut obs = monthly(&[100.0, 110.0]);
        obs[1].mom_change = Some(9.99);

        let kept = fill(&obs);
        assert_eq!(kept[1].mom_change, Some(9.99));

        let replaced = derive_metrics(&obs, ChangeBasis::Percent, MetricsPolicy { recompute: true });
        assert!((replaced[1].mom_change.unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn upstream_zero_is_a_real_value() {
        let mut obs = monthly(&[100.0, 110.0]);
        obs[1].mom_change = Some(0.0);
        assert_eq!(fill(&obs)[1].mom_change, Some(0.0));
    }

    #[test]
    fn points_basis_uses_differences() {
        let out = derive_metrics(&monthly(&[4.0, 0.0, 3.5]), ChangeBasis::Points, MetricsPolicy::default());
        assert!((out[1].mom_change.unwrap() + 4.0).abs() < 1e-12);
        assert!((out[2].mom_change.unwrap() - 3.5).abs() < 1e-12);
    }
}

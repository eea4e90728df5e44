//! Shared vertical scale for charts and sparklines.

use serde::{Deserialize, Serialize};

/// Value range across everything drawn on one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
    /// Domain holds both negative and non-negative values (draw a zero line).
    pub crosses_zero: bool,
}

impl ValueDomain {
    /// Domain of all finite values; `None` when there are none.
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }
        Some(Self {
            min,
            max,
            crosses_zero: min < 0.0 && max >= 0.0,
        })
    }

    /// `max - min`, or `1.0` for a flat domain. Only used for scaling.
    pub fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 { span } else { 1.0 }
    }

    /// Position of `value` in the domain, `0.0` at `min`.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    /// Screen-style y coordinate (0 at the top) for a drawing of `height` units.
    pub fn scale_y(&self, value: f64, height: f64) -> f64 {
        height - self.normalize(value) * height
    }
}

/// x coordinate of point `index` of `count` across `width` units.
pub fn scale_x(index: usize, count: usize, width: f64) -> f64 {
    if count < 2 {
        return 0.0;
    }
    index as f64 / (count - 1) as f64 * width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_non_finite_inputs_have_no_domain() {
        assert_eq!(ValueDomain::of(Vec::<f64>::new()), None);
        assert_eq!(ValueDomain::of(vec![f64::NAN, f64::INFINITY]), None);
    }

    #[test]
    fn flat_domain_scales_with_unit_span() {
        let d = ValueDomain::of(vec![2.5, 2.5]).unwrap();
        assert_eq!(d.min, 2.5);
        assert_eq!(d.max, 2.5);
        assert_eq!(d.span(), 1.0);
        assert_eq!(d.scale_y(2.5, 30.0), 30.0);
        assert!(!d.crosses_zero);
    }

    #[test]
    fn zero_crossing_detection() {
        assert!(ValueDomain::of(vec![-1.0, 0.0]).unwrap().crosses_zero);
        assert!(ValueDomain::of(vec![-1.0, 3.0]).unwrap().crosses_zero);
        assert!(!ValueDomain::of(vec![-3.0, -1.0]).unwrap().crosses_zero);
        assert!(!ValueDomain::of(vec![0.0, 1.0]).unwrap().crosses_zero);
    }

    #[test]
    fn scale_x_handles_single_point() {
        assert_eq!(scale_x(0, 1, 100.0), 0.0);
        assert_eq!(scale_x(2, 3, 100.0), 100.0);
    }
}

use crate::{CoreError, CoreResult};

pub fn ensure_finite(v: f64, what: &'static str) -> CoreResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check every entry of a slice, reporting the first non-finite value.
pub fn ensure_all_finite(values: &[f64], what: &'static str) -> CoreResult<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(CoreError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// `(min, max)` over the values, `None` when empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "mach").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
        assert!(msg.contains("mach"));
    }

    #[test]
    fn ensure_all_finite_reports_first_bad_value() {
        assert!(ensure_all_finite(&[0.0, 1.5, -2.0], "field").is_ok());
        let err = ensure_all_finite(&[0.0, f64::INFINITY, f64::NAN], "field").unwrap_err();
        assert_eq!(
            err,
            CoreError::NonFinite {
                what: "field",
                value: f64::INFINITY
            }
        );
    }

    #[test]
    fn min_max_of_empty_is_none() {
        assert_eq!(min_max(&[]), None);
        assert_eq!(min_max(&[0.3, -1.0, 2.5]), Some((-1.0, 2.5)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn min_max_bounds_every_value(values in prop::collection::vec(-1e3_f64..1e3, 1..32)) {
            let (lo, hi) = min_max(&values).unwrap();
            prop_assert!(values.iter().all(|&v| lo <= v && v <= hi));
        }
    }
}

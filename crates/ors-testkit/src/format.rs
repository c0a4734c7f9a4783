//! # Parameter Format Checks
//!
//! Entry points the client tests call after building a request, to confirm
//! the parameters they passed have the shape the client accepts.

use ors_params::{ors_parameters, ParamValidationError, ParamValidator, Params};

/// Validate `params` against the openrouteservice parameter schema with the
/// default (strict) configuration.
///
/// # Errors
///
/// Returns `ParamValidationError::ValidationFailed` listing every violation.
pub fn validate_format(params: &Params) -> Result<(), ParamValidationError> {
    ParamValidator::new(ors_parameters()).validate(params)
}

/// Assert that `params` conform to the openrouteservice parameter schema.
///
/// # Panics
///
/// Panics with the formatted violation list when any parameter fails.
#[track_caller]
pub fn assert_valid_format(params: &Params) {
    if let Err(e) = validate_format(params) {
        panic!("parameter format check failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ors_params::params;

    #[test]
    fn valid_isochrones_params() {
        assert_valid_format(&params! {
            "locations" => vec![vec![8.34234, 48.23424], vec![8.34423, 48.26424]],
            "profile" => "cycling-regular",
            "range_type" => "distance",
            "range" => vec![18000],
            "interval" => vec![3000],
            "units" => "m",
            "attributes" => vec!["area", "reachfactor"],
            "smoothing" => 0.5,
        });
    }

    #[test]
    fn invalid_params_are_reported() {
        let err = validate_format(&params! { "units" => "parsecs" }).unwrap_err();
        assert_eq!(err.violations().map(|v| v.len()), Some(1));
    }

    #[test]
    #[should_panic(expected = "units [allowed]")]
    fn assert_panics_with_violation() {
        assert_valid_format(&params! { "units" => "parsecs" });
    }
}

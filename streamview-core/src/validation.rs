use crate::error::ConfigurationError;

pub struct Validator;

impl Validator {
    pub fn non_negative_length(name: &'static str, value: f64) -> Result<f64, ConfigurationError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(ConfigurationError::InvalidLength(name))
        }
    }

    pub fn positive_count(value: usize, err: ConfigurationError) -> Result<usize, ConfigurationError> {
        if value == 0 {
            Err(err)
        } else {
            Ok(value)
        }
    }

    pub fn time_range(start: i64, end: i64) -> Result<(i64, i64), ConfigurationError> {
        if start > end {
            Err(ConfigurationError::InvertedTimeRange { start, end })
        } else {
            Ok((start, end))
        }
    }
}

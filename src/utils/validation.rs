use crate::utils::error::{KpaError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(KpaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(KpaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(KpaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KpaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(KpaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_min_count(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(KpaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| KpaError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("genesis_base_url", "https://example.com").is_ok());
        assert!(validate_url("genesis_base_url", "http://example.com").is_ok());
        assert!(validate_url("genesis_base_url", "").is_err());
        assert!(validate_url("genesis_base_url", "invalid-url").is_err());
        assert!(validate_url("genesis_base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("monthly_net_cold_rent", 850.0).is_ok());
        assert!(validate_positive("monthly_net_cold_rent", 0.0).is_err());
        assert!(validate_positive("monthly_net_cold_rent", -1.0).is_err());
        assert!(validate_positive("monthly_net_cold_rent", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_min_count() {
        assert!(validate_min_count("num_residential_units", 2, 1).is_ok());
        assert!(validate_min_count("num_residential_units", 0, 1).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let some: Option<u32> = Some(3);
        let none: Option<u32> = None;
        assert_eq!(*validate_required_field("num_residential_units", &some).unwrap(), 3);
        assert!(validate_required_field("num_residential_units", &none).is_err());
    }
}

//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All errors are
//! collected so an operator sees every problem in one pass.

use std::fmt;
use std::net::SocketAddr;

use chrono_tz::Tz;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(public_url) = &config.listener.public_url {
        if let Err(e) = Url::parse(public_url) {
            errors.push(ValidationError::new(
                "listener.public_url",
                format!("'{}' is not a URL: {}", public_url, e),
            ));
        }
    }

    match Url::parse(&config.upstream.target_host) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.target_host",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "upstream.target_host",
            format!("'{}' is not a URL: {}", config.upstream.target_host, e),
        )),
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be greater than zero"));
    }
    if config.upstream.connect_secs == 0 {
        errors.push(ValidationError::new("upstream.connect_secs", "must be greater than zero"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than zero"));
    }

    if config.pagination.ceiling == 0 {
        errors.push(ValidationError::new("pagination.ceiling", "must be greater than zero"));
    }

    if config.dataset.id_field.trim().is_empty() {
        errors.push(ValidationError::new("dataset.id_field", "must not be empty"));
    }
    if config.dataset.time_zone.parse::<Tz>().is_err() {
        errors.push(ValidationError::new(
            "dataset.time_zone",
            format!("unknown time zone '{}'", config.dataset.time_zone),
        ));
    }

    let food = &config.dataset.food;
    if !food.route.starts_with('/') {
        errors.push(ValidationError::new("dataset.food.route", "must start with '/'"));
    }
    if !food.upstream_path.starts_with('/') {
        errors.push(ValidationError::new("dataset.food.upstream_path", "must start with '/'"));
    }
    if food.window_days == 0 {
        errors.push(ValidationError::new("dataset.food.window_days", "must be greater than zero"));
    }
    if food.limit == 0 {
        errors.push(ValidationError::new("dataset.food.limit", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ProxyConfig::default();
        config.pagination.ceiling = 0;
        config.dataset.time_zone = "Mars/Olympus_Mons".into();
        config.upstream.target_host = "ftp://example.org".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["upstream.target_host", "pagination.ceiling", "dataset.time_zone"]
        );
    }

    #[test]
    fn test_food_route_must_be_absolute() {
        let mut config = ProxyConfig::default();
        config.dataset.food.route = "food-trucks".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].to_string(), "dataset.food.route: must start with '/'");
    }
}

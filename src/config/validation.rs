//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_base_url(&config.account.base_url)?;
    validate_token(&config.account.access_token)?;
    validate_max_threads(config.options.max_threads)?;
    validate_enrollment_states(&config.courses.enrollment_states)?;

    if config.options.max_folder_depth == 0 {
        return Err(Error::ConfigValidation {
            field: "max_folder_depth".to_string(),
            message: "Folder depth limit must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate the Canvas instance URL.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return Err(Error::MissingConfig("base_url".to_string()));
    }

    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: "URL must start with http:// or https://".to_string(),
        });
    }

    url::Url::parse(base_url).map_err(|e| Error::ConfigValidation {
        field: "base_url".to_string(),
        message: format!("Invalid URL '{}': {}", base_url, e),
    })?;

    Ok(())
}

/// Validate the access token.
pub fn validate_token(token: &str) -> Result<()> {
    if token.trim().is_empty() {
        return Err(Error::MissingConfig("access_token".to_string()));
    }

    // Check for placeholder values
    let token_lower = token.to_lowercase();
    if token_lower.contains("replaceme") || token_lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token appears to be a placeholder. Please provide your Canvas access token."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the worker pool size.
pub fn validate_max_threads(max_threads: usize) -> Result<()> {
    if max_threads == 0 {
        return Err(Error::ConfigValidation {
            field: "max_threads".to_string(),
            message: "Please enter a positive integer.".to_string(),
        });
    }
    Ok(())
}

/// Validate enrollment state filters.
pub fn validate_enrollment_states(states: &[String]) -> Result<()> {
    const KNOWN: [&str; 3] = ["active", "completed", "invited_or_pending"];

    if states.is_empty() {
        return Err(Error::MissingConfig("enrollment_states".to_string()));
    }

    if let Some(bad) = states.iter().find(|s| !KNOWN.contains(&s.as_str())) {
        return Err(Error::ConfigValidation {
            field: "enrollment_states".to_string(),
            message: format!(
                "Unknown enrollment state '{}' (expected one of: {})",
                bad,
                KNOWN.join(", ")
            ),
        });
    }

    Ok(())
}

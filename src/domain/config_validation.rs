//! Configuration validation.
//!
//! Checks the optional settings of a dealdesk INI file up front so a typo
//! fails the run instead of silently falling back to a default.

use crate::domain::browse::SortOrder;
use crate::domain::error::DealdeskError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), DealdeskError> {
    validate_data_dir(config)?;
    validate_sort(config)?;
    validate_min_yield(config)?;
    validate_max_tenor(config)?;
    validate_json_flag(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DealdeskError {
    DealdeskError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), DealdeskError> {
    match config.get_string("data", "dir") {
        Some(dir) if dir.trim().is_empty() => Err(invalid("data", "dir", "dir must not be empty")),
        _ => Ok(()),
    }
}

fn validate_sort(config: &dyn ConfigPort) -> Result<(), DealdeskError> {
    match config.get_string("browse", "sort") {
        Some(sort) => sort
            .parse::<SortOrder>()
            .map(|_| ())
            .map_err(|e| invalid("browse", "sort", e.to_string())),
        None => Ok(()),
    }
}

fn validate_min_yield(config: &dyn ConfigPort) -> Result<(), DealdeskError> {
    let Some(raw) = config.get_string("browse", "min_yield") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(()),
        _ => Err(invalid(
            "browse",
            "min_yield",
            "min_yield must be a non-negative number",
        )),
    }
}

fn validate_max_tenor(config: &dyn ConfigPort) -> Result<(), DealdeskError> {
    let Some(raw) = config.get_string("browse", "max_tenor") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v > 0 => Ok(()),
        _ => Err(invalid(
            "browse",
            "max_tenor",
            "max_tenor must be a positive whole number of months",
        )),
    }
}

fn validate_json_flag(config: &dyn ConfigPort) -> Result<(), DealdeskError> {
    let Some(raw) = config.get_string("output", "json") else {
        return Ok(());
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "false" | "no" | "0" => Ok(()),
        _ => Err(invalid("output", "json", "json must be true or false")),
    }
}

//! Query-parameter parsing. Handlers take every parameter as an optional
//! string and convert here, so a malformed value turns into a field error in
//! the envelope instead of a framework rejection.

use crate::config::AppConfig;
use crate::services::pagination::PageParams;
use crate::web::error::FieldErrors;

pub fn opt_i64(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: Option<&String>,
) -> Option<i64> {
    let raw = raw.map(|s| s.trim()).filter(|s| !s.is_empty())?;
    match raw.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, "must be an integer");
            None
        }
    }
}

pub fn opt_f64(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: Option<&String>,
) -> Option<f64> {
    let raw = raw.map(|s| s.trim()).filter(|s| !s.is_empty())?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            errors.push(field, "must be a number");
            None
        }
    }
}

/// Required numeric parameter with an inclusive range.
pub fn req_range_f64(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: Option<&String>,
    min: f64,
    max: f64,
) -> Option<f64> {
    match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => {
            errors.push(field, "is required");
            None
        }
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                if (min..=max).contains(&value) {
                    Some(value)
                } else {
                    errors.push(field, format!("must be between {min} and {max}"));
                    None
                }
            }
            _ => {
                errors.push(field, "must be a number");
                None
            }
        },
    }
}

pub fn req_range_i64(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: Option<&String>,
    min: i64,
    max: i64,
) -> Option<i64> {
    match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => {
            errors.push(field, "is required");
            None
        }
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) => {
                if (min..=max).contains(&value) {
                    Some(value)
                } else {
                    errors.push(field, format!("must be between {min} and {max}"));
                    None
                }
            }
            Err(_) => {
                errors.push(field, "must be an integer");
                None
            }
        },
    }
}

pub fn page_params(
    errors: &mut FieldErrors,
    config: &AppConfig,
    page_raw: Option<&String>,
    per_page_raw: Option<&String>,
) -> PageParams {
    let page = opt_i64(errors, "page", page_raw).unwrap_or(1);
    if page < 1 {
        errors.push("page", "must be at least 1");
    }

    let per_page = opt_i64(errors, "per_page", per_page_raw).unwrap_or(config.default_per_page);
    if per_page < 1 || per_page > config.max_per_page {
        errors.push(
            "per_page",
            format!("must be between 1 and {}", config.max_per_page),
        );
    }

    // Clamped copies; only used when no error was recorded above.
    PageParams {
        page: page.max(1),
        per_page: per_page.clamp(1, config.max_per_page),
    }
}

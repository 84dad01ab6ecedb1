//! Field validators for `#[validate(custom(function = ...))]` attributes.
//!
//! ```ignore
//! use axum_helpers::validation::{clock_time, not_blank};
//!
//! #[derive(Deserialize, Validate)]
//! struct CreateTask {
//!     #[serde(default)]
//!     #[validate(custom(function = "not_blank"))]
//!     task_name: String,
//!     #[serde(default)]
//!     #[validate(custom(function = "clock_time"))]
//!     time: String,
//! }
//! ```

use chrono::NaiveDate;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

/// 24-hour wall-clock time, `00:00` through `23:59`
pub static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1]\d|2[0-3]):([0-5]\d)$").unwrap());

/// `local@domain.tld`, nothing fancier
static EMAIL_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Date format accepted for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "must not be blank"));
    }
    Ok(())
}

pub fn clock_time(value: &str) -> Result<(), ValidationError> {
    if !CLOCK_TIME.is_match(value.trim()) {
        return Err(invalid("time_format", "time must be HH:MM (00:00-23:59)"));
    }
    Ok(())
}

pub fn calendar_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| invalid("date_format", "date must be YYYY-MM-DD"))
}

pub fn email_address(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_ADDRESS.is_match(value.trim()) {
        return Err(invalid("email", "email must look like name@domain.tld"));
    }
    Ok(())
}

/// Money amounts: finite and not negative.
pub fn non_negative_amount(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid("amount", "must be a finite number >= 0"));
    }
    Ok(())
}

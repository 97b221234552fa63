//! Validation utilities for the salon inventory forms
//!
//! Field rules are declared with `validator` derives on the input types;
//! the functions here back the custom and schema-level rules and turn
//! `validator` reports into localized form errors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::models::{MaterialInput, MAX_RATE};
use crate::types::Language;

// ============================================================================
// Stock Validations
// ============================================================================

/// The "sufficient" threshold must be strictly above the "low" one
pub fn thresholds_consistent(min_threshold: i64, enough_threshold: i64) -> Result<(), &'static str> {
    if enough_threshold <= min_threshold {
        return Err("Sufficient threshold must exceed the minimum threshold");
    }
    Ok(())
}

pub fn validate_material_thresholds(input: &MaterialInput) -> Result<(), ValidationError> {
    thresholds_consistent(input.min_amount_threshold, input.enough_amount_threshold)
        .map_err(|_| ValidationError::new("threshold_order"))
}

pub fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::new("not_positive"));
    }
    Ok(())
}

pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative"));
    }
    Ok(())
}

/// Entity references chosen in a dropdown must be set
pub fn validate_required_id(id: &i64) -> Result<(), ValidationError> {
    if *id <= 0 {
        return Err(ValidationError::new("missing_reference"));
    }
    Ok(())
}

/// Usage cannot be logged ahead of time
pub fn validate_not_future(date: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *date > Utc::now() {
        return Err(ValidationError::new("future_date"));
    }
    Ok(())
}

pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
    if !(0.0..=MAX_RATE).contains(&rating) {
        return Err(ValidationError::new("rating_range"));
    }
    Ok(())
}

// ============================================================================
// Contact Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// Validate Ukrainian phone number in the `+380XXXXXXXXX` form
pub fn validate_ua_phone(phone: &str) -> Result<(), &'static str> {
    let Some(rest) = phone.strip_prefix("+380") else {
        return Err("Phone number must start with +380");
    };
    if rest.len() != 9 || !rest.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number must have 9 digits after +380");
    }
    Ok(())
}

pub fn validate_ua_phone_field(phone: &str) -> Result<(), ValidationError> {
    validate_ua_phone(phone).map_err(|_| ValidationError::new("phone_format"))
}

/// Registration only asks for at least 10 digits, separators allowed
pub fn validate_phone_digits(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 10 {
        return Err(ValidationError::new("phone_digits"));
    }
    Ok(())
}

// ============================================================================
// Form Error Reporting
// ============================================================================

/// Key used by `validator` for struct-level (schema) errors
pub const FORM_LEVEL: &str = "__all__";

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
}

impl FieldError {
    pub fn message(&self, lang: Language) -> &'static str {
        message_for_code(&self.code, lang)
    }
}

/// Rejected form submission, reported before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("form has {} invalid field(s)", .errors.len())]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// First message, for a single toast
    pub fn summary(&self, lang: Language) -> String {
        match self.errors.first() {
            Some(first) if first.field == FORM_LEVEL => first.message(lang).to_string(),
            Some(first) => format!("{}: {}", first.field, first.message(lang)),
            None => String::new(),
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(report: ValidationErrors) -> Self {
        let mut errors = Vec::new();
        collect(&report, None, &mut errors);
        errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        FormErrors { errors }
    }
}

fn collect(report: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in report.errors() {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|e| FieldError {
                    field: name.clone(),
                    code: e.code.to_string(),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&name), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, Some(&format!("{}[{}]", name, index)), out);
                }
            }
        }
    }
}

/// Validate a form with its `validator` rules and convert the report
pub fn check<T: validator::Validate>(form: &T) -> Result<(), FormErrors> {
    form.validate().map_err(FormErrors::from)
}

fn message_for_code(code: &str, lang: Language) -> &'static str {
    match code {
        "required" => lang.pick("Це поле обов'язкове", "This field is required"),
        "too_short" | "length" => lang.pick("Значення закоротке", "Value is too short"),
        "email" => lang.pick("Неправильний email", "Invalid email"),
        "negative" => lang.pick("Це поле не може бути від'ємним", "Must not be negative"),
        "not_positive" => lang.pick("Має бути більше 0", "Must be greater than 0"),
        "threshold_order" => lang.pick(
            "Має бути більшим за мінімальний поріг",
            "Must exceed the minimum threshold",
        ),
        "rating_range" => lang.pick("Рейтинг поза допустимими межами", "Rating is out of range"),
        "phone_format" => lang.pick(
            "Номер має бути у форматі +380XXXXXXXXX",
            "Number must look like +380XXXXXXXXX",
        ),
        "phone_digits" => lang.pick(
            "Номер має містити щонайменше 10 цифр",
            "Phone number must have at least 10 digits",
        ),
        "future_date" => lang.pick(
            "Це не може бути використане для майбутніх записів",
            "Date cannot be in the future",
        ),
        "must_match" => lang.pick("Паролі мають збігатися", "Passwords must match"),
        "missing_reference" => lang.pick("Оберіть значення зі списку", "Pick a value from the list"),
        _ => lang.pick("Некоректне значення", "Invalid value"),
    }
}

//! Field rules for user payloads.
//!
//! Inputs are normalized (trimmed, email lowercased) before the rules run,
//! and all failing fields are collected into one [`ValidationErrors`].

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::models::{CreateUser, NewUser, UpdateUser, UserChanges};

/// Minimum name length, counted in UTF-16 code units
pub const NAME_MIN_LENGTH: usize = 2;

/// Order in which failing fields appear in the summary message
const FIELD_ORDER: [&str; 3] = ["name", "age", "email"];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is a valid regex")
});

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn check_name(name: &str, errors: &mut ValidationErrors) {
    if name.is_empty() {
        errors.add("name", violation("required", "Name is required"));
    } else if name.encode_utf16().count() < NAME_MIN_LENGTH {
        let mut error = violation("length", "Name must be at least 2 characters");
        error.add_param(Cow::Borrowed("min"), &NAME_MIN_LENGTH);
        error.add_param(Cow::Borrowed("value"), &name);
        errors.add("name", error);
    }
}

fn check_age(age: i64, errors: &mut ValidationErrors) {
    if age < 0 {
        let mut error = violation("range", "Age must be >= 0");
        error.add_param(Cow::Borrowed("min"), &0);
        error.add_param(Cow::Borrowed("value"), &age);
        errors.add("age", error);
    }
}

fn check_email(email: &str, errors: &mut ValidationErrors) {
    if email.is_empty() {
        errors.add("email", violation("required", "Email is required"));
    } else if !EMAIL_REGEX.is_match(email) {
        let mut error = violation("email", "Email is invalid");
        error.add_param(Cow::Borrowed("value"), &email);
        errors.add("email", error);
    }
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string())
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email.map(|e| e.trim().to_lowercase())
}

/// Normalize and validate a creation payload.
pub fn validate_new_user(input: CreateUser) -> Result<NewUser, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = normalize_name(input.name).unwrap_or_default();
    check_name(&name, &mut errors);

    match input.age {
        Some(age) => check_age(age, &mut errors),
        None => errors.add("age", violation("required", "Age is required")),
    }

    let email = normalize_email(input.email).unwrap_or_default();
    check_email(&email, &mut errors);

    match input.age {
        Some(age) if errors.is_empty() => Ok(NewUser {
            name,
            age,
            email,
            address: input.address,
        }),
        _ => Err(errors),
    }
}

/// Normalize and validate the fields present in an update payload.
///
/// Absent fields are not checked and stay absent in the result.
pub fn validate_changes(input: UpdateUser) -> Result<UserChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = normalize_name(input.name);
    if let Some(ref name) = name {
        check_name(name, &mut errors);
    }

    if let Some(age) = input.age {
        check_age(age, &mut errors);
    }

    let email = normalize_email(input.email);
    if let Some(ref email) = email {
        check_email(email, &mut errors);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UserChanges {
        name,
        age: input.age,
        email,
        address: input.address,
    })
}

/// One-line description of every failing field, e.g.
/// `User validation failed: name: Name is required, age: Age must be >= 0`.
pub fn summarize(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    let parts: Vec<String> = FIELD_ORDER
        .iter()
        .filter_map(|field| field_errors.get(*field).map(|errs| (*field, errs)))
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                format!("{}: {}", field, e.message.as_deref().unwrap_or(e.code.as_ref()))
            })
        })
        .collect();

    format!("User validation failed: {}", parts.join(", "))
}

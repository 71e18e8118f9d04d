//! Form validation.
//!
//! Forms hold exactly what the user typed. Each `validate_*` function checks every field, collects
//! all failures into [`ValidationErrors`], and only on success produces the request body for the
//! backend. Validation failures never reach the store.

use crate::{
    entities::{
        ChangePasswordRequest, NewBudget, NewTransaction, ResetPasswordConfirmRequest,
        ResetPasswordRequest, SignUpRequest,
    },
    errors::ValidationErrors,
};
use chrono::{DateTime, Utc};

/// Status sent with every transaction recorded from the client.
pub const DEFAULT_TRANSACTION_STATUS: &str = "Success";
/// Minimum length for a changed or reset password.
pub const MIN_NEW_PASSWORD_LEN: usize = 8;
/// Minimum length for a sign-up password.
pub const MIN_SIGN_UP_PASSWORD_LEN: usize = 4;

/// New-transaction form.
#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    /// Amount as typed
    pub amount: String,
    /// Free text, required
    pub description: String,
    /// Category id as selected
    pub category: String,
}

/// New-budget form.
#[derive(Debug, Clone, Default)]
pub struct BudgetForm {
    /// Category id as selected
    pub category: String,
    /// Budget limit
    pub amount: String,
}

/// Registration form.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Phone number, digits and separators
    pub phone_number: String,
    /// Chosen password
    pub password: String,
    /// Must equal `password`
    pub confirm_password: String,
}

/// Password change form.
#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    /// Password in use now
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
    /// Must equal `new_password`
    pub confirm_password: String,
}

/// "Forgot password" form.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    /// Address the reset link goes to
    pub email: String,
}

/// Form reached from the password reset link.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordConfirmForm {
    /// Replacement password
    pub new_password: String,
    /// Must equal `new_password`
    pub confirm_password: String,
}

/// Payment reference for a transaction created at `at`.
#[must_use]
pub fn transaction_reference(at: DateTime<Utc>) -> String {
    format!("tx-{}", at.timestamp_millis())
}

/// Splits a full name on its first space. Without a last name the first name is repeated.
#[must_use]
pub fn split_full_name(name: &str) -> (String, String) {
    let trimmed = name.trim();
    match trimmed.split_once(' ') {
        Some((first, rest)) if !rest.trim().is_empty() => {
            (first.to_string(), rest.trim().to_string())
        }
        _ => (trimmed.to_string(), trimmed.to_string()),
    }
}

/// Loose `something@something.something` check.
#[must_use]
pub fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    // Needs a dot with something on both sides after the @
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn parse_positive_amount(
    raw: &str,
    field: &'static str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, format!("{label} is required"));
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        Ok(_) => {
            errors.add(field, format!("{label} must be greater than zero"));
            None
        }
        Err(_) => {
            errors.add(field, format!("{label} must be a number"));
            None
        }
    }
}

fn parse_category(raw: &str, errors: &mut ValidationErrors) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add("category", "Category is required");
        return None;
    }
    raw.parse::<i64>().map_or_else(
        |_| {
            errors.add("category", "Select a valid category");
            None
        },
        Some,
    )
}

fn check_length(
    value: &str,
    field: &'static str,
    label: &str,
    min: usize,
    max: usize,
    errors: &mut ValidationErrors,
) {
    let len = value.trim().chars().count();
    if value.is_empty() {
        errors.add(field, format!("{label} is required"));
    } else if len < min {
        errors.add(field, format!("{label} must be at least {min} characters"));
    } else if len > max {
        errors.add(field, format!("{label} must be less than {max} characters"));
    }
}

fn check_new_password(new_password: &str, confirm_password: &str, errors: &mut ValidationErrors) {
    if new_password != confirm_password {
        errors.add(
            "confirm_password",
            "New password and confirmation do not match",
        );
    }
    if new_password.chars().count() < MIN_NEW_PASSWORD_LEN {
        errors.add(
            "new_password",
            format!("Password must be at least {MIN_NEW_PASSWORD_LEN} characters long"),
        );
    }
}

/// Validates a new transaction, stamping the reference with `now`.
pub fn validate_transaction_form_at(
    form: &TransactionForm,
    now: DateTime<Utc>,
) -> Result<NewTransaction, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let amount = parse_positive_amount(&form.amount, "amount", "Amount", &mut errors);
    let description = form.description.trim();
    if description.is_empty() {
        errors.add("description", "Description is required");
    }
    let category = parse_category(&form.category, &mut errors);

    match (amount, category) {
        (Some(amount), Some(category)) if errors.is_empty() => Ok(NewTransaction {
            category,
            amount,
            description: description.to_string(),
            tx_ref: transaction_reference(now),
            status: DEFAULT_TRANSACTION_STATUS.to_string(),
        }),
        _ => Err(errors),
    }
}

/// Validates a new transaction using the current time for its reference.
pub fn validate_transaction_form(form: &TransactionForm) -> Result<NewTransaction, ValidationErrors> {
    validate_transaction_form_at(form, Utc::now())
}

/// Validates a new budget: a numeric category and a positive limit.
pub fn validate_budget_form(form: &BudgetForm) -> Result<NewBudget, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let category = parse_category(&form.category, &mut errors);
    let amount = parse_positive_amount(&form.amount, "amount", "Budget amount", &mut errors);

    match (category, amount) {
        (Some(category), Some(amount)) => Ok(NewBudget { category, amount }),
        _ => Err(errors),
    }
}

/// Validates registration, collecting every failing field.
pub fn validate_sign_up_form(form: &SignUpForm) -> Result<SignUpRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_length(&form.first_name, "first_name", "First name", 2, 100, &mut errors);
    check_length(&form.last_name, "last_name", "Last name", 2, 100, &mut errors);
    check_length(&form.username, "username", "Username", 3, 50, &mut errors);

    let email = form.email.trim();
    if form.email.is_empty() {
        errors.add("email", "Email is required");
    } else if !looks_like_email(email) {
        errors.add("email", "Invalid email format");
    } else if email.chars().count() > 255 {
        errors.add("email", "Email must be less than 255 characters");
    }

    let phone = form.phone_number.trim();
    if form.phone_number.is_empty() {
        errors.add("phone_number", "Phone number is required");
    } else if phone.chars().count() < 10 {
        errors.add("phone_number", "Phone number must be at least 10 digits");
    } else if phone.chars().count() > 20 {
        errors.add("phone_number", "Phone number must be less than 20 characters");
    }

    if form.password.is_empty() {
        errors.add("password", "Password is required");
    } else if form.password.chars().count() < MIN_SIGN_UP_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {MIN_SIGN_UP_PASSWORD_LEN} characters"),
        );
    }

    if form.confirm_password.is_empty() {
        errors.add("confirm_password", "Please confirm your password");
    } else if form.password != form.confirm_password {
        errors.add("confirm_password", "Passwords do not match");
    }

    errors.into_result(SignUpRequest {
        email: email.to_string(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        password: form.password.clone(),
        username: form.username.trim().to_string(),
        phone_number: phone.to_string(),
    })
}

/// Validates a password change.
pub fn validate_change_password_form(
    form: &ChangePasswordForm,
) -> Result<ChangePasswordRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if form.current_password.is_empty() {
        errors.add("current_password", "Current password is required");
    }
    check_new_password(&form.new_password, &form.confirm_password, &mut errors);

    errors.into_result(ChangePasswordRequest {
        current_password: form.current_password.clone(),
        new_password: form.new_password.clone(),
        confirm_password: form.confirm_password.clone(),
    })
}

/// Validates the "forgot password" email.
pub fn validate_reset_password_form(
    form: &ResetPasswordForm,
) -> Result<ResetPasswordRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let email = form.email.trim();
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !looks_like_email(email) {
        errors.add("email", "Invalid email format");
    }

    errors.into_result(ResetPasswordRequest {
        email: email.to_string(),
    })
}

/// Validates the new password chosen from a reset link.
pub fn validate_reset_password_confirm_form(
    form: &ResetPasswordConfirmForm,
) -> Result<ResetPasswordConfirmRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_new_password(&form.new_password, &form.confirm_password, &mut errors);

    errors.into_result(ResetPasswordConfirmRequest {
        new_password: form.new_password.clone(),
        confirm_password: form.confirm_password.clone(),
    })
}

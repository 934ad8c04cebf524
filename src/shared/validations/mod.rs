//! Signup field rules
//!
//! Plain data tables with membership checks. These are business rules for
//! which addresses the service accepts, not RFC email validation.

/// Symbols forbidden in an email local part and required (at least one) in a password.
///
/// `@` can never occur in a local part (it is the split point), so listing it
/// only affects the password rule.
pub const SYMBOLS: &[char] = &[
    '.', '/', '_', '+', '-', '!', '~', '#', '$', '%', '^', '&', '*', '(', ')', '=', '?', '<',
    '>', '"', '\'', '`', '|', '@',
];

/// Email providers accepted at signup.
pub const ALLOWED_EMAIL_DOMAINS: &[&str] = &["naver.com", "gmail.com", "hanmail.net", "kakao.com"];

/// Which signup rule a request broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupRuleViolation {
    InvalidEmailFormat,
    WeakPassword,
}

fn contains_symbol(s: &str) -> bool {
    s.chars().any(|c| SYMBOLS.contains(&c))
}

/// Text before the first `@` and, if present, the text between the first and second `@`.
fn split_email(email: &str) -> (&str, Option<&str>) {
    let mut parts = email.split('@');
    let local = parts.next().unwrap_or_default();
    (local, parts.next())
}

pub fn email_local_part_is_clean(email: &str) -> bool {
    let (local, _) = split_email(email);
    !contains_symbol(local)
}

pub fn email_domain_is_allowed(email: &str) -> bool {
    match split_email(email) {
        (_, Some(domain)) => ALLOWED_EMAIL_DOMAINS.contains(&domain),
        (_, None) => false,
    }
}

pub fn password_has_symbol(password: &str) -> bool {
    contains_symbol(password)
}

/// Apply the format rules in signup order: local part, domain, then password.
pub fn validate_signup_fields(email: &str, password: &str) -> Result<(), SignupRuleViolation> {
    if !email_local_part_is_clean(email) || !email_domain_is_allowed(email) {
        return Err(SignupRuleViolation::InvalidEmailFormat);
    }
    if !password_has_symbol(password) {
        return Err(SignupRuleViolation::WeakPassword);
    }
    Ok(())
}

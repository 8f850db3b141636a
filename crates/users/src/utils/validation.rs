//! Declarative request validation.
//!
//! Each request shape lists its own fields and the rules that apply to them, so a
//! rule declared for one shape never applies to another shape that happens to
//! share a field name.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

/// A single field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Field must not be empty.
    Required,
    /// Field must be at most this many characters long.
    MaxLen(usize),
    /// Field must be a syntactically valid email address.
    Email,
}

impl Rule {
    pub fn check(self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::MaxLen(max) => value.chars().count() <= max,
            Rule::Email => EMAIL_REGEX.is_match(value),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("required"),
            Rule::MaxLen(max) => write!(f, "max={max}"),
            Rule::Email => f.write_str("email"),
        }
    }
}

/// The first rule a request failed. Meant for logs, not for callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}` failed rule `{rule}`")]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
}

/// A field value paired with the rules it must satisfy.
pub type Constraint<'a> = (&'static str, &'a str, &'static [Rule]);

/// Implemented by every inbound request shape. Shapes without rules accept everything.
pub trait Validate {
    /// Message handed back to callers on any violation.
    const REJECTION: &'static str = "Invalid request";

    fn constraints(&self) -> Vec<Constraint<'_>> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value, rules) in self.constraints() {
            if let Some(rule) = rules.iter().copied().find(|rule| !rule.check(value)) {
                return Err(ValidationError { field, rule });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rule() {
        assert!(Rule::Required.check("x"));
        assert!(!Rule::Required.check(""));
    }

    #[test]
    fn test_max_len_counts_characters() {
        assert!(Rule::MaxLen(3).check("abc"));
        assert!(!Rule::MaxLen(3).check("abcd"));
        assert!(Rule::MaxLen(3).check("äöü"));
    }

    #[test]
    fn test_email_rule() {
        assert!(Rule::Email.check("ada@example.com"));
        assert!(Rule::Email.check("first.last+tag@sub.example.org"));
        assert!(!Rule::Email.check("not-an-email"));
        assert!(!Rule::Email.check("missing@tld"));
        assert!(!Rule::Email.check("@example.com"));
    }

    struct Probe<'a> {
        a: &'a str,
        b: &'a str,
    }

    const A_RULES: &[Rule] = &[Rule::Required, Rule::Email];
    const B_RULES: &[Rule] = &[Rule::MaxLen(2)];

    impl Validate for Probe<'_> {
        fn constraints(&self) -> Vec<Constraint<'_>> {
            vec![("a", self.a, A_RULES), ("b", self.b, B_RULES)]
        }
    }

    #[test]
    fn test_first_failure_is_reported() {
        let err = Probe { a: "", b: "toolong" }.validate().unwrap_err();
        assert_eq!(err, ValidationError { field: "a", rule: Rule::Required });
        assert_eq!(err.to_string(), "field `a` failed rule `required`");

        let err = Probe { a: "a@b.co", b: "toolong" }.validate().unwrap_err();
        assert_eq!(err.rule, Rule::MaxLen(2));

        assert!(Probe { a: "a@b.co", b: "ok" }.validate().is_ok());
        assert_eq!(Probe::REJECTION, "Invalid request");
    }

    struct Unchecked;

    impl Validate for Unchecked {}

    #[test]
    fn test_shape_without_rules_always_passes() {
        assert!(Unchecked.constraints().is_empty());
        assert!(Unchecked.validate().is_ok());
    }
}

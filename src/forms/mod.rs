//! Client-side form validation.
//!
//! A [`FormSchema`] is an ordered list of fields, each with an ordered list
//! of [`Rule`]s. Validation reports only the first violation per field and
//! any violation blocks submission. Username availability is the one
//! asynchronous check and lives in [`UsernameCheck`].

mod schemas;
mod username;

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

pub use schemas::{
    activity_form, category_form, change_password_form, comment_form, lesson_form, login_form,
    message_form, module_form, program_form, registration_form,
};
pub use username::{AvailabilityChecker, UsernameCheck, UsernameState};

/// A single validation rule.
///
/// Every rule except [`Rule::Required`] passes on an empty value, so
/// optional fields are only checked when filled in.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex, &'static str),
    Email,
    /// Must equal another field, e.g. a password confirmation.
    Equals(&'static str, &'static str),
    Numeric,
    PositiveNumber,
    /// Numeric and at least the given value.
    AtLeast(f64),
    OneOf(&'static [&'static str]),
}

impl Rule {
    fn check(&self, label: &str, value: &str, values: &FormValues) -> Option<String> {
        let trimmed = value.trim();
        if let Rule::Required = self {
            return trimmed.is_empty().then(|| format!("{label} is required"));
        }
        if trimmed.is_empty() {
            return None;
        }

        match self {
            Rule::Required => None,
            Rule::MinLength(min) => (trimmed.chars().count() < *min)
                .then(|| format!("{label} must be at least {min} characters")),
            Rule::MaxLength(max) => (trimmed.chars().count() > *max)
                .then(|| format!("{label} must be at most {max} characters")),
            Rule::Pattern(regex, message) => {
                (!regex.is_match(trimmed)).then(|| message.to_string())
            }
            Rule::Email => {
                (!is_email(trimmed)).then(|| "Please enter a valid email address".to_string())
            }
            Rule::Equals(other, message) => {
                (values.get(other) != Some(value)).then(|| message.to_string())
            }
            Rule::Numeric => trimmed
                .parse::<f64>()
                .is_err()
                .then(|| format!("{label} must be a number")),
            Rule::PositiveNumber => match trimmed.parse::<f64>() {
                Ok(n) if n > 0.0 => None,
                _ => Some(format!("{label} must be greater than 0")),
            },
            Rule::AtLeast(min) => match trimmed.parse::<f64>() {
                Ok(n) if n >= *min => None,
                _ => Some(format!("{label} must be at least {min}")),
            },
            Rule::OneOf(allowed) => (!allowed
                .iter()
                .any(|a| a.eq_ignore_ascii_case(trimmed)))
            .then(|| format!("{label} must be one of: {}", allowed.join(", "))),
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Raw form input keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Trimmed value, `None` when missing or blank.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// First violation per field, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<(&'static str, String)>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(name, message)| (*name, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|(_, m)| m.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

#[derive(Debug, Clone)]
struct Field {
    name: &'static str,
    label: &'static str,
    rules: Vec<Rule>,
}

/// Ordered field rules for one form.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<Field>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        name: &'static str,
        label: &'static str,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(Field {
            name,
            label,
            rules: rules.into_iter().collect(),
        });
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        for field in &self.fields {
            let value = values.get(field.name).unwrap_or("");
            if let Some(message) = field
                .rules
                .iter()
                .find_map(|rule| rule.check(field.label, value, values))
            {
                errors.push((field.name, message));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

/// Combines the synchronous schema result with the username check.
pub struct SubmitGate;

impl SubmitGate {
    pub fn can_submit(
        schema_result: &Result<(), ValidationErrors>,
        username: Option<UsernameState>,
    ) -> bool {
        schema_result.is_ok() && !username.is_some_and(|state| state.blocks_submission())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_violation_per_field_only() {
        let schema = FormSchema::new().field(
            "name",
            "Name",
            [Rule::Required, Rule::MinLength(3), Rule::MaxLength(5)],
        );

        let errors = schema.validate(&FormValues::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("Name is required"));

        let errors = schema
            .validate(&FormValues::new().with("name", "ab"))
            .unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be at least 3 characters"));
    }

    #[test]
    fn test_errors_follow_field_order() {
        let schema = FormSchema::new()
            .field("b", "B", [Rule::Required])
            .field("a", "A", [Rule::Required]);
        let errors = schema.validate(&FormValues::new()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["b", "a"]);
        assert_eq!(errors.to_string(), "B is required; A is required");
    }

    #[test]
    fn test_optional_fields_skip_when_empty() {
        let schema = FormSchema::new().field("calories", "Calories", [Rule::PositiveNumber]);
        assert!(schema.validate(&FormValues::new()).is_ok());
        assert!(
            schema
                .validate(&FormValues::new().with("calories", "-5"))
                .is_err()
        );
    }

    #[test]
    fn test_numeric_rules() {
        let schema = FormSchema::new()
            .field("price", "Price", [Rule::Numeric, Rule::AtLeast(0.0)])
            .field("weeks", "Duration", [Rule::PositiveNumber]);

        let ok = FormValues::new().with("price", "0").with("weeks", "4");
        assert!(schema.validate(&ok).is_ok());

        let bad = FormValues::new().with("price", "abc").with("weeks", "0");
        let errors = schema.validate(&bad).unwrap_err();
        assert_eq!(errors.get("price"), Some("Price must be a number"));
        assert_eq!(errors.get("weeks"), Some("Duration must be greater than 0"));
    }

    #[test]
    fn test_email_rule() {
        let schema = FormSchema::new().field("email", "Email", [Rule::Email]);
        assert!(
            schema
                .validate(&FormValues::new().with("email", "nimal@moveminds.lk"))
                .is_ok()
        );
        for bad in ["nimal", "nimal@", "@moveminds.lk", "nimal@lk", "ni mal@moveminds.lk"] {
            assert!(
                schema
                    .validate(&FormValues::new().with("email", bad))
                    .is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_one_of_is_case_insensitive() {
        let schema =
            FormSchema::new().field("level", "Level", [Rule::OneOf(&["BEGINNER", "ADVANCED"])]);
        assert!(schema.validate(&FormValues::new().with("level", "beginner")).is_ok());
        assert!(schema.validate(&FormValues::new().with("level", "expert")).is_err());
    }

    #[test]
    fn test_submit_gate() {
        let ok: Result<(), ValidationErrors> = Ok(());
        assert!(SubmitGate::can_submit(&ok, None));
        assert!(SubmitGate::can_submit(&ok, Some(UsernameState::Available)));
        assert!(SubmitGate::can_submit(&ok, Some(UsernameState::Idle)));
        assert!(!SubmitGate::can_submit(&ok, Some(UsernameState::Checking)));
        assert!(!SubmitGate::can_submit(&ok, Some(UsernameState::Taken)));

        let failed = FormSchema::new()
            .field("x", "X", [Rule::Required])
            .validate(&FormValues::new());
        assert!(!SubmitGate::can_submit(&failed, Some(UsernameState::Available)));
    }
}

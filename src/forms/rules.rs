//! The shared field-rule vocabulary and its evaluator.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug)]
pub enum Rule {
    Required,
    /// Loose email shape: something@something.tld.
    Email,
    /// Letters only.
    Alpha,
    /// Letters and spaces only.
    AlphaSpace,
    /// Exactly this many ASCII digits.
    Digits(usize),
    MinLen(usize),
    /// Must equal the named sibling field.
    Matches(&'static str),
}

pub struct Field<'a> {
    pub name: &'static str,
    pub value: &'a str,
    pub rules: &'a [Rule],
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: &'a str, rules: &'a [Rule]) -> Self {
        Self { name, value, rules }
    }
}

/// Field name -> first failing message, ordered for stable display.
#[derive(Clone, Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msg) in &self.0 {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}: {}", field, msg)?;
            first = false;
        }
        Ok(())
    }
}

/// Evaluate every field against its rules. A blank field reports only the
/// `Required` failure; format rules apply to non-blank values.
pub fn validate(fields: &[Field<'_>]) -> Result<(), FieldErrors> {
    let mut errs = FieldErrors::default();

    for field in fields {
        let value = field.value.trim();

        if value.is_empty() {
            if field.rules.iter().any(|r| matches!(r, Rule::Required)) {
                errs.push(field.name, format!("{} is required", label(field.name)));
            }
            continue;
        }

        for rule in field.rules {
            let failure = match rule {
                Rule::Required => None,
                Rule::Email => {
                    (!looks_like_email(value)).then(|| "Invalid email address".to_string())
                }
                Rule::Alpha => (!value.chars().all(|c| c.is_ascii_alphabetic()))
                    .then(|| format!("Invalid {}", label(field.name).to_lowercase())),
                Rule::AlphaSpace => {
                    (!value.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')).then(|| {
                        format!(
                            "Invalid {}. No numerals or special characters allowed",
                            label(field.name).to_lowercase()
                        )
                    })
                }
                Rule::Digits(n) => {
                    (value.len() != *n || !value.chars().all(|c| c.is_ascii_digit()))
                        .then(|| format!("Invalid {}", label(field.name).to_lowercase()))
                }
                Rule::MinLen(n) => (value.chars().count() < *n).then(|| {
                    format!("{} must be at least {} characters", label(field.name), n)
                }),
                Rule::Matches(other) => {
                    let other_value = fields
                        .iter()
                        .find(|f| f.name == *other)
                        .map(|f| f.value)
                        .unwrap_or_default();
                    (value != other_value.trim())
                        .then(|| format!("{}s do not match", label(other)))
                }
            };
            if let Some(msg) = failure {
                errs.push(field.name, msg);
                break;
            }
        }
    }

    errs.into_result()
}

/// Append per-slot errors for a list of `HH:MM am/pm` times.
pub(super) fn validate_times(errs: &mut FieldErrors, times: &[String]) {
    for (i, time) in times.iter().enumerate() {
        if !is_time_slot(time) {
            errs.push(
                format!("time[{}]", i),
                "Enter a valid time format (HH:MM am/pm)",
            );
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, rest)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || rest.contains('@') {
        return false;
    }
    let Some((host, tld)) = rest.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && !value.chars().any(char::is_whitespace)
}

fn is_time_slot(value: &str) -> bool {
    let v = value.trim();
    let Some((clock, meridiem)) = v.split_once(' ') else {
        return false;
    };
    if !matches!(meridiem.to_ascii_lowercase().as_str(), "am" | "pm") {
        return false;
    }
    let Some((hh, mm)) = clock.split_once(':') else {
        return false;
    };
    hh.len() == 2
        && mm.len() == 2
        && hh.chars().all(|c| c.is_ascii_digit())
        && mm.chars().all(|c| c.is_ascii_digit())
}

/// "contact_number" -> "Contact number".
fn label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("a@b.co"));
        assert!(looks_like_email("first.last+tag@clinic.example.org"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a b@c.co"));
        assert!(!looks_like_email("plain"));
    }

    #[test]
    fn time_slot_shapes() {
        assert!(is_time_slot("09:30 am"));
        assert!(is_time_slot("11:00 PM"));
        assert!(!is_time_slot("9:30 am"));
        assert!(!is_time_slot("09:30"));
        assert!(!is_time_slot("09:30 noon"));
    }

    #[test]
    fn blank_optional_field_passes_format_rules() {
        // No Required rule: blank skips the format check entirely.
        let res = validate(&[Field::new("email", "", &[Rule::Email])]);
        assert!(res.is_ok());
    }

    #[test]
    fn first_failing_rule_wins() {
        let errs = validate(&[Field::new(
            "password",
            "ab",
            &[Rule::Required, Rule::MinLen(8), Rule::Alpha],
        )])
        .unwrap_err();
        assert!(errs.get("password").unwrap().contains("at least 8"));
    }
}

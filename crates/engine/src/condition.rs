//! Condition micro-evaluator for conditional-mode workflows.
//!
//! This is a fixed set of string patterns, not an expression language:
//!
//! - absent / blank                         → run
//! - `always` / `never` (case-insensitive)  → run / skip
//! - `input.<field> == "<value>"` (or `===`) → string comparison
//! - `input.<field> != "<value>"` (or `!==`) → negated string comparison
//! - `input.<field>`                         → truthiness of the field
//! - anything else                           → run
//!
//! The last rule is a deliberate quirk of the contract: a condition that
//! matches no known pattern means "always run", it is not a parse error. A
//! caller who mistypes a condition gets a step that executes every time.

use serde_json::Value;

/// A parsed condition, one variant per recognized pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Always,
    Never,
    Equals {
        field: String,
        value: String,
        negated: bool,
    },
    Truthy {
        field: String,
    },
    /// Unrecognized input; evaluates to true by contract.
    Fallback,
}

impl Condition {
    /// Parse a raw condition string. Never fails; unrecognized input becomes
    /// [`Condition::Fallback`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("always") {
            return Self::Always;
        }
        if trimmed.eq_ignore_ascii_case("never") {
            return Self::Never;
        }

        let Some(rest) = trimmed.strip_prefix("input.") else {
            return Self::Fallback;
        };

        // Longer operators first so `===` is not split at `==`.
        for (op, negated) in [("!==", true), ("===", false), ("!=", true), ("==", false)] {
            if let Some((lhs, rhs)) = rest.split_once(op) {
                let field = lhs.trim();
                let Some(value) = unquote(rhs.trim()) else {
                    return Self::Fallback;
                };
                if !is_field_name(field) {
                    return Self::Fallback;
                }
                return Self::Equals {
                    field: field.to_string(),
                    value: value.to_string(),
                    negated,
                };
            }
        }

        let field = rest.trim();
        if is_field_name(field) {
            Self::Truthy {
                field: field.to_string(),
            }
        } else {
            Self::Fallback
        }
    }

    /// Evaluate against the caller's input payload.
    pub fn evaluate(&self, input: &Value) -> bool {
        match self {
            Self::Always | Self::Fallback => true,
            Self::Never => false,
            Self::Equals {
                field,
                value,
                negated,
            } => {
                let matched = input
                    .get(field)
                    .map(|v| value_text(v) == *value)
                    .unwrap_or(false);
                matched != *negated
            }
            Self::Truthy { field } => input.get(field).map(is_truthy).unwrap_or(false),
        }
    }
}

/// Evaluate an optional condition string against the input payload.
///
/// An absent condition means the step always runs.
pub fn evaluate_condition(condition: Option<&str>, input: &Value) -> bool {
    match condition {
        None => true,
        Some(raw) => Condition::parse(raw).evaluate(input),
    }
}

/// Strip one layer of matching `"` or `'` quotes; `None` when unquoted.
fn unquote(raw: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return Some(&raw[1..raw.len() - 1]);
        }
    }
    None
}

fn is_field_name(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The string form of a JSON value for comparison purposes: strings compare
/// raw, everything else via its canonical JSON rendering.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON truthiness: `null`, `false`, `0`, and `""` are falsy; everything
/// else, including empty arrays and objects, is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_or_blank_condition_always_runs() {
        assert!(evaluate_condition(None, &json!({})));
        assert!(evaluate_condition(Some(""), &json!({})));
        assert!(evaluate_condition(Some("   "), &json!({})));
    }

    #[test]
    fn literals_are_case_insensitive() {
        assert!(evaluate_condition(Some("always"), &json!({})));
        assert!(evaluate_condition(Some("ALWAYS"), &json!({})));
        assert!(!evaluate_condition(Some("never"), &json!({})));
        assert!(!evaluate_condition(Some("Never"), &json!({})));
    }

    #[test]
    fn equality_compares_string_form() {
        let input = json!({ "env": "prod", "count": 3, "flag": true });

        assert!(evaluate_condition(Some("input.env == \"prod\""), &input));
        assert!(evaluate_condition(Some("input.env === \"prod\""), &input));
        assert!(!evaluate_condition(Some("input.env == \"staging\""), &input));
        // Non-string fields compare via their JSON rendering.
        assert!(evaluate_condition(Some("input.count == \"3\""), &input));
        assert!(evaluate_condition(Some("input.flag == \"true\""), &input));
    }

    #[test]
    fn single_quotes_are_accepted() {
        let input = json!({ "env": "prod" });
        assert!(evaluate_condition(Some("input.env == 'prod'"), &input));
    }

    #[test]
    fn inequality_negates() {
        let input = json!({ "env": "prod" });
        assert!(!evaluate_condition(Some("input.env != \"prod\""), &input));
        assert!(!evaluate_condition(Some("input.env !== \"prod\""), &input));
        assert!(evaluate_condition(Some("input.env != \"staging\""), &input));
    }

    #[test]
    fn absent_field_never_equals_but_always_differs() {
        let input = json!({});
        assert!(!evaluate_condition(Some("input.env == \"prod\""), &input));
        assert!(evaluate_condition(Some("input.env != \"prod\""), &input));
    }

    #[test]
    fn bare_field_uses_truthiness() {
        assert!(evaluate_condition(
            Some("input.enabled"),
            &json!({ "enabled": true })
        ));
        assert!(!evaluate_condition(
            Some("input.enabled"),
            &json!({ "enabled": false })
        ));
        assert!(!evaluate_condition(Some("input.enabled"), &json!({})));
        assert!(!evaluate_condition(Some("input.count"), &json!({ "count": 0 })));
        assert!(evaluate_condition(Some("input.count"), &json!({ "count": 7 })));
        assert!(!evaluate_condition(Some("input.name"), &json!({ "name": "" })));
        assert!(!evaluate_condition(Some("input.value"), &json!({ "value": null })));
        // Containers are truthy even when empty.
        assert!(evaluate_condition(Some("input.items"), &json!({ "items": [] })));
    }

    #[test]
    fn unrecognized_patterns_fall_back_to_true() {
        let input = json!({ "env": "staging" });
        // Not a known shape at all.
        assert!(evaluate_condition(Some("run when ready"), &input));
        // Unquoted right-hand side does not match the equality pattern.
        assert!(evaluate_condition(Some("input.env == prod"), &input));
        // Nested paths are not part of the language.
        assert!(evaluate_condition(Some("input.user.name"), &input));
    }

    #[test]
    fn parse_produces_expected_variants() {
        assert_eq!(Condition::parse("always"), Condition::Always);
        assert_eq!(Condition::parse("never"), Condition::Never);
        assert_eq!(
            Condition::parse("input.env !== \"prod\""),
            Condition::Equals {
                field: "env".into(),
                value: "prod".into(),
                negated: true,
            }
        );
        assert_eq!(
            Condition::parse("input.ready"),
            Condition::Truthy {
                field: "ready".into()
            }
        );
        assert_eq!(Condition::parse("whatever"), Condition::Fallback);
    }
}

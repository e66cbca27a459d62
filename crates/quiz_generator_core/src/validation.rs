//! crates/quiz_generator_core/src/validation.rs
//!
//! Request validation against static, per-endpoint schemas.
//!
//! A [`Schema`] is a table of fields and the rule each one must satisfy. The
//! validator walks the table, collects every failing check into a
//! [`ValidationErrors`] tree, and on success hands back a cleaned object
//! (unknown keys dropped, integral numbers normalised) that deserialises into
//! the typed request.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{DeepDiveRequest, QuestionsRequest, TitleRequest};

//=========================================================================================
// Schema Description
//=========================================================================================

/// The check applied to a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// A string with at least `min_chars` characters. `message` is reported
    /// when the string is too short.
    Text {
        min_chars: usize,
        message: &'static str,
    },
    /// A string equal to one of the listed literals.
    OneOf(&'static [&'static str]),
    /// A whole number within `min..=max`.
    Integer { min: i64, max: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
}

/// The expected shape of a request body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema {
    pub fields: &'static [Field],
}

const USER_INPUT_REQUIRED: &str = "User input is required.";

pub const TITLE_SCHEMA: Schema = Schema {
    fields: &[Field {
        name: "userInput",
        rule: Rule::Text {
            min_chars: 1,
            message: USER_INPUT_REQUIRED,
        },
    }],
};

pub const QUESTIONS_SCHEMA: Schema = Schema {
    fields: &[
        Field {
            name: "userInput",
            rule: Rule::Text {
                min_chars: 1,
                message: USER_INPUT_REQUIRED,
            },
        },
        Field {
            name: "type",
            rule: Rule::OneOf(&["true-or-false", "multiple-choice"]),
        },
        Field {
            name: "difficulty",
            rule: Rule::OneOf(&["easy", "medium", "hard"]),
        },
        Field {
            name: "questionAmount",
            rule: Rule::Integer { min: 1, max: 20 },
        },
    ],
};

pub const DEEP_DIVE_SCHEMA: Schema = Schema {
    fields: &[Field {
        name: "question",
        rule: Rule::Text {
            min_chars: 1,
            message: USER_INPUT_REQUIRED,
        },
    }],
};

//=========================================================================================
// Error Tree
//=========================================================================================

/// Field-level validation failures.
///
/// Serialises as `{ "_errors": [...], "<field>": { "_errors": [...] } }` so the
/// browser client can look errors up by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    form_errors: Vec<String>,
    field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// An error that applies to the body as a whole.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            form_errors: vec![message.into()],
            field_errors: BTreeMap::new(),
        }
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    pub fn form_errors(&self) -> &[String] {
        &self.form_errors
    }

    /// Messages recorded against `field`, empty if the field passed.
    pub fn field(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.field_errors.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, messages) in &self.field_errors {
            parts.push(format!("{}: {}", field, messages.join(", ")));
        }
        write!(f, "invalid request body ({})", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Node<'a> {
            #[serde(rename = "_errors")]
            errors: &'a [String],
        }

        let mut map = serializer.serialize_map(Some(1 + self.field_errors.len()))?;
        map.serialize_entry("_errors", &self.form_errors)?;
        for (field, messages) in &self.field_errors {
            map.serialize_entry(field, &Node { errors: messages })?;
        }
        map.end()
    }
}

//=========================================================================================
// Validator
//=========================================================================================

/// Names a JSON value's kind the way the browser client's messages do.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Schema {
    /// Checks `body` against every field of the schema.
    ///
    /// Returns the cleaned object on success. Validation has no side effects, so
    /// the same body always produces the same outcome.
    pub fn validate(&self, body: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let object = match body {
            Value::Object(object) => object,
            other => {
                return Err(ValidationErrors::root(format!(
                    "Expected object, received {}",
                    kind_of(other)
                )))
            }
        };

        let mut errors = ValidationErrors::default();
        let mut cleaned = Map::new();

        for field in self.fields {
            match check_field(field.rule, object.get(field.name)) {
                Ok(value) => {
                    cleaned.insert(field.name.to_string(), value);
                }
                Err(messages) => {
                    for message in messages {
                        errors.push(field.name, message);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }

    /// Validates `body` and narrows it into the typed request `T`.
    pub fn parse<T: DeserializeOwned>(&self, body: &Value) -> Result<T, ValidationErrors> {
        let cleaned = self.validate(body)?;
        serde_json::from_value(Value::Object(cleaned))
            .map_err(|e| ValidationErrors::root(e.to_string()))
    }
}

fn check_field(rule: Rule, value: Option<&Value>) -> Result<Value, Vec<String>> {
    match rule {
        Rule::Text { min_chars, message } => match value {
            None => Err(vec!["Required".to_string()]),
            Some(Value::String(text)) if text.chars().count() < min_chars => {
                Err(vec![message.to_string()])
            }
            Some(Value::String(text)) => Ok(Value::String(text.clone())),
            Some(other) => Err(vec![format!("Expected string, received {}", kind_of(other))]),
        },
        Rule::OneOf(allowed) => match value {
            Some(Value::String(text)) if allowed.contains(&text.as_str()) => {
                Ok(Value::String(text.clone()))
            }
            _ => Err(vec!["Invalid input".to_string()]),
        },
        Rule::Integer { min, max } => {
            let number = match value {
                None => return Err(vec!["Required".to_string()]),
                Some(Value::Number(number)) => number,
                Some(other) => {
                    return Err(vec![format!(
                        "Expected number, received {}",
                        kind_of(other)
                    )])
                }
            };

            let mut messages = Vec::new();
            let as_float = number.as_f64().unwrap_or(f64::NAN);
            let integral = number.is_i64() || number.is_u64() || as_float.fract() == 0.0;
            if !integral {
                messages.push("Expected integer, received float".to_string());
            }
            if as_float < min as f64 {
                messages.push(format!("Number must be greater than or equal to {}", min));
            }
            if as_float > max as f64 {
                messages.push(format!("Number must be less than or equal to {}", max));
            }

            if messages.is_empty() {
                // Bounds are checked, so the cast is exact.
                Ok(Value::from(as_float as i64))
            } else {
                Err(messages)
            }
        }
    }
}

//=========================================================================================
// Typed Entry Points
//=========================================================================================

impl TitleRequest {
    pub fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        TITLE_SCHEMA.parse(body)
    }
}

impl QuestionsRequest {
    pub fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        QUESTIONS_SCHEMA.parse(body)
    }
}

impl DeepDiveRequest {
    pub fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        DEEP_DIVE_SCHEMA.parse(body)
    }
}

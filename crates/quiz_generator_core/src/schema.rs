//! crates/quiz_generator_core/src/schema.rs
//!
//! Structured output schemas sent with each completion request.
//!
//! These use the strict JSON Schema subset accepted by structured-output
//! completions: every property is required and no extra keys are allowed.

use serde_json::{json, Value};

use crate::ports::OutputSchema;

const SCHEMA_NAME: &str = "event";

fn strict_object(properties: Value) -> Value {
    let required: Vec<String> = properties
        .as_object()
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

pub fn title_schema() -> OutputSchema {
    OutputSchema {
        name: SCHEMA_NAME,
        schema: strict_object(json!({
            "title": { "type": "string" },
            "description": { "type": "string" },
        })),
    }
}

pub fn questions_schema() -> OutputSchema {
    let answer = strict_object(json!({
        "text": { "type": "string" },
        "isCorrect": { "type": "boolean" },
        "counterArgument": { "type": "string" },
    }));
    let question = strict_object(json!({
        "question": { "type": "string" },
        "explanation": { "type": "string" },
        "answers": { "type": "array", "items": answer },
    }));

    OutputSchema {
        name: SCHEMA_NAME,
        schema: strict_object(json!({
            "questions": { "type": "array", "items": question },
        })),
    }
}

pub fn deep_dive_schema() -> OutputSchema {
    OutputSchema {
        name: SCHEMA_NAME,
        schema: strict_object(json!({
            "markdown": { "type": "string" },
        })),
    }
}

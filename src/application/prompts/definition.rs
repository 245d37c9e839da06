use serde_json::{Map, Value};

use crate::application::ports::ModelOptions;

/// A structured prompt: parameter schema, template function and optional
/// output schema, bundled with default model options for the call.
pub struct PromptDefinition {
    pub name: &'static str,
    pub parameters: &'static [ParamSpec],
    pub render: fn(&Map<String, Value>) -> String,
    pub output_schema: Option<OutputSchema>,
    pub defaults: ModelOptions,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String { non_empty: bool },
    Number,
    Boolean,
}

/// One offending field, as a dotted/indexed path plus a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub(crate) fn format_field_errors(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.path, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks `params` against the specs; an empty result means valid.
pub fn validate_params(specs: &[ParamSpec], params: &Map<String, Value>) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for spec in specs {
        let value = match params.get(spec.name) {
            Some(v) if !v.is_null() => v,
            _ => {
                if spec.required {
                    errors.push(FieldError::new(spec.name, "required parameter is missing"));
                }
                continue;
            }
        };
        match spec.kind {
            ParamKind::String { non_empty } => match value.as_str() {
                Some(s) if non_empty && s.trim().is_empty() => {
                    errors.push(FieldError::new(spec.name, "must not be empty"));
                }
                Some(_) => {}
                None => errors.push(FieldError::new(spec.name, "must be a string")),
            },
            ParamKind::Number => {
                if !value.is_number() {
                    errors.push(FieldError::new(spec.name, "must be a number"));
                }
            }
            ParamKind::Boolean => {
                if !value.is_boolean() {
                    errors.push(FieldError::new(spec.name, "must be a boolean"));
                }
            }
        }
    }
    errors
}

/// Expected shape of the model's JSON reply.
#[derive(Debug, Clone, Copy)]
pub struct OutputSchema {
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String { non_empty: bool },
    Number,
    Boolean,
    StringArray { non_empty: bool },
    ObjectArray {
        fields: &'static [FieldSpec],
        non_empty: bool,
    },
}

impl OutputSchema {
    /// Machine-readable description appended to the rendered prompt, plus
    /// the instruction that the reply must be the JSON object alone.
    pub fn instruction(&self) -> String {
        let mut out = String::from(
            "Respond with only a JSON object matching this schema. \
             No prose, no markdown, no code fences.\n",
        );
        out.push_str(&render_object(self.fields));
        out
    }

    /// Validates a parsed value; an empty result means conforming.
    pub fn validate(&self, value: &Value) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_object(self.fields, value, "", &mut errors);
        errors
    }
}

fn render_object(fields: &[FieldSpec]) -> String {
    let mut out = String::from("{");
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("\"{}\": {}", field.name, render_kind(&field.kind)));
    }
    out.push('}');
    out
}

fn render_kind(kind: &FieldKind) -> String {
    match kind {
        FieldKind::String { .. } => "\"string\"".to_string(),
        FieldKind::Number => "number".to_string(),
        FieldKind::Boolean => "true|false".to_string(),
        FieldKind::StringArray { .. } => "[\"string\", ...]".to_string(),
        FieldKind::ObjectArray { fields, .. } => format!("[{}, ...]", render_object(fields)),
    }
}

fn validate_object(fields: &[FieldSpec], value: &Value, path: &str, errors: &mut Vec<FieldError>) {
    let object = match value.as_object() {
        Some(o) => o,
        None => {
            let at = if path.is_empty() { "$" } else { path };
            errors.push(FieldError::new(at, "must be an object"));
            return;
        }
    };
    for field in fields {
        let field_path = if path.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", path, field.name)
        };
        let field_value = match object.get(field.name) {
            Some(v) if !v.is_null() => v,
            _ => {
                if field.required {
                    errors.push(FieldError::new(field_path, "required field is missing"));
                }
                continue;
            }
        };
        validate_kind(&field.kind, field_value, &field_path, errors);
    }
}

fn validate_kind(kind: &FieldKind, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
    match kind {
        FieldKind::String { non_empty } => match value.as_str() {
            Some(s) if *non_empty && s.trim().is_empty() => {
                errors.push(FieldError::new(path, "must not be empty"));
            }
            Some(_) => {}
            None => errors.push(FieldError::new(path, "must be a string")),
        },
        FieldKind::Number => {
            if !value.is_number() {
                errors.push(FieldError::new(path, "must be a number"));
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                errors.push(FieldError::new(path, "must be a boolean"));
            }
        }
        FieldKind::StringArray { non_empty } => match value.as_array() {
            Some(items) => {
                if *non_empty && items.is_empty() {
                    errors.push(FieldError::new(path, "must not be empty"));
                }
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        errors.push(FieldError::new(
                            format!("{}[{}]", path, i),
                            "must be a string",
                        ));
                    }
                }
            }
            None => errors.push(FieldError::new(path, "must be an array")),
        },
        FieldKind::ObjectArray { fields, non_empty } => match value.as_array() {
            Some(items) => {
                if *non_empty && items.is_empty() {
                    errors.push(FieldError::new(path, "must not be empty"));
                }
                for (i, item) in items.iter().enumerate() {
                    validate_object(fields, item, &format!("{}[{}]", path, i), errors);
                }
            }
            None => errors.push(FieldError::new(path, "must be an array")),
        },
    }
}

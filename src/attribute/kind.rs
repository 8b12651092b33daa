use serde_json::{Number, Value};

/// The declared type of an attribute, used to coerce assigned values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    String,
    Integer,
    Float,
    Boolean,
    /// Anything else; values are compared structurally without coercion.
    Json,
}

impl AttributeKind {
    /// Coerce a value to this kind.
    ///
    /// `null` is never coerced. A value that cannot be represented in this
    /// kind is returned unchanged, so it compares unequal to any stored value
    /// and is rejected later by the entity's attribute writer.
    pub fn typecast(&self, value: &Value) -> Value {
        if value.is_null() {
            return Value::Null;
        }

        match self {
            AttributeKind::String => match value {
                Value::String(_) => value.clone(),
                Value::Number(n) => Value::String(n.to_string()),
                Value::Bool(b) => Value::String(b.to_string()),
                other => other.clone(),
            },
            AttributeKind::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => value.clone(),
                Value::Number(n) => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Value::from(f as i64)
                    }
                    _ => value.clone(),
                },
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| value.clone()),
                other => other.clone(),
            },
            AttributeKind::Float => match value {
                Value::Number(n) => n
                    .as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| value.clone()),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| value.clone()),
                other => other.clone(),
            },
            AttributeKind::Boolean => match value {
                Value::Bool(_) => value.clone(),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "t" | "1" => Value::Bool(true),
                    "false" | "f" | "0" => Value::Bool(false),
                    _ => value.clone(),
                },
                Value::Number(n) => match n.as_i64() {
                    Some(1) => Value::Bool(true),
                    Some(0) => Value::Bool(false),
                    _ => value.clone(),
                },
                other => other.clone(),
            },
            AttributeKind::Json => value.clone(),
        }
    }
}

/// A named, kinded attribute of a versionable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: &'static str,
    pub kind: AttributeKind,
}

impl Property {
    pub const fn new(name: &'static str, kind: AttributeKind) -> Self {
        Property { name, kind }
    }

    pub fn typecast(&self, value: &Value) -> Value {
        self.kind.typecast(value)
    }

    /// Timestamp attributes are maintained by the persistence layer and never versioned.
    pub fn is_timestamp(&self) -> bool {
        matches!(
            self.name,
            "created_at" | "created_on" | "updated_at" | "updated_on"
        )
    }
}

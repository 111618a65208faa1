use serde::Serialize;
use serde_json::{Map, Value};

pub const ID_FIELD: &str = "_id";

/// A schemaless JSON object as stored in a collection.
///
/// The store owns `_id`, so a client-supplied one is dropped on parse.
/// `JSONB` cannot hold `\u0000`, so keys and strings containing it are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn parse(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(mut fields) => {
                fields.remove(ID_FIELD);
                if fields.iter().any(|(key, value)| has_nul(key, value)) {
                    return Err("Documents cannot contain NUL characters.".into());
                }
                Ok(Self(fields))
            }
            other => Err(format!(
                "Expected a JSON object, got `{}`.",
                json_type_name(&other)
            )),
        }
    }

    /// Look up a string value through nested objects, e.g. `["resident", "email"]`.
    pub fn str_at(&self, path: &[&str]) -> Option<&str> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        current.as_str()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn has_nul(key: &str, value: &Value) -> bool {
    key.contains('\0')
        || match value {
            Value::String(s) => s.contains('\0'),
            Value::Array(items) => items.iter().any(|item| has_nul("", item)),
            Value::Object(fields) => fields.iter().any(|(k, v)| has_nul(k, v)),
            _ => false,
        }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

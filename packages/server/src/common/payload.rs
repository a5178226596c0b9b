//! Typed access to the `data` object of an accepted command.
//!
//! Shape errors (missing field, wrong type) are reported per field before any
//! business validation runs.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::errors::CommandError;

pub struct PayloadReader<'a> {
    fields: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> PayloadReader<'a> {
    pub fn new(value: &'a Value) -> Result<Self, CommandError> {
        Self::nested(value, "data")
    }

    fn nested(value: &'a Value, name: &str) -> Result<Self, CommandError> {
        let fields = value
            .as_object()
            .ok_or_else(|| CommandError::InvalidParameter(name.to_string()))?;
        Ok(Self {
            fields,
            prefix: if name == "data" {
                String::new()
            } else {
                format!("{}.", name)
            },
        })
    }

    fn name(&self, field: &str) -> String {
        format!("{}{}", self.prefix, field)
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn required(&self, field: &str) -> Result<&'a Value, CommandError> {
        self.present(field)
            .ok_or_else(|| CommandError::MissingParameter(self.name(field)))
    }

    pub fn string(&self, field: &str) -> Result<String, CommandError> {
        let value = self.required(field)?;
        self.as_string(field, value)
    }

    pub fn optional_string(&self, field: &str) -> Result<Option<String>, CommandError> {
        self.present(field)
            .map(|value| self.as_string(field, value))
            .transpose()
    }

    /// Strings and integers are both accepted and normalized to a string.
    pub fn identifier(&self, field: &str) -> Result<String, CommandError> {
        match self.required(field)? {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
            value => self.as_string(field, value),
        }
    }

    /// Integers, or strings holding one, are accepted.
    pub fn integer(&self, field: &str) -> Result<i32, CommandError> {
        let value = self.required(field)?;
        self.as_integer(field, value)
    }

    /// Decimal amounts as strings (`"0.5"`) or JSON numbers.
    pub fn decimal(&self, field: &str) -> Result<Decimal, CommandError> {
        let invalid = || CommandError::InvalidParameter(self.name(field));
        match self.required(field)? {
            Value::String(s) => Decimal::from_str(s.trim()).map_err(|_| invalid()),
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    pub fn object(&self, field: &str) -> Result<PayloadReader<'a>, CommandError> {
        let value = self.required(field)?;
        PayloadReader::nested(value, &self.name(field))
    }

    pub fn array(&self, field: &str) -> Result<Vec<PayloadReader<'a>>, CommandError> {
        let items = self
            .required(field)?
            .as_array()
            .ok_or_else(|| CommandError::InvalidParameter(self.name(field)))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| PayloadReader::nested(item, &format!("{}[{}]", self.name(field), i)))
            .collect()
    }

    fn as_string(&self, field: &str, value: &Value) -> Result<String, CommandError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CommandError::InvalidParameter(self.name(field)))
    }

    fn as_integer(&self, field: &str, value: &Value) -> Result<i32, CommandError> {
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| CommandError::InvalidParameter(self.name(field)))
    }
}

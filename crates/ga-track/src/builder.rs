//! Argument builder
//!
//! Turns a schema, an element's attributes and the binding's overrides into
//! the positional argument list pushed to the queue.
//!
//! For each field, in schema order:
//! 1. constant slot: the call's wire name
//! 2. otherwise the override, then the element's data attribute
//! 3. validate (the first failure aborts the build)
//! 4. coerce to the field's return type when asked to
//! 5. fall back to the descriptor's fallback when absent
//!
//! Absent trailing slots are dropped; absent interior slots are sent as `""`
//! so later positions keep their meaning.

use crate::schema::{ApiSchema, FieldSource, ResolvedField};
use crate::validate::ReturnType;
use crate::{ArgumentList, Overrides, TrackError, Value};
use ga_dom::ElementRef;
use std::collections::{BTreeMap, HashMap};

/// Anything attributes can be read from
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl AttributeSource for ElementRef<'_> {
    fn attribute(&self, name: &str) -> Option<&str> {
        ElementRef::attribute(self, name)
    }
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Stateless argument list builder
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentBuilder;

impl ArgumentBuilder {
    pub fn build<S>(
        schema: &ApiSchema,
        element: &S,
        overrides: &Overrides,
        coerce: bool,
    ) -> Result<ArgumentList, TrackError>
    where
        S: AttributeSource + ?Sized,
    {
        let mut slots: Vec<Option<Value>> = Vec::with_capacity(schema.arity());

        for field in schema.fields() {
            let descriptor = &field.descriptor;
            if descriptor.source == FieldSource::Constant {
                slots.push(Some(Value::from(schema.call().wire_name())));
                continue;
            }

            let raw = overrides.get(&field.key).cloned().or_else(|| {
                field
                    .attribute
                    .as_deref()
                    .and_then(|attr| element.attribute(attr))
                    .map(Value::from)
            });

            if !descriptor.validator.check(raw.as_ref()) {
                return Err(validation_error(schema, field, raw.as_ref()));
            }

            let value = match raw {
                Some(v) if coerce => match coerce_value(&v, descriptor.return_type()) {
                    Some(coerced) => Some(coerced),
                    None => return Err(validation_error(schema, field, Some(&v))),
                },
                other => other,
            };
            slots.push(value.or_else(|| descriptor.fallback_value()));
        }

        while matches!(slots.last(), Some(None)) {
            slots.pop();
        }
        let values = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Value::Str(String::new())))
            .collect();
        Ok(ArgumentList::new(values))
    }
}

fn validation_error(schema: &ApiSchema, field: &ResolvedField, value: Option<&Value>) -> TrackError {
    TrackError::Validation {
        call: schema.call().to_string(),
        field: field.descriptor.name.to_string(),
        value: value.map_or_else(|| "<absent>".to_string(), Value::to_string),
    }
}

/// Convert an already validated value. `None` when the value cannot be
/// represented in the target type.
fn coerce_value(value: &Value, target: ReturnType) -> Option<Value> {
    match (target, value) {
        (ReturnType::Integer, Value::Str(s)) => s.parse::<i64>().ok().map(Value::Int),
        (ReturnType::Integer, &Value::Float(x)) => {
            (x >= i64::MIN as f64 && x < i64::MAX as f64).then(|| Value::Int(x as i64))
        }
        (ReturnType::Float, Value::Str(s)) => s.parse::<f64>().ok().map(Value::Float),
        (ReturnType::Boolean, Value::Str(s)) => s.parse::<bool>().ok().map(Value::Bool),
        (_, value) => Some(value.clone()),
    }
}

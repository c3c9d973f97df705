//! API schema table
//!
//! One fixed descriptor list per tracking call. Field order is the wire
//! contract: the argument list is built by walking the descriptors in
//! order, so reordering a table changes what the analytics backend sees.

use crate::validate::{ReturnType, ValidatorKind};
use crate::{TrackError, Value};
use ga_dom::data_attribute_name;
use std::fmt;
use std::str::FromStr;

/// Tracking call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallName {
    TrackEvent,
    TrackPageview,
    AddItem,
    AddTrans,
    TrackTrans,
}

impl CallName {
    pub const ALL: [CallName; 5] = [
        Self::TrackEvent,
        Self::TrackPageview,
        Self::AddItem,
        Self::AddTrans,
        Self::TrackTrans,
    ];

    /// Page-facing name (`trackEvent`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrackEvent => "trackEvent",
            Self::TrackPageview => "trackPageview",
            Self::AddItem => "addItem",
            Self::AddTrans => "addTrans",
            Self::TrackTrans => "trackTrans",
        }
    }

    /// Queue command name (`_trackEvent`)
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::TrackEvent => "_trackEvent",
            Self::TrackPageview => "_trackPageview",
            Self::AddItem => "_addItem",
            Self::AddTrans => "_addTrans",
            Self::TrackTrans => "_trackTrans",
        }
    }

    /// Whether attribute values are coerced to their return type
    pub fn coerces(self) -> bool {
        matches!(self, Self::TrackEvent)
    }

    /// Whether a bound link is followed once the push completes
    pub fn navigates(self) -> bool {
        matches!(self, Self::TrackEvent | Self::TrackPageview)
    }

    fn fields(self) -> &'static [FieldDescriptor] {
        match self {
            Self::TrackEvent => TRACK_EVENT,
            Self::TrackPageview => TRACK_PAGEVIEW,
            Self::AddItem => ADD_ITEM,
            Self::AddTrans => ADD_TRANS,
            Self::TrackTrans => TRACK_TRANS,
        }
    }
}

impl fmt::Display for CallName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallName {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TrackError::UnknownSchema(s.to_string()))
    }
}

/// Where a field's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Always the call's wire name
    Constant,
    /// Overrides, then the element's data attribute
    Attribute,
}

/// One positional field of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub source: FieldSource,
    pub validator: ValidatorKind,
    /// Used when the field is absent
    pub fallback: Option<&'static str>,
}

impl FieldDescriptor {
    const fn constant() -> Self {
        Self {
            name: "event",
            source: FieldSource::Constant,
            validator: ValidatorKind::IsString,
            fallback: None,
        }
    }

    const fn attr(name: &'static str, validator: ValidatorKind) -> Self {
        Self {
            name,
            source: FieldSource::Attribute,
            validator,
            fallback: None,
        }
    }

    pub fn return_type(&self) -> ReturnType {
        self.validator.return_type()
    }

    pub fn is_required(&self) -> bool {
        !self.validator.is_optional()
    }

    pub fn fallback_value(&self) -> Option<Value> {
        self.fallback.map(Value::from)
    }
}

use ValidatorKind::*;

const TRACK_EVENT: &[FieldDescriptor] = &[
    FieldDescriptor::constant(),
    FieldDescriptor::attr("category", IsString),
    FieldDescriptor::attr("action", IsString),
    FieldDescriptor::attr("label", IsString),
    FieldDescriptor::attr("value", OptionalInt),
    FieldDescriptor::attr("nonInteraction", OptionalBool),
];

const TRACK_PAGEVIEW: &[FieldDescriptor] = &[
    FieldDescriptor::constant(),
    FieldDescriptor::attr("url", OptionalString),
];

const ADD_ITEM: &[FieldDescriptor] = &[
    FieldDescriptor::constant(),
    FieldDescriptor::attr("orderId", IsString),
    FieldDescriptor::attr("sku", IsString),
    FieldDescriptor::attr("name", IsString),
    FieldDescriptor::attr("category", OptionalString),
    FieldDescriptor::attr("price", IsFloat),
    FieldDescriptor::attr("quantity", IsInt),
];

const ADD_TRANS: &[FieldDescriptor] = &[
    FieldDescriptor::constant(),
    FieldDescriptor::attr("orderId", IsString),
    FieldDescriptor::attr("storeName", IsString),
    FieldDescriptor::attr("total", IsFloat),
    FieldDescriptor::attr("tax", OptionalFloat),
    FieldDescriptor::attr("shipping", OptionalFloat),
    FieldDescriptor::attr("city", OptionalString),
    FieldDescriptor::attr("state", OptionalString),
    FieldDescriptor::attr("country", OptionalString),
];

const TRACK_TRANS: &[FieldDescriptor] = &[FieldDescriptor::constant()];

/// Resolved field: descriptor plus its data attribute name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub descriptor: FieldDescriptor,
    /// `data-<prefix>-<field>`; `None` for the constant slot
    pub attribute: Option<String>,
    /// Lowercased field name, the key used for overrides
    pub key: String,
}

/// Schema for one call with attribute names resolved for a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSchema {
    call: CallName,
    fields: Vec<ResolvedField>,
}

impl ApiSchema {
    fn resolve(call: CallName, prefix: &str) -> Self {
        let fields = call
            .fields()
            .iter()
            .map(|d| ResolvedField {
                descriptor: *d,
                attribute: match d.source {
                    FieldSource::Constant => None,
                    FieldSource::Attribute => Some(data_attribute_name(prefix, d.name)),
                },
                key: d.name.to_ascii_lowercase(),
            })
            .collect();
        Self { call, fields }
    }

    pub fn call(&self) -> CallName {
        self.call
    }

    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    /// Number of positional slots including the wire name
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Slots that must always be present
    pub fn required_arity(&self) -> usize {
        self.fields
            .iter()
            .rposition(|f| f.descriptor.is_required())
            .map_or(0, |i| i + 1)
    }
}

/// Every call's schema, resolved once for an attribute prefix
#[derive(Debug, Clone)]
pub struct SchemaTable {
    prefix: String,
    schemas: Vec<ApiSchema>,
}

impl SchemaTable {
    pub fn new(prefix: &str) -> Self {
        let schemas = CallName::ALL
            .into_iter()
            .map(|c| ApiSchema::resolve(c, prefix))
            .collect();
        Self {
            prefix: prefix.to_string(),
            schemas,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn get(&self, call: CallName) -> &ApiSchema {
        // Built in CallName::ALL order, which is declaration order.
        &self.schemas[call as usize]
    }

    /// Look a schema up by its page-facing name
    pub fn lookup(&self, name: &str) -> Result<&ApiSchema, TrackError> {
        Ok(self.get(name.parse()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApiSchema> {
        self.schemas.iter()
    }
}

impl Default for SchemaTable {
    fn default() -> Self {
        Self::new("ga")
    }
}

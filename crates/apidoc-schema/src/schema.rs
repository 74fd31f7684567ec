use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Prefix of every reference into the component schemas
pub const COMPONENTS_SCHEMAS_PREFIX: &str = "#/components/schemas/";

/// Primitive schema categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Boolean,
    Integer,
    Number,
    String,
    Object,
    Array,
}

/// The `type` keyword: one or more schema categories
///
/// Serialized as a single string when it holds one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Types(Vec<SchemaType>);

impl Types {
    pub fn single(schema_type: SchemaType) -> Self {
        Self(vec![schema_type])
    }

    /// Whether the set holds exactly this one category
    pub fn is(&self, schema_type: SchemaType) -> bool {
        self.0.len() == 1 && self.0[0] == schema_type
    }

    pub fn contains(&self, schema_type: SchemaType) -> bool {
        self.0.contains(&schema_type)
    }

    pub fn as_slice(&self) -> &[SchemaType] {
        &self.0
    }
}

impl From<SchemaType> for Types {
    fn from(schema_type: SchemaType) -> Self {
        Self::single(schema_type)
    }
}

impl From<Vec<SchemaType>> for Types {
    fn from(types: Vec<SchemaType>) -> Self {
        Self(types)
    }
}

impl Serialize for Types {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let [single] = self.0.as_slice() {
            return single.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for schema_type in &self.0 {
            seq.serialize_element(schema_type)?;
        }
        seq.end()
    }
}

/// XML serialization hints for a property
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XmlObject {
    /// Element or attribute name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Serialized as an attribute rather than a child element
    #[serde(skip_serializing_if = "is_false")]
    pub attribute: bool,
}

/// Where a cached definition came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub type_name: String,
    pub module_path: Option<String>,
}

/// Inline schema content
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    /// Schema categories
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<Types>,

    /// Format qualifier (`int32`, `date-time`, `uuid`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Enumerated literal values
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,

    #[serde(rename = "allowEmptyValue", skip_serializing_if = "is_false")]
    pub allow_empty_value: bool,

    #[serde(rename = "uniqueItems", skip_serializing_if = "is_false")]
    pub unique_items: bool,

    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "is_false")]
    pub exclusive_minimum: bool,

    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "is_false")]
    pub exclusive_maximum: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(rename = "minLength", skip_serializing_if = "is_zero")]
    pub min_length: u64,

    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(rename = "minItems", skip_serializing_if = "is_zero")]
    pub min_items: u64,

    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// One single-value alternative per enumerated literal
    #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaRef>,

    /// Element schema for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,

    /// Property schemas for objects
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaRef>,

    /// Value schema for open maps
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaRef>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<XmlObject>,
}

impl Schema {
    /// Create a schema of a single category
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(Types::single(schema_type)),
            ..Default::default()
        }
    }

    pub fn object() -> Self {
        Self::new(SchemaType::Object)
    }

    /// Create a `string` schema with a format qualifier
    pub fn string_with_format(format: &str) -> Self {
        Self::new(SchemaType::String).with_format(format)
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Set inclusive numeric bounds
    pub fn with_bounds(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self.exclusive_minimum = false;
        self.exclusive_maximum = false;
        self
    }

    /// Whether the schema is exactly of this category
    pub fn is_type(&self, schema_type: SchemaType) -> bool {
        self.schema_type
            .as_ref()
            .map(|types| types.is(schema_type))
            .unwrap_or(false)
    }

    /// Append a marker word to the description
    pub fn append_description(&mut self, word: &str) {
        let description = self.description.get_or_insert_with(String::new);
        description.push(' ');
        description.push_str(word);
        description.push(' ');
    }

    /// Collapse whitespace runs in the description, dropping it when blank
    pub fn normalize_description(&mut self) {
        self.description = self
            .description
            .take()
            .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|d| !d.is_empty());
    }
}

/// A schema node: either inline content or a reference into the component
/// schemas
///
/// A reference node serializes as `{"$ref": ...}` only. Its `value` is a
/// snapshot of the referenced definition at the time the node was created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRef {
    /// `#/components/schemas/<identifier>` for reference nodes
    pub reference: Option<String>,
    /// Specification extensions (`x-*` keys)
    pub extensions: BTreeMap<String, Value>,
    pub origin: Option<Origin>,
    pub value: Schema,
}

impl SchemaRef {
    /// Wrap inline schema content
    pub fn inline(value: Schema) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Identifier of the referenced component schema
    pub fn identifier(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(COMPONENTS_SCHEMAS_PREFIX))
    }
}

impl From<Schema> for SchemaRef {
    fn from(value: Schema) -> Self {
        Self::inline(value)
    }
}

impl Serialize for SchemaRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(reference) = &self.reference {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("$ref", reference)?;
            return map.end();
        }
        if self.extensions.is_empty() {
            return self.value.serialize(serializer);
        }

        #[derive(Serialize)]
        struct WithExtensions<'a> {
            #[serde(flatten)]
            value: &'a Schema,
            #[serde(flatten)]
            extensions: &'a BTreeMap<String, Value>,
        }

        WithExtensions {
            value: &self.value,
            extensions: &self.extensions,
        }
        .serialize(serializer)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

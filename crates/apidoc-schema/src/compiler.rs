/*!
The type-to-schema compiler.

[`SchemaCompiler`] walks a [`TypeDescriptor`] and produces a [`SchemaRef`]
tree. Named composite types are stored in a [`SchemaCache`] and returned as
references; everything else is returned inline.

```
use apidoc_schema::{Describe, SchemaCache, SchemaCompiler};

#[derive(Describe)]
struct User {
    #[describe(validate = "required")]
    name: String,
    age: Option<u8>,
}

let cache = SchemaCache::new();
let compiler = SchemaCompiler::new(&cache);
let user = compiler.compile_type::<User>();

assert!(user.is_reference());
assert_eq!(user.value.required, vec!["name".to_string()]);
```
*/

use crate::cache::{reference_path, type_identifier, SchemaCache};
use crate::defaults::{default_schema, is_uuid};
use crate::descriptor::{FieldDescriptor, TypeDescriptor, TypeKind, WellKnown};
use crate::describe::Describe;
use crate::null::NullWrapper;
use crate::schema::{Origin, Schema, SchemaRef, SchemaType, XmlObject};
use crate::tags::{
    normalize_name, parse_validation_rules, TagOptions, ValidationRule, IGNORE_MARKER, JSON_TAG,
    VALIDATE_TAG, XML_TAG,
};
use serde_json::Value;

/// Normalized name of the field that names a type's XML element
const XML_ROOT_FIELD: &str = "xmlname";

/// Compiler settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Map `max=` on string fields to `maxLength` instead of `maximum`
    pub string_max_as_length: bool,
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string_max_as_length(mut self, enabled: bool) -> Self {
        self.string_max_as_length = enabled;
        self
    }
}

/// Compiles type descriptors into schema trees backed by a cache
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'c> {
    cache: &'c SchemaCache,
    config: &'c SchemaConfig,
}

static DEFAULT_CONFIG: SchemaConfig = SchemaConfig {
    string_max_as_length: false,
};

impl<'c> SchemaCompiler<'c> {
    /// Create a compiler with the default settings
    pub fn new(cache: &'c SchemaCache) -> Self {
        Self {
            cache,
            config: &DEFAULT_CONFIG,
        }
    }

    pub fn with_config(cache: &'c SchemaCache, config: &'c SchemaConfig) -> Self {
        Self { cache, config }
    }

    pub fn cache(&self) -> &'c SchemaCache {
        self.cache
    }

    pub fn config(&self) -> &'c SchemaConfig {
        self.config
    }

    /// Compile the schema for `T`
    pub fn compile_type<T: Describe + ?Sized>(&self) -> SchemaRef {
        self.compile(&T::describe())
    }

    /// Compile a descriptor
    ///
    /// Named composites come back as reference nodes; the full definition
    /// is in the cache. Other kinds come back inline. Enum values declared
    /// by the type itself are attached to inline results.
    pub fn compile(&self, descriptor: &TypeDescriptor) -> SchemaRef {
        let _writer = self.cache.lock_writer();

        let mut result = self.compile_descriptor(descriptor);
        let (inner, _) = descriptor.strip_pointers();
        if !result.is_reference() {
            self.apply_enum_capability(&mut result, inner);
        }
        result
    }

    fn compile_descriptor(&self, descriptor: &TypeDescriptor) -> SchemaRef {
        let (inner, nullable) = descriptor.strip_pointers();
        if inner.is_struct() && !is_special_struct(inner) {
            return self.compile_struct(inner);
        }

        let mut result = self.classify(inner);
        if nullable {
            result.value.nullable = true;
        }
        result
    }

    fn compile_struct(&self, descriptor: &TypeDescriptor) -> SchemaRef {
        let identifier = type_identifier(descriptor);

        if let Some(cached) = self.cache.get(&identifier) {
            tracing::trace!(identifier = %identifier, "schema cache hit");
            return SchemaRef {
                reference: Some(reference_path(&identifier)),
                extensions: cached.extensions,
                origin: cached.origin,
                value: cached.value,
            };
        }

        let fields = descriptor.fields();
        if fields.is_empty() {
            let mut empty = Schema::object();
            empty.title = descriptor.name.clone();
            return SchemaRef::inline(empty);
        }

        tracing::debug!(identifier = %identifier, fields = fields.len(), "compiling struct schema");

        // Placeholder keeps self-references from recursing forever
        self.cache.put(identifier.clone(), SchemaRef::default());

        let mut schema = Schema::object();
        schema.title = descriptor.name.clone();
        for field in fields {
            self.compile_field(&mut schema, field);
        }

        let origin = descriptor.name.clone().map(|type_name| Origin {
            type_name,
            module_path: descriptor.module_path.clone(),
        });
        let definition = SchemaRef {
            origin: origin.clone(),
            value: schema.clone(),
            ..Default::default()
        };
        self.cache.put(identifier.clone(), definition);

        SchemaRef {
            reference: Some(reference_path(&identifier)),
            origin,
            value: schema,
            ..Default::default()
        }
    }

    fn compile_field(&self, parent: &mut Schema, field: &FieldDescriptor) {
        let json_tag = field.tag(JSON_TAG);
        let xml_tag = field.tag(XML_TAG);
        if json_tag == Some(IGNORE_MARKER) {
            return;
        }
        if normalize_name(&field.name) == XML_ROOT_FIELD {
            // `xml:"-"` only hides the root-name field itself
            if xml_tag == Some(IGNORE_MARKER) {
                return;
            }
            if let Some(name) = xml_tag.and_then(|tag| TagOptions::parse(tag).name()) {
                parent.xml.get_or_insert_with(XmlObject::default).name = Some(name.to_string());
            }
        }

        let descriptor = field.descriptor();
        let (field_type, mut nullable) = descriptor.strip_pointers();
        if matches!(field_type.kind, TypeKind::Func | TypeKind::Chan) {
            tracing::trace!(
                field = %field.name,
                kind = field_type.kind_name(),
                "skipping field without a schema rendition"
            );
            return;
        }

        let mut result = self.classify(field_type);
        if NullWrapper::detect(field_type).is_some() {
            nullable = true;
        }
        result.value.nullable = nullable;

        let json = json_tag.map(TagOptions::parse).unwrap_or_default();
        let name = json.name().unwrap_or(field.name.as_str()).to_string();
        for option in json.options() {
            match *option {
                "string" => result.value.schema_type = Some(SchemaType::String.into()),
                "omitempty" | "omitzero" => {
                    result.value.nullable = true;
                    result.value.append_description(option);
                }
                _ => {}
            }
        }

        if let Some(xml_tag) = xml_tag.filter(|tag| *tag != IGNORE_MARKER) {
            apply_xml_tag(&mut result.value, &TagOptions::parse(xml_tag));
        }

        self.apply_enum_capability(&mut result, field_type);

        if let Some(validate_tag) = field.tag(VALIDATE_TAG) {
            for rule in parse_validation_rules(validate_tag) {
                self.apply_validation_rule(parent, &mut result, field_type, &name, rule);
            }
        }

        result.value.title = Some(name.clone());
        result.value.normalize_description();

        if parent.properties.insert(name.clone(), result).is_some() {
            tracing::warn!(
                property = %name,
                field = %field.name,
                "duplicate property name, keeping the last field"
            );
        }
    }

    fn classify(&self, descriptor: &TypeDescriptor) -> SchemaRef {
        if descriptor.is_well_known(WellKnown::Timestamp) {
            return Schema::string_with_format("date-time").into();
        }
        if descriptor.is_well_known(WellKnown::FileUpload) {
            return Schema::string_with_format("binary").into();
        }
        if descriptor.is_well_known(WellKnown::RawJson) {
            return SchemaRef::default();
        }
        if let Some(wrapper) = NullWrapper::detect(descriptor) {
            return wrapper.schema().into();
        }

        match &descriptor.kind {
            TypeKind::Array(element, _) if is_uuid(descriptor, element) => {
                Schema::string_with_format("uuid").into()
            }
            TypeKind::Slice(element) if element.is_byte() => {
                Schema::string_with_format("byte").into()
            }
            TypeKind::Map(key, value) if matches!(key.kind, TypeKind::String) => {
                let mut schema = Schema::object();
                schema.additional_properties = Some(Box::new(self.compile_descriptor(value)));
                schema.into()
            }
            TypeKind::Struct(_) => self.compile_struct(descriptor),
            TypeKind::Slice(element) | TypeKind::Array(element, _) => {
                let mut schema = Schema::new(SchemaType::Array);
                schema.items = Some(Box::new(self.compile_descriptor(element)));
                schema.into()
            }
            TypeKind::Map(..) | TypeKind::Interface => Schema::object().into(),
            _ => default_schema(descriptor).into(),
        }
    }

    fn apply_enum_capability(&self, result: &mut SchemaRef, field_type: &TypeDescriptor) {
        let Some(values) = &field_type.enum_values else {
            return;
        };
        let alternatives = values
            .iter()
            .map(|value| {
                let mut alternative = self.compile_descriptor(field_type);
                alternative.value.default = Some(value.clone());
                alternative
            })
            .collect();
        result.value.enum_values = values.clone();
        result.value.one_of = alternatives;
    }

    fn apply_validation_rule(
        &self,
        parent: &mut Schema,
        result: &mut SchemaRef,
        field_type: &TypeDescriptor,
        name: &str,
        rule: ValidationRule<'_>,
    ) {
        let is_list = matches!(field_type.kind, TypeKind::Slice(_) | TypeKind::Array(..));
        let is_string = matches!(field_type.kind, TypeKind::String);
        let value = &mut result.value;

        match rule {
            ValidationRule::Required => {
                if !parent.required.iter().any(|required| required == name) {
                    parent.required.push(name.to_string());
                }
                value.nullable = false;
                value.allow_empty_value = false;
            }
            ValidationRule::Min(bound) if is_list => {
                if let Ok(min) = bound.parse::<u64>() {
                    value.min_items = min;
                }
            }
            ValidationRule::Max(bound) if is_list => {
                if let Ok(max) = bound.parse::<u64>() {
                    value.max_items = Some(max);
                }
            }
            ValidationRule::Min(bound) if is_string => {
                if let Ok(min) = bound.parse::<u64>() {
                    value.min_length = min;
                }
            }
            ValidationRule::Max(bound) if is_string && self.config.string_max_as_length => {
                if let Ok(max) = bound.parse::<u64>() {
                    value.max_length = Some(max);
                }
            }
            ValidationRule::Min(bound) => {
                if let Ok(min) = bound.parse::<f64>() {
                    value.minimum = Some(min);
                    value.default = Some(bound_literal(min, field_type));
                }
            }
            ValidationRule::Max(bound) => {
                if let Ok(max) = bound.parse::<f64>() {
                    value.maximum = Some(max);
                }
            }
            ValidationRule::MinLength(bound) => {
                if let Ok(min) = bound.parse::<u64>() {
                    value.min_length = min;
                }
            }
            ValidationRule::MaxLength(bound) => {
                if let Ok(max) = bound.parse::<u64>() {
                    value.max_length = Some(max);
                }
            }
            ValidationRule::UniqueItems => value.unique_items = true,
            ValidationRule::OmitNil => value.append_description("omitnil"),
            ValidationRule::OneOf(literals) => {
                let literals: Vec<Value> = literals
                    .split(' ')
                    .filter(|literal| !literal.is_empty())
                    .map(|literal| Value::String(literal.to_string()))
                    .collect();
                let alternatives = literals
                    .iter()
                    .map(|literal| {
                        let mut alternative = self.compile_descriptor(field_type);
                        alternative.value.default = Some(literal.clone());
                        alternative
                    })
                    .collect();
                value.enum_values = literals;
                value.one_of = alternatives;
                value.default = None;
            }
            ValidationRule::Other(rule) => {
                tracing::trace!(rule, "validation rule has no schema rendition");
            }
        }
    }
}

/// Composites that classify as scalars rather than object definitions
fn is_special_struct(descriptor: &TypeDescriptor) -> bool {
    descriptor.well_known.is_some() || NullWrapper::detect(descriptor).is_some()
}

fn apply_xml_tag(schema: &mut Schema, tag: &TagOptions<'_>) {
    if let Some(name) = tag.name() {
        schema.xml.get_or_insert_with(XmlObject::default).name = Some(name.to_string());
    }
    for option in tag.options() {
        match *option {
            "attr" => schema.xml.get_or_insert_with(XmlObject::default).attribute = true,
            "omitempty" => {
                schema.nullable = true;
                schema.append_description(option);
            }
            "chardata" | "cdata" | "innerxml" | "comment" => schema.append_description(option),
            _ => {}
        }
    }
}

/// Literal for a numeric bound, integral for integer kinds
fn bound_literal(bound: f64, field_type: &TypeDescriptor) -> Value {
    let integral = matches!(field_type.kind, TypeKind::Int(_) | TypeKind::Uint(_))
        && bound.fract() == 0.0
        && bound >= i64::MIN as f64
        && bound <= i64::MAX as f64;
    if integral {
        Value::from(bound as i64)
    } else {
        Value::from(bound)
    }
}

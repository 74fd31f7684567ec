//! Field tag vocabulary.
//!
//! Three tags drive schema refinement: `json` (serialized name and
//! options), `xml` (alternate serialization hints) and `validate`
//! (comma-separated rules). Any other tag is carried but ignored.

/// Serialized name tag
pub const JSON_TAG: &str = "json";
/// XML serialization tag
pub const XML_TAG: &str = "xml";
/// Validation rule tag
pub const VALIDATE_TAG: &str = "validate";
/// Tag value that removes a field from the schema
pub const IGNORE_MARKER: &str = "-";

/// A parsed `name,option,option` tag value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions<'a> {
    name: Option<&'a str>,
    options: Vec<&'a str>,
}

impl<'a> TagOptions<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let mut segments = raw.split(',');
        let name = segments.next().map(str::trim).filter(|name| !name.is_empty());
        let options = segments
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .collect();
        Self { name, options }
    }

    /// The first segment, when non-empty
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn has(&self, option: &str) -> bool {
        self.options.iter().any(|o| *o == option)
    }

    pub fn options(&self) -> &[&'a str] {
        &self.options
    }
}

/// One rule of a `validate` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule<'a> {
    Required,
    Min(&'a str),
    Max(&'a str),
    MinLength(&'a str),
    MaxLength(&'a str),
    UniqueItems,
    OmitNil,
    /// Space-separated literal values
    OneOf(&'a str),
    /// Rules without a schema rendition (`email`, `dive`, ...)
    Other(&'a str),
}

impl<'a> ValidationRule<'a> {
    pub fn parse(rule: &'a str) -> Self {
        let rule = rule.trim();
        let (key, value) = match rule.split_once('=') {
            Some((key, value)) => (key.trim(), Some(value.trim())),
            None => (rule, None),
        };
        match (key, value) {
            ("required", None) => Self::Required,
            ("min", Some(value)) => Self::Min(value),
            ("max", Some(value)) => Self::Max(value),
            ("minLength", Some(value)) => Self::MinLength(value),
            ("maxLength", Some(value)) => Self::MaxLength(value),
            ("uniqueItems", None) => Self::UniqueItems,
            ("omitnil", None) => Self::OmitNil,
            ("oneof", Some(value)) => Self::OneOf(value),
            _ => Self::Other(rule),
        }
    }
}

/// Parse a `validate` tag into its rules, in listed order
pub fn parse_validation_rules(raw: &str) -> Vec<ValidationRule<'_>> {
    raw.split(',')
        .filter(|rule| !rule.trim().is_empty())
        .map(ValidationRule::parse)
        .collect()
}

/// Normalize a field or type name for case- and underscore-insensitive
/// comparison
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

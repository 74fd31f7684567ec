/*!
Type descriptors consumed by the schema compiler.

A [`TypeDescriptor`] is an explicit description of a data shape. Descriptors
are produced by the [`Describe`](crate::Describe) trait, usually through
`#[derive(Describe)]`, or assembled by hand with the constructors below.
*/

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Width of an integer kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    /// Pointer-sized (`isize` / `usize`)
    Size,
}

/// Width of a floating point kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

/// Types the compiler recognizes by identity rather than by shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    /// Date-time values, rendered as `string` / `date-time`
    Timestamp,
    /// Multipart file uploads, rendered as `string` / `binary`
    FileUpload,
    /// Pre-encoded JSON bytes, rendered as an untyped schema
    RawJson,
}

/// The shape of a described type
#[derive(Debug, Clone)]
pub enum TypeKind {
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    String,
    /// Composite type with ordered fields
    Struct(Vec<FieldDescriptor>),
    /// Variable-length ordered list
    Slice(Box<TypeDescriptor>),
    /// Fixed-size ordered list
    Array(Box<TypeDescriptor>, usize),
    /// Key-value map (key, value)
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// Optional value; marks nullability
    Pointer(Box<TypeDescriptor>),
    Func,
    Chan,
    /// Opaque value of any shape
    Interface,
}

/// Description of a data shape
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Shape of the type
    pub kind: TypeKind,
    /// Declared type name, `None` for anonymous types
    pub name: Option<String>,
    /// Declaring module path
    pub module_path: Option<String>,
    /// Marker for types recognized by identity
    pub well_known: Option<WellKnown>,
    /// Literal values the type permits, when it declares them
    pub enum_values: Option<Vec<Value>>,
}

impl TypeDescriptor {
    /// Create an anonymous descriptor of the given kind
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            name: None,
            module_path: None,
            well_known: None,
            enum_values: None,
        }
    }

    pub fn bool() -> Self {
        Self::new(TypeKind::Bool)
    }

    pub fn int(width: IntWidth) -> Self {
        Self::new(TypeKind::Int(width))
    }

    pub fn uint(width: IntWidth) -> Self {
        Self::new(TypeKind::Uint(width))
    }

    pub fn float(width: FloatWidth) -> Self {
        Self::new(TypeKind::Float(width))
    }

    pub fn string() -> Self {
        Self::new(TypeKind::String)
    }

    pub fn slice(element: TypeDescriptor) -> Self {
        Self::new(TypeKind::Slice(Box::new(element)))
    }

    pub fn array(element: TypeDescriptor, len: usize) -> Self {
        Self::new(TypeKind::Array(Box::new(element), len))
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::new(TypeKind::Map(Box::new(key), Box::new(value)))
    }

    pub fn pointer(inner: TypeDescriptor) -> Self {
        Self::new(TypeKind::Pointer(Box::new(inner)))
    }

    pub fn func() -> Self {
        Self::new(TypeKind::Func)
    }

    pub fn chan() -> Self {
        Self::new(TypeKind::Chan)
    }

    pub fn interface() -> Self {
        Self::new(TypeKind::Interface)
    }

    /// Create a named composite type
    pub fn structure(
        name: impl Into<String>,
        module_path: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self::new(TypeKind::Struct(fields)).named(name, module_path)
    }

    /// Create a composite type without a declared name
    pub fn anonymous(fields: Vec<FieldDescriptor>) -> Self {
        Self::new(TypeKind::Struct(fields))
    }

    /// Set the declared name and module path
    pub fn named(mut self, name: impl Into<String>, module_path: impl Into<String>) -> Self {
        let module_path = module_path.into();
        self.name = Some(name.into());
        self.module_path = if module_path.is_empty() {
            None
        } else {
            Some(module_path)
        };
        self
    }

    /// Set only the declared name, leaving the module path empty
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_well_known(mut self, well_known: WellKnown) -> Self {
        self.well_known = Some(well_known);
        self
    }

    /// Attach the literal values this type permits
    pub fn with_enum_values(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    pub fn is_well_known(&self, well_known: WellKnown) -> bool {
        self.well_known == Some(well_known)
    }

    /// Whether this is the 8-bit unsigned kind
    pub fn is_byte(&self) -> bool {
        matches!(self.kind, TypeKind::Uint(IntWidth::W8))
    }

    /// Fields of a composite type, empty for every other kind
    pub fn fields(&self) -> &[FieldDescriptor] {
        match &self.kind {
            TypeKind::Struct(fields) => fields,
            _ => &[],
        }
    }

    /// Strip every pointer layer, reporting whether any was removed
    pub fn strip_pointers(&self) -> (&TypeDescriptor, bool) {
        let mut current = self;
        let mut stripped = false;
        while let TypeKind::Pointer(inner) = &current.kind {
            current = inner;
            stripped = true;
        }
        (current, stripped)
    }

    /// Short name of the kind, for logging
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeKind::Bool => "bool",
            TypeKind::Int(_) => "int",
            TypeKind::Uint(_) => "uint",
            TypeKind::Float(_) => "float",
            TypeKind::String => "string",
            TypeKind::Struct(_) => "struct",
            TypeKind::Slice(_) => "slice",
            TypeKind::Array(..) => "array",
            TypeKind::Map(..) => "map",
            TypeKind::Pointer(_) => "pointer",
            TypeKind::Func => "func",
            TypeKind::Chan => "chan",
            TypeKind::Interface => "interface",
        }
    }
}

/// Metadata tags attached to a field, keyed by tag name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A field of a composite type
///
/// The field's type is described lazily so that self-referential types
/// have finite descriptors.
#[derive(Clone)]
pub struct FieldDescriptor {
    /// Declared field name
    pub name: String,
    /// Metadata tags (`json`, `xml`, `validate`, ...)
    pub tags: Tags,
    ty: fn() -> TypeDescriptor,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: fn() -> TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            tags: Tags::new(),
            ty,
        }
    }

    /// Create a field whose type is `T`
    pub fn of<T: crate::Describe + ?Sized>(name: impl Into<String>) -> Self {
        Self::new(name, T::describe)
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }

    /// Describe the field's type
    pub fn descriptor(&self) -> TypeDescriptor {
        (self.ty)()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Build a name for a generic type from its base name and the
/// `std::any::type_name` of each type parameter.
///
/// Module qualifiers are dropped: `Page` with `alloc::vec::Vec<my::User>`
/// becomes `Page_Vec_User`.
pub fn generic_type_name(base: &str, params: &[&str]) -> String {
    let mut name = base.to_string();
    for param in params {
        for segment in unqualified_segments(param) {
            name.push('_');
            name.push_str(&segment);
        }
    }
    name
}

fn unqualified_segments(type_name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = type_name.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            current.push(c);
        } else if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            current.clear();
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

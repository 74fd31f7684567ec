use apidoc_schema::{
    type_identifier, Describe, NullInt64, NullString, SchemaCache, SchemaCompiler, SchemaConfig,
    SchemaRef, SchemaType, UploadedFile,
};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Describe)]
struct Profile {
    #[describe(json = "Name")]
    name: String,
    #[describe(json = "Age", validate = "min=0,max=150")]
    age: i32,
    #[describe(json = "Tags")]
    tags: Vec<String>,
}

#[derive(Describe)]
struct TreeNode {
    name: String,
    children: Vec<TreeNode>,
    parent: Option<Box<TreeNode>>,
}

#[derive(Describe)]
enum Color {
    Red,
    Green,
    Blue,
}

#[derive(Describe)]
struct Palette {
    primary: Color,
    #[describe(validate = "oneof=A B")]
    accent: Color,
}

#[derive(Describe)]
struct Account {
    #[describe(json = "-")]
    password_hash: String,
    #[serde(skip)]
    session: String,
    #[describe(validate = "required")]
    nickname: Option<String>,
    #[describe(json = "email,omitempty")]
    email: Option<String>,
    #[describe(json = "balance,string")]
    balance: i64,
}

#[derive(Describe)]
struct Bounds {
    #[describe(validate = "min=1,max=10")]
    items: Vec<u32>,
    #[describe(validate = "min=1,max=10")]
    label: String,
    #[describe(validate = "min=1,max=10")]
    ratio: f64,
    #[describe(validate = "min=1,max=10")]
    count: u16,
    #[describe(validate = "minLength=2,maxLength=8,uniqueItems")]
    code: String,
    #[describe(validate = "min=abc")]
    broken: i32,
}

#[derive(Describe)]
struct Record {
    id: uuid::Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    attachment: UploadedFile,
    payload: Vec<u8>,
    raw: Box<serde_json::value::RawValue>,
    metadata: HashMap<String, i32>,
    lookup: HashMap<i32, String>,
    extra: Value,
    note: NullString,
    counter: NullInt64,
}

#[derive(Describe)]
struct SqlNullString {
    #[describe(json = "NullString")]
    null_string: NullString,
}

#[derive(Describe)]
struct Wrapped {
    legacy: SqlNullString,
}

#[derive(Describe)]
struct Unsupported {
    name: String,
    callback: fn(i32) -> bool,
    events: std::sync::mpsc::Sender<String>,
}

#[derive(Describe)]
struct Person {
    #[describe(xml = "person")]
    xml_name: String,
    #[describe(xml = "id,attr")]
    id: u64,
    #[describe(xml = "bio,cdata,omitempty")]
    bio: String,
    #[describe(json = "internal", xml = "-")]
    internal: String,
}

#[derive(Describe)]
struct Envelope {
    #[describe(xml = "-")]
    xml_name: String,
    body: String,
}

#[derive(Describe)]
struct Author {
    name: String,
    latest: Option<Box<Book>>,
}

#[derive(Describe)]
struct Book {
    title: String,
    authors: Vec<Author>,
}

#[derive(Describe)]
#[serde(rename_all = "camelCase")]
struct Settings {
    dark_mode: bool,
    #[serde(rename = "lang")]
    language: String,
}

#[derive(Describe)]
#[serde(rename_all = "snake_case")]
enum Status {
    InProgress,
    Done,
    #[serde(rename = "cancelled")]
    Canceled,
}

#[derive(Describe)]
struct Page<T> {
    items: Vec<T>,
    total: u64,
}

#[derive(Describe)]
#[describe(name = "Customer", module = "billing")]
struct CustomerRecord {
    id: u64,
}

fn definition(cache: &SchemaCache, node: &SchemaRef) -> apidoc_schema::Schema {
    let identifier = node.identifier().expect("reference node");
    cache.get(identifier).expect("cached definition").value
}

fn property<'a>(schema: &'a apidoc_schema::Schema, name: &str) -> &'a SchemaRef {
    schema
        .properties
        .get(name)
        .unwrap_or_else(|| panic!("missing property {}", name))
}

#[test]
fn test_profile_example() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Profile>();
    let profile = definition(&cache, &result);

    let name = &property(&profile, "Name").value;
    assert!(name.is_type(SchemaType::String));

    let age = &property(&profile, "Age").value;
    assert!(age.is_type(SchemaType::Integer));
    assert_eq!(age.format.as_deref(), Some("int32"));
    assert_eq!(age.minimum, Some(0.0));
    assert_eq!(age.maximum, Some(150.0));

    let tags = &property(&profile, "Tags").value;
    assert!(tags.is_type(SchemaType::Array));
    assert!(tags.items.as_ref().unwrap().value.is_type(SchemaType::String));

    assert!(profile.required.is_empty());
}

#[test]
fn test_second_compilation_hits_cache() {
    let cache = SchemaCache::new();
    let compiler = SchemaCompiler::new(&cache);

    let first = compiler.compile_type::<Profile>();
    let identifier = type_identifier(&Profile::describe());
    let cached = cache.get(&identifier).unwrap();

    let second = compiler.compile_type::<Profile>();
    assert!(first.is_reference());
    assert!(second.is_reference());
    assert_eq!(first.reference, second.reference);
    assert_eq!(second.value, cached.value);
    assert_eq!(cache.get(&identifier).unwrap(), cached);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_self_reference_terminates() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<TreeNode>();
    let identifier = type_identifier(&TreeNode::describe());
    assert_eq!(result.identifier(), Some(identifier.as_str()));

    let tree = definition(&cache, &result);
    let children = &property(&tree, "children").value;
    let items = children.items.as_ref().unwrap();
    assert_eq!(items.identifier(), Some(identifier.as_str()));

    let parent = property(&tree, "parent");
    assert_eq!(parent.identifier(), Some(identifier.as_str()));
    assert!(parent.value.nullable);

    // Placeholder was replaced by the final definition
    assert_eq!(tree.properties.len(), 3);
    assert_eq!(tree.title.as_deref(), Some("TreeNode"));
}

#[test]
fn test_hidden_xml_root_name_field() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Envelope>();
    let envelope = definition(&cache, &result);

    assert!(envelope.xml.is_none());
    assert_eq!(envelope.properties.keys().collect::<Vec<_>>(), vec!["body"]);
}

#[test]
fn test_mutual_reference_terminates() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Author>();
    let author_id = type_identifier(&Author::describe());
    let book_id = type_identifier(&Book::describe());
    assert_eq!(result.identifier(), Some(author_id.as_str()));
    assert_eq!(cache.len(), 2);

    let author = cache.get(&author_id).unwrap().value;
    assert_eq!(author.properties.len(), 2);
    let latest = property(&author, "latest");
    assert_eq!(latest.identifier(), Some(book_id.as_str()));
    assert!(latest.value.nullable);

    let book = cache.get(&book_id).unwrap().value;
    assert_eq!(book.properties.len(), 2);
    let items = property(&book, "authors").value.items.as_ref().unwrap();
    assert_eq!(items.identifier(), Some(author_id.as_str()));
}

#[test]
fn test_enum_capability_and_oneof_override() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Palette>();
    let palette = definition(&cache, &result);

    let primary = &property(&palette, "primary").value;
    assert_eq!(primary.enum_values, vec![json!("Red"), json!("Green"), json!("Blue")]);
    assert_eq!(primary.one_of.len(), 3);
    assert_eq!(primary.one_of[1].value.default, Some(json!("Green")));
    assert!(primary.one_of[1].value.is_type(SchemaType::String));

    let accent = &property(&palette, "accent").value;
    assert_eq!(accent.enum_values, vec![json!("A"), json!("B")]);
    assert_eq!(accent.one_of.len(), 2);
    assert_eq!(accent.one_of[0].value.default, Some(json!("A")));
    assert!(accent.default.is_none());
}

#[test]
fn test_ignored_fields_and_json_options() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Account>();
    let account = definition(&cache, &result);

    assert!(!account.properties.contains_key("password_hash"));
    assert!(!account.properties.contains_key("session"));

    let nickname = &property(&account, "nickname").value;
    assert_eq!(account.required, vec!["nickname".to_string()]);
    assert!(!nickname.nullable);
    assert!(!nickname.allow_empty_value);

    let email = &property(&account, "email").value;
    assert!(email.nullable);
    assert_eq!(email.description.as_deref(), Some("omitempty"));
    assert_eq!(email.title.as_deref(), Some("email"));

    let balance = &property(&account, "balance").value;
    assert!(balance.is_type(SchemaType::String));
}

#[test]
fn test_bounds_by_kind() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Bounds>();
    let bounds = definition(&cache, &result);

    let items = &property(&bounds, "items").value;
    assert_eq!(items.min_items, 1);
    assert_eq!(items.max_items, Some(10));
    assert!(items.minimum.is_none());

    let label = &property(&bounds, "label").value;
    assert_eq!(label.min_length, 1);
    assert_eq!(label.maximum, Some(10.0));
    assert!(label.max_length.is_none());

    let ratio = &property(&bounds, "ratio").value;
    assert_eq!(ratio.minimum, Some(1.0));
    assert_eq!(ratio.maximum, Some(10.0));
    assert_eq!(ratio.default, Some(json!(1.0)));

    let count = &property(&bounds, "count").value;
    assert_eq!(count.default, Some(json!(1)));

    let code = &property(&bounds, "code").value;
    assert_eq!(code.min_length, 2);
    assert_eq!(code.max_length, Some(8));
    assert!(code.unique_items);

    // Unparseable bounds leave the defaults in place
    let broken = &property(&bounds, "broken").value;
    assert_eq!(broken.minimum, Some(i32::MIN as f64));
    assert!(broken.default.is_none());
}

#[test]
fn test_string_max_as_length() {
    let cache = SchemaCache::new();
    let config = SchemaConfig::new().with_string_max_as_length(true);
    let result = SchemaCompiler::with_config(&cache, &config).compile_type::<Bounds>();
    let bounds = definition(&cache, &result);

    let label = &property(&bounds, "label").value;
    assert_eq!(label.min_length, 1);
    assert_eq!(label.max_length, Some(10));
    assert!(label.maximum.is_none());
}

#[test]
fn test_well_known_fields() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Record>();
    let record = definition(&cache, &result);

    let expect_format = |name: &str, format: &str| {
        let schema = &property(&record, name).value;
        assert!(schema.is_type(SchemaType::String), "{}", name);
        assert_eq!(schema.format.as_deref(), Some(format), "{}", name);
    };
    expect_format("id", "uuid");
    expect_format("created_at", "date-time");
    expect_format("attachment", "binary");
    expect_format("payload", "byte");

    let raw = &property(&record, "raw").value;
    assert!(raw.schema_type.is_none());

    let metadata = &property(&record, "metadata").value;
    let values = metadata.additional_properties.as_ref().unwrap();
    assert_eq!(values.value.format.as_deref(), Some("int32"));

    let lookup = &property(&record, "lookup").value;
    assert!(lookup.is_type(SchemaType::Object));
    assert!(lookup.additional_properties.is_none());

    assert!(property(&record, "extra").value.is_type(SchemaType::Object));

    let note = &property(&record, "note").value;
    assert!(note.is_type(SchemaType::String));
    assert!(note.nullable);

    let counter = &property(&record, "counter").value;
    assert_eq!(counter.format.as_deref(), Some("int64"));
    assert!(counter.nullable);

    // Only the record itself is a cached definition
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_null_wrapper_alias() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Wrapped>();
    let wrapped = definition(&cache, &result);

    let legacy = &property(&wrapped, "legacy").value;
    assert!(legacy.is_type(SchemaType::String));
    assert!(legacy.nullable);
}

#[test]
fn test_function_and_channel_fields_are_skipped() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Unsupported>();
    let schema = definition(&cache, &result);
    assert_eq!(schema.properties.keys().collect::<Vec<_>>(), vec!["name"]);
}

#[test]
fn test_xml_tags() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Person>();
    let person = definition(&cache, &result);

    assert_eq!(person.xml.as_ref().and_then(|xml| xml.name.as_deref()), Some("person"));
    assert!(person.properties.contains_key("xml_name"));

    // Hidden from XML only, still part of the JSON payload
    let internal = &property(&person, "internal").value;
    assert!(internal.is_type(SchemaType::String));
    assert!(internal.xml.is_none());

    let id = property(&person, "id").value.xml.clone().unwrap();
    assert_eq!(id.name.as_deref(), Some("id"));
    assert!(id.attribute);

    let bio = &property(&person, "bio").value;
    assert!(bio.nullable);
    assert_eq!(bio.description.as_deref(), Some("cdata omitempty"));
}

#[test]
fn test_serde_renames() {
    let cache = SchemaCache::new();
    let compiler = SchemaCompiler::new(&cache);

    let settings = definition(&cache, &compiler.compile_type::<Settings>());
    assert!(settings.properties.contains_key("darkMode"));
    assert!(settings.properties.contains_key("lang"));

    let status = compiler.compile_type::<Status>();
    assert!(!status.is_reference());
    assert!(status.value.is_type(SchemaType::String));
    assert_eq!(
        status.value.enum_values,
        vec![json!("in_progress"), json!("done"), json!("cancelled")]
    );
}

#[test]
fn test_generic_and_renamed_types() {
    assert_eq!(<Page<Profile>>::describe().name.as_deref(), Some("Page_Profile"));

    let cache = SchemaCache::new();
    let compiler = SchemaCompiler::new(&cache);
    compiler.compile_type::<Page<Profile>>();
    compiler.compile_type::<Page<TreeNode>>();
    assert!(cache.identifiers().iter().any(|id| id.ends_with("Page_Profile")));
    assert!(cache.identifiers().iter().any(|id| id.ends_with("Page_TreeNode")));

    let customer = compiler.compile_type::<CustomerRecord>();
    assert_eq!(customer.identifier(), Some("billingCustomer"));
}

#[test]
fn test_reference_serialization() {
    let cache = SchemaCache::new();
    let result = SchemaCompiler::new(&cache).compile_type::<Profile>();
    let identifier = type_identifier(&Profile::describe());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "$ref": format!("#/components/schemas/{}", identifier) })
    );

    let cached = serde_json::to_value(cache.get(&identifier).unwrap()).unwrap();
    assert_eq!(cached["type"], json!("object"));
    assert_eq!(cached["properties"]["Age"]["format"], json!("int32"));
}

#[test]
fn test_concurrent_compilation() {
    let cache = SchemaCache::new();
    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let compiler = SchemaCompiler::new(&cache);
                let tree = compiler.compile_type::<TreeNode>();
                let profile = compiler.compile_type::<Profile>();
                assert!(tree.is_reference());
                assert!(profile.is_reference());
            });
        }
    });

    assert_eq!(cache.len(), 2);
    let tree = cache.get(&type_identifier(&TreeNode::describe())).unwrap();
    assert_eq!(tree.value.properties.len(), 3);
}

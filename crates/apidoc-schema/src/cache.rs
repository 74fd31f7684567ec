//! Schema cache keyed by type identifier.

use crate::descriptor::TypeDescriptor;
use crate::schema::{SchemaRef, COMPONENTS_SCHEMAS_PREFIX};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, RwLock};
use uuid::Uuid;

/// Previously compiled schemas, keyed by stable type identifier
///
/// Entries are never removed. The cache is owned by the caller and shared
/// by reference with every compiler that writes to it.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<BTreeMap<String, SchemaRef>>,
    writer: Mutex<()>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached schema
    pub fn get(&self, identifier: &str) -> Option<SchemaRef> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(identifier).cloned()
    }

    /// Store a schema, replacing any previous entry
    pub fn put(&self, identifier: impl Into<String>, schema: SchemaRef) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(identifier.into(), schema);
    }

    pub fn contains(&self, identifier: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every entry, ordered by identifier
    pub fn snapshot(&self) -> BTreeMap<String, SchemaRef> {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// All identifiers, ordered
    pub fn identifiers(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.keys().cloned().collect()
    }

    /// Serialize one top-level compilation against other writers
    pub(crate) fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Stable cache identifier for a descriptor
///
/// Named types use the sanitized module path followed by the type name.
/// Unnamed types get a fresh `generated-<uuid>` identifier on every call.
pub fn type_identifier(descriptor: &TypeDescriptor) -> String {
    match descriptor.name.as_deref().filter(|name| !name.is_empty()) {
        Some(name) => {
            let module = descriptor.module_path.as_deref().unwrap_or_default();
            format!("{}{}", sanitize_module_path(module), name)
        }
        None => format!("generated-{}", Uuid::new_v4()),
    }
}

/// `#/components/schemas/<identifier>`
pub fn reference_path(identifier: &str) -> String {
    format!("{}{}", COMPONENTS_SCHEMAS_PREFIX, identifier)
}

fn sanitize_module_path(module_path: &str) -> String {
    module_path.replace("::", "_").replace(['/', '.'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, SchemaType};

    #[test]
    fn test_put_and_get() {
        let cache = SchemaCache::new();
        assert!(cache.is_empty());

        cache.put("app_User", SchemaRef::inline(Schema::object()));
        assert!(cache.contains("app_User"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("app_User").unwrap().value.is_type(SchemaType::Object));
        assert!(cache.get("app_Missing").is_none());
    }

    #[test]
    fn test_put_replaces_entry() {
        let cache = SchemaCache::new();
        cache.put("x", SchemaRef::default());
        cache.put("x", SchemaRef::inline(Schema::new(SchemaType::String)));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("x").unwrap().value.is_type(SchemaType::String));
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let cache = SchemaCache::new();
        cache.put("b", SchemaRef::default());
        cache.put("a", SchemaRef::default());
        assert_eq!(cache.identifiers(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(cache.snapshot().len(), 2);
    }

    #[test]
    fn test_named_identifier() {
        let descriptor = TypeDescriptor::structure("User", "my_app::models", Vec::new());
        assert_eq!(type_identifier(&descriptor), "my_app_modelsUser");

        let descriptor = TypeDescriptor::structure("Pet", "github.com/acme/pets", Vec::new());
        assert_eq!(type_identifier(&descriptor), "github_com_acme_petsPet");

        let descriptor = TypeDescriptor::string().with_name("String");
        assert_eq!(type_identifier(&descriptor), "String");
    }

    #[test]
    fn test_unnamed_identifiers_are_unique() {
        let descriptor = TypeDescriptor::anonymous(Vec::new());
        let first = type_identifier(&descriptor);
        let second = type_identifier(&descriptor);
        assert!(first.starts_with("generated-"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_reference_path() {
        assert_eq!(reference_path("app_User"), "#/components/schemas/app_User");
    }
}

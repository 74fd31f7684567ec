use crate::registry::RouteRegistry;
use crate::specification::RouteInfo;
use apidoc_schema::{Describe, SchemaCache, SchemaCompiler, SchemaConfig, SchemaRef};

/// Shared documentation state: compiled schemas plus route documentation
///
/// One instance backs a whole application. Helpers compile request and
/// response types through it so every named type ends up in the same
/// component table.
#[derive(Debug, Default)]
pub struct ApiDocs {
    cache: SchemaCache,
    registry: RouteRegistry,
    schema_config: SchemaConfig,
}

impl ApiDocs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema_config(schema_config: SchemaConfig) -> Self {
        Self {
            schema_config,
            ..Default::default()
        }
    }

    pub fn compiler(&self) -> SchemaCompiler<'_> {
        SchemaCompiler::with_config(&self.cache, &self.schema_config)
    }

    /// Compile the schema of `T` into the shared cache
    pub fn schema<T: Describe + ?Sized>(&self) -> SchemaRef {
        self.compiler().compile_type::<T>()
    }

    pub fn register_route(&self, method: &str, path: &str, info: Option<RouteInfo>) {
        self.registry.register(method, path, info);
    }

    pub fn route(&self, method: &str, path: &str) -> Option<RouteInfo> {
        self.registry.get(method, path).map(|route| route.info)
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn schema_config(&self) -> &SchemaConfig {
        &self.schema_config
    }
}

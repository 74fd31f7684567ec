use crate::config::Config;
use crate::docs::ApiDocs;
use crate::error::{ApiDocError, ApiDocResult};
use crate::export;
use crate::registry::RegisteredRoute;
use crate::specification::{
    Components, OpenApiSpec, Operation, Parameter, ParameterLocation, Response,
};
use apidoc_schema::{Schema, SchemaType};
use regex::Regex;

/// Builds the OpenAPI document from the routes and schemas in [`ApiDocs`]
pub struct OpenApiGenerator {
    config: Config,
    route_segment: Regex,
    path_parameter: Regex,
    spec: Option<OpenApiSpec>,
}

impl OpenApiGenerator {
    /// Create a generator; unset parts of `config` take their defaults
    pub fn new(config: Config) -> ApiDocResult<Self> {
        let route_segment = Regex::new(r"[:*]([A-Za-z0-9_]+)")
            .map_err(|e| ApiDocError::generic(format!("Invalid route segment regex: {}", e)))?;
        let path_parameter = Regex::new(r"\{([^}]+)\}")
            .map_err(|e| ApiDocError::generic(format!("Invalid path parameter regex: {}", e)))?;

        Ok(Self {
            config: config.with_defaults(),
            route_segment,
            path_parameter,
            spec: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate the document for every route registered in `docs`
    pub fn generate(&mut self, docs: &ApiDocs) -> ApiDocResult<&OpenApiSpec> {
        let mut spec = OpenApiSpec::new(self.config.info.clone());
        spec.servers = self.config.servers.clone();
        spec.tags = self.config.tags.clone();
        spec.external_docs = self.config.external_docs.clone();

        let routes = docs.registry().routes();
        for route in &routes {
            self.process_route(&mut spec, route)?;
        }

        // Route documentation may compile schemas lazily, so the cache is
        // read after all routes are processed
        spec.components = Components {
            schemas: docs.cache().snapshot(),
            security_schemes: self.config.security_schemes.clone(),
        };

        tracing::debug!(
            paths = spec.paths.len(),
            schemas = spec.components.schemas.len(),
            "generated OpenAPI document"
        );

        Ok(&*self.spec.insert(spec))
    }

    fn process_route(&self, spec: &mut OpenApiSpec, route: &RegisteredRoute) -> ApiDocResult<()> {
        let path = self.openapi_path(&route.path);
        let operation = self.create_operation(route, &path);

        let path_item = spec.paths.entry(path).or_default();
        match path_item.operation_mut(&route.method) {
            Some(slot) => {
                *slot = Some(operation);
                Ok(())
            }
            None => Err(ApiDocError::route_error(format!(
                "Unsupported HTTP method: {}",
                route.method
            ))),
        }
    }

    fn create_operation(&self, route: &RegisteredRoute, path: &str) -> Operation {
        let mut operation = route.info.clone();

        for name in self.path_parameter_names(path) {
            let documented = operation
                .parameters
                .iter()
                .any(|p| p.location == ParameterLocation::Path && p.name == name);
            if !documented {
                operation.parameters.push(
                    Parameter::new(name, ParameterLocation::Path)
                        .schema(Schema::new(SchemaType::String)),
                );
            }
        }

        if self.config.append_method_to_tags && !operation.tags.contains(&route.method) {
            operation.tags.push(route.method.clone());
        }

        if self.config.automatically_require_auth && operation.security.is_none() {
            operation.security = Some(self.config.required_auth.clone());
        }

        if operation.responses.is_empty() {
            operation
                .responses
                .insert("200".to_string(), Response::new("Successful operation"));
        }

        operation
    }

    /// Rewrite router path syntax (`:id`, `*rest`) as OpenAPI templates
    pub fn openapi_path(&self, path: &str) -> String {
        self.route_segment.replace_all(path, "{$1}").into_owned()
    }

    fn path_parameter_names(&self, path: &str) -> Vec<String> {
        self.path_parameter
            .captures_iter(path)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Export the generated document as JSON
    pub fn export_json(&self) -> ApiDocResult<Vec<u8>> {
        export::to_json(self.generated()?)
    }

    /// Export the generated document as YAML
    pub fn export_yaml(&self) -> ApiDocResult<Vec<u8>> {
        export::to_yaml(self.generated()?)
    }

    /// Get the generated specification
    pub fn specification(&self) -> Option<&OpenApiSpec> {
        self.spec.as_ref()
    }

    fn generated(&self) -> ApiDocResult<&OpenApiSpec> {
        self.spec.as_ref().ok_or_else(|| {
            ApiDocError::generic("No specification generated yet. Call generate() first.")
        })
    }
}

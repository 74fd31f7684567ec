use crate::error::ApiDocResult;
use crate::specification::{
    ExternalDocumentation, Info, SecurityRequirement, SecurityScheme, Server, Tag,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_TITLE: &str = "API Documentation";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_BASE_PATH: &str = "/swagger";
pub const DEFAULT_SWAGGER_FILES_PATH: &str = "./swagger";

/// Documentation settings used when the document is registered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path the viewer page is mounted on; the documents live below it
    pub base_path: String,

    /// Settings passed through to the Swagger UI page
    pub swagger_ui: SwaggerUiConfig,

    /// API information
    pub info: Info,

    /// Server configurations
    pub servers: Vec<Server>,

    /// Global tags for grouping operations
    pub tags: Vec<Tag>,

    /// Security schemes published under `components.securitySchemes`
    pub security_schemes: BTreeMap<String, SecurityScheme>,

    /// External documentation
    pub external_docs: Option<ExternalDocumentation>,

    /// Write `index.html`, `swagger.json` and `swagger.yaml` to disk
    pub create_swagger_files: bool,

    /// Directory the documents are written to
    pub swagger_files_path: String,

    /// Tag every operation with its HTTP method
    pub append_method_to_tags: bool,

    /// Apply `required_auth` to operations that declare no security
    pub automatically_require_auth: bool,

    pub required_auth: Vec<SecurityRequirement>,
}

impl Default for Config {
    fn default() -> Self {
        let mut security_schemes = BTreeMap::new();
        security_schemes.insert(
            "bearerAuth".to_string(),
            SecurityScheme::Http {
                scheme: "bearer".to_string(),
                bearer_format: Some("JWT".to_string()),
            },
        );

        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            swagger_ui: SwaggerUiConfig::default(),
            info: Info {
                title: DEFAULT_TITLE.to_string(),
                version: DEFAULT_VERSION.to_string(),
                ..Default::default()
            },
            servers: Vec::new(),
            tags: Vec::new(),
            security_schemes,
            external_docs: None,
            create_swagger_files: false,
            swagger_files_path: DEFAULT_SWAGGER_FILES_PATH.to_string(),
            append_method_to_tags: false,
            automatically_require_auth: false,
            required_auth: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration with a title and version
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.info.title = title.into();
        config.info.version = version.into();
        config
    }

    /// Parse a configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> ApiDocResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> ApiDocResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Fill every unset part from the defaults
    ///
    /// The UI title falls back to the API title and the UI document URL to
    /// `{base_path}/swagger.json`. A relative base path is made absolute.
    pub fn with_defaults(mut self) -> Self {
        if self.info.title.is_empty() {
            self.info.title = DEFAULT_TITLE.to_string();
        }
        if self.info.version.is_empty() {
            self.info.version = DEFAULT_VERSION.to_string();
        }
        if self.base_path.is_empty() {
            self.base_path = DEFAULT_BASE_PATH.to_string();
        } else if !self.base_path.starts_with('/') {
            self.base_path.insert(0, '/');
        }
        if self.swagger_files_path.is_empty() {
            self.swagger_files_path = DEFAULT_SWAGGER_FILES_PATH.to_string();
        }
        if self.swagger_ui.title.is_empty() {
            self.swagger_ui.title = self.info.title.clone();
        }
        if self.swagger_ui.url.is_empty() {
            self.swagger_ui.url = join_path(&self.base_path, "swagger.json");
        }
        if self.swagger_ui.dom_id.is_empty() {
            self.swagger_ui.dom_id = DEFAULT_DOM_ID.to_string();
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = Some(description.into());
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_swagger_ui(mut self, swagger_ui: SwaggerUiConfig) -> Self {
        self.swagger_ui = swagger_ui;
        self
    }

    /// Add a server to the configuration
    pub fn add_server(mut self, url: impl Into<String>, description: Option<&str>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description: description.map(str::to_string),
            variables: None,
        });
        self
    }

    /// Add a tag to the configuration
    pub fn add_tag(mut self, name: impl Into<String>, description: Option<&str>) -> Self {
        let mut tag = Tag::new(name);
        tag.description = description.map(str::to_string);
        self.tags.push(tag);
        self
    }

    /// Add a security scheme
    pub fn add_security_scheme(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.security_schemes.insert(name.into(), scheme);
        self
    }

    pub fn with_swagger_files(mut self, path: impl Into<String>) -> Self {
        self.create_swagger_files = true;
        self.swagger_files_path = path.into();
        self
    }

    pub fn with_method_tags(mut self, enabled: bool) -> Self {
        self.append_method_to_tags = enabled;
        self
    }

    /// Require `requirement` on every operation that declares no security
    pub fn with_required_auth(mut self, requirement: SecurityRequirement) -> Self {
        self.automatically_require_auth = true;
        self.required_auth.push(requirement);
        self
    }
}

pub const DEFAULT_DOM_ID: &str = "#swagger-ui";

/// Settings handed to `SwaggerUIBundle`
///
/// Serialized in camelCase straight into the page; `title` only fills the
/// HTML `<title>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwaggerUiConfig {
    pub title: String,
    /// Location of the OpenAPI document
    pub url: String,
    #[serde(rename = "dom_id")]
    pub dom_id: String,
    pub deep_linking: bool,
    /// `list`, `full` or `none`
    pub doc_expansion: String,
    pub display_request_duration: bool,
    pub try_it_out_enabled: bool,
    pub filter: bool,
    pub persist_authorization: bool,
    pub default_models_expand_depth: i32,
    pub display_operation_id: bool,
}

impl Default for SwaggerUiConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            url: String::new(),
            dom_id: DEFAULT_DOM_ID.to_string(),
            deep_linking: true,
            doc_expansion: "list".to_string(),
            display_request_duration: false,
            try_it_out_enabled: false,
            filter: false,
            persist_authorization: false,
            default_models_expand_depth: 1,
            display_operation_id: false,
        }
    }
}

impl SwaggerUiConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_deep_linking(mut self, enabled: bool) -> Self {
        self.deep_linking = enabled;
        self
    }

    pub fn with_doc_expansion(mut self, expansion: impl Into<String>) -> Self {
        self.doc_expansion = expansion.into();
        self
    }

    pub fn with_try_it_out(mut self, enabled: bool) -> Self {
        self.try_it_out_enabled = enabled;
        self
    }

    pub fn with_filter(mut self, enabled: bool) -> Self {
        self.filter = enabled;
        self
    }

    pub fn with_persist_authorization(mut self, enabled: bool) -> Self {
        self.persist_authorization = enabled;
        self
    }
}

/// Join a mount path and a child segment with exactly one `/`
pub(crate) fn join_path(base: &str, child: &str) -> String {
    let base = base.trim_end_matches('/');
    let child = child.trim_start_matches('/');
    if child.is_empty() {
        return if base.is_empty() { "/".to_string() } else { base.to_string() };
    }
    format!("{}/{}", base, child)
}

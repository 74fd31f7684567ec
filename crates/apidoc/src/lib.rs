/*!
# apidoc

OpenAPI 3 documents and a Swagger UI for axum applications, generated from
the Rust types handlers accept and return.

Routes added through a [`DocumentedRouter`] carry a [`RouteInfo`]
(an OpenAPI operation). Request and response types are compiled into
component schemas by [`apidoc_schema`], and [`DocumentedRouter::register`]
assembles everything into a document served next to the viewer page.

## Features

- Schemas derived from `#[derive(Describe)]` types, shared through one cache
- Route groups tagged by prefix, optional method tags and global auth
- JSON and YAML renditions, optionally written to disk
- Swagger UI page configured through [`SwaggerUiConfig`]
*/

pub mod config;
pub mod docs;
pub mod error;
pub mod export;
pub mod generator;
pub mod helpers;
pub mod registry;
pub mod router;
pub mod specification;
pub mod swagger;

pub use config::{Config, SwaggerUiConfig};
pub use docs::ApiDocs;
pub use error::{ApiDocError, ApiDocResult};
pub use export::{create_swagger_files, generate_documents, to_json, to_yaml};
pub use generator::OpenApiGenerator;
pub use registry::{route_key, RegisteredRoute, RouteRegistry};
pub use router::DocumentedRouter;
pub use specification::{
    Components, ExternalDocumentation, Header, Info, MediaType, OpenApiSpec, Operation,
    Parameter, ParameterLocation, PathItem, RequestBody, Response, RouteInfo, SecurityRequirement,
    SecurityScheme, Server, Tag,
};
pub use swagger::generate_index_page;

pub use apidoc_schema::{self, Describe, EnumValues, SchemaCompiler, SchemaConfig, SchemaRef};

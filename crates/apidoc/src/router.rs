/*!
axum integration.

[`DocumentedRouter`] wraps an [`axum::Router`] and records documentation for
every route it adds. [`DocumentedRouter::register`] then generates the
document and mounts the viewer page and both document renditions:

```
use apidoc::{Config, DocumentedRouter, RouteInfo};

let app: axum::Router = DocumentedRouter::new()
    .get("/health", Some(RouteInfo::new().summary("Liveness probe")), || async { "ok" })
    .group("/users", |users| {
        users
            .get("/", None, || async { "[]" })
            .get("/:id", None, || async { "{}" })
    })
    .register(Config::default())
    .unwrap();
```
*/

use crate::config::{join_path, Config};
use crate::docs::ApiDocs;
use crate::error::{ApiDocError, ApiDocResult};
use crate::export::{self, JSON_FILE, YAML_FILE};
use crate::generator::OpenApiGenerator;
use crate::specification::RouteInfo;
use crate::swagger::generate_index_page;
use axum::{
    body::Bytes,
    handler::Handler,
    http::header,
    response::Html,
    routing::{self, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// An axum router that documents the routes added through it
pub struct DocumentedRouter<S = ()> {
    router: Router<S>,
    docs: Arc<ApiDocs>,
    prefix: String,
    group_tag: Option<String>,
}

impl<S> Default for DocumentedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DocumentedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::from_router(Router::new(), Arc::new(ApiDocs::new()))
    }

    /// Wrap an existing router, sharing `docs` with other components
    pub fn from_router(router: Router<S>, docs: Arc<ApiDocs>) -> Self {
        Self {
            router,
            docs,
            prefix: String::new(),
            group_tag: None,
        }
    }

    /// Documentation state, for compiling request and response schemas
    pub fn docs(&self) -> &Arc<ApiDocs> {
        &self.docs
    }

    pub fn get<H, T>(self, path: &str, info: Option<RouteInfo>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.documented("GET", path, info, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &str, info: Option<RouteInfo>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.documented("POST", path, info, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &str, info: Option<RouteInfo>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.documented("PUT", path, info, routing::put(handler))
    }

    pub fn delete<H, T>(self, path: &str, info: Option<RouteInfo>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.documented("DELETE", path, info, routing::delete(handler))
    }

    pub fn patch<H, T>(self, path: &str, info: Option<RouteInfo>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.documented("PATCH", path, info, routing::patch(handler))
    }

    pub fn head<H, T>(self, path: &str, info: Option<RouteInfo>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.documented("HEAD", path, info, routing::head(handler))
    }

    pub fn options<H, T>(self, path: &str, info: Option<RouteInfo>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.documented("OPTIONS", path, info, routing::options(handler))
    }

    pub fn trace<H, T>(self, path: &str, info: Option<RouteInfo>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.documented("TRACE", path, info, routing::trace(handler))
    }

    /// Add routes under `prefix`
    ///
    /// Routes added inside the group are tagged with the group's full
    /// prefix.
    pub fn group<F>(mut self, prefix: &str, build: F) -> Self
    where
        F: FnOnce(DocumentedRouter<S>) -> DocumentedRouter<S>,
    {
        let full_prefix = join_path(&join_path(&self.prefix, prefix), "");
        let child = build(DocumentedRouter {
            router: Router::new(),
            docs: Arc::clone(&self.docs),
            prefix: full_prefix.clone(),
            group_tag: Some(full_prefix),
        });
        self.router = self.router.merge(child.router);
        self
    }

    /// Document a route that was added to the router some other way
    pub fn register_route(self, method: &str, path: &str, info: Option<RouteInfo>) -> Self {
        let path = join_path(&self.prefix, path);
        let info = self.tagged(info);
        self.docs.register_route(method, &path, info);
        self
    }

    /// Generate the document and mount the viewer under `config.base_path`
    ///
    /// Mounts `GET {base}`, `GET {base}/swagger.json` and
    /// `GET {base}/swagger.yaml`. Documents are also written to disk when
    /// `create_swagger_files` is set.
    pub fn register(self, config: Config) -> ApiDocResult<Router<S>> {
        let mut generator = OpenApiGenerator::new(config)?;

        let base_path = generator.config().base_path.clone();
        let index_path = join_path(&base_path, "");
        let json_path = join_path(&base_path, JSON_FILE);
        let yaml_path = join_path(&base_path, YAML_FILE);
        for path in [&index_path, &json_path, &yaml_path] {
            if self.docs.route("GET", path).is_some() {
                return Err(ApiDocError::config_error(format!(
                    "Documentation path {} is already routed",
                    path
                )));
            }
        }

        let spec = generator.generate(&self.docs)?;
        let (json, yaml) = export::generate_documents(spec)?;
        let config = generator.config();
        let index = generate_index_page(&config.swagger_ui)?;

        // Side effects start here
        if config.create_swagger_files {
            export::create_swagger_files(&config.swagger_files_path, index.as_bytes(), &json, &yaml)?;
        }

        let index = Html(index);
        let json = Bytes::from(json);
        let yaml = Bytes::from(yaml);
        let docs_router: Router<S> = Router::new()
            .route(&index_path, routing::get(move || async move { index }))
            .route(
                &json_path,
                routing::get(move || async move { ([(header::CONTENT_TYPE, "application/json")], json) }),
            )
            .route(
                &yaml_path,
                routing::get(move || async move { ([(header::CONTENT_TYPE, "application/yaml")], yaml) }),
            )
            .layer(CorsLayer::permissive());

        tracing::info!(
            base_path = %base_path,
            routes = self.docs.registry().len(),
            "mounted API documentation"
        );

        Ok(self.router.merge(docs_router))
    }

    /// The wrapped router, without documentation routes
    pub fn into_router(self) -> Router<S> {
        self.router
    }

    fn documented(
        mut self,
        method: &str,
        path: &str,
        info: Option<RouteInfo>,
        method_router: MethodRouter<S>,
    ) -> Self {
        let path = join_path(&self.prefix, path);
        let info = self.tagged(info);
        self.docs.register_route(method, &path, info);
        self.router = self.router.route(&path, method_router);
        self
    }

    fn tagged(&self, info: Option<RouteInfo>) -> Option<RouteInfo> {
        let Some(tag) = &self.group_tag else {
            return info;
        };
        let mut info = info.unwrap_or_default();
        if !info.tags.contains(tag) {
            info.tags.push(tag.clone());
        }
        Some(info)
    }
}

use crate::specification::RouteInfo;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A documented route
#[derive(Debug, Clone)]
pub struct RegisteredRoute {
    /// Uppercase HTTP method
    pub method: String,
    /// Path as registered with the router
    pub path: String,
    pub info: RouteInfo,
}

/// Documentation registered per route, keyed by method and path
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Mutex<BTreeMap<String, RegisteredRoute>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record documentation for a route, replacing any earlier entry
    pub fn register(&self, method: &str, path: &str, info: Option<RouteInfo>) {
        let method = method.trim().to_ascii_uppercase();
        let path = normalize_path(path);
        let key = route_key(&method, &path);
        tracing::debug!(method = %method, path = %path, "registering route documentation");

        self.lock().insert(
            key,
            RegisteredRoute {
                method,
                path,
                info: info.unwrap_or_default(),
            },
        );
    }

    pub fn get(&self, method: &str, path: &str) -> Option<RegisteredRoute> {
        self.lock().get(&route_key(method, path)).cloned()
    }

    /// Snapshot of all routes ordered by key
    pub fn routes(&self) -> Vec<RegisteredRoute> {
        self.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, RegisteredRoute>> {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Registry key: uppercase method followed by the normalized path
pub fn route_key(method: &str, path: &str) -> String {
    format!("{}{}", method.trim().to_ascii_uppercase(), normalize_path(path))
}

fn normalize_path(path: &str) -> String {
    let mut path: String = path.chars().filter(|c| !c.is_whitespace()).collect();
    while path.contains("//") {
        path = path.replace("//", "/");
    }
    path
}

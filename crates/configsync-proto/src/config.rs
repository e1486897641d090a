//! Cluster configuration document.
//!
//! The document is replicated to every node through the command log. Only the
//! sections the sync layer needs to reason about are modelled; module
//! configuration inside a project is carried as opaque JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The full replicated configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Projects, keyed by their unique id.
    #[serde(default)]
    pub projects: Vec<Project>,

    /// Static routing rules.
    #[serde(default, rename = "static")]
    pub static_config: StaticConfig,

    /// Deployment settings.
    #[serde(default)]
    pub deploy: DeployConfig,

    /// Cluster operating mode.
    #[serde(default, rename = "operationConfig")]
    pub operation_config: OperationConfig,
}

impl Config {
    /// Find a project by id.
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Check if a project with the given id exists.
    pub fn contains_project(&self, id: &str) -> bool {
        self.project(id).is_some()
    }

    /// Number of projects in the document.
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Insert a project, replacing any existing project with the same id.
    ///
    /// Returns `true` if an existing project was replaced.
    pub fn upsert_project(&mut self, project: Project) -> bool {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                *existing = project;
                true
            }
            None => {
                self.projects.push(project);
                false
            }
        }
    }

    /// Remove a project by id, returning it if it was present.
    pub fn remove_project(&mut self, id: &str) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        Some(self.projects.remove(index))
    }
}

/// A single project definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Signing secrets for the project.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<Secret>,

    /// Key used for encrypting project data.
    #[serde(default, rename = "aesKey", skip_serializing_if = "String::is_empty")]
    pub aes_key: String,

    /// Module configuration, keyed by module name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub modules: BTreeMap<String, serde_json::Value>,
}

impl Project {
    /// Create a project with an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a signing secret.
    pub fn with_secret(mut self, secret: Secret) -> Self {
        self.secrets.push(secret);
        self
    }

    /// Set a module configuration.
    pub fn with_module(mut self, name: impl Into<String>, config: serde_json::Value) -> Self {
        self.modules.insert(name.into(), config);
        self
    }
}

/// A project signing secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    /// The secret value.
    pub secret: String,

    /// Whether this is the primary secret.
    #[serde(default, rename = "isPrimary")]
    pub is_primary: bool,
}

/// Static routing section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticConfig {
    /// Public routes.
    #[serde(default)]
    pub routes: Vec<Route>,

    /// Routes used for traffic between services inside the cluster.
    #[serde(default, rename = "internalRoutes")]
    pub internal_routes: Vec<Route>,
}

impl StaticConfig {
    /// Create a static section with only internal routes.
    pub fn internal(routes: Vec<Route>) -> Self {
        Self {
            routes: Vec::new(),
            internal_routes: routes,
        }
    }

    /// Merge internal routes into this section.
    ///
    /// A route whose id already exists replaces the existing route in place;
    /// new routes are appended in order.
    pub fn merge_internal_routes(&mut self, routes: impl IntoIterator<Item = Route>) {
        for route in routes {
            match self.internal_routes.iter_mut().find(|r| r.id == route.id) {
                Some(existing) => *existing = route,
                None => self.internal_routes.push(route),
            }
        }
    }
}

/// A routing rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route identifier.
    pub id: String,

    /// Matching criteria.
    pub source: RouteSource,

    /// Upstream targets.
    #[serde(default)]
    pub targets: Vec<RouteTarget>,
}

impl Route {
    /// Create a route that forwards a URL prefix to a single target.
    pub fn new(id: impl Into<String>, url: impl Into<String>, target: RouteTarget) -> Self {
        Self {
            id: id.into(),
            source: RouteSource {
                url: url.into(),
                ..Default::default()
            },
            targets: vec![target],
        }
    }
}

/// Criteria a request must match to take a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSource {
    /// Hosts to match. Empty matches any host.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    /// Listener port.
    #[serde(default)]
    pub port: u16,

    /// URL path or prefix.
    #[serde(default)]
    pub url: String,

    /// Optional rewrite of the matched prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<String>,

    /// Whether `url` is matched as a prefix or exactly.
    #[serde(default, rename = "type")]
    pub kind: RouteKind,
}

/// URL matching mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Match the URL as a prefix.
    #[default]
    Prefix,
    /// Match the URL exactly.
    Exact,
}

/// An upstream target for a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteTarget {
    /// Target host.
    pub host: String,

    /// Target port.
    pub port: u16,

    /// Scheme used to reach the target.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Relative load-balancing weight.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

impl RouteTarget {
    /// Create an http target with default weight.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            scheme: default_scheme(),
            weight: default_weight(),
        }
    }
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_weight() -> u32 {
    100
}

/// Deployment settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Whether deployments are managed by the cluster.
    #[serde(default)]
    pub enabled: bool,

    /// Orchestrator name (e.g. "kubernetes").
    #[serde(default)]
    pub orchestrator: String,

    /// Namespace deployments are placed in.
    #[serde(default)]
    pub namespace: String,

    /// Container registry credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistryConfig>,
}

/// Container registry settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry URL.
    pub url: String,

    /// Registry account id.
    #[serde(default)]
    pub id: String,

    /// Registry access key.
    #[serde(default)]
    pub key: String,
}

/// Cluster operating mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationConfig {
    /// Operating mode.
    #[serde(default)]
    pub mode: OperationMode,

    /// Account the cluster is registered to.
    #[serde(default, rename = "userId", skip_serializing_if = "String::is_empty")]
    pub user_id: String,

    /// License key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
}

impl OperationConfig {
    /// Create an operation config in the given mode.
    pub fn new(mode: OperationMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

/// Operating modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    /// Unlicensed cluster with project limits.
    #[default]
    Community,
    /// Licensed cluster without project limits.
    Enterprise,
}

//! Identidad del productor de artifacts. Sólo se usa para diagnóstico.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentIdentifier {
    /// Proyecto de un build (`build` vacío o `":"` = build raíz).
    Project { build: String, path: String },
    /// Módulo externo resuelto desde un repositorio.
    Module { group: String, module: String, version: String },
    Opaque(String),
}

impl ComponentIdentifier {
    pub fn project(path: impl Into<String>) -> Self {
        ComponentIdentifier::Project { build: String::new(), path: path.into() }
    }

    pub fn module(group: impl Into<String>, module: impl Into<String>, version: impl Into<String>) -> Self {
        ComponentIdentifier::Module { group: group.into(), module: module.into(), version: version.into() }
    }
}

impl fmt::Display for ComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentIdentifier::Project { build, path } if build.is_empty() || build == ":" => write!(f, "project {path}"),
            ComponentIdentifier::Project { build, path } if path == ":" => write!(f, "project :{build}"),
            ComponentIdentifier::Project { build, path } => write!(f, "project :{build}{path}"),
            ComponentIdentifier::Module { group, module, version } => write!(f, "{group}:{module}:{version}"),
            ComponentIdentifier::Opaque(text) => f.write_str(text),
        }
    }
}

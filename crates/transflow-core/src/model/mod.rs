//! Modelos neutrales (atributos, componentes, artifacts, dependencias).

pub mod artifact;
pub mod attributes;
pub mod component;
pub mod dependency;
pub mod source;

pub use artifact::ResolvedArtifact;
pub use attributes::{AttributeValue, VariantAttributes};
pub use component::ComponentIdentifier;
pub use dependency::WorkDependency;
pub use source::{ArtifactSet, FixedArtifactSet, SourceArtifactSet};

//! Vista de artifacts transformados.
//!
//! Fachada perezosa que un consumidor consulta para "los artifacts del
//! productor P como variante V vía la cadena T". La primera llamada a
//! `visit_dependencies` o `scheduled_nodes` dispara la creación de nodos en
//! el registry (single-flight por clave); las siguientes sólo leen la cache.
use std::fmt;
use std::sync::Arc;

use super::context::{DependencyResolveContext, TransformationDependency};
use super::registry::SchedulingRegistry;
use super::resolver::ExtraDependenciesResolver;
use crate::errors::TransformError;
use crate::model::{ComponentIdentifier, ResolvedArtifact, SourceArtifactSet, VariantAttributes};
use crate::node::ScheduledNodes;
use crate::step::TransformChain;

pub struct TransformedArtifactView {
    component: ComponentIdentifier,
    source: SourceArtifactSet,
    target: VariantAttributes,
    chain: TransformChain,
    resolver: Arc<dyn ExtraDependenciesResolver>,
    registry: Arc<SchedulingRegistry>,
}

impl TransformedArtifactView {
    pub fn new(component: ComponentIdentifier,
               source: SourceArtifactSet,
               target: VariantAttributes,
               chain: TransformChain,
               resolver: Arc<dyn ExtraDependenciesResolver>,
               registry: Arc<SchedulingRegistry>)
               -> Self {
        Self { component, source, target, chain, resolver, registry }
    }

    /// Atributos de la variante pedida, tal como se dieron al construir.
    pub fn target_variant_attributes(&self) -> &VariantAttributes { &self.target }

    /// `"{componente} {atributos}"`, sólo para diagnóstico.
    pub fn target_variant_display_name(&self) -> String { format!("{} {}", self.component, self.target) }

    pub fn component(&self) -> &ComponentIdentifier { &self.component }

    pub fn transformation(&self) -> &TransformChain { &self.chain }

    /// Conjunto previo a la transformación.
    pub fn underlying_source(&self) -> &SourceArtifactSet { &self.source }

    /// Añade al contexto una única dependencia que envuelve todos los nodos
    /// programados, salvo que ya esté; si el conjunto fuente está vacío no
    /// añade nada.
    pub fn visit_dependencies(&self, context: &mut dyn DependencyResolveContext) -> Result<(), TransformError> {
        let nodes = self.scheduled_nodes()?;
        if nodes.is_empty() {
            return Ok(());
        }
        let dependency = TransformationDependency::new(nodes);
        if !context.contains(&dependency) {
            context.add(dependency);
        }
        Ok(())
    }

    /// La misma colección que se expone vía `visit_dependencies`.
    pub fn scheduled_nodes(&self) -> Result<ScheduledNodes, TransformError> {
        self.registry
            .get_or_create(&self.source, &self.chain, self.resolver.as_ref())
            .map_err(|cause| TransformError::Resolution { variant: self.target_variant_display_name(),
                                                          chain: self.chain.to_string(),
                                                          cause: Box::new(cause) })
    }

    /// Recorre los artifacts transformados, nodo por nodo en orden. Falla con
    /// `NodeNotYetProduced` si algún nodo aún no terminó.
    pub fn visit_outputs(&self, visitor: &mut dyn FnMut(&ResolvedArtifact)) -> Result<(), TransformError> {
        for node in &self.scheduled_nodes()? {
            for artifact in node.output()? {
                visitor(artifact);
            }
        }
        Ok(())
    }

    pub fn transformed_artifacts(&self) -> Result<Vec<ResolvedArtifact>, TransformError> {
        let mut out = Vec::new();
        self.visit_outputs(&mut |a| out.push(a.clone()))?;
        Ok(out)
    }
}

impl fmt::Display for TransformedArtifactView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.target_variant_display_name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for TransformedArtifactView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformedArtifactView")
         .field("variant", &self.target_variant_display_name())
         .field("chain", &self.chain.to_string())
         .field("source", &self.source)
         .finish()
    }
}

//! Builds the relation graph from an authorization model.

use tracing::{debug, info};

use crate::error::{DomainError, DomainResult};
use crate::model::{AuthorizationModel, ModelLookup, TypeConstraint, TypeSystem, Userset};

use super::{Graph, NodeId};

/// Builds a graph from a model using a fresh [`TypeSystem`] for lookups.
///
/// # Errors
///
/// Returns `DomainError::ModelLookupError` if a rewrite references a relation
/// that does not exist on its type, or a tupleset whose related types all lack
/// the computed relation.
pub fn build_graph(model: &AuthorizationModel) -> DomainResult<Graph> {
    let type_system = TypeSystem::new(model.clone());
    GraphBuilder::new(&type_system).build(model)
}

/// Walks type definitions and rewrites, adding one edge per grantee source.
///
/// Types are visited in ascending name order and relations in ascending name
/// order within a type, so node ids and edge sequence numbers are stable for
/// a given model regardless of declaration order.
pub struct GraphBuilder<'a, L: ModelLookup + ?Sized> {
    lookup: &'a L,
    graph: Graph,
}

impl<'a, L: ModelLookup + ?Sized> GraphBuilder<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            graph: Graph::new(),
        }
    }

    pub fn build(mut self, model: &AuthorizationModel) -> DomainResult<Graph> {
        let mut type_defs: Vec<_> = model.type_definitions.iter().collect();
        type_defs.sort_by(|a, b| a.type_name.cmp(&b.type_name));

        for type_def in type_defs {
            let type_name = type_def.type_name.as_str();
            self.graph.add_or_get_node(type_name);
            self.graph.add_or_get_node(&format!("{}:*", type_name));

            let mut relations: Vec<_> = type_def.relations.iter().collect();
            relations.sort_by(|a, b| a.name.cmp(&b.name));

            for relation in relations {
                let target = self
                    .graph
                    .add_or_get_node(&format!("{}#{}", type_name, relation.name));
                debug!(type_name, relation = %relation.name, "walking rewrite");
                self.add_rewrite_edges(type_name, &relation.name, target, &relation.rewrite)?;
            }
        }

        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "built model graph"
        );
        Ok(self.graph)
    }

    fn add_rewrite_edges(
        &mut self,
        type_name: &str,
        relation: &str,
        target: NodeId,
        rewrite: &Userset,
    ) -> DomainResult<()> {
        match rewrite {
            Userset::This => {
                for constraint in self.lookup.directly_related_user_types(type_name, relation)? {
                    let source = self.graph.add_or_get_node(&direct_source_label(&constraint));
                    self.graph.add_edge(source, target, None, false);
                }
            }
            Userset::ComputedUserset { relation: computed } => {
                self.add_computed_edge(type_name, computed, target)?;
            }
            Userset::TupleToUserset {
                tupleset,
                computed_userset,
            } => {
                let context = format!("({}#{})", type_name, tupleset);
                let related = self.lookup.directly_related_user_types(type_name, tupleset)?;
                if !related.iter().any(|constraint| {
                    self.lookup
                        .relation(&constraint.type_name, computed_userset)
                        .is_ok()
                }) {
                    return Err(DomainError::ModelLookupError {
                        type_name: type_name.to_string(),
                        relation: computed_userset.clone(),
                    });
                }
                for constraint in related {
                    let label = format!(
                        "{}#{}",
                        decorated_type(&constraint.type_name, constraint.condition.as_deref()),
                        computed_userset
                    );
                    let source = self.graph.add_or_get_node(&label);
                    self.graph
                        .add_edge(source, target, Some(context.clone()), false);
                }
            }
            Userset::Union { children } => {
                for child in children {
                    self.add_rewrite_edges(type_name, relation, target, child)?;
                }
            }
            Userset::Intersection { children } => {
                for child in children {
                    self.add_operand_edge(type_name, target, child)?;
                }
            }
            Userset::Exclusion { base, subtract } => {
                self.add_operand_edge(type_name, target, base)?;
                self.add_operand_edge(type_name, target, subtract)?;
            }
        }
        Ok(())
    }

    /// Operands of an intersection or exclusion only contribute when they
    /// are a bare computed reference.
    fn add_operand_edge(
        &mut self,
        type_name: &str,
        target: NodeId,
        operand: &Userset,
    ) -> DomainResult<()> {
        if let Userset::ComputedUserset { relation } = operand {
            self.add_computed_edge(type_name, relation, target)?;
        }
        Ok(())
    }

    fn add_computed_edge(
        &mut self,
        type_name: &str,
        computed: &str,
        target: NodeId,
    ) -> DomainResult<()> {
        self.lookup.relation(type_name, computed)?;
        let source = self
            .graph
            .add_or_get_node(&format!("{}#{}", type_name, computed));
        self.graph.add_edge(source, target, None, true);
        Ok(())
    }
}

/// ` user[with cond]` for conditioned sources, `user` otherwise.
fn decorated_type(type_name: &str, condition: Option<&str>) -> String {
    match condition {
        Some(condition) => format!(" {}[with {}]", type_name, condition),
        None => type_name.to_string(),
    }
}

fn direct_source_label(constraint: &TypeConstraint) -> String {
    let base = decorated_type(&constraint.type_name, constraint.condition.as_deref());
    match &constraint.relation {
        Some(relation) => format!("{}#{}", base, relation),
        None if constraint.wildcard => format!("{}:*", base),
        None => base,
    }
}

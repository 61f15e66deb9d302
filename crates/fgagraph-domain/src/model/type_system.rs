//! Type system for authorization model lookups with caching.
//!
//! The `TypeSystem` answers the two questions the graph builder asks of a
//! model: what a relation is defined as, and which user types may be
//! directly assigned to it. Lookups are cached in `DashMap`s.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{DomainError, DomainResult};

use super::types::{AuthorizationModel, RelationDefinition, TypeConstraint, TypeDefinition};

/// Read-only relation lookups over an authorization model.
pub trait ModelLookup {
    /// Gets the definition of `relation` on `type_name`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ModelLookupError` if either the type or the
    /// relation does not exist.
    fn relation(&self, type_name: &str, relation: &str) -> DomainResult<Arc<RelationDefinition>>;

    /// Gets the user types that may be directly assigned to `relation` on `type_name`.
    fn directly_related_user_types(
        &self,
        type_name: &str,
        relation: &str,
    ) -> DomainResult<Vec<TypeConstraint>> {
        Ok(self.relation(type_name, relation)?.type_constraints.clone())
    }
}

/// Type system providing cached access to authorization model types and relations.
///
/// # Example
///
/// ```ignore
/// use fgagraph_domain::model::{ModelLookup, TypeSystem};
///
/// let type_system = TypeSystem::new(model);
/// let viewer = type_system.relation("document", "viewer")?;
/// let assignable = type_system.directly_related_user_types("document", "viewer")?;
/// ```
#[derive(Debug)]
pub struct TypeSystem {
    /// The underlying authorization model.
    model: Arc<AuthorizationModel>,
    /// Cache for type definitions, keyed by type name.
    type_cache: DashMap<String, Arc<TypeDefinition>>,
    /// Cache for relation definitions, keyed by "type_name#relation_name".
    relation_cache: DashMap<String, Arc<RelationDefinition>>,
}

impl TypeSystem {
    /// Creates a new `TypeSystem` from an authorization model.
    ///
    /// The type system will lazily cache lookups as they are accessed.
    pub fn new(model: AuthorizationModel) -> Self {
        Self {
            model: Arc::new(model),
            type_cache: DashMap::new(),
            relation_cache: DashMap::new(),
        }
    }

    /// Gets a type definition by name, using the cache if available.
    fn get_type(&self, type_name: &str) -> Option<Arc<TypeDefinition>> {
        if let Some(cached) = self.type_cache.get(type_name) {
            return Some(Arc::clone(cached.value()));
        }

        let type_def = self
            .model
            .type_definitions
            .iter()
            .find(|td| td.type_name == type_name)?;

        let type_def_arc = Arc::new(type_def.clone());
        self.type_cache
            .insert(type_name.to_string(), Arc::clone(&type_def_arc));
        Some(type_def_arc)
    }
}

impl ModelLookup for TypeSystem {
    fn relation(&self, type_name: &str, relation: &str) -> DomainResult<Arc<RelationDefinition>> {
        let cache_key = format!("{}#{}", type_name, relation);

        if let Some(cached) = self.relation_cache.get(&cache_key) {
            return Ok(Arc::clone(cached.value()));
        }

        let lookup_error = || DomainError::ModelLookupError {
            type_name: type_name.to_string(),
            relation: relation.to_string(),
        };

        let type_def = self.get_type(type_name).ok_or_else(lookup_error)?;
        let relation_def = type_def
            .relations
            .iter()
            .find(|r| r.name == relation)
            .ok_or_else(lookup_error)?;

        let relation_def_arc = Arc::new(relation_def.clone());
        self.relation_cache
            .insert(cache_key, Arc::clone(&relation_def_arc));
        Ok(relation_def_arc)
    }
}

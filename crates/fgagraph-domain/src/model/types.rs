//! Core type definitions for the authorization model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An authorization model defining types, their relations and conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationModel {
    /// Schema version (e.g., "1.1").
    pub schema_version: String,
    /// Type definitions in the model.
    pub type_definitions: Vec<TypeDefinition>,
    /// Conditions referenced from type restrictions.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl AuthorizationModel {
    /// Creates an empty model with the given schema version.
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
            type_definitions: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Creates a model with the given type definitions and no conditions.
    pub fn with_types(
        schema_version: impl Into<String>,
        type_definitions: Vec<TypeDefinition>,
    ) -> Self {
        Self {
            schema_version: schema_version.into(),
            type_definitions,
            conditions: Vec::new(),
        }
    }
}

/// A type definition within the authorization model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// The type name (e.g., "document", "folder").
    pub type_name: String,
    /// Relations defined on this type.
    pub relations: Vec<RelationDefinition>,
}

impl TypeDefinition {
    /// Creates a type definition with the given relations.
    pub fn new(type_name: impl Into<String>, relations: Vec<RelationDefinition>) -> Self {
        Self {
            type_name: type_name.into(),
            relations,
        }
    }
}

/// A relation definition on a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDefinition {
    /// The relation name.
    pub name: String,
    /// User types that may be directly assigned (e.g., `[user, group#member]`).
    #[serde(default)]
    pub type_constraints: Vec<TypeConstraint>,
    /// The userset rewrite for this relation.
    pub rewrite: Userset,
}

impl RelationDefinition {
    pub fn new(
        name: impl Into<String>,
        type_constraints: Vec<TypeConstraint>,
        rewrite: Userset,
    ) -> Self {
        Self {
            name: name.into(),
            type_constraints,
            rewrite,
        }
    }
}

/// One entry of a type restriction: `user`, `user:*`, `group#member`,
/// optionally followed by `with <condition>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeConstraint {
    /// The referenced type.
    pub type_name: String,
    /// Sub-relation for userset references (`group#member`).
    #[serde(default)]
    pub relation: Option<String>,
    /// Whether this is a public wildcard (`user:*`).
    #[serde(default)]
    pub wildcard: bool,
    /// Condition the assignment is made under.
    #[serde(default)]
    pub condition: Option<String>,
}

impl TypeConstraint {
    /// A plain type restriction (`user`).
    pub fn direct(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            relation: None,
            wildcard: false,
            condition: None,
        }
    }

    /// A userset restriction (`group#member`).
    pub fn userset(type_name: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            relation: Some(relation.into()),
            ..Self::direct(type_name)
        }
    }

    /// A wildcard restriction (`user:*`).
    pub fn wildcard(type_name: impl Into<String>) -> Self {
        Self {
            wildcard: true,
            ..Self::direct(type_name)
        }
    }

    /// Attaches a condition to this restriction.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

impl fmt::Display for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if let Some(relation) = &self.relation {
            write!(f, "#{}", relation)?;
        } else if self.wildcard {
            write!(f, ":*")?;
        }
        if let Some(condition) = &self.condition {
            write!(f, " with {}", condition)?;
        }
        Ok(())
    }
}

/// A userset defines how a relation is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Userset {
    /// Direct assignment (this).
    This,
    /// Computed userset from another relation.
    ComputedUserset { relation: String },
    /// Tuple to userset (relation from parent).
    TupleToUserset {
        tupleset: String,
        computed_userset: String,
    },
    /// Union of multiple usersets.
    Union { children: Vec<Userset> },
    /// Intersection of multiple usersets.
    Intersection { children: Vec<Userset> },
    /// Exclusion (base but not subtract).
    Exclusion {
        base: Box<Userset>,
        subtract: Box<Userset>,
    },
}

impl Userset {
    /// Shorthand for a computed userset.
    pub fn computed(relation: impl Into<String>) -> Self {
        Userset::ComputedUserset {
            relation: relation.into(),
        }
    }

    /// Shorthand for a tuple to userset.
    pub fn tuple_to_userset(tupleset: impl Into<String>, computed: impl Into<String>) -> Self {
        Userset::TupleToUserset {
            tupleset: tupleset.into(),
            computed_userset: computed.into(),
        }
    }
}

/// A named condition declared at the model level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ConditionParameter>,
    /// The condition body, kept verbatim.
    pub expression: String,
}

/// A typed condition parameter (e.g., `x: int`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionParameter {
    pub name: String,
    pub type_name: String,
}

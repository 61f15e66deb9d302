//! Authorization model validation.
//!
//! Validates that authorization models are well-formed before a graph is
//! built from them:
//! - Type and relation names are unique
//! - All referenced relations exist
//! - Type restrictions name existing types, relations and conditions
//!
//! Cyclic definitions are not rejected here. They are reported, and
//! classified, by [`crate::graph::classify`].

use std::collections::{HashMap, HashSet};

use crate::error::DomainError;
use crate::model::{AuthorizationModel, TypeConstraint, TypeDefinition, Userset};

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A referenced relation does not exist
    UndefinedRelation {
        type_name: String,
        relation_name: String,
        referenced_relation: String,
    },
    /// Type constraint references undefined type or relation
    InvalidTypeConstraint {
        type_name: String,
        relation_name: String,
        invalid_type: String,
    },
    /// Condition referenced in type constraint does not exist
    UndefinedCondition {
        type_name: String,
        relation_name: String,
        condition_name: String,
    },
    /// The same type is defined more than once
    DuplicateType { type_name: String },
    /// The same relation is defined more than once on a type
    DuplicateRelation {
        type_name: String,
        relation_name: String,
    },
    /// Empty model (no type definitions)
    EmptyModel,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::UndefinedRelation {
                type_name,
                relation_name,
                referenced_relation,
            } => write!(
                f,
                "undefined relation '{}' referenced in {}#{}",
                referenced_relation, type_name, relation_name
            ),
            ValidationError::InvalidTypeConstraint {
                type_name,
                relation_name,
                invalid_type,
            } => write!(
                f,
                "invalid type constraint '{}' in {}#{}",
                invalid_type, type_name, relation_name
            ),
            ValidationError::UndefinedCondition {
                type_name,
                relation_name,
                condition_name,
            } => write!(
                f,
                "undefined condition '{}' referenced in {}#{}",
                condition_name, type_name, relation_name
            ),
            ValidationError::DuplicateType { type_name } => {
                write!(f, "type '{}' is defined more than once", type_name)
            }
            ValidationError::DuplicateRelation {
                type_name,
                relation_name,
            } => write!(
                f,
                "relation '{}' is defined more than once on type '{}'",
                relation_name, type_name
            ),
            ValidationError::EmptyModel => {
                write!(f, "model must have at least one type definition")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

/// Model validator
pub struct ModelValidator {
    /// All defined types in the model
    defined_types: HashSet<String>,
    /// Relations defined on each type: type_name -> [relation_names]
    type_relations: HashMap<String, HashSet<String>>,
    /// Directly related type names of each relation: (type_name, relation_name) -> [type_names]
    related_types: HashMap<(String, String), Vec<String>>,
    /// All defined conditions in the model
    defined_conditions: HashSet<String>,
}

impl ModelValidator {
    /// Create a new validator for the given model
    pub fn new(model: &AuthorizationModel) -> Self {
        let mut defined_types = HashSet::new();
        let mut type_relations = HashMap::new();
        let mut related_types = HashMap::new();
        let defined_conditions: HashSet<String> =
            model.conditions.iter().map(|c| c.name.clone()).collect();

        for type_def in &model.type_definitions {
            defined_types.insert(type_def.type_name.clone());

            let relations: HashSet<String> =
                type_def.relations.iter().map(|r| r.name.clone()).collect();
            type_relations.insert(type_def.type_name.clone(), relations);

            for relation_def in &type_def.relations {
                related_types.insert(
                    (type_def.type_name.clone(), relation_def.name.clone()),
                    relation_def
                        .type_constraints
                        .iter()
                        .map(|c| c.type_name.clone())
                        .collect(),
                );
            }
        }

        Self {
            defined_types,
            type_relations,
            related_types,
            defined_conditions,
        }
    }

    /// Validate the model and return any errors found
    pub fn validate(&self, model: &AuthorizationModel) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if model.type_definitions.is_empty() {
            errors.push(ValidationError::EmptyModel);
            return Err(errors);
        }

        let mut seen_types = HashSet::new();
        for type_def in &model.type_definitions {
            if !seen_types.insert(type_def.type_name.as_str()) {
                errors.push(ValidationError::DuplicateType {
                    type_name: type_def.type_name.clone(),
                });
            }
            self.validate_type_definition(type_def, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate a single type definition
    fn validate_type_definition(
        &self,
        type_def: &TypeDefinition,
        errors: &mut Vec<ValidationError>,
    ) {
        let mut seen_relations = HashSet::new();
        for relation_def in &type_def.relations {
            if !seen_relations.insert(relation_def.name.as_str()) {
                errors.push(ValidationError::DuplicateRelation {
                    type_name: type_def.type_name.clone(),
                    relation_name: relation_def.name.clone(),
                });
            }

            self.validate_type_constraints(
                &type_def.type_name,
                &relation_def.name,
                &relation_def.type_constraints,
                errors,
            );

            self.validate_userset(
                &type_def.type_name,
                &relation_def.name,
                &relation_def.rewrite,
                errors,
            );
        }
    }

    /// Validate type constraints (e.g., [user], [group#member], [user:* with condition])
    fn validate_type_constraints(
        &self,
        type_name: &str,
        relation_name: &str,
        constraints: &[TypeConstraint],
        errors: &mut Vec<ValidationError>,
    ) {
        for constraint in constraints {
            let type_exists = self.defined_types.contains(&constraint.type_name);
            let relation_exists = constraint
                .relation
                .as_deref()
                .map_or(true, |relation| {
                    self.relation_exists(&constraint.type_name, relation)
                });

            if !type_exists || !relation_exists {
                errors.push(ValidationError::InvalidTypeConstraint {
                    type_name: type_name.to_string(),
                    relation_name: relation_name.to_string(),
                    invalid_type: constraint.to_string(),
                });
            }

            if let Some(condition_name) = &constraint.condition {
                if !self.defined_conditions.contains(condition_name) {
                    errors.push(ValidationError::UndefinedCondition {
                        type_name: type_name.to_string(),
                        relation_name: relation_name.to_string(),
                        condition_name: condition_name.clone(),
                    });
                }
            }
        }
    }

    /// Validate a userset expression
    fn validate_userset(
        &self,
        type_name: &str,
        relation_name: &str,
        userset: &Userset,
        errors: &mut Vec<ValidationError>,
    ) {
        let mut check_local = |referenced: &str| {
            if !self.relation_exists(type_name, referenced) {
                errors.push(ValidationError::UndefinedRelation {
                    type_name: type_name.to_string(),
                    relation_name: relation_name.to_string(),
                    referenced_relation: referenced.to_string(),
                });
            }
        };

        match userset {
            Userset::This => {}
            Userset::ComputedUserset { relation } => check_local(relation),
            Userset::TupleToUserset {
                tupleset,
                computed_userset,
            } => {
                check_local(tupleset);

                // At least one type reachable through the tupleset must
                // define the computed relation.
                if let Some(related) = self
                    .related_types
                    .get(&(type_name.to_string(), tupleset.clone()))
                {
                    if !related
                        .iter()
                        .any(|related_type| self.relation_exists(related_type, computed_userset))
                    {
                        errors.push(ValidationError::UndefinedRelation {
                            type_name: type_name.to_string(),
                            relation_name: relation_name.to_string(),
                            referenced_relation: computed_userset.clone(),
                        });
                    }
                }
            }
            Userset::Union { children } | Userset::Intersection { children } => {
                for child in children {
                    self.validate_userset(type_name, relation_name, child, errors);
                }
            }
            Userset::Exclusion { base, subtract } => {
                self.validate_userset(type_name, relation_name, base, errors);
                self.validate_userset(type_name, relation_name, subtract, errors);
            }
        }
    }

    /// Check if a type exists in the model
    pub fn type_exists(&self, type_name: &str) -> bool {
        self.defined_types.contains(type_name)
    }

    /// Check if a relation exists on a type
    pub fn relation_exists(&self, type_name: &str, relation_name: &str) -> bool {
        self.type_relations
            .get(type_name)
            .is_some_and(|relations| relations.contains(relation_name))
    }
}

/// Validate an authorization model
pub fn validate(model: &AuthorizationModel) -> ValidationResult<()> {
    let validator = ModelValidator::new(model);
    validator.validate(model)
}

/// Folds validation errors into a single `DomainError::ModelValidationError`.
pub fn into_domain_error(errors: Vec<ValidationError>) -> DomainError {
    DomainError::ModelValidationError {
        message: errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    }
}

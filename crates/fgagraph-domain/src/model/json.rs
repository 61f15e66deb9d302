//! Loader for the OpenFGA JSON model format.
//!
//! Accepts the shape produced by `fga model transform` and the OpenFGA API:
//!
//! ```json
//! {
//!   "schema_version": "1.1",
//!   "type_definitions": [{
//!     "type": "document",
//!     "relations": {
//!       "viewer": {"union": {"child": [{"this": {}}, {"computedUserset": {"relation": "editor"}}]}}
//!     },
//!     "metadata": {"relations": {"viewer": {"directly_related_user_types": [{"type": "user"}]}}}
//!   }]
//! }
//! ```

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

use super::{
    AuthorizationModel, Condition, ConditionParameter, RelationDefinition, TypeConstraint,
    TypeDefinition, Userset, DEFAULT_SCHEMA_VERSION,
};

/// Parses an OpenFGA JSON model document.
///
/// # Errors
///
/// Returns `DomainError::ModelParseError` for malformed JSON or structure, and
/// `DomainError::UnsupportedRewriteVariant` for a rewrite key outside
/// `this`, `computedUserset`, `tupleToUserset`, `union`, `intersection`, `difference`.
pub fn from_json_str(input: &str) -> DomainResult<AuthorizationModel> {
    let model_json: Value = serde_json::from_str(input)
        .map_err(|e| parse_error(format!("failed to parse model JSON: {}", e)))?;
    from_json_value(&model_json)
}

/// Builds an `AuthorizationModel` from an already parsed JSON value.
pub fn from_json_value(model_json: &Value) -> DomainResult<AuthorizationModel> {
    let schema_version = field(model_json, "schema_version", "schemaVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_SCHEMA_VERSION);
    let mut model = AuthorizationModel::new(schema_version);

    let type_defs = field(model_json, "type_definitions", "typeDefinitions")
        .and_then(Value::as_array)
        .ok_or_else(|| parse_error("missing 'type_definitions' array"))?;

    for type_def in type_defs {
        model.type_definitions.push(parse_type_definition(type_def)?);
    }

    if let Some(conditions) = model_json.get("conditions").and_then(Value::as_object) {
        for (name, condition) in conditions {
            model.conditions.push(parse_condition(name, condition));
        }
    }

    Ok(model)
}

fn parse_type_definition(type_def: &Value) -> DomainResult<TypeDefinition> {
    let type_name = type_def
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| parse_error("type definition without 'type'"))?;

    let metadata = type_def
        .get("metadata")
        .and_then(|m| m.get("relations"))
        .and_then(Value::as_object);

    let mut relations = Vec::new();
    if let Some(rels) = type_def.get("relations").and_then(Value::as_object) {
        for (rel_name, rel_def) in rels {
            let rewrite = parse_userset(type_name, rel_name, rel_def)?;
            let type_constraints = match metadata.and_then(|m| m.get(rel_name)) {
                Some(rel_metadata) => parse_directly_related(type_name, rel_name, rel_metadata)?,
                None => Vec::new(),
            };
            relations.push(RelationDefinition {
                name: rel_name.clone(),
                type_constraints,
                rewrite,
            });
        }
    }

    Ok(TypeDefinition {
        type_name: type_name.to_string(),
        relations,
    })
}

fn parse_userset(type_name: &str, relation: &str, userset: &Value) -> DomainResult<Userset> {
    let object = userset.as_object().ok_or_else(|| {
        parse_error(format!(
            "rewrite for {}#{} must be an object",
            type_name, relation
        ))
    })?;

    // Exactly one variant key; anything else is a structural error.
    let mut entries = object.iter();
    let (variant, body) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(parse_error(format!(
                "rewrite for {}#{} must have exactly one variant key",
                type_name, relation
            )))
        }
    };

    match variant.as_str() {
        "this" => Ok(Userset::This),
        "computedUserset" | "computed_userset" => {
            Ok(Userset::computed(relation_field(type_name, relation, body)?))
        }
        "tupleToUserset" | "tuple_to_userset" => {
            let tupleset = body.get("tupleset").ok_or_else(|| {
                parse_error(format!("{}#{}: tupleToUserset without tupleset", type_name, relation))
            })?;
            let computed = field(body, "computedUserset", "computed_userset").ok_or_else(|| {
                parse_error(format!(
                    "{}#{}: tupleToUserset without computedUserset",
                    type_name, relation
                ))
            })?;
            Ok(Userset::tuple_to_userset(
                relation_field(type_name, relation, tupleset)?,
                relation_field(type_name, relation, computed)?,
            ))
        }
        "union" => Ok(Userset::Union {
            children: parse_children(type_name, relation, body)?,
        }),
        "intersection" => Ok(Userset::Intersection {
            children: parse_children(type_name, relation, body)?,
        }),
        "difference" => {
            let base = body.get("base").ok_or_else(|| {
                parse_error(format!("{}#{}: difference without base", type_name, relation))
            })?;
            let subtract = body.get("subtract").ok_or_else(|| {
                parse_error(format!("{}#{}: difference without subtract", type_name, relation))
            })?;
            Ok(Userset::Exclusion {
                base: Box::new(parse_userset(type_name, relation, base)?),
                subtract: Box::new(parse_userset(type_name, relation, subtract)?),
            })
        }
        other => Err(DomainError::UnsupportedRewriteVariant {
            type_name: type_name.to_string(),
            relation: relation.to_string(),
            variant: other.to_string(),
        }),
    }
}

fn parse_children(type_name: &str, relation: &str, body: &Value) -> DomainResult<Vec<Userset>> {
    body.get("child")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            parse_error(format!(
                "{}#{}: set operation without 'child' array",
                type_name, relation
            ))
        })?
        .iter()
        .map(|child| parse_userset(type_name, relation, child))
        .collect()
}

fn parse_directly_related(
    type_name: &str,
    relation: &str,
    rel_metadata: &Value,
) -> DomainResult<Vec<TypeConstraint>> {
    let Some(related) = field(
        rel_metadata,
        "directly_related_user_types",
        "directlyRelatedUserTypes",
    )
    .and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    related
        .iter()
        .map(|entry| {
            let related_type = entry.get("type").and_then(Value::as_str).ok_or_else(|| {
                parse_error(format!(
                    "{}#{}: directly related user type without 'type'",
                    type_name, relation
                ))
            })?;
            Ok(TypeConstraint {
                type_name: related_type.to_string(),
                relation: non_empty_str(entry.get("relation")),
                wildcard: entry.get("wildcard").is_some(),
                condition: non_empty_str(entry.get("condition")),
            })
        })
        .collect()
}

fn parse_condition(name: &str, condition: &Value) -> Condition {
    let parameters = condition
        .get("parameters")
        .and_then(Value::as_object)
        .map(|params| {
            params
                .iter()
                .map(|(param_name, param)| ConditionParameter {
                    name: param_name.clone(),
                    type_name: field(param, "type_name", "typeName")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    Condition {
        name: condition
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(name)
            .to_string(),
        parameters,
        expression: condition
            .get("expression")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

/// Reads `{"relation": "..."}`.
fn relation_field(type_name: &str, relation: &str, value: &Value) -> DomainResult<String> {
    value
        .get("relation")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            parse_error(format!(
                "{}#{}: object reference without 'relation'",
                type_name, relation
            ))
        })
}

/// Looks up a key in either snake_case or camelCase spelling.
fn field<'v>(value: &'v Value, snake: &str, camel: &str) -> Option<&'v Value> {
    value.get(snake).or_else(|| value.get(camel))
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_error(message: impl Into<String>) -> DomainError {
    DomainError::ModelParseError {
        message: message.into(),
    }
}

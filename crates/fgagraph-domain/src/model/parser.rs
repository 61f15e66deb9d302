//! DSL parser for OpenFGA authorization models.
//!
//! Parses the OpenFGA DSL format into AuthorizationModel structures.
//!
//! Example DSL:
//! ```text
//! model
//!   schema 1.1
//!
//! type user
//!
//! type document
//!   relations
//!     define owner: [user]
//!     define editor: [user, user:* with non_expired] or owner
//!     define viewer: [user] or editor or viewer from parent
//!
//! condition non_expired(current_time: timestamp, expires_at: timestamp) {
//!   current_time < expires_at
//! }
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace1, space0, space1},
    combinator::{all_consuming, consumed, map, opt, value},
    error::{context, ContextError, ParseError},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::DomainError;

use super::{
    AuthorizationModel, Condition, ConditionParameter, RelationDefinition, TypeConstraint,
    TypeDefinition, Userset,
};

/// Schema version assumed when the model header is omitted.
pub const DEFAULT_SCHEMA_VERSION: &str = "1.1";

/// Parser error type with context for better error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    pub message: String,
    pub position: Option<usize>,
}

impl ParserError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn with_position(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(pos) = self.position {
            write!(f, "{} at position {}", self.message, pos)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ParserError {}

impl From<ParserError> for DomainError {
    fn from(err: ParserError) -> Self {
        DomainError::ModelParseError {
            message: err.to_string(),
        }
    }
}

/// Result type for parser operations.
pub type ParserResult<T> = Result<T, ParserError>;

// ============ Helper Parsers ============

/// Parse a comment (# to end of line)
fn comment<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, (), E> {
    value((), pair(char('#'), take_while(|c| c != '\n' && c != '\r')))(input)
}

/// Parse whitespace including comments
fn ws<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, (), E> {
    value((), many0(alt((value((), multispace1), comment))))(input)
}

/// Reserved keywords that cannot be used as identifiers
const RESERVED_KEYWORDS: &[&str] = &[
    "type",
    "relations",
    "define",
    "or",
    "and",
    "but",
    "not",
    "from",
    "this",
    "with",
];

/// Check if a string is a reserved keyword
fn is_reserved(s: &str) -> bool {
    RESERVED_KEYWORDS.contains(&s)
}

/// Parse an identifier (alphanumeric, underscore and dash, not a reserved keyword)
fn identifier<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    let (rest, id) = take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)?;

    if is_reserved(id) {
        return Err(nom::Err::Error(E::from_error_kind(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }

    Ok((rest, id))
}

// ============ Keyword Parsers ============

/// Parse the "type" keyword
fn type_keyword<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    context("type keyword", tag("type"))(input)
}

/// Parse the "relations" keyword
fn relations_keyword<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    context("relations keyword", tag("relations"))(input)
}

/// Parse the "define" keyword
fn define_keyword<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    context("define keyword", tag("define"))(input)
}

// ============ Type Restriction Parsers ============

/// What follows the type name inside a restriction.
#[derive(Debug, Clone)]
enum RestrictionSuffix<'a> {
    Relation(&'a str),
    Wildcard,
}

/// Parse a single restriction like `user`, `user:*`, `group#member` or `user with cond`
fn type_restriction<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, TypeConstraint, E> {
    map(
        tuple((
            identifier,
            opt(alt((
                map(preceded(char('#'), identifier), RestrictionSuffix::Relation),
                value(RestrictionSuffix::Wildcard, tag(":*")),
            ))),
            opt(preceded(tuple((space1, tag("with"), space1)), identifier)),
        )),
        |(type_name, suffix, condition): (&str, Option<RestrictionSuffix<'_>>, Option<&str>)| {
            let constraint = match suffix {
                Some(RestrictionSuffix::Relation(relation)) => {
                    TypeConstraint::userset(type_name, relation)
                }
                Some(RestrictionSuffix::Wildcard) => TypeConstraint::wildcard(type_name),
                None => TypeConstraint::direct(type_name),
            };
            match condition {
                Some(condition) => constraint.with_condition(condition),
                None => constraint,
            }
        },
    )(input)
}

/// Parse a type constraint like [user] or [user, group#member, user:* with cond]
fn type_constraint<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Vec<TypeConstraint>, E> {
    context(
        "type constraint",
        delimited(
            pair(char('['), space0),
            separated_list1(tuple((space0, char(','), space0)), type_restriction),
            pair(space0, char(']')),
        ),
    )(input)
}

// ============ Userset Parsers ============

/// Parse a type constraint in expression position to Userset::This
fn parse_direct<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    value(Userset::This, type_constraint)(input)
}

/// Parse "this" keyword to Userset::This
fn parse_this<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    value(Userset::This, tag("this"))(input)
}

/// Parse a direct relation reference (just a relation name)
fn parse_computed_userset<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    map(identifier, |name: &str| Userset::computed(name))(input)
}

/// Parse "relation from tupleset" (tuple to userset)
fn parse_tuple_to_userset<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    context(
        "tuple to userset",
        map(
            tuple((identifier, space1, tag("from"), space1, identifier)),
            |(computed, _, _, _, tupleset): (&str, _, _, _, &str)| {
                Userset::tuple_to_userset(tupleset, computed)
            },
        ),
    )(input)
}

/// Parse a parenthesized sub-expression
fn parse_parenthesized<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    context(
        "parenthesized expression",
        delimited(
            pair(char('('), space0),
            parse_userset,
            pair(space0, char(')')),
        ),
    )(input)
}

/// Parse a base userset (group, direct, this, tuple_to_userset or computed)
fn parse_base_userset<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    alt((
        parse_parenthesized,
        parse_direct,
        parse_this,
        parse_tuple_to_userset,
        parse_computed_userset,
    ))(input)
}

/// Parse a userset with "but not" exclusion (highest precedence after base)
fn parse_exclusion_or_base<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    let (rest, base) = parse_base_userset(input)?;

    let (rest, subtract) = opt(preceded(
        tuple((space1, tag("but"), space1, tag("not"), space1)),
        context("exclusion", parse_base_userset),
    ))(rest)?;

    match subtract {
        Some(subtract) => Ok((
            rest,
            Userset::Exclusion {
                base: Box::new(base),
                subtract: Box::new(subtract),
            },
        )),
        None => Ok((rest, base)),
    }
}

/// Parse intersection level (and binds tighter than or)
fn parse_intersection_level<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    let (rest, first) = parse_exclusion_or_base(input)?;

    let (rest, and_operands) = many0(preceded(
        tuple((space0, tag("and"), space1)),
        parse_exclusion_or_base,
    ))(rest)?;

    if and_operands.is_empty() {
        Ok((rest, first))
    } else {
        let mut children = vec![first];
        children.extend(and_operands);
        Ok((rest, Userset::Intersection { children }))
    }
}

/// Parse union level (lowest precedence)
fn parse_union_level<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    let (rest, first) = parse_intersection_level(input)?;

    let (rest, or_operands) = many0(preceded(
        tuple((space0, tag("or"), space1)),
        parse_intersection_level,
    ))(rest)?;

    if or_operands.is_empty() {
        Ok((rest, first))
    } else {
        let mut children = vec![first];
        children.extend(or_operands);
        Ok((rest, Userset::Union { children }))
    }
}

/// Parse a complete userset expression with proper operator precedence
/// Precedence (highest to lowest): exclusion (but not), intersection (and), union (or)
fn parse_userset<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Userset, E> {
    parse_union_level(input)
}

// ============ Relation Definition Parser ============

/// Parse a relation definition like "define viewer: [user] or editor"
///
/// The relation's assignable types come from the type restriction in the
/// expression, wherever it appears among the operands.
fn parse_relation_definition<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, RelationDefinition, E> {
    context(
        "relation definition",
        map(
            tuple((
                space0,
                define_keyword,
                space1,
                identifier,
                space0,
                char(':'),
                space0,
                consumed(parse_userset),
            )),
            |(_, _, _, name, _, _, _, (expression, rewrite)): (
                _,
                _,
                _,
                &str,
                _,
                _,
                _,
                (&str, Userset),
            )| {
                RelationDefinition {
                    name: name.to_string(),
                    type_constraints: assignable_types(expression),
                    rewrite,
                }
            },
        ),
    )(input)
}

/// Type restriction of a parsed relation expression, empty when it has none.
fn assignable_types(expression: &str) -> Vec<TypeConstraint> {
    expression
        .find('[')
        .and_then(|start| {
            type_constraint::<nom::error::Error<&str>>(&expression[start..]).ok()
        })
        .map(|(_, constraints)| constraints)
        .unwrap_or_default()
}

// ============ Type Definition Parser ============

/// Parse a type definition with optional relations
fn parse_type_definition<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, TypeDefinition, E> {
    context(
        "type definition",
        map(
            tuple((
                type_keyword,
                space1,
                identifier,
                ws,
                opt(preceded(
                    tuple((relations_keyword, ws)),
                    many0(terminated(parse_relation_definition, ws)),
                )),
            )),
            |(_, _, type_name, _, relations): (_, _, &str, _, _)| TypeDefinition {
                type_name: type_name.to_string(),
                relations: relations.unwrap_or_default(),
            },
        ),
    )(input)
}

// ============ Condition Parser ============

/// Split a raw parameter list like "x: int, y: map<string>" into parameters.
fn condition_parameters(raw: &str) -> Vec<ConditionParameter> {
    raw.split(',')
        .filter_map(|param| {
            let (name, type_name) = param.split_once(':')?;
            Some(ConditionParameter {
                name: name.trim().to_string(),
                type_name: type_name.trim().to_string(),
            })
        })
        .collect()
}

/// Parse a condition block like "condition name(x: int) { x < 100 }"
///
/// The body is kept verbatim and must not contain a closing brace.
fn parse_condition<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Condition, E> {
    context(
        "condition",
        map(
            tuple((
                tag("condition"),
                space1,
                identifier,
                space0,
                delimited(char('('), take_until(")"), char(')')),
                ws,
                delimited(char('{'), take_until("}"), char('}')),
            )),
            |(_, _, name, _, params, _, body): (_, _, &str, _, &str, _, &str)| Condition {
                name: name.to_string(),
                parameters: condition_parameters(params),
                expression: body.trim().to_string(),
            },
        ),
    )(input)
}

// ============ Model Parser ============

/// A top-level declaration.
enum ModelItem {
    Type(TypeDefinition),
    Condition(Condition),
}

/// Parse the optional "model schema 1.1" header, returning the schema version
fn parse_model_header<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    context(
        "model header",
        map(
            tuple((
                tag("model"),
                ws,
                tag("schema"),
                space1,
                take_while1(|c: char| c.is_ascii_digit() || c == '.'),
            )),
            |(_, _, _, _, version)| version,
        ),
    )(input)
}

/// Parse a complete authorization model
fn parse_model<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, AuthorizationModel, E> {
    context(
        "authorization model",
        map(
            tuple((
                ws,
                opt(terminated(parse_model_header, ws)),
                many0(terminated(
                    alt((
                        map(parse_type_definition, ModelItem::Type),
                        map(parse_condition, ModelItem::Condition),
                    )),
                    ws,
                )),
            )),
            |(_, schema_version, items): (_, Option<&str>, Vec<ModelItem>)| {
                let mut model =
                    AuthorizationModel::new(schema_version.unwrap_or(DEFAULT_SCHEMA_VERSION));
                for item in items {
                    match item {
                        ModelItem::Type(type_def) => model.type_definitions.push(type_def),
                        ModelItem::Condition(condition) => model.conditions.push(condition),
                    }
                }
                model
            },
        ),
    )(input)
}

// ============ Public API ============

/// Parse a DSL string into an AuthorizationModel.
///
/// # Example
///
/// ```ignore
/// let dsl = r#"
/// type user
///
/// type document
///   relations
///     define owner: [user]
///     define viewer: [user] or owner
/// "#;
///
/// let model = parse(dsl)?;
/// ```
pub fn parse(input: &str) -> ParserResult<AuthorizationModel> {
    match all_consuming(parse_model::<nom::error::VerboseError<&str>>)(input) {
        Ok((_, model)) => Ok(model),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = e.errors.first().map(|(rest, _)| input.len() - rest.len());
            let message = format!("Parse error: {}", nom::error::convert_error(input, e));
            Err(match position {
                Some(position) => ParserError::with_position(message, position),
                None => ParserError::new(message),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(ParserError::new("Incomplete input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation<'m>(
        model: &'m AuthorizationModel,
        type_name: &str,
        name: &str,
    ) -> &'m RelationDefinition {
        model
            .type_definitions
            .iter()
            .find(|td| td.type_name == type_name)
            .and_then(|td| td.relations.iter().find(|r| r.name == name))
            .unwrap_or_else(|| panic!("missing {}#{}", type_name, name))
    }

    // ========== Simple Type Definition Tests ==========

    #[test]
    fn test_parser_parses_simple_type_definition() {
        let model = parse("type user").unwrap();
        assert_eq!(model.type_definitions.len(), 1);
        assert_eq!(model.type_definitions[0].type_name, "user");
        assert!(model.type_definitions[0].relations.is_empty());
        assert_eq!(model.schema_version, DEFAULT_SCHEMA_VERSION);
    }

    #[test]
    fn test_parser_parses_model_header() {
        let input = r#"
model
  schema 1.1

type user
"#;
        let result = parse(input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
        let model = result.unwrap();
        assert_eq!(model.schema_version, "1.1");
        assert_eq!(model.type_definitions.len(), 1);
    }

    #[test]
    fn test_parser_parses_type_with_multiple_relations() {
        let input = r#"
type document
  relations
    define owner: [user]
    define editor: [user]
    define viewer: [user]
"#;
        let model = parse(input).unwrap();
        let names: Vec<_> = model.type_definitions[0]
            .relations
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["owner", "editor", "viewer"]);
    }

    // ========== Type Restriction Tests ==========

    #[test]
    fn test_parser_parses_direct_relation_assignment() {
        let model = parse("type document\n  relations\n    define owner: [user]").unwrap();
        let owner = relation(&model, "document", "owner");
        assert_eq!(owner.rewrite, Userset::This);
        assert_eq!(owner.type_constraints, vec![TypeConstraint::direct("user")]);
    }

    #[test]
    fn test_parser_parses_wildcard_userset_and_conditions() {
        let input = r#"
type document
  relations
    define viewer: [user, user:*, group#member, user with c1, user:* with c2, group#member with c3]
"#;
        let result = parse(input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
        let model = result.unwrap();
        let viewer = relation(&model, "document", "viewer");
        assert_eq!(
            viewer.type_constraints,
            vec![
                TypeConstraint::direct("user"),
                TypeConstraint::wildcard("user"),
                TypeConstraint::userset("group", "member"),
                TypeConstraint::direct("user").with_condition("c1"),
                TypeConstraint::wildcard("user").with_condition("c2"),
                TypeConstraint::userset("group", "member").with_condition("c3"),
            ]
        );
    }

    // ========== Rewrite Tests ==========

    #[test]
    fn test_parser_parses_union_relation() {
        let input = r#"
type document
  relations
    define owner: [user]
    define viewer: [user] or owner
"#;
        let model = parse(input).unwrap();
        assert_eq!(
            relation(&model, "document", "viewer").rewrite,
            Userset::Union {
                children: vec![Userset::This, Userset::computed("owner")]
            }
        );
    }

    #[test]
    fn test_parser_reads_type_restriction_after_other_operands() {
        let input = r#"
type document
  relations
    define owner: [user]
    define viewer: owner or [user, document#owner]
"#;
        let model = parse(input).unwrap();
        let viewer = relation(&model, "document", "viewer");
        assert_eq!(
            viewer.type_constraints,
            vec![
                TypeConstraint::direct("user"),
                TypeConstraint::userset("document", "owner")
            ]
        );
        assert_eq!(
            viewer.rewrite,
            Userset::Union {
                children: vec![Userset::computed("owner"), Userset::This]
            }
        );
    }

    #[test]
    fn test_parser_parses_intersection_relation() {
        let input = r#"
type document
  relations
    define a: [user]
    define b: [user]
    define c: a and b
"#;
        let model = parse(input).unwrap();
        let c = relation(&model, "document", "c");
        assert!(c.type_constraints.is_empty());
        assert_eq!(
            c.rewrite,
            Userset::Intersection {
                children: vec![Userset::computed("a"), Userset::computed("b")]
            }
        );
    }

    #[test]
    fn test_parser_parses_exclusion_relation() {
        let input = r#"
type document
  relations
    define owner: [user]
    define blocked: [user]
    define viewer: owner but not blocked
"#;
        let model = parse(input).unwrap();
        match &relation(&model, "document", "viewer").rewrite {
            Userset::Exclusion { base, subtract } => {
                assert_eq!(base.as_ref(), &Userset::computed("owner"));
                assert_eq!(subtract.as_ref(), &Userset::computed("blocked"));
            }
            other => panic!("Expected Exclusion, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_type_constraint_with_but_not_produces_exclusion() {
        let input = r#"
type document
  relations
    define x: [user] but not y
    define y: [user]
"#;
        let model = parse(input).unwrap();
        let x = relation(&model, "document", "x");
        assert_eq!(x.type_constraints, vec![TypeConstraint::direct("user")]);
        assert_eq!(
            x.rewrite,
            Userset::Exclusion {
                base: Box::new(Userset::This),
                subtract: Box::new(Userset::computed("y")),
            }
        );
    }

    #[test]
    fn test_parser_parses_tuple_to_userset() {
        let input = r#"
type folder
  relations
    define viewer: [user]

type document
  relations
    define parent: [folder]
    define viewer: [user] or editor or viewer from parent
    define editor: [user]
"#;
        let result = parse(input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
        let model = result.unwrap();
        assert_eq!(
            relation(&model, "document", "viewer").rewrite,
            Userset::Union {
                children: vec![
                    Userset::This,
                    Userset::computed("editor"),
                    Userset::tuple_to_userset("parent", "viewer"),
                ]
            }
        );
    }

    #[test]
    fn test_parser_handles_mixed_and_or_precedence() {
        // "editor and owner or reader" parses as "(editor and owner) or reader"
        let input = r#"
type document
  relations
    define editor: [user]
    define owner: [user]
    define reader: [user]
    define access: editor and owner or reader
"#;
        let model = parse(input).unwrap();
        assert_eq!(
            relation(&model, "document", "access").rewrite,
            Userset::Union {
                children: vec![
                    Userset::Intersection {
                        children: vec![Userset::computed("editor"), Userset::computed("owner")]
                    },
                    Userset::computed("reader"),
                ]
            }
        );
    }

    #[test]
    fn test_parser_type_constraint_with_and_produces_intersection() {
        let input = r#"
type transition
  relations
    define start: [state]
    define can_apply: [user] and can_view from start
"#;
        let model = parse(input).unwrap();
        assert_eq!(
            relation(&model, "transition", "can_apply").rewrite,
            Userset::Intersection {
                children: vec![
                    Userset::This,
                    Userset::tuple_to_userset("start", "can_view"),
                ]
            }
        );
    }

    #[test]
    fn test_parser_parses_parenthesized_expression() {
        let input = r#"
type document
  relations
    define a: [user]
    define b: [user]
    define c: [user]
    define d: (a or b) and c
"#;
        let result = parse(input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
        assert_eq!(
            relation(&result.unwrap(), "document", "d").rewrite,
            Userset::Intersection {
                children: vec![
                    Userset::Union {
                        children: vec![Userset::computed("a"), Userset::computed("b")]
                    },
                    Userset::computed("c"),
                ]
            }
        );
    }

    #[test]
    fn test_parser_parses_self_reference() {
        let model = parse("type resource\n  relations\n    define x: x").unwrap();
        assert_eq!(relation(&model, "resource", "x").rewrite, Userset::computed("x"));
    }

    // ========== Condition Tests ==========

    #[test]
    fn test_parser_parses_conditions() {
        let input = r#"
type user

type document
  relations
    define admin: [user with condition1]

condition condition1(x: int, region: string) {
  x < 100
}
"#;
        let result = parse(input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
        let model = result.unwrap();
        assert_eq!(model.conditions.len(), 1);
        let condition = &model.conditions[0];
        assert_eq!(condition.name, "condition1");
        assert_eq!(condition.expression, "x < 100");
        assert_eq!(
            condition.parameters,
            vec![
                ConditionParameter {
                    name: "x".to_string(),
                    type_name: "int".to_string()
                },
                ConditionParameter {
                    name: "region".to_string(),
                    type_name: "string".to_string()
                },
            ]
        );
    }

    // ========== Error Handling Tests ==========

    #[test]
    fn test_parser_rejects_invalid_syntax_with_clear_error() {
        let err = parse("invalid syntax here").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_parser_rejects_incomplete_type_definition() {
        assert!(parse("type").is_err());
    }

    #[test]
    fn test_parser_rejects_dangling_operator() {
        assert!(parse("type document\n  relations\n    define a: [user] or").is_err());
    }

    #[test]
    fn test_parser_error_converts_to_domain_error() {
        let err: DomainError = parse("type").unwrap_err().into();
        assert!(matches!(err, DomainError::ModelParseError { .. }));
    }

    // ========== Whitespace and Comment Tests ==========

    #[test]
    fn test_parser_handles_whitespace_and_comments() {
        let input = r#"

# This is a comment
type   user


type    document
  relations
    # Relation comment
    define    owner:   [user]   # trailing comment

"#;
        let result = parse(input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
        assert_eq!(result.unwrap().type_definitions.len(), 2);
    }

    #[test]
    fn test_parser_handles_tab_indentation() {
        let input = "model\n\tschema 1.1\ntype user\ntype document\n\trelations\n\t\tdefine owner: [user]\n";
        let result = parse(input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }
}

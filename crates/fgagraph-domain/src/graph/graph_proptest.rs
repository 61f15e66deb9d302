//! Property-based tests for graph building, cycle analysis and rendering.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use crate::graph::{build_graph, classify, render, CycleKind};
    use crate::model::{
        AuthorizationModel, RelationDefinition, TypeConstraint, TypeDefinition, Userset,
    };

    const TYPES: [&str; 3] = ["doc", "folder", "user"];
    const RELATIONS: [&str; 2] = ["parent", "viewer"];

    fn type_name_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(TYPES.to_vec()).prop_map(str::to_string)
    }

    fn relation_name_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(RELATIONS.to_vec()).prop_map(str::to_string)
    }

    /// Strategy to generate `user`, `user:*` and `group#member` restrictions,
    /// optionally conditioned.
    fn type_constraint_strategy() -> impl Strategy<Value = TypeConstraint> {
        let base = prop_oneof![
            type_name_strategy().prop_map(|t| TypeConstraint::direct(t)),
            type_name_strategy().prop_map(|t| TypeConstraint::wildcard(t)),
            (type_name_strategy(), relation_name_strategy())
                .prop_map(|(t, r)| TypeConstraint::userset(t, r)),
        ];
        (base, prop::option::of(Just("is_open".to_string()))).prop_map(|(constraint, condition)| {
            match condition {
                Some(condition) => constraint.with_condition(condition),
                None => constraint,
            }
        })
    }

    fn userset_strategy() -> impl Strategy<Value = Userset> {
        let leaf = prop_oneof![
            Just(Userset::This),
            relation_name_strategy().prop_map(|r| Userset::computed(r)),
            (relation_name_strategy(), relation_name_strategy())
                .prop_map(|(tupleset, computed)| Userset::tuple_to_userset(tupleset, computed)),
        ];
        leaf.prop_recursive(3, 12, 3, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..4)
                    .prop_map(|children| Userset::Union { children }),
                prop::collection::vec(inner.clone(), 1..4)
                    .prop_map(|children| Userset::Intersection { children }),
                (inner.clone(), inner).prop_map(|(base, subtract)| Userset::Exclusion {
                    base: Box::new(base),
                    subtract: Box::new(subtract),
                }),
            ]
        })
    }

    /// Every type defines every relation, so all references resolve.
    fn model_strategy() -> impl Strategy<Value = AuthorizationModel> {
        let relation = (
            prop::collection::vec(type_constraint_strategy(), 0..3),
            userset_strategy(),
        );
        prop::collection::vec(relation, TYPES.len() * RELATIONS.len()).prop_map(|relations| {
            let mut relations = relations.into_iter();
            let type_definitions = TYPES
                .iter()
                .map(|type_name| {
                    let defs = RELATIONS
                        .iter()
                        .zip(relations.by_ref())
                        .map(|(name, (constraints, rewrite))| {
                            RelationDefinition::new(*name, constraints, rewrite)
                        })
                        .collect();
                    TypeDefinition::new(*type_name, defs)
                })
                .collect();
            AuthorizationModel::with_types("1.1", type_definitions)
        })
    }

    proptest! {
        #[test]
        fn test_sequences_are_contiguous(model in model_strategy()) {
            let graph = build_graph(&model).unwrap();
            let sequences: Vec<u32> = graph.edges().iter().map(|e| e.sequence).collect();
            let expected: Vec<u32> = (1..=graph.edge_count() as u32).collect();
            prop_assert_eq!(sequences, expected);
        }

        #[test]
        fn test_build_is_deterministic(model in model_strategy()) {
            let first = build_graph(&model).unwrap();
            let second = build_graph(&model).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(render(&first).unwrap(), render(&second).unwrap());
        }

        #[test]
        fn test_declaration_order_does_not_matter(model in model_strategy()) {
            let mut reversed = model.clone();
            reversed.type_definitions.reverse();
            for type_def in &mut reversed.type_definitions {
                type_def.relations.reverse();
            }

            let graph = build_graph(&model).unwrap();
            let reversed_graph = build_graph(&reversed).unwrap();
            prop_assert_eq!(render(&graph).unwrap(), render(&reversed_graph).unwrap());
        }

        #[test]
        fn test_node_set_covers_types_and_relations(model in model_strategy()) {
            let graph = build_graph(&model).unwrap();
            let mut plain = HashSet::new();
            for type_name in TYPES {
                plain.insert(type_name.to_string());
                plain.insert(format!("{}:*", type_name));
                for relation in RELATIONS {
                    plain.insert(format!("{}#{}", type_name, relation));
                }
            }

            let labels: HashSet<String> = graph.nodes().iter().map(|n| n.label.clone()).collect();
            prop_assert!(plain.is_subset(&labels));
            for label in labels.difference(&plain) {
                prop_assert!(
                    label.starts_with(' ') && label.contains("[with is_open]"),
                    "unexpected node {:?}",
                    label
                );
            }
        }

        #[test]
        fn test_pruned_nodes_all_have_edges(model in model_strategy()) {
            let graph = build_graph(&model).unwrap();
            let pruned = graph.pruned();
            let incident: HashSet<_> = pruned.edges().iter().flat_map(|e| [e.from, e.to]).collect();

            prop_assert_eq!(pruned.edges(), graph.edges());
            for node in pruned.nodes() {
                prop_assert!(incident.contains(&node.id));
                prop_assert_eq!(graph.label(node.id), Some(node.label.as_str()));
            }
            prop_assert_eq!(pruned.node_count(), incident.len());
        }

        #[test]
        fn test_cycle_counts_are_consistent(model in model_strategy()) {
            let graph = build_graph(&model).unwrap();
            let report = classify(&graph);

            prop_assert_eq!(
                report.definitive_cycle_count + report.possible_cycle_count,
                report.total_cycles
            );
            prop_assert_eq!(report.cycles.len(), report.total_cycles);
            prop_assert_eq!(report.has_cycles(), report.total_cycles > 0);
        }

        #[test]
        fn test_cycles_follow_edges(model in model_strategy()) {
            let graph = build_graph(&model).unwrap();
            let report = classify(&graph);

            for cycle in &report.cycles {
                let unique: HashSet<_> = cycle.nodes.iter().collect();
                prop_assert_eq!(unique.len(), cycle.nodes.len());

                let mut all_computed = true;
                for i in 0..cycle.nodes.len() {
                    let (u, v) = (cycle.nodes[i], cycle.nodes[(i + 1) % cycle.nodes.len()]);
                    let steps: Vec<_> = graph
                        .edges()
                        .iter()
                        .filter(|e| e.from == u && e.to == v)
                        .collect();
                    prop_assert!(!steps.is_empty());
                    all_computed &= graph.is_computed_step(u, v);
                    if steps.iter().any(|e| e.computed) {
                        prop_assert!(graph.is_computed_step(u, v));
                    }
                }
                prop_assert_eq!(cycle.kind == CycleKind::Definitive, all_computed);
            }
        }
    }
}

//! Elementary cycle enumeration and classification.
//!
//! Cycles are enumerated with Johnson's algorithm over the successor
//! relation of the graph, with parallel edges collapsed into a single step.
//! A step `u -> v` is computed when at least one edge from `u` to `v` is
//! computed. A cycle made only of computed steps can never be satisfied and
//! is reported as [`CycleKind::Definitive`]; any other cycle is
//! [`CycleKind::Possible`].
//!
//! The number of elementary cycles can grow exponentially with the size of a
//! strongly connected component. Enumeration is exhaustive and not truncated.
//! The circuit search recurses once per vertex on the current path, so stack
//! depth is bounded by the length of the longest elementary cycle.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::info;

use super::{Graph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    /// Every step is computed.
    Definitive,
    /// At least one step is a direct or tupleset assignment.
    Possible,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleKind::Definitive => write!(f, "definitive"),
            CycleKind::Possible => write!(f, "possible"),
        }
    }
}

/// An elementary cycle. A self-loop is a cycle of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub kind: CycleKind,
    pub nodes: Vec<NodeId>,
    pub labels: Vec<String>,
}

impl Cycle {
    /// Renders the cycle as `a -> b -> a`.
    pub fn path(&self) -> String {
        let mut labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        if let Some(first) = labels.first().copied() {
            labels.push(first);
        }
        labels.join(" -> ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub total_cycles: usize,
    pub definitive_cycle_count: usize,
    pub possible_cycle_count: usize,
    pub cycles: Vec<Cycle>,
}

impl CycleReport {
    pub fn has_cycles(&self) -> bool {
        self.total_cycles > 0
    }

    pub fn definitive_cycles(&self) -> impl Iterator<Item = &Cycle> {
        self.cycles
            .iter()
            .filter(|c| c.kind == CycleKind::Definitive)
    }
}

/// Enumerates and classifies every elementary cycle of `graph`.
pub fn classify(graph: &Graph) -> CycleReport {
    let successors = Successors::from_graph(graph);
    let mut report = CycleReport::default();

    for cycle in successors.elementary_cycles() {
        let kind = if successors.all_steps_computed(&cycle) {
            report.definitive_cycle_count += 1;
            CycleKind::Definitive
        } else {
            report.possible_cycle_count += 1;
            CycleKind::Possible
        };

        let nodes: Vec<NodeId> = cycle.iter().map(|&i| successors.ids[i]).collect();
        let labels = nodes
            .iter()
            .map(|&id| graph.label(id).unwrap_or_default().to_string())
            .collect();
        report.cycles.push(Cycle {
            kind,
            nodes,
            labels,
        });
    }
    report.total_cycles = report.cycles.len();

    info!(
        total_cycles = report.total_cycles,
        definitive = report.definitive_cycle_count,
        possible = report.possible_cycle_count,
        "classified cycles"
    );
    report
}

/// Collapsed successor lists over dense vertex indices.
struct Successors {
    ids: Vec<NodeId>,
    adjacency: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    computed: HashMap<(usize, usize), bool>,
}

impl Successors {
    fn from_graph(graph: &Graph) -> Self {
        let ids: Vec<NodeId> = graph.nodes().iter().map(|n| n.id).collect();
        let index: HashMap<NodeId, usize> =
            ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut adjacency = vec![Vec::new(); ids.len()];
        let mut computed: HashMap<(usize, usize), bool> = HashMap::new();
        for edge in graph.edges() {
            let (Some(&u), Some(&v)) = (index.get(&edge.from), index.get(&edge.to)) else {
                continue;
            };
            computed.entry((u, v)).or_insert_with(|| {
                adjacency[u].push(v);
                graph.is_computed_step(edge.from, edge.to)
            });
        }
        for successors in &mut adjacency {
            successors.sort_unstable();
        }

        let mut predecessors = vec![Vec::new(); ids.len()];
        for (u, successors) in adjacency.iter().enumerate() {
            for &v in successors {
                predecessors[v].push(u);
            }
        }

        Self {
            ids,
            adjacency,
            predecessors,
            computed,
        }
    }

    fn all_steps_computed(&self, cycle: &[usize]) -> bool {
        (0..cycle.len()).all(|i| {
            let step = (cycle[i], cycle[(i + 1) % cycle.len()]);
            self.computed.get(&step).copied().unwrap_or(false)
        })
    }

    /// Johnson's algorithm. Each cycle starts at its least vertex.
    fn elementary_cycles(&self) -> Vec<Vec<usize>> {
        let n = self.adjacency.len();
        let mut search = CircuitSearch {
            adjacency: &self.adjacency,
            start: 0,
            in_component: vec![false; n],
            blocked: vec![false; n],
            blocked_by: vec![Vec::new(); n],
            stack: Vec::new(),
            cycles: Vec::new(),
        };

        for start in 0..n {
            let component = self.component_of(start);
            if !self.adjacency[start].iter().any(|w| component.contains(w)) {
                continue;
            }

            search.start = start;
            for v in 0..n {
                search.in_component[v] = component.contains(&v);
                search.blocked[v] = false;
                search.blocked_by[v].clear();
            }
            search.circuit(start);
        }

        search.cycles
    }

    /// Strongly connected component of `start` in the subgraph of vertices
    /// `>= start`.
    fn component_of(&self, start: usize) -> HashSet<usize> {
        let forward = reachable(&self.adjacency, start);
        let backward = reachable(&self.predecessors, start);
        forward.intersection(&backward).copied().collect()
    }
}

fn reachable(neighbours: &[Vec<usize>], start: usize) -> HashSet<usize> {
    let mut seen = HashSet::from([start]);
    let mut pending = vec![start];
    while let Some(v) = pending.pop() {
        for &w in &neighbours[v] {
            if w >= start && seen.insert(w) {
                pending.push(w);
            }
        }
    }
    seen
}

struct CircuitSearch<'a> {
    adjacency: &'a [Vec<usize>],
    start: usize,
    in_component: Vec<bool>,
    blocked: Vec<bool>,
    blocked_by: Vec<Vec<usize>>,
    stack: Vec<usize>,
    cycles: Vec<Vec<usize>>,
}

impl CircuitSearch<'_> {
    fn circuit(&mut self, v: usize) -> bool {
        let mut found = false;
        self.stack.push(v);
        self.blocked[v] = true;

        let next: Vec<usize> = self.adjacency[v]
            .iter()
            .copied()
            .filter(|&w| self.in_component[w])
            .collect();
        for &w in &next {
            if w == self.start {
                self.cycles.push(self.stack.clone());
                found = true;
            } else if !self.blocked[w] && self.circuit(w) {
                found = true;
            }
        }

        if found {
            self.unblock(v);
        } else {
            for &w in &next {
                if !self.blocked_by[w].contains(&v) {
                    self.blocked_by[w].push(v);
                }
            }
        }

        self.stack.pop();
        found
    }

    fn unblock(&mut self, u: usize) {
        let mut pending = vec![u];
        while let Some(v) = pending.pop() {
            self.blocked[v] = false;
            while let Some(w) = self.blocked_by[v].pop() {
                if self.blocked[w] {
                    pending.push(w);
                }
            }
        }
    }
}

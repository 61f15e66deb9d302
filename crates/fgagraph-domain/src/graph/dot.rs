//! Graphviz DOT serialization.

use std::fmt::Write;

use crate::error::DomainResult;

use super::Graph;

/// Renders `graph` as a DOT digraph laid out bottom-to-top.
///
/// Nodes are written in ascending id order and edges in sequence order.
/// `headlabel` is only written for edges that carry a tupleset context and
/// `style="dashed"` only for computed edges.
pub fn render(graph: &Graph) -> DomainResult<String> {
    let mut out = String::new();
    writeln!(out, "digraph {{")?;
    writeln!(out, "graph [rankdir=BT];")?;
    writeln!(out)?;

    writeln!(out, "// Node definitions.")?;
    for node in graph.nodes() {
        writeln!(out, "{} [label={}];", node.id, quote(&node.label))?;
    }
    writeln!(out)?;

    writeln!(out, "// Edge definitions.")?;
    for edge in graph.edges() {
        write!(out, "{} -> {} [label={}", edge.from, edge.to, edge.sequence)?;
        if let Some(context) = &edge.context {
            write!(out, " headlabel={}", quote_always(context))?;
        }
        if edge.computed {
            write!(out, " style=\"dashed\"")?;
        }
        writeln!(out, "];")?;
    }
    write!(out, "}}")?;

    Ok(out)
}

const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Quotes `value` unless it is a plain DOT identifier or numeral.
fn quote(value: &str) -> String {
    if is_identifier(value) || is_numeral(value) {
        value.to_string()
    } else {
        quote_always(value)
    }
}

fn quote_always(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(value))
}

fn is_numeral(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

    match fraction {
        None => !whole.is_empty() && all_digits(whole),
        Some(fraction) => {
            !(whole.is_empty() && fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
        }
    }
}

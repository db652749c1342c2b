//! Terminal output utilities.
//!
//! Field formatting plus listings of the resource graph and the state.

use crate::apply::State;
use crate::graph::ResourceGraph;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    if quoted.len() >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// One line per resource: kind, name and what it waits for.
pub fn graph_lines(graph: &ResourceGraph) -> Vec<String> {
    graph
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let deps = r.dependencies();
            if deps.is_empty() {
                format!("{:3} {:<24} {}", i + 1, r.kind.to_string(), r.name)
            } else {
                format!(
                    "{:3} {:<24} {} <- {}",
                    i + 1,
                    r.kind.to_string(),
                    r.name,
                    deps.join(", ")
                )
            }
        })
        .collect()
}

/// Print the resource graph to stdout.
pub fn graph_print(graph: &ResourceGraph) {
    println!("RESOURCES: {} declared", graph.len());
    for line in graph_lines(graph) {
        println!("{line}");
    }
}

/// Print created resources and their ids to stdout.
pub fn state_print(state: &State) {
    println!(
        "STATE: {} resources, updated {}",
        state.len(),
        state.updated.as_deref().unwrap_or("never")
    );
    for (name, resource) in &state.resources {
        println!(
            "  {name} ({kind}) => {id}",
            kind = resource.kind,
            id = resource
                .outputs
                .get("id")
                .map(|id| id.green().to_string())
                .unwrap_or_else(|| "no id".red().to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Resource, ResourceKind, Value};

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "    \"test\"");
    }

    #[test]
    fn test_format_field_exact() {
        assert_eq!(format_field("test", 6), "\"test\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("long_value", 5), "\"long_value\"");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(42, 6), "  \"42\"");
    }

    #[test]
    fn test_graph_lines() {
        let mut graph = ResourceGraph::new();
        graph.add(Resource::new("vpc", ResourceKind::Vpc)).unwrap();
        graph
            .add(
                Resource::new("igw", ResourceKind::InternetGateway)
                    .with_attribute("vpc_id", Value::id_of("vpc")),
            )
            .unwrap();
        let lines = graph_lines(&graph);
        assert_eq!(lines[0], "  1 vpc                      vpc");
        assert_eq!(lines[1], "  2 internet_gateway         igw <- vpc");
    }
}

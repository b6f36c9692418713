//! Concept relationship graph
//!
//! Assembles an undirected graph over the requested concept ids using a
//! fixed table of known pairwise relationships.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// Known relationships, in emission priority order
pub const RELATIONSHIPS: &[(&str, &str, &str)] = &[
    ("photosynthesis", "diffusion", "requires"),
    ("torque", "angular_momentum", "related_to"),
    ("pressure", "volume", "inverse_relationship"),
    ("force", "acceleration", "proportional_to"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relationship: String,
}

/// Serializable graph returned to clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// `angular_momentum` → `Angular Momentum`
///
/// Every run of letters starts upper-case and continues lower-case, so
/// `newton's_laws` becomes `Newton'S Laws`.
pub fn display_label(id: &str) -> String {
    let mut label = String::with_capacity(id.len());
    let mut in_word = false;
    for c in id.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if in_word {
                label.extend(c.to_lowercase());
            } else {
                label.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            label.push(c);
            in_word = false;
        }
    }
    label
}

/// Build the relationship graph for `concepts`
///
/// Duplicate names collapse to one node. Edges are listed node by node in
/// insertion order; each edge appears once, with the earlier node as source.
pub fn build_graph<S: AsRef<str>>(concepts: &[S]) -> ConceptGraph {
    let mut graph: UnGraph<String, &'static str> = UnGraph::new_undirected();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();

    for concept in concepts {
        let name = concept.as_ref();
        if !index.contains_key(name) {
            index.insert(name, graph.add_node(name.to_string()));
        }
    }

    for (a, b, relationship) in RELATIONSHIPS {
        if let (Some(&ia), Some(&ib)) = (index.get(a), index.get(b)) {
            if graph.find_edge(ia, ib).is_none() {
                graph.add_edge(ia, ib, *relationship);
            }
        }
    }

    let nodes = graph
        .node_indices()
        .map(|n| GraphNode {
            id: graph[n].clone(),
            label: display_label(&graph[n]),
        })
        .collect();

    let mut emitted = vec![false; graph.edge_count()];
    let mut edges = Vec::with_capacity(graph.edge_count());
    for n in graph.node_indices() {
        let mut incident: Vec<_> = graph.edges(n).collect();
        incident.sort_by_key(|e| e.id());
        for edge in incident {
            if std::mem::replace(&mut emitted[edge.id().index()], true) {
                continue;
            }
            let other = if edge.source() == n { edge.target() } else { edge.source() };
            edges.push(GraphEdge {
                source: graph[n].clone(),
                target: graph[other].clone(),
                relationship: edge.weight().to_string(),
            });
        }
    }

    ConceptGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("angular_momentum"), "Angular Momentum");
        assert_eq!(display_label("torque"), "Torque");
        assert_eq!(display_label("ALL_CAPS"), "All Caps");
        assert_eq!(display_label("newton's_laws"), "Newton'S Laws");
        assert_eq!(display_label("structure_&_form"), "Structure & Form");
    }

    #[test]
    fn test_nodes_preserve_order_and_dedupe() {
        let graph = build_graph(&["torque", "friction", "torque"]);

        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["torque", "friction"]);
        assert_eq!(graph.nodes[0].label, "Torque");
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_edges_require_both_endpoints() {
        let graph = build_graph(&["photosynthesis", "torque", "osmosis"]);
        assert!(graph.edges.is_empty());

        let graph = build_graph(&["photosynthesis", "diffusion"]);
        assert_eq!(
            graph.edges,
            [GraphEdge {
                source: "photosynthesis".to_string(),
                target: "diffusion".to_string(),
                relationship: "requires".to_string(),
            }]
        );
    }

    #[test]
    fn test_source_is_first_inserted_endpoint() {
        let graph = build_graph(&["angular_momentum", "friction", "torque"]);

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "angular_momentum");
        assert_eq!(graph.edges[0].target, "torque");
        assert_eq!(graph.edges[0].relationship, "related_to");
    }

    #[test]
    fn test_edge_order_follows_nodes() {
        let graph = build_graph(&["acceleration", "volume", "force", "pressure"]);

        let pairs: Vec<_> = graph
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str(), e.relationship.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("acceleration", "force", "proportional_to"),
                ("volume", "pressure", "inverse_relationship"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(build_graph(&empty), ConceptGraph::default());
    }
}

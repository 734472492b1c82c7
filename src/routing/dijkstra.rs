//! Single-source shortest paths by edge length

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::queue::MinQueue;
use crate::model::RoadGraph;

/// Dijkstra's algorithm over edge lengths, returning the shortest path
/// from `source` to every reachable node as an ordered node sequence.
///
/// Deterministic tie-breaking: an equal-length alternative never replaces
/// an already-recorded predecessor (strict `<` relaxation), and queue ties
/// pop in insertion order.
pub(crate) fn shortest_paths(
    graph: &RoadGraph,
    source: NodeIndex,
) -> HashMap<NodeIndex, Vec<NodeIndex>> {
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> =
        HashMap::with_capacity(estimated_nodes);
    let mut queue = MinQueue::new();

    distances.insert(source, 0.0);
    queue.push((source, 0.0), 0.0);

    while let Some((node, cost)) = queue.pop() {
        // Skip stale queue entries for which a better path is known.
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        // Parallel edges are all visited; the strict comparison keeps the
        // shortest one.
        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let next_cost = cost + edge.weight().length;
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next, node);
                    queue.push((next, next_cost), next_cost);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next, node);
                        queue.push((next, next_cost), next_cost);
                    }
                }
            }
        }
    }

    let mut paths = HashMap::with_capacity(distances.len());
    for &target in distances.keys() {
        let mut path = Vec::new();
        let mut current = target;
        path.push(current);
        while current != source {
            match predecessors.get(&current) {
                Some(&previous) => {
                    path.push(previous);
                    current = previous;
                }
                None => break,
            }
        }
        path.reverse();
        paths.insert(target, path);
    }

    paths
}

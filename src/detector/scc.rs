//! Tarjan's strongly connected components
//!
//! Iterative formulation so that long transfer chains cannot overflow the
//! call stack. Self-transfers never link an account to itself here because
//! the adjacency comes from [`TransactionGraph::successors`].

use petgraph::graph::NodeIndex;

use crate::graph::TransactionGraph;

/// Decompose the graph into strongly connected components
///
/// Members of each component are sorted by account id. Components come out
/// in the order Tarjan's algorithm completes them (reverse topological order
/// of the condensation), which is deterministic for a given graph.
pub fn strongly_connected_components(graph: &TransactionGraph) -> Vec<Vec<NodeIndex>> {
    let node_count = graph.account_count();
    let adjacency: Vec<Vec<NodeIndex>> = graph
        .graph()
        .node_indices()
        .map(|idx| graph.successors(idx))
        .collect();

    let mut index: Vec<Option<usize>> = vec![None; node_count];
    let mut lowlink: Vec<usize> = vec![0; node_count];
    let mut on_stack: Vec<bool> = vec![false; node_count];
    let mut stack: Vec<NodeIndex> = Vec::new();
    let mut next_index = 0;
    let mut components = Vec::new();

    for root in graph.graph().node_indices() {
        if index[root.index()].is_some() {
            continue;
        }

        // Each frame is a node plus the position of the next successor to try
        let mut call_stack: Vec<(NodeIndex, usize)> = vec![(root, 0)];
        index[root.index()] = Some(next_index);
        lowlink[root.index()] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root.index()] = true;

        while let Some(frame) = call_stack.last_mut() {
            let v = frame.0;
            let successors = &adjacency[v.index()];

            if frame.1 < successors.len() {
                let w = successors[frame.1];
                frame.1 += 1;

                match index[w.index()] {
                    None => {
                        index[w.index()] = Some(next_index);
                        lowlink[w.index()] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w.index()] = true;
                        call_stack.push((w, 0));
                    }
                    Some(w_index) if on_stack[w.index()] => {
                        lowlink[v.index()] = lowlink[v.index()].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            call_stack.pop();
            if let Some(&(parent, _)) = call_stack.last() {
                lowlink[parent.index()] = lowlink[parent.index()].min(lowlink[v.index()]);
            }

            if Some(lowlink[v.index()]) == index[v.index()] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w.index()] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                component.sort_by(|a, b| graph.account(*a).id.cmp(&graph.account(*b).id));
                components.push(component);
            }
        }
    }

    components
}

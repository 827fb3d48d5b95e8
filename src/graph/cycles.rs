use crate::graph::{Cycle, DependencyGraph};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    /// On the current DFS path, at this depth
    OnStack(usize),
    Done,
}

/// Find cycles with a depth-first walk over `graph`.
///
/// Reaching a node that is still on the current path records the path from
/// that node to the end as a cycle. Every node is expanded once, so the walk
/// is O(V + E); a cycle only reachable through an already finished node is
/// not reported a second time. A self-reference is a one-node cycle.
///
/// The walk keeps an explicit stack, so deep graphs cannot overflow the
/// thread's call stack.
pub fn find_cycles(graph: &DependencyGraph) -> BTreeSet<Cycle> {
    let mut state: FxHashMap<&str, VisitState> = FxHashMap::default();
    let mut cycles = BTreeSet::new();

    for start in graph.nodes() {
        if state.contains_key(start.as_str()) {
            continue;
        }

        let mut path: Vec<&str> = vec![start.as_str()];
        let mut frames = vec![graph.neighbors(start)];
        state.insert(start.as_str(), VisitState::OnStack(0));

        loop {
            let next = match frames.last_mut() {
                Some(frame) => frame.next(),
                None => break,
            };

            match next {
                Some(neighbor) => match state.get(neighbor.as_str()).copied() {
                    None => {
                        state.insert(neighbor.as_str(), VisitState::OnStack(path.len()));
                        path.push(neighbor.as_str());
                        frames.push(graph.neighbors(neighbor));
                    }
                    Some(VisitState::OnStack(depth)) => {
                        cycles.insert(path[depth..].iter().map(|p| p.to_string()).collect());
                    }
                    Some(VisitState::Done) => {}
                },
                None => {
                    frames.pop();
                    if let Some(node) = path.pop() {
                        state.insert(node, VisitState::Done);
                    }
                }
            }
        }
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    fn cycle(nodes: &[&str]) -> Cycle {
        nodes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_triangle() {
        let cycles = find_cycles(&graph(&[("A", "B"), ("B", "C"), ("C", "A")]));
        assert_eq!(cycles.len(), 1);
        assert!(cycles.contains(&cycle(&["A", "B", "C"])));
    }

    #[test]
    fn test_chain_has_no_cycle() {
        assert!(find_cycles(&graph(&[("A", "B"), ("B", "C")])).is_empty());
    }

    #[test]
    fn test_self_reference() {
        let cycles = find_cycles(&graph(&[("A", "A")]));
        assert_eq!(cycles.into_iter().collect::<Vec<_>>(), vec![cycle(&["A"])]);
    }

    #[test]
    fn test_cycle_not_starting_at_root() {
        // A -> B -> C -> B: the cycle is the tail of the path
        let cycles = find_cycles(&graph(&[("A", "B"), ("B", "C"), ("C", "B")]));
        assert_eq!(cycles.into_iter().collect::<Vec<_>>(), vec![cycle(&["B", "C"])]);
    }

    #[test]
    fn test_two_disjoint_cycles() {
        let cycles = find_cycles(&graph(&[("A", "B"), ("B", "A"), ("X", "Y"), ("Y", "X")]));
        assert_eq!(cycles.len(), 2);
        assert!(cycles.contains(&cycle(&["A", "B"])));
        assert!(cycles.contains(&cycle(&["X", "Y"])));
    }

    #[test]
    fn test_diamond_has_no_cycle() {
        let cycles = find_cycles(&graph(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]));
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let names: Vec<String> = (0..100_000).map(|i| format!("N{i:06}")).collect();
        let mut g = DependencyGraph::new();
        for pair in names.windows(2) {
            g.add_edge(&pair[0], &pair[1]);
        }
        g.add_edge(&names[names.len() - 1], &names[0]);

        let cycles = find_cycles(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles.iter().next().map(Vec::len), Some(names.len()));
    }
}

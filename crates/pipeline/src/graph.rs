//! Stage dependency graph built on `petgraph`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

/// Directed graph over stage positions, edges pointing from predecessor to
/// successor.
///
/// Node weights are declaration positions (the input is position 0), which
/// double as tie-breakers when ordering.
#[derive(Debug, Clone, Default)]
pub struct StageGraph {
    graph: DiGraph<usize, ()>,
}

impl StageGraph {
    /// A graph with `count` stages and no edges.
    #[must_use]
    pub fn with_stages(count: usize) -> Self {
        let mut graph = DiGraph::with_capacity(count, count);
        for position in 0..count {
            graph.add_node(position);
        }
        Self { graph }
    }

    /// Add the edge `from -> to`. Both positions must exist.
    pub fn connect(&mut self, from: usize, to: usize) {
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
    }

    /// Topological order, preferring the earliest declared stage whenever
    /// several are ready. Returns `None` if the graph has a cycle.
    #[must_use]
    pub fn ordered(&self) -> Option<Vec<usize>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(position, _)| Reverse(position))
            .collect();

        let mut order = Vec::with_capacity(in_degree.len());
        while let Some(Reverse(position)) = ready.pop() {
            order.push(position);
            for next in self
                .graph
                .neighbors_directed(NodeIndex::new(position), Direction::Outgoing)
            {
                let degree = &mut in_degree[next.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(next.index()));
                }
            }
        }

        (order.len() == self.graph.node_count()).then_some(order)
    }

    /// Kahn levels: every stage of a level has all its predecessors in
    /// earlier levels. Positions within a level are ascending. Returns `None`
    /// if the graph has a cycle.
    #[must_use]
    pub fn levels(&self) -> Option<Vec<Vec<usize>>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
            .collect();

        let mut current: Vec<usize> = (0..in_degree.len())
            .filter(|&position| in_degree[position] == 0)
            .collect();
        let mut levels = Vec::new();
        let mut seen = 0;

        while !current.is_empty() {
            seen += current.len();
            let mut next_level = Vec::new();
            for &position in &current {
                for next in self
                    .graph
                    .neighbors_directed(NodeIndex::new(position), Direction::Outgoing)
                {
                    let degree = &mut in_degree[next.index()];
                    *degree -= 1;
                    if *degree == 0 {
                        next_level.push(next.index());
                    }
                }
            }
            next_level.sort_unstable();
            levels.push(std::mem::replace(&mut current, next_level));
        }

        (seen == self.graph.node_count()).then_some(levels)
    }

    /// Positions of the direct predecessors of `position`, ascending.
    #[must_use]
    pub fn predecessors(&self, position: usize) -> Vec<usize> {
        self.neighbors(position, Direction::Incoming)
    }

    /// Positions of the direct successors of `position`, ascending.
    #[must_use]
    pub fn successors(&self, position: usize) -> Vec<usize> {
        self.neighbors(position, Direction::Outgoing)
    }

    fn neighbors(&self, position: usize, direction: Direction) -> Vec<usize> {
        if position >= self.graph.node_count() {
            return Vec::new();
        }
        let mut found: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(position), direction)
            .map(NodeIndex::index)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Number of stages.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of predecessor links.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// 0 -> 1 -> 3, 0 -> 2 -> 3 (diamond).
    fn diamond() -> StageGraph {
        let mut graph = StageGraph::with_stages(4);
        graph.connect(0, 1);
        graph.connect(0, 2);
        graph.connect(1, 3);
        graph.connect(2, 3);
        graph
    }

    #[test]
    fn order_breaks_ties_by_position() {
        assert_eq!(diamond().ordered(), Some(vec![0, 1, 2, 3]));

        let mut graph = StageGraph::with_stages(4);
        graph.connect(0, 3);
        graph.connect(3, 1);
        graph.connect(0, 2);
        assert_eq!(graph.ordered(), Some(vec![0, 2, 3, 1]));
    }

    #[test]
    fn levels_group_independent_stages() {
        assert_eq!(diamond().levels(), Some(vec![vec![0], vec![1, 2], vec![3]]));
    }

    #[test]
    fn cycle_has_no_order() {
        let mut graph = StageGraph::with_stages(3);
        graph.connect(0, 1);
        graph.connect(1, 2);
        graph.connect(2, 1);
        assert_eq!(graph.ordered(), None);
        assert_eq!(graph.levels(), None);
    }

    #[test]
    fn neighbours_are_sorted() {
        let graph = diamond();
        assert_eq!(graph.predecessors(3), vec![1, 2]);
        assert_eq!(graph.successors(0), vec![1, 2]);
        assert!(graph.successors(3).is_empty());
        assert!(graph.predecessors(9).is_empty());
        assert_eq!(graph.edge_count(), 4);
    }
}

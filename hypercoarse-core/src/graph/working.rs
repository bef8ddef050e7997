//! Indexed mutable copy of a [`Graph`] used by edge-consuming builders.
//!
//! Nodes are addressed by their position in ascending [`NodeId`] order, so
//! comparing indices is the same as comparing identifiers. A degree index
//! keyed on `(Reverse(degree), index)` answers "highest degree, lowest id"
//! without scanning.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet},
};

use crate::{graph::Graph, node::NodeId};

#[derive(Debug)]
pub(crate) struct WorkingGraph<'g> {
    ids: Vec<&'g NodeId>,
    adjacency: Vec<BTreeSet<usize>>,
    by_degree: BTreeSet<(Reverse<usize>, usize)>,
    edge_count: usize,
}

impl<'g> WorkingGraph<'g> {
    pub(crate) fn from_graph(graph: &'g Graph) -> Self {
        let ids: Vec<&'g NodeId> = graph.nodes().collect();
        let positions: BTreeMap<&NodeId, usize> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();
        let adjacency: Vec<BTreeSet<usize>> = ids
            .iter()
            .map(|id| {
                graph
                    .neighbors(id)
                    .into_iter()
                    .flatten()
                    .filter_map(|neighbour| positions.get(neighbour).copied())
                    .collect()
            })
            .collect();
        let by_degree = adjacency
            .iter()
            .enumerate()
            .map(|(index, set)| (Reverse(set.len()), index))
            .collect();
        Self {
            ids,
            adjacency,
            by_degree,
            edge_count: graph.edge_count(),
        }
    }

    pub(crate) fn id(&self, index: usize) -> &'g NodeId {
        self.ids[index]
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub(crate) fn neighbors(&self, index: usize) -> &BTreeSet<usize> {
        &self.adjacency[index]
    }

    /// Live node with the highest positive degree, lowest index on ties.
    pub(crate) fn highest_degree(&self) -> Option<usize> {
        self.by_degree
            .first()
            .filter(|(Reverse(degree), _)| *degree > 0)
            .map(|&(_, index)| index)
    }

    /// Removes every edge incident to `index` and drops the node from the
    /// degree index.
    pub(crate) fn remove_node(&mut self, index: usize) {
        let neighbours = std::mem::take(&mut self.adjacency[index]);
        self.by_degree.remove(&(Reverse(neighbours.len()), index));
        for neighbour in &neighbours {
            let before = self.adjacency[*neighbour].len();
            self.adjacency[*neighbour].remove(&index);
            self.reindex(*neighbour, before);
        }
        self.edge_count -= neighbours.len();
    }

    /// Removes the edge `{left, right}` if present.
    pub(crate) fn remove_edge(&mut self, left: usize, right: usize) -> bool {
        let left_before = self.adjacency[left].len();
        if !self.adjacency[left].remove(&right) {
            return false;
        }
        let right_before = self.adjacency[right].len();
        self.adjacency[right].remove(&left);
        self.reindex(left, left_before);
        self.reindex(right, right_before);
        self.edge_count -= 1;
        true
    }

    /// Drops the listed nodes from the degree index when they have no edges
    /// left.
    pub(crate) fn retire_isolated<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = usize>,
    {
        for index in candidates {
            if self.adjacency[index].is_empty() {
                self.by_degree.remove(&(Reverse(0), index));
            }
        }
    }

    fn reindex(&mut self, index: usize, before: usize) {
        if self.by_degree.remove(&(Reverse(before), index)) {
            self.by_degree
                .insert((Reverse(self.adjacency[index].len()), index));
        }
    }
}

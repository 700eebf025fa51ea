//! dag.rs
//! Wraps a petgraph `StableDiGraph` with the traversals the synchronizer needs.
//! Edges point upstream -> downstream (parent -> child, selection -> view).

use super::edge::Edge;
use super::node::{GraphNode, ViewId};
use crate::error::GraphError;
use crate::selection::SelectionId;
use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use smallvec::SmallVec;
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub(crate) graph: StableDiGraph<GraphNode, Edge>,
    selections: Vec<NodeIndex>,
    views: Vec<NodeIndex>,
    /// Declared read order per view; the graph's edge order is not stable.
    view_reads: Vec<SmallVec<[SelectionId; 2]>>,
    /// Topological rank of each selection; parents rank lower than children.
    rank: Vec<usize>,
}

impl DependencyGraph {
    pub fn new() -> Self { Self::default() }

    /// Registers selection `id` (ids must be added densely, in order).
    pub fn add_selection(&mut self, id: SelectionId, parent: Option<SelectionId>) -> NodeIndex {
        debug_assert_eq!(id.index(), self.selections.len());
        let idx = self.graph.add_node(GraphNode::Selection(id));
        self.selections.push(idx);
        if let Some(p) = parent {
            self.graph.add_edge(self.selections[p.index()], idx, Edge::Cascade);
        }
        idx
    }

    /// Registers view `id` reading every selection in `reads`.
    pub fn add_view(&mut self, id: ViewId, reads: &[SelectionId]) -> NodeIndex {
        debug_assert_eq!(id.index(), self.views.len());
        let idx = self.graph.add_node(GraphNode::View(id));
        self.views.push(idx);
        let mut declared: SmallVec<[SelectionId; 2]> = SmallVec::new();
        for &r in reads {
            if !declared.contains(&r) {
                declared.push(r);
                self.graph.add_edge(self.selections[r.index()], idx, Edge::Reads);
            }
        }
        self.view_reads.push(declared);
        idx
    }

    /// Verifies the graph is acyclic and fixes the cascade order.
    /// Returns the offending selection on a cycle.
    pub fn seal(&mut self) -> Result<(), SelectionId> {
        let order = toposort(&self.graph, None).map_err(|cycle| match self.graph[cycle.node_id()] {
            GraphNode::Selection(id) => id,
            // Views have no outgoing edges, so they never sit on a cycle.
            GraphNode::View(_) => SelectionId::default(),
        })?;

        self.rank = vec![0; self.selections.len()];
        let mut next = 0;
        for idx in order {
            if let GraphNode::Selection(id) = self.graph[idx] {
                self.rank[id.index()] = next;
                next += 1;
            }
        }
        Ok(())
    }

    /// Like `seal`, with the cycle reported by name.
    pub fn seal_named<'n>(&mut self, name_of: impl Fn(SelectionId) -> &'n str) -> Result<(), GraphError> {
        self.seal().map_err(|id| GraphError::CycleDetected(name_of(id).to_string()))
    }

    pub fn parent_of(&self, id: SelectionId) -> Option<SelectionId> {
        self.graph.edges_directed(self.selections[id.index()], Direction::Incoming)
            .find(|e| *e.weight() == Edge::Cascade)
            .and_then(|e| self.selection_at(e.source()))
    }

    /// Selections a view declares as dependencies, in declaration order.
    pub fn reads_of(&self, view: ViewId) -> &[SelectionId] {
        &self.view_reads[view.index()]
    }

    /// Every selection reachable from `start` over cascade edges, excluding
    /// `start`, ordered so each parent precedes its children.
    pub fn cascade_descendants(&self, start: SelectionId) -> Vec<SelectionId> {
        let mut found = Vec::new();
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([self.selections[start.index()]]);

        while let Some(node) = queue.pop_front() {
            for e in self.graph.edges_directed(node, Direction::Outgoing) {
                if *e.weight() != Edge::Cascade {
                    continue;
                }
                if let Some(child) = self.selection_at(e.target()) {
                    if seen.insert(child) {
                        found.push(child);
                        queue.push_back(e.target());
                    }
                }
            }
        }

        found.sort_by_key(|id| self.rank.get(id.index()).copied().unwrap_or(id.index()));
        found
    }

    /// Views with at least one direct read edge from any of `changed`.
    pub fn views_reading(&self, changed: &[SelectionId]) -> BTreeSet<ViewId> {
        changed.iter()
            .flat_map(|s| self.graph.edges_directed(self.selections[s.index()], Direction::Outgoing))
            .filter(|e| *e.weight() == Edge::Reads)
            .filter_map(|e| match self.graph[e.target()] {
                GraphNode::View(v) => Some(v),
                GraphNode::Selection(_) => None,
            })
            .collect()
    }

    fn selection_at(&self, idx: NodeIndex) -> Option<SelectionId> {
        match self.graph.node_weight(idx)? {
            GraphNode::Selection(id) => Some(*id),
            GraphNode::View(_) => None,
        }
    }
}

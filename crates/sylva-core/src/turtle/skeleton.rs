//! Skeleton produced by turtle interpretation
//!
//! Nodes live in an arena indexed by their dense id; segments and parents
//! refer to nodes by id only.

use glam::{DQuat, DVec3};

/// A point in the branch graph
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonNode {
    pub id: usize,
    pub position: DVec3,
    pub orientation: DQuat,
    pub radius: f64,
    /// `None` only for the root
    pub parent_id: Option<usize>,
    /// Bracket nesting level when the node was created
    pub depth: usize,
    /// No segment starts here
    pub is_terminal: bool,
    /// More than one segment starts here
    pub is_branch_point: bool,
}

/// An edge between two nodes, with its geometry cached at creation time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonSegment {
    pub start: usize,
    pub end: usize,
    pub length: f64,
    pub start_radius: f64,
    pub end_radius: f64,
}

/// A leaf placement, not connected to the node graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafPoint {
    pub position: DVec3,
    pub orientation: DQuat,
    pub size: f64,
}

/// Nodes, segments and leaves of one interpreted sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    pub nodes: Vec<SkeletonNode>,
    pub segments: Vec<SkeletonSegment>,
    pub leaves: Vec<LeafPoint>,
}

impl Skeleton {
    /// Look up a node by id
    pub fn node(&self, id: usize) -> Option<&SkeletonNode> {
        self.nodes.get(id)
    }

    /// The root node, if any node exists
    pub fn root(&self) -> Option<&SkeletonNode> {
        self.nodes.first()
    }

    /// Ids of nodes reached by a segment starting at `id`
    pub fn children(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.segments
            .iter()
            .filter(move |s| s.start == id)
            .map(|s| s.end)
    }

    /// Deepest nesting level among all nodes
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    pub fn terminal_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_terminal).count()
    }

    pub fn branch_point_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_branch_point).count()
    }

    /// Recompute terminal and branch-point flags from the segment list
    pub(crate) fn annotate(&mut self) {
        let mut outgoing = vec![0usize; self.nodes.len()];
        for segment in &self.segments {
            if let Some(count) = outgoing.get_mut(segment.start) {
                *count += 1;
            }
        }
        for (node, count) in self.nodes.iter_mut().zip(outgoing) {
            node.is_terminal = count == 0;
            node.is_branch_point = count > 1;
        }
    }
}

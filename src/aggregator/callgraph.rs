//! Call graph construction from parsed call paths.
//!
//! The graph owns the function identity table (stable 1-based ids assigned
//! in first-seen order) and the accumulated per-edge call counts.

use crate::parser::{CallPath, Frame};
use log::debug;
use std::collections::HashMap;

/// Identifier assigned to a unique (function, library) pair
pub type FunctionId = u32;

/// A directed caller -> callee adjacency between two function ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Id of the calling function
    pub caller: FunctionId,

    /// Id of the called function
    pub callee: FunctionId,
}

/// The full call graph collected from one trace file.
///
/// The graph is write-only while call paths are appended and read-only once
/// serialization starts. One instance is built and drained per input file.
///
/// **Public** - main aggregation entry point
#[derive(Debug, Default)]
pub struct CallGraph {
    /// Frame -> id lookup
    funcs: HashMap<Frame, FunctionId>,

    /// id -> Frame, in id order (id 1 at index 0)
    index: Vec<Frame>,

    /// Accumulated call counts per caller -> callee adjacency
    edges: HashMap<Edge, u64>,
}

impl CallGraph {
    /// Initialize an empty graph
    ///
    /// **Public** - constructor
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame as the observation of some function in some
    /// library. Each function is given a unique id, assigned in first-seen
    /// order starting at 1; ids are never reassigned or reused.
    ///
    /// Returns the id of the function that was recorded.
    pub fn record_function(&mut self, frame: &Frame) -> FunctionId {
        if let Some(&id) = self.funcs.get(frame) {
            return id;
        }

        let id = self.index.len() as FunctionId + 1;
        self.funcs.insert(frame.clone(), id);
        self.index.push(frame.clone());
        id
    }

    /// Return the id previously assigned to the given frame.
    ///
    /// A `None` here means the caller broke the aggregation contract; every
    /// frame reaching serialization went through [`Self::record_function`].
    pub fn function_id(&self, frame: &Frame) -> Option<FunctionId> {
        self.funcs.get(frame).copied()
    }

    /// Fold a completed call path into the graph.
    ///
    /// Every frame of the path is registered; each consecutive
    /// (caller, callee) pair contributes `ncalls` to its edge count. A path
    /// with fewer than two frames registers its frames but adds no edges.
    pub fn append(&mut self, path: CallPath) {
        for frame in &path.frames {
            self.record_function(frame);
        }

        for pair in path.frames.windows(2) {
            let caller = self.record_function(&pair[0]);
            let callee = self.record_function(&pair[1]);
            *self.edges.entry(Edge { caller, callee }).or_insert(0) += path.ncalls;
        }

        debug!(
            "Appended path with {} frames (ncalls {}): {} functions, {} edges total",
            path.frames.len(),
            path.ncalls,
            self.index.len(),
            self.edges.len()
        );
    }

    /// All registered functions, in id order.
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Frame)> + '_ {
        self.index
            .iter()
            .enumerate()
            .map(|(i, frame)| (i as FunctionId + 1, frame))
    }

    /// All accumulated edges, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, u64)> + '_ {
        self.edges.iter().map(|(&edge, &ncalls)| (edge, ncalls))
    }

    /// Look up the frame a function id was assigned to.
    pub fn frame(&self, id: FunctionId) -> Option<&Frame> {
        if id == 0 {
            None
        } else {
            self.index.get(id as usize - 1)
        }
    }

    /// Number of unique functions registered
    pub fn num_functions(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct caller -> callee adjacencies
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Sum of the accumulated counts over all edges
    pub fn total_calls(&self) -> u64 {
        self.edges.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(frames: &[(&str, &str)], ncalls: u64) -> CallPath {
        CallPath {
            frames: frames
                .iter()
                .map(|&(function, library)| Frame::new(function, library))
                .collect(),
            ncalls,
        }
    }

    #[test]
    fn test_ids_assigned_in_first_seen_order() {
        let mut graph = CallGraph::new();

        assert_eq!(graph.record_function(&Frame::new("A", "libX.so")), 1);
        assert_eq!(graph.record_function(&Frame::new("B", "libY.so")), 2);
        assert_eq!(graph.record_function(&Frame::new("C", "libX.so")), 3);
    }

    #[test]
    fn test_record_function_idempotent() {
        let mut graph = CallGraph::new();
        let frame = Frame::new("A", "libX.so");

        let first = graph.record_function(&frame);
        let second = graph.record_function(&frame);

        assert_eq!(first, second);
        assert_eq!(graph.num_functions(), 1);
    }

    #[test]
    fn test_same_function_in_different_library_is_distinct() {
        let mut graph = CallGraph::new();

        let x = graph.record_function(&Frame::new("A", "libX.so"));
        let y = graph.record_function(&Frame::new("A", "libY.so"));

        assert_ne!(x, y);
    }

    #[test]
    fn test_append_accumulates_edge_counts() {
        let mut graph = CallGraph::new();
        graph.append(path(&[("A", "libX.so"), ("B", "libY.so")], 3));
        graph.append(path(&[("A", "libX.so"), ("B", "libY.so")], 4));

        assert_eq!(graph.num_functions(), 2);
        assert_eq!(graph.num_edges(), 1);

        let (edge, ncalls) = graph.edges().next().unwrap();
        assert_eq!(edge, Edge { caller: 1, callee: 2 });
        assert_eq!(ncalls, 7);
    }

    #[test]
    fn test_shared_frame_registers_once() {
        let mut graph = CallGraph::new();
        graph.append(path(&[("A", "libX.so"), ("B", "libY.so")], 3));
        graph.append(path(&[("A", "libX.so"), ("C", "libZ.so")], 5));

        assert_eq!(graph.num_functions(), 3);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.function_id(&Frame::new("A", "libX.so")), Some(1));
    }

    #[test]
    fn test_single_frame_path_adds_no_edges() {
        let mut graph = CallGraph::new();
        graph.append(path(&[("A", "libX.so")], 9));

        assert_eq!(graph.num_functions(), 1);
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn test_multi_frame_path_edges_follow_adjacency() {
        let mut graph = CallGraph::new();
        graph.append(path(
            &[("A", "libX.so"), ("B", "libY.so"), ("C", "libZ.so")],
            2,
        ));

        let mut edges: Vec<_> = graph.edges().collect();
        edges.sort_by_key(|&(e, _)| (e.caller, e.callee));

        assert_eq!(
            edges,
            vec![
                (Edge { caller: 1, callee: 2 }, 2),
                (Edge { caller: 2, callee: 3 }, 2),
            ]
        );
        assert_eq!(graph.total_calls(), 4);
    }

    #[test]
    fn test_function_id_unknown_frame() {
        let graph = CallGraph::new();
        assert_eq!(graph.function_id(&Frame::new("A", "libX.so")), None);
    }

    #[test]
    fn test_frame_lookup_by_id() {
        let mut graph = CallGraph::new();
        graph.record_function(&Frame::new("A", "libX.so"));

        assert_eq!(graph.frame(1), Some(&Frame::new("A", "libX.so")));
        assert_eq!(graph.frame(0), None);
        assert_eq!(graph.frame(2), None);
    }
}

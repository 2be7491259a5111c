//! # Overlapping Cluster Editing Search Engine
//!
//! A Rust library for the s-overlapping cluster editing problem: decide
//! whether at most `k` edge insertions and deletions can transform a graph
//! into one where every vertex belongs to at most `s` maximal cliques, and
//! enumerate witnessing edit sets.
//!
//! This crate provides:
//! - A dynamic graph store with a **dual** adjacency representation
//!   (sorted neighbour lists plus an edge bitmap) and a bit-exact graph6
//!   codec.
//! - A maximal-clique enumerator (Bron–Kerbosch with Tomita pivoting over
//!   a degeneracy ordering) that **exits early** once a vertex exceeds `s`
//!   clique memberships.
//! - Two forbidden-subgraph locators: a general clique-separator variant
//!   and an `s = 2` neighbourhood scan for induced claws, P₄'s and C₄'s.
//! - The branch-and-bound recursion with forbidden-edit bookkeeping and a
//!   maintained undo log.
//!
//! ## Quick Start
//!
//! ```
//! use overclust::graph::Graph;
//! use overclust::search::{enumerate, EditingOptions};
//!
//! // The claw K_{1,3}: its centre lies in three maximal cliques.
//! let claw = Graph::parse_graph6("Cs").unwrap();
//!
//! let mut options = EditingOptions::default();
//! assert!(enumerate(&claw, 2, 0, &mut options, None).is_empty());
//!
//! // One edit suffices; every solution carries its edit log.
//! let solutions = enumerate(&claw, 2, 1, &mut options, None);
//! assert!(!solutions.is_empty());
//! for solution in &solutions {
//!     assert_eq!(solution.edges_added.len() + solution.edges_removed.len(), 1);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: graph store, edit records and the graph6 codec.
//! - [`sorted`]: set algebra over strictly increasing sequences.
//! - [`degeneracy`]: min-degree peeling and the conjectured edit bound.
//! - [`cliques`]: the early-exit maximal-clique enumerator.
//! - [`forbidden`]: forbidden-subgraph locators and the forbidden table.
//! - [`search`]: options, the branching engine and the driver API.
//! - [`validate`]: independent brute-force checks for small instances.
//!
//! ## Performance Notes
//!
//! - The search recomputes the maximal cliques at every branch node; the
//!   worst-case running time is `O(9^k · poly(n))` for `s = 2`.
//! - The graph6 codec supports the single-byte order encoding (`n ≤ 62`).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::doc_markdown)]

pub mod cliques;
pub mod degeneracy;
pub mod forbidden;
pub mod graph;
pub mod search;
pub mod sorted;
pub mod validate;

/// Re-export of commonly used types for convenience.
pub mod prelude {
    pub use crate::cliques::{maximal_cliques, MaximalCliques};
    pub use crate::degeneracy::{degeneracy_ordering, DegeneracyOrdering};
    pub use crate::forbidden::{BranchingEdits, EdgeEdit, ForbiddenTable};
    pub use crate::graph::{EditRecord, Graph, Graph6Error};
    pub use crate::search::{enumerate, lower_bound, witness_only, EditingOptions};
}

//! Forbidden-subgraph location and branching-edit bookkeeping.
//!
//! When the enumerator reports a witness vertex `u` sitting in more than
//! `s` maximal cliques, one of two locators extracts a small vertex set
//! inducing a forbidden pattern and turns it into the candidate edits the
//! branching engine recurses on:
//!
//! - the general clique-separator locator works for any `s` and picks two
//!   separating vertices per pair of cliques through `u`;
//! - the `s = 2` neighbourhood locator scans `N(u)` for induced claws,
//!   P₄'s and C₄'s and emits the pattern-specific edit lists.
//!
//! Edits whose endpoint pair is already in the forbidden table are dropped
//! before the candidate list is returned.

use crate::cliques::MaximalCliques;
use crate::graph::Graph;
use crate::search::EditingOptions;
use crate::sorted;
use log::error;
use std::time::Instant;

// ============================================================================
// Edits and the forbidden table
// ============================================================================

/// A single candidate edge edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEdit {
    /// One endpoint of the edited pair.
    pub from: usize,
    /// The other endpoint.
    pub to: usize,
    /// `true` inserts the edge, `false` removes it.
    pub add: bool,
}

/// A symmetric predicate over unordered vertex pairs marking edits that
/// must not be performed in the current subtree.
///
/// Two interchangeable encodings: a dense `n × n` matrix for `O(1)`
/// queries, or per-vertex sorted lists when memory matters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForbiddenTable {
    /// Dense boolean matrix encoding.
    Matrix(Vec<Vec<bool>>),
    /// Per-vertex sorted-list encoding.
    Lists(Vec<Vec<usize>>),
}

impl ForbiddenTable {
    /// Creates an empty table for `n` vertices in the requested encoding.
    pub fn new(n: usize, matrix: bool) -> Self {
        if matrix {
            ForbiddenTable::Matrix(vec![vec![false; n]; n])
        } else {
            ForbiddenTable::Lists(vec![Vec::new(); n])
        }
    }

    /// Returns whether the unordered pair `(v, w)` is forbidden.
    #[inline]
    pub fn contains(&self, v: usize, w: usize) -> bool {
        let (a, b) = if v < w { (v, w) } else { (w, v) };
        match self {
            ForbiddenTable::Matrix(m) => m[a][b],
            ForbiddenTable::Lists(l) => sorted::contains(&l[a], b),
        }
    }

    /// Marks the unordered pair `(v, w)` as forbidden.
    #[inline]
    pub fn insert(&mut self, v: usize, w: usize) {
        let (a, b) = if v < w { (v, w) } else { (w, v) };
        match self {
            ForbiddenTable::Matrix(m) => m[a][b] = true,
            ForbiddenTable::Lists(l) => sorted::insert(&mut l[a], b),
        }
    }

    /// Clears the mark on the unordered pair `(v, w)`.
    #[inline]
    pub fn remove(&mut self, v: usize, w: usize) {
        let (a, b) = if v < w { (v, w) } else { (w, v) };
        match self {
            ForbiddenTable::Matrix(m) => m[a][b] = false,
            ForbiddenTable::Lists(l) => sorted::remove(&mut l[a], b),
        }
    }
}

/// Outcome of a locator invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BranchingEdits {
    /// No forbidden subgraph exists at the witness; the graph state
    /// contradicts the witness report.
    NoSubgraph,
    /// A forbidden subgraph exists but every one of its edits is in the
    /// forbidden table; the branch is dead.
    AllForbidden,
    /// The edits to branch on, already filtered by the forbidden table and
    /// canonicalised with `from < to`.
    Edits(Vec<EdgeEdit>),
}

/// Canonicalises the endpoint order and drops edits whose pair is in the
/// forbidden table.
fn filter_forbidden(forbidden: &ForbiddenTable, edits: Vec<EdgeEdit>) -> Vec<EdgeEdit> {
    edits
        .into_iter()
        .map(|e| {
            let (from, to) = if e.from < e.to {
                (e.from, e.to)
            } else {
                (e.to, e.from)
            };
            EdgeEdit { from, to, add: e.add }
        })
        .filter(|e| !forbidden.contains(e.from, e.to))
        .collect()
}

// ============================================================================
// Locator A: clique separators (any s)
// ============================================================================

/// Extracts a forbidden subgraph around `witness` from its overlapping
/// cliques and returns the edits that would turn it into a clique.
///
/// For every unordered pair of the first `min(|C_u|, s+1)` cliques through
/// the witness, one vertex from each side of the symmetric difference is
/// added as a separator; a vertex already in the forbidden set is
/// preferred over a fresh one so that the set stays small.
///
/// # Panics
/// Panics if a clique pair yields no separator vertex. Two distinct
/// maximal cliques always differ on both sides, so this indicates
/// corrupted enumeration state.
pub fn clique_separators(
    g: &Graph,
    s: usize,
    cliques: &MaximalCliques,
    witness: usize,
    forbidden: &ForbiddenTable,
) -> BranchingEdits {
    let overlapping = &cliques.vertex_cliques[witness];
    let count = overlapping.len().min(s + 1);

    let mut members = Vec::with_capacity((s + 1) * s + 1);
    members.push(witness);

    for i in 0..count {
        let clique_a = &cliques.clique_list[overlapping[i]];
        for j in (i + 1)..count {
            let clique_b = &cliques.clique_list[overlapping[j]];

            let only_b = sorted::difference(clique_b, clique_a);
            let only_a = sorted::difference(clique_a, clique_b);
            let separator_b = pick_separator(&only_b, &members);
            let separator_a = pick_separator(&only_a, &members);

            let (Some(separator_a), Some(separator_b)) = (separator_a, separator_b) else {
                error!(
                    "no separator vertices for witness {witness}: \
                     clique_a={clique_a:?} clique_b={clique_b:?} n={} m={}",
                    g.n(),
                    g.m()
                );
                panic!("clique pair without separator vertices");
            };

            if !members.contains(&separator_a) {
                members.push(separator_a);
            }
            if !members.contains(&separator_b) {
                members.push(separator_b);
            }
        }
    }

    // Branch on every pair of the forbidden set: make it a clique.
    let mut edits = Vec::with_capacity(members.len() * (members.len() - 1) / 2);
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            let (v, w) = (members[i], members[j]);
            edits.push(EdgeEdit {
                from: v,
                to: w,
                add: !g.edge_has(v, w),
            });
        }
    }

    let edits = filter_forbidden(forbidden, edits);
    if edits.is_empty() {
        BranchingEdits::AllForbidden
    } else {
        BranchingEdits::Edits(edits)
    }
}

/// Picks a separator from `candidates`, preferring one already in
/// `members`; among fresh candidates the first is taken.
fn pick_separator(candidates: &[usize], members: &[usize]) -> Option<usize> {
    let mut fresh = None;
    for &v in candidates {
        if members.contains(&v) {
            return Some(v);
        }
        if fresh.is_none() {
            fresh = Some(v);
        }
    }
    fresh
}

// ============================================================================
// Locator B: neighbourhood patterns (s = 2)
// ============================================================================

/// Scans the neighbourhood of the witness `u` for induced claws, P₄'s and
/// C₄'s and returns the edits of the pattern with the fewest remaining
/// edits after filtering, or of the first pattern found when `take_first`
/// is set.
pub fn neighborhood_patterns(
    g: &Graph,
    u: usize,
    forbidden: &ForbiddenTable,
    options: &mut EditingOptions,
    take_first: bool,
) -> BranchingEdits {
    let neighbors: Vec<usize> = g.neighbors(u).to_vec();
    let degree = neighbors.len();

    let mut found_subgraph = false;
    let mut best: Option<Vec<EdgeEdit>> = None;

    for v_index in 0..degree {
        let v = neighbors[v_index];
        for w_index in (v_index + 1)..degree {
            let w = neighbors[w_index];
            let edge_vw = g.edge_has(v, w);
            for x_index in (w_index + 1)..degree {
                let x = neighbors[x_index];
                let edge_vx = g.edge_has(v, x);
                let edge_wx = g.edge_has(w, x);

                // Claw centred on u itself.
                if !edge_vw && !edge_vx && !edge_wx {
                    let mut edits = vec![
                        EdgeEdit { from: u, to: v, add: false },
                        EdgeEdit { from: u, to: w, add: false },
                        EdgeEdit { from: u, to: x, add: false },
                    ];
                    push_leaf_adds(g, &mut edits, options, v, w, x);

                    let edits = filter_forbidden(forbidden, edits);
                    found_subgraph = true;
                    if !edits.is_empty() && best.as_ref().is_none_or(|b| edits.len() < b.len()) {
                        if take_first {
                            return BranchingEdits::Edits(edits);
                        }
                        best = Some(edits);
                    }
                    // A fourth neighbour can still complete another pattern;
                    // keep scanning.
                }

                // None of F1, F2, F3 contains a triangle.
                if edge_vw && edge_wx && edge_vx {
                    continue;
                }

                for y_index in (x_index + 1)..degree {
                    let y = neighbors[y_index];
                    let locals = [v, w, x, y];
                    let sub = g.induced_subgraph(&locals);

                    if sub.m() < 3 || sub.m() > 4 {
                        continue;
                    }
                    let degs = [sub.degree(0), sub.degree(1), sub.degree(2), sub.degree(3)];
                    if degs.contains(&0) {
                        continue;
                    }

                    let mut edits;
                    if let Some(centre_index) = degs.iter().position(|&d| d == 3) {
                        // F1: a claw among the four neighbours.
                        if sub.m() > 3 {
                            continue;
                        }
                        let centre = locals[centre_index];
                        let leaves: Vec<usize> = (0..4)
                            .filter(|&i| i != centre_index)
                            .map(|i| locals[i])
                            .collect();
                        edits = leaves
                            .iter()
                            .map(|&leaf| EdgeEdit { from: centre, to: leaf, add: false })
                            .collect();
                        push_leaf_adds(g, &mut edits, options, leaves[0], leaves[1], leaves[2]);
                    } else if sub.m() == 3 {
                        // F2: an induced P4. Walk it from a degree-1 endpoint.
                        let start = degs.iter().position(|&d| d == 1).unwrap_or(3);
                        let walk = sub.any_walk(start, 4);
                        edits = vec![
                            // Detach u from the path.
                            EdgeEdit { from: u, to: v, add: false },
                            EdgeEdit { from: u, to: w, add: false },
                            EdgeEdit { from: u, to: x, add: false },
                            EdgeEdit { from: u, to: y, add: false },
                            // The centre bottom edge.
                            EdgeEdit { from: sub.id(walk[1]), to: sub.id(walk[2]), add: false },
                            // The two chords; the endpoint-to-endpoint chord
                            // is spared.
                            EdgeEdit { from: sub.id(walk[0]), to: sub.id(walk[2]), add: true },
                            EdgeEdit { from: sub.id(walk[1]), to: sub.id(walk[3]), add: true },
                            // The outer bottom edges.
                            EdgeEdit { from: sub.id(walk[0]), to: sub.id(walk[1]), add: false },
                            EdgeEdit { from: sub.id(walk[2]), to: sub.id(walk[3]), add: false },
                        ];
                    } else {
                        // F3: all degrees are two, an induced C4.
                        let walk = sub.any_walk(0, 4);
                        edits = vec![
                            // Detach u from the cycle.
                            EdgeEdit { from: u, to: v, add: false },
                            EdgeEdit { from: u, to: w, add: false },
                            EdgeEdit { from: u, to: x, add: false },
                            EdgeEdit { from: u, to: y, add: false },
                            // Both diagonals.
                            EdgeEdit { from: sub.id(walk[0]), to: sub.id(walk[2]), add: true },
                            EdgeEdit { from: sub.id(walk[1]), to: sub.id(walk[3]), add: true },
                            // Cycle edges; the closing edge is spared.
                            EdgeEdit { from: sub.id(walk[0]), to: sub.id(walk[1]), add: false },
                            EdgeEdit { from: sub.id(walk[1]), to: sub.id(walk[2]), add: false },
                            EdgeEdit { from: sub.id(walk[2]), to: sub.id(walk[3]), add: false },
                        ];
                    }

                    let edits = filter_forbidden(forbidden, edits);
                    found_subgraph = true;
                    if !edits.is_empty() && best.as_ref().is_none_or(|b| edits.len() < b.len()) {
                        if take_first {
                            return BranchingEdits::Edits(edits);
                        }
                        best = Some(edits);
                    }
                }
            }
        }
    }

    match (found_subgraph, best) {
        (false, _) => BranchingEdits::NoSubgraph,
        (true, None) => BranchingEdits::AllForbidden,
        (true, Some(edits)) => BranchingEdits::Edits(edits),
    }
}

/// Appends the three leaf-pair insertions of a claw. Under the
/// no-shared-neighbour proposition, a pair whose common neighbourhood has
/// at most one vertex (the claw centre) is suppressed instead.
fn push_leaf_adds(
    g: &Graph,
    edits: &mut Vec<EdgeEdit>,
    options: &mut EditingOptions,
    a: usize,
    b: usize,
    c: usize,
) {
    if options.no_neighbor_proposition {
        let start = Instant::now();
        for (p, q) in [(a, b), (a, c), (b, c)] {
            if sorted::intersection(g.neighbors(p), g.neighbors(q)).len() > 1 {
                edits.push(EdgeEdit { from: p, to: q, add: true });
            } else {
                options.stats.no_neighbor_proposition_count += 1;
            }
        }
        options.stats.time_no_neighbor_merges += start.elapsed();
    } else {
        edits.push(EdgeEdit { from: a, to: b, add: true });
        edits.push(EdgeEdit { from: a, to: c, add: true });
        edits.push(EdgeEdit { from: b, to: c, add: true });
    }
}

// ============================================================================
// Tests
// ============================================================================

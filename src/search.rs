//! The branch-and-bound decision procedure for s-overlapping cluster
//! editing.
//!
//! A branch node recomputes the maximal cliques of the working graph, asks
//! a locator for the edits destroying a forbidden subgraph at the witness
//! vertex, and recurses on each candidate edit with budget `k - 1`. All
//! candidate edits are entered into the forbidden table *before* the
//! per-edit loop, so a sibling branch can never reverse a choice an older
//! sibling already rejected. Each edit is undone on backtrack; the working
//! graph, the edit logs and (unless per-child copies are requested) the
//! forbidden table are restored before every return.

use crate::cliques;
use crate::degeneracy::degeneracy_ordering;
use crate::forbidden::{self, BranchingEdits, ForbiddenTable};
use crate::graph::{EditRecord, Graph};
use crate::sorted;
use log::{debug, error, warn};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

// ============================================================================
// Options and telemetry
// ============================================================================

/// Search configuration plus observational telemetry.
///
/// The boolean switches select locator, table encoding and branching
/// policy; the `stats` block accumulates times and event counts and never
/// influences the search. `forbid_cliques` and `no_neighbor_proposition`
/// are heuristics with known counterexamples: they stay opt-in and void
/// the completeness contract.
#[derive(Clone, Debug)]
pub struct EditingOptions {
    /// Locate forbidden subgraphs through clique separators (locator A)
    /// instead of the s=2 neighbourhood scan (locator B).
    pub use_fellows_forbidden: bool,
    /// Pre-forbid all edges inside maximal cliques of size at least three.
    pub forbid_cliques: bool,
    /// Pre-forbid all edges inside critical cliques.
    pub forbid_critical_cliques: bool,
    /// Suppress claw chord-adds between leaves whose common neighbourhood
    /// has at most one vertex.
    pub no_neighbor_proposition: bool,
    /// Store forbidden pairs in a dense matrix instead of sorted lists.
    pub forbidden_matrix: bool,
    /// Clone the forbidden table per child instead of restoring it on
    /// backtrack.
    pub forbidden_copy: bool,
    /// Take the first forbidden subgraph found instead of the one with the
    /// fewest remaining edits.
    pub forbidden_take_first: bool,
    /// Accumulated telemetry.
    pub stats: EditingStats,
}

impl Default for EditingOptions {
    fn default() -> Self {
        Self {
            use_fellows_forbidden: true,
            forbid_cliques: false,
            forbid_critical_cliques: false,
            no_neighbor_proposition: false,
            forbidden_matrix: true,
            forbidden_copy: false,
            forbidden_take_first: false,
            stats: EditingStats::default(),
        }
    }
}

/// Times and event counts accumulated over one driver invocation.
#[derive(Clone, Debug, Default)]
pub struct EditingStats {
    /// Wall time of the whole driver call.
    pub time_total: Duration,
    /// Time spent looking for a witness vertex in too many cliques.
    pub time_finding_cliques: Duration,
    /// Time spent locating forbidden subgraphs.
    pub time_finding_forbidden: Duration,
    /// Time spent copying or restoring the forbidden table.
    pub time_forbidden_copy: Duration,
    /// Time spent on the shared-neighbour checks of the proposition.
    pub time_no_neighbor_merges: Duration,
    /// How often the proposition suppressed a chord-add.
    pub no_neighbor_proposition_count: u64,
    /// Edges pre-forbidden inside large cliques.
    pub clique_edges: u64,
    /// Edges pre-forbidden inside critical cliques.
    pub critical_clique_edges: u64,
}

impl fmt::Display for EditingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Options{{fellows={}, forbidCliques={}, forbidCriticalCliques={}, \
             noNeighborProposition={}, forbiddenMatrix={}, forbiddenCopy={}, \
             forbiddenTakeFirst={}, timeTotal={:?}, timeFindingCliques={:?}, \
             timeFindingForbidden={:?}, timeForbiddenCopy={:?}, \
             timeNoNeighborMerges={:?}, noNeighborPropositionCount={}, \
             cliqueEdges={}, criticalCliqueEdges={}}}",
            self.use_fellows_forbidden,
            self.forbid_cliques,
            self.forbid_critical_cliques,
            self.no_neighbor_proposition,
            self.forbidden_matrix,
            self.forbidden_copy,
            self.forbidden_take_first,
            self.stats.time_total,
            self.stats.time_finding_cliques,
            self.stats.time_finding_forbidden,
            self.stats.time_forbidden_copy,
            self.stats.time_no_neighbor_merges,
            self.stats.no_neighbor_proposition_count,
            self.stats.clique_edges,
            self.stats.critical_clique_edges,
        )
    }
}

// ============================================================================
// Drivers
// ============================================================================

/// Returns the degeneracy-based edit lower bound for the instance.
///
/// The bound is conjectural (see [`crate::degeneracy`]); a negative `k` is
/// treated as the unconstrained budget `n²`. Only `s = 2` is supported:
/// other values log a warning and report 0.
pub fn lower_bound(g: &Graph, s: usize, k: i32) -> i32 {
    if s != 2 {
        warn!("edit lower bound only supports s=2, got s={s}");
        return 0;
    }
    let k = if k < 0 {
        (g.n() as i32).saturating_mul(g.n() as i32)
    } else {
        k
    };
    degeneracy_ordering(g, s as i32, k).edit_bound
}

/// Re-export of the cheap witness query: a vertex in more than `s`
/// maximal cliques, without materialising the clique list.
pub fn witness_only(g: &Graph, s: usize) -> Option<usize> {
    cliques::witness_only(g, s)
}

/// Enumerates solution graphs reachable with at most `k` edits.
///
/// The input graph is cloned; each returned solution carries the edit log
/// that produces it from the input. `max_solutions` caps the number of
/// solutions (`None` enumerates all). Only `s = 2` is supported: other
/// values log a warning and return an empty list.
pub fn enumerate(
    g: &Graph,
    s: usize,
    k: i32,
    options: &mut EditingOptions,
    max_solutions: Option<usize>,
) -> Vec<Graph> {
    options.stats = EditingStats::default();
    let start = Instant::now();

    let mut result = Vec::new();
    if s != 2 {
        warn!("branch and bound only supports s=2, got s={s}");
        return result;
    }

    let mut working = g.clone();
    working.edges_added.clear();
    working.edges_removed.clear();

    let mut forbidden = ForbiddenTable::new(g.n(), options.forbidden_matrix);
    if options.forbid_cliques {
        pre_forbid_cliques(&working, &mut forbidden, options);
    } else if options.forbid_critical_cliques {
        pre_forbid_critical_cliques(&working, &mut forbidden, options);
    }

    let mut edges_added = Vec::new();
    let mut edges_removed = Vec::new();
    branch(
        &mut working,
        &mut result,
        s,
        k,
        options,
        max_solutions,
        &mut forbidden,
        &mut edges_added,
        &mut edges_removed,
    );

    options.stats.time_total = start.elapsed();
    result
}

/// Forbids every edge inside a maximal clique of size at least three.
///
/// Known to cut off optimal solutions on some instances; opt-in only.
fn pre_forbid_cliques(g: &Graph, forbidden: &mut ForbiddenTable, options: &mut EditingOptions) {
    let info = cliques::maximal_cliques(g, 0);
    for clique in &info.clique_list {
        if clique.len() < 3 {
            continue;
        }
        for (i, &v) in clique.iter().enumerate() {
            for &w in &clique[i + 1..] {
                forbidden.insert(v, w);
                options.stats.clique_edges += 1;
            }
        }
    }
}

/// Forbids every edge inside a critical clique: a maximal set of vertices
/// sharing the same closed neighbourhood.
fn pre_forbid_critical_cliques(
    g: &Graph,
    forbidden: &mut ForbiddenTable,
    options: &mut EditingOptions,
) {
    let mut groups: HashMap<Vec<usize>, Vec<usize>> = HashMap::new();
    for v in 0..g.n() {
        let mut closed = g.neighbors(v).to_vec();
        sorted::insert(&mut closed, v);
        groups.entry(closed).or_default().push(v);
    }
    for group in groups.values() {
        for (i, &v) in group.iter().enumerate() {
            for &w in &group[i + 1..] {
                forbidden.insert(v, w);
                options.stats.critical_clique_edges += 1;
            }
        }
    }
}

// ============================================================================
// The branching recursion
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn branch(
    g: &mut Graph,
    result: &mut Vec<Graph>,
    s: usize,
    k: i32,
    options: &mut EditingOptions,
    max_solutions: Option<usize>,
    forbidden: &mut ForbiddenTable,
    edges_added: &mut Vec<EditRecord>,
    edges_removed: &mut Vec<EditRecord>,
) {
    if k < 0 {
        return;
    }

    let outcome = if options.use_fellows_forbidden || s != 2 {
        let start = Instant::now();
        let clique_info = cliques::maximal_cliques(g, s);
        options.stats.time_finding_cliques += start.elapsed();

        let Some(witness) = clique_info.witness else {
            record_solution(g, result, edges_added, edges_removed, s, k);
            return;
        };
        if k <= 0 {
            return;
        }

        let start = Instant::now();
        let outcome = forbidden::clique_separators(g, s, &clique_info, witness, forbidden);
        options.stats.time_finding_forbidden += start.elapsed();
        (witness, outcome)
    } else {
        let start = Instant::now();
        let witness = cliques::witness_only(g, s);
        options.stats.time_finding_cliques += start.elapsed();

        let Some(witness) = witness else {
            record_solution(g, result, edges_added, edges_removed, s, k);
            return;
        };
        if k <= 0 {
            return;
        }

        // At the search root every subgraph is equally untried, so the
        // first one found is taken even without the take-first policy.
        let take_first = options.forbidden_take_first
            || (edges_added.is_empty() && edges_removed.is_empty());
        let start = Instant::now();
        let outcome = forbidden::neighborhood_patterns(g, witness, forbidden, options, take_first);
        options.stats.time_finding_forbidden += start.elapsed();
        (witness, outcome)
    };

    let (witness, outcome) = outcome;
    let edits = match outcome {
        BranchingEdits::NoSubgraph => {
            error!(
                "witness {witness} in too many cliques but no forbidden subgraph found \
                 (s={s}, k={k}, added={edges_added:?}, removed={edges_removed:?})"
            );
            panic!("forbidden-subgraph locator found nothing at a witness vertex");
        }
        BranchingEdits::AllForbidden => return,
        BranchingEdits::Edits(edits) => edits,
    };
    debug!("branching at witness {witness} on {} edits, k={k}", edits.len());

    // Forbid every candidate up front: within a sibling branch the choice
    // an older sibling already rejected must stay untouchable.
    for e in &edits {
        forbidden.insert(e.from, e.to);
    }

    for e in &edits {
        if e.add {
            g.edge_add(e.from, e.to);
            edges_added.push(EditRecord { from: e.from, to: e.to, budget: k });
        } else {
            g.edge_remove(e.from, e.to);
            edges_removed.push(EditRecord { from: e.from, to: e.to, budget: k });
        }

        if options.forbidden_copy {
            let start = Instant::now();
            let mut child_forbidden = forbidden.clone();
            options.stats.time_forbidden_copy += start.elapsed();
            branch(
                g,
                result,
                s,
                k - 1,
                options,
                max_solutions,
                &mut child_forbidden,
                edges_added,
                edges_removed,
            );
        } else {
            branch(
                g,
                result,
                s,
                k - 1,
                options,
                max_solutions,
                forbidden,
                edges_added,
                edges_removed,
            );
        }

        if e.add {
            g.edge_remove(e.from, e.to);
            edges_added.pop();
        } else {
            g.edge_add(e.from, e.to);
            edges_removed.pop();
        }

        if max_solutions.is_some_and(|cap| result.len() >= cap) {
            break;
        }
    }

    if !options.forbidden_copy {
        let start = Instant::now();
        for e in &edits {
            forbidden.remove(e.from, e.to);
        }
        options.stats.time_forbidden_copy += start.elapsed();
    }
}

fn record_solution(
    g: &Graph,
    result: &mut Vec<Graph>,
    edges_added: &[EditRecord],
    edges_removed: &[EditRecord],
    s: usize,
    k: i32,
) {
    debug!("solution found at s={s}, k={k} with {} edits", edges_added.len() + edges_removed.len());
    let mut solution = g.clone();
    solution.edges_added = edges_added.to_vec();
    solution.edges_removed = edges_removed.to_vec();
    result.push(solution);
}

// ============================================================================
// Tests
// ============================================================================

//! Maximal-clique enumeration: Bron–Kerbosch with Tomita pivoting, driven
//! by a degeneracy ordering, with an early exit the moment some vertex is
//! found in more than `s` maximal cliques.
//!
//! The clique list is a flat sequence; `vertex_cliques[v]` holds indices
//! into it. With `s = 0` the enumeration runs to completion and returns
//! exactly the maximal cliques of the graph.

use crate::degeneracy::degeneracy_ordering;
use crate::graph::Graph;
use crate::sorted;

/// Result of one enumeration pass.
#[derive(Clone, Debug)]
pub struct MaximalCliques {
    /// The maximal cliques found so far, each as a sorted vertex list.
    /// Left empty when clique recording is disabled.
    pub clique_list: Vec<Vec<usize>>,
    /// For each vertex, the indices of the cliques containing it.
    pub vertex_cliques: Vec<Vec<usize>>,
    /// A vertex observed in more than `s` cliques, if the early exit fired.
    pub witness: Option<usize>,
}

struct Enumeration<'g> {
    g: &'g Graph,
    s: usize,
    record_cliques: bool,
    cliques_seen: usize,
    result: MaximalCliques,
}

/// Enumerates maximal cliques with early exit at `s` (`s = 0` disables it).
pub fn maximal_cliques(g: &Graph, s: usize) -> MaximalCliques {
    enumerate(g, s, true)
}

/// Runs the enumeration without materialising clique bodies and returns the
/// early-exit witness, if any. Cheaper when only the witness is needed.
pub fn witness_only(g: &Graph, s: usize) -> Option<usize> {
    enumerate(g, s, false).witness
}

fn enumerate(g: &Graph, s: usize, record_cliques: bool) -> MaximalCliques {
    let mut state = Enumeration {
        g,
        s,
        record_cliques,
        cliques_seen: 0,
        result: MaximalCliques {
            clique_list: Vec::with_capacity(g.n() / 3 + 1),
            vertex_cliques: vec![Vec::new(); g.n()],
            witness: None,
        },
    };

    let ordering = degeneracy_ordering(g, 0, 0).ordering;
    for i in 0..ordering.len() {
        let vid = ordering[i];
        let mut later: Vec<usize> = ordering[i + 1..].to_vec();
        later.sort_unstable();

        // P = N(v_i) ∩ {v_{i+1}, ..., v_{n-1}}; since P ∪ X = N(v_i),
        // X follows as N(v_i) \ P without slicing the earlier vertices.
        let mut p = sorted::intersection(g.neighbors(vid), &later);
        let mut x = sorted::difference(g.neighbors(vid), &p);
        let mut r = vec![vid];

        if state.pivot_recursion(&mut p, &mut r, &mut x).is_some() {
            break;
        }
    }

    state.result
}

impl Enumeration<'_> {
    /// The pivoting recursion. Returns the witness as soon as a vertex
    /// exceeds `s` clique memberships, aborting the whole enumeration.
    fn pivot_recursion(
        &mut self,
        p: &mut Vec<usize>,
        r: &mut Vec<usize>,
        x: &mut Vec<usize>,
    ) -> Option<usize> {
        if p.is_empty() && x.is_empty() {
            return self.report_clique(r);
        }

        // Tomita pivot: u ∈ P ∪ X maximising |P ∩ N(u)|, first-encountered
        // tie-break with P scanned before X.
        let mut pivot = if p.is_empty() { x[0] } else { p[0] };
        let mut pivot_value = 0usize;
        for &vid in p.iter().chain(x.iter()) {
            let neighbors = self.g.neighbors(vid);
            if neighbors.len() < pivot_value {
                continue;
            }
            let value = sorted::intersection(neighbors, p).len();
            if value > pivot_value {
                pivot = vid;
                pivot_value = value;
            }
        }

        let loop_set = sorted::difference(p, self.g.neighbors(pivot));
        for vid in loop_set {
            let neighbors = self.g.neighbors(vid);
            let mut p_new = sorted::intersection(p, neighbors);
            let mut x_new = sorted::intersection(x, neighbors);
            r.push(vid);

            let witness = self.pivot_recursion(&mut p_new, r, &mut x_new);
            if witness.is_some() {
                return witness;
            }

            r.pop();
            sorted::remove(p, vid);
            sorted::insert(x, vid);
        }
        None
    }

    fn report_clique(&mut self, r: &[usize]) -> Option<usize> {
        if self.record_cliques {
            let mut clique = r.to_vec();
            clique.sort_unstable();
            self.result.clique_list.push(clique);
        }
        let index = self.cliques_seen;
        self.cliques_seen += 1;

        for &vid in r {
            self.result.vertex_cliques[vid].push(index);
            if self.s > 0 && self.result.vertex_cliques[vid].len() > self.s {
                self.result.witness = Some(vid);
                return Some(vid);
            }
        }
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

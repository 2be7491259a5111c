//! Brute-force reference checks for small instances.
//!
//! Everything here works by exhaustive subset enumeration and is
//! deliberately independent of the enumerator and the branching engine, so
//! search results can be cross-checked against it. Intended for graphs of
//! at most ~16 vertices.

use crate::graph::Graph;

/// For each vertex, the number of maximal cliques containing it, found by
/// scanning all vertex subsets.
pub fn vertex_clique_counts(g: &Graph) -> Vec<usize> {
    let n = g.n();
    debug_assert!(n <= 20, "subset scan explodes beyond ~20 vertices");
    let mut counts = vec![0usize; n];

    for mask in 1u32..(1u32 << n) {
        let members: Vec<usize> = (0..n).filter(|&v| mask >> v & 1 == 1).collect();
        let is_clique = members
            .iter()
            .enumerate()
            .all(|(i, &v)| members[i + 1..].iter().all(|&w| g.edge_has(v, w)));
        if !is_clique {
            continue;
        }
        let maximal = (0..n)
            .filter(|&v| mask >> v & 1 == 0)
            .all(|v| !members.iter().all(|&w| g.edge_has(v, w)));
        if maximal {
            for &v in &members {
                counts[v] += 1;
            }
        }
    }
    counts
}

/// Returns whether every vertex lies in at most `s` maximal cliques.
pub fn is_feasible(g: &Graph, s: usize) -> bool {
    vertex_clique_counts(g).iter().all(|&c| c <= s)
}

/// Minimum number of edge edits turning `g` feasible, found by trying all
/// pair subsets up to size `k_max`. `None` when no such edit set exists.
pub fn brute_force_min_edits(g: &Graph, s: usize, k_max: i32) -> Option<i32> {
    if k_max < 0 {
        return None;
    }
    let n = g.n();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|v| ((v + 1)..n).map(move |w| (v, w)))
        .collect();
    debug_assert!(pairs.len() <= 20, "edit subset scan explodes beyond ~20 pairs");

    let mut best: Option<i32> = None;
    for mask in 0u32..(1u32 << pairs.len()) {
        let size = mask.count_ones() as i32;
        if size > k_max || best.is_some_and(|b| size >= b) {
            continue;
        }
        let mut edited = g.clone();
        for (bit, &(v, w)) in pairs.iter().enumerate() {
            if mask >> bit & 1 == 1 {
                if edited.edge_has(v, w) {
                    edited.edge_remove(v, w);
                } else {
                    edited.edge_add(v, w);
                }
            }
        }
        if is_feasible(&edited, s) {
            best = Some(size);
            if size == 0 {
                break;
            }
        }
    }
    best
}

/// Returns whether the instance is solvable within budget `k`.
pub fn brute_force_solvable(g: &Graph, s: usize, k: i32) -> bool {
    brute_force_min_edits(g, s, k).is_some()
}

/// Verifies a solution returned by the search against its input: the edit
/// logs must fit the budget, replaying them onto the input must reproduce
/// the solution's edges, and the solution must be feasible for `s`.
///
/// # Errors
/// Returns a description of the first violated property.
pub fn check_solution(input: &Graph, solution: &Graph, s: usize, k: i32) -> Result<(), String> {
    let edit_count = solution.edges_added.len() + solution.edges_removed.len();
    if edit_count as i32 > k {
        return Err(format!("solution uses {edit_count} edits, budget was {k}"));
    }
    if solution.n() != input.n() {
        return Err(format!(
            "vertex count changed: {} -> {}",
            input.n(),
            solution.n()
        ));
    }

    let mut replayed = input.clone();
    for record in &solution.edges_added {
        if replayed.edge_has(record.from, record.to) {
            return Err(format!("log adds existing edge ({}, {})", record.from, record.to));
        }
        replayed.edge_add(record.from, record.to);
    }
    for record in &solution.edges_removed {
        if !replayed.edge_has(record.from, record.to) {
            return Err(format!("log removes missing edge ({}, {})", record.from, record.to));
        }
        replayed.edge_remove(record.from, record.to);
    }

    for v in 0..input.n() {
        for w in (v + 1)..input.n() {
            if replayed.edge_has(v, w) != solution.edge_has(v, w) {
                return Err(format!(
                    "replayed edits disagree with the solution at ({v}, {w})"
                ));
            }
        }
    }

    if !is_feasible(solution, s) {
        return Err(format!("solution leaves a vertex in more than {s} maximal cliques"));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EditRecord;

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(v, w) in edges {
            g.edge_add(v, w);
        }
        g
    }

    #[test]
    fn clique_counts_of_known_graphs() {
        let claw = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(vertex_clique_counts(&claw), vec![3, 1, 1, 1]);

        let triangle = graph_from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
        assert_eq!(vertex_clique_counts(&triangle), vec![1, 1, 1]);

        // Isolated vertices count as their own maximal clique.
        assert_eq!(vertex_clique_counts(&Graph::new(3)), vec![1, 1, 1]);

        let path = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(vertex_clique_counts(&path), vec![1, 2, 2, 1]);
    }

    #[test]
    fn feasibility_of_known_graphs() {
        let claw = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);
        assert!(!is_feasible(&claw, 2));
        assert!(is_feasible(&claw, 3));

        let two_triangles = graph_from_edges(5, &[(0, 1), (0, 2), (1, 2), (0, 3), (0, 4), (3, 4)]);
        assert!(is_feasible(&two_triangles, 2));
    }

    #[test]
    fn minimum_edits_of_known_instances() {
        let claw = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(brute_force_min_edits(&claw, 2, 3), Some(1));
        assert_eq!(brute_force_min_edits(&claw, 2, 0), None);

        let triangle = graph_from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
        assert_eq!(brute_force_min_edits(&triangle, 2, 0), Some(0));

        // Star with four leaves: one edit is never enough.
        let star = graph_from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        assert_eq!(brute_force_min_edits(&star, 2, 1), None);
        assert_eq!(brute_force_min_edits(&star, 2, 4), Some(2));
    }

    #[test]
    fn check_solution_accepts_a_correct_edit_log() {
        let claw = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);
        let mut solution = claw.clone();
        solution.edge_remove(0, 1);
        solution.edges_removed = vec![EditRecord { from: 0, to: 1, budget: 1 }];
        assert!(check_solution(&claw, &solution, 2, 1).is_ok());
    }

    #[test]
    fn check_solution_rejects_violations() {
        let claw = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);

        // Budget overrun.
        let mut solution = claw.clone();
        solution.edge_remove(0, 1);
        solution.edges_removed = vec![EditRecord { from: 0, to: 1, budget: 1 }];
        assert!(check_solution(&claw, &solution, 2, 0).is_err());

        // Log does not reproduce the edges.
        let mut solution = claw.clone();
        solution.edge_remove(0, 1);
        solution.edges_removed = vec![EditRecord { from: 0, to: 2, budget: 1 }];
        assert!(check_solution(&claw, &solution, 2, 1).is_err());

        // Still infeasible.
        let solution = claw.clone();
        assert!(check_solution(&claw, &solution, 2, 1).is_err());
    }
}

//! Dynamic simple-graph store with a dual adjacency representation and a
//! bit-exact graph6 codec.
//!
//! Representation:
//! - `edges[v]` is the strictly increasing neighbour list of vertex `v`,
//!   giving `O(deg(v))` neighbour enumeration.
//! - `matrix[v][w]` mirrors the lists for `O(1)` edge-existence queries.
//!
//! Both encodings are kept consistent by construction: every mutation goes
//! through [`Graph::edge_add`] / [`Graph::edge_remove`], which update both.
//!
//! Graphs produced by [`Graph::induced_subgraph`] additionally carry an
//! `ids` map from local vertex indices back to the outer graph's ids.

use crate::sorted;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;

// ============================================================================
// Edit records
// ============================================================================

/// One entry of a solution's edit log: the endpoints of the edited pair and
/// the remaining budget at the time the edit was performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditRecord {
    /// Smaller endpoint of the edited pair.
    pub from: usize,
    /// Larger endpoint of the edited pair.
    pub to: usize,
    /// Remaining budget when the edit was applied.
    pub budget: i32,
}

impl fmt::Display for EditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.from, self.to, self.budget)
    }
}

// ============================================================================
// Graph
// ============================================================================

/// An undirected simple graph over vertex ids `0..n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    edges: Vec<Vec<usize>>,
    matrix: Vec<Vec<bool>>,
    ids: Option<Vec<usize>>,
    number_vertices: usize,
    number_edges: usize,

    /// Edges added on the branch that produced this graph, oldest first.
    /// Populated only on solution instances returned by the search.
    pub edges_added: Vec<EditRecord>,
    /// Edges removed on the branch that produced this graph, oldest first.
    pub edges_removed: Vec<EditRecord>,
}

impl Graph {
    /// Creates an edgeless graph on `n` vertices.
    pub fn new(n: usize) -> Self {
        Self {
            edges: vec![Vec::new(); n],
            matrix: vec![vec![false; n]; n],
            ids: None,
            number_vertices: n,
            number_edges: 0,
            edges_added: Vec::new(),
            edges_removed: Vec::new(),
        }
    }

    /// Samples a `G(n, p)` random graph.
    pub fn random<R: Rng>(n: usize, p: f64, rng: &mut R) -> Self {
        debug_assert!((0.0..=1.0).contains(&p), "p must be in [0, 1]");
        let mut g = Self::new(n);
        for v in 0..n {
            for w in (v + 1)..n {
                if rng.random_bool(p) {
                    g.edge_add(v, w);
                }
            }
        }
        g
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn n(&self) -> usize {
        self.number_vertices
    }

    /// Returns the number of edges.
    #[inline]
    pub fn m(&self) -> usize {
        self.number_edges
    }

    /// Returns whether the edge `(v, w)` exists, in `O(1)`.
    #[inline]
    pub fn edge_has(&self, v: usize, w: usize) -> bool {
        self.matrix[v][w]
    }

    /// Inserts the edge `(v, w)`.
    ///
    /// The edge must not already exist; callers guarantee the precondition.
    pub fn edge_add(&mut self, v: usize, w: usize) {
        debug_assert!(v != w, "self-loop at vertex {v}");
        debug_assert!(!self.matrix[v][w], "edge ({v}, {w}) already exists");
        sorted::insert(&mut self.edges[v], w);
        sorted::insert(&mut self.edges[w], v);
        self.matrix[v][w] = true;
        self.matrix[w][v] = true;
        self.number_edges += 1;
    }

    /// Removes the edge `(v, w)`.
    ///
    /// The edge must exist; callers guarantee the precondition.
    pub fn edge_remove(&mut self, v: usize, w: usize) {
        debug_assert!(self.matrix[v][w], "edge ({v}, {w}) does not exist");
        sorted::remove(&mut self.edges[v], w);
        sorted::remove(&mut self.edges[w], v);
        self.matrix[v][w] = false;
        self.matrix[w][v] = false;
        self.number_edges -= 1;
    }

    /// Returns the degree of `v`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.edges[v].len()
    }

    /// Returns the sorted neighbour list of `v`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.edges[v]
    }

    /// Returns whether this graph was produced by induced-subgraph
    /// construction and therefore carries an outer-id map.
    #[inline]
    pub fn is_induced(&self) -> bool {
        self.ids.is_some()
    }

    /// Resolves a local vertex index to its outer-graph id.
    ///
    /// For graphs that are not induced subgraphs this is the identity.
    #[inline]
    pub fn id(&self, v: usize) -> usize {
        match &self.ids {
            Some(ids) => ids[v],
            None => v,
        }
    }

    /// Builds the subgraph induced by `vertex_ids`, with one local vertex
    /// per entry and the outer-id map filled in. `O(k²)` edge probing.
    pub fn induced_subgraph(&self, vertex_ids: &[usize]) -> Graph {
        let k = vertex_ids.len();
        let mut sub = Graph::new(k);
        sub.ids = Some(vertex_ids.to_vec());
        for i in 0..k {
            for j in (i + 1)..k {
                if self.edge_has(vertex_ids[i], vertex_ids[j]) {
                    sub.edge_add(i, j);
                }
            }
        }
        sub
    }

    /// Decomposes the graph into connected components via breadth-first
    /// search; each component is returned as an induced subgraph carrying
    /// its outer-id map.
    pub fn components(&self) -> Vec<Graph> {
        let mut components = Vec::new();
        let mut found = vec![false; self.number_vertices];

        for start in 0..self.number_vertices {
            if found[start] {
                continue;
            }
            let mut vertex_ids = Vec::new();
            let mut queue = VecDeque::new();
            found[start] = true;
            queue.push_back(start);

            while let Some(v) = queue.pop_front() {
                vertex_ids.push(v);
                for &w in self.neighbors(v) {
                    if !found[w] {
                        found[w] = true;
                        queue.push_back(w);
                    }
                }
            }

            components.push(self.induced_subgraph(&vertex_ids));
        }

        components
    }

    /// Returns a walk of at most `max_len` vertices starting at `start`.
    ///
    /// The walk never traverses the immediately-preceding edge back: if the
    /// first listed neighbour equals the previous vertex, the second is
    /// taken instead. It stops early when no eligible neighbour remains.
    pub fn any_walk(&self, start: usize, max_len: usize) -> Vec<usize> {
        let mut path = Vec::with_capacity(max_len);
        path.push(start);
        let mut previous = start;
        let mut current = start;
        for _ in 1..max_len {
            let neighbors = self.neighbors(current);
            let skip_first = usize::from(!neighbors.is_empty() && neighbors[0] == previous);
            if neighbors.len() <= skip_first {
                break;
            }
            previous = current;
            current = neighbors[skip_first];
            path.push(current);
        }
        path
    }
}

// ============================================================================
// graph6 codec
// ============================================================================

/// Errors encountered while decoding or encoding the graph6 format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Graph6Error {
    /// The input string was empty.
    Empty,
    /// A byte outside the printable graph6 range `[63, 126]`.
    InvalidByte {
        /// Offset of the offending byte.
        index: usize,
        /// The offending byte value.
        byte: u8,
    },
    /// Order outside the single-byte encoding (`n > 62`); the multi-byte
    /// order prefixes of the format are not supported.
    UnsupportedOrder {
        /// The requested order.
        n: usize,
    },
    /// Fewer adjacency bytes than the order requires.
    Truncated {
        /// Bytes required for the declared order.
        expected: usize,
        /// Bytes present.
        got: usize,
    },
}

impl fmt::Display for Graph6Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Graph6Error::Empty => write!(f, "empty graph6 string"),
            Graph6Error::InvalidByte { index, byte } => {
                write!(
                    f,
                    "invalid graph6 byte {byte} at offset {index} (expected 63..=126)"
                )
            }
            Graph6Error::UnsupportedOrder { n } => {
                write!(
                    f,
                    "graph order {n} outside the single-byte graph6 range (n <= 62)"
                )
            }
            Graph6Error::Truncated { expected, got } => {
                write!(
                    f,
                    "truncated graph6 string: expected {expected} bytes, got {got}"
                )
            }
        }
    }
}

impl std::error::Error for Graph6Error {}

impl Graph {
    /// Decodes a graph6 string.
    ///
    /// The first byte encodes `n` as `n + 63`; the remaining bytes carry
    /// the upper-triangle adjacency bits in column-major order, six bits
    /// per byte, most significant first, each byte offset by `+63`.
    /// Padding bits past the last adjacency bit are ignored, as are any
    /// surplus bytes.
    ///
    /// # Errors
    /// Rejects empty input, bytes outside `[63, 126]`, multi-byte order
    /// prefixes (`n > 62`), and strings shorter than the order requires.
    pub fn parse_graph6(g6: &str) -> Result<Graph, Graph6Error> {
        let bytes = g6.as_bytes();
        if bytes.is_empty() {
            return Err(Graph6Error::Empty);
        }
        for (index, &byte) in bytes.iter().enumerate() {
            if !(63..=126).contains(&byte) {
                return Err(Graph6Error::InvalidByte { index, byte });
            }
        }

        let n = (bytes[0] - 63) as usize;
        if bytes[0] == 126 {
            return Err(Graph6Error::UnsupportedOrder { n });
        }

        let bit_total = n * n.saturating_sub(1) / 2;
        let expected = 1 + bit_total.div_ceil(6);
        if bytes.len() < expected {
            return Err(Graph6Error::Truncated {
                expected,
                got: bytes.len(),
            });
        }

        let mut g = Graph::new(n);
        let mut idx = 1;
        let mut bit_buffer = 0u8;
        let mut bit_count = 0;
        for i in 1..n {
            for j in 0..i {
                if bit_count == 0 {
                    bit_buffer = bytes[idx] - 63;
                    bit_count = 6;
                    idx += 1;
                }
                bit_count -= 1;
                if (bit_buffer >> bit_count) & 1 == 1 {
                    g.edge_add(i, j);
                }
            }
        }
        Ok(g)
    }

    /// Encodes the graph as a graph6 string, the exact inverse of
    /// [`Graph::parse_graph6`].
    ///
    /// # Errors
    /// Returns [`Graph6Error::UnsupportedOrder`] for `n > 62`.
    pub fn to_graph6(&self) -> Result<String, Graph6Error> {
        let n = self.number_vertices;
        if n > 62 {
            return Err(Graph6Error::UnsupportedOrder { n });
        }

        let mut out = Vec::with_capacity(1 + (n * n / 2).div_ceil(6));
        out.push(n as u8 + 63);

        let mut bit_buffer = 0u8;
        let mut bit_count = 0;
        for i in 1..n {
            for j in 0..i {
                bit_buffer = (bit_buffer << 1) | u8::from(self.edge_has(i, j));
                bit_count += 1;
                if bit_count == 6 {
                    out.push(bit_buffer + 63);
                    bit_buffer = 0;
                    bit_count = 0;
                }
            }
        }
        if bit_count > 0 {
            out.push((bit_buffer << (6 - bit_count)) + 63);
        }

        Ok(String::from_utf8(out).expect("graph6 bytes are printable ASCII"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(v, w) in edges {
            g.edge_add(v, w);
        }
        g
    }

    fn assert_invariants(g: &Graph) {
        let n = g.n();
        let mut degree_sum = 0;
        for v in 0..n {
            let list = g.neighbors(v);
            assert!(
                list.windows(2).all(|w| w[0] < w[1]),
                "list of {v} not strictly increasing"
            );
            degree_sum += list.len();
            for w in 0..n {
                assert_eq!(
                    g.edge_has(v, w),
                    sorted::contains(list, w),
                    "bitmap/list disagree at ({v},{w})"
                );
                assert_eq!(g.edge_has(v, w), g.edge_has(w, v), "asymmetry at ({v},{w})");
            }
            assert!(!g.edge_has(v, v), "self-loop at {v}");
        }
        assert_eq!(degree_sum, 2 * g.m(), "handshaking lemma violated");
    }

    #[test]
    fn random_flips_keep_both_representations_consistent() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);
        let n = 12;
        let mut g = Graph::new(n);
        for _ in 0..2_000 {
            let v = rng.random_range(0..n);
            let mut w = rng.random_range(0..n);
            while w == v {
                w = rng.random_range(0..n);
            }
            if g.edge_has(v, w) {
                g.edge_remove(v, w);
            } else {
                g.edge_add(v, w);
            }
            assert_invariants(&g);
        }
    }

    #[test]
    fn random_graph_respects_invariants() {
        let mut rng = XorShiftRng::seed_from_u64(0xFACE);
        for _ in 0..20 {
            let g = Graph::random(10, 0.4, &mut rng);
            assert_invariants(&g);
        }
    }

    // -------------------------------------------------------------------------
    // graph6
    // -------------------------------------------------------------------------

    #[test]
    fn parse_known_graph6_strings() {
        // "Bw" is the triangle.
        let triangle = Graph::parse_graph6("Bw").unwrap();
        assert_eq!(triangle.n(), 3);
        assert_eq!(triangle.m(), 3);

        // "Ch" is the path 0-1-2-3.
        let path = Graph::parse_graph6("Ch").unwrap();
        assert_eq!(path.n(), 4);
        assert_eq!(path.m(), 3);
        for (v, w) in [(0, 1), (1, 2), (2, 3)] {
            assert!(path.edge_has(v, w), "path missing edge ({v},{w})");
        }

        // "Cs" is the claw with centre 0.
        let claw = Graph::parse_graph6("Cs").unwrap();
        assert_eq!(claw.m(), 3);
        for w in 1..4 {
            assert!(claw.edge_has(0, w));
        }

        // "C~" is the complete graph K4.
        let k4 = Graph::parse_graph6("C~").unwrap();
        assert_eq!(k4.m(), 6);
    }

    #[test]
    fn emit_known_graph6_strings() {
        let triangle = graph_from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
        assert_eq!(triangle.to_graph6().unwrap(), "Bw");

        let path = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(path.to_graph6().unwrap(), "Ch");

        let empty5 = Graph::new(5);
        assert_eq!(empty5.to_graph6().unwrap(), "D??");
    }

    #[test]
    fn graph6_roundtrip_on_random_graphs() {
        let mut rng = XorShiftRng::seed_from_u64(0x66AF);
        for _ in 0..100 {
            let n = rng.random_range(1..20usize);
            let g = Graph::random(n, 0.4, &mut rng);
            let encoded = g.to_graph6().unwrap();
            let decoded = Graph::parse_graph6(&encoded).unwrap();
            assert_eq!(decoded.to_graph6().unwrap(), encoded);
            assert_eq!(g, decoded);
        }
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_eq!(Graph::parse_graph6(""), Err(Graph6Error::Empty));
        assert!(matches!(
            Graph::parse_graph6("C\n"),
            Err(Graph6Error::InvalidByte { .. })
        ));
        assert!(matches!(
            Graph::parse_graph6("C"),
            Err(Graph6Error::Truncated { .. })
        ));
        assert!(matches!(
            Graph::parse_graph6("~??"),
            Err(Graph6Error::UnsupportedOrder { .. })
        ));
    }

    #[test]
    fn emit_rejects_large_order() {
        let g = Graph::new(63);
        assert_eq!(g.to_graph6(), Err(Graph6Error::UnsupportedOrder { n: 63 }));
    }

    // -------------------------------------------------------------------------
    // Induced subgraphs and components
    // -------------------------------------------------------------------------

    #[test]
    fn induced_subgraph_copies_present_edges_and_ids() {
        let g = graph_from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (0, 4)]);
        let sub = g.induced_subgraph(&[1, 2, 4]);
        assert_eq!(sub.n(), 3);
        assert!(sub.is_induced());
        assert_eq!(sub.id(0), 1);
        assert_eq!(sub.id(2), 4);
        assert!(sub.edge_has(0, 1)); // 1-2
        assert!(!sub.edge_has(0, 2)); // 1-4 absent in g
        assert_eq!(sub.m(), 1);
    }

    #[test]
    fn components_partition_the_vertices() {
        // Triangle, an edge, and an isolated vertex.
        let g = graph_from_edges(6, &[(0, 1), (0, 2), (1, 2), (3, 4)]);
        let components = g.components();
        assert_eq!(components.len(), 3);

        let mut seen = vec![false; 6];
        for c in &components {
            assert!(c.is_induced());
            for v in 0..c.n() {
                let outer = c.id(v);
                assert!(!seen[outer], "vertex {outer} in two components");
                seen[outer] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));

        let sizes: Vec<usize> = components.iter().map(Graph::n).collect();
        assert_eq!(sizes, vec![3, 2, 1]);
        assert_eq!(components[0].m(), 3);
        assert_eq!(components[1].m(), 1);
    }

    // -------------------------------------------------------------------------
    // Walks
    // -------------------------------------------------------------------------

    #[test]
    fn any_walk_follows_a_path() {
        let path = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(path.any_walk(0, 4), vec![0, 1, 2, 3]);
        // From the middle, the walk must not bounce straight back.
        assert_eq!(path.any_walk(1, 3), vec![1, 0]);
    }

    #[test]
    fn any_walk_traverses_a_cycle() {
        let cycle = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
        assert_eq!(cycle.any_walk(0, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn any_walk_stops_at_dead_ends() {
        let single_edge = graph_from_edges(3, &[(0, 1)]);
        assert_eq!(single_edge.any_walk(0, 4), vec![0, 1]);
        assert_eq!(single_edge.any_walk(2, 4), vec![2]);
    }
}

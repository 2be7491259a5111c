//! Merge and search primitives over strictly increasing integer sequences.
//!
//! Neighbour lists are kept sorted and duplicate-free, so set algebra on
//! them reduces to linear two-pointer merges and binary searches. These
//! functions are the hot inner loops of the clique enumerator.

/// Returns whether the sorted sequence contains `x`.
#[inline]
pub fn contains(seq: &[usize], x: usize) -> bool {
    seq.binary_search(&x).is_ok()
}

/// Inserts `x` at its sorted position, keeping the sequence duplicate-free.
#[inline]
pub fn insert(seq: &mut Vec<usize>, x: usize) {
    if let Err(pos) = seq.binary_search(&x) {
        seq.insert(pos, x);
    }
}

/// Removes `x` if present, preserving the ordering of the rest.
#[inline]
pub fn remove(seq: &mut Vec<usize>, x: usize) {
    if let Ok(pos) = seq.binary_search(&x) {
        seq.remove(pos);
    }
}

/// Merges two sorted sequences into their sorted union in `O(|a| + |b|)`.
pub fn union(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Intersects two sorted sequences in `O(|a| + |b|)`.
pub fn intersection(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Returns the elements of `a` that are not in `b`, in `O(|a| + |b|)`.
pub fn difference(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() {
        if j >= b.len() || a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if a[i] == b[j] {
            i += 1;
            j += 1;
        } else {
            j += 1;
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

//! Online longest-match overlap resolution
//!
//! Candidates arrive in the order the matcher discovers them: by end position,
//! and for one end position from longest to shortest. The retained spans are
//! kept pairwise disjoint and ordered by start.

use crate::automaton::NodeId;

/// A boundary-checked match waiting for overlap resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Start, in characters, inclusive
    pub start: usize,
    /// End, in characters, exclusive
    pub end: usize,
    /// Terminal node carrying the identifiers
    pub node: NodeId,
}

impl Candidate {
    /// Length in characters
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length candidate
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open interval intersection
    #[inline]
    pub fn overlaps(&self, other: &Candidate) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Greedy resolver keeping the longest of overlapping candidates
///
/// - No overlap: the candidate is retained.
/// - Overlap: the candidate replaces every span it overlaps if it is strictly
///   longer than each of them; otherwise it is discarded. Equal lengths keep
///   the span seen first.
#[derive(Debug, Default)]
pub struct OverlapResolver {
    retained: Vec<Candidate>,
}

impl OverlapResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate; returns whether it was retained
    ///
    /// Candidates must not end before any previously offered candidate. Under
    /// that ordering every span overlapping the candidate sits at the tail of
    /// the retained list.
    pub fn offer(&mut self, candidate: Candidate) -> bool {
        let first_overlap = self
            .retained
            .iter()
            .rposition(|kept| !kept.overlaps(&candidate))
            .map_or(0, |last_disjoint| last_disjoint + 1);

        let overlapped = &self.retained[first_overlap..];
        if overlapped.iter().any(|kept| kept.len() >= candidate.len()) {
            return false;
        }

        self.retained.truncate(first_overlap);
        self.retained.push(candidate);
        true
    }

    /// Spans retained so far, ordered by start
    pub fn retained(&self) -> &[Candidate] {
        &self.retained
    }

    /// Consume the resolver, yielding disjoint spans ordered by start
    pub fn into_retained(self) -> Vec<Candidate> {
        self.retained
    }
}

//! Single-pass scanning of text against an automaton
//!
//! The scan visits every character once. At each position the current state
//! and its fail chain are checked for outputs; each hit becomes a candidate
//! that goes through identifier exclusion, the Hangul boundary heuristic and
//! the overlap resolver before the next character is read.

use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, Identifiers, ROOT};
use crate::boundary;
use crate::overlap::{Candidate, OverlapResolver};

/// A resolved occurrence of an indexed expression
///
/// Offsets count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Start, inclusive
    pub start: usize,
    /// End, exclusive
    pub end: usize,
    /// Identifiers linked by this span, excluded identifier removed
    pub ids: Identifiers,
    /// Matched expression text
    pub expression: String,
}

impl MatchSpan {
    /// Length in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length span
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open interval intersection
    pub fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Find every linkable expression in `text`
///
/// Returns disjoint spans ordered by start. `exclude` removes one identifier
/// from every span (typically the entry whose page is being rendered); a span
/// left without identifiers is dropped. Never fails: an empty automaton or
/// empty text yields an empty result.
pub fn scan(automaton: &Automaton, text: &str, exclude: Option<&str>) -> Vec<MatchSpan> {
    if automaton.is_empty() || text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut resolver = OverlapResolver::new();
    let mut state = ROOT;

    for (position, &ch) in chars.iter().enumerate() {
        state = automaton.next_state(state, ch);

        let mut check = state;
        while check != ROOT {
            let node = automaton.node(check);
            if let Some((ids, _)) = node.terminal() {
                let end = position + 1;
                let start = end - node.depth();
                if keeps_any(ids, exclude) && !boundary::is_embedded(&chars, start, end) {
                    resolver.offer(Candidate {
                        start,
                        end,
                        node: check,
                    });
                }
            }
            check = node.fail();
        }
    }

    resolver
        .into_retained()
        .into_iter()
        .filter_map(|candidate| materialize(automaton, candidate, exclude))
        .collect()
}

#[inline]
fn keeps_any(ids: &[String], exclude: Option<&str>) -> bool {
    match exclude {
        Some(excluded) => ids.iter().any(|id| id != excluded),
        None => !ids.is_empty(),
    }
}

fn materialize(
    automaton: &Automaton,
    candidate: Candidate,
    exclude: Option<&str>,
) -> Option<MatchSpan> {
    let (ids, expression) = automaton.node(candidate.node).terminal()?;
    let ids: Identifiers = ids
        .iter()
        .filter(|id| Some(id.as_str()) != exclude)
        .cloned()
        .collect();
    if ids.is_empty() {
        return None;
    }
    Some(MatchSpan {
        start: candidate.start,
        end: candidate.end,
        ids,
        expression: expression.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;

    fn ids(span: &MatchSpan) -> Vec<&str> {
        span.ids.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_longer_match_replaces_prefix() {
        let automaton = build([("id1", "안녕"), ("id2", "안녕하세요")]).unwrap();
        let spans = scan(&automaton, "안녕하세요!", None);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 5);
        assert_eq!(spans[0].expression, "안녕하세요");
        assert_eq!(ids(&spans[0]), ["id2"]);
    }

    #[test]
    fn test_embedded_short_match_is_suppressed() {
        let automaton = build([("id1", "시"), ("id2", "아시아")]).unwrap();
        let spans = scan(&automaton, "아시아는 크다", None);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].expression, "아시아");
        assert_eq!((spans[0].start, spans[0].end), (0, 3));
    }

    #[test]
    fn test_short_match_before_space_is_kept() {
        let automaton = build([("id1", "에"), ("id2", "아시아")]).unwrap();
        let spans = scan(&automaton, "아시아에 가다", None);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].expression, "아시아");
        assert_eq!(spans[1].expression, "에");
        assert_eq!((spans[1].start, spans[1].end), (3, 4));
    }

    #[test]
    fn test_homonyms_share_one_span() {
        let automaton = build([("idA", "김"), ("idB", "김")]).unwrap();
        let spans = scan(&automaton, "김치...", None);
        assert_eq!(spans.len(), 1);
        assert_eq!(ids(&spans[0]), ["idA", "idB"]);
    }

    #[test]
    fn test_exclusion_drops_sole_identifier() {
        let automaton = build([("id2", "안녕하세요")]).unwrap();
        assert!(scan(&automaton, "안녕하세요!", Some("id2")).is_empty());
    }

    #[test]
    fn test_exclusion_happens_before_overlap_resolution() {
        // The excluded long match never competes, so the shorter prefix survives
        let automaton = build([("id1", "안녕"), ("id2", "안녕하세요")]).unwrap();
        let spans = scan(&automaton, "안녕하세요!", Some("id2"));
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].expression, "안녕");
        assert_eq!(ids(&spans[0]), ["id1"]);
    }

    #[test]
    fn test_exclusion_reduces_homonyms() {
        let automaton = build([("idA", "김"), ("idB", "김")]).unwrap();
        let spans = scan(&automaton, "김 한 장", Some("idA"));
        assert_eq!(spans.len(), 1);
        assert_eq!(ids(&spans[0]), ["idB"]);
    }

    #[test]
    fn test_empty_inputs() {
        let automaton = build([("a", "김")]).unwrap();
        assert!(scan(&automaton, "", None).is_empty());
        assert!(scan(&Automaton::empty(), "김", None).is_empty());
        assert!(scan(&automaton, "no hangul here", None).is_empty());
    }

    #[test]
    fn test_offsets_count_code_points() {
        let automaton = build([("e", "에")]).unwrap();
        // Emoji is outside the BMP: one code point, two UTF-16 units, four bytes
        let spans = scan(&automaton, "😀 에", None);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (2, 3));
    }

    #[test]
    fn test_match_found_through_fail_chain() {
        let automaton = build([("long", "한국어사전"), ("word", "국어")]).unwrap();
        // "한국어" starts the long pattern, then diverges; "국어" must still be found
        let spans = scan(&automaton, "한국어 공부", None);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].expression, "국어");
        assert_eq!((spans[0].start, spans[0].end), (1, 3));
    }

    #[test]
    fn test_multiple_disjoint_matches_are_ordered() {
        let automaton = build([("a", "사과"), ("b", "바나나")]).unwrap();
        let spans = scan(&automaton, "바나나와 사과", None);
        let found: Vec<&str> = spans.iter().map(|s| s.expression.as_str()).collect();
        assert_eq!(found, ["바나나", "사과"]);
        assert!(spans.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn test_span_overlap_helper() {
        let left = MatchSpan {
            start: 0,
            end: 3,
            ids: Identifiers::new(),
            expression: "아시아".to_string(),
        };
        let right = MatchSpan {
            start: 3,
            end: 4,
            ids: Identifiers::new(),
            expression: "에".to_string(),
        };
        assert!(!left.overlaps(&right));
        assert_eq!(left.len(), 3);
    }
}

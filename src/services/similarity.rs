//! Similarity metrics between a reference artwork and a candidate.
//!
//! Every function here is pure: the same reference and candidate always
//! produce the same breakdown.

use std::collections::HashSet;
use std::hash::Hash;

use crate::models::{CandidateArtwork, ContentId, ReferenceArtwork};

/// Per-metric weights of the similarity score
pub mod weights {
    pub const SAME_ARTIST: f64 = 1.5;
    pub const STYLE: f64 = 2.5;
    pub const GENRE: f64 = 2.0;
    pub const PERIOD: f64 = 1.5;
    pub const TECHNIQUE: f64 = 1.5;
    pub const TAGS: f64 = 3.0;
    pub const DICTIONARIES: f64 = 2.5;
    pub const TEMPORAL: f64 = 1.0;

    /// Score of a candidate matching the reference on every metric
    pub const MAX_SCORE: f64 =
        SAME_ARTIST + STYLE + GENRE + PERIOD + TECHNIQUE + TAGS + DICTIONARIES + TEMPORAL;
}

/// Year difference at which temporal proximity reaches zero
const TEMPORAL_SPAN_YEARS: f64 = 100.0;

/// Jaccard similarity of two sets: |A ∩ B| / |A ∪ B|.
///
/// Returns 0 when either set is empty.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Splits a comma-separated tag list into trimmed, non-empty tokens
pub fn tag_tokens(tags: Option<&str>) -> HashSet<&str> {
    tags.map(|t| {
        t.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn exact_match(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => 0.0,
    }
}

fn dictionary_overlap(a: Option<&[i64]>, b: Option<&[i64]>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let a: HashSet<i64> = a.iter().copied().collect();
            let b: HashSet<i64> = b.iter().copied().collect();
            jaccard(&a, &b)
        }
        _ => 0.0,
    }
}

fn temporal_proximity(a: Option<i32>, b: Option<i32>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let diff = (i64::from(a) - i64::from(b)).abs() as f64;
            (1.0 - diff / TEMPORAL_SPAN_YEARS).max(0.0)
        }
        _ => 0.0,
    }
}

/// Unweighted value of each metric, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimilarityBreakdown {
    pub same_artist: f64,
    pub style: f64,
    pub genre: f64,
    pub period: f64,
    pub technique: f64,
    pub tags: f64,
    pub dictionaries: f64,
    pub temporal: f64,
}

impl SimilarityBreakdown {
    /// Weighted sum of all metrics, before diversity damping
    pub fn raw_score(&self) -> f64 {
        self.same_artist * weights::SAME_ARTIST
            + self.style * weights::STYLE
            + self.genre * weights::GENRE
            + self.period * weights::PERIOD
            + self.technique * weights::TECHNIQUE
            + self.tags * weights::TAGS
            + self.dictionaries * weights::DICTIONARIES
            + self.temporal * weights::TEMPORAL
    }

    /// Raw score discounted for same-artist candidates
    pub fn damped_score(&self, diversity_factor: f64) -> f64 {
        let raw = self.raw_score();
        if diversity_factor > 0.0 {
            raw * (1.0 - self.same_artist * diversity_factor)
        } else {
            raw
        }
    }
}

/// Scores `candidate` against `reference`, where `artist_id` is the anchor artist
pub fn score_candidate(
    reference: &ReferenceArtwork,
    candidate: &CandidateArtwork,
    artist_id: ContentId,
) -> SimilarityBreakdown {
    let same_artist = if candidate.artist_id() == Some(artist_id) {
        1.0
    } else {
        0.0
    };

    SimilarityBreakdown {
        same_artist,
        style: exact_match(reference.style.as_deref(), candidate.style.as_deref()),
        genre: exact_match(reference.genre.as_deref(), candidate.genre.as_deref()),
        period: exact_match(reference.period.as_deref(), candidate.period.as_deref()),
        technique: exact_match(
            reference.technique.as_deref(),
            candidate.technique.as_deref(),
        ),
        tags: jaccard(
            &tag_tokens(reference.tags.as_deref()),
            &tag_tokens(candidate.tags.as_deref()),
        ),
        dictionaries: dictionary_overlap(
            reference.dictionaries.as_deref(),
            candidate.dictionaries.as_deref(),
        ),
        temporal: temporal_proximity(reference.completition_year, candidate.completition_year),
    }
}

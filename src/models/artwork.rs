use serde::{Deserialize, Serialize};

/// Catalog identifier shared by artworks and artists
pub type ContentId = i64;

/// The artwork used as the similarity anchor for a recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceArtwork {
    pub content_id: ContentId,
    pub completition_year: Option<i32>,
    /// Comma-separated free-text labels
    pub tags: Option<String>,
    /// Category-tag identifiers
    pub dictionaries: Option<Vec<i64>>,
    pub style: Option<String>,
    pub genre: Option<String>,
    pub period: Option<String>,
    pub technique: Option<String>,
}

/// Artist reference embedded in a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRef {
    pub content_id: ContentId,
    pub artist_name: Option<String>,
}

/// An artwork eligible to be scored against the reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateArtwork {
    pub content_id: ContentId,
    pub title: Option<String>,
    pub image: Option<String>,
    pub year_as_string: Option<String>,
    pub completition_year: Option<i32>,
    pub tags: Option<String>,
    pub dictionaries: Option<Vec<i64>>,
    pub style: Option<String>,
    pub genre: Option<String>,
    pub period: Option<String>,
    pub technique: Option<String>,
    /// `None` when the artwork's artist could not be resolved
    pub artist: Option<ArtistRef>,
}

impl CandidateArtwork {
    pub fn artist_id(&self) -> Option<ContentId> {
        self.artist.as_ref().map(|a| a.content_id)
    }

    /// Attribute view used when this artwork serves as a reference
    pub fn as_reference(&self) -> ReferenceArtwork {
        ReferenceArtwork {
            content_id: self.content_id,
            completition_year: self.completition_year,
            tags: self.tags.clone(),
            dictionaries: self.dictionaries.clone(),
            style: self.style.clone(),
            genre: self.genre.clone(),
            period: self.period.clone(),
            technique: self.technique.clone(),
        }
    }
}

/// A candidate with its computed similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub artwork: CandidateArtwork,
    pub score: f64,
}

/// Inclusive completion-year window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Window of `half_width` years on either side of `year`
    pub fn around(year: i32, half_width: i32) -> Self {
        Self {
            min: year.saturating_sub(half_width),
            max: year.saturating_add(half_width),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// Entry of the category-tag catalog referenced by `dictionaries`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dictionary {
    pub id: i64,
    pub title: String,
    #[sqlx(rename = "group_name")]
    pub group: Option<String>,
}

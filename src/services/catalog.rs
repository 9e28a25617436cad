//! Artwork storage abstraction
//!
//! The recommender reads the catalog through the [`ArtworkStore`] trait so the
//! Postgres store can be swapped for the in-memory snapshot in tests and local
//! runs.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{CandidateArtwork, ContentId, Dictionary, ReferenceArtwork, YearRange},
};

/// Read-only access to the artwork catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtworkStore: Send + Sync {
    /// Fetch one artwork attributed to `artist_id`
    ///
    /// Implementations must pick deterministically for a given snapshot; both
    /// stores in this crate return the artwork with the lowest content id.
    async fn fetch_one_artwork_by_artist(
        &self,
        artist_id: ContentId,
    ) -> AppResult<Option<ReferenceArtwork>>;

    /// Fetch every artwork except `exclude_id`, optionally restricted to a
    /// completion-year window. Artworks with an unknown year fall outside any
    /// window. Results are ordered by ascending content id.
    async fn fetch_candidate_pool(
        &self,
        exclude_id: ContentId,
        year_range: Option<YearRange>,
    ) -> AppResult<Vec<CandidateArtwork>>;

    /// List the category-tag catalog
    async fn list_dictionaries(&self) -> AppResult<Vec<Dictionary>>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Catalog snapshot held in memory
///
/// Public so integration tests and local runs without Postgres can seed a
/// catalog through [`Self::with_artworks`], [`Self::upsert_artwork`] and
/// [`Self::set_dictionaries`].
#[derive(Clone, Default)]
pub struct InMemoryArtworkStore {
    inner: Arc<RwLock<Snapshot>>,
}

#[derive(Default)]
struct Snapshot {
    artworks: Vec<CandidateArtwork>,
    dictionaries: Vec<Dictionary>,
}

impl InMemoryArtworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artworks(mut artworks: Vec<CandidateArtwork>) -> Self {
        artworks.sort_by_key(|a| a.content_id);
        Self {
            inner: Arc::new(RwLock::new(Snapshot {
                artworks,
                dictionaries: Vec::new(),
            })),
        }
    }

    /// Inserts or replaces an artwork, keeping content-id order
    pub async fn upsert_artwork(&self, artwork: CandidateArtwork) {
        let mut inner = self.inner.write().await;
        match inner
            .artworks
            .binary_search_by_key(&artwork.content_id, |a| a.content_id)
        {
            Ok(pos) => inner.artworks[pos] = artwork,
            Err(pos) => inner.artworks.insert(pos, artwork),
        }
    }

    pub async fn set_dictionaries(&self, dictionaries: Vec<Dictionary>) {
        self.inner.write().await.dictionaries = dictionaries;
    }
}

#[async_trait::async_trait]
impl ArtworkStore for InMemoryArtworkStore {
    async fn fetch_one_artwork_by_artist(
        &self,
        artist_id: ContentId,
    ) -> AppResult<Option<ReferenceArtwork>> {
        let inner = self.inner.read().await;
        Ok(inner
            .artworks
            .iter()
            .find(|a| a.artist_id() == Some(artist_id))
            .map(CandidateArtwork::as_reference))
    }

    async fn fetch_candidate_pool(
        &self,
        exclude_id: ContentId,
        year_range: Option<YearRange>,
    ) -> AppResult<Vec<CandidateArtwork>> {
        let inner = self.inner.read().await;
        Ok(inner
            .artworks
            .iter()
            .filter(|a| a.content_id != exclude_id)
            .filter(|a| match year_range {
                Some(range) => a.completition_year.is_some_and(|y| range.contains(y)),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn list_dictionaries(&self) -> AppResult<Vec<Dictionary>> {
        Ok(self.inner.read().await.dictionaries.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

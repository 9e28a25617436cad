use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateArtwork, ContentId, ScoredCandidate, YearRange},
    services::{catalog::ArtworkStore, similarity::score_candidate},
};

/// Caller-tunable knobs of a single recommendation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendOptions {
    pub limit: usize,
    pub include_time_range: bool,
    /// Same-artist discount and cap, in [0, 1)
    pub diversity_factor: f64,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            limit: 25,
            include_time_range: true,
            diversity_factor: 0.3,
        }
    }
}

impl RecommendOptions {
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..1.0).contains(&self.diversity_factor) {
            return Err(AppError::InvalidInput(format!(
                "diversityFactor must be in [0, 1), got {}",
                self.diversity_factor
            )));
        }
        Ok(())
    }

    /// Maximum number of results a single artist may contribute
    pub fn per_artist_cap(&self) -> usize {
        let cap = (self.limit as f64 * (1.0 - self.diversity_factor)).ceil() as usize;
        cap.max(1)
    }
}

/// Deployment-level recommender settings
#[derive(Debug, Clone)]
pub struct RecommenderSettings {
    /// Half-width of the completion-year window
    pub year_window: i32,
    /// Thumbnail-size marker removed from image URLs
    pub thumbnail_marker: String,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            year_window: 50,
            thumbnail_marker: "!Large.jpg".to_string(),
        }
    }
}

/// Recommends artworks similar to a reference work of an anchor artist
///
/// Results are recomputed on every call; nothing is cached or persisted.
#[derive(Clone)]
pub struct SimilarityRecommender {
    store: Arc<dyn ArtworkStore>,
    settings: RecommenderSettings,
}

impl SimilarityRecommender {
    pub fn new(store: Arc<dyn ArtworkStore>, settings: RecommenderSettings) -> Self {
        Self { store, settings }
    }

    /// Best-effort recommendations for `artist_id`.
    ///
    /// Failures are logged and yield an empty list, so a recommendation widget
    /// can always render. Use [`Self::try_recommend`] to observe the error.
    pub async fn recommend(
        &self,
        artist_id: ContentId,
        options: RecommendOptions,
    ) -> Vec<ScoredCandidate> {
        match self.try_recommend(artist_id, options).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(
                    artist_id,
                    store = self.store.name(),
                    error = %e,
                    "Recommendation unavailable"
                );
                Vec::new()
            }
        }
    }

    /// Recommendations for `artist_id`, surfacing storage and argument errors.
    ///
    /// An artist with no artworks is not an error and yields an empty list.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn try_recommend(
        &self,
        artist_id: ContentId,
        options: RecommendOptions,
    ) -> AppResult<Vec<ScoredCandidate>> {
        options.validate()?;
        if options.limit == 0 {
            return Ok(Vec::new());
        }

        let start = Instant::now();

        let Some(reference) = self.store.fetch_one_artwork_by_artist(artist_id).await? else {
            tracing::debug!(artist_id, "No reference artwork for artist");
            return Ok(Vec::new());
        };

        let year_range = match reference.completition_year {
            Some(year) if options.include_time_range => {
                Some(YearRange::around(year, self.settings.year_window))
            }
            _ => None,
        };

        let pool = self
            .store
            .fetch_candidate_pool(reference.content_id, year_range)
            .await?;
        let pool_size = pool.len();

        let mut scored: Vec<ScoredCandidate> = pool
            .into_iter()
            .filter(|c| c.content_id != reference.content_id)
            .map(|artwork| {
                let score = score_candidate(&reference, &artwork, artist_id)
                    .damped_score(options.diversity_factor);
                ScoredCandidate { artwork, score }
            })
            .collect();

        // Stable: equal scores keep the store's content-id order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let results: Vec<ScoredCandidate> = cap_per_artist(scored, options)
            .into_iter()
            .map(|mut candidate| {
                self.normalize_image(&mut candidate.artwork);
                candidate
            })
            .collect();

        tracing::info!(
            artist_id,
            reference_id = reference.content_id,
            windowed = year_range.is_some(),
            pool_size,
            returned = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations computed"
        );

        Ok(results)
    }

    fn normalize_image(&self, artwork: &mut CandidateArtwork) {
        let marker = self.settings.thumbnail_marker.as_str();
        if marker.is_empty() {
            return;
        }
        if let Some(image) = artwork.image.as_mut() {
            if image.contains(marker) {
                *image = image.replacen(marker, "", 1);
            }
        }
    }
}

/// Walks the score-sorted list admitting at most `per_artist_cap` items per
/// artist, stopping once `limit` items are admitted. Candidates without an
/// artist are dropped.
fn cap_per_artist(sorted: Vec<ScoredCandidate>, options: RecommendOptions) -> Vec<ScoredCandidate> {
    let cap = options.per_artist_cap();
    let mut counts: HashMap<ContentId, usize> = HashMap::new();
    let mut admitted = Vec::with_capacity(options.limit.min(sorted.len()));

    for candidate in sorted {
        if admitted.len() == options.limit {
            break;
        }
        let Some(artist_id) = candidate.artwork.artist_id() else {
            continue;
        };
        let count = counts.entry(artist_id).or_insert(0);
        if *count >= cap {
            continue;
        }
        *count += 1;
        admitted.push(candidate);
    }

    admitted
}

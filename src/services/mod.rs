pub mod catalog;
pub mod dictionaries;
pub mod recommendations;
pub mod similarity;

pub use catalog::{ArtworkStore, InMemoryArtworkStore};
pub use dictionaries::DictionaryService;
pub use recommendations::{RecommendOptions, RecommenderSettings, SimilarityRecommender};

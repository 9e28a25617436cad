pub mod artwork;

pub use artwork::{
    ArtistRef, CandidateArtwork, ContentId, Dictionary, ReferenceArtwork, ScoredCandidate,
    YearRange,
};

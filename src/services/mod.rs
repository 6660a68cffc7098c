pub mod aggregator;
pub mod encoder;
pub mod providers;
pub mod recommendation;
pub mod scorer;

pub use aggregator::SignalAggregator;
pub use encoder::{FeatureEncoder, FeatureVector};
pub use recommendation::{RecommendationEngine, CANDIDATE_CROPS};
pub use scorer::CandidateScorer;

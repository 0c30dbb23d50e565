pub mod comparator;
pub mod dedup;
pub mod fit_scoring;

pub use comparator::{ComparisonResult, SkillComparator};
pub use dedup::{dedupe, DedupMode, DedupOutcome, DEFAULT_SIMILARITY_THRESHOLD};
pub use fit_scoring::{FitScorer, ScoreBreakdown, ScoreCard, ScoreInputs, ScoringWeights, WeightedFitScorer};

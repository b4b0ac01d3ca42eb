pub mod engine;
pub mod priority;

pub use engine::{calculate_score, score_breakdown, FactorContribution, ScoreBreakdown, ScoreInputs, MAX_SCORE};
pub use priority::{priority, ParsePriorityError, Priority};

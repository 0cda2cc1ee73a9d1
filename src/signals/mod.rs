// =============================================================================
// Signals Module
// =============================================================================
//
// Decision pipeline on top of the indicator snapshot:
// - Per-indicator opinions and the vote tally
// - Trade levels (stop loss / take profit) for actionable signals
// - Sentiment annotation
// - The decision engine tying them together

pub mod decision;
pub mod levels;
pub mod sentiment;
pub mod votes;

pub use decision::{DecisionEngine, VoteOutcome};
pub use levels::{TakeProfitCandidate, TakeProfitSource, TradeLevels};
pub use sentiment::{SentimentBias, SentimentSnapshot, SentimentSource};
pub use votes::{Side, Vote, VoteTally};

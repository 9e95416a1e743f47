pub mod answer_codec;
pub mod answer_matcher;
pub mod answer_resolver;
pub mod status_reporter;

pub use answer_codec::AnswerValue;
pub use answer_matcher::{AnswerBank, AnswerMatcher, MatchOutcome, MatchResult};
pub use answer_resolver::{AnswerResolver, BankResolver, PositionalResolver};
pub use status_reporter::{StatusLevel, StatusReporter, StatusSink};

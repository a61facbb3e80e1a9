//! Landlord questions grounded in previously detected listing issues.
//!
//! [`tag`] turns red flags, missing info, photo issues and negative student
//! comments into [`Flag`]s with request-unique ids. [`QuestionSynthesizer`]
//! asks a [`QuestionModel`] to phrase questions citing only those ids, rejects
//! every candidate that cites anything else, and falls back to a single
//! composite question when the generated set is unusable.
//!
//! Every returned [`Question`] cites only ids from its own request.

pub mod errors;
pub mod fallback;
pub mod flags;
pub mod parse;
pub mod prompt;
pub mod synthesizer;
pub mod telemetry;
pub mod validate;

pub use errors::QuestionError;
pub use fallback::compose_fallback;
pub use flags::{
    ConcernSource, Flag, FlagType, IssueRecord, MissingInfoRecord, PhotoIssueRecord,
    RedFlagRecord, Severity, TaggedFlags, tag,
};
pub use parse::{CandidateQuestion, CandidateSet};
pub use synthesizer::{QuestionModel, QuestionSource, QuestionSynthesizer, SynthesisOutcome};
pub use telemetry::audit_dump::{AuditRun, AuditTrail};
pub use validate::{
    FallbackReason, Question, QuestionCategory, RejectedCandidate, RejectionReason, ValidationReport,
};

//! Journal Domain
//!
//! This crate models an athlete's training journal: session entries, the
//! structured extraction derived from entry notes, action packs, coach
//! comments, training-partner profiles, saved searches and the coach roster.
//!
//! # Entry Lifecycle
//!
//! ```text
//! draft -> validated Entry -> extraction -> action pack -> stored
//!              ^                                         |
//!              +----------------- revise ----------------+
//! ```

pub mod vocabulary;
pub mod entry;
pub mod extraction;
pub mod action_pack;
pub mod comment;
pub mod partner;
pub mod search;
pub mod roster;
pub mod ports;
pub mod error;

pub use entry::{Entry, EntryDraft, RoundLog, SessionMetrics, SessionType, Outcome};
pub use extraction::{
    StructuredExtraction, ExtractedOutcome, ExtractionSource, ExtractionPort, KeywordExtractor,
};
pub use action_pack::ActionPack;
pub use comment::Comment;
pub use partner::{Belt, PartnerDraft, PartnerProfile, PartnerRecord};
pub use search::{EntryQuery, SavedSearch};
pub use roster::CoachLink;
pub use ports::JournalPort;
pub use error::JournalError;

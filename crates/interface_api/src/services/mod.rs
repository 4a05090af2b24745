//! Application services
//!
//! Services orchestrate the domain and the ports for one request. They hold
//! no state beyond shared port handles and settings, so they are cheap to
//! clone into every handler.

pub mod journal;
pub mod progress;

pub use journal::JournalService;
pub use progress::{CheckoffDetail, ProgressService, ReviewOutcome};

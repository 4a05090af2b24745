//! Progress Domain
//!
//! This crate tracks how an athlete's skills develop over time: checkoffs
//! certified by reviewed evidence, free-form annotations, and the derived
//! progress views report (summary, timeline, heatmap and trends).
//!
//! # Checkoff Lifecycle
//!
//! ```text
//! pending -> earned -> superseded -> revalidated
//!                          ^              |
//!                          +--------------+
//! ```
//!
//! Transitions are driven purely by the confirmed evidence count against the
//! checkoff's threshold; see [`checkoff::next_status`].

pub mod checkoff;
pub mod evidence;
pub mod annotation;
pub mod views;
pub mod ports;
pub mod error;

pub use checkoff::{Checkoff, CheckoffStatus, StatusChange, next_status, skill_slug};
pub use evidence::{Evidence, EvidenceSource, EvidenceStatus, ReviewDecision};
pub use annotation::{Annotation, AnnotationDraft};
pub use views::{
    build_report, CheckoffCounts, HeatmapCell, ProgressFilter, ProgressReport, ReportInputs,
    Summary, TimelineEvent, TimelineKind, TrendPoint,
};
pub use ports::ProgressPort;
pub use error::ProgressError;

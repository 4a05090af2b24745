//! Journal Domain Ports
//!
//! The `JournalPort` trait defines everything the journal needs from its
//! storage. The single-table adapter lives in `infra_store`; tests use the
//! same adapter over the in-memory backend.
//!
//! ```rust,ignore
//! use domain_journal::JournalPort;
//! use std::sync::Arc;
//!
//! let journal: Arc<dyn JournalPort> = Arc::new(JournalRepository::new(store));
//! let entries = journal.list_entries(&athlete_id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{
    CommentId, DomainPort, EntryId, HealthCheckable, PartnerId, PortError, SavedSearchId, UserId,
};

use crate::comment::Comment;
use crate::entry::Entry;
use crate::partner::PartnerProfile;
use crate::roster::CoachLink;
use crate::search::SavedSearch;

/// Storage port for the journal domain
///
/// Records are always addressed through their owning athlete. Saves are
/// whole-record overwrites; `create_*`/`link_*` methods are create-once and
/// fail with `PortError::Conflict` when the record already exists.
#[async_trait]
pub trait JournalPort: DomainPort + HealthCheckable {
    // ========================================================================
    // Entries
    // ========================================================================

    async fn save_entry(&self, entry: &Entry) -> Result<(), PortError>;

    /// Returns `PortError::NotFound` when absent
    async fn get_entry(&self, athlete: &UserId, id: EntryId) -> Result<Entry, PortError>;

    async fn list_entries(&self, athlete: &UserId) -> Result<Vec<Entry>, PortError>;

    async fn delete_entry(&self, athlete: &UserId, id: EntryId) -> Result<(), PortError>;

    // ========================================================================
    // Comments
    // ========================================================================

    async fn save_comment(&self, comment: &Comment) -> Result<(), PortError>;

    async fn get_comment(
        &self,
        athlete: &UserId,
        entry: EntryId,
        id: CommentId,
    ) -> Result<Comment, PortError>;

    /// Comments on one entry, oldest first
    async fn list_comments(&self, athlete: &UserId, entry: EntryId) -> Result<Vec<Comment>, PortError>;

    async fn delete_comment(&self, athlete: &UserId, entry: EntryId, id: CommentId) -> Result<(), PortError>;

    // ========================================================================
    // Partners
    // ========================================================================

    async fn save_partner(&self, partner: &PartnerProfile) -> Result<(), PortError>;

    async fn get_partner(&self, athlete: &UserId, id: PartnerId) -> Result<PartnerProfile, PortError>;

    async fn list_partners(&self, athlete: &UserId) -> Result<Vec<PartnerProfile>, PortError>;

    async fn delete_partner(&self, athlete: &UserId, id: PartnerId) -> Result<(), PortError>;

    // ========================================================================
    // Saved searches
    // ========================================================================

    /// Create-once by case-insensitive name
    async fn create_saved_search(&self, search: &SavedSearch) -> Result<(), PortError>;

    async fn get_saved_search(&self, athlete: &UserId, id: SavedSearchId) -> Result<SavedSearch, PortError>;

    async fn list_saved_searches(&self, athlete: &UserId) -> Result<Vec<SavedSearch>, PortError>;

    async fn delete_saved_search(&self, athlete: &UserId, id: SavedSearchId) -> Result<(), PortError>;

    // ========================================================================
    // Coach roster
    // ========================================================================

    /// Create-once per (athlete, coach)
    async fn link_coach(&self, link: &CoachLink) -> Result<(), PortError>;

    async fn unlink_coach(&self, athlete: &UserId, coach: &UserId) -> Result<(), PortError>;

    async fn list_coaches(&self, athlete: &UserId) -> Result<Vec<CoachLink>, PortError>;

    async fn list_athletes(&self, coach: &UserId) -> Result<Vec<CoachLink>, PortError>;

    async fn is_coach_of(&self, coach: &UserId, athlete: &UserId) -> Result<bool, PortError>;
}

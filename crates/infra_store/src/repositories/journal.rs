//! Journal repository
//!
//! Implements `JournalPort` over any [`KeyValueStore`]. Every record lives in
//! its athlete's partition; coach links are written twice so both sides can
//! be listed without a scan.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

use core_kernel::{
    CommentId, DomainPort, EntryId, HealthCheckResult, HealthCheckable, PartnerId, PortError,
    SavedSearchId, UserId,
};
use domain_journal::{CoachLink, Comment, Entry, JournalPort, PartnerProfile, SavedSearch};

use crate::item::Item;
use crate::keys::{self, entity};
use crate::store::KeyValueStore;

use super::{check_store, decode_all, decode_one};

#[derive(Clone)]
pub struct JournalRepository {
    store: Arc<dyn KeyValueStore>,
}

impl JournalRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn remove(&self, pk: &str, sk: &str, entity_type: &str, id: impl std::fmt::Display) -> Result<(), PortError> {
        if self.store.delete(pk, sk).await? {
            Ok(())
        } else {
            Err(PortError::not_found(entity_type, id))
        }
    }
}

impl std::fmt::Debug for JournalRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalRepository")
            .field("backend", &self.store.backend())
            .finish()
    }
}

impl DomainPort for JournalRepository {}

#[async_trait]
impl HealthCheckable for JournalRepository {
    async fn health_check(&self) -> HealthCheckResult {
        check_store(self.store.as_ref(), "journal-store").await
    }
}

#[async_trait]
impl JournalPort for JournalRepository {
    // ========================================================================
    // Entries
    // ========================================================================

    #[instrument(skip(self, entry), fields(athlete_id = %entry.athlete_id, entry_id = %entry.id))]
    async fn save_entry(&self, entry: &Entry) -> Result<(), PortError> {
        let item = Item::encode(
            keys::athlete_pk(&entry.athlete_id),
            keys::entry_sk(entry.id),
            entity::ENTRY,
            entry,
        )?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, entry_id = %id))]
    async fn get_entry(&self, athlete: &UserId, id: EntryId) -> Result<Entry, PortError> {
        let item = self.store.get(&keys::athlete_pk(athlete), &keys::entry_sk(id)).await?;
        decode_one(item, "Entry", id)
    }

    /// Newest session first
    #[instrument(skip(self), fields(athlete_id = %athlete))]
    async fn list_entries(&self, athlete: &UserId) -> Result<Vec<Entry>, PortError> {
        let items = self.store.query(&keys::athlete_pk(athlete), keys::ENTRY_PREFIX).await?;
        let mut entries: Vec<Entry> = decode_all(items)?;
        entries.sort_by(|a, b| {
            b.session_date
                .cmp(&a.session_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        debug!(count = entries.len(), "Listed entries");
        Ok(entries)
    }

    /// Removes the entry and its comments
    #[instrument(skip(self), fields(athlete_id = %athlete, entry_id = %id))]
    async fn delete_entry(&self, athlete: &UserId, id: EntryId) -> Result<(), PortError> {
        let pk = keys::athlete_pk(athlete);
        self.remove(&pk, &keys::entry_sk(id), "Entry", id).await?;
        for comment in self.store.query(&pk, &keys::comment_prefix(id)).await? {
            self.store.delete(&pk, &comment.sk).await?;
        }
        Ok(())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    #[instrument(skip(self, comment), fields(entry_id = %comment.entry_id, comment_id = %comment.id))]
    async fn save_comment(&self, comment: &Comment) -> Result<(), PortError> {
        let item = Item::encode(
            keys::athlete_pk(&comment.athlete_id),
            keys::comment_sk(comment.entry_id, comment.id),
            entity::COMMENT,
            comment,
        )?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, comment_id = %id))]
    async fn get_comment(&self, athlete: &UserId, entry: EntryId, id: CommentId) -> Result<Comment, PortError> {
        let item = self
            .store
            .get(&keys::athlete_pk(athlete), &keys::comment_sk(entry, id))
            .await?;
        decode_one(item, "Comment", id)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, entry_id = %entry))]
    async fn list_comments(&self, athlete: &UserId, entry: EntryId) -> Result<Vec<Comment>, PortError> {
        let items = self
            .store
            .query(&keys::athlete_pk(athlete), &keys::comment_prefix(entry))
            .await?;
        let mut comments: Vec<Comment> = decode_all(items)?;
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, comment_id = %id))]
    async fn delete_comment(&self, athlete: &UserId, entry: EntryId, id: CommentId) -> Result<(), PortError> {
        self.remove(&keys::athlete_pk(athlete), &keys::comment_sk(entry, id), "Comment", id)
            .await
    }

    // ========================================================================
    // Partners
    // ========================================================================

    #[instrument(skip(self, partner), fields(partner_id = %partner.id))]
    async fn save_partner(&self, partner: &PartnerProfile) -> Result<(), PortError> {
        let item = Item::encode(
            keys::athlete_pk(&partner.athlete_id),
            keys::partner_sk(partner.id),
            entity::PARTNER,
            partner,
        )?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, partner_id = %id))]
    async fn get_partner(&self, athlete: &UserId, id: PartnerId) -> Result<PartnerProfile, PortError> {
        let item = self.store.get(&keys::athlete_pk(athlete), &keys::partner_sk(id)).await?;
        decode_one(item, "Partner", id)
    }

    /// Ordered by display name
    #[instrument(skip(self), fields(athlete_id = %athlete))]
    async fn list_partners(&self, athlete: &UserId) -> Result<Vec<PartnerProfile>, PortError> {
        let items = self.store.query(&keys::athlete_pk(athlete), keys::PARTNER_PREFIX).await?;
        let mut partners: Vec<PartnerProfile> = decode_all(items)?;
        partners.sort_by_cached_key(|p| (p.display_name.to_lowercase(), p.id));
        Ok(partners)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, partner_id = %id))]
    async fn delete_partner(&self, athlete: &UserId, id: PartnerId) -> Result<(), PortError> {
        self.remove(&keys::athlete_pk(athlete), &keys::partner_sk(id), "Partner", id)
            .await
    }

    // ========================================================================
    // Saved searches
    // ========================================================================

    #[instrument(skip(self, search), fields(athlete_id = %search.athlete_id, search_id = %search.id))]
    async fn create_saved_search(&self, search: &SavedSearch) -> Result<(), PortError> {
        let pk = keys::athlete_pk(&search.athlete_id);
        let guard = Item::encode(
            pk.clone(),
            keys::search_name_sk(&search.name_key()),
            entity::GUARD,
            &json!({ "search_id": search.id }),
        )?;
        self.store.put_if_absent(guard).await.map_err(|e| {
            if e.is_already_exists() {
                PortError::conflict(format!("a saved search named '{}' already exists", search.name))
            } else {
                e.into()
            }
        })?;

        let item = Item::encode(pk, keys::search_sk(search.id), entity::SAVED_SEARCH, search)?;
        self.store.put(item).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, search_id = %id))]
    async fn get_saved_search(&self, athlete: &UserId, id: SavedSearchId) -> Result<SavedSearch, PortError> {
        let item = self.store.get(&keys::athlete_pk(athlete), &keys::search_sk(id)).await?;
        decode_one(item, "SavedSearch", id)
    }

    /// Ordered by name
    #[instrument(skip(self), fields(athlete_id = %athlete))]
    async fn list_saved_searches(&self, athlete: &UserId) -> Result<Vec<SavedSearch>, PortError> {
        let items = self.store.query(&keys::athlete_pk(athlete), keys::SEARCH_PREFIX).await?;
        let mut searches: Vec<SavedSearch> = decode_all(items)?;
        searches.sort_by_cached_key(|s| s.name_key());
        Ok(searches)
    }

    /// Removes the search and releases its name
    #[instrument(skip(self), fields(athlete_id = %athlete, search_id = %id))]
    async fn delete_saved_search(&self, athlete: &UserId, id: SavedSearchId) -> Result<(), PortError> {
        let search = self.get_saved_search(athlete, id).await?;
        let pk = keys::athlete_pk(athlete);
        self.store.delete(&pk, &keys::search_sk(id)).await?;
        self.store.delete(&pk, &keys::search_name_sk(&search.name_key())).await?;
        Ok(())
    }

    // ========================================================================
    // Coach roster
    // ========================================================================

    #[instrument(skip(self, link), fields(athlete_id = %link.athlete_id, coach_id = %link.coach_id))]
    async fn link_coach(&self, link: &CoachLink) -> Result<(), PortError> {
        let athlete_side = Item::encode(
            keys::athlete_pk(&link.athlete_id),
            keys::coach_link_sk(&link.coach_id),
            entity::COACH_LINK,
            link,
        )?;
        self.store.put_if_absent(athlete_side).await.map_err(|e| {
            if e.is_already_exists() {
                PortError::conflict(format!(
                    "coach {} is already linked to athlete {}",
                    link.coach_id, link.athlete_id
                ))
            } else {
                e.into()
            }
        })?;

        let coach_side = Item::encode(
            keys::coach_pk(&link.coach_id),
            keys::athlete_link_sk(&link.athlete_id),
            entity::COACH_LINK,
            link,
        )?;
        self.store.put(coach_side).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, coach_id = %coach))]
    async fn unlink_coach(&self, athlete: &UserId, coach: &UserId) -> Result<(), PortError> {
        self.remove(&keys::athlete_pk(athlete), &keys::coach_link_sk(coach), "CoachLink", coach)
            .await?;
        self.store
            .delete(&keys::coach_pk(coach), &keys::athlete_link_sk(athlete))
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(athlete_id = %athlete))]
    async fn list_coaches(&self, athlete: &UserId) -> Result<Vec<CoachLink>, PortError> {
        let items = self.store.query(&keys::athlete_pk(athlete), keys::COACH_PREFIX).await?;
        decode_all(items)
    }

    #[instrument(skip(self), fields(coach_id = %coach))]
    async fn list_athletes(&self, coach: &UserId) -> Result<Vec<CoachLink>, PortError> {
        let items = self.store.query(&keys::coach_pk(coach), keys::ATHLETE_PREFIX).await?;
        decode_all(items)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, coach_id = %coach))]
    async fn is_coach_of(&self, coach: &UserId, athlete: &UserId) -> Result<bool, PortError> {
        let item = self
            .store
            .get(&keys::athlete_pk(athlete), &keys::coach_link_sk(coach))
            .await?;
        Ok(item.is_some())
    }
}

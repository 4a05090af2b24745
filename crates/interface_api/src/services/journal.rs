//! Journal service: entries, comments, partners, saved searches and roster

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::{CommentId, EntryId, PartnerId, Principal, SavedSearchId, Timezone, UserId};
use domain_journal::{
    CoachLink, Comment, Entry, EntryDraft, EntryQuery, ExtractionPort, JournalError, JournalPort,
    PartnerDraft, PartnerProfile, PartnerRecord, SavedSearch,
};

use crate::error::ApiError;
use crate::services::progress::ProgressService;

/// A partner profile with the head-to-head record against them
#[derive(Debug, Clone, Serialize)]
pub struct PartnerDetail {
    #[serde(flatten)]
    pub profile: PartnerProfile,
    pub record: PartnerRecord,
}

#[derive(Clone)]
pub struct JournalService {
    journal: Arc<dyn JournalPort>,
    extractor: Arc<dyn ExtractionPort>,
    progress: ProgressService,
    timezone: Timezone,
    max_page_size: usize,
}

impl JournalService {
    pub fn new(
        journal: Arc<dyn JournalPort>,
        extractor: Arc<dyn ExtractionPort>,
        progress: ProgressService,
        timezone: Timezone,
        max_page_size: usize,
    ) -> Self {
        Self {
            journal,
            extractor,
            progress,
            timezone,
            max_page_size,
        }
    }

    pub fn port(&self) -> &dyn JournalPort {
        self.journal.as_ref()
    }

    // ========================================================================
    // Entries
    // ========================================================================

    /// Attaches extraction and action pack
    ///
    /// A failing extractor leaves the entry without derived fields.
    async fn analyze(&self, entry: &mut Entry) {
        match self.extractor.extract(entry).await {
            Ok(extraction) => entry.attach_analysis(extraction, Utc::now()),
            Err(e) => warn!(entry_id = %entry.id, error = %e, "Extraction failed, storing entry without analysis"),
        }
    }

    #[instrument(skip(self, draft), fields(athlete_id = %athlete))]
    pub async fn create_entry(&self, athlete: &UserId, draft: EntryDraft) -> Result<Entry, ApiError> {
        let mut entry = Entry::new(athlete.clone(), draft, self.timezone.today(), Utc::now())?;
        self.analyze(&mut entry).await;
        self.journal.save_entry(&entry).await?;
        self.progress.sync_entry(&entry).await?;
        info!(entry_id = %entry.id, session_date = %entry.session_date, "Entry logged");
        Ok(entry)
    }

    #[instrument(skip(self, draft), fields(athlete_id = %athlete, entry_id = %id))]
    pub async fn update_entry(&self, athlete: &UserId, id: EntryId, draft: EntryDraft) -> Result<Entry, ApiError> {
        let mut entry = self.journal.get_entry(athlete, id).await?;
        entry.revise(draft, self.timezone.today(), Utc::now())?;
        self.analyze(&mut entry).await;
        self.journal.save_entry(&entry).await?;
        self.progress.sync_entry(&entry).await?;
        Ok(entry)
    }

    /// Re-runs extraction; extractor failures are reported to the caller
    #[instrument(skip(self), fields(athlete_id = %athlete, entry_id = %id))]
    pub async fn extract_entry(&self, athlete: &UserId, id: EntryId) -> Result<Entry, ApiError> {
        let mut entry = self.journal.get_entry(athlete, id).await?;
        let extraction = self.extractor.extract(&entry).await?;
        entry.attach_analysis(extraction, Utc::now());
        self.journal.save_entry(&entry).await?;
        self.progress.sync_entry(&entry).await?;
        Ok(entry)
    }

    pub async fn get_entry(&self, athlete: &UserId, id: EntryId) -> Result<Entry, ApiError> {
        Ok(self.journal.get_entry(athlete, id).await?)
    }

    /// Entries matching the query, newest first
    pub async fn list_entries(
        &self,
        athlete: &UserId,
        query: EntryQuery,
        include_private: bool,
    ) -> Result<Vec<Entry>, ApiError> {
        let query = query.normalize()?;
        let entries = self.journal.list_entries(athlete).await?;
        Ok(query.run(&entries, include_private, self.max_page_size))
    }

    /// Removes the entry, its comments and its evidence
    #[instrument(skip(self), fields(athlete_id = %athlete, entry_id = %id))]
    pub async fn delete_entry(&self, athlete: &UserId, id: EntryId) -> Result<(), ApiError> {
        self.journal.delete_entry(athlete, id).await?;
        self.progress.forget_entry(athlete, id).await?;
        info!("Entry deleted");
        Ok(())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    pub async fn add_comment(
        &self,
        athlete: &UserId,
        entry_id: EntryId,
        author: &Principal,
        body: &str,
    ) -> Result<Comment, ApiError> {
        self.journal.get_entry(athlete, entry_id).await?;
        let comment = Comment::new(athlete.clone(), entry_id, author, body, Utc::now())?;
        self.journal.save_comment(&comment).await?;
        Ok(comment)
    }

    pub async fn list_comments(&self, athlete: &UserId, entry_id: EntryId) -> Result<Vec<Comment>, ApiError> {
        self.journal.get_entry(athlete, entry_id).await?;
        Ok(self.journal.list_comments(athlete, entry_id).await?)
    }

    /// Comment author, entry owner or admin
    pub async fn delete_comment(
        &self,
        athlete: &UserId,
        entry_id: EntryId,
        id: CommentId,
        principal: &Principal,
    ) -> Result<(), ApiError> {
        let comment = self.journal.get_comment(athlete, entry_id, id).await?;
        if !comment.can_be_deleted_by(principal) {
            return Err(ApiError::forbidden(
                "only the author, the athlete or an admin may delete a comment",
            ));
        }
        Ok(self.journal.delete_comment(athlete, entry_id, id).await?)
    }

    // ========================================================================
    // Partners
    // ========================================================================

    pub async fn create_partner(&self, athlete: &UserId, draft: PartnerDraft) -> Result<PartnerDetail, ApiError> {
        let profile = PartnerProfile::new(athlete.clone(), draft, Utc::now())?;
        self.journal.save_partner(&profile).await?;
        Ok(PartnerDetail {
            record: PartnerRecord {
                partner_id: profile.id,
                ..Default::default()
            },
            profile,
        })
    }

    pub async fn list_partners(&self, athlete: &UserId) -> Result<Vec<PartnerDetail>, ApiError> {
        let partners = self.journal.list_partners(athlete).await?;
        let entries = self.journal.list_entries(athlete).await?;
        Ok(partners
            .into_iter()
            .map(|profile| PartnerDetail {
                record: PartnerRecord::from_entries(profile.id, &entries),
                profile,
            })
            .collect())
    }

    pub async fn get_partner(&self, athlete: &UserId, id: PartnerId) -> Result<PartnerDetail, ApiError> {
        let profile = self.journal.get_partner(athlete, id).await?;
        let entries = self.journal.list_entries(athlete).await?;
        Ok(PartnerDetail {
            record: PartnerRecord::from_entries(id, &entries),
            profile,
        })
    }

    pub async fn update_partner(
        &self,
        athlete: &UserId,
        id: PartnerId,
        draft: PartnerDraft,
    ) -> Result<PartnerDetail, ApiError> {
        let mut profile = self.journal.get_partner(athlete, id).await?;
        profile.update(draft, Utc::now())?;
        self.journal.save_partner(&profile).await?;
        let entries = self.journal.list_entries(athlete).await?;
        Ok(PartnerDetail {
            record: PartnerRecord::from_entries(id, &entries),
            profile,
        })
    }

    /// Refused while any logged round still names the partner
    pub async fn delete_partner(&self, athlete: &UserId, id: PartnerId) -> Result<(), ApiError> {
        self.journal.get_partner(athlete, id).await?;
        let entries = self.journal.list_entries(athlete).await?;
        if entries.iter().any(|e| e.mentions_partner(id)) {
            return Err(JournalError::PartnerInUse(id.to_string()).into());
        }
        Ok(self.journal.delete_partner(athlete, id).await?)
    }

    // ========================================================================
    // Saved searches
    // ========================================================================

    pub async fn create_search(&self, athlete: &UserId, name: &str, query: EntryQuery) -> Result<SavedSearch, ApiError> {
        let search = SavedSearch::new(athlete.clone(), name, query, Utc::now())?;
        self.journal.create_saved_search(&search).await?;
        Ok(search)
    }

    pub async fn list_searches(&self, athlete: &UserId) -> Result<Vec<SavedSearch>, ApiError> {
        Ok(self.journal.list_saved_searches(athlete).await?)
    }

    pub async fn get_search(&self, athlete: &UserId, id: SavedSearchId) -> Result<SavedSearch, ApiError> {
        Ok(self.journal.get_saved_search(athlete, id).await?)
    }

    pub async fn delete_search(&self, athlete: &UserId, id: SavedSearchId) -> Result<(), ApiError> {
        Ok(self.journal.delete_saved_search(athlete, id).await?)
    }

    /// Private notes are searched only when `include_private` is set
    pub async fn run_search(
        &self,
        athlete: &UserId,
        id: SavedSearchId,
        include_private: bool,
    ) -> Result<(SavedSearch, Vec<Entry>), ApiError> {
        let search = self.journal.get_saved_search(athlete, id).await?;
        let entries = self.journal.list_entries(athlete).await?;
        let results = search.query.run(&entries, include_private, self.max_page_size);
        Ok((search, results))
    }

    // ========================================================================
    // Coach roster
    // ========================================================================

    #[instrument(skip(self), fields(athlete_id = %athlete, coach_id = %coach))]
    pub async fn link_coach(&self, athlete: &UserId, coach: UserId) -> Result<CoachLink, ApiError> {
        let link = CoachLink::new(athlete.clone(), coach, Utc::now())?;
        self.journal.link_coach(&link).await?;
        info!("Coach linked");
        Ok(link)
    }

    #[instrument(skip(self), fields(athlete_id = %athlete, coach_id = %coach))]
    pub async fn unlink_coach(&self, athlete: &UserId, coach: &UserId) -> Result<(), ApiError> {
        self.journal.unlink_coach(athlete, coach).await?;
        info!("Coach unlinked");
        Ok(())
    }

    pub async fn list_coaches(&self, athlete: &UserId) -> Result<Vec<CoachLink>, ApiError> {
        Ok(self.journal.list_coaches(athlete).await?)
    }

    pub async fn list_athletes(&self, coach: &UserId) -> Result<Vec<CoachLink>, ApiError> {
        Ok(self.journal.list_athletes(coach).await?)
    }
}

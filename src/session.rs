use std::sync::Arc;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use crate::entities::{PartialProfile, PrivacyField, PrivacyFlags, ProfileId, ProfileRecord, Tag};
use crate::error::HobbytagError;
use crate::storage::ProfileStore;
use crate::tags::{CategorizedTag, TagEditor, TagSet};
use crate::visibility::{Notification, PendingWrite, VisibilitySync, WriteOutcome, WriteState};

/// Editable contact fields saved together with the hobbies.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct ProfileDraft {
    pub profession: String,
    pub email: String,
    pub phone_number: String,
    pub spouse_name: String,
    pub children: String,
}

impl From<&ProfileRecord> for ProfileDraft {
    fn from(record: &ProfileRecord) -> Self {
        Self {
            profession: record.profession.clone().unwrap_or_default(),
            email: record.email.clone().unwrap_or_default(),
            phone_number: record.phone_number.clone().unwrap_or_default(),
            spouse_name: record.spouse_name.clone().unwrap_or_default(),
            children: record.children.clone().unwrap_or_default(),
        }
    }
}

/// One user's editing session over a snapshot of their profile.
pub struct EditSession<S: ProfileStore> {
    store: Arc<S>,
    profile: ProfileRecord,
    draft: ProfileDraft,
    editor: TagEditor,
    visibility: VisibilitySync,
    is_editing: bool,
}

impl<S: ProfileStore> EditSession<S> {
    pub async fn load(store: Arc<S>, id: ProfileId) -> Result<Self, HobbytagError> {
        let profile = store.read_record(&id).await?;
        info!("profile loaded: {}", id);
        let flags = PrivacyFlags::from_persisted(&profile.privacy);
        Ok(Self {
            store,
            draft: ProfileDraft::from(&profile),
            editor: TagEditor::new(TagSet::from_source(profile.hobbies_interests.as_ref())),
            visibility: VisibilitySync::new(flags),
            profile,
            is_editing: false,
        })
    }

    pub fn id(&self) -> ProfileId {
        self.profile.id
    }

    pub fn profile(&self) -> &ProfileRecord {
        &self.profile
    }

    pub fn full_name(&self) -> String {
        crate::entities::format_full_name(Some(&self.profile))
    }

    pub fn initials(&self) -> String {
        crate::entities::get_initials(Some(&self.profile))
    }

    /// Re-reads the profile and discards unsaved edits.
    pub async fn refresh(&mut self) -> Result<(), HobbytagError> {
        let profile = self.store.read_record(&self.profile.id).await?;
        self.visibility.resync(PrivacyFlags::from_persisted(&profile.privacy));
        self.draft = ProfileDraft::from(&profile);
        self.editor.reset(TagSet::from_source(profile.hobbies_interests.as_ref()));
        self.profile = profile;
        Ok(())
    }

    // tags

    pub fn tags(&self) -> &[Tag] {
        self.editor.tags().as_slice()
    }

    pub fn suggestions(&self) -> &[String] {
        self.editor.suggestions()
    }

    pub fn categorized_tags(&self) -> Vec<CategorizedTag> {
        self.editor.categorized()
    }

    pub fn editor(&self) -> &TagEditor {
        &self.editor
    }

    pub fn add_tag(&mut self, raw: &str) -> bool {
        self.editor.add_tag(raw)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.editor.remove_tag(tag)
    }

    pub fn set_partial_input(&mut self, input: &str) {
        self.editor.set_partial_input(input)
    }

    pub fn confirm_tag(&mut self) -> bool {
        self.editor.confirm()
    }

    pub fn dismiss_suggestions(&mut self) {
        self.editor.dismiss_suggestions()
    }

    // profile edits

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn start_edit(&mut self) {
        self.is_editing = true;
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    /// Drops draft and tag edits, going back to the loaded snapshot.
    pub fn cancel_edit(&mut self) {
        self.draft = ProfileDraft::from(&self.profile);
        self.editor.reset(TagSet::from_source(self.profile.hobbies_interests.as_ref()));
        self.is_editing = false;
    }

    /// Writes the draft and the tags back in one partial update. The record is read
    /// first; if it is gone nothing is written.
    pub async fn save_profile(&mut self) -> Result<(), HobbytagError> {
        let id = self.profile.id;
        if let Err(e) = self.store.read_record(&id).await {
            error!("failed to verify profile {} before saving: {}", id, e);
            return Err(e);
        }

        let partial = PartialProfile {
            profession: Some(self.draft.profession.clone()),
            email: Some(self.draft.email.clone()),
            phone_number: Some(self.draft.phone_number.clone()),
            spouse_name: Some(self.draft.spouse_name.clone()),
            children: Some(self.draft.children.clone()),
            hobbies_interests: Some(self.editor.to_persisted()),
            privacy: None,
        };
        if let Err(e) = self.store.write_record(&id, partial.clone()).await {
            error!("failed to save profile {}: {}", id, e);
            return Err(e);
        }
        info!("profile saved: {}", id);
        self.profile.apply(partial);
        self.is_editing = false;

        // the save already landed; a failed reload only leaves the local snapshot
        if let Err(e) = self.refresh().await {
            warn!("profile {} saved but could not be reloaded: {}", id, e);
        }
        Ok(())
    }

    /// Saves only the tags, leaving the draft untouched.
    pub async fn save_tags(&mut self) -> Result<(), HobbytagError> {
        let id = self.profile.id;
        self.store.read_record(&id).await?;
        let partial = PartialProfile { hobbies_interests: Some(self.editor.to_persisted()), ..Default::default() };
        self.store.write_record(&id, partial).await?;
        info!("tags saved for {}: {:?}", id, self.tags());
        let tags = self.editor.to_persisted();
        self.profile.apply(PartialProfile { hobbies_interests: Some(tags), ..Default::default() });
        Ok(())
    }

    // visibility

    pub fn flags(&self) -> &PrivacyFlags {
        self.visibility.flags()
    }

    pub fn visibility(&self) -> &VisibilitySync {
        &self.visibility
    }

    pub fn notifications(&self) -> &[Notification] {
        self.visibility.notifications()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.visibility.take_notifications()
    }

    /// Flips `field` locally. The returned write has to be persisted and reconciled.
    pub fn toggle_field(&mut self, field: PrivacyField) -> PendingWrite {
        let (_, pending) = self.visibility.apply_optimistic(field);
        self.mirror_privacy(field);
        pending
    }

    pub async fn persist(&self, pending: &PendingWrite) -> WriteOutcome {
        pending.persist(self.store.as_ref(), &self.profile.id).await
    }

    pub fn reconcile(&mut self, pending: PendingWrite, outcome: WriteOutcome) -> WriteState {
        let field = pending.field;
        let state = self.visibility.reconcile(pending, outcome);
        self.mirror_privacy(field);
        state
    }

    pub async fn toggle_and_persist(&mut self, field: PrivacyField) -> WriteState {
        let pending = self.toggle_field(field);
        let outcome = self.persist(&pending).await;
        self.reconcile(pending, outcome)
    }

    fn mirror_privacy(&mut self, field: PrivacyField) {
        let visible = self.visibility.display().get(field);
        self.profile.privacy.insert(field.key().to_string(), Some(visible));
    }
}

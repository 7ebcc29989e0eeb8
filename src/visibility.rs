//! Optimistic privacy toggles.
//!
//! A toggle flips the local flag at once and hands back a [`PendingWrite`] for the
//! caller to persist. Once the write resolves, [`VisibilitySync::reconcile`] either
//! commits it or rolls the flag (and its display copy) back to the last value the
//! store confirmed.
//!
//! Each field moves through `Idle -> Pending -> Committed | RolledBack`. Writes are
//! numbered per field, and only the outcome of the most recently issued write can
//! move the visible state, so overlapping toggles cannot be undone by a late reply.

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use crate::entities::{flip, PartialProfile, PrivacyField, PrivacyFlags, ProfileId};
use crate::storage::ProfileStore;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteState {
    Idle,
    Pending { seq: u64 },
    Committed,
    RolledBack,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Success,
    Failure(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWrite {
    pub field: PrivacyField,
    pub previous: bool,
    pub next: bool,
    pub seq: u64,
}

impl PendingWrite {
    pub fn to_partial(&self) -> PartialProfile {
        PartialProfile {
            privacy: Some(BTreeMap::from([(self.field.key().to_string(), self.next)])),
            ..Default::default()
        }
    }

    /// Sends the new value to the store. Errors become a [`WriteOutcome::Failure`];
    /// nothing here touches local state.
    pub async fn persist<S: ProfileStore>(&self, store: &S, id: &ProfileId) -> WriteOutcome {
        debug!("persisting {} = {} (write #{})", self.field, self.next, self.seq);
        match store.write_record(id, self.to_partial()).await {
            Ok(()) => WriteOutcome::Success,
            Err(e) => WriteOutcome::Failure(e.to_string()),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub field: PrivacyField,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug)]
struct FieldSync {
    state: WriteState,
    issued_seq: u64,
    confirmed_seq: u64,
}

impl Default for FieldSync {
    fn default() -> Self {
        Self { state: WriteState::Idle, issued_seq: 0, confirmed_seq: 0 }
    }
}

#[derive(Clone, Debug)]
pub struct VisibilitySync {
    flags: PrivacyFlags,
    display: PrivacyFlags,
    confirmed: PrivacyFlags,
    fields: BTreeMap<PrivacyField, FieldSync>,
    notifications: Vec<Notification>,
}

impl VisibilitySync {
    pub fn new(flags: PrivacyFlags) -> Self {
        Self {
            display: flags.clone(),
            confirmed: flags.clone(),
            flags,
            fields: PrivacyField::ALL.into_iter().map(|x| (x, FieldSync::default())).collect(),
            notifications: vec![],
        }
    }

    pub fn flags(&self) -> &PrivacyFlags {
        &self.flags
    }

    /// The denormalized copy shown next to the profile fields.
    pub fn display(&self) -> &PrivacyFlags {
        &self.display
    }

    pub fn confirmed(&self) -> &PrivacyFlags {
        &self.confirmed
    }

    pub fn state(&self, field: PrivacyField) -> WriteState {
        self.field(field).state
    }

    pub fn has_pending(&self) -> bool {
        self.fields.values().any(|x| matches!(x.state, WriteState::Pending { .. }))
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Flips `field` locally and returns the new flags along with the write that
    /// still has to reach the store.
    pub fn apply_optimistic(&mut self, field: PrivacyField) -> (PrivacyFlags, PendingWrite) {
        let previous = self.flags.get(field);
        self.flags = flip(&self.flags, field);
        self.display = flip(&self.display, field);

        let sync = self.field_mut(field);
        sync.issued_seq += 1;
        let seq = sync.issued_seq;
        sync.state = WriteState::Pending { seq };

        let pending = PendingWrite { field, previous, next: !previous, seq };
        debug!("optimistic toggle: {:?}", pending);
        (self.flags.clone(), pending)
    }

    pub fn reconcile(&mut self, pending: PendingWrite, outcome: WriteOutcome) -> WriteState {
        let field = pending.field;
        let sync = self.field(field);
        let is_latest = sync.state == WriteState::Pending { seq: pending.seq };

        match outcome {
            WriteOutcome::Success => {
                let is_newer = pending.seq > sync.confirmed_seq;
                if is_newer {
                    self.field_mut(field).confirmed_seq = pending.seq;
                    self.confirmed.set(field, pending.next);
                }
                let is_pending = matches!(sync.state, WriteState::Pending { .. });
                if is_latest {
                    info!("{} visibility saved: {}", field, pending.next);
                    self.field_mut(field).state = WriteState::Committed;
                } else if is_newer && !is_pending {
                    // nothing newer is in flight, so the store now holds this value
                    info!("{} visibility resynced to {}", field, self.confirmed.get(field));
                    self.restore_confirmed(field);
                } else {
                    debug!("superseded write #{} for {} succeeded", pending.seq, field);
                }
            }
            WriteOutcome::Failure(reason) => {
                if is_latest {
                    warn!("{} visibility update failed, rolling back: {}", field, reason);
                    self.restore_confirmed(field);
                    self.notifications.push(Notification {
                        field,
                        message: format!("Failed to update {} visibility: {}", field, reason),
                        created_at: Utc::now(),
                    });
                    self.field_mut(field).state = WriteState::RolledBack;
                } else {
                    debug!("superseded write #{} for {} failed: {}", pending.seq, field, reason);
                }
            }
        }
        self.state(field)
    }

    /// Adopts freshly loaded flags as the confirmed baseline. A field with a write
    /// still in flight keeps its optimistic value and stays pending; the write's
    /// outcome settles it against the loaded value.
    pub fn resync(&mut self, flags: PrivacyFlags) {
        let optimistic = self.flags.clone();
        self.confirmed = flags.clone();
        self.display = flags.clone();
        self.flags = flags;
        for (field, sync) in self.fields.iter_mut() {
            if matches!(sync.state, WriteState::Pending { .. }) {
                let value = optimistic.get(*field);
                self.flags.set(*field, value);
                self.display.set(*field, value);
            } else {
                sync.state = WriteState::Idle;
            }
        }
    }

    fn restore_confirmed(&mut self, field: PrivacyField) {
        let value = self.confirmed.get(field);
        self.flags.set(field, value);
        self.display.set(field, value);
    }

    fn field(&self, field: PrivacyField) -> FieldSync {
        self.fields.get(&field).copied().unwrap_or_default()
    }

    fn field_mut(&mut self, field: PrivacyField) -> &mut FieldSync {
        self.fields.entry(field).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProfileRecord;
    use crate::storage::InMemoryStore;

    fn failure() -> WriteOutcome {
        WriteOutcome::Failure("network down".to_string())
    }

    #[test]
    fn test_apply_optimistic_is_immediate() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (next, pending) = sync.apply_optimistic(PrivacyField::Email);
        assert!(next.get(PrivacyField::Email));
        assert_eq!(sync.flags(), &next);
        assert_eq!(sync.display(), &next);
        assert_eq!(pending, PendingWrite { field: PrivacyField::Email, previous: false, next: true, seq: 1 });
        assert_eq!(sync.state(PrivacyField::Email), WriteState::Pending { seq: 1 });
        assert!(sync.has_pending());
    }

    #[test]
    fn test_success_commits() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (next, pending) = sync.apply_optimistic(PrivacyField::Phone);
        assert_eq!(sync.reconcile(pending, WriteOutcome::Success), WriteState::Committed);
        assert_eq!(sync.flags(), &next);
        assert_eq!(sync.confirmed(), &next);
        assert!(sync.notifications().is_empty());
        assert!(!sync.has_pending());
    }

    #[test]
    fn test_failure_rolls_back_and_notifies_once() {
        let before = PrivacyFlags::all_private();
        let mut sync = VisibilitySync::new(before.clone());
        let (_, pending) = sync.apply_optimistic(PrivacyField::Phone);
        assert_eq!(sync.reconcile(pending, failure()), WriteState::RolledBack);
        assert_eq!(sync.flags(), &before);
        assert_eq!(sync.display(), &before);
        assert_eq!(sync.notifications().len(), 1);
        assert_eq!(sync.notifications()[0].field, PrivacyField::Phone);
        assert_eq!(sync.take_notifications().len(), 1);
        assert!(sync.notifications().is_empty());
    }

    #[test]
    fn test_retry_after_failure() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, pending) = sync.apply_optimistic(PrivacyField::Address);
        sync.reconcile(pending, failure());
        let (_, pending) = sync.apply_optimistic(PrivacyField::Address);
        assert_eq!(sync.reconcile(pending, WriteOutcome::Success), WriteState::Committed);
        assert!(sync.flags().get(PrivacyField::Address));
    }

    #[test]
    fn test_late_outcome_of_superseded_write_is_ignored() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, first) = sync.apply_optimistic(PrivacyField::Email);
        let (_, second) = sync.apply_optimistic(PrivacyField::Email);
        assert!(!sync.flags().get(PrivacyField::Email));

        // second resolves first, then the first one fails late
        assert_eq!(sync.reconcile(second, WriteOutcome::Success), WriteState::Committed);
        assert_eq!(sync.reconcile(first, failure()), WriteState::Committed);
        assert!(!sync.flags().get(PrivacyField::Email));
        assert!(!sync.confirmed().get(PrivacyField::Email));
        assert!(sync.notifications().is_empty());
    }

    #[test]
    fn test_late_success_does_not_override_newer_confirmation() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, first) = sync.apply_optimistic(PrivacyField::Email);
        let (_, second) = sync.apply_optimistic(PrivacyField::Email);
        sync.reconcile(second, WriteOutcome::Success);
        sync.reconcile(first, WriteOutcome::Success);
        assert!(!sync.flags().get(PrivacyField::Email));
        assert!(!sync.confirmed().get(PrivacyField::Email));
    }

    #[test]
    fn test_failure_of_latest_rolls_back_to_confirmed_value() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, first) = sync.apply_optimistic(PrivacyField::Children);
        let (_, second) = sync.apply_optimistic(PrivacyField::Children);
        let (_, third) = sync.apply_optimistic(PrivacyField::Children);
        assert!(sync.flags().get(PrivacyField::Children));

        sync.reconcile(first, failure());
        sync.reconcile(second, failure());
        assert_eq!(sync.state(PrivacyField::Children), WriteState::Pending { seq: 3 });
        assert!(sync.flags().get(PrivacyField::Children));

        assert_eq!(sync.reconcile(third, failure()), WriteState::RolledBack);
        assert!(!sync.flags().get(PrivacyField::Children));
        assert_eq!(sync.flags(), sync.display());
        assert_eq!(sync.notifications().len(), 1);
    }

    #[test]
    fn test_older_success_after_rollback_resyncs() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, first) = sync.apply_optimistic(PrivacyField::Spouse);
        let (_, second) = sync.apply_optimistic(PrivacyField::Spouse);
        sync.reconcile(second, failure());
        assert!(!sync.flags().get(PrivacyField::Spouse));

        // the store did accept the first toggle
        assert_eq!(sync.reconcile(first, WriteOutcome::Success), WriteState::RolledBack);
        assert!(sync.flags().get(PrivacyField::Spouse));
        assert!(sync.display().get(PrivacyField::Spouse));
    }

    #[test]
    fn test_fields_are_independent() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, phone) = sync.apply_optimistic(PrivacyField::Phone);
        let (_, email) = sync.apply_optimistic(PrivacyField::Email);
        sync.reconcile(phone, failure());
        sync.reconcile(email, WriteOutcome::Success);
        assert!(!sync.flags().get(PrivacyField::Phone));
        assert!(sync.flags().get(PrivacyField::Email));
    }

    #[test]
    fn test_resync_keeps_in_flight_write_pending() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, pending) = sync.apply_optimistic(PrivacyField::Phone);
        let loaded = flip(&PrivacyFlags::all_private(), PrivacyField::Email);
        sync.resync(loaded.clone());
        assert_eq!(sync.state(PrivacyField::Phone), WriteState::Pending { seq: 1 });
        assert!(sync.flags().get(PrivacyField::Phone));
        assert!(sync.flags().get(PrivacyField::Email));

        assert_eq!(sync.reconcile(pending, failure()), WriteState::RolledBack);
        assert_eq!(sync.flags(), &loaded);
        assert_eq!(sync.display(), &loaded);
        assert_eq!(sync.notifications().len(), 1);
    }

    #[test]
    fn test_success_landing_after_resync_is_kept() {
        let before = PrivacyFlags::all_private();
        let mut sync = VisibilitySync::new(before.clone());
        let (next, pending) = sync.apply_optimistic(PrivacyField::Phone);
        // reloaded before the write reached the store
        sync.resync(before);
        assert_eq!(sync.reconcile(pending, WriteOutcome::Success), WriteState::Committed);
        assert_eq!(sync.flags(), &next);
        assert_eq!(sync.display(), &next);
        assert_eq!(sync.confirmed(), &next);
    }

    #[test]
    fn test_older_success_after_resync_updates_idle_field() {
        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, first) = sync.apply_optimistic(PrivacyField::Spouse);
        let (_, second) = sync.apply_optimistic(PrivacyField::Spouse);
        sync.reconcile(second, failure());
        sync.resync(PrivacyFlags::all_private());
        assert_eq!(sync.state(PrivacyField::Spouse), WriteState::Idle);

        assert_eq!(sync.reconcile(first, WriteOutcome::Success), WriteState::Idle);
        assert!(sync.flags().get(PrivacyField::Spouse));
        assert!(sync.display().get(PrivacyField::Spouse));
    }

    #[tokio::test]
    async fn test_persist_against_store() {
        let store = InMemoryStore::new();
        let record = ProfileRecord::new(ProfileId::new());
        let id = record.id;
        store.insert(record);

        let mut sync = VisibilitySync::new(PrivacyFlags::all_private());
        let (_, pending) = sync.apply_optimistic(PrivacyField::Phone);
        let outcome = pending.persist(&store, &id).await;
        assert_eq!(outcome, WriteOutcome::Success);
        sync.reconcile(pending, outcome);
        assert_eq!(store.get(&id).unwrap().privacy.get("phone"), Some(&Some(true)));

        store.fail_next_writes(1);
        let (_, pending) = sync.apply_optimistic(PrivacyField::Phone);
        let outcome = pending.persist(&store, &id).await;
        assert!(matches!(outcome, WriteOutcome::Failure(_)));
        sync.reconcile(pending, outcome);
        assert!(sync.flags().get(PrivacyField::Phone));
        assert_eq!(store.get(&id).unwrap().privacy.get("phone"), Some(&Some(true)));
    }
}

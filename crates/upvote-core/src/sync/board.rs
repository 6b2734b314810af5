//! The shared feature board.
//!
//! One keyed store of feature entries that every view reads from and
//! subscribes to. Server counts and the device's voted flags are reconciled
//! here, and the per-feature in-flight vote guard lives here so a list card and
//! a detail screen showing the same feature can never both submit.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{Feature, FeatureId};
use crate::state::{LoadState, Notice};

/// A feature as displayed, with this device's vote state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub feature: Feature,
    pub voted: bool,
    pub vote_in_flight: bool,
}

/// Immutable view of the board published to subscribers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    order: Vec<FeatureId>,
    entries: HashMap<FeatureId, FeatureEntry>,
    pub load_state: LoadState,
    pub notice: Option<Notice>,
    /// Whether the list has been painted at least once (from cache or network)
    pub has_loaded: bool,
}

impl BoardSnapshot {
    /// Listed features in display order
    pub fn features(&self) -> impl Iterator<Item = &FeatureEntry> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn entry(&self, id: FeatureId) -> Option<&FeatureEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Result of trying to enter the in-flight state for a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BeginVote {
    Missing,
    Busy,
    /// The entry already has the desired vote state
    Unchanged,
    Started { target: bool },
}

/// Source of truth for displayed features
#[derive(Debug, Clone)]
pub struct FeatureBoard {
    tx: Arc<watch::Sender<BoardSnapshot>>,
}

impl Default for FeatureBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BoardSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Receive every subsequent change to the board.
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.tx.borrow().clone()
    }

    pub fn entry(&self, id: FeatureId) -> Option<FeatureEntry> {
        self.tx.borrow().entries.get(&id).cloned()
    }

    pub fn load_state(&self) -> LoadState {
        self.tx.borrow().load_state.clone()
    }

    pub fn has_loaded(&self) -> bool {
        self.tx.borrow().has_loaded
    }

    /// Replace the listed features with `features`, in order.
    ///
    /// Voted flags come from `voted`. When `voted` is `None` (the ledger could
    /// not be read) entries already on the board keep their flags and new ones
    /// start unvoted. Entries with a vote in flight keep their voted flag and
    /// guard so the pending confirmation lands on them.
    pub fn replace_all(&self, features: Vec<Feature>, voted: Option<&[FeatureId]>) {
        self.tx.send_modify(|board| {
            let mut previous = std::mem::take(&mut board.entries);
            board.order = features.iter().map(|feature| feature.id).collect();
            for feature in features {
                let id = feature.id;
                let existing = previous.remove(&id);
                let entry = match (existing, voted) {
                    (Some(existing), _) if existing.vote_in_flight => FeatureEntry {
                        feature,
                        ..existing
                    },
                    (_, Some(voted)) => FeatureEntry {
                        feature,
                        voted: voted.contains(&id),
                        vote_in_flight: false,
                    },
                    (existing, None) => FeatureEntry {
                        feature,
                        voted: existing.is_some_and(|entry| entry.voted),
                        vote_in_flight: false,
                    },
                };
                board.entries.insert(id, entry);
            }
            // Keep unlisted entries only while a vote on them is pending.
            board
                .entries
                .extend(previous.into_iter().filter(|(_, entry)| entry.vote_in_flight));
            board.has_loaded = true;
        });
    }

    /// Insert or refresh a single feature (e.g. from a detail fetch).
    ///
    /// A feature already on the board keeps its voted flag; `voted` only seeds
    /// entries that are not tracked yet. A feature not already listed is
    /// tracked but not added to the list order.
    pub fn upsert(&self, feature: Feature, voted: bool) -> FeatureEntry {
        let mut updated = None;
        self.tx.send_modify(|board| {
            let entry = board
                .entries
                .entry(feature.id)
                .and_modify(|entry| entry.feature = feature.clone())
                .or_insert_with(|| FeatureEntry {
                    feature: feature.clone(),
                    voted,
                    vote_in_flight: false,
                });
            updated = Some(entry.clone());
        });
        updated.unwrap_or(FeatureEntry {
            feature,
            voted,
            vote_in_flight: false,
        })
    }

    /// Add a newly created feature to the top of the list.
    pub fn insert_front(&self, feature: Feature) {
        self.tx.send_modify(|board| {
            let id = feature.id;
            board.order.retain(|listed| *listed != id);
            board.order.insert(0, id);
            board.entries.insert(
                id,
                FeatureEntry {
                    feature,
                    voted: false,
                    vote_in_flight: false,
                },
            );
        });
    }

    pub fn remove(&self, id: FeatureId) -> Option<FeatureEntry> {
        let mut removed = None;
        self.tx.send_if_modified(|board| {
            board.order.retain(|listed| *listed != id);
            removed = board.entries.remove(&id);
            removed.is_some()
        });
        removed
    }

    pub fn set_load_state(&self, state: LoadState) {
        self.tx.send_if_modified(|board| {
            if board.load_state == state {
                return false;
            }
            board.load_state = state;
            true
        });
    }

    pub fn set_notice(&self, notice: Notice) {
        self.tx.send_modify(|board| board.notice = Some(notice));
    }

    pub fn dismiss_notice(&self) {
        self.tx
            .send_if_modified(|board| board.notice.take().is_some());
    }

    /// Enter the in-flight state for `id`.
    ///
    /// `desired` of `None` toggles; `Some(state)` is a no-op when the entry
    /// already has that state. Subscribers are only notified on `Started`.
    pub(crate) fn begin_vote(&self, id: FeatureId, desired: Option<bool>) -> BeginVote {
        let mut outcome = BeginVote::Missing;
        self.tx.send_if_modified(|board| {
            let Some(entry) = board.entries.get_mut(&id) else {
                return false;
            };
            if entry.vote_in_flight {
                outcome = BeginVote::Busy;
                return false;
            }
            let target = desired.unwrap_or(!entry.voted);
            if target == entry.voted {
                outcome = BeginVote::Unchanged;
                return false;
            }
            entry.vote_in_flight = true;
            outcome = BeginVote::Started { target };
            true
        });
        outcome
    }

    /// Leave the in-flight state for `id`.
    ///
    /// `Some(voted)` applies a server-confirmed vote to the current count;
    /// `None` leaves the entry as it was before the vote began.
    pub(crate) fn finish_vote(&self, id: FeatureId, confirmed: Option<bool>) {
        self.tx.send_if_modified(|board| {
            let Some(entry) = board.entries.get_mut(&id) else {
                return false;
            };
            if !entry.vote_in_flight {
                return false;
            }
            entry.vote_in_flight = false;
            if let Some(voted) = confirmed {
                entry.voted = voted;
                entry.feature.apply_confirmed_vote(voted);
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::feature;
    use pretty_assertions::assert_eq;

    fn id(raw: i64) -> FeatureId {
        FeatureId::new(raw)
    }

    fn listed_ids(board: &FeatureBoard) -> Vec<i64> {
        board
            .snapshot()
            .features()
            .map(|entry| entry.feature.id.get())
            .collect()
    }

    #[test]
    fn test_replace_all_reconciles_voted_flags() {
        let board = FeatureBoard::new();
        board.replace_all(
            vec![feature(2, "Dark mode", 4), feature(1, "Export", 1)],
            Some(&[id(1)]),
        );

        let snapshot = board.snapshot();
        assert!(snapshot.has_loaded);
        assert_eq!(listed_ids(&board), vec![2, 1]);
        assert!(!snapshot.entry(id(2)).unwrap().voted);
        assert!(snapshot.entry(id(1)).unwrap().voted);
    }

    #[test]
    fn test_empty_replace_counts_as_loaded() {
        let board = FeatureBoard::new();
        board.replace_all(Vec::new(), Some(&[]));
        assert!(board.has_loaded());
        assert!(board.snapshot().is_empty());
    }

    #[test]
    fn test_replace_all_preserves_in_flight_entries() {
        let board = FeatureBoard::new();
        board.replace_all(vec![feature(1, "Export", 1)], Some(&[]));
        assert_eq!(
            board.begin_vote(id(1), None),
            BeginVote::Started { target: true }
        );

        board.replace_all(vec![feature(1, "Export", 3)], Some(&[]));

        let entry = board.entry(id(1)).unwrap();
        assert!(entry.vote_in_flight);
        assert_eq!(entry.feature.vote_count, 3);

        board.finish_vote(id(1), Some(true));
        let entry = board.entry(id(1)).unwrap();
        assert!(entry.voted);
        assert!(!entry.vote_in_flight);
        assert_eq!(entry.feature.vote_count, 4);
    }

    #[test]
    fn test_begin_vote_guards_per_feature() {
        let board = FeatureBoard::new();
        board.replace_all(vec![feature(1, "Export", 0), feature(2, "Sync", 0)], Some(&[]));

        assert_eq!(
            board.begin_vote(id(1), None),
            BeginVote::Started { target: true }
        );
        assert_eq!(board.begin_vote(id(1), None), BeginVote::Busy);
        assert_eq!(
            board.begin_vote(id(2), None),
            BeginVote::Started { target: true }
        );
        assert_eq!(board.begin_vote(id(9), None), BeginVote::Missing);
    }

    #[test]
    fn test_begin_vote_with_matching_state_is_unchanged() {
        let board = FeatureBoard::new();
        board.replace_all(vec![feature(1, "Export", 2)], Some(&[id(1)]));

        assert_eq!(board.begin_vote(id(1), Some(true)), BeginVote::Unchanged);
        assert!(!board.entry(id(1)).unwrap().vote_in_flight);
    }

    #[test]
    fn test_finish_without_confirmation_restores_entry() {
        let board = FeatureBoard::new();
        board.replace_all(vec![feature(1, "Export", 2)], Some(&[]));
        let before = board.entry(id(1)).unwrap();

        let _ = board.begin_vote(id(1), None);
        board.finish_vote(id(1), None);

        assert_eq!(board.entry(id(1)).unwrap(), before);
    }

    #[test]
    fn test_upsert_tracks_without_listing() {
        let board = FeatureBoard::new();
        board.replace_all(vec![feature(1, "Export", 0)], Some(&[]));

        let entry = board.upsert(feature(5, "Offline mode", 7), true);

        assert!(entry.voted);
        assert_eq!(listed_ids(&board), vec![1]);
        assert_eq!(board.entry(id(5)).unwrap().feature.vote_count, 7);
    }

    #[test]
    fn test_upsert_keeps_board_vote_flag() {
        let board = FeatureBoard::new();
        board.replace_all(vec![feature(1, "Export", 2)], Some(&[id(1)]));

        let entry = board.upsert(feature(1, "Export (CSV)", 2), false);

        assert!(entry.voted);
        assert_eq!(entry.feature.title, "Export (CSV)");
        assert!(board.entry(id(1)).unwrap().voted);
    }

    #[test]
    fn test_replace_without_voted_ids_keeps_flags() {
        let board = FeatureBoard::new();
        board.replace_all(
            vec![feature(1, "Export", 2), feature(2, "Sync", 0)],
            Some(&[id(1)]),
        );

        board.replace_all(vec![feature(1, "Export", 5), feature(3, "Tags", 1)], None);

        assert!(board.entry(id(1)).unwrap().voted);
        assert_eq!(board.entry(id(1)).unwrap().feature.vote_count, 5);
        assert!(!board.entry(id(3)).unwrap().voted);
        assert!(board.entry(id(2)).is_none());
    }

    #[test]
    fn test_insert_front_and_remove() {
        let board = FeatureBoard::new();
        board.replace_all(vec![feature(1, "Export", 0)], Some(&[]));

        board.insert_front(feature(2, "Tags", 0));
        assert_eq!(listed_ids(&board), vec![2, 1]);

        assert!(board.remove(id(1)).is_some());
        assert!(board.remove(id(1)).is_none());
        assert_eq!(listed_ids(&board), vec![2]);
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let board = FeatureBoard::new();
        let mut rx = board.subscribe();

        board.replace_all(vec![feature(1, "Export", 0)], Some(&[]));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        board.set_load_state(LoadState::Ready);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().load_state, LoadState::Ready);

        board.set_load_state(LoadState::Ready);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_notice_dismissal() {
        let board = FeatureBoard::new();
        board.set_notice(Notice::vote_error(id(1), "Feature not found"));
        assert!(board.snapshot().notice.is_some());
        board.dismiss_notice();
        assert!(board.snapshot().notice.is_none());
    }
}

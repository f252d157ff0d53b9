// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! History system for undo/redo functionality.
//!
//! The undo stack holds full scene snapshots and its top always mirrors
//! the live graph; the first entry is the baseline taken after load.
//! Stacks only move after the scene store accepted the replayed snapshot,
//! so the graph can never end up in a merged or partial state.

use super::store::{ChangeOrigin, SceneEvent, SceneObserver, SceneStore};
use crate::error::EditorResult;
use crate::models::scene::Snapshot;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::VecDeque;

/// One recorded scene state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub snapshot: Snapshot,
    pub taken_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            taken_at: Utc::now(),
        }
    }
}

pub struct HistoryManager {
    /// Undo stack (past states, top = current)
    undo_stack: VecDeque<HistoryEntry>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<HistoryEntry>,
    /// Maximum number of undoable steps kept above the oldest entry
    max_size: usize,
    replaying: bool,
}

impl HistoryManager {
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            replaying: false,
        }
    }

    /// Record the state after a committed mutation.
    pub fn record(&mut self, snapshot: Snapshot) {
        if self.replaying {
            return;
        }
        self.undo_stack.push_back(HistoryEntry::new(snapshot));
        self.evict();
        // Clear redo stack when new action is performed
        self.redo_stack.clear();
    }

    /// Reset both stacks to a single baseline entry.
    pub fn set_baseline(&mut self, snapshot: Snapshot) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push_back(HistoryEntry::new(snapshot));
        log::debug!("History baseline established");
    }

    /// Check if undo is available (the baseline itself can't be undone)
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// State an undo would restore: the entry beneath the current one.
    fn undo_target(&self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.undo_stack
            .get(self.undo_stack.len() - 2)
            .map(|e| e.snapshot.clone())
    }

    fn redo_target(&self) -> Option<Snapshot> {
        self.redo_stack.last().map(|e| e.snapshot.clone())
    }

    // Limit history size; the entry below the oldest step is its base state
    fn evict(&mut self) {
        while self.undo_stack.len() > self.max_size + 1 {
            self.undo_stack.pop_front();
        }
    }

    fn commit_undo(&mut self) {
        if let Some(current) = self.undo_stack.pop_back() {
            self.redo_stack.push(current);
        }
    }

    fn commit_redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push_back(next);
            self.evict();
        }
    }
}

impl SceneObserver for HistoryManager {
    fn on_scene_change(&mut self, event: &SceneEvent) {
        if event.origin == ChangeOrigin::User {
            self.record(event.snapshot.clone());
        }
    }
}

/// Undo the last change. Returns `Ok(false)` when only the baseline is left.
///
/// The history must not be borrowed by the caller: the replay notifies it
/// through the store like any other observer.
pub fn undo(history: &RefCell<HistoryManager>, store: &mut SceneStore) -> EditorResult<bool> {
    let Some(target) = history.borrow().undo_target() else {
        return Ok(false);
    };
    replay(history, store, &target)?;
    history.borrow_mut().commit_undo();
    log::info!("Undo ({} entries left)", history.borrow().undo_len());
    Ok(true)
}

/// Redo the last undone change. Returns `Ok(false)` when there is nothing
/// to redo.
pub fn redo(history: &RefCell<HistoryManager>, store: &mut SceneStore) -> EditorResult<bool> {
    let Some(target) = history.borrow().redo_target() else {
        return Ok(false);
    };
    replay(history, store, &target)?;
    history.borrow_mut().commit_redo();
    log::info!("Redo ({} entries left)", history.borrow().redo_len());
    Ok(true)
}

fn replay(history: &RefCell<HistoryManager>, store: &mut SceneStore, target: &Snapshot) -> EditorResult<()> {
    history.borrow_mut().replaying = true;
    let result = store.replay(target);
    history.borrow_mut().replaying = false;
    if let Err(ref e) = result {
        log::error!("History replay failed: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::store::ObserverOrder;
    use crate::models::object::{ImageObject, ObjectKind, SceneObject, Transform};
    use std::rc::Rc;

    fn setup(depth: usize) -> (SceneStore, Rc<RefCell<HistoryManager>>) {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        store.add_object(SceneObject::new(
            ObjectKind::Image(ImageObject::new("base.png", 800, 600)),
            Transform::default(),
        ));
        let history = Rc::new(RefCell::new(HistoryManager::new(depth)));
        store.subscribe(ObserverOrder::History, &history);
        history.borrow_mut().set_baseline(store.serialize().unwrap());
        (store, history)
    }

    fn nudge(store: &mut SceneStore, amount: f64) {
        let id = store.objects()[0].id;
        store
            .modify_object(id, |o| o.transform.left += amount)
            .unwrap();
    }

    #[test]
    fn test_n_mutations_then_n_undos_returns_to_baseline() {
        for n in 1..=20 {
            let (mut store, history) = setup(20);
            let baseline = store.serialize().unwrap();
            for i in 0..n {
                nudge(&mut store, i as f64 + 1.0);
            }
            for _ in 0..n {
                assert!(undo(&history, &mut store).unwrap());
            }
            assert_eq!(store.serialize().unwrap(), baseline, "n = {}", n);
        }
    }

    #[test]
    fn test_undo_at_baseline_is_noop() {
        let (mut store, history) = setup(20);
        let before = store.serialize().unwrap();
        assert!(!undo(&history, &mut store).unwrap());
        assert!(!undo(&history, &mut store).unwrap());
        assert_eq!(store.serialize().unwrap(), before);
        assert_eq!(history.borrow().undo_len(), 1);
        assert_eq!(history.borrow().redo_len(), 0);
    }

    #[test]
    fn test_redo_cleared_by_new_mutation() {
        let (mut store, history) = setup(20);
        nudge(&mut store, 1.0);
        nudge(&mut store, 1.0);
        undo(&history, &mut store).unwrap();
        assert!(history.borrow().can_redo());

        nudge(&mut store, 3.0);
        assert!(!history.borrow().can_redo());
    }

    #[test]
    fn test_replay_is_not_recorded() {
        let (mut store, history) = setup(20);
        nudge(&mut store, 1.0);
        assert_eq!(history.borrow().undo_len(), 2);
        undo(&history, &mut store).unwrap();
        assert_eq!(history.borrow().undo_len(), 1);
        assert_eq!(history.borrow().redo_len(), 1);
        redo(&history, &mut store).unwrap();
        assert_eq!(history.borrow().undo_len(), 2);
        assert_eq!(history.borrow().redo_len(), 0);
    }

    #[test]
    fn test_undo_redo_walks_exact_states() {
        let (mut store, history) = setup(20);
        let s0 = store.serialize().unwrap();
        nudge(&mut store, 1.0);
        let s1 = store.serialize().unwrap();
        nudge(&mut store, 1.0);
        let s2 = store.serialize().unwrap();

        undo(&history, &mut store).unwrap();
        assert_eq!(store.serialize().unwrap(), s1);
        undo(&history, &mut store).unwrap();
        assert_eq!(store.serialize().unwrap(), s0);
        redo(&history, &mut store).unwrap();
        assert_eq!(store.serialize().unwrap(), s1);
        redo(&history, &mut store).unwrap();
        assert_eq!(store.serialize().unwrap(), s2);
        assert!(!redo(&history, &mut store).unwrap());
    }

    #[test]
    fn test_depth_evicts_oldest() {
        let (mut store, history) = setup(3);
        for _ in 0..5 {
            nudge(&mut store, 1.0);
        }
        assert_eq!(history.borrow().undo_len(), 4);
        for _ in 0..3 {
            assert!(undo(&history, &mut store).unwrap());
        }
        assert!(!undo(&history, &mut store).unwrap());
        // Baseline was evicted: we stop at the oldest kept state
        assert_eq!(store.objects()[0].transform.left, 2.0);
    }

    #[test]
    fn test_failed_replay_leaves_stacks() {
        let mut history = HistoryManager::new(20);
        history.set_baseline(Snapshot::from_raw("garbage"));
        history.record(Snapshot::from_raw("also garbage"));
        let history = RefCell::new(history);

        let mut store = SceneStore::new(10, 10, "#fff");
        let before = store.serialize().unwrap();
        assert!(undo(&history, &mut store).is_err());
        assert_eq!(history.borrow().undo_len(), 2);
        assert_eq!(history.borrow().redo_len(), 0);
        assert!(!history.borrow().is_replaying());
        assert_eq!(store.serialize().unwrap(), before);
    }
}

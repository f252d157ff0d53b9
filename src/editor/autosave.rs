// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Debounced persistence of the scene to the project store.
//!
//! Each scene change restarts the debounce; when it expires the latest
//! snapshot is written on a background thread. Results come back over a
//! channel and are collected by [`AutosaveCoordinator::poll`].

use super::schedule::ScheduledTask;
use super::store::{ChangeOrigin, SceneEvent, SceneObserver};
use crate::error::{EditorError, EditorResult};
use crate::models::project::{ProjectId, ProjectPatch};
use crate::models::scene::Snapshot;
use crate::services::project_store::ProjectStore;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What started a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Debounced,
    Manual,
}

/// Result of one background save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub trigger: SaveTrigger,
    /// Sequence number of the save, in start order.
    pub sequence: u64,
    pub result: EditorResult<()>,
}

pub struct AutosaveCoordinator {
    project_id: ProjectId,
    projects: Arc<dyn ProjectStore>,
    debounce: ScheduledTask,
    /// Snapshot from the most recent change not yet handed to a save.
    latest: Option<Snapshot>,
    sender: Sender<SaveOutcome>,
    receiver: Receiver<SaveOutcome>,
    in_flight: usize,
    next_sequence: u64,
    last_error: Option<EditorError>,
}

impl AutosaveCoordinator {
    pub fn new(project_id: ProjectId, projects: Arc<dyn ProjectStore>, delay: Duration) -> Self {
        let (sender, receiver) = channel();
        Self {
            project_id,
            projects,
            debounce: ScheduledTask::new(delay),
            latest: None,
            sender,
            receiver,
            in_flight: 0,
            next_sequence: 1,
            last_error: None,
        }
    }

    /// True while a debounced save is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Saves started but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&EditorError> {
        self.last_error.as_ref()
    }

    /// Start the debounced save if its quiet period is over. Returns true
    /// when a save was started.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.debounce.fire_if_due(now) {
            return false;
        }
        match self.latest.take() {
            Some(snapshot) => {
                self.spawn_save(ProjectPatch::scene(snapshot), SaveTrigger::Debounced);
                true
            }
            None => false,
        }
    }

    /// Persist immediately. A pending debounce keeps running.
    pub fn save_now(&mut self, patch: ProjectPatch) {
        self.spawn_save(patch, SaveTrigger::Manual);
    }

    /// Write whatever the debounce is still holding, right away.
    pub fn save_pending(&mut self) -> bool {
        self.debounce.cancel();
        match self.latest.take() {
            Some(snapshot) => {
                self.spawn_save(ProjectPatch::scene(snapshot), SaveTrigger::Manual);
                true
            }
            None => false,
        }
    }

    /// Drop the pending debounced save without writing it.
    pub fn cancel_pending(&mut self) {
        self.debounce.cancel();
        self.latest = None;
    }

    /// Collect finished saves without blocking.
    pub fn poll(&mut self) -> Vec<SaveOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.receiver.try_recv() {
            self.collect(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Block until every started save reported back or `timeout` elapsed.
    pub fn flush(&mut self, timeout: Duration) -> Vec<SaveOutcome> {
        let deadline = Instant::now() + timeout;
        let mut outcomes = self.poll();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.collect(&outcome);
                    outcomes.push(outcome);
                }
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!("{} save(s) still running after flush timeout", self.in_flight);
                    break;
                }
                // Unreachable while we hold a sender
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        outcomes
    }

    fn collect(&mut self, outcome: &SaveOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match &outcome.result {
            Ok(()) => {
                log::info!("Project {} saved ({:?} #{})", self.project_id, outcome.trigger, outcome.sequence);
                self.last_error = None;
            }
            Err(e) => {
                log::error!("Saving project {} failed: {}", self.project_id, e);
                self.last_error = Some(e.clone());
            }
        }
    }

    fn spawn_save(&mut self, patch: ProjectPatch, trigger: SaveTrigger) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.in_flight += 1;

        let sender = self.sender.clone();
        let projects = Arc::clone(&self.projects);
        let id = self.project_id.clone();
        log::debug!("Starting {:?} save #{} for project {}", trigger, sequence, id);

        std::thread::spawn(move || {
            let result = projects.patch_project(&id, &patch).map(|_| ());
            // The session may have gone away; nothing to report to then
            let _ = sender.send(SaveOutcome {
                trigger,
                sequence,
                result,
            });
        });
    }
}

impl SceneObserver for AutosaveCoordinator {
    fn on_scene_change(&mut self, event: &SceneEvent) {
        if event.origin == ChangeOrigin::Load {
            return;
        }
        self.latest = Some(event.snapshot.clone());
        self.debounce.arm(event.at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::store::ChangeKind;
    use crate::models::project::Project;
    use crate::services::project_store::InMemoryProjectStore;

    fn setup() -> (Arc<InMemoryProjectStore>, AutosaveCoordinator) {
        let store = Arc::new(InMemoryProjectStore::new());
        store.insert(Project::new("p1", "Autosave", 800, 600));
        let coordinator =
            AutosaveCoordinator::new(ProjectId::new("p1"), store.clone(), Duration::from_secs(2));
        (store, coordinator)
    }

    fn event(raw: &str, origin: ChangeOrigin, at: Instant) -> SceneEvent {
        SceneEvent {
            kind: ChangeKind::Background,
            origin,
            revision: 1,
            snapshot: Snapshot::from_raw(raw),
            at,
        }
    }

    #[test]
    fn test_burst_of_changes_saves_latest_once() {
        let (store, mut autosave) = setup();
        let start = Instant::now();
        autosave.on_scene_change(&event("first", ChangeOrigin::User, start));
        autosave.on_scene_change(&event("second", ChangeOrigin::User, start + Duration::from_secs(1)));

        // The second change pushed the deadline out
        assert!(!autosave.tick(start + Duration::from_millis(2500)));
        assert!(autosave.tick(start + Duration::from_secs(3)));
        assert!(!autosave.tick(start + Duration::from_secs(10)));

        let outcomes = autosave.flush(Duration::from_secs(5));
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].result, Ok(()));
        let saved = store.get_project(&ProjectId::new("p1")).unwrap();
        assert_eq!(saved.scene_state, Some(Snapshot::from_raw("second")));
    }

    #[test]
    fn test_load_events_do_not_arm() {
        let (_, mut autosave) = setup();
        autosave.on_scene_change(&event("loaded", ChangeOrigin::Load, Instant::now()));
        assert!(!autosave.is_pending());
    }

    #[test]
    fn test_manual_save_keeps_debounce() {
        let (_, mut autosave) = setup();
        let start = Instant::now();
        autosave.on_scene_change(&event("edit", ChangeOrigin::User, start));
        autosave.save_now(ProjectPatch::scene(Snapshot::from_raw("manual")));
        assert!(autosave.is_pending());

        let outcomes = autosave.flush(Duration::from_secs(5));
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].trigger, SaveTrigger::Manual);
    }

    #[test]
    fn test_failed_save_is_reported() {
        let store = Arc::new(InMemoryProjectStore::new());
        let mut autosave =
            AutosaveCoordinator::new(ProjectId::new("missing"), store, Duration::from_secs(2));
        autosave.save_now(ProjectPatch::scene(Snapshot::from_raw("x")));

        let outcomes = autosave.flush(Duration::from_secs(5));
        assert_eq!(outcomes[0].result, Err(EditorError::NotFound(ProjectId::new("missing"))));
        assert!(autosave.last_error().is_some());
        assert_eq!(autosave.in_flight(), 0);
    }
}

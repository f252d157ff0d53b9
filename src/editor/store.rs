// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene store: the owned, mutable scene graph of one editing session.
//!
//! Every mutating call emits exactly one [`SceneEvent`] to the subscribed
//! observers, in [`ObserverOrder`] order. Interaction state (selection,
//! drawing mode, cursor) lives here too but never emits.

use crate::error::{EditorError, EditorResult};
use crate::models::object::{ObjectId, SceneObject};
use crate::models::scene::{SceneGraph, Snapshot};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

/// What changed in the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    Added(ObjectId),
    Removed(Vec<ObjectId>),
    Modified(ObjectId),
    Replaced { old: ObjectId, new: ObjectId },
    Restored,
    Resized { width: u32, height: u32 },
    Cleared,
    Background,
}

/// Why it changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// A user-driven edit (tools, masks, AI results).
    User,
    /// An undo/redo replay.
    Replay,
    /// Rehydration from persisted state.
    Load,
}

/// Change notification delivered to observers.
#[derive(Debug, Clone)]
pub struct SceneEvent {
    pub kind: ChangeKind,
    pub origin: ChangeOrigin,
    /// Monotonic mutation counter of the store.
    pub revision: u64,
    /// Graph state right after the change.
    pub snapshot: Snapshot,
    pub at: Instant,
}

/// Receiver of scene change notifications.
pub trait SceneObserver {
    fn on_scene_change(&mut self, event: &SceneEvent);
}

/// Delivery order of observers. Lower values are notified first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObserverOrder {
    History = 0,
    Autosave = 1,
    Other = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    order: ObserverOrder,
    observer: Weak<RefCell<dyn SceneObserver>>,
}

/// Pointer affordance requested by the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Brush,
    Crosshair,
}

pub struct SceneStore {
    graph: SceneGraph,
    next_id: u64,
    revision: u64,
    active: Option<ObjectId>,
    selection_enabled: bool,
    drawing_mode: bool,
    cursor: Cursor,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl SceneStore {
    /// Create an empty canvas.
    pub fn new(width: u32, height: u32, background: impl Into<String>) -> Self {
        Self::from_graph(SceneGraph::new(width, height, background))
    }

    fn from_graph(graph: SceneGraph) -> Self {
        let next_id = graph.max_id() + 1;
        Self {
            graph,
            next_id,
            revision: 0,
            active: None,
            selection_enabled: true,
            drawing_mode: false,
            cursor: Cursor::Default,
            subscribers: Vec::new(),
            next_subscription: 1,
        }
    }

    // ---- observers ----

    /// Register an observer. The store only keeps a weak reference, so
    /// dropping the observer ends the subscription.
    pub fn subscribe<O>(&mut self, order: ObserverOrder, observer: &Rc<RefCell<O>>) -> SubscriptionId
    where
        O: SceneObserver + 'static,
    {
        let strong: Rc<RefCell<dyn SceneObserver>> = observer.clone();
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        // Stable insert: after every subscriber with the same or lower order
        let pos = self
            .subscribers
            .iter()
            .position(|s| s.order > order)
            .unwrap_or(self.subscribers.len());
        self.subscribers.insert(
            pos,
            Subscriber {
                id,
                order,
                observer: Rc::downgrade(&strong),
            },
        );
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn clear_observers(&mut self) {
        self.subscribers.clear();
    }

    /// Number of observers still alive.
    pub fn observer_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|s| s.observer.strong_count() > 0)
            .count()
    }

    fn emit(&mut self, kind: ChangeKind, origin: ChangeOrigin) {
        self.revision += 1;
        self.subscribers.retain(|s| s.observer.strong_count() > 0);
        if self.subscribers.is_empty() {
            return;
        }

        let snapshot = match self.serialize() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Failed to snapshot scene for change notification: {}", e);
                return;
            }
        };
        let event = SceneEvent {
            kind,
            origin,
            revision: self.revision,
            snapshot,
            at: Instant::now(),
        };

        let observers: Vec<_> = self
            .subscribers
            .iter()
            .filter_map(|s| s.observer.upgrade())
            .collect();
        for observer in observers {
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.on_scene_change(&event),
                Err(_) => log::warn!(
                    "Observer busy, dropped {:?} notification (revision {})",
                    event.kind,
                    event.revision
                ),
            }
        }
    }

    // ---- queries ----

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.graph.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.graph.get(id)
    }

    pub fn len(&self) -> usize {
        self.graph.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.objects.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.graph.width
    }

    pub fn height(&self) -> u32 {
        self.graph.height
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The first image object, the subject of AI operations.
    pub fn find_main_image(&self) -> Option<&SceneObject> {
        self.graph.main_image()
    }

    pub fn path_ids(&self) -> Vec<ObjectId> {
        self.graph
            .objects
            .iter()
            .filter(|o| o.is_path())
            .map(|o| o.id)
            .collect()
    }

    pub fn serialize(&self) -> EditorResult<Snapshot> {
        Snapshot::from_graph(&self.graph)
    }

    // ---- mutations ----

    /// Append an object on top of the stack and return its new id.
    pub fn add_object(&mut self, mut object: SceneObject) -> ObjectId {
        let id = self.allocate_id();
        object.id = id;
        self.graph.objects.push(object);
        self.emit(ChangeKind::Added(id), ChangeOrigin::User);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> EditorResult<SceneObject> {
        let index = self.graph.index_of(id).ok_or_else(|| missing(id))?;
        let removed = self.graph.objects.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        self.emit(ChangeKind::Removed(vec![id]), ChangeOrigin::User);
        Ok(removed)
    }

    /// Remove every object matching `predicate` as a single change.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<SceneObject>
    where
        F: FnMut(&SceneObject) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) =
            self.graph.objects.drain(..).partition(|o| predicate(o));
        self.graph.objects = kept;
        if removed.is_empty() {
            return removed;
        }

        let ids: Vec<ObjectId> = removed.iter().map(|o| o.id).collect();
        if self.active.is_some_and(|a| ids.contains(&a)) {
            self.active = None;
        }
        self.emit(ChangeKind::Removed(ids), ChangeOrigin::User);
        removed
    }

    /// Swap `old` for `replacement` in the same z-slot. The replacement
    /// inherits old's position, scale, rotation and origin.
    pub fn replace_object(&mut self, old: ObjectId, mut replacement: SceneObject) -> EditorResult<ObjectId> {
        let index = self.graph.index_of(old).ok_or_else(|| missing(old))?;
        let id = self.allocate_id();
        replacement.id = id;
        replacement.transform = self.graph.objects[index].transform;
        self.graph.objects[index] = replacement;
        if self.active == Some(old) {
            self.active = Some(id);
        }
        self.emit(ChangeKind::Replaced { old, new: id }, ChangeOrigin::User);
        Ok(id)
    }

    /// Edit one object in place. Emits only when something changed.
    pub fn modify_object<F>(&mut self, id: ObjectId, edit: F) -> EditorResult<()>
    where
        F: FnOnce(&mut SceneObject),
    {
        let index = self.graph.index_of(id).ok_or_else(|| missing(id))?;
        let mut updated = self.graph.objects[index].clone();
        edit(&mut updated);
        updated.id = id;
        if updated == self.graph.objects[index] {
            return Ok(());
        }
        updated.check().map_err(EditorError::InvalidState)?;
        self.graph.objects[index] = updated;
        self.emit(ChangeKind::Modified(id), ChangeOrigin::User);
        Ok(())
    }

    /// Apply a whole-graph edit atomically: `edit` runs on a scratch copy
    /// and the result is swapped in only if it succeeds and validates.
    pub fn edit_graph<F>(&mut self, kind: ChangeKind, edit: F) -> EditorResult<()>
    where
        F: FnOnce(&mut SceneGraph) -> EditorResult<()>,
    {
        let mut scratch = self.graph.clone();
        edit(&mut scratch)?;
        scratch.validate()?;
        self.graph = scratch;
        self.next_id = self.next_id.max(self.graph.max_id() + 1);
        if self.active.is_some_and(|a| self.graph.get(a).is_none()) {
            self.active = None;
        }
        self.emit(kind, ChangeOrigin::User);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.graph.objects.clear();
        self.active = None;
        self.emit(ChangeKind::Cleared, ChangeOrigin::User);
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        let color = color.into();
        if self.graph.background == color {
            return;
        }
        self.graph.background = color;
        self.emit(ChangeKind::Background, ChangeOrigin::User);
    }

    /// Replace the whole graph from persisted state.
    ///
    /// On failure the current graph is untouched.
    pub fn restore(&mut self, snapshot: &Snapshot) -> EditorResult<()> {
        self.restore_with_origin(snapshot, ChangeOrigin::Load)
    }

    /// Replace the whole graph as part of an undo/redo replay.
    pub fn replay(&mut self, snapshot: &Snapshot) -> EditorResult<()> {
        self.restore_with_origin(snapshot, ChangeOrigin::Replay)
    }

    fn restore_with_origin(&mut self, snapshot: &Snapshot, origin: ChangeOrigin) -> EditorResult<()> {
        // Decode into a scratch graph first; nothing is touched on failure
        let graph = snapshot.decode()?;

        self.next_id = self.next_id.max(graph.max_id() + 1);
        self.graph = graph;
        if self.active.is_some_and(|a| self.graph.get(a).is_none()) {
            self.active = None;
        }
        self.emit(ChangeKind::Restored, origin);
        Ok(())
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    // ---- interaction state (never emits) ----

    pub fn active_object(&self) -> Option<&SceneObject> {
        self.active.and_then(|id| self.graph.get(id))
    }

    pub fn set_active(&mut self, id: ObjectId) -> EditorResult<()> {
        let obj = self.graph.get(id).ok_or_else(|| missing(id))?;
        if !self.selection_enabled || !obj.selectable {
            return Err(EditorError::InvalidState(format!("object {} is not selectable", id)));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn discard_active(&mut self) {
        self.active = None;
    }

    pub fn set_interactive(&mut self, id: ObjectId, interactive: bool) -> EditorResult<()> {
        let index = self.graph.index_of(id).ok_or_else(|| missing(id))?;
        self.graph.objects[index].set_interactive(interactive);
        Ok(())
    }

    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    pub fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
    }

    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn set_drawing_mode(&mut self, drawing: bool) {
        self.drawing_mode = drawing;
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }
}

fn missing(id: ObjectId) -> EditorError {
    EditorError::InvalidState(format!("object {} is not in the scene", id))
}

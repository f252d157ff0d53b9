// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AI edit orchestration.
//!
//! Each operation kind runs at most one remote call at a time. The call
//! happens on a background thread; its result is merged into the scene on
//! the session thread by [`AiEditOrchestrator::poll`].

use super::store::SceneStore;
use crate::error::{EditorError, EditorResult};
use crate::models::object::{ImageObject, ObjectId, ObjectKind, SceneObject};
use crate::services::ai::{AiService, MaskUpload, RemoteImage};
use crate::tools;
use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Remote operation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiOperationKind {
    Cleanup,
    Extend,
    Retouch,
    Generate,
}

impl AiOperationKind {
    pub const ALL: [AiOperationKind; 4] = [
        AiOperationKind::Cleanup,
        AiOperationKind::Extend,
        AiOperationKind::Retouch,
        AiOperationKind::Generate,
    ];
}

impl fmt::Display for AiOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AiOperationKind::Cleanup => "AI cleanup",
            AiOperationKind::Extend => "AI extend",
            AiOperationKind::Retouch => "AI retouch",
            AiOperationKind::Generate => "AI image generation",
        };
        f.write_str(name)
    }
}

/// Inputs captured at invocation time.
#[derive(Debug, Clone)]
pub enum AiRequest {
    Cleanup {
        target: ObjectId,
        image_url: String,
        mask: MaskUpload,
    },
    Extend {
        target: ObjectId,
        image_url: String,
        width: u32,
        height: u32,
    },
    Retouch {
        target: ObjectId,
        image_url: String,
        prompt: String,
    },
    Generate {
        prompt: String,
        style: String,
    },
}

impl AiRequest {
    pub fn kind(&self) -> AiOperationKind {
        match self {
            AiRequest::Cleanup { .. } => AiOperationKind::Cleanup,
            AiRequest::Extend { .. } => AiOperationKind::Extend,
            AiRequest::Retouch { .. } => AiOperationKind::Retouch,
            AiRequest::Generate { .. } => AiOperationKind::Generate,
        }
    }

    /// Object to be replaced by the result; `None` adds a new object.
    pub fn target(&self) -> Option<ObjectId> {
        match self {
            AiRequest::Cleanup { target, .. }
            | AiRequest::Extend { target, .. }
            | AiRequest::Retouch { target, .. } => Some(*target),
            AiRequest::Generate { .. } => None,
        }
    }

    fn execute(&self, service: &dyn AiService) -> EditorResult<RemoteImage> {
        match self {
            AiRequest::Cleanup { image_url, mask, .. } => service.cleanup(image_url, mask),
            AiRequest::Extend {
                image_url,
                width,
                height,
                ..
            } => service.extend(image_url, *width, *height),
            AiRequest::Retouch { image_url, prompt, .. } => service.retouch(image_url, prompt),
            AiRequest::Generate { prompt, style } => service.text_to_image(prompt, style),
        }
    }
}

/// Lifecycle of one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationState {
    #[default]
    Idle,
    Pending,
    Applying,
    Done,
    Failed,
}

#[derive(Debug, Default)]
struct Invocation {
    state: InvocationState,
    target: Option<ObjectId>,
    started: Option<Instant>,
    result: Option<ObjectId>,
    error: Option<EditorError>,
}

/// A remote result that has been merged (or refused) on this poll.
#[derive(Debug, Clone, PartialEq)]
pub struct AiOutcome {
    pub kind: AiOperationKind,
    /// Id of the object now holding the result.
    pub result: EditorResult<ObjectId>,
}

type Reply = (AiOperationKind, EditorResult<RemoteImage>);

pub struct AiEditOrchestrator {
    service: Arc<dyn AiService>,
    invocations: HashMap<AiOperationKind, Invocation>,
    sender: Sender<Reply>,
    receiver: Option<Receiver<Reply>>,
}

impl AiEditOrchestrator {
    pub fn new(service: Arc<dyn AiService>) -> Self {
        let (sender, receiver) = channel();
        Self {
            service,
            invocations: HashMap::new(),
            sender,
            receiver: Some(receiver),
        }
    }

    pub fn state(&self, kind: AiOperationKind) -> InvocationState {
        self.invocations.get(&kind).map(|i| i.state).unwrap_or_default()
    }

    pub fn is_pending(&self, kind: AiOperationKind) -> bool {
        self.state(kind) == InvocationState::Pending
    }

    pub fn any_pending(&self) -> bool {
        AiOperationKind::ALL.iter().any(|k| self.is_pending(*k))
    }

    pub fn last_error(&self, kind: AiOperationKind) -> Option<&EditorError> {
        self.invocations.get(&kind).and_then(|i| i.error.as_ref())
    }

    /// Object created by the last successful run of `kind`.
    pub fn last_result(&self, kind: AiOperationKind) -> Option<ObjectId> {
        self.invocations.get(&kind).and_then(|i| i.result)
    }

    /// How long the pending call of `kind` has been running.
    pub fn elapsed(&self, kind: AiOperationKind, now: Instant) -> Option<Duration> {
        let invocation = self.invocations.get(&kind)?;
        if invocation.state != InvocationState::Pending {
            return None;
        }
        invocation.started.map(|s| now.saturating_duration_since(s))
    }

    /// Start the remote call for `request`. Fails with `Busy` while the
    /// same kind is pending.
    pub fn invoke(&mut self, request: AiRequest) -> EditorResult<()> {
        let kind = request.kind();
        if self.receiver.is_none() {
            return Err(EditorError::InvalidState("AI orchestrator is shut down".to_string()));
        }
        if self.is_pending(kind) {
            return Err(EditorError::Busy(kind));
        }

        self.invocations.insert(
            kind,
            Invocation {
                state: InvocationState::Pending,
                target: request.target(),
                started: Some(Instant::now()),
                result: None,
                error: None,
            },
        );
        log::info!("{} started", kind);

        let sender = self.sender.clone();
        let service = Arc::clone(&self.service);
        std::thread::spawn(move || {
            let result = request.execute(service.as_ref());
            let _ = sender.send((kind, result));
        });
        Ok(())
    }

    /// Merge every remote result that has arrived into the scene.
    pub fn poll(&mut self, store: &mut SceneStore) -> Vec<AiOutcome> {
        let replies: Vec<Reply> = match self.receiver {
            Some(ref receiver) => receiver.try_iter().collect(),
            None => return Vec::new(),
        };
        replies
            .into_iter()
            .filter_map(|(kind, result)| self.apply(store, kind, result))
            .collect()
    }

    /// Block until `kind` leaves Pending or `timeout` elapses, merging
    /// results as they arrive.
    pub fn wait(&mut self, store: &mut SceneStore, kind: AiOperationKind, timeout: Duration) -> Vec<AiOutcome> {
        let deadline = Instant::now() + timeout;
        let mut outcomes = Vec::new();
        loop {
            outcomes.extend(self.poll(store));
            if !self.is_pending(kind) || Instant::now() >= deadline {
                return outcomes;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn apply(&mut self, store: &mut SceneStore, kind: AiOperationKind, result: EditorResult<RemoteImage>) -> Option<AiOutcome> {
        let invocation = self.invocations.entry(kind).or_default();
        if invocation.state != InvocationState::Pending {
            log::warn!("Ignoring unexpected {} result", kind);
            return None;
        }
        invocation.state = InvocationState::Applying;
        let target = invocation.target;

        let merged = result.and_then(|image| merge(store, target, image));
        let invocation = self.invocations.entry(kind).or_default();
        match merged {
            Ok(id) => {
                invocation.state = InvocationState::Done;
                invocation.result = Some(id);
                log::info!("{} applied as {}", kind, id);
            }
            Err(ref e) => {
                invocation.state = InvocationState::Failed;
                invocation.error = Some(e.clone());
                log::error!("{} failed: {}", kind, e);
            }
        }
        Some(AiOutcome { kind, result: merged })
    }

    /// Reset a finished kind back to Idle. Pending kinds are left alone.
    pub fn acknowledge(&mut self, kind: AiOperationKind) {
        if let Some(invocation) = self.invocations.get_mut(&kind) {
            if matches!(invocation.state, InvocationState::Done | InvocationState::Failed) {
                *invocation = Invocation::default();
            }
        }
    }

    /// Stop listening for results. Calls still in flight finish into the void.
    pub fn shutdown(&mut self) {
        if self.receiver.take().is_some() {
            let pending = AiOperationKind::ALL.iter().filter(|k| self.is_pending(**k)).count();
            if pending > 0 {
                log::warn!("Shutting down with {} AI call(s) in flight", pending);
            }
        }
        self.invocations.clear();
    }
}

fn merge(store: &mut SceneStore, target: Option<ObjectId>, image: RemoteImage) -> EditorResult<ObjectId> {
    if image.width == 0 || image.height == 0 {
        return Err(EditorError::Service(format!("service returned an empty image {}", image.url)));
    }
    match target {
        Some(old) => {
            let previous = store
                .object(old)
                .ok_or_else(|| EditorError::InvalidState(format!("target {} no longer exists", old)))?;
            let mut replacement = SceneObject::new(
                ObjectKind::Image(ImageObject::new(image.url, image.width, image.height)),
                previous.transform,
            );
            replacement.set_interactive(previous.selectable);
            let id = store.replace_object(old, replacement)?;
            if let Err(e) = store.set_active(id) {
                log::debug!("Merged object {} not selected: {}", id, e);
            }
            Ok(id)
        }
        None => {
            let object = tools::fitted_image(&image.url, image.width, image.height, store.width(), store.height());
            Ok(store.add_object(object))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::Transform;
    use crate::services::ai::UnavailableAiService;
    use std::sync::{Condvar, Mutex};

    /// Service that blocks each call until released.
    struct GatedService {
        open: Mutex<bool>,
        signal: Condvar,
    }

    impl GatedService {
        fn new() -> Self {
            Self {
                open: Mutex::new(false),
                signal: Condvar::new(),
            }
        }

        fn release(&self) {
            *self.open.lock().unwrap() = true;
            self.signal.notify_all();
        }

        fn reply(&self, url: &str) -> EditorResult<RemoteImage> {
            let mut open = self.open.lock().unwrap();
            while !*open {
                open = self.signal.wait(open).unwrap();
            }
            Ok(RemoteImage {
                url: url.to_string(),
                width: 400,
                height: 300,
            })
        }
    }

    impl AiService for GatedService {
        fn cleanup(&self, _image_url: &str, _mask: &MaskUpload) -> EditorResult<RemoteImage> {
            self.reply("cleaned.png")
        }
        fn text_to_image(&self, _prompt: &str, _style: &str) -> EditorResult<RemoteImage> {
            self.reply("generated.png")
        }
        fn extend(&self, _image_url: &str, _width: u32, _height: u32) -> EditorResult<RemoteImage> {
            self.reply("extended.png")
        }
        fn retouch(&self, _image_url: &str, _prompt: &str) -> EditorResult<RemoteImage> {
            self.reply("retouched.png")
        }
    }

    fn store_with_image() -> (SceneStore, ObjectId) {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        let id = store.add_object(SceneObject::new(
            ObjectKind::Image(ImageObject::new("photo.png", 400, 300)),
            Transform {
                left: 400.0,
                top: 300.0,
                scale_x: 1.5,
                scale_y: 1.5,
                angle: 10.0,
                origin: crate::models::object::Origin::CENTER,
            },
        ));
        (store, id)
    }

    fn cleanup(target: ObjectId) -> AiRequest {
        AiRequest::Cleanup {
            target,
            image_url: "photo.png".to_string(),
            mask: MaskUpload {
                png: Vec::new(),
                width: 400,
                height: 300,
            },
        }
    }

    #[test]
    fn test_second_invoke_while_pending_is_busy() {
        let (mut store, target) = store_with_image();
        let service = Arc::new(GatedService::new());
        let mut ai = AiEditOrchestrator::new(service.clone());

        ai.invoke(cleanup(target)).unwrap();
        assert_eq!(ai.invoke(cleanup(target)), Err(EditorError::Busy(AiOperationKind::Cleanup)));

        service.release();
        let outcomes = ai.wait(&mut store, AiOperationKind::Cleanup, Duration::from_secs(5));
        assert_eq!(outcomes.len(), 1);
        assert_eq!(ai.state(AiOperationKind::Cleanup), InvocationState::Done);

        let image = store.find_main_image().unwrap();
        assert_eq!(image.as_image().unwrap().src, "cleaned.png");
        assert_eq!(image.transform.scale_x, 1.5);
        assert_eq!(image.transform.angle, 10.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_service_failure_leaves_scene_untouched() {
        let (mut store, target) = store_with_image();
        let before = store.serialize().unwrap();
        let mut ai = AiEditOrchestrator::new(Arc::new(UnavailableAiService));

        ai.invoke(cleanup(target)).unwrap();
        ai.wait(&mut store, AiOperationKind::Cleanup, Duration::from_secs(5));
        assert_eq!(ai.state(AiOperationKind::Cleanup), InvocationState::Failed);
        assert!(matches!(ai.last_error(AiOperationKind::Cleanup), Some(EditorError::Service(_))));
        assert_eq!(store.serialize().unwrap(), before);

        ai.acknowledge(AiOperationKind::Cleanup);
        assert_eq!(ai.state(AiOperationKind::Cleanup), InvocationState::Idle);
    }

    #[test]
    fn test_vanished_target_fails() {
        let (mut store, target) = store_with_image();
        let service = Arc::new(GatedService::new());
        let mut ai = AiEditOrchestrator::new(service.clone());
        ai.invoke(cleanup(target)).unwrap();
        store.remove_object(target).unwrap();

        service.release();
        ai.wait(&mut store, AiOperationKind::Cleanup, Duration::from_secs(5));
        assert_eq!(ai.state(AiOperationKind::Cleanup), InvocationState::Failed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_generate_adds_fitted_image() {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        let service = Arc::new(GatedService::new());
        service.release();
        let mut ai = AiEditOrchestrator::new(service);
        ai.invoke(AiRequest::Generate {
            prompt: "a lighthouse".to_string(),
            style: "photo".to_string(),
        })
        .unwrap();
        ai.wait(&mut store, AiOperationKind::Generate, Duration::from_secs(5));

        let image = store.find_main_image().unwrap();
        assert_eq!(image.as_image().unwrap().src, "generated.png");
        assert_eq!(image.transform.scale_x, 2.0);
        assert_eq!(image.transform.left, 400.0);
    }

    #[test]
    fn test_shutdown_ignores_late_results() {
        let (mut store, target) = store_with_image();
        let service = Arc::new(GatedService::new());
        let mut ai = AiEditOrchestrator::new(service.clone());
        ai.invoke(cleanup(target)).unwrap();
        ai.shutdown();
        service.release();

        assert!(ai.poll(&mut store).is_empty());
        assert_eq!(store.find_main_image().unwrap().id, target);
        assert!(ai.invoke(cleanup(target)).is_err());
    }
}

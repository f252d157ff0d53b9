// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session: one open project and everything attached to it.
//!
//! The session owns the scene store and wires history, autosave, mask
//! authoring, AI orchestration and the viewport around it. It is single
//! threaded; background work reports back through [`EditingSession::tick`],
//! which the host calls from its frame or event loop.

use super::ai::{AiEditOrchestrator, AiOperationKind, AiOutcome, AiRequest, InvocationState};
use super::autosave::{AutosaveCoordinator, SaveOutcome};
use super::export::{ExportFormat, ExportJob};
use super::history::{self, HistoryManager};
use super::mask::{MaskAuthoring, MaskState};
use super::schedule::ScheduledTask;
use super::store::{Cursor, ObserverOrder, SceneStore};
use crate::config::SessionConfig;
use crate::error::{EditorError, EditorResult};
use crate::models::object::{CropRect, ObjectId, Point, StrokeStyle};
use crate::models::project::{Project, ProjectId, ProjectPatch};
use crate::services::ai::MaskUpload;
use crate::services::Services;
use crate::tools::{self, adjust, crop, presets, resize, text};
use crate::ui::toolbar::ToolId;
use crate::ui::viewport::Viewport;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// How long closing waits for saves still in flight.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Background results collected by one [`EditingSession::tick`].
#[derive(Debug, Default)]
pub struct TickReport {
    pub baseline_taken: bool,
    pub saves: Vec<SaveOutcome>,
    pub ai: Vec<AiOutcome>,
}

pub struct EditingSession {
    project: Project,
    config: SessionConfig,
    services: Services,
    store: SceneStore,
    history: Rc<RefCell<HistoryManager>>,
    autosave: Rc<RefCell<AutosaveCoordinator>>,
    mask: MaskAuthoring,
    ai: AiEditOrchestrator,
    viewport: Viewport,
    baseline: ScheduledTask,
    active_tool: Option<ToolId>,
    exports_this_month: u32,
    reload_required: bool,
    closed: bool,
}

impl EditingSession {
    /// Open a project: restore its saved scene, or bootstrap one from its
    /// image when there is none (or it cannot be decoded).
    pub fn open(project_id: &ProjectId, services: Services, config: SessionConfig) -> EditorResult<Self> {
        let project = services.projects.get_project(project_id)?;
        if project.width == 0 || project.height == 0 {
            return Err(EditorError::InvalidDimensions {
                width: project.width,
                height: project.height,
            });
        }

        let mut store = SceneStore::new(project.width, project.height, config.background.clone());
        let restored = match project.scene_state {
            Some(ref snapshot) => match store.restore(snapshot) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Saved scene of project {} is unusable ({}), rebuilding", project.id, e);
                    false
                }
            },
            None => false,
        };
        if !restored {
            if let Some(url) = project.source_image_url() {
                let (width, height) = services.probe.probe(url)?;
                store.add_object(tools::fitted_image(url, width, height, project.width, project.height));
            }
        }

        let history = Rc::new(RefCell::new(HistoryManager::new(config.history_depth)));
        let autosave = Rc::new(RefCell::new(AutosaveCoordinator::new(
            project.id.clone(),
            services.projects.clone(),
            config.autosave_delay(),
        )));
        store.subscribe(ObserverOrder::History, &history);
        store.subscribe(ObserverOrder::Autosave, &autosave);

        let mut baseline = ScheduledTask::new(config.baseline_delay());
        baseline.arm(Instant::now());

        let mut viewport = Viewport::new(
            project.width,
            project.height,
            config.viewport_padding,
            config.viewport_max_scale,
        );
        viewport.set_container_size(project.width as f32, project.height as f32);

        let brush = StrokeStyle {
            width: config.brush_width,
            color: config.brush_color.clone(),
        };
        let ai = AiEditOrchestrator::new(services.ai.clone());

        log::info!(
            "Opened project {} ({}x{}, {} objects, {})",
            project.id,
            project.width,
            project.height,
            store.len(),
            if restored { "restored" } else { "bootstrapped" }
        );

        Ok(Self {
            project,
            config,
            services,
            store,
            history,
            autosave,
            mask: MaskAuthoring::new(brush),
            ai,
            viewport,
            baseline,
            active_tool: None,
            exports_this_month: 0,
            reload_required: false,
            closed: false,
        })
    }

    /// Close this session and open the project again from the store.
    pub fn reload(mut self) -> EditorResult<Self> {
        let id = self.project.id.clone();
        let services = self.services.clone();
        let config = self.config.clone();
        let exports = self.exports_this_month;
        self.close();
        let mut session = Self::open(&id, services, config)?;
        session.exports_this_month = exports;
        Ok(session)
    }

    /// Persist pending changes and detach everything. Further edits fail.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        {
            let mut autosave = self.autosave.borrow_mut();
            autosave.save_pending();
            autosave.flush(CLOSE_FLUSH_TIMEOUT);
        }
        self.ai.shutdown();
        self.store.clear_observers();
        self.closed = true;
        log::info!("Closed project {}", self.project.id);
    }

    // ---- event loop ----

    /// Run due timers and merge finished background work.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();
        if self.closed {
            return report;
        }

        if self.baseline.fire_if_due(now) {
            match self.store.serialize() {
                Ok(snapshot) => {
                    self.history.borrow_mut().set_baseline(snapshot);
                    report.baseline_taken = true;
                }
                Err(e) => log::error!("Could not take history baseline: {}", e),
            }
        }

        {
            let mut autosave = self.autosave.borrow_mut();
            autosave.tick(now);
            report.saves = autosave.poll();
        }

        report.ai = self.ai.poll(&mut self.store);
        for outcome in &report.ai {
            if outcome.kind == AiOperationKind::Cleanup {
                self.mask.finish_commit(outcome.result.is_ok());
            }
        }
        report
    }

    /// Tick until `kind` is no longer pending or `timeout` elapses.
    pub fn wait_for_ai(&mut self, kind: AiOperationKind, timeout: Duration) -> Vec<AiOutcome> {
        let deadline = Instant::now() + timeout;
        let mut outcomes = Vec::new();
        loop {
            outcomes.extend(self.tick(Instant::now()).ai);
            if !self.ai.is_pending(kind) || Instant::now() >= deadline {
                return outcomes;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Block until every save started so far has reported back.
    pub fn flush_saves(&mut self, timeout: Duration) -> Vec<SaveOutcome> {
        self.autosave.borrow_mut().flush(timeout)
    }

    // ---- queries ----

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn active_tool(&self) -> Option<ToolId> {
        self.active_tool
    }

    pub fn cursor(&self) -> Cursor {
        self.store.cursor()
    }

    pub fn can_undo(&self) -> bool {
        self.history.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.borrow().can_redo()
    }

    pub fn mask_state(&self) -> MaskState {
        self.mask.state()
    }

    pub fn mask_failed(&self) -> bool {
        self.mask.is_failed()
    }

    pub fn ai_state(&self, kind: AiOperationKind) -> InvocationState {
        self.ai.state(kind)
    }

    pub fn ai_error(&self, kind: AiOperationKind) -> Option<&EditorError> {
        self.ai.last_error(kind)
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.borrow().is_pending()
    }

    pub fn last_save_error(&self) -> Option<EditorError> {
        self.autosave.borrow().last_error().cloned()
    }

    pub fn is_reload_required(&self) -> bool {
        self.reload_required
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn exports_this_month(&self) -> u32 {
        self.exports_this_month
    }

    pub fn set_exports_this_month(&mut self, count: u32) {
        self.exports_this_month = count;
    }

    fn ensure_editable(&self) -> EditorResult<()> {
        if self.closed {
            return Err(EditorError::InvalidState("session is closed".to_string()));
        }
        if self.reload_required {
            return Err(EditorError::ReloadRequired);
        }
        Ok(())
    }

    fn require(&self, tool: ToolId) -> EditorResult<()> {
        self.ensure_editable()?;
        if !self.services.entitlements.has_access(tool) {
            return Err(EditorError::AccessDenied(tool));
        }
        Ok(())
    }

    // ---- history and saving ----

    pub fn undo(&mut self) -> EditorResult<bool> {
        self.ensure_editable()?;
        history::undo(&self.history, &mut self.store)
    }

    pub fn redo(&mut self) -> EditorResult<bool> {
        self.ensure_editable()?;
        history::redo(&self.history, &mut self.store)
    }

    /// Persist the scene now, without waiting for the debounce.
    pub fn save_now(&mut self) -> EditorResult<()> {
        if self.closed {
            return Err(EditorError::InvalidState("session is closed".to_string()));
        }
        let snapshot = self.store.serialize()?;
        self.autosave.borrow_mut().save_now(ProjectPatch::scene(snapshot));
        Ok(())
    }

    // ---- tools ----

    /// Make `tool` the active tool. Leaving the AI edit tool ends mask
    /// drawing.
    pub fn activate_tool(&mut self, tool: ToolId) -> EditorResult<()> {
        self.require(tool)?;
        if self.mask.state() == MaskState::Drawing && tool != ToolId::AiEdit {
            self.mask.exit_drawing(&mut self.store);
        }
        if self.mask.state() != MaskState::Drawing {
            self.store.set_cursor(tool.cursor());
        }
        self.active_tool = Some(tool);
        log::debug!("Active tool: {}", tool);
        Ok(())
    }

    pub fn deactivate_tool(&mut self) {
        if self.mask.state() == MaskState::Drawing {
            self.mask.exit_drawing(&mut self.store);
        }
        self.store.set_cursor(Cursor::Default);
        self.active_tool = None;
    }

    pub fn select(&mut self, id: ObjectId) -> EditorResult<()> {
        self.ensure_editable()?;
        self.store.set_active(id)
    }

    pub fn apply_adjust(&mut self, values: &adjust::AdjustValues) -> EditorResult<ObjectId> {
        self.require(ToolId::Adjust)?;
        adjust::apply(&mut self.store, values)
    }

    pub fn reset_adjust(&mut self) -> EditorResult<ObjectId> {
        self.require(ToolId::Adjust)?;
        adjust::reset(&mut self.store)
    }

    pub fn adjust_values(&self) -> EditorResult<adjust::AdjustValues> {
        adjust::current(&self.store)
    }

    pub fn apply_preset(&mut self, preset: presets::Preset) -> EditorResult<ObjectId> {
        self.require(ToolId::Filters)?;
        presets::apply(&mut self.store, preset)
    }

    pub fn crop(&mut self, rect: CropRect) -> EditorResult<ObjectId> {
        self.require(ToolId::Crop)?;
        crop::apply(&mut self.store, rect)
    }

    /// Resize the canvas and persist it. On success the session must be
    /// reloaded before further edits.
    pub fn resize(&mut self, width: u32, height: u32) -> EditorResult<bool> {
        self.require(ToolId::Resize)?;
        if !resize::apply(&mut self.store, width, height)? {
            return Ok(false);
        }

        let patch = ProjectPatch {
            scene_state: Some(self.store.serialize()?),
            width: Some(width),
            height: Some(height),
            current_image_url: None,
        };
        {
            let mut autosave = self.autosave.borrow_mut();
            // The resize save already carries this scene
            autosave.cancel_pending();
            autosave.save_now(patch);
        }
        self.project.width = width;
        self.project.height = height;
        self.viewport.set_canvas_size(width, height);
        self.reload_required = true;
        Ok(true)
    }

    /// Resize to an aspect-ratio preset with the current area.
    pub fn resize_to_preset(&mut self, preset: &resize::AspectPreset) -> EditorResult<bool> {
        let (width, height) = preset.dimensions(self.project.width, self.project.height);
        self.resize(width, height)
    }

    pub fn add_text(&mut self, content: &str, style: &text::TextStyle) -> EditorResult<ObjectId> {
        self.require(ToolId::Text)?;
        text::add(&mut self.store, content, style)
    }

    pub fn update_text(&mut self, id: ObjectId, content: &str, style: &text::TextStyle) -> EditorResult<()> {
        self.require(ToolId::Text)?;
        text::update(&mut self.store, id, content, style)
    }

    pub fn set_background(&mut self, color: &str) -> EditorResult<()> {
        self.require(ToolId::Background)?;
        self.store.set_background(color);
        Ok(())
    }

    // ---- mask authoring ----

    pub fn enter_mask_drawing(&mut self) -> EditorResult<()> {
        self.require(ToolId::AiEdit)?;
        self.mask.enter_drawing(&mut self.store)
    }

    pub fn add_mask_stroke(&mut self, points: Vec<Point>) -> EditorResult<ObjectId> {
        self.ensure_editable()?;
        self.mask.add_stroke(&mut self.store, points)
    }

    pub fn exit_mask_drawing(&mut self) {
        self.mask.exit_drawing(&mut self.store);
    }

    pub fn clear_mask(&mut self) -> EditorResult<usize> {
        self.ensure_editable()?;
        self.mask.clear_mask(&mut self.store)
    }

    // ---- AI edits ----

    /// Commit the mask and send it for cleanup.
    pub fn apply_cleanup(&mut self) -> EditorResult<()> {
        self.require(ToolId::AiEdit)?;
        if self.ai.is_pending(AiOperationKind::Cleanup) {
            return Err(EditorError::Busy(AiOperationKind::Cleanup));
        }

        let raster = self.mask.commit_mask(&mut self.store)?;
        let image_url = self
            .store
            .object(raster.target)
            .and_then(|o| o.as_image())
            .map(|i| i.src.clone())
            .ok_or(EditorError::NoSubject)?;
        let request = AiRequest::Cleanup {
            target: raster.target,
            image_url,
            mask: MaskUpload {
                width: raster.width(),
                height: raster.height(),
                png: raster.png,
            },
        };
        if let Err(e) = self.ai.invoke(request) {
            self.mask.finish_commit(false);
            return Err(e);
        }
        Ok(())
    }

    /// Outpaint the target image to `width`x`height` natural pixels.
    pub fn apply_extend(&mut self, width: u32, height: u32) -> EditorResult<()> {
        self.require(ToolId::AiExtender)?;
        if width == 0 || height == 0 {
            return Err(EditorError::InvalidDimensions { width, height });
        }
        let (target, image_url) = self.target_source()?;
        self.ai.invoke(AiRequest::Extend {
            target,
            image_url,
            width,
            height,
        })
    }

    pub fn apply_retouch(&mut self, prompt: &str) -> EditorResult<()> {
        self.require(ToolId::AiEdit)?;
        let (target, image_url) = self.target_source()?;
        self.ai.invoke(AiRequest::Retouch {
            target,
            image_url,
            prompt: prompt.to_string(),
        })
    }

    /// Generate an image from a prompt and add it to the canvas.
    pub fn generate_image(&mut self, prompt: &str, style: &str) -> EditorResult<()> {
        self.require(ToolId::AiEdit)?;
        if prompt.trim().is_empty() {
            return Err(EditorError::InvalidState("prompt is empty".to_string()));
        }
        self.ai.invoke(AiRequest::Generate {
            prompt: prompt.to_string(),
            style: style.to_string(),
        })
    }

    pub fn acknowledge_ai(&mut self, kind: AiOperationKind) {
        self.ai.acknowledge(kind);
    }

    fn target_source(&self) -> EditorResult<(ObjectId, String)> {
        let target = tools::target_image(&self.store)?;
        let src = self
            .store
            .object(target)
            .and_then(|o| o.as_image())
            .map(|i| i.src.clone())
            .ok_or(EditorError::NoTarget)?;
        Ok((target, src))
    }

    // ---- project-level operations ----

    /// Upload image bytes and place the result on the canvas.
    pub fn upload_image(&mut self, bytes: &[u8], filename: &str) -> EditorResult<ObjectId> {
        self.ensure_editable()?;
        let uploaded = self.services.storage.upload(bytes, filename)?;
        let object = tools::fitted_image(
            &uploaded.url,
            uploaded.width,
            uploaded.height,
            self.store.width(),
            self.store.height(),
        );
        Ok(self.store.add_object(object))
    }

    /// Throw away every edit and start again from the project's original
    /// image.
    pub fn reset_to_original(&mut self) -> EditorResult<()> {
        self.ensure_editable()?;
        let original = self
            .project
            .original_image_url
            .clone()
            .ok_or_else(|| EditorError::InvalidState("no original image to reset to".to_string()))?;
        let (width, height) = self.services.probe.probe(&original)?;

        if self.mask.state() == MaskState::Drawing {
            self.mask.exit_drawing(&mut self.store);
        }
        self.store.clear();
        self.store.add_object(tools::fitted_image(
            &original,
            width,
            height,
            self.store.width(),
            self.store.height(),
        ));

        let patch = ProjectPatch {
            scene_state: Some(self.store.serialize()?),
            current_image_url: Some(original.clone()),
            ..Default::default()
        };
        self.autosave.borrow_mut().save_now(patch);
        self.project.current_image_url = Some(original);
        log::info!("Project {} reset to its original image", self.project.id);
        Ok(())
    }

    /// Describe an export of the current scene at project resolution.
    pub fn export(&mut self, format: ExportFormat) -> EditorResult<ExportJob> {
        if self.closed {
            return Err(EditorError::InvalidState("session is closed".to_string()));
        }
        if !self.services.entitlements.can_export(self.exports_this_month) {
            return Err(EditorError::ExportLimit);
        }
        let job = ExportJob::new(&self.project.title, format, self.store.graph());
        self.exports_this_month += 1;
        log::info!("Exporting {} as {}", self.project.id, job.filename);
        Ok(job)
    }

    // ---- viewport ----

    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.viewport.set_container_size(width, height);
    }
}

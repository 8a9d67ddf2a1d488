//! The canvas interaction engine.
//!
//! [`Engine`] owns the mark collection, the viewport, the undo history, the
//! selection, and the gesture state machine. Every host event is handled
//! synchronously and answered with a list of [`Action`]s for the host to act
//! on (repaint, change cursor, show a notice, persist a mark, start a timer).

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::collection::MarkCollection;
use crate::config::{ConfigError, EngineConfig};
use crate::hit::{self, HandleMetrics, HitPart};
use crate::history::{History, Snapshot};
use crate::input::{Button, CursorHint, InputState, Modifiers, UiState, WheelDelta};
use crate::mark::{ControlDrag, DragError, GestureFlags, Mark, MarkId};
use crate::mirror::{self, MirrorDirection, MirrorError};
use crate::viewport::{Point, Viewport};

/// User-visible notice for a refused or empty operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Notice {
    #[error("mark {0} is size-locked and cannot be resized")]
    ResizeLocked(MarkId),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("no mark is selected")]
    NoSelection,
    #[error("mark not found: {0}")]
    NoSuchMark(MarkId),
    #[error(transparent)]
    MirrorRefused(#[from] MirrorError),
}

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MarkAdded(MarkId),
    /// A mark's geometry or parameters changed.
    MarkUpdated(MarkId),
    MarkDeleted(MarkId),
    /// The whole collection was swapped (undo, redo, clear, load).
    MarksReplaced,
    SelectionChanged(Option<MarkId>),
    SetCursor(CursorHint),
    Notice(Notice),
    /// Host should call [`Engine::commit_clear`] after `delay_ms`.
    ScheduleClear { delay_ms: u32 },
    /// Zoom, pan, or grid lock changed.
    ViewportChanged,
    RenderNeeded,
}

/// Canvas interaction engine.
pub struct Engine {
    config: EngineConfig,
    marks: MarkCollection,
    viewport: Viewport,
    history: History,
    ui: UiState,
    input: InputState,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Validate `config` before building the engine.
    pub fn try_new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Build an engine without validating `config`. Out-of-range values are
    /// tolerated (clamps never cross) but may make zoom or resizing inert.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            viewport: Viewport::new(&config),
            history: History::new(config.history.capacity),
            marks: MarkCollection::new(),
            ui: UiState::default(),
            input: InputState::default(),
            config,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The currently selected mark, if any.
    #[must_use]
    pub fn selection(&self) -> Option<MarkId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn cursor(&self) -> CursorHint {
        self.ui.cursor
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn marks(&self) -> &MarkCollection {
        &self.marks
    }

    #[must_use]
    pub fn mark(&self, id: &MarkId) -> Option<&Mark> {
        self.marks.get(id)
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether the collection is highlighted pending a scheduled clear.
    #[must_use]
    pub fn clear_pending(&self) -> bool {
        self.ui.clear_pending
    }

    /// Pointwise (0–10) coordinate under the last known pointer position.
    #[must_use]
    pub fn pointer_readout(&self) -> Option<Point> {
        self.ui.last_pointer.map(|p| self.viewport.pointwise_readout(p))
    }

    /// Deep copy of the collection for persistence collaborators.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.marks)
    }

    // --- Viewport ---

    /// Update the canvas size in screen pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport.set_size(width, height);
    }

    pub fn set_grid_lock(&mut self, locked: bool) -> Vec<Action> {
        self.viewport.set_grid_lock(locked);
        vec![Action::ViewportChanged, Action::RenderNeeded]
    }

    /// Zoom by `factor` anchored at a screen point (toolbar zoom buttons).
    pub fn zoom_at(&mut self, screen_pt: Point, factor: f64) -> Vec<Action> {
        viewport_actions(self.viewport.zoom_at(screen_pt, factor))
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        viewport_actions(self.viewport.reset())
    }

    // --- Structural commands ---

    /// Append a mark and select it.
    pub fn add_mark(&mut self, mut mark: Mark) -> Vec<Action> {
        if self.marks.get(&mark.id).is_some() {
            mark.id = Uuid::new_v4();
        }
        self.history.record_before_mutation(&self.marks);
        let id = mark.id;
        info!(%id, kind = mark.label(), "engine: mark added");
        self.marks.push(mark);
        let mut actions = vec![Action::MarkAdded(id)];
        actions.extend(self.set_selection(Some(id)));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn delete_mark(&mut self, id: &MarkId) -> Vec<Action> {
        if self.marks.get(id).is_none() {
            return vec![notice(Notice::NoSuchMark(*id))];
        }
        self.history.record_before_mutation(&self.marks);
        self.marks.remove(id);
        info!(%id, "engine: mark deleted");
        let mut actions = vec![Action::MarkDeleted(*id)];
        if self.input.bound_mark().as_ref() == Some(id) {
            self.input = InputState::Idle;
            actions.extend(self.set_cursor(CursorHint::Default));
        }
        if self.ui.selected_id.as_ref() == Some(id) {
            actions.extend(self.set_selection(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        match self.ui.selected_id {
            Some(id) => self.delete_mark(&id),
            None => vec![notice(Notice::NoSelection)],
        }
    }

    /// Apply a property edit (from a format dialog) to one mark.
    ///
    /// The edit may change anything except the mark's id.
    pub fn format_mark<F>(&mut self, id: &MarkId, edit: F) -> Vec<Action>
    where
        F: FnOnce(&mut Mark),
    {
        if self.marks.get(id).is_none() {
            return vec![notice(Notice::NoSuchMark(*id))];
        }
        self.history.record_before_mutation(&self.marks);
        if let Some(mark) = self.marks.get_mut(id) {
            edit(mark);
            mark.id = *id;
        }
        debug!(%id, "engine: mark formatted");
        vec![Action::MarkUpdated(*id), Action::RenderNeeded]
    }

    /// Mirror the selected mark in place.
    pub fn mirror_selected(&mut self, direction: Option<MirrorDirection>) -> Vec<Action> {
        match self.ui.selected_id {
            Some(id) => self.mirror_mark(&id, direction, false),
            None => vec![notice(Notice::NoSelection)],
        }
    }

    /// Mirror the selected mark across the working area's center line.
    pub fn mirror_about_working_area(&mut self, direction: Option<MirrorDirection>) -> Vec<Action> {
        match self.ui.selected_id {
            Some(id) => self.mirror_mark(&id, direction, true),
            None => vec![notice(Notice::NoSelection)],
        }
    }

    pub fn undo(&mut self) -> Vec<Action> {
        if !self.history.undo(&mut self.marks) {
            return vec![notice(Notice::NothingToUndo)];
        }
        info!(marks = self.marks.len(), "engine: undo");
        self.after_replace()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        if !self.history.redo(&mut self.marks) {
            return vec![notice(Notice::NothingToRedo)];
        }
        info!(marks = self.marks.len(), "engine: redo");
        self.after_replace()
    }

    /// Highlight every mark and ask the host to call [`Engine::commit_clear`]
    /// after a short delay. Input keeps flowing in the meantime.
    pub fn request_clear(&mut self) -> Vec<Action> {
        if self.marks.is_empty() {
            return Vec::new();
        }
        self.ui.clear_pending = true;
        vec![Action::ScheduleClear { delay_ms: self.config.history.clear_highlight_ms }, Action::RenderNeeded]
    }

    /// Complete a clear scheduled by [`Engine::request_clear`].
    pub fn commit_clear(&mut self) -> Vec<Action> {
        if !self.ui.clear_pending {
            return Vec::new();
        }
        self.ui.clear_pending = false;
        self.history.record_before_mutation(&self.marks);
        info!(marks = self.marks.len(), "engine: collection cleared");
        self.marks.clear();
        self.after_replace()
    }

    /// Drop a pending clear highlight without clearing.
    pub fn cancel_clear(&mut self) -> Vec<Action> {
        if !self.ui.clear_pending {
            return Vec::new();
        }
        self.ui.clear_pending = false;
        vec![Action::RenderNeeded]
    }

    /// Replace the collection with marks from a persistence collaborator.
    /// History is reset; the load itself is not undoable.
    pub fn load_marks(&mut self, marks: Vec<Mark>) -> Vec<Action> {
        self.marks.replace_all(marks);
        self.history.clear();
        self.ui.clear_pending = false;
        self.after_replace()
    }

    /// Select a mark programmatically (e.g. from a list view).
    pub fn select(&mut self, id: Option<MarkId>) -> Vec<Action> {
        if let Some(id) = id
            && self.marks.get(&id).is_none()
        {
            return vec![notice(Notice::NoSuchMark(id))];
        }
        self.set_selection(id)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.ui.last_pointer = Some(screen_pt);
        if !screen_pt.is_finite() {
            return Vec::new();
        }

        let panning = matches!(self.input, InputState::Panning { .. });
        if !self.input.is_idle() && !panning {
            // A mark gesture only ends on release.
            return Vec::new();
        }
        if panning || button.triggers_pan(modifiers) {
            self.input = InputState::Panning { last_screen: screen_pt };
            debug!(?button, "engine: panning");
            return self.set_cursor(CursorHint::Grabbing);
        }

        let world = self.viewport.screen_to_world(screen_pt);
        let Some(found) = hit::hit_test(world, &self.marks, &self.metrics()) else {
            let mut actions = self.set_selection(None);
            if !actions.is_empty() {
                actions.push(Action::RenderNeeded);
            }
            return actions;
        };

        let id = found.mark_id;
        let mut actions = self.set_selection(Some(id));
        let Some(mark) = self.marks.get_mut(&id) else {
            return actions;
        };

        let next = match found.part {
            HitPart::Control(handle) => {
                if handle.changes_size() && mark.flags.lock_size && self.config.reject_locked_resize {
                    info!(%id, ?handle, "engine: resize refused on size-locked mark");
                    actions.push(notice(Notice::ResizeLocked(id)));
                    return actions;
                }
                if handle.moves_mark() && (!mark.flags.can_drag || mark.flags.lock_transform) {
                    actions.push(Action::RenderNeeded);
                    return actions;
                }
                mark.gesture = GestureFlags { dragging: !handle.changes_size(), resizing: handle.changes_size() };
                InputState::SpecialControlDrag { id, handle, anchor: world, accum: Point::default() }
            }
            HitPart::Resize => {
                if mark.flags.lock_size && self.config.reject_locked_resize {
                    info!(%id, "engine: resize refused on size-locked mark");
                    actions.push(notice(Notice::ResizeLocked(id)));
                    return actions;
                }
                mark.gesture.resizing = true;
                InputState::ResizeDrag { id }
            }
            HitPart::Body => {
                if !mark.flags.can_drag || mark.flags.lock_transform {
                    actions.push(Action::RenderNeeded);
                    return actions;
                }
                mark.gesture.dragging = true;
                InputState::MoveDrag { id, anchor: world }
            }
        };

        debug!(%id, part = ?found.part, "engine: gesture started");
        self.input = next;
        actions.extend(self.set_cursor(CursorHint::for_part(found.part)));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        self.ui.last_pointer = Some(screen_pt);
        match self.input {
            InputState::Idle => self.hover(screen_pt),
            InputState::Panning { last_screen } => {
                if !screen_pt.is_finite() {
                    return Vec::new();
                }
                self.input = InputState::Panning { last_screen: screen_pt };
                let panned = self.viewport.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                viewport_actions(panned)
            }
            _ => {
                let world = self.viewport.screen_to_world(screen_pt);
                match self.apply_drag(world) {
                    Ok(actions) => actions,
                    Err(e) => self.abort_gesture(&e),
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.ui.last_pointer = Some(screen_pt);
        let finished = std::mem::take(&mut self.input);
        let mut actions = Vec::new();
        match finished {
            InputState::Idle => return actions,
            InputState::Panning { .. } => debug!("engine: pan finished"),
            InputState::SpecialControlDrag { id, .. } | InputState::ResizeDrag { id } | InputState::MoveDrag { id, .. } => {
                if let Some(mark) = self.marks.get_mut(&id) {
                    mark.gesture = GestureFlags::default();
                    actions.push(Action::MarkUpdated(id));
                }
                debug!(%id, "engine: gesture committed");
            }
        }
        actions.extend(self.set_cursor(CursorHint::Default));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        self.ui.last_pointer = Some(screen_pt);
        viewport_actions(self.viewport.wheel_zoom(screen_pt, delta.dy))
    }

    // --- Internals ---

    fn metrics(&self) -> HandleMetrics {
        HandleMetrics::new(&self.config.handles, &self.viewport)
    }

    fn set_selection(&mut self, id: Option<MarkId>) -> Vec<Action> {
        if self.ui.selected_id == id {
            return Vec::new();
        }
        self.ui.selected_id = id;
        vec![Action::SelectionChanged(id)]
    }

    fn set_cursor(&mut self, cursor: CursorHint) -> Vec<Action> {
        if self.ui.cursor == cursor {
            return Vec::new();
        }
        self.ui.cursor = cursor;
        vec![Action::SetCursor(cursor)]
    }

    fn hover(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.viewport.screen_to_world(screen_pt);
        let cursor = hit::hit_test(world, &self.marks, &self.metrics())
            .map_or(CursorHint::Default, |found| CursorHint::for_part(found.part));
        self.set_cursor(cursor)
    }

    /// Route a drag step to the bound mark according to the current state.
    fn apply_drag(&mut self, world: Point) -> Result<Vec<Action>, DragError> {
        let limits = self.config.limits;
        let (id, changed) = match &mut self.input {
            InputState::SpecialControlDrag { id, handle, anchor, accum } => {
                let mark = self.marks.get_mut(id).ok_or(DragError::MarkMissing(*id))?;
                let mut drag = ControlDrag { pointer: world, anchor: *anchor, accum: *accum };
                let changed = mark.apply_control(*handle, &mut drag, &limits)?;
                *anchor = drag.anchor;
                *accum = drag.accum;
                (*id, changed)
            }
            InputState::ResizeDrag { id } => {
                let mark = self.marks.get_mut(id).ok_or(DragError::MarkMissing(*id))?;
                (*id, mark.resize_to(world, &limits)?)
            }
            InputState::MoveDrag { id, anchor } => {
                let mark = self.marks.get_mut(id).ok_or(DragError::MarkMissing(*id))?;
                mark.translate(world.x - anchor.x, world.y - anchor.y)?;
                *anchor = world;
                (*id, true)
            }
            InputState::Idle | InputState::Panning { .. } => return Ok(Vec::new()),
        };
        Ok(if changed { vec![Action::MarkUpdated(id), Action::RenderNeeded] } else { Vec::new() })
    }

    /// End the current gesture after a failed drag step. Partial changes stay.
    fn abort_gesture(&mut self, error: &DragError) -> Vec<Action> {
        let bound = self.input.bound_mark();
        warn!(error = %error, mark = ?bound, "engine: drag failed; gesture aborted");
        if let Some(mark) = bound.and_then(|id| self.marks.get_mut(&id)) {
            mark.gesture = GestureFlags::default();
        }
        self.input = InputState::Idle;
        let mut actions = self.set_cursor(CursorHint::Default);
        actions.push(Action::RenderNeeded);
        actions
    }

    fn mirror_mark(&mut self, id: &MarkId, explicit: Option<MirrorDirection>, about_working_area: bool) -> Vec<Action> {
        let Some(mark) = self.marks.get(id) else {
            return vec![notice(Notice::NoSuchMark(*id))];
        };
        if let Err(e) = mirror::validate(mark) {
            info!(%id, error = %e, "engine: mirror refused");
            return vec![notice(e.into())];
        }
        let direction = mirror::choose_direction(mark, explicit);
        let axis = about_working_area.then(|| {
            let center = self.viewport.working_area_center();
            match direction {
                MirrorDirection::Horizontal => center.x,
                MirrorDirection::Vertical => center.y,
            }
        });

        self.history.record_before_mutation(&self.marks);
        let Some(mark) = self.marks.get_mut(id) else {
            return vec![notice(Notice::NoSuchMark(*id))];
        };
        match mirror::mirror(mark, direction, axis) {
            Ok(()) => {
                debug!(%id, ?direction, "engine: mark mirrored");
                vec![Action::MarkUpdated(*id), Action::RenderNeeded]
            }
            Err(e) => vec![notice(e.into())],
        }
    }

    /// Common tail of undo, redo, clear, and load: the old selection and any
    /// gesture may refer to marks that no longer exist.
    fn after_replace(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        for mark in self.marks.iter_mut() {
            mark.gesture = GestureFlags::default();
        }
        let mut actions = vec![Action::MarksReplaced];
        actions.extend(self.set_selection(None));
        actions.extend(self.set_cursor(CursorHint::Default));
        actions.push(Action::RenderNeeded);
        actions
    }
}

fn notice(notice: Notice) -> Action {
    Action::Notice(notice)
}

fn viewport_actions(changed: bool) -> Vec<Action> {
    if changed { vec![Action::ViewportChanged, Action::RenderNeeded] } else { Vec::new() }
}

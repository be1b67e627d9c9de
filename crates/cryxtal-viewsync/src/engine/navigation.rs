use cryxtal_base::ViewId;
use tracing::debug;

use super::ViewSync;
use crate::command::NavCommand;
use crate::events::SyncEvent;
use crate::transition::Transition;
use crate::viewport::SceneExtents;
use crate::{Error, Result};

impl ViewSync {
    pub fn set_extents(&mut self, view: ViewId, extents: SceneExtents) -> Result<()> {
        self.camera_of(view)?;
        if let Some(viewport) = self.registry.viewport_mut(view) {
            viewport.set_extents(extents);
        }
        Ok(())
    }

    pub fn set_animation_enabled(&mut self, view: ViewId, enabled: bool) -> Result<()> {
        self.camera_of(view)?;
        if let Some(viewport) = self.registry.viewport_mut(view) {
            viewport.set_animation_enabled(enabled);
        }
        Ok(())
    }

    /// Runs `command` on `view` the way its command handler would: fit
    /// commands go to the whole binding group, the rest run locally.
    pub fn dispatch(&mut self, view: ViewId, command: NavCommand) -> Result<()> {
        self.camera_of(view)?;
        self.route(view, command);
        Ok(())
    }

    pub(crate) fn route(&mut self, view: ViewId, command: NavCommand) {
        if command.is_group_command() {
            self.broadcast_to_group(view, command);
        } else {
            self.execute_command(view, command);
        }
    }

    /// Moves `view`'s own camera to the command target, animated when the
    /// view has animation on.
    pub(crate) fn execute_command(&mut self, view: ViewId, command: NavCommand) {
        let seconds = self.config.animation_seconds;
        let Some(viewport) = self.registry.viewport(view) else {
            return;
        };
        let camera = viewport.camera();
        let extents = viewport.extents();
        let animate = viewport.animation_enabled() && seconds > 0.0;
        let Some(current) = self.cameras.read(camera).copied() else {
            return;
        };

        self.events.emit(SyncEvent::CommandExecuted { view, command });
        let Some(target) = command.target(&current, &extents, &self.config) else {
            debug!(view = %view, %command, "nothing to frame");
            return;
        };

        let Some(viewport) = self.registry.viewport_mut(view) else {
            return;
        };
        if animate {
            viewport.transition = Some(Transition::new(current, target, seconds));
            return;
        }
        viewport.transition = None;
        self.write_camera(camera, target);
    }

    /// Steps every running camera animation by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        let animating: Vec<ViewId> = self
            .registry
            .viewports()
            .filter(|(_, viewport)| viewport.is_animating())
            .map(|(id, _)| id)
            .collect();
        for view in animating {
            let Some(viewport) = self.registry.viewport_mut(view) else {
                continue;
            };
            let camera = viewport.camera();
            let Some(transition) = viewport.transition.as_mut() else {
                continue;
            };
            let step = transition.step(dt);
            if transition.is_finished() {
                viewport.transition = None;
            }
            self.write_camera(camera, step);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.registry.viewports().any(|(_, viewport)| viewport.is_animating())
    }

    /// Jumps a running animation on `view` to its end.
    pub fn finish_animation(&mut self, view: ViewId) -> Result<()> {
        let camera = self.camera_of(view)?;
        let target = self
            .registry
            .viewport_mut(view)
            .ok_or(Error::NotThreeDView(view))?
            .transition
            .take()
            .map(|transition| transition.target());
        if let Some(target) = target {
            self.write_camera(camera, target);
        }
        Ok(())
    }
}

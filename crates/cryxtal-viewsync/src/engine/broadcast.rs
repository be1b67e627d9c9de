use cryxtal_base::ViewId;
use tracing::debug;

use super::ViewSync;
use crate::command::NavCommand;
use crate::viewport::SnapshotSlot;

impl ViewSync {
    /// Runs `command` once on every view of `view`'s binding group.
    ///
    /// Change notifications are held for the whole broadcast so bound views
    /// do not also chase each other's fit; afterwards every snapshot of the
    /// group absorbs the new camera state. Nested calls and calls with the
    /// decouple key held run the command on `view` alone.
    pub fn broadcast_to_group(&mut self, view: ViewId, command: NavCommand) {
        if self.registry.viewport(view).is_none() {
            return;
        }
        if self.is_decouple_held() {
            self.execute_command(view, command);
            return;
        }
        let Some(_session) = self.session.enter() else {
            self.execute_command(view, command);
            return;
        };

        let mut group = self.connected_component(view, true);
        group.insert(view);
        debug!(view = %view, members = group.len(), %command, "broadcasting to binding group");

        for member in &group {
            let Some(viewport) = self.registry.viewport_mut(*member) else {
                continue;
            };
            let animated = viewport.animation_enabled();
            viewport.set_animation_enabled(false);
            self.route(*member, command);
            if let Some(viewport) = self.registry.viewport_mut(*member) {
                viewport.set_animation_enabled(animated);
            }
        }

        for member in &group {
            self.sync_snapshot(*member, SnapshotSlot::Own, None);
            self.sync_snapshot(*member, SnapshotSlot::Bound, None);
        }
    }
}

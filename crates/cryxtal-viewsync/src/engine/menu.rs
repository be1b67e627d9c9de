//! Model behind a view's "bind to" menu.

use cryxtal_base::ViewId;
use serde::Serialize;

use super::ViewSync;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub view: ViewId,
    pub title: String,
    /// Already a direct neighbour of the active view.
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuGroup {
    /// `None` when the document offers a single view, listed inline.
    pub document: Option<String>,
    pub entries: Vec<MenuEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BindingMenu {
    pub sync_camera: bool,
    pub unbind: bool,
    pub groups: Vec<MenuGroup>,
}

impl BindingMenu {
    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> + '_ {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    SyncCamera,
    Unbind,
    /// Checking an entry binds to it, unchecking severs that edge.
    Toggle { title: String, checked: bool },
}

impl ViewSync {
    /// Candidates are every other 3D view except those already in the
    /// active view's group without being its direct neighbour; binding to
    /// those would close a loop.
    pub fn binding_menu(&self, active: ViewId) -> Option<BindingMenu> {
        self.registry.viewport(active)?;
        let neighbours = self.connected_component(active, false);
        let mut menu = BindingMenu {
            sync_camera: neighbours.len() == 1,
            unbind: !neighbours.is_empty(),
            groups: Vec::new(),
        };

        for document in self.registry.documents() {
            let entries: Vec<MenuEntry> = document
                .views()
                .iter()
                .copied()
                .filter(|view| *view != active && self.registry.viewport(*view).is_some())
                .filter(|view| {
                    neighbours.contains(view)
                        || !self.connected_component(*view, true).contains(&active)
                })
                .map(|view| MenuEntry {
                    view,
                    title: self.registry.title(view).unwrap_or_default().to_string(),
                    checked: neighbours.contains(&view),
                })
                .collect();
            if entries.is_empty() {
                continue;
            }
            let label = (entries.len() > 1).then(|| document.label().to_string());
            menu.groups.push(MenuGroup {
                document: label,
                entries,
            });
        }
        Some(menu)
    }

    pub fn trigger_binding_action(&mut self, active: ViewId, action: &MenuAction) -> bool {
        match action {
            MenuAction::SyncCamera => {
                let Some(neighbour) = self.connected_component(active, false).into_iter().next() else {
                    return false;
                };
                self.sync_camera(active, Some(neighbour));
                true
            }
            MenuAction::Unbind => self.unbind_view(active, ""),
            MenuAction::Toggle { title, checked: true } => self.bind_view(active, title, true).is_some(),
            MenuAction::Toggle {
                title,
                checked: false,
            } => self.unbind_view(active, title),
        }
    }
}

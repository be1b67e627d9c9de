//! JSON session scripts: a list of steps replayed against one engine.

use anyhow::{Context, Result, anyhow, bail};
use cgmath::{InnerSpace, Rotation3};
use cryxtal_base::{DocumentId, ViewId};
use cryxtal_geometry::{
    Bounds, Deg, Point3, ProjectionMode, Quaternion, Vector3, Viewpoint, identity_rotation,
};
use cryxtal_viewsync::{Modifiers, NavCommand, SceneExtents, SyncConfig, ViewKind, ViewSync};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid script {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    OpenDocument {
        label: String,
    },
    CloseDocument {
        label: String,
    },
    OpenView {
        document: String,
        title: String,
        camera: CameraSpec,
    },
    OpenWindow {
        document: String,
        title: String,
        kind: WindowKind,
    },
    CloseView {
        view: String,
    },
    Navigate {
        view: String,
        camera: CameraSpec,
    },
    /// Moves the camera by a world-space offset.
    Translate {
        view: String,
        by: [f64; 3],
    },
    /// Turns the camera in place about a world-space axis.
    Rotate {
        view: String,
        axis: [f64; 3],
        degrees: f64,
    },
    SetProjection {
        view: String,
        projection: ProjectionMode,
    },
    SetExtents {
        view: String,
        content: Option<BoundsSpec>,
        selection: Option<BoundsSpec>,
    },
    Animation {
        view: String,
        enabled: bool,
    },
    Modifiers {
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        alt: bool,
    },
    Bind {
        view: String,
        target: String,
        #[serde(default)]
        sync_now: bool,
    },
    Unbind {
        view: String,
        #[serde(default)]
        filter: String,
    },
    SyncCamera {
        view: String,
        other: Option<String>,
    },
    Command {
        view: String,
        name: String,
    },
    Advance {
        seconds: f64,
    },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Drawing,
    Spreadsheet,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CameraSpec {
    pub position: [f64; 3],
    /// Looks along -Z when absent.
    #[serde(default)]
    pub target: Option<[f64; 3]>,
    #[serde(default = "default_up")]
    pub up: [f64; 3],
    #[serde(default = "default_projection")]
    pub projection: ProjectionMode,
    pub zoom: f64,
}

fn default_up() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

fn default_projection() -> ProjectionMode {
    ProjectionMode::Perspective
}

impl CameraSpec {
    pub fn viewpoint(&self) -> Result<Viewpoint> {
        let eye = point(self.position);
        match self.target {
            Some(target) => {
                let [x, y, z] = self.up;
                Viewpoint::look_at(eye, point(target), Vector3::new(x, y, z), self.projection, self.zoom)
                    .ok_or_else(|| anyhow!("camera target coincides with its position"))
            }
            None => Ok(Viewpoint::new(eye, identity_rotation(), self.projection, self.zoom)),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct BoundsSpec {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl From<BoundsSpec> for Bounds {
    fn from(spec: BoundsSpec) -> Self {
        Bounds::new(point(spec.min), point(spec.max))
    }
}

fn point([x, y, z]: [f64; 3]) -> Point3 {
    Point3::new(x, y, z)
}

/// Final camera of one 3D view, printed after a run.
#[derive(Debug, Serialize)]
pub struct ViewReport {
    pub document: String,
    pub title: String,
    pub projection: ProjectionMode,
    pub position: [f64; 3],
    pub zoom: f64,
    pub bound_to: Option<String>,
}

pub struct Runner {
    sync: ViewSync,
}

impl Runner {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            sync: ViewSync::new(config),
        }
    }

    pub fn sync(&self) -> &ViewSync {
        &self.sync
    }

    pub fn run(&mut self, script: &Script) -> Result<()> {
        for (index, step) in script.steps.iter().enumerate() {
            self.step(step)
                .with_context(|| format!("step {} failed", index + 1))?;
            for event in self.sync.drain_events() {
                debug!(step = index + 1, ?event, "sync event");
            }
        }
        info!(steps = script.steps.len(), views = self.sync.registry().len(), "script finished");
        Ok(())
    }

    fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::OpenDocument { label } => {
                self.sync.open_document(label.as_str());
            }
            Step::CloseDocument { label } => {
                let document = self.document(label)?;
                self.sync.close_document(document)?;
            }
            Step::OpenView {
                document,
                title,
                camera,
            } => {
                let document = self.document(document)?;
                self.sync.open_view(document, title.as_str(), camera.viewpoint()?)?;
            }
            Step::OpenWindow {
                document,
                title,
                kind,
            } => {
                let document = self.document(document)?;
                let kind = match kind {
                    WindowKind::Drawing => ViewKind::Drawing,
                    WindowKind::Spreadsheet => ViewKind::Spreadsheet,
                };
                self.sync.open_window(document, title.as_str(), kind)?;
            }
            Step::CloseView { view } => {
                let view = self.view(view)?;
                self.sync.close_view(view)?;
            }
            Step::Navigate { view, camera } => {
                let view = self.view(view)?;
                self.sync.navigate(view, camera.viewpoint()?)?;
            }
            Step::Translate { view, by } => {
                let view = self.view(view)?;
                let mut camera = self.current(view)?;
                let [x, y, z] = *by;
                camera.position = camera.position + Vector3::new(x, y, z);
                self.sync.navigate(view, camera)?;
            }
            Step::Rotate {
                view,
                axis,
                degrees,
            } => {
                let view = self.view(view)?;
                let [x, y, z] = *axis;
                let axis = Vector3::new(x, y, z);
                if axis.magnitude2() <= f64::EPSILON {
                    bail!("rotation axis must be non-zero");
                }
                let mut camera = self.current(view)?;
                let turn = Quaternion::from_axis_angle(axis.normalize(), Deg(*degrees));
                camera.orientation = turn * camera.orientation;
                self.sync.navigate(view, camera)?;
            }
            Step::SetProjection { view, projection } => {
                let view = self.view(view)?;
                self.sync.set_projection(view, *projection)?;
            }
            Step::SetExtents {
                view,
                content,
                selection,
            } => {
                let view = self.view(view)?;
                let extents = SceneExtents {
                    content: content.map(Bounds::from),
                    selection: selection.map(Bounds::from),
                };
                self.sync.set_extents(view, extents)?;
            }
            Step::Animation { view, enabled } => {
                let view = self.view(view)?;
                self.sync.set_animation_enabled(view, *enabled)?;
            }
            Step::Modifiers { shift, ctrl, alt } => {
                self.sync.set_modifiers(Modifiers {
                    shift: *shift,
                    ctrl: *ctrl,
                    alt: *alt,
                });
            }
            Step::Bind {
                view,
                target,
                sync_now,
            } => {
                let id = self.view(view)?;
                if self.sync.bind_view(id, target, *sync_now).is_none() {
                    warn!(view = %view, target = %target, "binding refused");
                }
            }
            Step::Unbind { view, filter } => {
                let id = self.view(view)?;
                if !self.sync.unbind_view(id, filter) {
                    warn!(view = %view, filter = %filter, "nothing to unbind");
                }
            }
            Step::SyncCamera { view, other } => {
                let view = self.view(view)?;
                let other = other.as_deref().map(|title| self.view(title)).transpose()?;
                self.sync.sync_camera(view, other);
            }
            Step::Command { view, name } => {
                let view = self.view(view)?;
                let command: NavCommand = name.parse()?;
                self.sync.dispatch(view, command)?;
            }
            Step::Advance { seconds } => self.sync.advance(*seconds),
        }
        Ok(())
    }

    fn view(&self, title: &str) -> Result<ViewId> {
        self.sync
            .registry()
            .window_by_title(title)
            .ok_or_else(|| anyhow!("no view titled {title:?}"))
    }

    fn current(&self, view: ViewId) -> Result<Viewpoint> {
        self.sync
            .viewpoint(view)
            .ok_or_else(|| anyhow!("view has no camera"))
    }

    fn document(&self, label: &str) -> Result<DocumentId> {
        self.sync
            .registry()
            .document_by_label(label)
            .ok_or_else(|| anyhow!("no document labelled {label:?}"))
    }

    pub fn report(&self) -> Vec<ViewReport> {
        let registry = self.sync.registry();
        registry
            .viewports()
            .filter_map(|(view, _)| {
                let window = registry.window(view)?;
                let camera = self.sync.viewpoint(view)?;
                let document = registry.document(window.document())?;
                Some(ViewReport {
                    document: document.label().to_string(),
                    title: window.title().to_string(),
                    projection: camera.projection,
                    position: [camera.position.x, camera.position.y, camera.position.z],
                    zoom: camera.zoom,
                    bound_to: self
                        .sync
                        .bound_view(view)
                        .and_then(|target| registry.title(target))
                        .map(str::to_string),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "steps": [
            { "op": "open_document", "label": "Part" },
            { "op": "open_view", "document": "Part", "title": "A",
              "camera": { "position": [0, 0, 10], "zoom": 10 } },
            { "op": "open_view", "document": "Part", "title": "B",
              "camera": { "position": [5, 0, 10], "zoom": 10 } },
            { "op": "bind", "view": "B", "target": "A" },
            { "op": "navigate", "view": "A",
              "camera": { "position": [1, 0, 10], "zoom": 10 } },
            { "op": "translate", "view": "A", "by": [0, 2, 0] },
            { "op": "rotate", "view": "A", "axis": [0, 0, 1], "degrees": 0 }
        ]
    }"#;

    #[test]
    fn replays_a_binding_session() -> Result<()> {
        let script: Script = serde_json::from_str(SCRIPT)?;
        let mut runner = Runner::new(SyncConfig::default());
        runner.run(&script)?;

        let report = runner.report();
        assert_eq!(report.len(), 2);
        assert_eq!(report[1].title, "B");
        assert_eq!(report[1].bound_to.as_deref(), Some("A"));
        assert!((report[1].position[0] - 6.0).abs() < 1.0e-9);
        assert!((report[1].position[1] - 2.0).abs() < 1.0e-9);
        Ok(())
    }

    #[test]
    fn failing_step_names_its_index() -> Result<()> {
        let script: Script = serde_json::from_str(
            r#"{ "steps": [ { "op": "command", "view": "Missing", "name": "ViewFit" } ] }"#,
        )?;
        let mut runner = Runner::new(SyncConfig::default());
        let err = runner.run(&script).err().map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some("step 1 failed"));
        Ok(())
    }
}

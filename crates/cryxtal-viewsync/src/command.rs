use cryxtal_geometry::{Bounds, Vector3, Viewpoint, look_rotation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;
use crate::config::SyncConfig;
use crate::viewport::SceneExtents;

/// One-shot navigation commands a view understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavCommand {
    FitAll,
    FitSelection,
    FitSelectionExtend,
    ZoomIn,
    ZoomOut,
    ViewTop,
    ViewFront,
    ViewRight,
    ViewIsometric,
}

impl NavCommand {
    /// Group commands go to every view of a binding component at once;
    /// the rest run locally and reach bound views through propagation.
    pub fn is_group_command(self) -> bool {
        matches!(
            self,
            Self::FitAll | Self::FitSelection | Self::FitSelectionExtend
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FitAll => "ViewFit",
            Self::FitSelection => "ViewSelection",
            Self::FitSelectionExtend => "ViewSelectionExtend",
            Self::ZoomIn => "ZoomIn",
            Self::ZoomOut => "ZoomOut",
            Self::ViewTop => "ViewTop",
            Self::ViewFront => "ViewFront",
            Self::ViewRight => "ViewRight",
            Self::ViewIsometric => "ViewAxo",
        }
    }

    /// Camera this command moves `current` to, or `None` when there is nothing to frame.
    pub fn target(
        self,
        current: &Viewpoint,
        extents: &SceneExtents,
        config: &SyncConfig,
    ) -> Option<Viewpoint> {
        let angle = config.height_angle();
        let fit = |bounds: &Bounds, from: &Viewpoint| from.fitted(bounds, config.fit_margin, angle);
        match self {
            Self::FitAll => extents.content.map(|bounds| fit(&bounds, current)),
            Self::FitSelection => extents.selection.map(|bounds| fit(&bounds, current)),
            Self::FitSelectionExtend => {
                let selection = extents.selection?;
                let framed = Bounds::around(current.focal_point(angle), current.framed_radius(angle));
                Some(fit(&selection.union(&framed), current))
            }
            Self::ZoomIn => Some(current.zoomed(config.zoom_factor())),
            Self::ZoomOut => Some(current.zoomed(1.0 / config.zoom_factor())),
            Self::ViewTop => standard(current, extents, config, Vector3::new(0.0, 0.0, -1.0), Vector3::unit_y()),
            Self::ViewFront => standard(current, extents, config, Vector3::new(0.0, 1.0, 0.0), Vector3::unit_z()),
            Self::ViewRight => standard(current, extents, config, Vector3::new(-1.0, 0.0, 0.0), Vector3::unit_z()),
            Self::ViewIsometric => standard(current, extents, config, Vector3::new(-1.0, 1.0, -1.0), Vector3::unit_z()),
        }
    }
}

fn standard(
    current: &Viewpoint,
    extents: &SceneExtents,
    config: &SyncConfig,
    direction: Vector3,
    up: Vector3,
) -> Option<Viewpoint> {
    let mut turned = *current;
    turned.orientation = look_rotation(direction, up)?;
    Some(match extents.content {
        Some(bounds) => turned.fitted(&bounds, config.fit_margin, config.height_angle()),
        None => turned,
    })
}

impl std::fmt::Display for NavCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NavCommand {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let command = match text.trim() {
            "ViewFit" | "FitAll" => Self::FitAll,
            "ViewSelection" | "FitSelection" => Self::FitSelection,
            "ViewSelectionExtend" | "FitSelectionExtend" => Self::FitSelectionExtend,
            "ZoomIn" => Self::ZoomIn,
            "ZoomOut" => Self::ZoomOut,
            "ViewTop" => Self::ViewTop,
            "ViewFront" => Self::ViewFront,
            "ViewRight" => Self::ViewRight,
            "ViewAxo" | "ViewIsometric" => Self::ViewIsometric,
            other => return Err(Error::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

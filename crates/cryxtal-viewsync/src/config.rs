use cryxtal_geometry::{Deg, Rad};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Smallest |old zoom| that still yields a propagated zoom ratio.
    pub zoom_epsilon: f64,
    /// Repositioned cameras farther than this from the origin are not moved.
    pub position_limit: f64,
    pub min_zoom: f64,
    pub height_angle_deg: f64,
    pub fit_margin: f64,
    pub zoom_step: f64,
    pub animation_seconds: f64,
    pub decouple_modifier: ModifierKey,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            zoom_epsilon: 1.0e-10,
            position_limit: f64::from(f32::MAX).sqrt(),
            min_zoom: 1.0e-6,
            height_angle_deg: 45.0,
            fit_margin: 3.0,
            zoom_step: 0.2,
            animation_seconds: 0.3,
            decouple_modifier: ModifierKey::Ctrl,
        }
    }
}

impl SyncConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("zoom_epsilon", self.zoom_epsilon)?;
        ensure_positive("position_limit", self.position_limit)?;
        ensure_positive("min_zoom", self.min_zoom)?;
        ensure_positive("fit_margin", self.fit_margin)?;
        ensure_positive("zoom_step", self.zoom_step)?;
        if !(self.height_angle_deg > 0.0 && self.height_angle_deg < 180.0) {
            return Err(Error::InvalidConfig(
                "height_angle_deg must be within (0, 180)".to_string(),
            ));
        }
        if !self.animation_seconds.is_finite() || self.animation_seconds < 0.0 {
            return Err(Error::InvalidConfig(
                "animation_seconds must be >= 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn height_angle(&self) -> Rad<f64> {
        Rad::from(Deg(self.height_angle_deg))
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_step.exp()
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidConfig(format!("{name} must be > 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> Result<()> {
        SyncConfig::default().validate()
    }

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let config = SyncConfig::from_json_str(r#"{ "decouple_modifier": "alt", "fit_margin": 2.0 }"#)?;
        assert_eq!(config.decouple_modifier, ModifierKey::Alt);
        assert_eq!(config.fit_margin, 2.0);
        assert_eq!(config.zoom_epsilon, 1.0e-10);
        Ok(())
    }

    #[test]
    fn rejects_bad_angle() {
        let result = SyncConfig::from_json_str(r#"{ "height_angle_deg": 190.0 }"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}

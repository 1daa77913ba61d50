//! Game settings and preferences
//!
//! In-memory for the page session; the shell reads and writes them as
//! JSON through the platform layer.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hit-burst particles
    pub particles: bool,
    /// Decorative animated backgrounds
    pub background_fx: bool,
    /// Show the FPS counter in the HUD
    pub show_fps: bool,
    /// Reduced motion (skips backgrounds and heavy effects)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            background_fx: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective particle rendering (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Effective background fields (respects reduced_motion)
    pub fn effective_background_fx(&self) -> bool {
        self.background_fx && !self.reduced_motion
    }

    /// JSON view for the UI shell
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse shell-provided JSON, falling back to current values on error
    pub fn merge_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Settings>(json) {
            Ok(parsed) => {
                *self = parsed;
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_overrides_effects() {
        let mut settings = Settings::default();
        assert!(settings.effective_particles());
        assert!(settings.effective_background_fx());
        settings.reduced_motion = true;
        assert!(!settings.effective_particles());
        assert!(!settings.effective_background_fx());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.show_fps = true;
        let json = settings.to_json();

        let mut other = Settings::default();
        assert!(other.merge_json(&json));
        assert!(other.show_fps);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut settings = Settings::default();
        assert!(settings.merge_json(r#"{"reduced_motion":true}"#));
        assert!(settings.reduced_motion);
        assert!(settings.particles, "unspecified fields fall back to defaults");
        assert!(!settings.merge_json("not json"));
    }
}

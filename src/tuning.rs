//! Game balance tuning
//!
//! Numbers that shape how a run feels. Defaults match the shipped balance;
//! a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Balance knobs consumed by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ball speed at launch and after every reset (pixels/s)
    pub initial_ball_speed: f32,
    /// Ball speed multiplier applied on each direct ball-brick hit
    pub speed_multiplier: f32,
    /// Score awarded per destroyed brick (coins derive from this)
    pub points_per_brick: u32,
    /// Upward bullet speed (pixels/s)
    pub bullet_speed: f32,
    /// Upward bomb speed at launch (pixels/s)
    pub bomb_initial_speed: f32,
    /// Upward bomb acceleration (pixels/s²)
    pub bomb_accel: f32,
    /// Widest launch/bounce angle from vertical (degrees)
    pub max_bounce_angle: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_ball_speed: 700.0,
            speed_multiplier: 1.01,
            points_per_brick: 10,
            bullet_speed: 600.0,
            bomb_initial_speed: 180.0,
            bomb_accel: 1400.0,
            max_bounce_angle: 60.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(
            field: &'static str,
            value: f32,
            ok: bool,
            expected: &'static str,
        ) -> Result<(), TuningError> {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(TuningError::OutOfRange { field, value, expected })
            }
        }

        check("initial_ball_speed", self.initial_ball_speed, self.initial_ball_speed > 0.0, "> 0")?;
        check("speed_multiplier", self.speed_multiplier, self.speed_multiplier >= 1.0, ">= 1")?;
        check("bullet_speed", self.bullet_speed, self.bullet_speed > 0.0, "> 0")?;
        check("bomb_initial_speed", self.bomb_initial_speed, self.bomb_initial_speed > 0.0, "> 0")?;
        check("bomb_accel", self.bomb_accel, self.bomb_accel >= 0.0, ">= 0")?;
        check(
            "max_bounce_angle",
            self.max_bounce_angle,
            self.max_bounce_angle > 0.0 && self.max_bounce_angle < 90.0,
            "between 0 and 90 exclusive",
        )?;
        Ok(())
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "speed_multiplier": 1.02 }"#).unwrap();
        assert_eq!(tuning.speed_multiplier, 1.02);
        assert_eq!(tuning.initial_ball_speed, 700.0);
        assert_eq!(tuning.points_per_brick, 10);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_angle_rejected() {
        let err = Tuning::from_json(r#"{ "max_bounce_angle": 3e38 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "max_bounce_angle", .. }));
        assert!(Tuning::from_json(r#"{ "max_bounce_angle": 95 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "max_bounce_angle": 0 }"#).is_err());
    }

    #[test]
    fn test_non_positive_speeds_rejected() {
        assert!(Tuning::from_json(r#"{ "speed_multiplier": 0.5 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "initial_ball_speed": -700 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "bullet_speed": 0 }"#).is_err());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("smashloop-tuning-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "max_bounce_angle": 3e38, "points_per_brick": 50 }"#).unwrap();
        let tuning = Tuning::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tuning = Tuning::load(Path::new("/nonexistent/smashloop-tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }
}

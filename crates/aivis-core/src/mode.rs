//! Processing modes and the registry that resolves them by name.
//!
//! Three canonical modes trade image quality for perturbation strength:
//!
//! | id            | blur radius | noise strength | asymmetry shift |
//! |---------------|-------------|----------------|-----------------|
//! | `social_safe` | 3           | 0.02           | 1 px            |
//! | `genai_safe`  | 5           | 0.04           | 2 px            |
//! | `max_privacy` | 7           | 0.08           | 3 px            |
//!
//! The registry is built once with the pipeline configuration and is only
//! read afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::ProcessError;

/// Largest accepted bilateral kernel size.
pub const MAX_BLUR_RADIUS: u32 = 31;

/// Largest accepted warp displacement in pixels.
pub const MAX_ASYMMETRY_SHIFT: u32 = 16;

/// Identifier of a canonical mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    SocialSafe,
    GenaiSafe,
    MaxPrivacy,
}

impl ModeId {
    /// All modes, weakest first.
    pub const ALL: [ModeId; 3] = [ModeId::SocialSafe, ModeId::GenaiSafe, ModeId::MaxPrivacy];

    pub fn as_str(self) -> &'static str {
        match self {
            ModeId::SocialSafe => "social_safe",
            ModeId::GenaiSafe => "genai_safe",
            ModeId::MaxPrivacy => "max_privacy",
        }
    }

    /// Human-readable name shown next to results.
    pub fn label(self) -> &'static str {
        match self {
            ModeId::SocialSafe => "Social Safe",
            ModeId::GenaiSafe => "GenAI Safe",
            ModeId::MaxPrivacy => "Max Privacy",
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeId {
    type Err = ProcessError;

    /// Exact, case-sensitive match on the canonical identifiers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ProcessError::UnknownMode(s.to_string()))
    }
}

/// Transformation strength of one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeSettings {
    /// Bilateral kernel size in pixels (odd, at least 1; 1 disables smoothing).
    pub blur_radius: u32,
    /// Lightness noise standard deviation as a fraction of the full range.
    pub noise_strength: f32,
    /// Peak warp displacement in pixels.
    pub asymmetry_shift: u32,
}

impl ModeSettings {
    pub const fn new(blur_radius: u32, noise_strength: f32, asymmetry_shift: u32) -> Self {
        Self {
            blur_radius,
            noise_strength,
            asymmetry_shift,
        }
    }

    /// Settings that leave a zone untouched.
    pub const IDENTITY: ModeSettings = ModeSettings::new(1, 0.0, 0);

    /// `(blur_radius, noise_strength, asymmetry_shift)`
    pub fn as_tuple(&self) -> (u32, f32, u32) {
        (self.blur_radius, self.noise_strength, self.asymmetry_shift)
    }

    /// Whether every stage would be a no-op.
    pub fn is_identity(&self) -> bool {
        self.blur_radius <= 1 && self.noise_strength == 0.0 && self.asymmetry_shift == 0
    }

    /// Check the parameter invariants for the mode named `mode`.
    pub fn validate(&self, mode: &str) -> Result<(), ConfigError> {
        if self.blur_radius == 0
            || self.blur_radius % 2 == 0
            || self.blur_radius > MAX_BLUR_RADIUS
        {
            return Err(ConfigError::InvalidBlurRadius {
                mode: mode.to_string(),
                value: self.blur_radius,
            });
        }
        if !self.noise_strength.is_finite() || !(0.0..=1.0).contains(&self.noise_strength) {
            return Err(ConfigError::InvalidNoiseStrength {
                mode: mode.to_string(),
                value: self.noise_strength,
            });
        }
        if self.asymmetry_shift > MAX_ASYMMETRY_SHIFT {
            return Err(ConfigError::InvalidAsymmetryShift {
                mode: mode.to_string(),
                value: self.asymmetry_shift,
            });
        }
        Ok(())
    }
}

/// A resolved mode: its identifier plus the settings in effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMode {
    pub id: ModeId,
    #[serde(flatten)]
    pub settings: ModeSettings,
}

impl ProcessingMode {
    pub fn name(&self) -> &'static str {
        self.id.as_str()
    }

    pub fn label(&self) -> &'static str {
        self.id.label()
    }
}

/// Settings for each canonical mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeRegistry {
    pub social_safe: ModeSettings,
    pub genai_safe: ModeSettings,
    pub max_privacy: ModeSettings,
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self {
            social_safe: ModeSettings::new(3, 0.02, 1),
            genai_safe: ModeSettings::new(5, 0.04, 2),
            max_privacy: ModeSettings::new(7, 0.08, 3),
        }
    }
}

impl ModeRegistry {
    /// Look up a mode by its identifier string.
    pub fn resolve(&self, name: &str) -> Result<ProcessingMode, ProcessError> {
        let id = name.parse::<ModeId>()?;
        Ok(self.get(id))
    }

    pub fn get(&self, id: ModeId) -> ProcessingMode {
        let settings = match id {
            ModeId::SocialSafe => self.social_safe,
            ModeId::GenaiSafe => self.genai_safe,
            ModeId::MaxPrivacy => self.max_privacy,
        };
        ProcessingMode { id, settings }
    }

    /// All modes, weakest first.
    pub fn modes(&self) -> [ProcessingMode; 3] {
        ModeId::ALL.map(|id| self.get(id))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for mode in self.modes() {
            mode.settings.validate(mode.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_table() {
        let registry = ModeRegistry::default();
        assert_eq!(registry.resolve("social_safe").unwrap().settings.as_tuple(), (3, 0.02, 1));
        assert_eq!(registry.resolve("genai_safe").unwrap().settings.as_tuple(), (5, 0.04, 2));
        assert_eq!(registry.resolve("max_privacy").unwrap().settings.as_tuple(), (7, 0.08, 3));
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_modes_increase_in_strength() {
        let modes = ModeRegistry::default().modes();
        for pair in modes.windows(2) {
            let (weak, strong) = (pair[0].settings, pair[1].settings);
            assert!(weak.blur_radius < strong.blur_radius);
            assert!(weak.noise_strength < strong.noise_strength);
            assert!(weak.asymmetry_shift < strong.asymmetry_shift);
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let registry = ModeRegistry::default();
        for name in ["ultra_safe", "", "GenAI_Safe", "genai_safe "] {
            match registry.resolve(name) {
                Err(ProcessError::UnknownMode(got)) => assert_eq!(got, name),
                other => panic!("expected UnknownMode for {:?}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_mode_id_round_trip_through_str() {
        for id in ModeId::ALL {
            assert_eq!(id.as_str().parse::<ModeId>().unwrap(), id);
            assert_eq!(id.to_string(), id.as_str());
        }
        assert_eq!(ModeId::GenaiSafe.label(), "GenAI Safe");
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(matches!(
            ModeSettings::new(4, 0.1, 1).validate("m"),
            Err(ConfigError::InvalidBlurRadius { value: 4, .. })
        ));
        assert!(matches!(
            ModeSettings::new(0, 0.1, 1).validate("m"),
            Err(ConfigError::InvalidBlurRadius { value: 0, .. })
        ));
        assert!(matches!(
            ModeSettings::new(3, 1.5, 1).validate("m"),
            Err(ConfigError::InvalidNoiseStrength { .. })
        ));
        assert!(matches!(
            ModeSettings::new(3, f32::NAN, 1).validate("m"),
            Err(ConfigError::InvalidNoiseStrength { .. })
        ));
        assert!(matches!(
            ModeSettings::new(3, 0.1, 99).validate("m"),
            Err(ConfigError::InvalidAsymmetryShift { value: 99, .. })
        ));
    }

    #[test]
    fn test_identity_settings() {
        assert!(ModeSettings::IDENTITY.is_identity());
        assert!(ModeSettings::IDENTITY.validate("identity").is_ok());
        assert!(!ModeSettings::new(3, 0.0, 0).is_identity());
    }
}

//! Session configuration.
//!
//! hyprwarp reads no configuration file; every knob lives here with a
//! compiled-in default and the binary only overrides a few of them from the
//! command line.  [`Config::validate`] runs before the grid is built.

use crate::label::DEFAULT_ALPHABET;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Edge length of a grid cell in layout pixels.
    pub cell_size: u32,
    /// Characters labels are drawn from.
    pub alphabet: String,
    /// Directional nudge magnitudes.
    pub nudge: NudgeConfig,
    /// What happens after a confirmed click.
    pub after_click: AfterClick,
    /// Fixed seed for the label shuffle.  `None` draws a fresh layout each
    /// session.
    pub label_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_size: 120,
            alphabet: DEFAULT_ALPHABET.to_string(),
            nudge: NudgeConfig::default(),
            after_click: AfterClick::default(),
            label_seed: None,
        }
    }
}

/// Pixel distances for the H/J/K/L nudges in cursor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NudgeConfig {
    /// Plain nudge.
    pub step: u32,
    /// Nudge while the coarse modifier (Control) is held.
    pub coarse_step: u32,
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            step: 3,
            coarse_step: 15,
        }
    }
}

/// Policy applied once a click has been issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AfterClick {
    /// End the session.
    #[default]
    Exit,
    /// Clear the input, show the overlay again and wait for another label.
    ReturnToGrid,
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cell size must be greater than zero")]
    ZeroCellSize,
    #[error("nudge step must be greater than zero")]
    ZeroNudge,
    #[error("coarse nudge ({coarse}) must be larger than the plain nudge ({step})")]
    CoarseNotLarger { step: u32, coarse: u32 },
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.nudge.step == 0 {
            return Err(ConfigError::ZeroNudge);
        }
        if self.nudge.coarse_step <= self.nudge.step {
            return Err(ConfigError::CoarseNotLarger {
                step: self.nudge.step,
                coarse: self.nudge.coarse_step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.cell_size, 120);
        assert_eq!(cfg.nudge.step, 3);
        assert_eq!(cfg.nudge.coarse_step, 15);
        assert_eq!(cfg.after_click, AfterClick::Exit);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn zero_cell_size_rejected() {
        let cfg = Config {
            cell_size: 0,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCellSize));
    }

    #[test]
    fn coarse_must_exceed_step() {
        let cfg = Config {
            nudge: NudgeConfig {
                step: 10,
                coarse_step: 10,
            },
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::CoarseNotLarger {
                step: 10,
                coarse: 10
            })
        );
    }

    #[test]
    fn zero_step_rejected() {
        let cfg = Config {
            nudge: NudgeConfig {
                step: 0,
                coarse_step: 5,
            },
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroNudge));
    }
}

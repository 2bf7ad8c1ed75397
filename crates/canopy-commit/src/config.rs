#![forbid(unsafe_code)]

//! Construction parameters for a [`ShadowTree`](crate::ShadowTree).
//!
//! # Loading
//!
//! ```toml
//! # surface.toml
//! surface_id = 11
//!
//! [layout_constraints]
//! layout_direction = "left_to_right"
//! minimum_size = { width = 0.0, height = 0.0 }
//! maximum_size = { width = 390.0, height = 844.0 }
//!
//! [layout_context]
//! point_scale_factor = 3.0
//! ```
//!
//! ```rust,ignore
//! let config = ShadowTreeConfig::from_toml_file("surface.toml")?;
//! let tree = ShadowTree::from_config(&config)?;
//! ```
//!
//! Omitted fields take their defaults: unbounded constraints, a scale factor
//! of 1 and surface 0.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use canopy_core::{LayoutConstraints, LayoutContext, SurfaceId};

/// Everything needed to create a surface's shadow tree.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ShadowTreeConfig {
    /// Surface identity; also the root node's tag.
    pub surface_id: SurfaceId,
    /// Initial constraints of the root.
    pub layout_constraints: LayoutConstraints,
    /// Initial layout environment.
    pub layout_context: LayoutContext,
}

impl ShadowTreeConfig {
    pub fn new(
        surface_id: SurfaceId,
        layout_constraints: LayoutConstraints,
        layout_context: LayoutContext,
    ) -> Self {
        Self {
            surface_id,
            layout_constraints,
            layout_context,
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check that every parameter is usable.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.surface_id < 0 {
            errors.push(format!(
                "surface_id must be non-negative, got {}",
                self.surface_id
            ));
        }

        let min = self.layout_constraints.minimum_size;
        let max = self.layout_constraints.maximum_size;
        for (axis, lo, hi) in [("width", min.width, max.width), ("height", min.height, max.height)] {
            if !lo.is_finite() || lo < 0.0 {
                errors.push(format!(
                    "layout_constraints.minimum_size.{axis} must be finite and >= 0, got {lo}"
                ));
            }
            if hi.is_nan() {
                errors.push(format!("layout_constraints.maximum_size.{axis} must not be NaN"));
            } else if hi < lo {
                errors.push(format!(
                    "layout_constraints.maximum_size.{axis} ({hi}) is below minimum_size.{axis} ({lo})"
                ));
            }
        }

        let context = &self.layout_context;
        if !context.point_scale_factor.is_finite() || context.point_scale_factor <= 0.0 {
            errors.push(format!(
                "layout_context.point_scale_factor must be finite and > 0, got {}",
                context.point_scale_factor
            ));
        }
        if !context.font_size_multiplier.is_finite() || context.font_size_multiplier <= 0.0 {
            errors.push(format!(
                "layout_context.font_size_multiplier must be finite and > 0, got {}",
                context.font_size_multiplier
            ));
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or applying a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

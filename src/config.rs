//! Configuration parsed from environment variables.

use canvas::CanvasGeometry;

use crate::export::{ExportFormat, ExportPolicy};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Parse { var: &'static str, message: String },
}

/// Everything a [`crate::DrawingSession`] needs besides its channel.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetdrawConfig {
    pub geometry: CanvasGeometry,
    pub export: ExportPolicy,
}

impl Default for MeetdrawConfig {
    fn default() -> Self {
        let geometry = CanvasGeometry::default();
        Self { geometry, export: ExportPolicy::for_geometry(&geometry) }
    }
}

impl MeetdrawConfig {
    /// Build config from environment variables.
    ///
    /// All optional:
    /// - `MEETDRAW_EXPORT_MAX_BYTES`: output budget in bytes, default 104857 (0.1 MiB)
    /// - `MEETDRAW_EXPORT_MAX_DIMENSION`: longest output side in pixels, default half the canvas width
    /// - `MEETDRAW_EXPORT_FORMAT`: `jpeg` (default) or `webp`
    /// - `MEETDRAW_EXPORT_OFFLOAD`: `true` (default) runs encoding on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let export = &mut config.export;

        if let Some(raw) = lookup("MEETDRAW_EXPORT_MAX_BYTES") {
            export.max_bytes = parse_positive("MEETDRAW_EXPORT_MAX_BYTES", &raw)?;
        }
        if let Some(raw) = lookup("MEETDRAW_EXPORT_MAX_DIMENSION") {
            export.max_dimension = parse_positive("MEETDRAW_EXPORT_MAX_DIMENSION", &raw)?;
        }
        if let Some(raw) = lookup("MEETDRAW_EXPORT_FORMAT") {
            export.format = parse_format(&raw)?;
        }
        if let Some(raw) = lookup("MEETDRAW_EXPORT_OFFLOAD") {
            export.offload = parse_bool("MEETDRAW_EXPORT_OFFLOAD", &raw)?;
        }

        Ok(config)
    }
}

fn parse_positive<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialOrd,
    T::Err: std::fmt::Display,
{
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::Parse { var, message: format!("{raw:?}: {e}") })?;
    if value <= T::default() {
        return Err(ConfigError::Parse { var, message: format!("{raw:?}: must be greater than zero") });
    }
    Ok(value)
}

fn parse_format(raw: &str) -> Result<ExportFormat, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
        "webp" => Ok(ExportFormat::WebP),
        other => Err(ConfigError::Parse {
            var: "MEETDRAW_EXPORT_FORMAT",
            message: format!("unsupported format '{other}' (expected 'jpeg' or 'webp')"),
        }),
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::Parse { var, message: format!("'{other}' is not a boolean") }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Export of shapes to GeoJSON, KML and a JSON bundle.
//!
//! All serializers take a slice of shapes; single-shape export passes a
//! one-element slice.

mod bundle;
mod geojson;
mod kml;

use std::path::Path;

use anyhow::{Context, Result};
use geodraw_core::Shape;

pub use bundle::export_bundle;
pub use geojson::export_geojson;
pub use kml::export_kml;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    Kml,
    Json,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Kml => "kml",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "application/geo+json",
            ExportFormat::Kml => "application/vnd.google-earth.kml+xml",
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "geojson" => Ok(ExportFormat::GeoJson),
            "kml" | "kmz" => Ok(ExportFormat::Kml),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format {other:?}")),
        }
    }
}

/// Serialize shapes in the given format
pub fn export(shapes: &[Shape], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::GeoJson => export_geojson(shapes),
        ExportFormat::Kml => Ok(export_kml(shapes)),
        ExportFormat::Json => export_bundle(shapes),
    }
}

/// Serialize a single shape.
///
/// `Json` yields the bare shape object rather than a bundle.
pub fn export_one(shape: &Shape, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(shape).context("Failed to serialize shape")
        }
        _ => export(std::slice::from_ref(shape), format),
    }
}

/// Suggested file name for a single-shape export
pub fn file_name_for(shape: &Shape, format: ExportFormat) -> String {
    let stem = if shape.name.trim().is_empty() {
        "shape"
    } else {
        shape.name.trim()
    };
    format!("{}.{}", stem, format.extension())
}

/// Write an export to a file
pub fn save_export(shapes: &[Shape], format: ExportFormat, path: &Path) -> Result<()> {
    let content = export(shapes, format)?;
    std::fs::write(path, content).with_context(|| format!("Failed to save to {:?}", path))?;
    Ok(())
}

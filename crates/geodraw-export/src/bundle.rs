use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use geodraw_core::Shape;
use serde::Serialize;

const BUNDLE_VERSION: &str = "1.0";
const APPLICATION: &str = "geodraw";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Bundle<'a> {
    shapes: &'a [Shape],
    exported_at: DateTime<Utc>,
    version: &'static str,
    metadata: Metadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Metadata {
    total_shapes: usize,
    application: &'static str,
    shape_types: BTreeMap<&'static str, usize>,
}

/// Export the full shape records with a small metadata header
pub fn export_bundle(shapes: &[Shape]) -> Result<String> {
    let mut shape_types = BTreeMap::new();
    for shape in shapes {
        *shape_types.entry(shape.kind().as_str()).or_insert(0) += 1;
    }

    let bundle = Bundle {
        shapes,
        exported_at: Utc::now(),
        version: BUNDLE_VERSION,
        metadata: Metadata {
            total_shapes: shapes.len(),
            application: APPLICATION,
            shape_types,
        },
    };
    serde_json::to_string_pretty(&bundle).context("Failed to serialize shape bundle")
}

//! Subcommand implementations.
//!
//! Drawing commands replay map events through [`EditTools`] on a headless
//! [`SceneMap`], so they follow the same rules as interactive drawing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use geodraw_core::{ShapeId, ShapeKind, ShapeUpdate};
use geodraw_export::{export, export_one, file_name_for, save_export, ExportFormat};
use geodraw_geometry::LatLng;
use geodraw_session::{EditTools, MapEvent, Outcome, SceneMap, Tool};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored shapes
    List,
    /// Draw a polygon through the given vertices
    Polygon {
        /// Vertices as LAT,LNG
        #[arg(value_name = "LAT,LNG", required = true, allow_hyphen_values = true)]
        points: Vec<LatLng>,
    },
    /// Draw a circle from its center and a point on its edge
    Circle {
        #[arg(value_name = "LAT,LNG", allow_hyphen_values = true)]
        center: LatLng,
        #[arg(value_name = "LAT,LNG", allow_hyphen_values = true)]
        edge: LatLng,
    },
    /// Move one vertex of a polygon
    MoveVertex {
        id: String,
        index: usize,
        #[arg(value_name = "LAT,LNG", allow_hyphen_values = true)]
        to: LatLng,
    },
    /// Set the name or properties of a shape
    Set {
        id: String,
        /// KEY=VALUE pairs; `name` renames the shape, an empty value removes a property
        #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
    /// Set stroke and fill colour
    Color { id: String, color: String },
    /// Hide a shown shape or show a hidden one
    ToggleHidden { id: String },
    /// Hide or show every shape of a kind (polygon or circle)
    ToggleKind { kind: ShapeKind },
    /// Delete a shape
    Delete { id: String },
    /// Delete every shape
    Clear,
    /// Export shapes
    Export {
        #[arg(long, default_value = "geojson")]
        format: ExportFormat,
        /// Export only this shape
        #[arg(long)]
        id: Option<String>,
        /// Output file or directory; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {s:?}")),
    }
}

pub fn run(tools: &mut EditTools<SceneMap>, command: Command) -> Result<()> {
    match command {
        Command::List => list(tools),
        Command::Polygon { points } => {
            let Some(&last) = points.last() else {
                bail!("no vertices given");
            };
            tools.set_tool(Some(Tool::Polygon)).into_result()?;
            for &point in &points {
                tools.handle_event(MapEvent::Click(point)).into_result()?;
            }
            print_committed(tools.handle_event(MapEvent::DoubleClick(last)))
        }
        Command::Circle { center, edge } => {
            tools.set_tool(Some(Tool::Circle)).into_result()?;
            tools.handle_event(MapEvent::Click(center)).into_result()?;
            tools.handle_event(MapEvent::Move(edge)).into_result()?;
            let outcome = tools.handle_event(MapEvent::Click(edge));
            print_committed(outcome)
        }
        Command::MoveVertex { id, index, to } => {
            let id = ShapeId::from(id);
            tools.begin_vertex_edit(&id).into_result()?;
            if tools.drag_vertex(index, to) == Outcome::Ignored {
                tools.cancel_vertex_edit();
                bail!("shape {id} has no vertex {index}");
            }
            print_committed(tools.save_vertex_edit())
        }
        Command::Set { id, pairs } => {
            let mut update = ShapeUpdate::new();
            for (key, value) in pairs {
                update = match (key.as_str(), value.is_empty()) {
                    ("name", _) => update.name(value),
                    (_, true) => update.property(key, serde_json::Value::Null),
                    (_, false) => update.property(key, value),
                };
            }
            print_committed(tools.update_shape(&ShapeId::from(id), update))
        }
        Command::Color { id, color } => {
            print_committed(tools.update_color(&ShapeId::from(id), &color))
        }
        Command::ToggleHidden { id } => {
            let id = ShapeId::from(id);
            tools.toggle_shape_visibility(&id).into_result()?;
            let hidden = tools.repository().is_hidden(&id);
            println!("{id} {}", if hidden { "hidden" } else { "shown" });
            Ok(())
        }
        Command::ToggleKind { kind } => {
            tools.toggle_kind_visibility(kind).into_result()?;
            let visible = tools.repository().is_kind_visible(kind);
            println!("{kind} {}", if visible { "shown" } else { "hidden" });
            Ok(())
        }
        Command::Delete { id } => tools.delete_shape(&ShapeId::from(id)).into_result(),
        Command::Clear => tools.delete_all().into_result(),
        Command::Export { format, id, out } => export_shapes(tools, format, id, out.as_deref()),
    }
}

fn list(tools: &EditTools<SceneMap>) -> Result<()> {
    let repo = tools.repository();
    for shape in repo.iter() {
        let hidden = if repo.is_visible(shape.id()) { "" } else { " (hidden)" };
        println!(
            "{}\t{}\t{}\t{}\t{:.2} m²\t{:.2} m{}",
            shape.id(),
            shape.kind(),
            shape.name,
            shape.vertices(),
            shape.area(),
            shape.perimeter(),
            hidden,
        );
    }
    info!(count = repo.len(), "listed shapes");
    Ok(())
}

fn export_shapes(
    tools: &EditTools<SceneMap>,
    format: ExportFormat,
    id: Option<String>,
    out: Option<&Path>,
) -> Result<()> {
    let repo = tools.repository();

    let Some(id) = id else {
        match out {
            Some(path) => {
                save_export(repo.list(), format, path)?;
                info!(?path, count = repo.len(), "exported shapes");
            }
            None => println!("{}", export(repo.list(), format)?),
        }
        return Ok(());
    };

    let id = ShapeId::from(id);
    let shape = repo
        .get(&id)
        .ok_or_else(|| anyhow!("shape {id} not found"))?;
    let content = export_one(shape, format)?;
    match out {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(file_name_for(shape, format))
            } else {
                path.to_path_buf()
            };
            fs::write(&path, content).with_context(|| format!("Failed to save to {:?}", path))?;
            info!(?path, %id, "exported shape");
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn print_committed(outcome: Outcome) -> Result<()> {
    if let Some(id) = outcome.committed_id() {
        println!("{id}");
    }
    outcome.into_result()
}

trait IntoResult {
    fn into_result(self) -> Result<()>;
}

impl IntoResult for Outcome {
    fn into_result(self) -> Result<()> {
        match self {
            Outcome::Rejected(rejection) => Err(anyhow!(rejection)),
            Outcome::Failed(error) => Err(anyhow!(error)),
            _ => Ok(()),
        }
    }
}

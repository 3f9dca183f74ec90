use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::graph_utils::graph::Node;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// `{dir}/nodes_export_YYYYMMDD_HHMMSS.{ext}`
pub fn timestamped_path(dir: &Path, format: ExportFormat) -> PathBuf {
    let now = time::OffsetDateTime::now_utc();
    let fmt = time::macros::format_description!("[year][month][day]_[hour][minute][second]");
    let stamp = now.format(&fmt).unwrap_or_else(|_| "now".into());
    dir.join(format!("nodes_export_{}.{}", stamp, format.extension()))
}

/// Swaps the extension of a user-edited path when the format changes.
pub fn with_format(path: &Path, format: ExportFormat) -> PathBuf { path.with_extension(format.extension()) }

pub fn export_nodes(nodes: &[Node], path: &Path, format: ExportFormat) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    match format {
        ExportFormat::Json => export_nodes_json(nodes, path),
        ExportFormat::Csv => export_nodes_csv(nodes, path),
    }
    .with_context(|| format!("failed to export nodes to {}", path.display()))?;
    log::info!("exported {} node(s) to {}", nodes.len(), path.display());
    Ok(())
}

fn export_nodes_json(nodes: &[Node], path: &Path) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct NodeOut<'a> {
        id: String,
        labels: &'a [String],
        properties: &'a crate::graph_utils::graph::Properties,
    }
    let out: Vec<NodeOut> = nodes
        .iter()
        .map(|n| NodeOut { id: n.id.to_string(), labels: &n.labels, properties: &n.properties })
        .collect();
    let mut f = File::create(path)?;
    serde_json::to_writer_pretty(&mut f, &out)?;
    f.write_all(b"\n")?;
    Ok(())
}

fn export_nodes_csv(nodes: &[Node], path: &Path) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    // headers: id,labels,properties_json
    wtr.write_record(["id", "labels", "properties_json"])?;
    for n in nodes {
        let props_json = serde_json::to_string(&n.properties).unwrap_or_else(|_| "{}".into());
        wtr.write_record([n.id.to_string(), n.labels.join(";"), props_json])?;
    }
    wtr.flush()?;
    Ok(())
}

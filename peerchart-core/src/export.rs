use crate::chart::LayoutResult;
use peerchart_common::{PeerchartError, Result};
use std::path::Path;

/// Write a computed layout as pretty JSON for an external renderer.
pub fn export_layout_json(output_path: &Path, layout: &LayoutResult) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, layout)
        .map_err(|e| PeerchartError::Other(e.to_string()))?;
    Ok(())
}

pub fn layout_to_json(layout: &LayoutResult) -> Result<String> {
    serde_json::to_string_pretty(layout).map_err(|e| PeerchartError::Other(e.to_string()))
}

//! CLI command implementations.

use std::path::{Path, PathBuf};

use reelcut_common::AppConfig;
use reelcut_edit_model::EditJob;
use reelcut_render_engine::RenderConfig;

pub mod check;
pub mod compile;
pub mod render;

/// Load an edit job from a JSON file.
pub fn load_job(path: &Path) -> anyhow::Result<EditJob> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read job file {}: {e}", path.display()))?;
    let job: EditJob = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse job file {}: {e}", path.display()))?;
    Ok(job)
}

/// Build a render config from the saved app config plus CLI overrides.
pub fn render_config(output_dir: Option<PathBuf>) -> RenderConfig {
    let config = AppConfig::load();
    let mut render = RenderConfig::from(&config);
    if let Some(dir) = output_dir {
        render.output_dir = dir;
    }
    render
}

//! Compile an edit job and print the invocation.

use std::path::PathBuf;

use reelcut_render_engine::Renderer;

pub fn run(job_path: PathBuf, output_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let job = super::load_job(&job_path)?;
    let renderer = Renderer::new(super::render_config(output_dir));

    let argv = renderer.compile(&job)?;
    println!("{}", renderer.command_line(&argv));
    Ok(())
}

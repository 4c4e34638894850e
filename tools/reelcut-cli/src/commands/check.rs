//! Check that the transcoding tool is available.

use std::process::{Command, Stdio};

use reelcut_common::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load();
    let binary = &config.tool.binary;

    println!("ReelCut System Check");
    println!("{}", "=".repeat(50));

    match Command::new(binary)
        .arg("-version")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let first_line = stdout.lines().next().unwrap_or("unknown version");
            println!("[OK] Tool binary: {binary}");
            println!("     {first_line}");
        }
        Ok(output) => {
            println!("[WARN] Tool binary: {binary} (exited with {})", output.status);
        }
        Err(e) => {
            println!("[FAIL] Tool binary: {binary} ({e})");
            println!("       Install ffmpeg or point tool.binary at it in the config file.");
            return Err(anyhow::anyhow!("Transcoding tool not available"));
        }
    }

    println!("[OK] Output directory: {}", config.output_dir.display());
    println!();
    println!("ReelCut is ready.");
    Ok(())
}

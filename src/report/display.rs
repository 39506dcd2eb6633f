//! Best-effort hand-off of the figure to the desktop image viewer.

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use tokio::process::Command;

/// Whether a graphical session looks available
pub fn display_available() -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

/// Platform opener command for `path`
pub fn opener_command(path: &Utf8Path) -> (String, Vec<String>) {
    if cfg!(target_os = "windows") {
        (
            "cmd".to_string(),
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                path.to_string(),
            ],
        )
    } else if cfg!(target_os = "macos") {
        ("open".to_string(), vec![path.to_string()])
    } else {
        ("xdg-open".to_string(), vec![path.to_string()])
    }
}

/// Open the figure in the system viewer.
pub async fn open_figure(path: &Utf8Path) -> Result<()> {
    if !display_available() {
        bail!("no graphical display available");
    }

    let (program, args) = opener_command(path);
    let status = Command::new(&program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("Failed to launch {}", program))?;

    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}

/// Like [`open_figure`], but failures are only logged.
pub async fn try_open_figure(path: &Utf8Path) {
    match open_figure(path).await {
        Ok(()) => tracing::debug!("Opened {} in the image viewer", path),
        Err(e) => tracing::info!("Not displaying figure: {:#}", e),
    }
}

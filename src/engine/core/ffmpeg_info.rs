use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::process::Command;

/// Run `<tool> -version` and return the first line of its banner
pub fn tool_version(program: impl AsRef<OsStr>) -> Result<String> {
    let program = program.as_ref();
    let output = Command::new(program)
        .arg("-version")
        .output()
        .with_context(|| {
            format!(
                "Failed to execute {}. Is it installed and in PATH?",
                program.to_string_lossy()
            )
        })?;

    if !output.status.success() {
        anyhow::bail!(
            "{} command failed with status: {}",
            program.to_string_lossy(),
            output.status
        );
    }

    Ok(first_banner_line(&String::from_utf8_lossy(&output.stdout)))
}

fn first_banner_line(banner: &str) -> String {
    banner
        .lines()
        .next()
        .unwrap_or("Unknown version")
        .to_string()
}

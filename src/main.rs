use std::path::PathBuf;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    stylecfg::logging::init();

    let root = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("project root does not exist: {}", root.display()))?;

    let resolved = stylecfg::resolve_project(&root)?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

//! Best-effort project dependency installation.
//!
//! Solidity projects routinely import from `node_modules/` or Foundry's
//! `lib/`; when asked, install those before compilation so imported paths
//! resolve. Failures here are warnings - the scan itself only needs the
//! files in scope.

use std::path::Path;
use std::process::Command;

/// Install project dependencies under `root`, keyed on which manifest
/// files are present.
pub fn install_dependencies(root: &Path) -> anyhow::Result<()> {
    if root.join("package.json").exists() {
        let tool = if root.join("yarn.lock").exists() {
            "yarn"
        } else {
            "npm"
        };
        run(root, tool, &["install"]);
    }

    if root.join("foundry.toml").exists() {
        run(root, "forge", &["install"]);
    }

    Ok(())
}

fn run(root: &Path, program: &str, args: &[&str]) {
    eprintln!("Installing dependencies: {} {}", program, args.join(" "));
    match Command::new(program).args(args).current_dir(root).status() {
        Ok(status) if status.success() => {}
        Ok(status) => eprintln!("Warning: {} exited with {}", program, status),
        Err(e) => eprintln!("Warning: could not run {}: {}", program, e),
    }
}

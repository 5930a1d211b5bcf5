mod preset;
mod version;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use version::Version;

const PRESETS_DEF: &str = "presets/presets.def";

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed={}", PRESETS_DEF);
    println!("cargo:rerun-if-changed=build");

    let out_dir = env::var("OUT_DIR").context("OUT_DIR is not set")?;
    let out_dir = PathBuf::from(out_dir);

    let presets = preset::parse(PRESETS_DEF)
        .with_context(|| format!("when parsing presets from: {}", PRESETS_DEF))?;
    preset::check(&presets).with_context(|| format!("invalid presets in: {}", PRESETS_DEF))?;

    let to = out_dir.join("presets.rs");
    preset::generate(&presets, &to)
        .with_context(|| format!("when generating preset table to: {:?}", to))?;

    let version = Version::from_env().context("when reading package version")?;
    let to = out_dir.join("version.rs");
    version
        .generate(&to)
        .with_context(|| format!("when generating version to: {:?}", to))?;

    Ok(())
}

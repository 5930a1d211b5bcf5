use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use itertools::Itertools;

// Bits reserved for the preset and native masks.
const MASK_BITS: u32 = 0xc000_0000;

pub struct Preset {
    pub name: String,
    pub index: u32,
    pub descr: String,
}

pub fn parse<P>(path: P) -> Result<Vec<Preset>>
where
    P: AsRef<Path>,
{
    let contents = fs::read_to_string(path).context("failed to read preset definitions")?;

    let mut presets = vec![];
    for (no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let name = fields
            .next()
            .ok_or_else(|| anyhow!("missing name at line {}", no + 1))?;
        let index = fields
            .next()
            .ok_or_else(|| anyhow!("missing index at line {}", no + 1))?;
        let index = u32::from_str_radix(index.trim_start_matches("0x"), 16)
            .with_context(|| format!("invalid index {:?} at line {}", index, no + 1))?;
        let descr = fields.join(" ");

        presets.push(Preset {
            name: name.to_string(),
            index,
            descr,
        });
    }

    Ok(presets)
}

pub fn check(presets: &[Preset]) -> Result<()> {
    if let Some(p) = presets
        .iter()
        .find(|p| !p.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
    {
        bail!("preset name is not an ASCII identifier: {:?}", p.name);
    }

    if let Some(p) = presets.iter().find(|p| p.index & MASK_BITS > 0) {
        bail!("preset index overlaps the code masks: {} = {:#x}", p.name, p.index);
    }

    let names = presets.iter().map(|p| &p.name).duplicates().join(", ");
    if !names.is_empty() {
        bail!("duplicate preset names: {}", names);
    }

    let indices = presets
        .iter()
        .map(|p| p.index)
        .duplicates()
        .map(|i| format!("{:#x}", i))
        .join(", ");
    if !indices.is_empty() {
        bail!("duplicate preset indices: {}", indices);
    }

    Ok(())
}

pub fn generate<P>(presets: &[Preset], to: P) -> Result<()>
where
    P: AsRef<Path>,
{
    let entries = presets
        .iter()
        .sorted_by_key(|p| p.index)
        .map(|p| {
            format!(
                "    Preset {{ name: {:?}, index: {:#04x}, descr: {:?} }},",
                p.name, p.index, p.descr,
            )
        })
        .join("\n");

    let contents = format!(
        "pub(super) static PRESETS: [Preset; {}] = [\n{}\n];\n",
        presets.len(),
        entries,
    );

    fs::write(to, contents).context("failed to write preset table")
}

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Library version as four byte-sized components.
///
/// `major.minor.revision` come from the package version, the increment
/// from the last dot-separated segment of its pre-release tag (`0` if absent).
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
    pub increment: u8,
}

fn component(key: &str) -> Result<u8> {
    let val = env::var(key).with_context(|| format!("{} is not set", key))?;
    val.parse::<u8>()
        .with_context(|| format!("{}={:?} does not fit in one byte", key, val))
}

impl Version {
    pub fn from_env() -> Result<Version> {
        let pre = env::var("CARGO_PKG_VERSION_PRE").unwrap_or_default();
        let increment = match pre.as_str() {
            "" => 0,
            pre => pre
                .rsplit('.')
                .next()
                .ok_or_else(|| anyhow!("empty pre-release tag"))?
                .parse::<u8>()
                .with_context(|| format!("unknown pre-release format: {:?}", pre))?,
        };

        Ok(Self {
            major: component("CARGO_PKG_VERSION_MAJOR")?,
            minor: component("CARGO_PKG_VERSION_MINOR")?,
            revision: component("CARGO_PKG_VERSION_PATCH")?,
            increment,
        })
    }

    pub fn generate<P>(&self, to: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let contents = format!(
            "pub const VERSION: Version = Version::new({}, {}, {}, {});\n",
            self.major, self.minor, self.revision, self.increment,
        );
        fs::write(to, contents).context("failed to write version file")
    }
}

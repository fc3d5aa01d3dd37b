//! Options loaded from a TOML file.
//!
//! ```toml
//! # overwrite | warn | keep-first
//! collisions = "keep-first"
//! indent_step = 4
//! ```

use std::path::Path;

use script_spec::CollisionPolicy;
use serde::Deserialize;

use crate::{read_contents, ErrorReport};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// What to do when two rows define the same mnemonic.
    pub(crate) collisions: CollisionPolicy,
    /// Spaces added per nested conditional in disassembly output.
    pub(crate) indent_step: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            collisions: CollisionPolicy::default(),
            indent_step: 2,
        }
    }
}

impl Config {
    pub(crate) fn load(path: &Path) -> miette::Result<Self> {
        let contents = read_contents(path)?;
        toml::from_str(&contents)
            .map_err(|e| ErrorReport::from_toml_error(&e, path, contents.clone()).into())
    }
}

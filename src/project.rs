// src/project.rs

//! The project being supervised.
//!
//! There is exactly one [`Project`] per running `watchrun` process. Its name
//! doubles as the output binary name and as the key under which builds are
//! serialized.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

/// Identity of the watched project.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    root: PathBuf,
    build_tags: Option<String>,
}

impl Project {
    /// Create a project rooted at `root`.
    ///
    /// The name defaults to the root directory's base name; pass
    /// `name_override` to use a different binary name.
    pub fn from_root(
        root: impl Into<PathBuf>,
        name_override: Option<String>,
        build_tags: Option<String>,
    ) -> Result<Self> {
        let root: PathBuf = root.into();
        let root = root.canonicalize().unwrap_or(root); // best-effort

        let name = match name_override {
            Some(name) if !name.trim().is_empty() => name,
            _ => root
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow!("cannot derive a project name from root {root:?}"))?,
        };

        let build_tags = build_tags.filter(|t| !t.trim().is_empty());

        Ok(Self {
            name,
            root,
            build_tags,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_tags(&self) -> Option<&str> {
        self.build_tags.as_deref()
    }

    /// Name of the binary the build tool produces (`<name>.exe` on Windows).
    pub fn binary_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Path used to launch the built binary.
    ///
    /// Made explicitly relative (`./name`) unless already absolute or
    /// relative-prefixed, so the spawn never consults the `PATH` search
    /// order.
    pub fn exec_path(&self) -> String {
        let bin = self.binary_name();
        if Path::new(&bin).is_absolute() || bin.starts_with("./") || bin.starts_with(".\\") {
            bin
        } else {
            format!("./{bin}")
        }
    }
}

use anyhow::{Result, anyhow};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// The canonical on-disk store of skills: one directory per skill under a
/// single root. The filesystem is the source of truth; there is no index
/// file to keep in sync.
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn skill_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Sorted names of all skill directories currently in the library.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            // symlink-aware, so list() and contains() agree on what a skill is
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Name-existence test only; never compares content.
    pub fn contains(&self, name: &str) -> bool {
        fs::symlink_metadata(self.skill_dir(name))
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    pub fn purge(&self, name: &str) -> Result<()> {
        fs::remove_dir_all(self.skill_dir(name))?;
        Ok(())
    }

    /// Removes a leftover symlink occupying a skill's slot so a real
    /// directory can be created there. Returns whether anything was removed.
    pub fn clear_stale_link(&self, name: &str) -> Result<bool> {
        let path = self.skill_dir(name);
        if let Ok(meta) = fs::symlink_metadata(&path)
            && meta.file_type().is_symlink()
        {
            fs::remove_file(&path)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Writes a fetched file at its library-relative path, creating
    /// intermediate directories lazily.
    pub fn write_file(&self, rel: &Path, bytes: &[u8]) -> Result<()> {
        if !rel
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(anyhow!(t!(
                "skills.import.invalid_path",
                path = rel.display()
            )));
        }
        let dest = self.root.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, bytes)?;
        Ok(())
    }
}

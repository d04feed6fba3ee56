// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use miette::IntoDiagnostic;

/// A scratch folder under [`std::env::temp_dir()`]. It is deleted (with everything in
/// it) when this struct is dropped.
#[derive(Debug)]
pub struct TempDir {
    pub path: PathBuf,
}

/// Create a temporary directory with a unique name.
///
/// # Errors
///
/// If the directory can't be created.
pub fn create_temp_dir() -> miette::Result<TempDir> {
    let root = std::env::temp_dir();
    let new_temp_dir = root.join(format!("emu_console_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir(&new_temp_dir).into_diagnostic()?;
    Ok(TempDir { path: new_temp_dir })
}

impl TempDir {
    /// Writes `content` to `file_name` inside this folder and returns the full path.
    ///
    /// # Errors
    ///
    /// If the file can't be written.
    pub fn write_file(&self, file_name: &str, content: &str) -> miette::Result<PathBuf> {
        let path = self.path.join(file_name);
        std::fs::write(&path, content).into_diagnostic()?;
        Ok(path)
    }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path { &self.path }
}

impl Drop for TempDir {
    fn drop(&mut self) { drop(std::fs::remove_dir_all(&self.path)); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir() {
        let temp_dir = create_temp_dir().unwrap();
        assert!(temp_dir.path.exists());

        let file = temp_dir.write_file("startup.lua", "-- empty").unwrap();
        assert!(file.exists());
    }

    #[test]
    fn test_temp_dir_drop() {
        let temp_dir = create_temp_dir().unwrap();
        let copy_of_path = temp_dir.path.clone();

        drop(temp_dir);

        assert!(!copy_of_path.exists());
    }
}

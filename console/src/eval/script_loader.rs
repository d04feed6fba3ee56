// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs, io,
          path::{Path, PathBuf}};

use super::ScriptRequirement;
use crate::ScriptError;

pub const SCRIPT_EXTENSION: &str = "lua";

/// `<script_dir>/<name>.lua`
#[must_use]
pub fn script_path(script_dir: &Path, name: &str) -> PathBuf {
    script_dir.join(format!("{name}.{SCRIPT_EXTENSION}"))
}

/// Reads a script file. Returns `Ok(None)` for an optional script that does not exist.
///
/// # Errors
///
/// [`ScriptError::Read`] if the file can't be read, unless it is optional and missing.
pub fn read_script(
    path: &Path,
    requirement: ScriptRequirement,
) -> Result<Option<String>, ScriptError> {
    match fs::read_to_string(path) {
        Ok(source) => Ok(Some(source)),
        Err(error)
            if error.kind() == io::ErrorKind::NotFound
                && requirement == ScriptRequirement::Optional =>
        {
            Ok(None)
        }
        Err(source) => Err(ScriptError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use emu_test_fixtures::create_temp_dir;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_script_path() {
        assert_eq!(
            script_path(Path::new("scripts"), "startup"),
            PathBuf::from("scripts/startup.lua")
        );
    }

    #[test]
    fn test_read_existing_script() {
        let temp_dir = create_temp_dir().unwrap();
        let path = temp_dir.write_file("startup.lua", "reset()").unwrap();

        for requirement in [ScriptRequirement::Required, ScriptRequirement::Optional] {
            assert_eq!(
                read_script(&path, requirement).unwrap(),
                Some("reset()".to_string())
            );
        }
    }

    #[test]
    fn test_missing_script() {
        let temp_dir = create_temp_dir().unwrap();
        let path = script_path(&temp_dir.path, "nope");

        assert_eq!(read_script(&path, ScriptRequirement::Optional).unwrap(), None);

        let error = read_script(&path, ScriptRequirement::Required).unwrap_err();
        assert!(matches!(error, ScriptError::Read { .. }));
        assert!(error.to_string().contains("nope.lua"));
    }
}

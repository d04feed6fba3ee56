// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

/// A file appender that never rolls over, so everything goes to exactly `path_str`.
///
/// Note that if you wrap this up in a non blocking writer, as shown below, it doesn't
/// work:
///
/// ```ignore
/// tracing_appender::non_blocking(try_create("log.txt")?);
/// ```
///
/// # Errors
///
/// If `path_str` has no file name component.
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = PathBuf::from(path_str);

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or don't have required permissions.",
            path.display()
        )
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use emu_test_fixtures::create_temp_dir;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_appender_writes_to_exact_path() {
        let temp_dir = create_temp_dir().unwrap();
        let path = temp_dir.path.join("log.txt");

        let mut appender = try_create(&path.display().to_string()).unwrap();
        appender.write_all(b"console loop: exit\n").unwrap();
        appender.flush().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "console loop: exit\n"
        );
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        assert!(try_create("/").is_err());
    }
}

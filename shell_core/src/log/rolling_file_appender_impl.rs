// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

/// Log file that is never rotated. The file (and its folder) is created right away.
///
/// Note that if you wrap this up in a non blocking writer, events logged just before the
/// process exits can be lost.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = Path::new(path_str);

    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access the folder of {}. It might not exist, or not have the required permissions.",
            path.display()
        )
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!("{} does not name a file.", path.display())
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("logs").join("shell.log");

        try_create(file_path.to_str().unwrap()).unwrap();
        assert!(file_path.exists());
    }

    #[test]
    fn test_rejects_path_without_file_name() {
        assert!(try_create("/").is_err());
    }
}

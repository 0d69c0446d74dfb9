// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque,
          fs,
          io::{self, BufRead, BufReader, BufWriter, Write},
          path::Path};

use crate::HISTORY_SIZE_MAX;

/// Bounded line history, newest entry first. Persisted as plain text, one entry per
/// line, oldest first (so the file reads top to bottom in the order lines were typed).
#[derive(Debug, Clone)]
pub struct History {
    pub entries: VecDeque<String>,
    pub max_size: usize,
    current_position: Option<usize>,
}

impl Default for History {
    fn default() -> Self { Self::new(HISTORY_SIZE_MAX) }
}

impl History {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::default(),
            max_size,
            current_position: None,
        }
    }

    /// Add `line` as the newest entry. Empty lines, lines containing a line break, and
    /// repeats of the newest entry are ignored. Resets the recall position.
    pub fn update(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.is_empty()
            || line.contains(['\n', '\r'])
            || self.entries.front() == Some(&line)
        {
            return;
        }

        self.entries.push_front(line);
        self.current_position = None;
        self.entries.truncate(self.max_size);
    }

    /// Change the bound, dropping the oldest entries that no longer fit.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.entries.truncate(max_size);
    }

    /// Step back in time (Up key). Sticks at the oldest entry.
    pub fn search_next(&mut self) -> Option<&str> {
        if let Some(index) = &mut self.current_position {
            if *index + 1 < self.entries.len() {
                *index += 1;
            }
            self.entries.get(*index).map(String::as_str)
        } else if !self.entries.is_empty() {
            self.current_position = Some(0);
            self.entries.front().map(String::as_str)
        } else {
            None
        }
    }

    /// Step forward in time (Down key). Stepping past the newest entry yields `""`
    /// (back to an empty line) once, then [`None`].
    pub fn search_previous(&mut self) -> Option<&str> {
        let index = self.current_position?;
        if index == 0 {
            self.current_position = None;
            return Some("");
        }
        self.current_position = Some(index - 1);
        self.entries.get(index - 1).map(String::as_str)
    }

    /// Forget the recall position, eg when a new line is started.
    pub fn reset_position(&mut self) { self.current_position = None; }

    /// Replace the entries with the ones in the file at `path`. A missing file is not
    /// an error, it simply yields an empty history.
    ///
    /// # Errors
    ///
    /// Any other I/O error while reading.
    pub fn load(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = match fs::File::open(path.as_ref()) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };

        self.entries.clear();
        self.current_position = None;
        for line in BufReader::new(file).lines() {
            self.update(line?);
        }

        Ok(())
    }

    /// Write the entries to the file at `path`, oldest first.
    ///
    /// # Errors
    ///
    /// Any I/O error while creating or writing the file.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(fs::File::create(path.as_ref())?);
        for entry in self.entries.iter().rev() {
            writeln!(writer, "{entry}")?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_update() {
        let mut history = History::new(2);
        history.update("test1");
        assert_eq!(history.entries.front(), Some(&"test1".to_string()));

        history.update("");
        history.update("test1");
        assert_eq!(history.entries.len(), 1);

        history.update("test2");
        assert_eq!(history.entries.front(), Some(&"test2".to_string()));
        assert_eq!(history.entries.len(), 2);

        history.update("test3");
        assert_eq!(history.entries.len(), 2);
        assert!(history.entries.contains(&"test2".to_string()));
        assert!(history.entries.contains(&"test3".to_string()));
    }

    #[test]
    fn test_search_next() {
        let mut history = History::new(2);
        history.update("test1");
        history.update("test2");
        history.update("test3");

        assert_eq!(history.search_next(), Some("test3"));
        assert_eq!(history.search_next(), Some("test2"));
        assert_eq!(history.search_next(), Some("test2"));
    }

    #[test]
    fn test_search_previous() {
        let mut history = History::new(2);
        history.update("test1");
        history.update("test2");
        history.update("test3");

        assert_eq!(history.search_previous(), None);
        assert_eq!(history.search_next(), Some("test3"));
        assert_eq!(history.search_previous(), Some(""));
        assert_eq!(history.search_previous(), None);
    }

    #[test]
    fn test_search_empty() {
        let mut history = History::default();
        assert_eq!(history.search_next(), None);
        assert_eq!(history.search_previous(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");

        let mut history = History::default();
        history.update("first");
        history.update("second");
        history.save(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        let mut loaded = History::default();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.entries, history.entries);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::default();
        history.load(dir.path().join("does_not_exist")).unwrap();
        assert!(history.entries.is_empty());
    }

    #[test]
    fn test_load_respects_max_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");
        fs::write(&path, "a\nb\nc\n").unwrap();

        let mut history = History::new(2);
        history.load(&path).unwrap();
        assert_eq!(history.entries, VecDeque::from(["c".to_string(), "b".to_string()]));
    }
}

use super::level::Level;
use std::path::Path;

/// Call site of a log statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: Option<u32>,
}

impl Caller {
    pub fn new(file: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Parent directory, file name and line, e.g. `sink/mod.rs:42`.
    ///
    /// Empty when no file is known.
    pub fn trimmed_path(&self) -> String {
        if self.file.is_empty() {
            return String::new();
        }

        let path = Path::new(&self.file);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone());
        let trimmed = match path
            .parent()
            .and_then(Path::file_name)
            .map(|dir| dir.to_string_lossy())
        {
            Some(dir) => format!("{dir}/{file_name}"),
            None => file_name,
        };

        match self.line {
            Some(line) => format!("{trimmed}:{line}"),
            None => trimmed,
        }
    }
}

/// One log event as handed to a [`Core`](crate::sink::Core).
#[derive(Debug, Clone)]
pub struct Entry {
    pub level: Level,
    pub logger_name: String,
    pub message: String,
    pub caller: Option<Caller>,
    pub stack: Option<String>,
}

impl Entry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            logger_name: String::new(),
            message: message.into(),
            caller: None,
            stack: None,
        }
    }

    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = name.into();
        self
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn caller_path(&self) -> String {
        self.caller
            .as_ref()
            .map(Caller::trimmed_path)
            .unwrap_or_default()
    }
}

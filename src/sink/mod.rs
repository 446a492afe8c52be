// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The buffered file sink.

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::layout::Format;

pub use self::file::FileSink;

mod file;

/// The default name of the log file.
pub const DEFAULT_FILENAME: &str = "app.log";
/// The default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";
/// The default size, in bytes, at which the write buffer is flushed.
pub const DEFAULT_BUFFER_CAPACITY: usize = 16 * 1024;

/// Where and how a [`FileSink`] writes.
///
/// The serialized field names follow the configuration keys `filename`, `format`, `logDir` and
/// `bufferCapacity`; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileOptions {
    pub filename: String,
    pub format: Format,
    pub log_dir: PathBuf,
    pub buffer_capacity: usize,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            format: Format::default(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl FileOptions {
    /// Sets the file name. Defaults to `app.log`.
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Sets the serialization format. Defaults to [`Format::Structured`].
    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the log directory. It is created if missing.
    ///
    /// Defaults to `logs`. A relative directory, the default included, is resolved against the
    /// working directory of the process when the file is opened, not against the location of
    /// this library. Pass an absolute path to log to a fixed place.
    #[must_use]
    pub fn log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Sets the buffer size at which buffered records are written to the file.
    ///
    /// A capacity of zero writes every record through immediately.
    #[must_use]
    pub fn buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    /// The path of the log file.
    pub fn path(&self) -> PathBuf {
        self.log_dir.join(&self.filename)
    }
}

/// Overrides applied to the current [`FileOptions`] when a sink is redirected.
///
/// Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub filename: Option<String>,
    pub format: Option<Format>,
    pub log_dir: Option<PathBuf>,
}

impl Destination {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    /// Return `current` with these overrides applied.
    pub fn apply(&self, current: &FileOptions) -> FileOptions {
        FileOptions {
            filename: self
                .filename
                .clone()
                .unwrap_or_else(|| current.filename.clone()),
            format: self.format.unwrap_or(current.format),
            log_dir: self
                .log_dir
                .clone()
                .unwrap_or_else(|| current.log_dir.clone()),
            buffer_capacity: current.buffer_capacity,
        }
    }
}

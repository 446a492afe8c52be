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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::IgnoredAny;

use crate::Error;
use crate::Level;
use crate::error::ErrorHandler;
use crate::layout::Format;
use crate::logger::Logger;
use crate::sink::FileOptions;
use crate::sink::FileSink;

/// Construction options of a [`Logger`], as read from a configuration file.
///
/// `levels` is either a list of level names or a mapping from level name to severity. Names are
/// case-insensitive. Severities in a mapping are ignored, since each [`Level`] has a fixed one.
///
/// ```
/// use snaplog::Format;
/// use snaplog::Level;
/// use snaplog::LoggerConfig;
///
/// let config: LoggerConfig = serde_json::from_str(
///     r#"{
///         "levels": ["info", "error"],
///         "fileOptions": { "filename": "svc.log", "format": "readable" }
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.levels, vec![Level::Info, Level::Error]);
/// assert_eq!(config.file_options.format, Format::Readable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    /// The declared levels. Records of other levels are rejected.
    #[serde(deserialize_with = "deserialize_levels")]
    pub levels: Vec<Level>,
    /// The options of the file sink.
    pub file_options: FileOptions,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            levels: Level::DEFAULT_SET.to_vec(),
            file_options: FileOptions::default(),
        }
    }
}

fn deserialize_levels<'de, D>(deserializer: D) -> Result<Vec<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Levels {
        List(Vec<Level>),
        Map(BTreeMap<Level, IgnoredAny>),
    }

    Ok(match Levels::deserialize(deserializer)? {
        Levels::List(levels) => levels,
        Levels::Map(levels) => levels.into_keys().collect(),
    })
}

/// A builder for configuring a [`Logger`].
///
/// # Examples
///
/// ```no_run
/// use snaplog::Format;
/// use snaplog::Level;
/// use snaplog::Logger;
///
/// let logger = Logger::builder()
///     .levels(Level::ALL)
///     .filename("service.log")
///     .format(Format::Readable)
///     .log_dir("/var/log/service")
///     .build()
///     .unwrap();
/// ```
#[must_use = "call `build` to open the log file and create the logger"]
pub struct LoggerBuilder {
    config: LoggerConfig,
    error_handler: Option<ErrorHandler>,
}

impl std::fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::default())
    }

    /// Create a new builder starting from `config`.
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            error_handler: None,
        }
    }

    /// Set the declared levels.
    ///
    /// Defaults to [`Level::DEFAULT_SET`].
    pub fn levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self {
        self.config.levels = levels.into_iter().collect();
        self
    }

    /// Replace all file options.
    pub fn file_options(mut self, file_options: FileOptions) -> Self {
        self.config.file_options = file_options;
        self
    }

    /// Set the log file name.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.config.file_options = self.config.file_options.filename(filename);
        self
    }

    /// Set the serialization format.
    pub fn format(mut self, format: Format) -> Self {
        self.config.file_options = self.config.file_options.format(format);
        self
    }

    /// Set the log directory.
    pub fn log_dir(mut self, log_dir: impl Into<std::path::PathBuf>) -> Self {
        self.config.file_options = self.config.file_options.log_dir(log_dir);
        self
    }

    /// Set the buffer size at which buffered records are written to the file.
    pub fn buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.config.file_options = self.config.file_options.buffer_capacity(buffer_capacity);
        self
    }

    /// Set the handler of errors that cannot be returned to the caller, such as a failed flush
    /// while logging.
    ///
    /// Defaults to writing the error to stderr.
    pub fn error_handler(mut self, handler: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Open the log file and create the logger.
    ///
    /// # Errors
    ///
    /// Returns an error if no level is declared, if the log directory cannot be created or if
    /// the log file cannot be opened.
    pub fn build(self) -> Result<Logger, Error> {
        let LoggerBuilder {
            config,
            error_handler,
        } = self;

        let mut levels = config.levels;
        levels.sort();
        levels.dedup();
        if levels.is_empty() {
            return Err(Error::new("no log level declared"));
        }

        let sink = FileSink::new(config.file_options)?;
        let error_handler =
            error_handler.unwrap_or_else(|| Box::new(crate::error::report_to_stderr));
        Ok(Logger::new(levels, sink, error_handler))
    }
}

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

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

use crate::Error;
use crate::Level;
use crate::Record;
use crate::error::ErrorHandler;
use crate::filter::CustomFilter;
use crate::filter::Filter;
use crate::filter::FilterResult;
use crate::filter::MultiPatternFilter;
use crate::filter::PatternFilter;
use crate::logger::LoggerBuilder;
use crate::logger::LoggerConfig;
use crate::matcher::FailureCache;
use crate::matcher::PatternIndex;
use crate::registry::Registry;
use crate::sink::Destination;
use crate::sink::FileOptions;
use crate::sink::FileSink;
use crate::transform::Transformer;

/// A logger that normalizes, transforms and filters records before writing them to a file.
///
/// Every call runs to completion on the calling thread. To log from several threads, wrap the
/// logger in a [`SharedLogger`](crate::SharedLogger) or another mutex.
///
/// # Examples
///
/// ```no_run
/// use serde_json::json;
/// use snaplog::Logger;
///
/// let mut logger = Logger::builder().filename("app.log").build().unwrap();
/// logger.add_pattern_filter("no-heartbeat", "heartbeat", false);
///
/// assert!(logger.info("Connected", json!({"peer": "10.0.0.7"})));
/// assert!(!logger.info("heartbeat ok", ()));
/// ```
pub struct Logger {
    levels: Vec<Level>,
    sink: FileSink,
    transformers: Registry<Transformer>,
    filters: Registry<Filter>,
    failure_cache: FailureCache,
    pattern_index: PatternIndex,
    error_handler: ErrorHandler,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("levels", &self.levels)
            .field("sink", &self.sink)
            .field("transformers", &self.transformers)
            .field("filters", &self.filters)
            .field("failure_cache", &self.failure_cache)
            .field("pattern_index", &self.pattern_index)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub(super) fn new(levels: Vec<Level>, sink: FileSink, error_handler: ErrorHandler) -> Self {
        Self {
            levels,
            sink,
            transformers: Registry::default(),
            filters: Registry::default(),
            failure_cache: FailureCache::new(),
            pattern_index: PatternIndex::new(),
            error_handler,
        }
    }

    /// Create a new [`LoggerBuilder`].
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Create a logger from configuration options.
    pub fn from_config(config: LoggerConfig) -> Result<Logger, Error> {
        LoggerBuilder::from_config(config).build()
    }

    /// Log a record.
    ///
    /// `message` is either text or a structured value; `metadata` is either null (pass `()`) or a
    /// mapping whose fields are merged into the record.
    ///
    /// Returns `true` if the record was handed to the sink, `false` if the level is not declared,
    /// the metadata is not a mapping, a transformer removed the `level` field, a filter rejected
    /// the record or the write failed.
    pub fn log(
        &mut self,
        level: Level,
        message: impl Into<Value>,
        metadata: impl Into<Value>,
    ) -> bool {
        if !self.levels.contains(&level) {
            return false;
        }
        let Some(mut record) = Record::normalize(level, message.into(), metadata.into()) else {
            return false;
        };

        for transformer in self.transformers.values_mut() {
            transformer.apply(&mut record);
        }
        if record.level().is_none() {
            return false;
        }

        if !self.admit(&record) {
            return false;
        }

        match self.sink.write(&record) {
            Ok(()) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    fn admit(&self, record: &Record) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        let Some(text) = record.text() else {
            return true;
        };

        self.filters
            .values()
            .all(|filter| filter.matches(record, text) == FilterResult::Accept)
    }

    /// Register a transformer that runs on every record before filtering.
    ///
    /// Registering a name again replaces the transformer in place.
    pub fn add_transformer<F>(&mut self, name: impl Into<String>, transformer: F) -> &mut Self
    where
        F: FnMut(&mut Record) + Send + 'static,
    {
        self.transformers
            .insert(name, Transformer::new(transformer));
        self
    }

    /// Unregister a transformer. Returns whether it existed.
    pub fn remove_transformer(&mut self, name: &str) -> bool {
        self.transformers.remove(name).is_some()
    }

    /// Register a filter that searches the message for `pattern`.
    ///
    /// With `admit_on_match`, only records whose message contains `pattern` are written; without,
    /// only those whose message does not.
    pub fn add_pattern_filter(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        admit_on_match: bool,
    ) -> &mut Self {
        let filter = PatternFilter::new(pattern, admit_on_match, &mut self.failure_cache);
        self.filters.insert(name, filter.into());
        self
    }

    /// Register a filter that searches the message for any of `patterns`.
    pub fn add_multi_pattern_filter<I, S>(
        &mut self,
        name: impl Into<String>,
        patterns: I,
        admit_on_match: bool,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filter = MultiPatternFilter::new(patterns, admit_on_match);
        self.filters.insert(name, filter.into());
        self
    }

    /// Register a filter backed by a closure.
    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(&Record) -> FilterResult + Send + Sync + 'static,
    {
        self.filters.insert(name, CustomFilter::new(filter).into());
        self
    }

    /// Unregister a filter. Returns whether it existed.
    pub fn remove_filter(&mut self, name: &str) -> bool {
        self.filters.remove(name).is_some()
    }

    /// Redirect the sink, see [`FileSink::set_destination`].
    ///
    /// # Errors
    ///
    /// Returns an error if the new directory cannot be created or the new file cannot be opened;
    /// the logger then keeps writing to the current file. A failure to flush the current buffer
    /// is reported to the error handler and does not prevent the redirect.
    pub fn set_destination(&mut self, destination: Destination) -> Result<(), Error> {
        self.flush();
        self.sink.set_destination(&destination)
    }

    /// Hand an error that cannot be returned to the caller to the error handler.
    pub(crate) fn report(&self, err: &Error) {
        (self.error_handler)(err);
    }

    /// Write all buffered records to the file, reporting a failure to the error handler.
    pub fn flush(&mut self) {
        if let Err(err) = self.sink.flush() {
            self.report(&err);
        }
    }

    /// Flush and close the logger, returning the result of the final flush.
    pub fn close(mut self) -> Result<(), Error> {
        self.sink.flush()
    }

    /// Report whether `pattern` occurs in `text`, sharing the failure tables of pattern filters.
    pub fn match_single(&mut self, pattern: &str, text: &str) -> bool {
        self.failure_cache.search(pattern, text)
    }

    /// Report whether any of `patterns` occurs in `text`.
    ///
    /// Patterns accumulate in one trie across calls; it is relinked whenever a call brings new
    /// patterns.
    pub fn match_any<I, S>(&mut self, patterns: I, text: &str) -> bool
    where
        I: IntoIterator<Item = S> + Clone,
        S: AsRef<str>,
    {
        self.pattern_index.match_any(patterns, text)
    }

    /// The declared levels, from the least to the most severe.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The options of the current destination.
    pub fn destination(&self) -> &FileOptions {
        self.sink.options()
    }

    /// The path of the current log file.
    pub fn path(&self) -> PathBuf {
        self.sink.path()
    }

    /// The names of the registered transformers, in order.
    pub fn transformer_names(&self) -> impl Iterator<Item = &str> {
        self.transformers.names()
    }

    /// The names of the registered filters, in order.
    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.names()
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains(name)
    }

    pub fn failure_cache(&self) -> &FailureCache {
        &self.failure_cache
    }
}

macro_rules! level_methods {
    ($($(#[$attr:meta])* $name:ident => $level:ident),* $(,)?) => {
        impl Logger {
            $(
                $(#[$attr])*
                pub fn $name(&mut self, message: impl Into<Value>, metadata: impl Into<Value>) -> bool {
                    self.log(Level::$level, message, metadata)
                }
            )*
        }
    };
}

level_methods! {
    /// Log a record at [`Level::Debug`].
    debug => Debug,
    /// Log a record at [`Level::Info`].
    info => Info,
    /// Log a record at [`Level::Warn`].
    warn => Warn,
    /// Log a record at [`Level::Error`].
    error => Error,
    /// Log a record at [`Level::Critical`].
    critical => Critical,
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

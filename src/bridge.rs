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

//! Bridging the [`log`] crate into a [`SharedLogger`].

use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::SharedLogger;

/// The environment variable read by [`LogBridge::new`].
pub const DEFAULT_FILTER_ENV: &str = "RUST_LOG";

/// A [`log::Log`] implementation that forwards records of the `log` crate to a [`SharedLogger`].
///
/// Records are first matched against `env_logger`-style directives, then logged with their
/// formatted arguments as the message and their key-values plus `target` as metadata.
///
/// # Examples
///
/// ```no_run
/// use snaplog::LogBridge;
/// use snaplog::Logger;
/// use snaplog::SharedLogger;
///
/// let logger = SharedLogger::new(Logger::builder().build().unwrap());
/// LogBridge::new(logger.clone())
///     .with_filter("info,hyper=warn")
///     .unwrap()
///     .apply()
///     .unwrap();
///
/// log::info!(user = "alice"; "signed in");
/// ```
#[derive(Debug)]
pub struct LogBridge {
    logger: SharedLogger,
    filter: env_filter::Filter,
}

impl LogBridge {
    /// Create a bridge whose directives come from `RUST_LOG`, or that forwards everything if it
    /// is not set.
    pub fn new(logger: SharedLogger) -> Self {
        let mut builder = match std::env::var(DEFAULT_FILTER_ENV) {
            Ok(directives) => {
                let mut builder = env_filter::Builder::new();
                builder.parse(&directives);
                builder
            }
            Err(_) => {
                let mut builder = env_filter::Builder::new();
                builder.filter_level(log::LevelFilter::Trace);
                builder
            }
        };

        Self {
            logger,
            filter: builder.build(),
        }
    }

    /// Replace the directives, e.g. `"info,my_crate::db=debug"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directives cannot be parsed.
    pub fn with_filter(mut self, directives: &str) -> Result<Self, Error> {
        let mut builder = env_filter::Builder::new();
        builder.try_parse(directives).map_err(|err| {
            Error::new("failed to parse log directives")
                .with_context("directives", directives)
                .with_source(err)
        })?;
        self.filter = builder.build();
        Ok(self)
    }

    /// Install the bridge as the global logger of the `log` crate.
    ///
    /// # Errors
    ///
    /// An error is returned if the global logger has already been set.
    pub fn apply(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.filter.filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

struct KvCollector<'a> {
    kvs: &'a mut Map<String, Value>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KvCollector<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        let k = key.to_string();
        let v = value.to_string();
        self.kvs.insert(k, v.into());
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.filter.matches(record) {
            return;
        }

        let mut kvs = Map::new();
        kvs.insert("target".to_string(), record.target().into());
        let mut visitor = KvCollector { kvs: &mut kvs };
        let visited = record.key_values().visit(&mut visitor);

        let message = record.args().to_string();
        let mut logger = self.logger.lock();
        if let Err(err) = visited {
            // the record is still logged with the pairs collected so far
            let err = Error::new("failed to collect key-values of log record")
                .with_context("target", record.target())
                .with_context("reason", err);
            logger.report(&err);
        }
        logger.log(record.level().into(), message, Value::Object(kvs));
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

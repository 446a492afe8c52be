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

//! Snaplog is a structured logger that writes leveled records to a file.
//!
//! # Overview
//!
//! Each call to [`Logger::log`] goes through a fixed pipeline:
//!
//! 1. the level, message and metadata are normalized into a [`Record`];
//! 2. registered transformers run in order, mutating the record;
//! 3. if the message is text, registered filters run in order and the first rejection drops the
//!    record;
//! 4. the record is serialized with sorted keys into the buffer of a [`FileSink`].
//!
//! Filters can search the message for one pattern, using a memoized prefix-function table, or
//! for several patterns at once, using an Aho-Corasick trie. Both matchers are also available on
//! their own in [`matcher`].
//!
//! # Examples
//!
//! ```no_run
//! use serde_json::json;
//! use snaplog::Destination;
//! use snaplog::Format;
//! use snaplog::Logger;
//! use snaplog::transform;
//!
//! let mut logger = Logger::builder()
//!     .log_dir("logs")
//!     .filename("app.log")
//!     .build()
//!     .unwrap();
//!
//! logger
//!     .add_transformer("timestamp", transform::timestamp())
//!     .add_multi_pattern_filter("crit", ["timeout", "failed", "panic"], true);
//!
//! logger.error("panic: oom", json!({"host": "server-01"})); // written
//! logger.info("all good", ()); // dropped
//!
//! // switch to a readable file; buffered records stay in app.log
//! logger
//!     .set_destination(Destination::new().filename("app.txt").format(Format::Readable))
//!     .unwrap();
//!
//! logger.close().unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod filter;
pub mod layout;
pub mod matcher;
pub mod sink;
pub mod transform;

#[cfg(feature = "bridge-log")]
mod bridge;
mod error;
mod level;
mod logger;
mod record;
mod registry;

#[cfg(feature = "bridge-log")]
pub use bridge::DEFAULT_FILTER_ENV;
#[cfg(feature = "bridge-log")]
pub use bridge::LogBridge;
pub use error::Error;
pub use error::ErrorHandler;
pub use error::report_to_stderr;
pub use filter::FilterResult;
pub use layout::Format;
pub use level::Level;
pub use level::ParseLevelError;
pub use logger::Logger;
pub use logger::LoggerBuilder;
pub use logger::LoggerConfig;
pub use logger::SharedLogger;
pub use record::Record;
pub use sink::Destination;
pub use sink::FileOptions;
pub use sink::FileSink;

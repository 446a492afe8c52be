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

//! Record transformers.
//!
//! A transformer mutates a record in place before filters run. Transformers are registered by
//! name on the [`Logger`](crate::Logger) and run in registration order.

use std::fmt;

use jiff::Timestamp;
use serde_json::Map;
use serde_json::Value;

use crate::Record;
use crate::record::TIMESTAMP;

pub(crate) struct Transformer {
    f: Box<dyn FnMut(&mut Record) + Send + 'static>,
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transformer {{ ... }}")
    }
}

impl Transformer {
    pub(crate) fn new(f: impl FnMut(&mut Record) + Send + 'static) -> Self {
        Transformer { f: Box::new(f) }
    }

    pub(crate) fn apply(&mut self, record: &mut Record) {
        (self.f)(record)
    }
}

/// A transformer that stamps each record with the current UTC time, in RFC 3339 with
/// millisecond precision, unless it already has a `timestamp` field.
///
/// # Examples
///
/// ```no_run
/// use snaplog::Logger;
/// use snaplog::transform;
///
/// let mut logger = Logger::builder().build().unwrap();
/// logger.add_transformer("timestamp", transform::timestamp());
/// ```
pub fn timestamp() -> impl FnMut(&mut Record) + Send + 'static {
    |record: &mut Record| {
        if !record.contains_key(TIMESTAMP) {
            record.insert(TIMESTAMP, format!("{:.3}", Timestamp::now()));
        }
    }
}

/// A transformer that adds constant fields, such as a service or host name, to each record.
///
/// Fields already present on the record are left alone.
pub fn static_fields(fields: Map<String, Value>) -> impl FnMut(&mut Record) + Send + 'static {
    move |record: &mut Record| {
        for (key, value) in &fields {
            if !record.contains_key(key) {
                record.insert(key.clone(), value.clone());
            }
        }
    }
}

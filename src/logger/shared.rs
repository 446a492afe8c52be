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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use serde_json::Value;

use crate::Level;
use crate::Logger;

/// A logger behind a mutex, cheap to clone and safe to share across threads.
///
/// Records from concurrent callers are written in the order they acquire the lock.
#[derive(Debug, Clone)]
pub struct SharedLogger {
    inner: Arc<Mutex<Logger>>,
}

impl SharedLogger {
    pub fn new(logger: Logger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(logger)),
        }
    }

    /// Lock the logger for a sequence of calls, e.g. to register filters.
    ///
    /// A panic in a transformer or filter does not leave the logger unusable.
    pub fn lock(&self) -> MutexGuard<'_, Logger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log a record, see [`Logger::log`].
    pub fn log(&self, level: Level, message: impl Into<Value>, metadata: impl Into<Value>) -> bool {
        self.lock().log(level, message, metadata)
    }

    /// Write all buffered records to the file.
    pub fn flush(&self) {
        self.lock().flush();
    }
}

impl From<Logger> for SharedLogger {
    fn from(logger: Logger) -> Self {
        SharedLogger::new(logger)
    }
}

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

use std::fmt::Write;

use jiff::Timestamp;
use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::Record;
use crate::layout::Layout;
use crate::record::TIMESTAMP;

/// A layout that writes each record as a human-readable line.
///
/// The timestamp is taken from the record's `timestamp` field when present, otherwise it is the
/// current UTC time. Metadata, if any, follows the message as a JSON object.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172Z [error] Database connection failed {"traceId":"abc123"}
/// 2024-08-11T22:44:57.172Z [info] Service started successfully
/// ```
#[derive(Default, Debug, Clone)]
#[non_exhaustive]
pub struct TextLayout {}

impl TextLayout {
    pub(crate) fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut text = String::new();

        match record.get(TIMESTAMP) {
            Some(Value::String(time)) => text.push_str(time),
            Some(time) => write!(&mut text, "{time}").map_err(Error::from_fmt_error)?,
            None => write!(&mut text, "{:.3}", Timestamp::now()).map_err(Error::from_fmt_error)?,
        }

        let level = record.level().unwrap_or_default();
        write!(&mut text, " [{level}] ").map_err(Error::from_fmt_error)?;

        match record.message() {
            Some(Value::String(message)) => text.push_str(message),
            Some(message) => text.push_str(&serde_json::to_string(message)?),
            None => {}
        }

        let metadata = record
            .metadata()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Map<_, _>>();
        if !metadata.is_empty() {
            text.push(' ');
            text.push_str(&serde_json::to_string(&metadata)?);
        }

        Ok(text.into_bytes())
    }
}

impl From<TextLayout> for Layout {
    fn from(layout: TextLayout) -> Self {
        Layout::Text(layout)
    }
}

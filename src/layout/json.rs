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

use crate::Error;
use crate::Record;
use crate::layout::Layout;

/// A layout that writes each record as a single-line JSON object.
///
/// Top-level keys come out in lexicographic order, so equal records always produce equal lines.
///
/// Output format:
///
/// ```json
/// {"level":"error","message":"Database connection failed","traceId":"abc123"}
/// ```
#[derive(Default, Debug, Clone)]
#[non_exhaustive]
pub struct JsonLayout {}

impl JsonLayout {
    pub(crate) fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(record)?)
    }
}

impl From<JsonLayout> for Layout {
    fn from(layout: JsonLayout) -> Self {
        Layout::Json(layout)
    }
}

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

//! Serialization of records into output lines.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Record;

pub use self::json::JsonLayout;
pub use self::text::TextLayout;

mod json;
mod text;

/// The serialization format of a file sink.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One JSON object per line, keys in lexicographic order.
    #[default]
    #[serde(alias = "json")]
    Structured,
    /// `<timestamp> [<level>] <message> <metadata>` per line.
    #[serde(alias = "text")]
    Readable,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Structured => "structured",
            Format::Readable => "readable",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for (name, format) in [
            ("structured", Format::Structured),
            ("json", Format::Structured),
            ("readable", Format::Readable),
            ("text", Format::Readable),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(format);
            }
        }

        Err(Error::new("malformed log format").with_context("format", s))
    }
}

/// A layout turns a record into the bytes of one output line, without the trailing newline.
#[derive(Debug, Clone)]
pub enum Layout {
    Json(JsonLayout),
    Text(TextLayout),
}

impl Layout {
    pub fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        match self {
            Layout::Json(layout) => layout.format(record),
            Layout::Text(layout) => layout.format(record),
        }
    }
}

impl From<Format> for Layout {
    fn from(format: Format) -> Self {
        match format {
            Format::Structured => JsonLayout::default().into(),
            Format::Readable => TextLayout::default().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("structured".parse::<Format>().unwrap(), Format::Structured);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Structured);
        assert_eq!("Readable".parse::<Format>().unwrap(), Format::Readable);
        assert_eq!("text".parse::<Format>().unwrap(), Format::Readable);

        let err = "xml".parse::<Format>().unwrap_err();
        assert_eq!(err.context("format"), Some("xml"));
    }

    #[test]
    fn test_deserialize_format_aliases() {
        let format: Format = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, Format::Structured);
        let format: Format = serde_json::from_str(r#""readable""#).unwrap();
        assert_eq!(format, Format::Readable);
    }
}

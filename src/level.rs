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

//! Severity levels.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de;

/// An enum representing the available severity levels of the logger.
///
/// The numeric value is the severity; larger is more severe.
#[repr(usize)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// The "debug" level.
    ///
    /// Designates lower priority information.
    Debug = 100,
    /// The "info" level.
    ///
    /// Designates useful information.
    Info = 200,
    /// The "warn" level.
    ///
    /// Designates hazardous situations.
    Warn = 300,
    /// The "error" level.
    ///
    /// Designates very serious errors.
    Error = 400,
    /// The "critical" level.
    ///
    /// Designates failures the service cannot recover from on its own.
    Critical = 500,
}

impl Level {
    /// All levels, from the least to the most severe.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Critical,
    ];

    /// The level set a logger declares when none is configured.
    pub const DEFAULT_SET: [Level; 4] = [Level::Info, Level::Warn, Level::Error, Level::Critical];

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Return the lower-cased name written into the `level` field of a record.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Critical => "critical",
        }
    }

    /// Return the numeric severity.
    pub fn severity(&self) -> usize {
        *self as usize
    }
}

#[cfg(feature = "bridge-log")]
impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug | log::Level::Trace => Self::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The type returned by `from_str` when the string doesn't match any of the log levels.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseLevelError {}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str("malformed log level")
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in Level::ALL {
            if s.eq_ignore_ascii_case(level.name()) {
                return Ok(level);
            }
        }

        Err(ParseLevelError {})
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&name), &"a log level name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("INFO".parse::<Level>(), Ok(Level::Info));
        assert_eq!("Critical".parse::<Level>(), Ok(Level::Critical));
        assert_eq!("warn".parse::<Level>(), Ok(Level::Warn));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_severity_order() {
        let mut levels = Level::ALL;
        levels.reverse();
        levels.sort();
        assert_eq!(levels, Level::ALL);
        assert!(Level::Critical.severity() > Level::Error.severity());
    }

    #[test]
    fn test_serde_uses_lower_case_names() {
        let json = serde_json::to_string(&Level::Warn).unwrap();
        assert_eq!(json, r#""warn""#);
        let level: Level = serde_json::from_str(r#""critical""#).unwrap();
        assert_eq!(level, Level::Critical);
    }

    #[test]
    fn test_deserialize_is_case_insensitive() {
        let levels: Vec<Level> = serde_json::from_str(r#"["INFO", "Warn", "error"]"#).unwrap();
        assert_eq!(levels, vec![Level::Info, Level::Warn, Level::Error]);

        let err = serde_json::from_str::<Level>(r#""verbose""#).unwrap_err();
        assert!(err.to_string().contains("a log level name"), "{err}");
    }
}

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

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use serde_json::Value;
use serde_json::json;
use snaplog::Destination;
use snaplog::FilterResult;
use snaplog::Format;
use snaplog::Level;
use snaplog::Logger;
use snaplog::LoggerConfig;
use snaplog::Record;
use tempfile::TempDir;

fn logger(dir: &TempDir) -> Logger {
    Logger::builder()
        .log_dir(dir.path().join("logs"))
        .filename("test.log")
        .build()
        .unwrap()
}

fn lines(path: impl AsRef<Path>) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn written(logger: &mut Logger) -> Vec<Value> {
    logger.flush();
    lines(logger.path())
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_log_writes_level_message_and_metadata() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);

    assert!(logger.log(Level::Info, "Simple message", ()));
    assert!(logger.error("Error occurred", json!({"traceId": "abc123"})));

    logger.flush();
    assert_eq!(
        lines(logger.path()),
        vec![
            r#"{"level":"info","message":"Simple message"}"#,
            r#"{"level":"error","message":"Error occurred","traceId":"abc123"}"#,
        ]
    );
}

#[test]
fn test_structured_and_null_messages() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);

    assert!(logger.info(json!({"message": "Object message", "custom": "data"}), ()));
    assert!(logger.info(Value::Null, ()));

    assert_eq!(
        written(&mut logger),
        vec![
            json!({"level": "info", "message": {"custom": "data", "message": "Object message"}}),
            json!({"level": "info", "message": null}),
        ]
    );
}

#[test]
fn test_invalid_input_is_rejected_without_side_effects() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);

    // debug is not in the default level set
    assert!(!logger.debug("verbose", ()));
    assert!(!logger.info("bad metadata", json!(["not", "a", "mapping"])));
    assert!(!logger.info("bad metadata", json!(42)));
    assert!(written(&mut logger).is_empty());
}

#[test]
fn test_declared_levels_enable_convenience_methods() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = Logger::builder()
        .levels(Level::ALL)
        .log_dir(dir.path())
        .build()
        .unwrap();

    assert!(logger.debug("d", ()));
    assert!(logger.info("i", ()));
    assert!(logger.warn("w", ()));
    assert!(logger.error("e", ()));
    assert!(logger.critical("c", ()));

    let levels = written(&mut logger)
        .into_iter()
        .map(|record| record["level"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(levels, vec!["debug", "info", "warn", "error", "critical"]);
}

#[test]
fn test_exclude_pattern_filter() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    logger.add_pattern_filter("no-error", "error", false);

    assert!(logger.info("Connected", ()));
    assert!(!logger.info("error: timeout", ()));
    assert_eq!(written(&mut logger).len(), 1);
}

#[test]
fn test_allow_pattern_filter_is_case_sensitive() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    logger.add_pattern_filter("only-errors", "Error", true);

    assert!(!logger.info("Success message", ()));
    assert!(logger.error("Error message", ()));
    assert!(!logger.error("error message", ()));
}

#[test]
fn test_multi_pattern_filter() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    logger.add_multi_pattern_filter("crit", ["timeout", "failed", "panic"], true);

    assert!(logger.critical("panic: oom", ()));
    assert!(!logger.info("all good", ()));
    assert!(logger.error("Database connection failed", ()));

    let messages = written(&mut logger)
        .into_iter()
        .map(|record| record["message"].clone())
        .collect::<Vec<_>>();
    assert_eq!(messages, vec![json!("panic: oom"), json!("Database connection failed")]);
}

#[test]
fn test_filters_compose_and_short_circuit() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    logger
        .add_pattern_filter("no-errors", "Error", false)
        .add_pattern_filter("only-success", "Success", true)
        .add_filter("count", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            FilterResult::Accept
        });

    assert!(logger.info("Success message", ()));
    assert!(!logger.error("Error message", ()));
    assert!(!logger.info("Neutral message", ()));

    // only the admitted record reached the last filter
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(written(&mut logger).len(), 1);
}

#[test]
fn test_remove_filter() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    logger.add_pattern_filter("no-errors", "Error", false);

    assert!(!logger.error("Error message", ()));
    assert!(logger.remove_filter("no-errors"));
    assert!(!logger.remove_filter("no-errors"));
    assert!(logger.error("Error message", ()));
}

#[test]
fn test_structured_messages_bypass_filters() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    logger
        .add_pattern_filter("only-success", "Success", true)
        .add_filter("reject-all", |_| FilterResult::Reject);

    assert!(logger.info(json!({"event": "login"}), ()));
    assert!(!logger.info("Success", ()));
}

#[test]
fn test_transformers_run_in_order_before_filters() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let first = seen.clone();
    let second = seen.clone();
    logger
        .add_transformer("uppercase", move |record: &mut Record| {
            first.lock().unwrap().push("uppercase");
            if let Some(Value::String(message)) = record.get_mut("message") {
                *message = message.to_uppercase();
            }
        })
        .add_transformer("tag", move |record: &mut Record| {
            second.lock().unwrap().push("tag");
            record.insert("service", "auth-service");
        })
        .add_pattern_filter("no-lowercase", "process", false);

    assert!(logger.info("Process this", ()));
    assert_eq!(*seen.lock().unwrap(), vec!["uppercase", "tag"]);
    assert_eq!(
        logger.transformer_names().collect::<Vec<_>>(),
        vec!["uppercase", "tag"]
    );

    assert!(logger.remove_transformer("uppercase"));
    assert!(!logger.info("process that", ()));

    assert_eq!(
        written(&mut logger),
        vec![json!({"level": "info", "message": "PROCESS THIS", "service": "auth-service"})]
    );
}

#[test]
fn test_transformer_dropping_level_invalidates_record() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    logger.add_transformer("strip", |record: &mut Record| {
        record.remove("level");
    });

    assert!(!logger.info("no level", ()));
    assert!(written(&mut logger).is_empty());
}

#[test]
fn test_records_keep_call_order_and_sorted_keys() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = Logger::builder()
        .log_dir(dir.path())
        .filename("order.log")
        .buffer_capacity(256)
        .build()
        .unwrap();

    for seq in 0..100 {
        let metadata = json!({"zeta": true, "seq": seq, "alpha": 1});
        assert!(logger.info(format!("record {seq}"), metadata));
    }
    logger.flush();

    let lines = lines(logger.path());
    assert_eq!(lines.len(), 100);
    for (seq, line) in lines.iter().enumerate() {
        assert_eq!(
            line,
            &format!(
                r#"{{"alpha":1,"level":"info","message":"record {seq}","seq":{seq},"zeta":true}}"#
            )
        );
    }
}

#[test]
fn test_set_destination_separates_old_and_new_records() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    let old = logger.path();

    assert!(logger.info("before", ()));
    logger
        .set_destination(
            Destination::new()
                .filename("new.log")
                .format(Format::Readable)
                .log_dir(dir.path().join("new")),
        )
        .unwrap();
    assert_eq!(logger.destination().format, Format::Readable);
    assert!(logger.warn("after", json!({"timestamp": "2024-08-11T22:44:57.172Z", "disk": "sda"})));
    let new = logger.path();
    logger.close().unwrap();

    assert_eq!(lines(&old), vec![r#"{"level":"info","message":"before"}"#]);
    assert_eq!(
        lines(&new),
        vec![r#"2024-08-11T22:44:57.172Z [warn] after {"disk":"sda"}"#]
    );
}

#[test]
fn test_failed_set_destination_is_reported_and_keeps_logging() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let err = logger
        .set_destination(Destination::new().log_dir(blocker.join("nested")))
        .unwrap_err();
    assert_eq!(err.message(), "failed to create log directory");

    assert!(logger.info("still here", ()));
    assert_eq!(written(&mut logger).len(), 1);
}

#[test]
fn test_drop_flushes_buffer() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = {
        let mut logger = logger(&dir);
        assert!(logger.info("buffered", ()));
        logger.path()
    };
    assert_eq!(lines(path), vec![r#"{"level":"info","message":"buffered"}"#]);
}

#[test]
fn test_from_config() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let config = json!({
        "levels": ["warn", "error"],
        "fileOptions": {
            "filename": "configured.log",
            "format": "readable",
            "logDir": dir.path().join("configured"),
        }
    });
    let config: LoggerConfig = serde_json::from_value(config).unwrap();
    let mut logger = Logger::from_config(config).unwrap();

    assert!(!logger.info("not declared", ()));
    assert!(logger.warn("declared", json!({"timestamp": "T"})));
    logger.flush();
    assert_eq!(lines(dir.path().join("configured").join("configured.log")), vec!["T [warn] declared"]);
}

#[test]
fn test_pattern_utilities() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);

    assert!(logger.match_single("test", "This is a test string"));
    assert!(!logger.match_single("xyz", "This is a test string"));
    assert!(!logger.match_single("test", "TEST uppercase"));
    assert!(!logger.match_single("", "Non-empty"));
    assert!(!logger.match_single("test", ""));

    assert!(logger.match_any(["she", "hers"], "ushers"));
    assert!(!logger.match_any(["his"], "ushers"));
    assert!(logger.match_any(["timeout", "failed", "panic"], "panic: oom"));
    assert!(!logger.match_any(Vec::<String>::new(), "anything"));
}

#[test]
fn test_pattern_filters_share_failure_tables() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let mut logger = logger(&dir);
    logger
        .add_pattern_filter("a", "error", false)
        .add_pattern_filter("b", "error", false);
    assert!(logger.match_single("error", "an error"));
    assert_eq!(logger.failure_cache().len(), 1);
}

#[cfg(target_os = "linux")]
#[test]
fn test_write_failure_goes_to_error_handler() {
    if !Path::new("/dev/full").exists() {
        return;
    }

    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let Ok(mut logger) = Logger::builder()
        .log_dir("/dev")
        .filename("full")
        .buffer_capacity(0)
        .error_handler(move |err| sink.lock().unwrap().push(err.message().to_string()))
        .build()
    else {
        return;
    };

    assert!(!logger.error("disk full", ()));
    assert!(!logger.error("still full", ()));
    assert_eq!(
        *errors.lock().unwrap(),
        vec!["failed to flush log buffer", "failed to flush log buffer"]
    );
    // the failed bytes were dropped, nothing is left to fail on close
    logger.close().unwrap();
}

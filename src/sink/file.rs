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
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;

use crate::Error;
use crate::Record;
use crate::error::report_to_stderr;
use crate::layout::Format;
use crate::layout::Layout;
use crate::sink::Destination;
use crate::sink::FileOptions;

/// A file sink that buffers serialized records in memory.
///
/// Records are appended to the buffer and written to the file once the buffer reaches
/// [`FileOptions::buffer_capacity`]. The buffer is also written out before the sink is redirected
/// with [`FileSink::set_destination`], on [`FileSink::close`] and when the sink is dropped.
///
/// A failed write drops whatever part of the buffer was not yet written and reports it in the
/// returned error. Bytes that reached the file are never written again.
#[derive(Debug)]
pub struct FileSink {
    options: FileOptions,
    layout: Layout,
    file: File,
    buffer: Vec<u8>,
}

impl FileSink {
    /// Open the sink, creating the log directory if missing and opening the file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot be opened.
    pub fn new(options: FileOptions) -> Result<FileSink, Error> {
        let file = open(&options)?;
        Ok(FileSink {
            layout: Layout::from(options.format),
            buffer: Vec::with_capacity(options.buffer_capacity),
            options,
            file,
        })
    }

    /// Serialize `record` into the buffer, flushing if the buffer is full.
    pub fn write(&mut self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        self.buffer.extend_from_slice(&bytes);

        if self.buffer.len() >= self.options.buffer_capacity {
            self.flush()?;
        }
        Ok(())
    }

    /// Write the buffer to the file.
    ///
    /// Does nothing if the buffer is empty.
    pub fn flush(&mut self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let mut written = 0;
        let result = loop {
            if written == self.buffer.len() {
                break self.file.flush();
            }
            match self.file.write(&self.buffer[written..]) {
                Ok(0) => break Err(io::Error::from(io::ErrorKind::WriteZero)),
                Ok(n) => written += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => break Err(err),
            }
        };

        let dropped = self.buffer.len() - written;
        self.buffer.clear();
        result.map_err(|err| {
            Error::new("failed to flush log buffer")
                .with_context("path", self.path().display())
                .with_context("dropped_bytes", dropped)
                .with_source(err)
        })
    }

    /// Redirect the sink, applying `destination` over the current options.
    ///
    /// The buffer is flushed to the current file first. The new file is opened before the current
    /// one is closed, so on error the sink keeps writing where it did before.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails, or if the new directory cannot be created or the new
    /// file cannot be opened.
    pub fn set_destination(&mut self, destination: &Destination) -> Result<(), Error> {
        self.flush()?;

        let options = destination.apply(&self.options);
        let file = open(&options)?;

        // closes the previous file
        self.file = file;
        self.layout = Layout::from(options.format);
        self.options = options;
        Ok(())
    }

    /// Flush and close the sink.
    pub fn close(mut self) -> Result<(), Error> {
        self.flush()
    }

    /// The current options.
    pub fn options(&self) -> &FileOptions {
        &self.options
    }

    /// The serialization format of the current destination.
    pub fn format(&self) -> Format {
        self.options.format
    }

    /// The path of the current file.
    pub fn path(&self) -> std::path::PathBuf {
        self.options.path()
    }

    /// The number of bytes waiting in the buffer.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            report_to_stderr(&err);
        }
    }
}

fn open(options: &FileOptions) -> Result<File, Error> {
    create_dir(&options.log_dir)?;

    let path = options.path();
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .map_err(|err| {
            Error::new("failed to open log file")
                .with_context("path", path.display())
                .with_source(err)
        })
}

fn create_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|err| {
        Error::new("failed to create log directory")
            .with_context("dir", dir.display())
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::Level;

    fn options(dir: &TempDir) -> FileOptions {
        FileOptions::default()
            .log_dir(dir.path().join("logs"))
            .filename("test.log")
    }

    fn read(path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let sink = FileSink::new(options(&dir)).unwrap();
        assert!(dir.path().join("logs").is_dir());
        assert!(sink.path().is_file());
    }

    #[test]
    fn test_buffers_until_capacity() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let mut sink = FileSink::new(options(&dir).buffer_capacity(64)).unwrap();

        sink.write(&Record::new(Level::Info, "short")).unwrap();
        assert!(sink.buffered_len() > 0);
        assert_eq!(read(sink.path()), "");

        sink.write(&Record::new(Level::Info, "a message long enough to cross the capacity"))
            .unwrap();
        assert_eq!(sink.buffered_len(), 0);
        let content = read(sink.path());
        assert_eq!(content.lines().count(), 2);
        assert_eq!(
            content.lines().next(),
            Some(r#"{"level":"info","message":"short"}"#)
        );
    }

    #[test]
    fn test_flush_is_idempotent() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let mut sink = FileSink::new(options(&dir)).unwrap();
        sink.write(&Record::new(Level::Warn, "once")).unwrap();

        sink.flush().unwrap();
        let first = read(sink.path());
        sink.flush().unwrap();
        assert_eq!(read(sink.path()), first);
        assert_eq!(first.lines().count(), 1);
    }

    #[test]
    fn test_set_destination_flushes_to_old_file() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let mut sink = FileSink::new(options(&dir)).unwrap();
        let old = sink.path();

        sink.write(&Record::new(Level::Info, "before")).unwrap();
        sink.set_destination(
            &Destination::new()
                .filename("new.log")
                .format(Format::Readable)
                .log_dir(dir.path().join("new")),
        )
        .unwrap();
        sink.write(&Record::new(Level::Info, "after").with_field("timestamp", "T"))
            .unwrap();
        let new = sink.path();
        sink.close().unwrap();

        assert_eq!(read(&old), "{\"level\":\"info\",\"message\":\"before\"}\n");
        assert_eq!(read(&new), "T [info] after\n");
    }

    #[test]
    fn test_failed_redirect_keeps_current_file() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let mut sink = FileSink::new(options(&dir)).unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = sink
            .set_destination(&Destination::new().log_dir(blocker.join("logs")))
            .unwrap_err();
        assert_eq!(err.message(), "failed to create log directory");

        sink.write(&Record::new(Level::Info, json!({"still": "here"})))
            .unwrap();
        let path = sink.path();
        drop(sink);
        assert_eq!(
            read(path),
            "{\"level\":\"info\",\"message\":{\"still\":\"here\"}}\n"
        );
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        for message in ["first", "second"] {
            let mut sink = FileSink::new(options(&dir)).unwrap();
            sink.write(&Record::new(Level::Info, message)).unwrap();
        }
        let content = read(dir.path().join("logs").join("test.log"));
        assert_eq!(content.lines().count(), 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_flush_failure_drops_buffer() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }

        let options = FileOptions::default().log_dir("/dev").filename("full");
        let Ok(mut sink) = FileSink::new(options) else {
            return;
        };
        sink.write(&Record::new(Level::Error, "disk full")).unwrap();

        let err = sink.flush().unwrap_err();
        assert_eq!(err.message(), "failed to flush log buffer");
        assert_eq!(sink.buffered_len(), 0);
        // nothing left to write, so nothing fails again
        sink.flush().unwrap();
    }
}

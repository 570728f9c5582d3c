// ABOUTME: JSON writer for the episode payload.
// ABOUTME: Pretty-prints with 2-space indent, escapes non-ASCII, and replaces the target file atomically.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use tempfile::NamedTempFile;

use crate::error::OutputError;
use crate::models::Payload;

/// Serializes the payload as pretty JSON with ASCII-only output and a trailing newline.
pub fn to_json_string(payload: &Payload) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::new());
    payload.serialize(&mut ser)?;
    buf.push(b'\n');
    // The formatter only ever emits ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes the payload to `path`, creating parent directories as needed.
///
/// Content goes to a temporary file next to the target and is renamed into
/// place once fully written, so a failed write leaves any previous file intact.
pub fn write_payload(path: &Path, payload: &Payload) -> Result<(), OutputError> {
    let json = to_json_string(payload)?;

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| OutputError::io("create directory", dir, e))?;
            dir
        }
        _ => Path::new("."),
    };

    let mut tmp = temp_file_in(parent).map_err(|e| OutputError::io("create temp file in", parent, e))?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| OutputError::io("set permissions on", tmp.path(), e))?;
    }
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| OutputError::io("write", tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| OutputError::io("replace", path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "wrote payload");
    Ok(())
}

/// Creates the temp file with the permissions a plain create would get.
/// tempfile defaults to owner-only; on unix 0o666 is narrowed by the umask.
#[cfg_attr(not(unix), allow(unused_mut))]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Reads a payload previously written by `write_payload`.
pub fn read_payload(path: &Path) -> Result<Payload, OutputError> {
    let data = fs::read(path).map_err(|e| OutputError::io("read", path, e))?;
    Ok(serde_json::from_slice(&data)?)
}

/// serde_json pretty formatter that escapes every non-ASCII character as `\uXXXX`.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object_value(writer)
    }
}

//! JSON output files and the console summary

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Serializer, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"  ";

/// Preview limits for summary rows
const MAX_LIST_ITEMS: usize = 8;
const MAX_STRING_CHARS: usize = 80;
const MAX_LINE_CHARS: usize = 200;

/// Pretty formatter that writes non-ASCII characters as `\uXXXX` escapes
pub struct AsciiFormatter {
    inner: PrettyFormatter<'static>,
}

impl AsciiFormatter {
    pub fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(INDENT),
        }
    }
}

impl Default for AsciiFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize with a two-space indent, optionally ASCII-escaped
pub fn to_json<T: Serialize + ?Sized>(value: &T, ascii: bool) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    if ascii {
        let mut ser = Serializer::with_formatter(&mut out, AsciiFormatter::new());
        value.serialize(&mut ser)?;
    } else {
        let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
        value.serialize(&mut ser)?;
    }
    Ok(out)
}

/// Writes output files into one directory
#[derive(Debug, Clone)]
pub struct JsonWriter {
    dir: PathBuf,
    ascii: bool,
}

impl JsonWriter {
    pub fn new(dir: &Path, ascii: bool) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            ascii,
        })
    }

    /// Write `value` to `file_name`, returning the path and byte size
    pub fn write<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<(PathBuf, u64)> {
        let path = self.dir.join(file_name);
        let bytes = to_json(value, self.ascii)
            .with_context(|| format!("Failed to serialize {file_name}"))?;
        fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok((path, bytes.len() as u64))
    }
}

/// `1234567` → `"1,234,567"`
pub fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `File size: 1,234 bytes  (1.2 KB)`
pub fn size_line(size: u64) -> String {
    format!(
        "File size: {} bytes  ({:.1} KB)",
        with_commas(size),
        size as f64 / 1024.0
    )
}

/// Shorten long lists and strings in one row for display
fn shorten(row: &Value) -> Value {
    match row {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let short = match value {
                        Value::Array(items) if items.len() > MAX_LIST_ITEMS => {
                            let mut head = items[..MAX_LIST_ITEMS].to_vec();
                            head.push(Value::from("..."));
                            Value::Array(head)
                        }
                        Value::String(text) if text.chars().count() > MAX_STRING_CHARS => {
                            let head: String = text.chars().take(MAX_STRING_CHARS).collect();
                            Value::from(format!("{head}..."))
                        }
                        other => other.clone(),
                    };
                    (key.clone(), short)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// One-line preview of a record, cut to a fixed width
pub fn preview(row: &Value) -> String {
    let line = serde_json::to_string(&shorten(row)).unwrap_or_default();
    line.chars().take(MAX_LINE_CHARS).collect()
}

/// Summary block for a list-shaped output file
pub fn print_list_summary(label: &str, rows: &[Value], path: &Path, size: u64) {
    println!("\n{}", "=".repeat(60));
    println!("  {label}");
    println!("  Rows: {}  |  {}", rows.len(), size_line(size));
    println!("  Path: {}", path.display());
    println!("  First 3 rows (truncated):");
    for (i, row) in rows.iter().take(3).enumerate() {
        println!("    [{i}] {}", preview(row));
    }
}

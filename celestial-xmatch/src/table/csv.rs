//! Delimited-text reading and writing for [`Table`].
//!
//! The reader takes a header row, skips comment lines (`#` by default) and
//! blank lines, and understands double-quoted fields with `""` escapes and
//! embedded newlines. In a single-column file a blank line is a row holding
//! one null. Column types are either declared through
//! [`CsvOptions::with_column_type`] or inferred once over the whole file:
//!
//! | Every non-empty cell | Inferred type |
//! |----------------------|---------------|
//! | is unquoted and parses as `i64` | [`ColumnType::Int`] |
//! | is unquoted and parses as `f64` | [`ColumnType::Float`] |
//! | anything else | [`ColumnType::Text`] |
//!
//! The writer quotes any field containing the delimiter, a double quote, CR or
//! LF, fields starting with the comment prefix, and text that would otherwise
//! read back as a number. Floats always carry a decimal point or exponent.
//! Reading back a table written with the same [`CsvOptions`] yields an equal
//! table, and output for a given table is byte-for-byte stable.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use super::{Column, ColumnType, Schema, Table, Value};
use crate::errors::{XMatchError, XMatchResult};

/// Reader and writer configuration.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field separator.
    pub delimiter: char,
    /// Lines starting with this character are skipped on read and quoted on
    /// write.
    pub comment_prefix: Option<char>,
    /// Declared column types; columns not listed are inferred.
    pub column_types: Vec<(String, ColumnType)>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            comment_prefix: Some('#'),
            column_types: Vec::new(),
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_comment_prefix(mut self, prefix: Option<char>) -> Self {
        self.comment_prefix = prefix;
        self
    }

    pub fn with_column_type(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.column_types.push((name.into(), ty));
        self
    }
}

struct RawField {
    text: String,
    quoted: bool,
}

struct RawRecord {
    line: usize,
    fields: Vec<RawField>,
    blank: bool,
}

/// Read a table from any byte source.
///
/// # Errors
/// - [`XMatchError::Parse`] for a missing header, an unterminated quote, or a
///   row with the wrong number of fields
/// - [`XMatchError::Schema`] for a cell that violates a declared column type
/// - [`XMatchError::ColumnCollision`] for duplicate header names
/// - [`XMatchError::InvalidParameter`] for a bad delimiter or a declared type
///   naming a column absent from the header
pub fn read_table<R: Read>(mut reader: R, options: &CsvOptions) -> XMatchResult<Table> {
    validate_delimiter(options.delimiter)?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut records = split_records(&text, options.delimiter, options.comment_prefix)?
        .into_iter()
        .skip_while(|r| r.blank);
    let header = records
        .next()
        .ok_or_else(|| XMatchError::parse(1, "missing header row"))?;
    let names: Vec<String> = header
        .fields
        .into_iter()
        .map(|f| f.text.trim().to_string())
        .collect();

    let single_column = names.len() == 1;
    let rows: Vec<RawRecord> = records.filter(|r| single_column || !r.blank).collect();
    for record in &rows {
        if record.fields.len() != names.len() {
            return Err(XMatchError::parse(
                record.line,
                format!(
                    "expected {} fields, found {}",
                    names.len(),
                    record.fields.len()
                ),
            ));
        }
    }

    let schema = resolve_schema(&names, &rows, &options.column_types)?;
    let mut table = Table::new(schema.clone());
    for (row_index, record) in rows.into_iter().enumerate() {
        let mut values = Vec::with_capacity(record.fields.len());
        for (column, field) in schema.columns().iter().zip(&record.fields) {
            let value = column.ty.parse_cell(&field.text, field.quoted).ok_or_else(|| {
                XMatchError::schema(
                    row_index,
                    format!(
                        "line {}: column '{}' expects {}, found '{}'",
                        record.line, column.name, column.ty, field.text
                    ),
                )
            })?;
            values.push(value);
        }
        table.push_row(values)?;
    }

    log::debug!(
        "read {} rows x {} columns",
        table.len(),
        table.schema().len()
    );
    Ok(table)
}

pub fn read_table_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> XMatchResult<Table> {
    let file = File::open(path.as_ref())?;
    read_table(file, options)
}

/// Write a header row and every table row, `\n`-terminated.
///
/// Only `delimiter` and `comment_prefix` of `options` apply.
pub fn write_table<W: Write>(table: &Table, mut writer: W, options: &CsvOptions) -> XMatchResult<()> {
    let CsvOptions {
        delimiter,
        comment_prefix,
        ..
    } = *options;
    validate_delimiter(delimiter)?;
    let mut sep = [0u8; 4];
    let sep = delimiter.encode_utf8(&mut sep).as_bytes();

    for (i, name) in table.schema().names().enumerate() {
        if i > 0 {
            writer.write_all(sep)?;
        }
        writer.write_all(escape_field(name, delimiter, comment_prefix).as_bytes())?;
    }
    writer.write_all(b"\n")?;

    for row in table.rows() {
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                writer.write_all(sep)?;
            }
            writer.write_all(format_cell(value, delimiter, comment_prefix).as_bytes())?;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_table_to_path(
    table: &Table,
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> XMatchResult<()> {
    let file = File::create(path.as_ref())?;
    write_table(table, BufWriter::new(file), options)
}

impl Table {
    /// Serialize to delimited text, header first, with the default `#`
    /// comment prefix.
    pub fn to_delimited(&self, delimiter: char) -> XMatchResult<String> {
        let mut buf = Vec::new();
        write_table(self, &mut buf, &CsvOptions::default().with_delimiter(delimiter))?;
        String::from_utf8(buf).map_err(|e| XMatchError::parse(0, e.to_string()))
    }
}

/// Quote a field if it contains the delimiter, a quote, CR or LF, or starts
/// with the comment prefix. Embedded quotes are doubled.
pub fn escape_field(field: &str, delimiter: char, comment_prefix: Option<char>) -> Cow<'_, str> {
    let needs_quotes = comment_prefix.is_some_and(|p| field.starts_with(p))
        || field
            .chars()
            .any(|c| c == delimiter || c == '"' || c == '\n' || c == '\r');
    if !needs_quotes {
        return Cow::Borrowed(field);
    }
    quote(field)
}

fn quote(field: &str) -> Cow<'_, str> {
    Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
}

fn format_cell(value: &Value, delimiter: char, comment_prefix: Option<char>) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::Int(i) => Cow::Owned(i.to_string()),
        // `{:?}` keeps a `.0` on whole numbers so they read back as floats.
        Value::Float(x) => Cow::Owned(format!("{:?}", x)),
        Value::Text(s) if s.is_empty() || looks_numeric(s) => quote(s),
        Value::Text(s) => escape_field(s, delimiter, comment_prefix),
    }
}

fn looks_numeric(text: &str) -> bool {
    let text = text.trim();
    text.parse::<i64>().is_ok() || text.parse::<f64>().is_ok()
}

fn validate_delimiter(delimiter: char) -> XMatchResult<()> {
    if matches!(delimiter, '"' | '\n' | '\r') {
        return Err(XMatchError::invalid_parameter(format!(
            "{:?} cannot be used as a field delimiter",
            delimiter
        )));
    }
    Ok(())
}

fn resolve_schema(
    names: &[String],
    rows: &[RawRecord],
    declared: &[(String, ColumnType)],
) -> XMatchResult<Schema> {
    for (name, _) in declared {
        if !names.contains(name) {
            return Err(XMatchError::invalid_parameter(format!(
                "declared column '{}' is not in the header",
                name
            )));
        }
    }

    let columns = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let ty = declared
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, ty)| *ty)
                .unwrap_or_else(|| infer_column_type(rows, i));
            Column::new(name.clone(), ty)
        })
        .collect();
    Schema::new(columns)
}

fn infer_column_type(rows: &[RawRecord], column: usize) -> ColumnType {
    let mut cells = rows
        .iter()
        .map(|r| &r.fields[column])
        .filter(|f| !(f.text.is_empty() && !f.quoted))
        .peekable();

    if cells.peek().is_none() {
        return ColumnType::Text;
    }

    let mut all_int = true;
    let mut all_float = true;
    for cell in cells {
        if cell.quoted {
            return ColumnType::Text;
        }
        let text = cell.text.trim();
        if all_int && text.parse::<i64>().is_err() {
            all_int = false;
        }
        if text.parse::<f64>().is_err() {
            all_float = false;
            break;
        }
    }

    if all_int {
        ColumnType::Int
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

fn split_records(
    text: &str,
    delimiter: char,
    comment_prefix: Option<char>,
) -> XMatchResult<Vec<RawRecord>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut at_record_start = true;
    let mut line = 1;
    let mut record_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        if at_record_start {
            if Some(c) == comment_prefix {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
                line += 1;
                continue;
            }
            if c == '\r' && chars.peek() == Some(&'\n') {
                continue;
            }
            if c == '\n' {
                records.push(RawRecord {
                    line,
                    fields: vec![RawField {
                        text: String::new(),
                        quoted: false,
                    }],
                    blank: true,
                });
                line += 1;
                continue;
            }
            at_record_start = false;
            record_line = line;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            c if c == delimiter => {
                fields.push(RawField {
                    text: std::mem::take(&mut field),
                    quoted: std::mem::take(&mut quoted),
                });
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(RawField {
                    text: std::mem::take(&mut field),
                    quoted: std::mem::take(&mut quoted),
                });
                records.push(RawRecord {
                    line: record_line,
                    fields: std::mem::take(&mut fields),
                    blank: false,
                });
                line += 1;
                at_record_start = true;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(XMatchError::parse(record_line, "unterminated quoted field"));
    }
    if !at_record_start {
        fields.push(RawField { text: field, quoted });
        records.push(RawRecord {
            line: record_line,
            fields,
            blank: false,
        });
    }
    Ok(records)
}

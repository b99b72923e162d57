//! Purpose: Encode a `KeyMap` as the key-map JSON document and read it back.
//! Exports: `save`, `load`, `to_json_string`, `write_json`.
//! Role: Output boundary for the converter and input boundary for `lookup`.
//! Invariants: Output is a single JSON object, 4-space indented, in `KeyMap` order.
//! Invariants: No trailing newline is written after the closing brace.
//! Invariants: The destination file is created or truncated; nothing is appended.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::error::{Error, ErrorKind, io_error};
use super::keyfile::KeyMap;

const INDENT: &[u8] = b"    ";

pub fn write_json<W: Write>(map: &KeyMap, writer: W) -> Result<(), serde_json::Error> {
    let mut ser = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    map.serialize(&mut ser)
}

pub fn to_json_string(map: &KeyMap) -> Result<String, Error> {
    let mut buf = Vec::new();
    write_json(map, &mut buf).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode key map")
            .with_source(err)
    })?;
    String::from_utf8(buf).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("key map encoding is not utf-8")
            .with_source(err)
    })
}

pub fn save(map: &KeyMap, output_path: &Path) -> Result<(), Error> {
    let file = File::create(output_path)
        .map_err(|err| io_error(err, "failed to create key map file", output_path))?;
    let mut writer = BufWriter::new(file);
    write_json(map, &mut writer).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write key map file")
            .with_path(output_path)
            .with_source(err)
    })?;
    writer
        .flush()
        .map_err(|err| io_error(err, "failed to write key map file", output_path))
}

pub fn load(path: &Path) -> Result<KeyMap, Error> {
    let file = File::open(path).map_err(|err| io_error(err, "failed to open key map file", path))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| {
        let kind = if err.is_io() {
            ErrorKind::Io
        } else {
            ErrorKind::Malformed
        };
        Error::new(kind)
            .with_message("failed to read key map file")
            .with_hint("A key map is a JSON object of string arrays.")
            .with_path(path)
            .with_source(err)
    })
}

//! Purpose: Parse an IPM key file into an ordered function-name -> arguments map.
//! Exports: `KeyMap`, `ErrorPolicy`, `ParseOutcome`, `ParsedKeyfile`, `SkippedRecord`,
//! `parse`, `parse_reader`.
//! Role: Line loop and policy around `record::classify_line`; no output concerns.
//! Invariants: Later records overwrite earlier ones but keep the first position.
//! Invariants: Lines that are not records are ignored without failing the run.
//! Invariants: Under `ErrorPolicy::Stop` a nameless declaration fails the whole parse.
//! Invariants: `\n`, `\r\n` and a lone `\r` each end a line.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use bstr::ByteSlice;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{Error, ErrorKind, io_error};
use super::record::{Entry, LineClass, classify_line};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ErrorPolicy {
    #[default]
    Stop,
    Skip,
}

/// Function name to argument list, in first-encounter order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap(IndexMap<String, Vec<String>>);

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when an existing entry was replaced.
    pub fn insert(&mut self, name: String, args: Vec<String>) -> bool {
        self.0.insert(name, args).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Distinct arguments of `name`, in list order.
    pub fn arg_set(&self, name: &str) -> Option<IndexSet<&str>> {
        self.0
            .get(name)
            .map(|args| args.iter().map(String::as_str).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Vec<String>)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseOutcome {
    pub lines: u64,
    pub records: u64,
    /// Non-record lines plus records with too few fields.
    pub ignored: u64,
    pub malformed_skipped: u64,
    pub overwritten: u64,
}

#[derive(Clone, Debug)]
pub struct ParsedKeyfile {
    pub map: KeyMap,
    pub outcome: ParseOutcome,
}

/// A record dropped under `ErrorPolicy::Skip`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SkippedRecord {
    pub line: u64,
    pub message: String,
    pub declaration: String,
}

const NAMELESS_MESSAGE: &str = "record declaration has no function name";

pub fn parse<N>(path: &Path, errors: ErrorPolicy, on_skip: N) -> Result<ParsedKeyfile, Error>
where
    N: FnMut(SkippedRecord),
{
    let file = File::open(path).map_err(|err| io_error(err, "failed to open key file", path))?;
    let parsed = parse_reader(file, errors, on_skip).map_err(|err| err.with_path(path))?;
    debug!(
        path = %path.display(),
        functions = parsed.map.len(),
        "parsed key file"
    );
    Ok(parsed)
}

pub fn parse_reader<R, N>(
    reader: R,
    errors: ErrorPolicy,
    mut on_skip: N,
) -> Result<ParsedKeyfile, Error>
where
    R: Read,
    N: FnMut(SkippedRecord),
{
    let mut reader = BufReader::new(reader);
    let mut map = KeyMap::new();
    let mut outcome = ParseOutcome::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = read_line(&mut reader, &mut buf).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read key file")
                .with_source(err)
        })?;
        if read == 0 {
            break;
        }
        outcome.lines += 1;
        let line_no = outcome.lines;
        let text = buf.to_str_lossy();

        match classify_line(&text) {
            LineClass::NotRecord => {
                outcome.ignored += 1;
            }
            LineClass::ShortRecord { fields } => {
                debug!(line = line_no, fields, "ignoring short record");
                outcome.ignored += 1;
            }
            LineClass::NamelessDeclaration { declaration } => {
                outcome.records += 1;
                match errors {
                    ErrorPolicy::Stop => {
                        return Err(Error::new(ErrorKind::Malformed)
                            .with_message(NAMELESS_MESSAGE)
                            .with_line(line_no)
                            .with_hint("Use --errors skip to drop malformed records."));
                    }
                    ErrorPolicy::Skip => {
                        debug!(line = line_no, declaration, "skipping malformed record");
                        outcome.malformed_skipped += 1;
                        on_skip(SkippedRecord {
                            line: line_no,
                            message: NAMELESS_MESSAGE.to_string(),
                            declaration: declaration.to_string(),
                        });
                    }
                }
            }
            LineClass::Entry(Entry { name, args }) => {
                outcome.records += 1;
                if map.insert(name, args) {
                    outcome.overwritten += 1;
                }
            }
        }
    }

    Ok(ParsedKeyfile { map, outcome })
}

/// Append one line to `buf` without its terminator; returns bytes consumed, 0 at EOF.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    let mut read = 0usize;
    loop {
        let (used, terminator) = {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                return Ok(read);
            }
            match available.find_byteset(b"\r\n") {
                Some(pos) => {
                    buf.extend_from_slice(&available[..pos]);
                    (pos + 1, Some(available[pos]))
                }
                None => {
                    buf.extend_from_slice(available);
                    (available.len(), None)
                }
            }
        };
        reader.consume(used);
        read += used;

        match terminator {
            None => continue,
            Some(b'\r') => {
                if reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                    read += 1;
                }
                return Ok(read);
            }
            Some(_) => return Ok(read),
        }
    }
}

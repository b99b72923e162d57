//! Purpose: Recognize one key-file line and extract its function entry.
//! Exports: `LineClass`, `Entry`, `classify_line`, `MIN_FIELDS`.
//! Role: Pure per-line logic; `keyfile` owns reading, policy and accumulation.
//! Invariants: A record starts with an ASCII digit and contains at least one `|`.
//! Invariants: Records with fewer than `MIN_FIELDS` fields are never entries.
//! Invariants: The argument list keeps empty tokens (an empty last field is `[""]`).

/// Fewest `|`-separated fields a record needs before it is read.
pub const MIN_FIELDS: usize = 5;

const DECLARATION_FIELD: usize = 2;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LineClass<'a> {
    /// Blank lines, headers and comments.
    NotRecord,
    ShortRecord {
        fields: usize,
    },
    /// The declaration field has no token before its `(`.
    NamelessDeclaration {
        declaration: &'a str,
    },
    Entry(Entry),
}

pub fn classify_line(raw: &str) -> LineClass<'_> {
    let line = raw.trim();
    let starts_with_digit = line.chars().next().is_some_and(|c| c.is_ascii_digit());
    if !starts_with_digit || !line.contains('|') {
        return LineClass::NotRecord;
    }

    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < MIN_FIELDS {
        return LineClass::ShortRecord {
            fields: fields.len(),
        };
    }

    let declaration = fields[DECLARATION_FIELD].trim();
    let Some(name) = function_name(declaration) else {
        return LineClass::NamelessDeclaration { declaration };
    };

    let last = fields.last().copied().unwrap_or_default();
    let args = last.split(',').map(|arg| arg.trim().to_string()).collect();

    LineClass::Entry(Entry {
        name: name.to_string(),
        args,
    })
}

fn function_name(declaration: &str) -> Option<&str> {
    let head = declaration.split('(').next().unwrap_or_default();
    head.split_whitespace().last()
}

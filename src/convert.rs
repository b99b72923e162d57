//! Purpose: Run one key-file conversion: parse the input, then write the key map.
//! Exports: `run`, `convert_to_string`.
//! Role: Orchestration shared by the CLI and integration tests.
//! Invariants: The output file is only touched after the whole input parsed.

use tracing::info;

use crate::core::config::KeyfileConfig;
use crate::core::error::Error;
use crate::core::keyfile::{ParseOutcome, SkippedRecord, parse};
use crate::core::serialize::{save, to_json_string};

pub fn run<N>(config: &KeyfileConfig, on_skip: N) -> Result<ParseOutcome, Error>
where
    N: FnMut(SkippedRecord),
{
    let parsed = parse(&config.input_path, config.errors, on_skip)?;
    save(&parsed.map, &config.output_path)?;
    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        functions = parsed.map.len(),
        records = parsed.outcome.records,
        overwritten = parsed.outcome.overwritten,
        skipped = parsed.outcome.malformed_skipped,
        "wrote key map"
    );
    Ok(parsed.outcome)
}

/// Parse `config.input_path` and return the encoded key map; `output_path` is unused.
pub fn convert_to_string<N>(config: &KeyfileConfig, on_skip: N) -> Result<String, Error>
where
    N: FnMut(SkippedRecord),
{
    let parsed = parse(&config.input_path, config.errors, on_skip)?;
    to_json_string(&parsed.map)
}

#[cfg(test)]
mod tests {
    use super::{convert_to_string, run};
    use crate::core::config::KeyfileConfig;
    use crate::core::error::ErrorKind;
    use crate::core::keyfile::ErrorPolicy;

    const INPUT: &str = "1|x|void add(int x, int y)|meta|x, y\n\
                         not a record\n\
                         2|y|void add(int x, int y)|meta2|x,y,z\n";

    #[test]
    fn run_writes_overwritten_entry() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = KeyfileConfig::beside(temp.path());
        std::fs::write(&config.input_path, INPUT).expect("write input");

        let outcome = run(&config, |_| {}).expect("run");
        assert_eq!(outcome.records, 2);
        assert_eq!(outcome.overwritten, 1);

        let text = std::fs::read_to_string(&config.output_path).expect("read output");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value, serde_json::json!({"add": ["x", "y", "z"]}));
    }

    #[test]
    fn failed_parse_leaves_output_untouched() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = KeyfileConfig::beside(temp.path());
        std::fs::write(&config.input_path, "1|a|int f()|m|a\n2|a||m|b\n").expect("write input");

        let err = run(&config, |_| {}).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert!(!config.output_path.exists());
    }

    #[test]
    fn skip_policy_writes_remaining_entries() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = KeyfileConfig::beside(temp.path()).with_errors(ErrorPolicy::Skip);
        std::fs::write(&config.input_path, "1|a|int f()|m|a\n2|a||m|b\n").expect("write input");

        let mut lines = Vec::new();
        let outcome = run(&config, |record| lines.push(record.line)).expect("run");
        assert_eq!(outcome.malformed_skipped, 1);
        assert_eq!(lines, vec![2]);

        let text = std::fs::read_to_string(&config.output_path).expect("read output");
        assert_eq!(text, "{\n    \"f\": [\n        \"a\"\n    ]\n}");
    }

    #[test]
    fn convert_to_string_does_not_write_output() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = KeyfileConfig::beside(temp.path());
        std::fs::write(&config.input_path, "1|a|int f()|m|\n").expect("write input");

        let json = convert_to_string(&config, |_| {}).expect("convert");
        assert_eq!(json, "{\n    \"f\": [\n        \"\"\n    ]\n}");
        assert!(!config.output_path.exists());
    }
}

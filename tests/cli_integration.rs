// CLI integration tests for key-file conversion and lookup.
use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_ipm-keyfile");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn stderr_json_lines(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(parse_json)
        .collect()
}

const KEY_FILE: &str = "\
# IPM MPI key file
1|x|void add(int x, int y)|meta|x, y
not a record
2|y|void add(int x, int y)|meta2|x,y,z
3|z|int MPI_Barrier(MPI_Comm comm)|comm|comm
4|z|int MPI_Finalize(void)|none|
";

fn write_key_file(dir: &Path, contents: &str) {
    std::fs::write(dir.join("ipm_key_mpi.txt"), contents).expect("write key file");
}

#[test]
fn convert_dir_writes_default_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_key_file(temp.path(), KEY_FILE);

    let out = cmd()
        .args(["--dir", temp.path().to_str().unwrap()])
        .output()
        .expect("convert");
    assert!(out.status.success());
    assert!(out.stdout.is_empty());

    let text = std::fs::read_to_string(temp.path().join("ipm_key_mpi.json")).expect("read json");
    assert_eq!(
        text,
        "{\n    \"add\": [\n        \"x\",\n        \"y\",\n        \"z\"\n    ],\n    \"MPI_Barrier\": [\n        \"comm\"\n    ],\n    \"MPI_Finalize\": [\n        \"\"\n    ]\n}"
    );
}

#[test]
fn explicit_input_and_output_paths() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("keys.txt");
    let output = temp.path().join("keys.json");
    std::fs::write(&input, KEY_FILE).expect("write");

    let out = cmd()
        .args([
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .output()
        .expect("convert");
    assert!(out.status.success());

    let value = parse_json(&std::fs::read_to_string(&output).expect("read"));
    assert_eq!(value["add"], serde_json::json!(["x", "y", "z"]));
    assert_eq!(value["MPI_Finalize"], serde_json::json!([""]));
}

#[test]
fn stdout_mode_prints_json_without_writing() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_key_file(temp.path(), KEY_FILE);

    let out = cmd()
        .args(["--dir", temp.path().to_str().unwrap(), "--stdout"])
        .output()
        .expect("convert");
    assert!(out.status.success());
    let value = parse_json(std::str::from_utf8(&out.stdout).expect("utf8"));
    assert_eq!(value["MPI_Barrier"], serde_json::json!(["comm"]));
    assert!(!temp.path().join("ipm_key_mpi.json").exists());
}

#[test]
fn missing_input_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");

    let out = cmd()
        .args(["--dir", temp.path().to_str().unwrap()])
        .output()
        .expect("convert");
    assert_eq!(out.status.code().unwrap(), 3);

    let errors = stderr_json_lines(&out.stderr);
    let error = errors
        .iter()
        .find_map(|value| value.get("error"))
        .expect("error json");
    assert_eq!(error["kind"], "NotFound");
    assert!(error["path"].as_str().unwrap().ends_with("ipm_key_mpi.txt"));
    assert!(!temp.path().join("ipm_key_mpi.json").exists());
}

#[test]
fn malformed_declaration_stops_by_default() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_key_file(temp.path(), "1|a|int f(int a)|m|a\n2|a||m|x\n");

    let out = cmd()
        .args(["--dir", temp.path().to_str().unwrap()])
        .output()
        .expect("convert");
    assert_eq!(out.status.code().unwrap(), 7);

    let errors = stderr_json_lines(&out.stderr);
    let error = errors
        .iter()
        .find_map(|value| value.get("error"))
        .expect("error json");
    assert_eq!(error["kind"], "Malformed");
    assert_eq!(error["line"], 2);
    assert!(!temp.path().join("ipm_key_mpi.json").exists());
}

#[test]
fn malformed_declaration_skip_emits_notice() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_key_file(temp.path(), "1|a|int f(int a)|m|a\n2|a||m|x\n");

    let out = cmd()
        .args([
            "--dir",
            temp.path().to_str().unwrap(),
            "--errors",
            "skip",
        ])
        .output()
        .expect("convert");
    assert!(out.status.success());

    let notices = stderr_json_lines(&out.stderr);
    let notice = notices
        .iter()
        .find_map(|value| value.get("notice"))
        .expect("notice json");
    assert_eq!(notice["kind"], "skip");
    assert_eq!(notice["cmd"], "convert");
    assert_eq!(notice["line"], 2);

    let value = parse_json(
        &std::fs::read_to_string(temp.path().join("ipm_key_mpi.json")).expect("read"),
    );
    assert_eq!(value, serde_json::json!({"f": ["a"]}));
}

#[test]
fn lookup_prints_arguments_and_reports_missing_names() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_key_file(temp.path(), KEY_FILE);
    let dir = temp.path().to_str().unwrap();

    let convert = cmd().args(["--dir", dir]).output().expect("convert");
    assert!(convert.status.success());

    let lookup = cmd()
        .args(["lookup", "add", "--dir", dir])
        .output()
        .expect("lookup");
    assert!(lookup.status.success());
    let value = parse_json(std::str::from_utf8(&lookup.stdout).expect("utf8"));
    assert_eq!(value, serde_json::json!(["x", "y", "z"]));

    let missing = cmd()
        .args(["lookup", "MPI_Send", "--dir", dir])
        .output()
        .expect("lookup");
    assert_eq!(missing.status.code().unwrap(), 3);
}

#[test]
fn usage_exit_code() {
    let out = cmd().args(["--errors", "ignore"]).output().expect("run");
    assert_eq!(out.status.code().unwrap(), 2);
}

#[test]
fn lookup_prints_distinct_arguments_and_membership() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_key_file(
        temp.path(),
        "1|a|int MPI_Sendrecv(void)|m|sendbuf, count, datatype, count\n",
    );
    let dir = temp.path().to_str().unwrap();

    let convert = cmd().args(["--dir", dir]).output().expect("convert");
    assert!(convert.status.success());

    let lookup = cmd()
        .args(["lookup", "MPI_Sendrecv", "--dir", dir])
        .output()
        .expect("lookup");
    assert!(lookup.status.success());
    let value = parse_json(std::str::from_utf8(&lookup.stdout).expect("utf8"));
    assert_eq!(value, serde_json::json!(["sendbuf", "count", "datatype"]));

    let has = cmd()
        .args(["lookup", "MPI_Sendrecv", "--has", "datatype", "--dir", dir])
        .output()
        .expect("lookup");
    assert!(has.status.success());
    let value = parse_json(std::str::from_utf8(&has.stdout).expect("utf8"));
    assert_eq!(value, serde_json::json!(true));

    let lacks = cmd()
        .args(["lookup", "MPI_Sendrecv", "--has", "comm", "--dir", dir])
        .output()
        .expect("lookup");
    assert!(lacks.status.success());
    let value = parse_json(std::str::from_utf8(&lacks.stdout).expect("utf8"));
    assert_eq!(value, serde_json::json!(false));
}

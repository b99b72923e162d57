//! Purpose: Hold top-level CLI command dispatch for `ipm-keyfile`.
//! Exports: `dispatch`, `resolve_config`, `resolve_keyfile_path`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: The binary directory is only consulted when flags leave a path unresolved.
//! Invariants: Skipped records surface as notices on stderr, never on stdout.

use super::*;

use clap::CommandFactory;
use ipm_keyfile::convert;
use ipm_keyfile::core::config::{DEFAULT_OUTPUT_NAME, KeyfileConfig, executable_dir};
use ipm_keyfile::core::keyfile::SkippedRecord;
use ipm_keyfile::core::serialize::load;
use ipm_keyfile::notice::skip_notice;
use std::path::Path;

pub(super) fn dispatch(cli: Cli, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    match cli.command {
        Some(Command::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "ipm-keyfile", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Some(Command::Lookup { name, has, keyfile }) => {
            let path = resolve_keyfile_path(keyfile, cli.dir.as_deref())?;
            let map = load(&path)?;
            let args = map.arg_set(&name).ok_or_else(|| {
                Error::new(ErrorKind::NotFound)
                    .with_message(format!("function {name} is not in the key map"))
                    .with_path(&path)
                    .with_hint("Regenerate the key map, or check the function name's spelling.")
            })?;
            match has {
                Some(arg) => emit_json(json!(args.contains(arg.as_str()))),
                None => emit_json(json!(args.into_iter().collect::<Vec<_>>())),
            }
            Ok(RunOutcome::ok())
        }
        None => {
            let config = resolve_config(cli.input, cli.output, cli.dir.as_deref())?
                .with_errors(cli.errors.into());
            let input_label = config.input_path.display().to_string();
            let on_skip = |record: SkippedRecord| {
                let notice = skip_notice(&record, &input_label, "convert", notice_time_now());
                emit_notice(&notice, color_mode);
            };
            if cli.stdout {
                let json = convert::convert_to_string(&config, on_skip)?;
                println!("{json}");
            } else {
                convert::run(&config, on_skip)?;
            }
            Ok(RunOutcome::ok())
        }
    }
}

pub(super) fn resolve_config(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    dir: Option<&Path>,
) -> Result<KeyfileConfig, Error> {
    let base = match (dir, &input, &output) {
        (Some(dir), _, _) => KeyfileConfig::beside(dir),
        (None, Some(input), Some(output)) => KeyfileConfig::new(input, output),
        (None, _, _) => KeyfileConfig::beside_executable()?,
    };
    Ok(KeyfileConfig::new(
        input.unwrap_or(base.input_path),
        output.unwrap_or(base.output_path),
    ))
}

pub(super) fn resolve_keyfile_path(
    keyfile: Option<PathBuf>,
    dir: Option<&Path>,
) -> Result<PathBuf, Error> {
    if let Some(keyfile) = keyfile {
        return Ok(keyfile);
    }
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => executable_dir()?,
    };
    Ok(dir.join(DEFAULT_OUTPUT_NAME))
}

//! cellflow CLI - drive a sheet from a script of line commands

mod command;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cellflow::prelude::*;
use command::Command;

#[derive(Parser)]
#[command(name = "cellflow")]
#[command(
    author,
    version,
    about = "Reactive spreadsheet driven by line commands",
    after_help = "Commands: set <A1> <text>, get <A1>, clear <A1>, size, values, texts, refs <A1>"
)]
struct Cli {
    /// Command script to run (default: stdin)
    script: Option<PathBuf>,

    /// Do not acknowledge successful set/clear commands
    #[arg(short, long)]
    quiet: bool,

    /// Log filter, e.g. `debug` or `cellflow=trace` (default: $CELLFLOW_LOG, else `warn`)
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let failures = run_session(input, &mut out, cli.quiet)?;
    out.flush().context("Failed to flush output")?;

    if failures > 0 {
        tracing::debug!(failures, "session finished with errors");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter '{}'", directives))?,
        None => EnvFilter::try_from_env("CELLFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

/// Run every command in `input` against one sheet
///
/// Command errors are reported on stderr and do not stop the session.
/// Returns the number of failed commands; I/O failures abort.
fn run_session<R: BufRead, W: Write>(input: R, out: &mut W, quiet: bool) -> Result<usize> {
    let mut sheet = Sheet::new();
    let mut failures = 0;

    for (index, line) in input.lines().enumerate() {
        let line = line.context("Failed to read command")?;
        let line_no = index + 1;

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: line {}: {:#}", line_no, err);
                failures += 1;
                continue;
            }
        };

        tracing::trace!(line = line_no, ?command, "executing");
        match execute(&mut sheet, &command, out, quiet) {
            Ok(()) => {}
            Err(CommandError::Sheet(err)) => {
                eprintln!("error: line {}: {}", line_no, err);
                failures += 1;
            }
            Err(CommandError::Io(err)) => {
                return Err(err).context("Failed to write output");
            }
        }
    }

    Ok(failures)
}

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Sheet(#[from] Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn execute<W: Write>(
    sheet: &mut Sheet,
    command: &Command,
    out: &mut W,
    quiet: bool,
) -> std::result::Result<(), CommandError> {
    match command {
        Command::Set(pos, text) => {
            sheet.set_cell(*pos, text)?;
            if !quiet {
                writeln!(out, "ok")?;
            }
        }
        Command::Clear(pos) => {
            sheet.clear_cell(*pos)?;
            if !quiet {
                writeln!(out, "ok")?;
            }
        }
        Command::Get(pos) => {
            let text = sheet.cell(*pos)?.map(|cell| cell.text()).unwrap_or_default();
            let value = sheet.value(*pos)?;
            writeln!(out, "{}\t{}", text, value)?;
        }
        Command::Size => {
            let size = sheet.printable_size();
            writeln!(out, "{} {}", size.rows, size.cols)?;
        }
        Command::Values => sheet.print_values(out)?,
        Command::Texts => sheet.print_texts(out)?,
        Command::Refs(pos) => {
            let reads = sheet.referenced_cells(*pos)?;
            let read_by = sheet.dependent_cells(*pos)?;
            writeln!(out, "{}", labelled("reads:", &reads))?;
            writeln!(out, "{}", labelled("read by:", &read_by))?;
        }
    }
    Ok(())
}

fn labelled(label: &str, cells: &[Position]) -> String {
    let mut line = label.to_string();
    for pos in cells {
        line.push(' ');
        line.push_str(&pos.to_string());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str, quiet: bool) -> (String, usize) {
        let mut out = Vec::new();
        let failures = run_session(script.as_bytes(), &mut out, quiet).unwrap();
        (String::from_utf8(out).unwrap(), failures)
    }

    #[test]
    fn test_session_output() {
        let script = "\
# comment
set A1 2
set B1 =A1 * 3

get B1
size
values
refs A1
";
        let (out, failures) = run(script, true);
        assert_eq!(failures, 0);
        assert_eq!(out, "=A1*3\t6\n1 2\n2\t6\nreads:\nread by: B1\n");
    }

    #[test]
    fn test_errors_do_not_stop_session() {
        let script = "set A1 =A1\nbogus\nget A1\nset A1 =1+\nset A1 1\nget A1\n";
        let (out, failures) = run(script, false);
        assert_eq!(failures, 3);
        assert_eq!(out, "\t\nok\n1\t1\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_command_error_wraps_its_source() {
        let mut sheet = Sheet::new();
        let pos = Position::new(0, 0);

        let err = execute(&mut sheet, &Command::Set(pos, "=A1".into()), &mut Vec::new(), true)
            .unwrap_err();
        assert!(matches!(err, CommandError::Sheet(Error::CircularDependency(_))));
        assert_eq!(err.to_string(), sheet.set_cell(pos, "=A1").unwrap_err().to_string());

        let err = execute(&mut sheet, &Command::Size, &mut BrokenPipe, true).unwrap_err();
        assert!(matches!(err, CommandError::Io(_)));
        assert_eq!(err.to_string(), "closed");
    }

    #[test]
    fn test_write_failure_aborts_session() {
        let err = run_session("size\nbogus\n".as_bytes(), &mut BrokenPipe, true).unwrap_err();
        assert_eq!(format!("{:#}", err), "Failed to write output: closed");
    }
}

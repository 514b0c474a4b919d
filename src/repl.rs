//! The read-eval-print loop: reads a line, runs it through the tokenizer,
//! parser, and glob expander, then dispatches to a builtin or the pipeline
//! executor, recording the resulting status. Grounded on the teacher's own
//! `main::getcmd`/prompt loop, generalized from a bare echo of scanned
//! tokens to a full pipeline run.

use crate::builtins;
use crate::env::{record_status, Environment, ProcessEnvironment};
use crate::executor;
use crate::globbing;
use crate::lexer;
use crate::parser;
use std::io::{self, BufRead, Write};

/// A line longer than this is refused outright rather than buffered
/// without bound.
const MAX_LINE_LEN: usize = 65536;

/// Runs the shell to completion: until stdin is exhausted or a builtin
/// `exit` terminates the process directly.
pub fn run() {
    let mut env = ProcessEnvironment;
    let stdin = io::stdin();
    let interactive = atty::is(atty::Stream::Stdin);

    loop {
        if interactive {
            print!("$ ");
            let _ = io::stdout().flush();
        }

        let mut line = String::new();
        match read_line(&stdin, &mut line) {
            ReadOutcome::Eof => {
                if interactive {
                    println!();
                }
                std::process::exit(0);
            }
            ReadOutcome::TooLong => {
                eprintln!("dsh: line too long");
                record_status(&mut env, 2);
                continue;
            }
            ReadOutcome::Error(err) => {
                eprintln!("dsh: {err}");
                std::process::exit(1);
            }
            ReadOutcome::Line => {}
        }

        execute_line(&line, &mut env);
    }
}

enum ReadOutcome {
    Line,
    Eof,
    TooLong,
    Error(io::Error),
}

fn read_line(stdin: &io::Stdin, buf: &mut String) -> ReadOutcome {
    let mut handle = stdin.lock();
    match handle.read_line(buf) {
        Ok(0) => ReadOutcome::Eof,
        Ok(_) if buf.len() > MAX_LINE_LEN => ReadOutcome::TooLong,
        Ok(_) => ReadOutcome::Line,
        Err(err) => ReadOutcome::Error(err),
    }
}

/// Runs one line end to end and records the resulting status, unless the
/// line was a no-op (blank, whitespace-only, or a bare dangling
/// redirection) -- per the idempotent-empty-line invariant, a no-op line
/// must leave `?` exactly as the previous command left it, not reset it.
fn execute_line(line: &str, env: &mut dyn Environment) {
    if let Some(status) = run_line(line, env) {
        record_status(env, status);
    }
}

/// Runs one line end to end and returns the status it should record, or
/// `None` if the line was a no-op and `?` should be left untouched.
fn run_line(line: &str, env: &mut dyn Environment) -> Option<i32> {
    let outcome = (|| -> crate::model::Result<Option<i32>> {
        let tokens = lexer::scan(line)?;
        let pipeline = parser::parse(tokens)?;
        if pipeline.is_empty() {
            return Ok(None);
        }
        let pipeline = globbing::expand_pipeline(pipeline, env);

        // A single-stage builtin runs in-process, so it can mutate shell
        // state (cd's OLDPWD/PWD, exit's process-wide termination). A
        // builtin that shows up anywhere in a multi-stage pipeline runs
        // out of process via the worker re-entry point instead, inside
        // the executor.
        if pipeline.stages().len() == 1 {
            let spec = &pipeline.stages()[0];
            if let Some(handler) = builtins::lookup(&spec.argv[0]) {
                return Ok(Some(handler(&spec.argv, env)));
            }
        }

        executor::execute(&pipeline).map(Some)
    })();

    match outcome {
        Ok(status) => status,
        Err(err) => {
            eprintln!("{err}");
            Some(err.status())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::InMemoryEnvironment;
    use crate::model::Error;

    #[test]
    fn blank_line_is_a_no_op() {
        let mut env = InMemoryEnvironment::new();
        assert_eq!(run_line("", &mut env), None);
    }

    #[test]
    fn blank_line_leaves_the_previous_status_untouched() {
        // The idempotent-empty-line invariant: hitting Enter on a blank
        // line must not reset `?` to 0.
        let mut env = InMemoryEnvironment::new();
        execute_line("false", &mut env);
        assert_eq!(env.get("?").as_deref(), Some("1"));

        execute_line("   ", &mut env);
        assert_eq!(env.get("?").as_deref(), Some("1"));
    }

    #[test]
    fn parse_error_reports_status_two() {
        let mut env = InMemoryEnvironment::new();
        assert_eq!(run_line("cat >", &mut env), Some(2));
    }

    #[test]
    fn pwd_builtin_runs_in_process() {
        let mut env = InMemoryEnvironment::new();
        assert_eq!(run_line("pwd", &mut env), Some(0));
    }

    #[test]
    fn unterminated_quote_is_a_parse_error() {
        let mut env = InMemoryEnvironment::new();
        let status = run_line("echo 'oops", &mut env);
        assert_eq!(status, Some(Error::unterminated_quote().status()));
    }

    #[test]
    fn command_not_found_records_status_127() {
        let mut env = InMemoryEnvironment::new();
        assert_eq!(run_line("dsh-no-such-command-xyz", &mut env), Some(127));
    }
}

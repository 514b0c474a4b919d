//! Worker re-entry: lets the executor ask the shell binary itself to act
//! as a pipeline stage, instead of requiring a raw `fork()` or an external
//! `true`-like binary on PATH. Mirrors the teacher's own re-exec trick for
//! running a subshell via `current_exe()` plus a hidden argv, generalized
//! to three stage kinds: a no-op stage (for a pipeline segment with no
//! argv at all), an in-pipeline builtin, and a command-not-found stand-in
//! (for an external command that isn't on `PATH`, so that stage reports
//! its own 127 through the normal wait path instead of aborting the rest
//! of the pipeline).

use crate::builtins;
use crate::env::ProcessEnvironment;
use crate::model::Error;

/// The hidden argv[1] that marks a re-entrant worker invocation. Never
/// shown to, or typed by, an interactive user.
pub const SENTINEL: &str = "__dsh_worker";

/// If the process was invoked in worker mode, runs the requested stage and
/// returns the status it should exit with. Returns `None` if this process
/// is not a worker re-entry, in which case the caller should proceed to
/// the normal REPL.
pub fn maybe_dispatch() -> Option<i32> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) != Some(SENTINEL) {
        return None;
    }

    match args.get(2).map(String::as_str) {
        Some("noop") => Some(0),
        Some("builtin") => {
            let name = args.get(3)?;
            let argv = args[3..].to_vec();
            let handler = builtins::lookup(name)?;
            let mut env = ProcessEnvironment;
            Some(handler(&argv, &mut env))
        }
        Some("not_found") => {
            let name = args.get(3)?;
            eprintln!("{}", Error::command_not_found(name));
            Some(127)
        }
        _ => Some(1),
    }
}

/// Builds the argv (excluding the program path) for a no-op worker stage.
pub fn noop_args() -> Vec<String> {
    vec![SENTINEL.to_string(), "noop".to_string()]
}

/// Builds the argv (excluding the program path) for an in-pipeline
/// builtin invocation.
pub fn builtin_args(argv: &[String]) -> Vec<String> {
    let mut out = vec![SENTINEL.to_string(), "builtin".to_string()];
    out.extend(argv.iter().cloned());
    out
}

/// Builds the argv (excluding the program path) for a command-not-found
/// stand-in stage: it exists only to print the diagnostic and exit 127 as
/// a genuine child of the pipeline.
pub fn not_found_args(name: &str) -> Vec<String> {
    vec![SENTINEL.to_string(), "not_found".to_string(), name.to_string()]
}

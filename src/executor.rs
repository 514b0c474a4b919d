//! Pipeline executor: wires an arbitrary number of stages together with
//! pipes, spawns each one, and waits for the lot. Grounded on the
//! teacher's `interp::pipelined_commands`/`common_executor`, generalized
//! from the teacher's fixed source/filter/sink roles to an N-stage loop,
//! and from external-only commands to stages that may be a builtin or an
//! empty no-op, both routed through the worker re-entry point.

use crate::builtins;
use crate::model::{Error, Result};
use crate::parser::{CommandSpec, Pipeline};
use crate::worker;
use os_pipe::{pipe, PipeReader, PipeWriter};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::OnceLock;

/// Whether to log the resolved argv of every stage before spawning it.
/// Read once from `DSH_DEBUG`, mirroring the teacher's own
/// `is_verbose`/`set_verbose` static, but toggled by an environment
/// variable instead of a `-x` flag since this shell accepts none.
fn debug_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("DSH_DEBUG").is_some())
}

/// Possibly logs to stderr the stage we're about to spawn.
fn maybe_debug(argv: &[String]) {
    if debug_enabled() {
        eprintln!("+ {}", argv.join(" "));
    }
}

/// Runs every stage of the pipeline to completion and returns the status
/// of its last stage, the convention the spec's status recorder expects.
pub fn execute(pipeline: &Pipeline) -> Result<i32> {
    let stages = pipeline.stages();
    debug_assert!(!stages.is_empty(), "empty pipelines never reach the executor");

    let mut children: Vec<Child> = Vec::with_capacity(stages.len());
    let mut upstream: Option<PipeReader> = None;

    for (index, spec) in stages.iter().enumerate() {
        let is_last = index + 1 == stages.len();

        // Every fallible step between here and a successful spawn must
        // reap the children already spawned for earlier stages -- a `?`
        // on any of these would otherwise leave them unreaped.
        let stage_result = (|| -> Result<(Child, Option<PipeReader>)> {
            let stdin = match (upstream.take(), &spec.input_file) {
                (Some(reader), _) => Stdio::from(reader),
                (None, Some(path)) => Stdio::from(open_input(path)?),
                (None, None) => Stdio::inherit(),
            };

            let (stdout, next_upstream) = if is_last {
                match &spec.output_file {
                    Some(path) => (Stdio::from(open_output(path, spec.append)?), None),
                    None => (Stdio::inherit(), None),
                }
            } else {
                let (reader, writer) = wrap_pipe()?;
                (Stdio::from(writer), Some(reader))
            };

            let child = spawn_stage(spec, stdin, stdout)?;
            Ok((child, next_upstream))
        })();

        match stage_result {
            Ok((child, next_upstream)) => {
                children.push(child);
                upstream = next_upstream;
            }
            Err(err) => {
                kill_all(children);
                return Err(err);
            }
        }
    }

    Ok(wait_all(children))
}

/// Spawns one pipeline stage. An empty argv (a pipeline segment left
/// behind by a bare redirection), an in-pipeline builtin, and a command
/// that doesn't resolve on `PATH` all run via the worker re-entry point,
/// since none of them is an external command we can hand to `Command`
/// directly. Routing "not found" through the worker -- rather than
/// returning an `Err` that aborts the whole pipeline -- means a sibling
/// stage that *is* runnable still gets to run and be reaped normally; the
/// missing command's own exit status (127) is all that's affected.
fn spawn_stage(spec: &CommandSpec, stdin: Stdio, stdout: Stdio) -> Result<Child> {
    if spec.argv.is_empty() {
        return spawn_worker(worker::noop_args(), stdin, stdout);
    }

    maybe_debug(&spec.argv);

    let name = &spec.argv[0];
    if builtins::lookup(name).is_some() {
        return spawn_worker(worker::builtin_args(&spec.argv), stdin, stdout);
    }

    if !resolves_on_path(name) {
        return spawn_worker(worker::not_found_args(name), stdin, stdout);
    }

    let mut cmd = Command::new(name);
    cmd.args(&spec.argv[1..]);
    cmd.stdin(stdin);
    cmd.stdout(stdout);
    match cmd.spawn() {
        Ok(child) => Ok(child),
        Err(err) => Err(Error::syscall("exec", &err.to_string())),
    }
}

/// Resolves `name` against `PATH` (or checks it directly if it contains a
/// `/`) the way `execvp` would, without actually invoking it. Used to
/// decide, *before* any `Stdio` is consumed, whether this stage is a real
/// external command or a command-not-found stand-in -- `Command::spawn`'s
/// own `Stdio` builder methods take their arguments by value, so there is
/// no `Stdio` left to retry with once a real spawn attempt has failed.
fn resolves_on_path(name: &str) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fn is_executable_file(path: &std::path::Path) -> bool {
        std::fs::metadata(path)
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    if name.contains('/') {
        return is_executable_file(std::path::Path::new(name));
    }

    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path_var).any(|dir| is_executable_file(&dir.join(name)))
}

fn spawn_worker(worker_args: Vec<String>, stdin: Stdio, stdout: Stdio) -> Result<Child> {
    let exe = std::env::current_exe().map_err(Error::from)?;
    let mut cmd = Command::new(exe);
    cmd.args(worker_args);
    cmd.stdin(stdin);
    cmd.stdout(stdout);
    cmd.spawn().map_err(Error::from)
}

fn open_input(path: &str) -> Result<File> {
    File::open(path).map_err(|err| Error::syscall("open", &format!("{path}: {err}")))
}

fn open_output(path: &str, append: bool) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .mode(0o644)
        .open(path)
        .map_err(|err| Error::syscall("open", &format!("{path}: {err}")))
}

fn wrap_pipe() -> Result<(PipeReader, PipeWriter)> {
    pipe().map_err(|err| Error::syscall("pipe", &err.to_string()))
}

fn kill_all(mut children: Vec<Child>) {
    for child in children.iter_mut() {
        let _ = child.kill();
    }
    wait_all(children);
}

/// Waits for every child in the pipeline, in creation order, and returns
/// the exit status of the last one.
fn wait_all(children: Vec<Child>) -> i32 {
    let mut last = 0;
    for mut child in children.into_iter() {
        last = match child.wait() {
            Ok(status) => status_to_code(status),
            Err(_) => 1,
        };
    }
    last
}

fn status_to_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    if let Some(signal) = status.signal() {
        return 128 + signal;
    }
    1
}

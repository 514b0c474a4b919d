//! Builtin command bodies and the name -> handler dispatch table.
//!
//! Each handler is a function over `(argv, environment) -> status`, the
//! shape named in the design notes, so the REPL (in-process, single-stage
//! case) and the worker re-entry point (in-pipeline case) can share the
//! same entry point.

use crate::env::Environment;
use crate::model::Error;
use std::io::Write;

pub type BuiltinFn = fn(&[String], &mut dyn Environment) -> i32;

/// Looks up a builtin by name. `argv[0]` is the name; the full argv
/// (including `argv[0]`) is what gets passed to the handler.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    match name {
        "exit" => Some(exit),
        "cd" => Some(cd),
        "echo" => Some(echo),
        "pwd" => Some(pwd),
        _ => None,
    }
}

/// `exit [code]` -- terminates the whole process. Never returns on the
/// success path.
fn exit(argv: &[String], _env: &mut dyn Environment) -> i32 {
    match argv.len() {
        1 => std::process::exit(0),
        2 => match argv[1].parse::<i32>() {
            Ok(code) => std::process::exit(code),
            Err(_) => {
                eprintln!("{}", Error::exit_numeric_argument_required());
                1
            }
        },
        _ => {
            eprintln!("{}", Error::exit_too_many_args());
            1
        }
    }
}

/// `cd [path]`
fn cd(argv: &[String], env: &mut dyn Environment) -> i32 {
    let target = match argv.get(1).map(String::as_str) {
        None => env.get("HOME"),
        Some("-") => match env.get("OLDPWD") {
            Some(old) => Some(old),
            None => {
                eprintln!("{}", Error::cd_oldpwd_not_set());
                return 1;
            }
        },
        Some("~") => env.get("HOME"),
        Some(path) => Some(path.to_string()),
    };

    let Some(target) = target else {
        eprintln!("cd: HOME not set");
        return 1;
    };

    let previous = std::env::current_dir().ok();

    if std::env::set_current_dir(&target).is_err() {
        eprintln!("{}", Error::cd_no_such_file(&target));
        return 1;
    }

    if let Some(previous) = previous {
        env.set("OLDPWD", &previous.to_string_lossy());
    }
    if let Ok(new_cwd) = std::env::current_dir() {
        env.set("PWD", &new_cwd.to_string_lossy());
    }

    0
}

/// `echo args...`
fn echo(argv: &[String], _env: &mut dyn Environment) -> i32 {
    let rendered = argv[1..].join(" ");
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "{rendered}");
    0
}

/// `pwd`
fn pwd(_argv: &[String], _env: &mut dyn Environment) -> i32 {
    match std::env::current_dir() {
        Ok(dir) => {
            println!("{}", dir.display());
            0
        }
        Err(err) => {
            eprintln!("pwd: {err}");
            1
        }
    }
}

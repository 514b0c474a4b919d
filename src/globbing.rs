//! Glob expansion: replaces each argv word containing a wildcard
//! metacharacter with the sorted list of matching pathnames.

use crate::env::Environment;
use crate::parser::{CommandSpec, Pipeline};

const METACHARS: [char; 3] = ['*', '?', '['];

/// Expands the argv of every stage in a pipeline. Redirection filenames are
/// never touched.
pub fn expand_pipeline(pipeline: Pipeline, env: &dyn Environment) -> Pipeline {
    Pipeline(
        pipeline
            .0
            .into_iter()
            .map(|spec| expand_spec(spec, env))
            .collect(),
    )
}

fn expand_spec(mut spec: CommandSpec, env: &dyn Environment) -> CommandSpec {
    let mut expanded = Vec::with_capacity(spec.argv.len());
    for word in spec.argv.drain(..) {
        expanded.extend(expand_word(word, env));
    }
    spec.argv = expanded;
    spec
}

/// Expands a single word. Falls back to the original word, untouched, on
/// no match, a malformed pattern, or any underlying I/O error.
fn expand_word(word: String, env: &dyn Environment) -> Vec<String> {
    if !word.contains(METACHARS) {
        return vec![word];
    }

    let pattern = apply_tilde(&word, env);

    let entries = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(_) => return vec![word],
    };

    let mut matches: Vec<String> = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => match path.into_os_string().into_string() {
                Ok(s) => matches.push(s),
                Err(_) => return vec![word],
            },
            Err(_) => return vec![word],
        }
    }

    if matches.is_empty() {
        return vec![word];
    }

    matches.sort();
    matches
}

/// Expands a leading `~` to `$HOME`, if set; otherwise leaves the word
/// alone. Only a bare leading tilde is handled -- `~user` is not supported.
fn apply_tilde(word: &str, env: &dyn Environment) -> String {
    if let Some(rest) = word.strip_prefix('~') {
        if let Some(home) = env.get("HOME") {
            return format!("{home}{rest}");
        }
    }
    word.to_string()
}

//! The shell's view of process-global mutable state: environment variables
//! and the status recorder. Kept behind a trait, the same indirection the
//! teacher uses for process spawning (`process::Process`/`ProcessSpawner`),
//! so tests can substitute an in-memory map instead of mutating the real
//! process environment.

use std::collections::HashMap;

/// An environment variable map the shell can read and write.
pub trait Environment {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// The real process environment, backed by `std::env`.
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        // SAFETY: the shell is single-threaded; nothing else in this
        // process observes environment variables concurrently with this
        // call.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

/// An in-memory environment, for tests that want to observe what the
/// shell would have written without touching the real process state.
#[derive(Default)]
pub struct InMemoryEnvironment {
    vars: HashMap<String, String>,
}

impl InMemoryEnvironment {
    pub fn new() -> InMemoryEnvironment {
        InMemoryEnvironment::default()
    }
}

impl Environment for InMemoryEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

/// Records the exit status of the most recent foreground pipeline into the
/// `?` environment entry. No other variable is touched here.
pub fn record_status(env: &mut dyn Environment, status: i32) {
    env.set("?", &status.to_string());
}

//! Common data model: the shell's error type and result alias.

/// Which stage of the shell produced an error.
///
/// Mirrors the taxonomy the shell uses to decide how to recover: a `Parse`
/// or `Builtin` error discards the current line and returns to the prompt;
/// `Syscall` tears down a partially-built pipeline first; `Child` reports a
/// command-not-found diagnostic formatted for a spawned stage (it carries
/// its own 127 status rather than folding into the generic `Syscall`
/// bucket); `Unrecoverable` ends the shell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Parse,
    Syscall,
    Child,
    Builtin,
    Unrecoverable,
}

/// Error emitted by the shell.
#[derive(Debug)]
pub struct Error {
    kind: Kind,
    reason: String,
}

/// Result of an operation.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new instance of error with an explicit kind.
    pub fn new(kind: Kind, reason: impl Into<String>) -> Error {
        Error {
            kind,
            reason: reason.into(),
        }
    }

    /// The error's category.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The `?` status this error should be recorded as, per the error
    /// handling design (section 7): parse errors record 2, a command not
    /// found records 127 (the canonical exec-not-found status), everything
    /// else that reaches the REPL records 1. `Unrecoverable` never reaches
    /// the recorder -- the shell exits first.
    pub fn status(&self) -> i32 {
        match self.kind {
            Kind::Parse => 2,
            Kind::Child => 127,
            Kind::Syscall | Kind::Builtin | Kind::Unrecoverable => 1,
        }
    }

    pub fn parse(reason: impl Into<String>) -> Error {
        Error::new(Kind::Parse, reason)
    }

    pub fn unterminated_quote() -> Error {
        Error::new(Kind::Parse, "dsh: unmatched quote")
    }

    pub fn word_too_long() -> Error {
        Error::new(Kind::Parse, "dsh: word too long")
    }

    pub fn missing_redirection_target() -> Error {
        Error::new(Kind::Parse, "dsh: missing filename for redirection")
    }

    pub fn empty_command_in_pipeline() -> Error {
        Error::new(Kind::Parse, "dsh: empty command in pipeline")
    }

    pub fn syscall(primitive: &str, reason: &str) -> Error {
        Error::new(Kind::Syscall, format!("dsh: {primitive}: {reason}"))
    }

    pub fn command_not_found(name: &str) -> Error {
        Error::new(Kind::Child, format!("command not found: {name}"))
    }

    pub fn cd_no_such_file(arg: &str) -> Error {
        Error::new(Kind::Builtin, format!("cd: {arg}: No such file or directory"))
    }

    pub fn cd_oldpwd_not_set() -> Error {
        Error::new(Kind::Builtin, "cd: OLDPWD not set")
    }

    pub fn exit_too_many_args() -> Error {
        Error::new(Kind::Builtin, "exit: too many arguments")
    }

    pub fn exit_numeric_argument_required() -> Error {
        Error::new(Kind::Builtin, "exit: numeric argument required")
    }

    pub fn unrecoverable(reason: impl Into<String>) -> Error {
        Error::new(Kind::Unrecoverable, reason)
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::new(Kind::Syscall, format!("dsh: {err}"))
    }
}

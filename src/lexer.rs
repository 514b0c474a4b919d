//! Scanner implementation: turns a raw line into a flat token stream,
//! honoring quoting, escaping, and the shell's small operator set.

use crate::model::{Error, Result};
use std::collections::VecDeque;

/// A word longer than this is rejected with `WordTooLong`. Comfortably
/// above the 1024-byte floor the spec requires.
const MAX_WORD_LEN: usize = 4096;

/// Kind of a scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Pipe,
    RedirIn,
    RedirOut,
    RedirAppend,
}

/// Scans the command line, returning the flat token stream or a parse
/// error (unterminated quote/escape, or a word over the length limit).
pub fn scan(line: &str) -> Result<VecDeque<Token>> {
    let mut lexer = Lexer::new(line);
    lexer.run()?;
    Ok(lexer.out)
}

/// Lexer for the command line.
struct Lexer {
    /// buffer for constructing Word tokens.
    buff: String,

    /// whether we're inside a Word token.
    inside: bool,

    in_single: bool,
    in_double: bool,
    escaped: bool,

    /// input contains the remaining, not-yet-consumed characters.
    input: VecDeque<char>,

    /// contains the stream of tokens produced so far.
    out: VecDeque<Token>,
}

impl Lexer {
    /// creates a new lexer instance.
    fn new(input: &str) -> Lexer {
        Lexer {
            buff: String::new(),
            inside: false,
            in_single: false,
            in_double: false,
            escaped: false,
            input: input.chars().collect(),
            out: VecDeque::new(),
        }
    }

    /// runs the scanner to completion.
    fn run(self: &mut Self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) => {
                    self.advance();
                    self.process_current(c)?;
                }
                None => break,
            }
        }
        if self.in_single || self.in_double || self.escaped {
            return Err(Error::unterminated_quote());
        }
        self.leave();
        Ok(())
    }

    /// processes a single character of the input stream.
    fn process_current(self: &mut Self, c: char) -> Result<()> {
        if self.escaped {
            self.push(c)?;
            self.escaped = false;
            return Ok(());
        }
        if c == '\\' && !self.in_single {
            self.escaped = true;
            return Ok(());
        }
        if !self.in_single && !self.in_double {
            if c == ' ' || c == '\t' {
                self.leave();
                return Ok(());
            }
            if c == '|' {
                self.leave_and_push_back(Token::Pipe);
                return Ok(());
            }
            if c == '<' {
                self.leave_and_push_back(Token::RedirIn);
                return Ok(());
            }
            if c == '>' {
                if let Some('>') = self.peek() {
                    self.advance();
                    self.leave_and_push_back(Token::RedirAppend);
                } else {
                    self.leave_and_push_back(Token::RedirOut);
                }
                return Ok(());
            }
        }
        if c == '\'' && !self.in_double {
            self.in_single = !self.in_single;
            self.inside = true;
            return Ok(());
        }
        if c == '"' && !self.in_single {
            self.in_double = !self.in_double;
            self.inside = true;
            return Ok(());
        }
        self.push(c)
    }

    /// peek returns the next character in input without advancing.
    fn peek(self: &mut Self) -> Option<char> {
        self.input.front().copied()
    }

    /// advance discards the current input character.
    fn advance(self: &mut Self) {
        let _ = self.input.pop_front();
    }

    /// appends a character to the in-progress word, enforcing the length
    /// limit.
    fn push(self: &mut Self, c: char) -> Result<()> {
        if self.buff.len() >= MAX_WORD_LEN {
            return Err(Error::word_too_long());
        }
        self.inside = true;
        self.buff.push(c);
        Ok(())
    }

    /// leaves the current word (if any) and pushes back an operator token.
    fn leave_and_push_back(self: &mut Self, token: Token) {
        self.leave();
        self.out.push_back(token);
    }

    /// gracefully leaves the current Word state, emitting a token if the
    /// buffer is non-empty.
    fn leave(self: &mut Self) {
        self.inside = false;
        if !self.buff.is_empty() {
            self.out.push_back(Token::Word(std::mem::take(&mut self.buff)));
        }
    }
}

//! The Brainfuck execution engine: validation, the tape, the loop stack, and
//! command dispatch.

use std::collections::HashMap;
use std::io::{self, BufRead, Read, Write};

use crate::scanner::{Cursor, Scanner};
use crate::token::Token;

/// Initial tape length, in cells, when none is configured. The tape grows on
/// demand, so this only sets where growth starts.
pub const DEFAULT_TAPE_LEN: usize = 32;

/// Errors that can occur while validating or interpreting Brainfuck code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The program contained no bytes at all.
    #[error("no commands to run")]
    EmptyProgram,

    /// `[` and `]` counts differ (validation), or a `]` was reached with no
    /// open loop (runtime, wrapped in [`Error::At`]).
    #[error("loop openings/closing ([/]) count does not match")]
    UnbalancedLoop,

    /// A NUL byte was encountered in the source.
    #[error("illegal character NUL")]
    IllegalCharacter,

    /// The tape pointer would have moved below cell zero.
    #[error("array index can't be less than zero")]
    NegativeIndex,

    /// The value supplied for `,` could not be parsed as an integer.
    #[error("invalid input: {0}")]
    InvalidInput(#[source] std::num::ParseIntError),

    /// Registering a command character that is reserved or already taken.
    #[error("duplicate command")]
    DuplicateCommand,

    /// Reading the program source failed before execution began.
    #[error("failed reading the source: {0}")]
    SourceRead(#[source] io::Error),

    /// The output sink rejected the produced output.
    #[error("failed writing to the output: {0}")]
    OutputWrite(#[source] io::Error),

    /// An error bound to the scan position it occurred at. `line` is the
    /// byte offset of the start of the current line, `offset` the absolute
    /// byte offset of the failure.
    #[error("{source} at {line}:{offset}")]
    At {
        #[source]
        source: Box<Error>,
        line: usize,
        offset: usize,
    },
}

impl Error {
    pub(crate) fn at(self, cursor: Cursor) -> Error {
        Error::At {
            source: Box::new(self),
            line: cursor.line_offset,
            offset: cursor.offset,
        }
    }
}

type CommandFn = Box<dyn FnMut(&mut i32)>;

/// A streaming Brainfuck interpreter. It scans each command and runs it
/// right away against a tape of signed 32-bit cells.
///
/// Construction reads the whole program and validates it (empty command set,
/// loop openings/closings balance) before any cell is touched. The tape
/// doubles whenever the pointer passes its end, so well-formed programs are
/// never halted by a capacity limit.
///
/// On execution, it fails on moving the pointer below zero and on
/// encountering a NUL character.
pub struct Interpreter<W> {
    scanner: Scanner,
    out: W,
    input: Option<Box<dyn BufRead>>,

    tape: Vec<i32>,
    ptr: usize,
    loop_stack: Vec<Cursor>,
    commands: HashMap<char, CommandFn>,
}

impl<W> std::fmt::Debug for Interpreter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("tape", &self.tape)
            .field("ptr", &self.ptr)
            .field("loop_stack", &self.loop_stack)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter reading the whole program from `src` and
    /// delivering output to `out`. Fails on a source read error or when
    /// validation rejects the program.
    pub fn new(src: impl Read, out: W) -> Result<Interpreter<W>, Error> {
        Interpreter::new_with_tape_len(src, out, DEFAULT_TAPE_LEN)
    }

    /// Same as [`Interpreter::new`] with an explicit initial tape length.
    /// The tape still grows on demand past `tape_len`.
    pub fn new_with_tape_len(
        mut src: impl Read,
        out: W,
        tape_len: usize,
    ) -> Result<Interpreter<W>, Error> {
        let mut buf = Vec::new();
        src.read_to_end(&mut buf).map_err(Error::SourceRead)?;

        validate(&buf)?;

        let mut scanner = Scanner::new(buf);
        scanner.next()?;

        Ok(Interpreter {
            scanner,
            out,
            input: None,
            tape: vec![0; tape_len.max(1)],
            ptr: 0,
            loop_stack: Vec::new(),
            commands: HashMap::new(),
        })
    }

    /// Attaches the collaborator consumed by `,`. Each `,` reads one line
    /// and parses it as an `i32`; end of input leaves the cell unchanged.
    pub fn set_input(&mut self, input: impl BufRead + 'static) {
        self.input = Some(Box::new(input));
    }

    /// Associates a callback with a command character. The callback receives
    /// a mutable reference to the cell under the tape pointer every time the
    /// character is executed. Fails with [`Error::DuplicateCommand`] when
    /// `cmd` is one of the eight reserved characters or already registered.
    pub fn add_command(
        &mut self,
        cmd: char,
        f: impl FnMut(&mut i32) + 'static,
    ) -> Result<(), Error> {
        if Token::is_reserved(cmd) || self.commands.contains_key(&cmd) {
            return Err(Error::DuplicateCommand);
        }

        self.commands.insert(cmd, Box::new(f));
        Ok(())
    }

    /// Unregisters a command character. Characters that were never
    /// registered are a no-op.
    pub fn remove_command(&mut self, cmd: char) {
        self.commands.remove(&cmd);
    }

    /// Reads and executes each command until it reaches EOF, then delivers
    /// the accumulated output to the sink in a single write. A failed run
    /// delivers nothing.
    pub fn exec(&mut self) -> Result<(), Error> {
        let mut res = String::new();

        loop {
            self.scanner.skip_whitespace()?;

            // determine the token value, then advance past it
            let Some(ch) = self.scanner.ch() else { break };
            let pos = self.scanner.cursor();
            self.scanner.next()?;

            match Token::from_byte(ch) {
                Some(Token::Add) => {
                    let cell = &mut self.tape[self.ptr];
                    *cell = cell.wrapping_add(1);
                }
                Some(Token::Sub) => {
                    let cell = &mut self.tape[self.ptr];
                    *cell = cell.wrapping_sub(1);
                }
                Some(Token::Right) => {
                    self.ptr += 1;
                    if self.ptr >= self.tape.len() {
                        // grow instead of failing; existing cells keep their
                        // values and new cells start at zero
                        let len = (self.tape.len() * 2).max(self.ptr + 1);
                        self.tape.resize(len, 0);
                    }
                }
                Some(Token::Left) => {
                    if self.ptr == 0 {
                        return Err(Error::NegativeIndex);
                    }
                    self.ptr -= 1;
                }
                Some(Token::LoopStart) => {
                    // always push, even when the body will run zero times;
                    // the saved read offset points back at the bracket so a
                    // later seek re-reads it
                    self.loop_stack.push(Cursor {
                        offset: pos.offset.saturating_sub(1),
                        read_offset: pos.offset,
                        line_offset: pos.line_offset,
                    });
                }
                Some(Token::LoopEnd) => {
                    // always pop; re-entering the body re-reads the `[`,
                    // which pushes a fresh snapshot
                    let Some(saved) = self.loop_stack.pop() else {
                        return Err(Error::UnbalancedLoop.at(pos));
                    };

                    // the cell is checked here and only here, so a loop
                    // entered on a zero cell still runs its body once
                    if self.tape[self.ptr] != 0 {
                        self.scanner.seek(saved);
                        self.scanner.next()?;
                    }
                }
                Some(Token::Output) => {
                    let cell = self.tape[self.ptr];
                    res.push(char::from_u32(cell as u32).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                Some(Token::Input) => {
                    self.read_input()?;
                }
                None => {
                    // unknown characters are comments; extension commands
                    // are dispatched below
                }
            }

            if let Some(f) = self.commands.get_mut(&char::from(ch)) {
                f(&mut self.tape[self.ptr]);
            }
        }

        self.out
            .write_all(res.as_bytes())
            .map_err(Error::OutputWrite)?;

        Ok(())
    }

    fn read_input(&mut self) -> Result<(), Error> {
        // no input collaborator behaves like end of input
        let Some(input) = self.input.as_mut() else {
            return Ok(());
        };

        let mut line = String::new();
        // a failed read is treated the same as end of input
        let n = input.read_line(&mut line).unwrap_or(0);
        let text = line.trim_end_matches(['\r', '\n']);
        if n > 0 && !text.is_empty() {
            self.tape[self.ptr] = text.parse().map_err(Error::InvalidInput)?;
        }

        Ok(())
    }
}

/// Validates the command source: rejects an empty command set and programs
/// whose loop openings and closings do not balance. Ordering violations (a
/// `]` before any `[`) are left for the loop stack to catch at execution
/// time.
fn validate(src: &[u8]) -> Result<(), Error> {
    if src.is_empty() {
        return Err(Error::EmptyProgram);
    }

    let mut depth = 0i64;
    for &b in src {
        match b {
            b'[' => depth += 1,
            b']' => depth -= 1,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(Error::UnbalancedLoop);
    }

    Ok(())
}

//! A streaming Brainfuck interpreter.
//!
//! This crate reads a series of Brainfuck commands from any [`std::io::Read`]
//! source and writes the program's output to any [`std::io::Write`] sink.
//! Commands are scanned and executed one at a time; `[`/`]` control flow is
//! driven by seeking the scanner back to saved cursor positions, so loop
//! bodies are re-scanned on every iteration.
//!
//! Features and behaviors:
//! - Tape of signed 32-bit cells, zero-initialized, grown on demand by
//!   doubling; programs are never halted by a capacity limit.
//! - Strict lower bound: moving left from cell 0 is an error.
//! - Validation before execution: empty programs and unbalanced loop
//!   brackets are rejected before any cell is touched.
//! - Input `,` reads one line from an optional input source and parses it
//!   as an integer; end of input leaves the cell unchanged.
//! - Output `.` is accumulated and delivered to the sink once, after the
//!   run completes.
//! - Extension commands: associate a callback with any non-reserved
//!   character via [`Interpreter::add_command`].
//!
//! Quick start:
//!
//! ```
//! use bf::Interpreter;
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
//! let mut out = Vec::new();
//! let mut bf = Interpreter::new(code.as_bytes(), &mut out).expect("program should validate");
//! bf.exec().expect("program should run");
//! drop(bf);
//! assert_eq!(out, b"Hello World!\n");
//! ```

mod interpreter;
mod scanner;
pub mod token;

pub use interpreter::{DEFAULT_TAPE_LEN, Error, Interpreter};
pub use token::Token;

/// Interpreter context: arena, variables, stacks and the line entry point

use std::io::{self, Write};

use crate::arena::{Arena, Val};
use crate::error::Result;
use crate::host::HostFn;
use crate::vars::{Var, VarTable};

/// Maximum nesting of `for` loops
pub const MAX_LOOP_DEPTH: usize = 8;

/// Maximum nesting of `gosub` calls
pub const MAX_CALL_DEPTH: usize = 8;

/// One active `for` loop: iterator slot, terminal, step and the arena
/// offset of the statement following the loop header
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LoopFrame {
    pub var: u8,
    pub limit: Val,
    pub step: Val,
    pub body: usize,
}

/// A complete interpreter: one fixed arena, one variable table, the loop
/// and call stacks, and an output sink for `print`
///
/// All interpreter state lives here; independent instances are fully
/// isolated. The default sink is standard output; tests typically supply a
/// `Vec<u8>` and recover it with [`Interpreter::into_output`].
pub struct Interpreter<W = io::Stdout> {
    pub(crate) arena: Arena,
    pub(crate) vars: VarTable<W>,
    pub(crate) loops: [LoopFrame; MAX_LOOP_DEPTH],
    pub(crate) loop_head: usize,
    pub(crate) calls: [usize; MAX_CALL_DEPTH],
    pub(crate) call_head: usize,
    pub(crate) running: bool,
    /// Arena offset where the stored program ends; immediate-line tokens
    /// live at and beyond this offset
    pub(crate) prog_end: usize,
    pub(crate) out: W,
}

impl Interpreter<io::Stdout> {
    /// Create an interpreter printing to standard output
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Create an interpreter printing to the given sink
    pub fn with_output(out: W) -> Self {
        Self {
            arena: Arena::new(),
            vars: VarTable::new(),
            loops: [LoopFrame::default(); MAX_LOOP_DEPTH],
            loop_head: 0,
            calls: [0; MAX_CALL_DEPTH],
            call_head: 0,
            running: false,
            prog_end: 0,
            out,
        }
    }

    /// Consume the interpreter and return its output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// The output sink; host functions write through this
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// The arena, for inspecting cursors and capacity
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Whether a `run` is currently in progress
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Register a named host function, claiming a variable slot
    pub fn register(&mut self, name: &str, f: HostFn<W>) -> Result<()> {
        let idx = self.vars.find_or_create(name.as_bytes())?;
        self.vars.set_func(idx, f)
    }

    /// Iterate live variable slots with their indices
    pub fn variables(&self) -> impl Iterator<Item = (usize, &Var<W>)> {
        self.vars.iter()
    }

    /// Discard the stored program, truncating the arena to empty
    ///
    /// Variables keep their values; chunks are never deleted individually.
    pub fn reset_program(&mut self) {
        self.arena.reset();
        self.prog_end = 0;
    }

    /// Accept one input line
    ///
    /// A line whose first lexeme is a positive integer is stored as a
    /// tokenized chunk under that line number; anything else is tokenized
    /// into the scratch region, executed immediately, and discarded.
    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        // Every line lexes at the program boundary, so tokens left behind
        // by a failed earlier line are overwritten before they can run.
        self.arena.end = self.prog_end;
        self.arena.cur = self.prog_end;

        match split_line_number(line) {
            Some((number, rest)) => {
                let header = self.arena.put_chunk(number)?;
                self.lex_line(rest)?;
                let len = self.arena.end - header;
                self.arena.patch_chunk_len(header, len)?;
                self.prog_end = self.arena.end;
            }
            None => {
                self.lex_line(line)?;
                self.arena.cur = self.prog_end;
                // Frames from an earlier immediate line would point into
                // scratch that no longer exists
                self.loop_head = 0;
                self.call_head = 0;
                let result = self.exec_immediate();
                self.arena.end = self.prog_end;
                self.arena.cur = self.prog_end;
                result?;
            }
        }
        Ok(())
    }
}

/// Split a leading line number off an input line
///
/// Returns the number and the remainder when the line starts (after
/// whitespace) with digits forming a positive 16-bit value; `None` sends
/// the whole line down the immediate path.
fn split_line_number(line: &str) -> Option<(u16, &str)> {
    let trimmed = line.trim_start_matches([' ', '\t', '\r']);
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    match trimmed[..digits].parse::<u32>() {
        Ok(n) if (1..=u16::MAX as u32).contains(&n) => Some((n as u16, &trimmed[digits..])),
        _ => None,
    }
}

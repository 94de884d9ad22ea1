/// Statement dispatcher and control-flow engine

use std::io::Write;

use crate::error::{BasicError, Result};
use crate::interp::{Interpreter, LoopFrame, MAX_CALL_DEPTH, MAX_LOOP_DEPTH};
use crate::token::Tok;

/// What one dispatched statement did to the control flow
enum Stmt {
    /// Fall through to the next statement
    Continue,
    /// Consumed a line terminator
    Eof,
    /// Stop the innermost statement loop
    Stop,
}

impl<W: Write> Interpreter<W> {
    /// Drive an immediate line's statements until its terminator
    pub(crate) fn exec_immediate(&mut self) -> Result<()> {
        loop {
            match self.dispatch()? {
                Stmt::Continue => {}
                Stmt::Eof | Stmt::Stop => return Ok(()),
            }
        }
    }

    /// The `run` engine: execute the chunk store from the top
    ///
    /// Statements are dispatched until `end`, the cursor reaching the end
    /// of the stored program, or an error. Line terminators are consumed
    /// and execution falls through chunk to chunk.
    fn run_program(&mut self) -> Result<()> {
        if self.running {
            return Err(BasicError::NestedRun);
        }
        self.running = true;
        self.loop_head = 0;
        self.call_head = 0;

        let save = self.arena.cur;
        self.arena.cur = 0;
        let result = self.run_loop();
        self.arena.cur = save;
        self.running = false;
        result
    }

    fn run_loop(&mut self) -> Result<()> {
        while self.running && self.arena.cur < self.prog_end {
            if let Stmt::Stop = self.dispatch()? {
                break;
            }
        }
        Ok(())
    }

    /// Recognize the statement head token at the cursor and execute it
    fn dispatch(&mut self) -> Result<Stmt> {
        match self.arena.peek()? {
            Tok::Chunk => {
                self.arena.get_chunk()?;
                Ok(Stmt::Continue)
            }
            Tok::Eof => {
                self.arena.cur += 1;
                Ok(Stmt::Eof)
            }
            Tok::Print => {
                self.arena.cur += 1;
                self.stmt_print()?;
                Ok(Stmt::Continue)
            }
            Tok::Run => {
                self.arena.cur += 1;
                self.run_program()?;
                Ok(Stmt::Continue)
            }
            Tok::Goto => {
                self.arena.cur += 1;
                let target = self.branch_target()?;
                self.arena.cur = target;
                Ok(Stmt::Continue)
            }
            Tok::Gosub => {
                self.arena.cur += 1;
                self.stmt_gosub()?;
                Ok(Stmt::Continue)
            }
            Tok::Return => {
                self.arena.cur += 1;
                Ok(self.stmt_return())
            }
            Tok::For => {
                self.arena.cur += 1;
                self.stmt_for()?;
                Ok(Stmt::Continue)
            }
            Tok::Next => {
                self.arena.cur += 1;
                self.stmt_next()?;
                Ok(Stmt::Continue)
            }
            Tok::If => {
                self.arena.cur += 1;
                self.stmt_if()
            }
            Tok::Else => {
                self.arena.cur += 1;
                self.skip_branch(false)?;
                Ok(Stmt::Continue)
            }
            Tok::Colon => {
                self.arena.cur += 1;
                Ok(Stmt::Continue)
            }
            Tok::End => {
                self.arena.cur += 1;
                self.running = false;
                Ok(Stmt::Continue)
            }
            // Anything else is a bare expression, evaluated for its side
            // effects (assignment included)
            _ => {
                self.expr()?;
                Ok(Stmt::Continue)
            }
        }
    }

    /// `print`: string literals raw, expression values with a trailing
    /// space, items separated by `;`, newline after the list
    fn stmt_print(&mut self) -> Result<()> {
        loop {
            if self.arena.cur_is(Tok::Str)? {
                let s = self.arena.get_str()?;
                self.out.write_all(s)?;
            } else {
                let v = self.expr()?;
                write!(self.out, "{v} ")?;
            }
            if !self.arena.next_is(Tok::Semi)? {
                break;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Read a literal line number and locate its chunk
    fn branch_target(&mut self) -> Result<usize> {
        let line = self.arena.get_lit()? as u16;
        self.find_line(line)
    }

    fn stmt_gosub(&mut self) -> Result<()> {
        let target = self.branch_target()?;
        if self.call_head == MAX_CALL_DEPTH {
            return Err(BasicError::StackOverflow);
        }
        self.calls[self.call_head] = self.arena.cur;
        self.call_head += 1;
        self.arena.cur = target;
        Ok(())
    }

    fn stmt_return(&mut self) -> Stmt {
        if self.call_head == 0 {
            // Returning from the outermost level stops the engine
            return Stmt::Stop;
        }
        self.call_head -= 1;
        self.arena.cur = self.calls[self.call_head];
        Stmt::Continue
    }

    fn stmt_for(&mut self) -> Result<()> {
        if self.loop_head == MAX_LOOP_DEPTH {
            return Err(BasicError::NextWithoutFor);
        }
        let var = self.arena.get_var_idx()?;
        self.arena.expect(Tok::Assign)?;
        let init = self.expr()?;
        self.vars.set_value(var, init)?;
        self.arena.expect(Tok::To)?;
        let limit = self.expr()?;
        let step = if self.arena.next_is(Tok::Step)? {
            self.expr()?
        } else {
            1.0
        };
        self.loops[self.loop_head] = LoopFrame {
            var,
            limit,
            step,
            body: self.arena.cur,
        };
        self.loop_head += 1;
        Ok(())
    }

    /// Step the topmost loop's iterator; jump back while it has not
    /// passed the terminal, pop once it has
    ///
    /// The check happens here, not at `for`, so every loop body runs at
    /// least once.
    fn stmt_next(&mut self) -> Result<()> {
        if self.loop_head == 0 {
            return Err(BasicError::NextWithoutFor);
        }
        let frame = self.loops[self.loop_head - 1];
        let v = self.vars.value(frame.var)? + frame.step;
        self.vars.set_value(frame.var, v)?;

        if (frame.step > 0.0 && v <= frame.limit) || (frame.step < 0.0 && v >= frame.limit) {
            self.arena.cur = frame.body;
        } else {
            self.loop_head -= 1;
        }
        Ok(())
    }

    fn stmt_if(&mut self) -> Result<Stmt> {
        let v = self.expr()?;
        self.arena.expect(Tok::Then)?;
        if v != 0.0 {
            // One statement dispatched inline; its flow propagates
            self.dispatch()
        } else {
            self.skip_branch(true)?;
            Ok(Stmt::Continue)
        }
    }

    /// Skip tokens to the end of the statement: stop before `Eof` or `:`,
    /// and when `to_else` is set, consume an `else` and stop after it
    fn skip_branch(&mut self, to_else: bool) -> Result<()> {
        loop {
            match self.arena.peek()? {
                Tok::Eof | Tok::Colon => return Ok(()),
                Tok::Else if to_else => {
                    self.arena.cur += 1;
                    return Ok(());
                }
                _ => {
                    self.arena.skip_token()?;
                }
            }
        }
    }
}

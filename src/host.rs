/// Host-function interface and the builtin set

use std::io::Write;
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::arena::Val;
use crate::error::Result;
use crate::interp::Interpreter;
use crate::token::Tok;

/// A native function callable from expressions
///
/// The evaluator consumes the opening parenthesis before the call and the
/// closing one after it; in between, the function reads its own arguments
/// from the token stream with [`Interpreter::eval_arg`] and friends. The
/// number and shape of arguments is the function's own contract.
pub type HostFn<W> = fn(&mut Interpreter<W>) -> Result<Val>;

/// ANSI escapes for the screen-oriented builtins
mod ansi {
    pub const CLEAR: &str = "\x1b[2J\x1b[H";
    pub const CURSOR_SAVE: &str = "\x1b[s";
    pub const CURSOR_RESTORE: &str = "\x1b[u";
    pub const RESET: &str = "\x1b[0m";
}

/// Foreground color codes in plot-color order: black, blue, green, cyan,
/// red, magenta, yellow, white
const PLOT_COLORS: [u8; 8] = [30, 34, 32, 36, 31, 35, 33, 37];

static RND_STATE: AtomicU32 = AtomicU32::new(0x2545_F491);

/// Seed the `rnd` sequence; a zero seed is bumped to keep the generator
/// out of its fixed point
pub fn seed_rnd(seed: u32) {
    RND_STATE.store(seed | 1, Ordering::Relaxed);
}

impl<W: Write> Interpreter<W> {
    /// Evaluate one host-function argument from the token stream
    pub fn eval_arg(&mut self) -> Result<Val> {
        self.expr()
    }

    /// Consume the `,` between host-function arguments
    pub fn expect_arg_sep(&mut self) -> Result<()> {
        self.arena.expect(Tok::Comma)
    }

    /// Register the builtin host set: `rnd`, `putc`, `plot`, `cls`, `exit`
    pub fn register_builtins(&mut self) -> Result<()> {
        self.register("rnd", rnd)?;
        self.register("putc", putc)?;
        self.register("plot", plot)?;
        self.register("cls", cls)?;
        self.register("exit", exit)
    }
}

/// `rnd()`: uniform value in [0, 1) from a xorshift generator
pub fn rnd<W: Write>(_interp: &mut Interpreter<W>) -> Result<Val> {
    let mut x = RND_STATE.load(Ordering::Relaxed);
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    RND_STATE.store(x, Ordering::Relaxed);
    // 24 mantissa bits keep the quotient exact
    Ok((x >> 8) as Val / (1u32 << 24) as Val)
}

/// `putc(n)`: write one byte to the interpreter output
pub fn putc<W: Write>(interp: &mut Interpreter<W>) -> Result<Val> {
    let b = interp.eval_arg()? as i32 as u8;
    interp.output_mut().write_all(&[b])?;
    Ok(b as Val)
}

/// `plot(x, y, color)`: draw a colored cell at a terminal position
pub fn plot<W: Write>(interp: &mut Interpreter<W>) -> Result<Val> {
    let x = interp.eval_arg()? as i32;
    interp.expect_arg_sep()?;
    let y = interp.eval_arg()? as i32;
    interp.expect_arg_sep()?;
    let color = interp.eval_arg()? as i32;

    let bright = (color >= 8) as i32;
    let code = PLOT_COLORS[color.rem_euclid(8) as usize];
    let out = interp.output_mut();
    write!(out, "{}\x1b[{};{}H", ansi::CURSOR_SAVE, y, x * 2)?;
    write!(
        out,
        "\x1b[{bright};{code};7m  {}{}",
        ansi::RESET,
        ansi::CURSOR_RESTORE
    )?;
    out.flush()?;
    Ok(0.0)
}

/// `cls()`: clear the screen and home the cursor
pub fn cls<W: Write>(interp: &mut Interpreter<W>) -> Result<Val> {
    interp.output_mut().write_all(ansi::CLEAR.as_bytes())?;
    Ok(0.0)
}

/// `exit(n)`: terminate the process with the given status
pub fn exit<W: Write>(interp: &mut Interpreter<W>) -> Result<Val> {
    let code = interp.eval_arg()? as i32;
    process::exit(code);
}

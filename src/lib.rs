/*!
# picobasic

A tiny BASIC-like interpreter that tokenizes source lines into a fixed
2 KiB byte arena, built for memory-constrained environments and teaching.

## Features

- One input line at a time: numbered lines are stored as compact tokenized
  chunks, unnumbered lines execute immediately
- `run`, `goto`, `gosub`/`return`, `for`/`next` with `step`,
  `if`/`then`/`else`, `print`, assignment
- Arithmetic, comparison, logical and bitwise expressions with a
  precedence-climbing evaluator working directly on the bytecode
- Variable-width literal encoding: small integers cost one or two payload
  bytes, everything else round-trips bit-exactly
- Host functions registered by name and called from expressions, consuming
  their own arguments from the token stream

## Quick Start

```rust
use picobasic::Interpreter;

let mut basic = Interpreter::with_output(Vec::new());
basic.handle_line("10 for i = 1 to 3")?;
basic.handle_line("20 print i * i")?;
basic.handle_line("30 next")?;
basic.handle_line("run")?;

assert_eq!(basic.into_output(), b"1 \n4 \n9 \n");
# Ok::<(), picobasic::BasicError>(())
```

## Modules

- `arena`: fixed byte arena, cursors and the token/payload encodings
- `token`: token tags, lexeme table and operator precedence
- `vars`: bounded variable table
- `lexer`: text line tokenizer
- `chunk`: chunk store lookup and program listing
- `eval`: expression evaluator
- `exec`: statement dispatcher and the `run` engine
- `host`: host-function contract and the builtin set
- `interp`: the interpreter context
- `error`: error types and Result alias
*/

#![warn(missing_docs)]

/// Fixed byte arena, cursors and the token/payload encodings
pub mod arena;
/// Chunk store lookup and program listing
pub mod chunk;
/// Error types and Result alias
pub mod error;
/// Expression evaluator
mod eval;
/// Statement dispatcher and the `run` engine
mod exec;
/// Host-function contract and the builtin set
pub mod host;
/// The interpreter context
pub mod interp;
/// Text line tokenizer
mod lexer;
/// Token tags, lexeme table and operator precedence
pub mod token;
/// Bounded variable table
pub mod vars;

// Re-export common types
pub use arena::{Arena, Val, MEM_SIZE};
pub use error::{BasicError, Result};
pub use host::HostFn;
pub use interp::{Interpreter, MAX_CALL_DEPTH, MAX_LOOP_DEPTH};
pub use token::Tok;
pub use vars::{Var, VarKind, VarTable, VAR_COUNT, VAR_NAME_LEN};

/// Precedence-climbing expression evaluator over the token stream

use std::io::Write;

use crate::arena::Val;
use crate::error::{BasicError, Result};
use crate::interp::Interpreter;
use crate::token::{Tok, UNARY_PRECEDENCE};
use crate::vars::VarKind;

fn bool_val(b: bool) -> Val {
    if b {
        1.0
    } else {
        0.0
    }
}

impl<W: Write> Interpreter<W> {
    /// Evaluate one expression at the read cursor
    pub(crate) fn expr(&mut self) -> Result<Val> {
        self.eval_prec(0)
    }

    /// Climb binary operators of at least `min` precedence
    ///
    /// The last variable the primary parser read at this nesting level is
    /// remembered as the assignment candidate; `=` fails without one.
    fn eval_prec(&mut self, min: u8) -> Result<Val> {
        let mut lvalue = None;
        let mut v = self.primary(&mut lvalue)?;

        loop {
            let tok = self.arena.peek()?;
            if !tok.is_binop() {
                break;
            }
            let prec = tok.precedence().ok_or(BasicError::AssertFailed)?;
            if prec < min {
                break;
            }
            self.arena.cur += 1;

            let next_min = if tok.is_right_assoc() { prec } else { prec + 1 };
            let rhs = self.eval_prec(next_min)?;
            v = self.apply_binop(tok, v, rhs, lvalue)?;
        }

        Ok(v)
    }

    fn apply_binop(&mut self, tok: Tok, v1: Val, v2: Val, lvalue: Option<u8>) -> Result<Val> {
        let i1 = v1 as i32;
        let i2 = v2 as i32;
        let v = match tok {
            Tok::Plus => v1 + v2,
            Tok::Minus => v1 - v2,
            Tok::Mul => v1 * v2,
            // Division follows IEEE float behavior, not intercepted
            Tok::Div => v1 / v2,
            Tok::Mod => {
                if i2 == 0 {
                    return Err(BasicError::DivisionByZero);
                }
                i1.wrapping_rem(i2) as Val
            }
            Tok::Lt => bool_val(v1 < v2),
            Tok::Le => bool_val(v1 <= v2),
            Tok::Eq => bool_val(v1 == v2),
            Tok::Ne => bool_val(v1 != v2),
            Tok::Ge => bool_val(v1 >= v2),
            Tok::Gt => bool_val(v1 > v2),
            Tok::And => bool_val(v1 != 0.0 && v2 != 0.0),
            Tok::Or => bool_val(v1 != 0.0 || v2 != 0.0),
            Tok::BitAnd => (i1 & i2) as Val,
            Tok::BitOr => (i1 | i2) as Val,
            Tok::BitXor => (i1 ^ i2) as Val,
            // Shift counts are masked to the 32-bit width
            Tok::Shl => i1.wrapping_shl(i2 as u32) as Val,
            Tok::Shr => i1.wrapping_shr(i2 as u32) as Val,
            Tok::Pow => v1.powf(v2),
            Tok::Assign => {
                let slot = lvalue.ok_or(BasicError::NotLvalue)?;
                self.vars.set_value(slot, v2)?;
                v2
            }
            _ => return Err(BasicError::AssertFailed),
        };
        Ok(v)
    }

    /// Parse one primary: literal, variable or host call, unary operator,
    /// or parenthesized expression
    fn primary(&mut self, lvalue: &mut Option<u8>) -> Result<Val> {
        match self.arena.peek()? {
            Tok::Lit => self.arena.get_lit(),
            Tok::Var => {
                let idx = self.arena.get_var_idx()?;
                *lvalue = Some(idx);
                let f = match self.vars.kind(idx)? {
                    VarKind::Value(v) => return Ok(*v),
                    VarKind::Func(f) => *f,
                };
                // Host functions consume their own argument tokens
                // between the parentheses
                self.arena.expect(Tok::Open)?;
                let v = f(self)?;
                self.arena.expect(Tok::Close)?;
                Ok(v)
            }
            Tok::Minus => {
                self.arena.cur += 1;
                Ok(-self.eval_prec(UNARY_PRECEDENCE)?)
            }
            Tok::Not => {
                self.arena.cur += 1;
                Ok(bool_val(self.eval_prec(UNARY_PRECEDENCE)? == 0.0))
            }
            Tok::BitNot => {
                self.arena.cur += 1;
                Ok(!(self.eval_prec(UNARY_PRECEDENCE)? as i32) as Val)
            }
            Tok::Open => {
                self.arena.cur += 1;
                // A fresh nesting level: the inner lvalue candidate does
                // not escape, so `(a) = 1` is not assignable
                let v = self.eval_prec(0)?;
                self.arena.expect(Tok::Close)?;
                Ok(v)
            }
            _ => Err(BasicError::Expected("expression")),
        }
    }
}

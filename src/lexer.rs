/// Text line tokenizer

use std::io::Write;

use crate::arena::Val;
use crate::error::{BasicError, Result};
use crate::interp::Interpreter;
use crate::token::{self, Tok};

impl<W: Write> Interpreter<W> {
    /// Tokenize one source line, appending its tokens to the arena
    ///
    /// The stream is terminated by `Eof`. New variable slots may be
    /// allocated as a side effect. On failure the tokens already appended
    /// stay in place; the caller decides when they are overwritten.
    pub(crate) fn lex_line(&mut self, line: &str) -> Result<()> {
        let src = line.as_bytes();
        let mut p = 0;

        loop {
            while matches!(src.get(p), Some(b' ' | b'\t' | b'\r')) {
                p += 1;
            }
            #[cfg(feature = "trace-lex")]
            let (span_start, prev_end) = (p, self.arena.end());

            let b = match src.get(p) {
                Some(&b) => b,
                None => {
                    self.arena.put_tok(Tok::Eof)?;
                    break;
                }
            };

            if b.is_ascii_digit() || b == b'.' {
                let (v, used) = parse_number(&src[p..])?;
                self.arena.put_lit(v)?;
                p += used;
            } else if b == b'"' {
                let rest = &src[p + 1..];
                let close = rest
                    .iter()
                    .position(|&c| c == b'"')
                    .ok_or(BasicError::UnterminatedString)?;
                self.arena.put_str(&rest[..close])?;
                p += close + 2;
            } else if b == b'\'' {
                let code = *src.get(p + 1).ok_or(BasicError::UnterminatedString)?;
                if src.get(p + 2) != Some(&b'\'') {
                    return Err(BasicError::UnterminatedString);
                }
                self.arena.put_lit(code as Val)?;
                p += 3;
            } else if let Some((tok, len)) = token::match_longest(&src[p..]) {
                self.arena.put_tok(tok)?;
                p += len;
            } else if b.is_ascii_alphabetic() {
                let mut q = p;
                while matches!(src.get(q), Some(c) if c.is_ascii_alphanumeric()) {
                    q += 1;
                }
                let idx = self.vars.find_or_create(&src[p..q])?;
                self.arena.put_var(idx)?;
                p = q;
            } else {
                return Err(BasicError::Syntax(
                    String::from_utf8_lossy(&src[p..]).into_owned(),
                ));
            }

            #[cfg(feature = "trace-lex")]
            self.trace_token(src, span_start..p, prev_end);
        }

        Ok(())
    }

    /// Dump one emitted token's arena offset, source span and raw bytes
    #[cfg(feature = "trace-lex")]
    fn trace_token(&self, src: &[u8], span: std::ops::Range<usize>, prev_end: usize) {
        let text = String::from_utf8_lossy(&src[span]);
        let hex: String = self
            .arena
            .raw(prev_end, self.arena.end())
            .iter()
            .map(|b| format!("{b:02x} "))
            .collect();
        eprintln!("\x1b[36m{prev_end:5} | {text:10} | {hex}\x1b[0m");
    }
}

/// Longest-prefix numeric literal: digits, optional fraction, optional
/// exponent
fn parse_number(s: &[u8]) -> Result<(Val, usize)> {
    fn digits(s: &[u8], mut i: usize) -> usize {
        while matches!(s.get(i), Some(c) if c.is_ascii_digit()) {
            i += 1;
        }
        i
    }

    let mut end = digits(s, 0);
    if s.get(end) == Some(&b'.') {
        end = digits(s, end + 1);
    }
    if matches!(s.get(end), Some(b'e' | b'E')) {
        let mut e = end + 1;
        if matches!(s.get(e), Some(b'+' | b'-')) {
            e += 1;
        }
        let e2 = digits(s, e);
        if e2 > e {
            end = e2;
        }
    }

    let text = std::str::from_utf8(&s[..end]).map_err(|_| syntax(s))?;
    let v = text.parse::<Val>().map_err(|_| syntax(s))?;
    Ok((v, end))
}

fn syntax(rest: &[u8]) -> BasicError {
    BasicError::Syntax(String::from_utf8_lossy(rest).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Tok;

    fn lex(line: &str) -> Interpreter<Vec<u8>> {
        let mut interp = Interpreter::with_output(Vec::new());
        interp.lex_line(line).unwrap();
        interp
    }

    fn tags(interp: &mut Interpreter<Vec<u8>>) -> Vec<Tok> {
        let mut out = Vec::new();
        while interp.arena.cur() < interp.arena.end() {
            out.push(interp.arena.skip_token().unwrap());
        }
        out
    }

    #[test]
    fn test_empty_line_is_just_eof() {
        let mut interp = lex("   \t ");
        assert_eq!(tags(&mut interp), vec![Tok::Eof]);
    }

    #[test]
    fn test_expression_tokens() {
        let mut interp = lex("1 + 2 * 3");
        assert_eq!(
            tags(&mut interp),
            vec![Tok::Lit, Tok::Plus, Tok::Lit, Tok::Mul, Tok::Lit, Tok::Eof]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut interp = lex("for i = 1 to 3");
        assert_eq!(
            tags(&mut interp),
            vec![
                Tok::For,
                Tok::Var,
                Tok::Assign,
                Tok::Lit,
                Tok::To,
                Tok::Lit,
                Tok::Eof
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        let mut interp = lex("42 3.5 .25 1e3");
        assert_eq!(interp.arena.get_lit().unwrap(), 42.0);
        assert_eq!(interp.arena.get_lit().unwrap(), 3.5);
        assert_eq!(interp.arena.get_lit().unwrap(), 0.25);
        assert_eq!(interp.arena.get_lit().unwrap(), 1000.0);
    }

    #[test]
    fn test_string_literal() {
        let mut interp = lex("print \"hi there\"");
        assert!(interp.arena.next_is(Tok::Print).unwrap());
        assert_eq!(interp.arena.get_str().unwrap(), b"hi there");
    }

    #[test]
    fn test_char_literal() {
        let mut interp = lex("'A'");
        assert_eq!(interp.arena.get_lit().unwrap(), 65.0);
    }

    #[test]
    fn test_unterminated_string() {
        let mut interp = Interpreter::with_output(Vec::new());
        assert!(matches!(
            interp.lex_line("print \"oops"),
            Err(BasicError::UnterminatedString)
        ));
        assert!(matches!(
            interp.lex_line("'a"),
            Err(BasicError::UnterminatedString)
        ));
    }

    #[test]
    fn test_unclassifiable_byte_reports_remaining_input() {
        let mut interp = Interpreter::with_output(Vec::new());
        match interp.lex_line("1 + @rest") {
            Err(BasicError::Syntax(rest)) => assert_eq!(rest, "@rest"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_same_identifier_resolves_to_same_slot() {
        let mut interp = Interpreter::with_output(Vec::new());
        interp.lex_line("abc = 1").unwrap();
        interp.lex_line("abc + abc").unwrap();
        let mut slots = Vec::new();
        while interp.arena.cur() < interp.arena.end() {
            if interp.arena.cur_is(Tok::Var).unwrap() {
                slots.push(interp.arena.get_var_idx().unwrap());
            } else {
                interp.arena.skip_token().unwrap();
            }
        }
        assert_eq!(slots.len(), 3);
        assert!(slots.iter().all(|&s| s == slots[0]));
    }

    #[test]
    fn test_keyword_prefix_of_identifier_wins() {
        // Longest-match against the lexeme table runs before the
        // identifier rule, so "forx" is `for` + `x`
        let mut interp = lex("forx");
        assert_eq!(tags(&mut interp), vec![Tok::For, Tok::Var, Tok::Eof]);
    }

    #[test]
    fn test_lone_dot_is_a_syntax_error() {
        let mut interp = Interpreter::with_output(Vec::new());
        assert!(matches!(
            interp.lex_line("1 + ."),
            Err(BasicError::Syntax(_))
        ));
    }
}

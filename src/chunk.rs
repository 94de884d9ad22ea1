/// Chunk store operations: line lookup and program listing

use std::fmt::Write as _;
use std::io::Write;

use crate::error::{BasicError, Result};
use crate::interp::Interpreter;
use crate::token::Tok;

impl<W: Write> Interpreter<W> {
    /// Locate the chunk for a line number, returning its header offset
    ///
    /// Walks chunk headers from arena offset 0 in insertion order; the
    /// first chunk carrying the number wins. A zero-length header is
    /// arena corruption.
    pub(crate) fn find_line(&mut self, line: u16) -> Result<usize> {
        let save = self.arena.cur;
        let found = self.walk_chunks(line);
        self.arena.cur = save;
        found
    }

    fn walk_chunks(&mut self, line: u16) -> Result<usize> {
        self.arena.cur = 0;
        while self.arena.cur < self.prog_end {
            let at = self.arena.cur;
            if !self.arena.cur_is(Tok::Chunk)? {
                return Err(BasicError::LineNotFound);
            }
            let (len, number) = self.arena.get_chunk()?;
            if len == 0 {
                return Err(BasicError::AssertFailed);
            }
            if number == line {
                return Ok(at);
            }
            self.arena.cur = at + len;
        }
        Err(BasicError::LineNotFound)
    }

    /// Detokenize the stored program back to numbered source text
    ///
    /// Literals, strings, variable names and lexemes are rendered
    /// space-separated, one line per chunk, in insertion order.
    pub fn list_program(&mut self) -> Result<String> {
        let save = self.arena.cur;
        self.arena.cur = 0;
        let listing = self.render_listing();
        self.arena.cur = save;
        listing
    }

    fn render_listing(&mut self) -> Result<String> {
        let mut text = String::new();
        while self.arena.cur < self.prog_end {
            match self.arena.peek()? {
                Tok::Chunk => {
                    let (_, line) = self.arena.get_chunk()?;
                    let _ = write!(text, "{line} ");
                }
                Tok::Eof => {
                    self.arena.cur += 1;
                    // Drop the separator before the line break
                    if text.ends_with(' ') {
                        text.pop();
                    }
                    text.push('\n');
                }
                Tok::Lit => {
                    let v = self.arena.get_lit()?;
                    let _ = write!(text, "{v} ");
                }
                Tok::Str => {
                    let s = self.arena.get_str()?;
                    let _ = write!(text, "\"{}\" ", String::from_utf8_lossy(s));
                }
                Tok::Var => {
                    let idx = self.arena.get_var_idx()?;
                    let _ = write!(text, "{} ", self.vars.name(idx)?);
                }
                other => {
                    self.arena.cur += 1;
                    let _ = write!(text, "{} ", other.name());
                }
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interp() -> Interpreter<Vec<u8>> {
        Interpreter::with_output(Vec::new())
    }

    #[test]
    fn test_find_line_by_number() {
        let mut it = interp();
        it.handle_line("10 print 1").unwrap();
        it.handle_line("20 print 2").unwrap();
        it.handle_line("30 print 3").unwrap();

        assert_eq!(it.find_line(10).unwrap(), 0);
        let at20 = it.find_line(20).unwrap();
        let at30 = it.find_line(30).unwrap();
        assert!(at20 > 0);
        assert!(at30 > at20);
    }

    #[test]
    fn test_find_line_missing_number() {
        let mut it = interp();
        it.handle_line("10 print 1").unwrap();
        assert!(matches!(it.find_line(99), Err(BasicError::LineNotFound)));
    }

    #[test]
    fn test_find_line_empty_store() {
        let mut it = interp();
        assert!(matches!(it.find_line(10), Err(BasicError::LineNotFound)));
    }

    #[test]
    fn test_find_line_first_match_wins() {
        let mut it = interp();
        it.handle_line("10 print 1").unwrap();
        it.handle_line("10 print 2").unwrap();
        // Chunks are kept in insertion order, never rewritten
        assert_eq!(it.find_line(10).unwrap(), 0);
    }

    #[test]
    fn test_find_line_restores_cursor() {
        let mut it = interp();
        it.handle_line("10 print 1").unwrap();
        let before = it.arena().cur();
        it.find_line(10).unwrap();
        assert_eq!(it.arena().cur(), before);
    }

    #[test]
    fn test_out_of_order_entry_is_scanned_in_insertion_order() {
        let mut it = interp();
        it.handle_line("30 print 3").unwrap();
        it.handle_line("10 print 1").unwrap();
        assert_eq!(it.find_line(30).unwrap(), 0);
        assert!(it.find_line(10).unwrap() > 0);
    }

    #[test]
    fn test_list_program() {
        let mut it = interp();
        it.handle_line("10 for i = 1 to 3").unwrap();
        it.handle_line("20 print i ; \"!\"").unwrap();
        it.handle_line("30 next").unwrap();

        let listing = it.list_program().unwrap();
        assert_eq!(
            listing,
            "10 for i = 1 to 3\n20 print i ; \"!\"\n30 next\n"
        );
    }

    #[test]
    fn test_list_empty_program() {
        let mut it = interp();
        assert_eq!(it.list_program().unwrap(), "");
    }
}

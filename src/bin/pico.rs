/// Interactive PicoBASIC console

use std::time::{SystemTime, UNIX_EPOCH};

use picobasic::host::seed_rnd;
use picobasic::Interpreter;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Keyword completer for the REPL
struct KeywordCompleter {
    words: Vec<&'static str>,
}

impl KeywordCompleter {
    fn new() -> Self {
        Self {
            words: vec![
                "and", "cls", "else", "end", "exit", "for", "gosub", "goto", "if", "next", "or",
                "plot", "print", "putc", "return", "rnd", "run", "step", "then", "to",
            ],
        }
    }
}

impl Completer for KeywordCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Complete the word under the cursor
        let line_to_cursor = &line[..pos];
        let word_start = line_to_cursor
            .rfind(|c: char| !c.is_ascii_alphanumeric())
            .map_or(0, |i| i + 1);
        let prefix = &line_to_cursor[word_start..];
        if prefix.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches: Vec<Pair> = self
            .words
            .iter()
            .filter(|word| word.starts_with(prefix))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();

        Ok((word_start, matches))
    }
}

impl Hinter for KeywordCompleter {
    type Hint = String;
}

impl Highlighter for KeywordCompleter {}
impl Validator for KeywordCompleter {}
impl Helper for KeywordCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".picobasic_history");
        p
    })
}

fn main() {
    println!("=== PicoBASIC ===");
    println!("Numbered lines are stored; anything else runs immediately.");
    println!("Try: 10 for i = 1 to 3   20 print i * i   30 next   run\n");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1);
    seed_rnd(seed);

    let mut rl = Editor::new().expect("Failed to create editor");
    rl.set_helper(Some(KeywordCompleter::new()));

    // Load history if available
    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut basic = Interpreter::new();
    if let Err(e) = basic.register_builtins() {
        eprintln!("Error: {e}");
        return;
    }

    loop {
        let readline = rl.readline("> ");
        let input = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Save history before exiting
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        };

        let input = input.trim_end();
        if input.is_empty() {
            continue;
        }

        // Add to history
        let _ = rl.add_history_entry(input);

        // One red diagnostic per failed line, then the prompt resumes
        if let Err(e) = basic.handle_line(input) {
            eprintln!("\x1b[31m{e}\x1b[0m");
        }
    }
}

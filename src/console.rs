use std::io::{self, BufRead, Stdout, StdinLock, Write};
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use log::trace;
use regex::Regex;

use crate::error::{InputClosed, InvalidSelection};

/// Shows story text to the player.
pub trait Narrator {
    /// Word-wrapped narration.
    fn narrate(&mut self, text: &str) -> Result<()>;
    /// A line printed exactly as given (banners, inventory).
    fn line(&mut self, text: &str) -> Result<()>;
}

/// Asks the player to pick one of several options.
pub trait Chooser {
    /// Show `options` numbered from 1 and block until a valid pick arrives.
    /// Returns the 0-based index.
    fn choose(&mut self, options: &[&str]) -> Result<usize>;
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digit pattern is valid"));

/// Turn one line of player input into a 0-based option index.
///
/// Only plain ASCII digits are accepted once surrounding whitespace is gone,
/// so `+2`, `2.0` and `-1` are rejected like any other junk.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, InvalidSelection> {
    let trimmed = input.trim();
    if !DIGITS.is_match(trimmed) {
        return Err(InvalidSelection::NotANumber(trimmed.to_string()));
    }
    // All digits but too long for usize: certainly out of range.
    let choice: usize = trimmed.parse().unwrap_or(usize::MAX);
    if choice == 0 || choice > count {
        return Err(InvalidSelection::OutOfRange { choice, count });
    }
    Ok(choice - 1)
}

// ---------------------------------------------------------------------------
// Word wrapping
// ---------------------------------------------------------------------------

/// Splits `word` after every hyphen that sits between two alphanumerics, so
/// `painted-rose,` may end a line as `painted-`.
fn hyphen_pieces(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let mut pieces = Vec::new();
    let mut start = 0;
    for window in chars.windows(3) {
        if let [(_, before), (at, '-'), (_, after)] = window {
            if before.is_alphanumeric() && after.is_alphanumeric() {
                pieces.push(&word[start..*at + 1]);
                start = *at + 1;
            }
        }
    }
    pieces.push(&word[start..]);
    pieces
}

/// Greedy word wrap into lines of at most `max_chars` characters. Lines break
/// at whitespace or after a hyphen inside a word.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        for (i, piece) in hyphen_pieces(word).into_iter().enumerate() {
            let piece_len = piece.chars().count();
            // Only the first piece of a word is separated by a space.
            let gap = usize::from(i == 0);

            if current_len > 0 && current_len + gap + piece_len <= max_chars {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(piece);
                current_len += gap + piece_len;
                continue;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if piece_len > max_chars {
                // Force-break long words
                let chars: Vec<char> = piece.chars().collect();
                let mut chunks = chars.chunks(max_chars).peekable();
                while let Some(chunk) = chunks.next() {
                    let part: String = chunk.iter().collect();
                    if chunks.peek().is_some() {
                        lines.push(part);
                    } else {
                        current_len = chunk.len();
                        current = part;
                    }
                }
            } else {
                current = piece.to_string();
                current_len = piece_len;
            }
        }
    }

    if current_len > 0 {
        lines.push(current);
    }

    lines
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Line-oriented terminal: reads answers from `input`, writes to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
    width: usize,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio(width: usize) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), width)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, width: usize) -> Self {
        Self {
            input,
            output,
            width,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Narrator for Console<R, W> {
    fn narrate(&mut self, text: &str) -> Result<()> {
        for line in wrap_text(text, self.width) {
            writeln!(self.output, "{line}").context("failed to write narration")?;
        }
        Ok(())
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("failed to write to stdout")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Chooser for Console<R, W> {
    fn choose(&mut self, options: &[&str]) -> Result<usize> {
        if options.is_empty() {
            bail!("a menu needs at least one option");
        }

        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, option)?;
        }

        loop {
            write!(self.output, "Choose a number: ")?;
            self.output.flush()?;

            // Raw bytes: text that is not UTF-8 is junk to re-prompt on, not
            // an I/O failure.
            let mut buf = Vec::new();
            let read = self
                .input
                .read_until(b'\n', &mut buf)
                .context("failed to read from stdin")?;
            if read == 0 {
                return Err(InputClosed.into());
            }
            let input = String::from_utf8_lossy(&buf);
            trace!("Raw input: {input:?}");

            match parse_selection(&input, options.len()) {
                Ok(index) => return Ok(index),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }
}

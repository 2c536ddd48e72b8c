//! Headless command loop.
//!
//! Reads one textual command per line, applies it to a [`Session`] and
//! writes a summary of every outcome, followed by the changed rows, so the
//! output reads like a transcript of what a renderer would repaint.

use std::io::{self, BufRead, Write};

use jp_edit_input::EditorCommand;

use crate::session::{Outcome, Session};

/// Applies commands from `input` until `quit` or end of input.
///
/// Blank lines and lines starting with `#` are skipped. A line that does not
/// parse is reported on `output` and skipped.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    output: &mut W,
) -> io::Result<()> {
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let command = match line.parse::<EditorCommand>() {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(line = index + 1, error = %err, "skipping command");
                writeln!(output, "error: line {}: {err}", index + 1)?;
                continue;
            }
        };

        let outcome = session.apply(command);
        writeln!(output, "{outcome}")?;
        match &outcome {
            Outcome::Changed { changeset, .. } => {
                for (row, text) in changeset.rows() {
                    writeln!(output, "{row:>4}| {text}")?;
                }
            }
            Outcome::Quit => break,
            _ => {}
        }
    }
    output.flush()
}

//! Interactive confirmation

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on the terminal; anything but "y"/"yes" is a no
pub(crate) fn confirm(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    ask(question, &mut stdin.lock(), &mut stdout)
}

fn ask<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

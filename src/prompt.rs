//! Operator confirmation.

use crate::constants::CONFIRM_ANSWER;
use dialoguer::Input;
use std::io::{BufRead, IsTerminal, Write};

/// Asks the operator a yes/no question.
pub trait Confirm {
    /// Returns true only when the operator explicitly agreed.
    fn confirm(&self, question: &str) -> bool;
}

/// Reads one answer line from standard input.
///
/// Uses a dialoguer prompt when both stdin and stderr are terminals, and a
/// plain line read otherwise so piped answers work. Anything other than
/// exactly `y` (after trimming) is a no, including an empty line and EOF.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> bool {
        if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() {
            return Input::<String>::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text()
                .map(|answer| is_confirmation(&answer))
                .unwrap_or(false);
        }
        read_confirmation(question, std::io::stdin().lock(), std::io::stderr())
    }
}

/// Writes the question to `output` and reads a single line from `input`.
pub fn read_confirmation<R, W>(question: &str, mut input: R, mut output: W) -> bool
where
    R: BufRead,
    W: Write,
{
    let _ = write!(output, "{}: ", question);
    let _ = output.flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_confirmation(&answer),
    }
}

#[must_use]
pub fn is_confirmation(answer: &str) -> bool {
    answer.trim() == CONFIRM_ANSWER
}

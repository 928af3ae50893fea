//! Interactive confirmation before the point of no return.
use std::io::{BufRead, Write};

use super::steps::Confirmation;
use crate::policy::ToolOptions;
use crate::types::{Error, ErrorKind, Result};

pub const CONTINUE_QUESTION: &str = "Continue with the system conversion? [y/n]: ";

/// Ask on a terminal; `assume_yes` in the tool options skips the question.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Confirmation for StdinPrompt {
    fn ask_to_continue(&self, options: &ToolOptions) -> Result<bool> {
        if options.assume_yes {
            return Ok(true);
        }
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        ask(&mut stdin.lock(), &mut stdout.lock())
    }
}

/// Repeat the question until the answer is `y` or `n`.
///
/// # Errors
/// Returns an `Io` error on read/write failure and a `Declined` error when input ends
/// without an answer.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    loop {
        output.write_all(CONTINUE_QUESTION.as_bytes())?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::new(ErrorKind::Declined, "no answer on standard input"));
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => {}
        }
    }
}

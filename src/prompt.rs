//! The interactive prompt capability used during elicitation.
//!
//! [`Prompter`] is the seam: the elicitation engine owns coercion,
//! validation and the retry policy, and a prompter only asks questions and
//! reports answers. [`TerminalPrompter`] is the line-oriented implementation
//! over any reader/writer pair; [`TerminalPrompter::stdio`] wires it to the
//! process terminal.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};

use crate::coerce::parse_bool;
use crate::error::AskfigError;

pub trait Prompter {
    /// Ask a free-form question. `default` is shown for reference only.
    ///
    /// Returns the raw answer; an empty string means the operator accepted
    /// the default.
    fn ask_text(&mut self, question: &str, default: Option<&str>) -> Result<String, AskfigError>;

    /// Offer `choices` in order and return the index of the one picked.
    fn ask_choice(
        &mut self,
        question: &str,
        choices: &[String],
        default: Option<usize>,
    ) -> Result<usize, AskfigError>;

    /// Ask a yes/no question.
    fn ask_yes_no(&mut self, question: &str, default: Option<bool>) -> Result<bool, AskfigError>;

    /// Tell the operator why the last answer was not accepted.
    fn reject(&mut self, reason: &str) -> Result<(), AskfigError>;
}

/// Line-oriented prompter.
///
/// Choices may be answered with their literal text or their 1-based number.
/// When an answer is both a listed label and a valid index, the label wins.
/// Yes/no accepts `y`, `yes`, `n`, `no`, `true`, `false`, or an empty line
/// for the default. End of input fails with [`AskfigError::PromptClosed`].
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        TerminalPrompter::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalPrompter { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self, question: &str) -> Result<String, AskfigError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AskfigError::PromptClosed(question.to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask_text(&mut self, question: &str, default: Option<&str>) -> Result<String, AskfigError> {
        match default {
            Some(d) => write!(self.output, "{question} [{d}]: ")?,
            None => write!(self.output, "{question}: ")?,
        }
        self.read_answer(question)
    }

    fn ask_choice(
        &mut self,
        question: &str,
        choices: &[String],
        default: Option<usize>,
    ) -> Result<usize, AskfigError> {
        writeln!(self.output, "{question}")?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {}) {choice}", i + 1)?;
        }
        loop {
            match default {
                Some(d) => write!(self.output, "Choice [{}]: ", d + 1)?,
                None => write!(self.output, "Choice: ")?,
            }
            let answer = self.read_answer(question)?;
            let answer = answer.trim();

            if answer.is_empty()
                && let Some(d) = default
            {
                return Ok(d);
            }
            // A listed label wins over an index, so numeric choices mean themselves.
            if let Some(i) = choices.iter().position(|c| c == answer) {
                return Ok(i);
            }
            if let Ok(n) = answer.parse::<usize>()
                && (1..=choices.len()).contains(&n)
            {
                return Ok(n - 1);
            }
            writeln!(self.output, "Please pick one of the listed choices.")?;
        }
    }

    fn ask_yes_no(&mut self, question: &str, default: Option<bool>) -> Result<bool, AskfigError> {
        let hint = match default {
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
            None => "[y/n]",
        };
        loop {
            write!(self.output, "{question} {hint} ")?;
            let answer = self.read_answer(question)?;
            let answer = answer.trim();

            if answer.is_empty()
                && let Some(d) = default
            {
                return Ok(d);
            }
            if let Some(b) = parse_bool(answer) {
                return Ok(b);
            }
            writeln!(self.output, "Please answer yes or no.")?;
        }
    }

    fn reject(&mut self, reason: &str) -> Result<(), AskfigError> {
        writeln!(self.output, "{reason}")?;
        Ok(())
    }
}

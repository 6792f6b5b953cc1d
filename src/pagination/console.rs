//! Prompters and display sinks
//!
//! The terminal implementations talk to stdin, stdout and stderr. The
//! scripted ones replay canned input and record everything shown, for
//! driving listings without a terminal.

use super::types::{DisplaySink, Prompter};
use crate::error::Result;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Reads answers from stdin; end of input counts as `q`
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Print `message` on stderr and read one line; `None` at end of input
    pub fn read_line(&mut self, message: &str) -> Result<Option<String>> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{message}: ")?;
        stderr.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            writeln!(stderr)?;
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, message: &str) -> Result<String> {
        Ok(self.read_line(message)?.unwrap_or_else(|| "q".to_string()))
    }
}

/// Records to stdout, notices to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl DisplaySink for TerminalSink {
    fn show(&mut self, rendered: &str) {
        println!("{rendered}");
    }

    fn notice(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Replays canned answers; answers `q` once they run out
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Every prompt shown so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, message: &str) -> Result<String> {
        self.prompts.push(message.to_string());
        Ok(self.answers.pop_front().unwrap_or_else(|| "q".to_string()))
    }
}

/// Keeps everything it is given
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub shown: Vec<String>,
    pub notices: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for RecordingSink {
    fn show(&mut self, rendered: &str) {
        self.shown.push(rendered.to_string());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

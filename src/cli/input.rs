use std::io::{self, BufRead};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::{commands::COMMAND_NAMES, CliError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Where answers and commands come from.
pub trait LineSource {
    fn mode(&self) -> CliMode;
    /// `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError>;
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CliError>;
}

/// Reads one answer per line, e.g. from a piped file.
pub struct ScriptInput<R: BufRead> {
    lines: io::Lines<R>,
}

impl<R: BufRead> ScriptInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptInput<R> {
    fn mode(&self) -> CliMode {
        CliMode::Script
    }

    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Some(line?)),
            None => Ok(None),
        }
    }

    fn confirm(&mut self, _prompt: &str, default: bool) -> Result<bool, CliError> {
        let Some(line) = self.read_line("")? else {
            return Ok(default);
        };
        Ok(match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | ":continue" => true,
            "n" | "no" => false,
            _ => default,
        })
    }
}

pub struct InteractiveInput {
    editor: Editor<CommandHelper, DefaultHistory>,
    theme: ColorfulTheme,
}

impl InteractiveInput {
    pub fn new() -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper));
        Ok(Self {
            editor,
            theme: ColorfulTheme::default(),
        })
    }
}

impl LineSource for InteractiveInput {
    fn mode(&self) -> CliMode {
        CliMode::Interactive
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim()).ok();
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Some(":quit".into())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CliError> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// Tab-completes wizard commands at the start of a line.
struct CommandHelper;

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if !prefix.starts_with(':') || prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let needle = prefix.to_ascii_lowercase();
        let candidates = COMMAND_NAMES
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_input_reads_lines_then_ends() {
        let mut input = ScriptInput::new("Ada\n:back\n".as_bytes());
        assert_eq!(input.read_line("> ").unwrap().as_deref(), Some("Ada"));
        assert_eq!(input.read_line("> ").unwrap().as_deref(), Some(":back"));
        assert_eq!(input.read_line("> ").unwrap(), None);
    }

    #[test]
    fn script_confirm_falls_back_to_default() {
        let mut input = ScriptInput::new("yes\nmaybe\n".as_bytes());
        assert!(input.confirm("?", false).unwrap());
        assert!(!input.confirm("?", false).unwrap());
        assert!(input.confirm("?", true).unwrap());
    }
}

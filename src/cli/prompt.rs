//! Interactive update prompt

use std::io::{BufRead, Write};

use crate::core::update::{Answer, Confirm};

const HELP: &str = "\
y - update this package (default)
n - skip this package
a - update this and all remaining packages
q - quit without writing anything
? - show this help
";

/// Asks on `output` and reads answers from `input`
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, name: &str, old_version: &str, new_version: &str) -> std::io::Result<Answer> {
        loop {
            write!(
                self.output,
                "Update {name} from {old_version} to {new_version}? [Y/n/a/q/?] "
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Answer::Quit);
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(Answer::Yes),
                "n" | "no" => return Ok(Answer::No),
                "a" | "all" => return Ok(Answer::All),
                "q" | "quit" => return Ok(Answer::Quit),
                "?" => write!(self.output, "{HELP}")?,
                other => writeln!(self.output, "Unrecognized answer '{other}', type ? for help")?,
            }
        }
    }
}

impl PromptConfirm<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr, read from stdin
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, name: &str, old_version: &str, new_version: &str) -> Answer {
        self.ask(name, old_version, new_version).unwrap_or_else(|e| {
            tracing::warn!("Failed to read answer: {e}");
            Answer::Quit
        })
    }
}

use std::io::{self, BufRead, Write};

/// Line source for interactive prompts. Wraps stdin in production and any
/// `BufRead` (e.g. a `Cursor`) in tests.
pub(crate) struct Prompter<R> {
    input: R,
}

impl Prompter<io::StdinLock<'static>> {
    pub(crate) fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Prompter<R> {
    pub(crate) fn new(input: R) -> Self {
        Self { input }
    }

    /// Print `prompt` without a trailing newline and read one line.
    /// `None` at end of input.
    pub(crate) fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_sequence_and_eof() {
        let mut prompter = Prompter::new(Cursor::new("first\nsecond\r\n"));
        assert_eq!(prompter.read_line("> ").unwrap(), Some("first".to_string()));
        assert_eq!(prompter.read_line("> ").unwrap(), Some("second".to_string()));
        assert_eq!(prompter.read_line("> ").unwrap(), None);
    }
}

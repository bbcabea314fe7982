//! Colored status output.
//!
//! Status lines and generated code go to separate sinks so raw mode can keep
//! stdout clean for piping.

use colored::*;
use std::io::{self, Write};
use std::path::Path;

use crate::error::GenError;

pub struct Console {
    status: Box<dyn Write>,
    output: Box<dyn Write>,
    inline: bool,
}

impl Console {
    pub fn new(status: Box<dyn Write>, output: Box<dyn Write>) -> Self {
        Self {
            status,
            output,
            inline: false,
        }
    }

    /// Status on stdout, or on stderr when stdout carries generated code.
    pub fn stdio(raw: bool) -> Self {
        let status: Box<dyn Write> = if raw {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        Self::new(status, Box::new(io::stdout()))
    }

    pub fn blank(&mut self) {
        self.line(String::new());
    }

    pub fn step(&mut self, message: impl AsRef<str>) {
        self.line(format!("{} {}", "➤".blue(), message.as_ref()));
    }

    pub fn success(&mut self, message: impl AsRef<str>) {
        self.line(format!("\n{} {}", "✔".green(), message.as_ref()));
    }

    pub fn failure(&mut self, message: impl AsRef<str>) {
        self.line(format!("\n{} {}", "✖".red(), message.as_ref()));
    }

    /// Replace the current status line instead of appending a new one.
    pub fn status(&mut self, message: impl AsRef<str>) {
        let _ = write!(self.status, "\r\x1b[2K{}", message.as_ref());
        let _ = self.status.flush();
        self.inline = true;
    }

    /// Print generated code to the output sink.
    pub fn emit(&mut self, content: &str) -> io::Result<()> {
        self.output.write_all(content.as_bytes())?;
        self.output.flush()
    }

    /// Report a fatal error the way the user should see it.
    pub fn error(&mut self, error: &GenError) {
        self.failure(describe(error));
    }

    fn line(&mut self, message: String) {
        if self.inline {
            let _ = writeln!(self.status);
            self.inline = false;
        }
        let _ = writeln!(self.status, "{message}");
    }
}

/// User-facing wording for `error`.
pub fn describe(error: &GenError) -> String {
    match error {
        GenError::Configuration(reason) => reason.clone(),
        GenError::Declined { .. } => format!(
            "Specify an output file with {} to avoid overwrites.",
            "--out path/to/file.ts".cyan()
        ),
        GenError::Install { command } => format!("Command {} failed.", command.cyan()),
        GenError::MissingInput { path } => missing_input_message(path),
        other => other.to_string(),
    }
}

pub fn missing_input_message(path: &Path) -> String {
    format!(
        "Couldn't find {} file. Specify one with {}",
        path.display(),
        "--in path/to/.env".cyan()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Buffer(Rc<RefCell<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    #[test]
    fn test_status_and_output_are_separate() {
        let status = Buffer::default();
        let output = Buffer::default();
        let mut console = Console::new(Box::new(status.clone()), Box::new(output.clone()));

        console.step("Reading variables");
        console.emit("export const A: string = process.env.A!;\n").unwrap();

        assert!(status.text().contains("Reading variables"));
        assert!(!status.text().contains("export const"));
        assert_eq!(output.text(), "export const A: string = process.env.A!;\n");
    }

    #[test]
    fn test_inline_status_is_rewritten() {
        let status = Buffer::default();
        let mut console = Console::new(Box::new(status.clone()), Box::new(Buffer::default()));

        console.status("first");
        console.status("second");
        assert_eq!(status.text(), "\r\x1b[2Kfirst\r\x1b[2Ksecond");

        console.step("after");
        assert!(status.text().contains("second\n"));
    }

    #[test]
    fn test_error_messages() {
        let status = Buffer::default();
        let mut console = Console::new(Box::new(status.clone()), Box::new(Buffer::default()));

        console.error(&GenError::Install {
            command: "yarn add dotenv".to_string(),
        });
        console.error(&GenError::MissingInput {
            path: PathBuf::from(".env.local"),
        });

        let text = status.text();
        assert!(text.contains("yarn add dotenv"));
        assert!(text.contains("Couldn't find .env.local file"));
    }
}

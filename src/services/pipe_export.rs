//! Shell-command export handler
//!
//! Replaces the built-in encoders with a user command. The rows are piped
//! to the command's stdin as a JSON array of objects keyed by column label;
//! the requested format name (`csv`, `excel`, `pdf`) is passed in
//! `TABVIEW_EXPORT_FORMAT`.

use crate::model::export::encode_json;
use crate::model::{ExportError, ExportHandler, ExportRequest};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

pub const FORMAT_ENV: &str = "TABVIEW_EXPORT_FORMAT";
pub const SELECTION_ENV: &str = "TABVIEW_EXPORT_SELECTION";

pub struct CommandExportHandler {
    command: String,
}

impl CommandExportHandler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn shell(&self) -> Command {
        #[cfg(target_os = "windows")]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", &self.command]);
            cmd
        };

        #[cfg(not(target_os = "windows"))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", &self.command]);
            cmd
        };

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl ExportHandler for CommandExportHandler {
    fn export(&mut self, request: &ExportRequest<'_>) -> Result<(), ExportError> {
        let payload = encode_json(request.columns, &request.rows)?;

        let mut child = self
            .shell()
            .env(FORMAT_ENV, request.format.name().to_lowercase())
            .env(SELECTION_ENV, if request.selection_only { "1" } else { "0" })
            .spawn()?;

        // stdin is fed from its own thread while stderr drains here, so a
        // command that talks before reading cannot stall both sides
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(|| match stdin {
                Some(mut stdin) => stdin.write_all(payload.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output?;
        match written {
            Ok(()) => {}
            // The command is free to exit without reading everything
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("export command `{}` closed stdin early", self.command);
            }
            Err(e) => return Err(e.into()),
        }

        if output.status.success() {
            log::debug!("export command `{}` finished", self.command);
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let reason = match output.status.code() {
            Some(code) if stderr.is_empty() => format!("`{}` exited with {}", self.command, code),
            Some(code) => format!("`{}` exited with {}: {}", self.command, code, stderr),
            None => format!("`{}` was terminated", self.command),
        };
        log::error!("{}", reason);
        Err(ExportError::Handler(reason))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::model::{ColumnDescriptor, ExportFormat, Row};
    use std::fs;

    #[test]
    fn test_command_receives_rows_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        let env_out = dir.path().join("format.txt");
        let mut handler = CommandExportHandler::new(format!(
            "cat > {} && printf %s \"${}\" > {}",
            out.display(),
            FORMAT_ENV,
            env_out.display()
        ));

        let columns = vec![ColumnDescriptor::new("n", "Name")];
        let row = Row::new().with("n", "Ann");
        let request = ExportRequest {
            format: ExportFormat::Excel,
            columns: &columns,
            rows: vec![&row],
            selection_only: false,
        };
        handler.export(&request).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed[0]["Name"], "Ann");
        assert_eq!(fs::read_to_string(&env_out).unwrap(), "excel");
    }

    #[test]
    fn test_failing_command_is_an_error() {
        let mut handler = CommandExportHandler::new("cat > /dev/null; echo nope >&2; exit 3");
        let columns = vec![ColumnDescriptor::new("n", "Name")];
        let request = ExportRequest {
            format: ExportFormat::Csv,
            columns: &columns,
            rows: Vec::new(),
            selection_only: true,
        };
        match handler.export(&request) {
            Err(ExportError::Handler(reason)) => {
                assert!(reason.contains("exited with 3"));
                assert!(reason.contains("nope"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    fn large_request<'a>(columns: &'a [ColumnDescriptor], rows: &'a [Row]) -> ExportRequest<'a> {
        ExportRequest {
            format: ExportFormat::Csv,
            columns,
            rows: rows.iter().collect(),
            selection_only: false,
        }
    }

    fn large_rows() -> (Vec<ColumnDescriptor>, Vec<Row>) {
        let columns = vec![ColumnDescriptor::new("n", "Name")];
        let filler = "x".repeat(200);
        let rows = (0..20_000)
            .map(|i| Row::new().with("n", format!("{} {}", i, filler)))
            .collect();
        (columns, rows)
    }

    #[test]
    fn test_command_that_ignores_stdin_succeeds() {
        let (columns, rows) = large_rows();
        let mut handler = CommandExportHandler::new("exit 0");
        handler.export(&large_request(&columns, &rows)).unwrap();
    }

    #[test]
    fn test_command_that_ignores_stdin_reports_its_exit_code() {
        let (columns, rows) = large_rows();
        let mut handler = CommandExportHandler::new("exit 4");
        match handler.export(&large_request(&columns, &rows)) {
            Err(ExportError::Handler(reason)) => assert!(reason.contains("exited with 4")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_chatty_stderr_before_reading_does_not_block() {
        let (columns, rows) = large_rows();
        let mut handler =
            CommandExportHandler::new("head -c 200000 /dev/zero >&2; cat > /dev/null");
        handler.export(&large_request(&columns, &rows)).unwrap();
    }
}

//! Glue between the shell wrapper and the correction core
//!
//! The wrapper pipes the last command as JSON on stdin and, after we exit,
//! runs whatever command we left in the handoff file.

use crate::correction::CorrectionRequest;
use anyhow::Context;
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Where the shell wrapper looks for the accepted command
pub const DEFAULT_HANDOFF_FILE: &str = "/tmp/pfs_cmd";

/// Decode the wrapper's `{command, output, exit_code}` payload
pub fn read_request<R: Read>(mut reader: R) -> anyhow::Result<CorrectionRequest> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .context("failed to read command info from stdin")?;
    let request: CorrectionRequest =
        serde_json::from_str(&raw).context("failed to parse command info from stdin")?;
    Ok(request)
}

/// Check that the program a suggested command starts with is on PATH
pub fn is_command_available(command: &str) -> bool {
    match command.split_whitespace().next() {
        Some(program) => which::which(program).is_ok(),
        None => false,
    }
}

/// Ask a yes/no question; anything but `y`/`yes` (or no input) is a no
pub fn confirm_with<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    question: &str,
) -> io::Result<bool> {
    write!(writer, "{} (y/n) ", question)?;
    writer.flush()?;

    let mut answer = String::new();
    if reader.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Ask on the controlling terminal, since stdin carries the command payload
pub fn confirm_on_tty(question: &str) -> io::Result<bool> {
    let tty = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")?;
    let writer = tty.try_clone()?;
    confirm_with(BufReader::new(tty), writer, question)
}

/// Write the accepted command for the shell wrapper to pick up.
///
/// The command lands in a freshly created temp file next to `path` and is
/// renamed into place, so a pre-planted file or symlink is never written
/// through.
pub fn write_handoff(path: &Path, command: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(command.as_bytes())?;
    tmp.persist(path).map_err(|err| err.error)?;

    tracing::debug!(path = %path.display(), "wrote handoff file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_request() {
        let payload = r#"{"command":"lsa -l","output":"lsa: command not found","exit_code":127}"#;
        let request = read_request(payload.as_bytes()).unwrap();
        assert_eq!(request.command, "lsa -l");
        assert_eq!(request.exit_code, 127);
    }

    #[test]
    fn test_read_request_rejects_garbage() {
        let err = read_request("not json".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("failed to parse command info"));
    }

    #[test]
    fn test_confirm_answers() {
        for (input, expected) in [
            ("y\n", true),
            ("YES\n", true),
            ("  yes  \n", true),
            ("n\n", false),
            ("yep\n", false),
            ("\n", false),
            ("", false),
        ] {
            let mut out = Vec::new();
            let answer = confirm_with(Cursor::new(input), &mut out, "Execute this command?").unwrap();
            assert_eq!(answer, expected, "input {:?}", input);
            assert_eq!(String::from_utf8(out).unwrap(), "Execute this command? (y/n) ");
        }
    }

    #[test]
    fn test_empty_command_is_unavailable() {
        assert!(!is_command_available(""));
        assert!(!is_command_available("   "));
        assert!(!is_command_available("definitely-not-a-real-binary-pfs-test --help"));
    }

    #[test]
    fn test_write_handoff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pfs_cmd");
        write_handoff(&path, "ls -l").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "ls -l");

        write_handoff(&path, "git status").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "git status");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_handoff_ignores_planted_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let victim = dir.path().join("victim");
        fs::write(&victim, "original").unwrap();
        std::os::unix::fs::symlink(&victim, dir.path().join("pfs_cmd.tmp")).unwrap();

        let path = dir.path().join("pfs_cmd");
        write_handoff(&path, "ls -l").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "ls -l");
        assert_eq!(fs::read_to_string(&victim).unwrap(), "original");
    }
}

//! Terminal output for CLI commands
//!
//! Machine-readable output goes to stdout; notices go to stderr so stdout
//! can be redirected into a config file.

use std::io::{self, Write};

use super::errors::CliResult;

/// Write a block of text to stdout
pub fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

/// Write a notice line to stderr
pub fn write_notice(message: &str) -> CliResult<()> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{}", message)?;
    Ok(())
}

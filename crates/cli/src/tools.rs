//! Subprocess wrapper for the external shape-modeling toolkit.
//!
//! Every grooming, optimization, and analysis operation is delegated to the
//! toolkit binary as `<program> <operation> [args...]`. A non-zero exit is
//! fatal: the pipeline has no partial-failure recovery.

use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Result};

#[derive(Clone, Debug)]
pub struct Toolkit {
    program: PathBuf,
}

impl Toolkit {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Run one toolkit operation to completion.
    pub fn run<I, S>(&self, operation: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        tracing::info!(operation, program = %self.program.display(), "toolkit");
        let status = Command::new(&self.program).arg(operation).args(args).status()?;
        if !status.success() {
            bail!(
                "toolkit operation '{operation}' exited with status {:?}",
                status.code()
            );
        }
        Ok(())
    }
}

/// Block until the user presses Enter (interactive mode stage gates).
pub fn pause(prompt: &str) -> Result<()> {
    print!("{prompt}\nPress Enter to continue");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

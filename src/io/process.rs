//! External process invocation for the `convert` executable.
//!
//! `ConversionInvocation` describes one call; a `ProcessRunner` executes it and
//! reports the exit status together with captured output. `SystemRunner` spawns
//! a real child process with argv passed directly (no shell involved), so
//! tests can swap in a recording runner without touching the filesystem.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Frame selector appended to the input path: always the first page/frame.
pub const FIRST_FRAME: &str = "[0]";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ConversionInvocation {
    /// `<program> <input>[0] <args...> <output>`
    pub fn convert(program: PathBuf, input: &Path, args: &[String], output: &Path) -> Self {
        let mut input_arg = input.as_os_str().to_os_string();
        input_arg.push(FIRST_FRAME);

        let mut argv = Vec::with_capacity(args.len() + 2);
        argv.push(input_arg);
        argv.extend(args.iter().map(OsString::from));
        argv.push(output.as_os_str().to_os_string());

        Self {
            program,
            args: argv,
        }
    }

    /// Arbitrary arguments, e.g. `-version`.
    pub fn with_args<I, S>(program: PathBuf, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Space-joined rendering for log lines.
    pub fn display(&self) -> String {
        let mut s = self.program.display().to_string();
        for arg in &self.args {
            s.push(' ');
            s.push_str(&arg.to_string_lossy());
        }
        s
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs an invocation to completion. An `Err` means the process could not be
/// started at all; a non-zero exit is reported through `ProcessOutput`.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, invocation: &ConversionInvocation) -> Result<ProcessOutput>;
}

/// Blocking runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &ConversionInvocation) -> Result<ProcessOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::Launch {
                program: invocation.program.clone(),
                source: e,
            })?;

        Ok(ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

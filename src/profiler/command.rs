use std::{
    ffi::{OsStr, OsString},
    process::Command,
};

/// Argument-list builder for the external tools the driver shells out to,
/// kept separate from `std::process::Command` so the exact invocation can be
/// rendered for logging and error reporting.
#[derive(Debug)]
pub struct CommandBuilder {
    program: OsString,
    argv: Vec<OsString>,
}

impl CommandBuilder {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            argv: Vec::new(),
        }
    }

    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
        self.argv.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.arg(arg.as_ref());
        }
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn build(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.argv);
        command
    }

    /// Returns the command line as a shell-quoted string
    pub fn as_command_line(&self) -> String {
        let mut parts: Vec<String> = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(
            self.argv
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        shell_words::join(parts)
    }
}

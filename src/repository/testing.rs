use std::cell::RefCell;

use super::{CommandOutput, CommandRunner};

enum Behaviour {
    Normal,
    MissingTool,
    IoError,
}

/// Canned process runner: the last argument picks the response, optionally
/// narrowed by a flag that must also be present.
pub(crate) struct FakeRunner {
    responses: Vec<(Option<String>, String, CommandOutput)>,
    behaviour: Behaviour,
    pub calls: RefCell<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            behaviour: Behaviour::Normal,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn respond(self, last_arg: &str, stdout: &str) -> Self {
        self.respond_with_flag(None, last_arg, stdout)
    }

    pub fn respond_with_flag(mut self, flag: Option<&str>, last_arg: &str, stdout: &str) -> Self {
        self.responses.push((
            flag.map(str::to_string),
            last_arg.to_string(),
            CommandOutput {
                success: true,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        ));
        self
    }

    pub fn fail(mut self, last_arg: &str, stderr: &str) -> Self {
        self.responses.push((
            None,
            last_arg.to_string(),
            CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        ));
        self
    }

    pub fn missing_tool(mut self) -> Self {
        self.behaviour = Behaviour::MissingTool;
        self
    }

    pub fn io_error(mut self) -> Self {
        self.behaviour = Behaviour::IoError;
        self
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().cloned());
        self.calls.borrow_mut().push(call);

        match self.behaviour {
            Behaviour::MissingTool => return Err(std::io::ErrorKind::NotFound.into()),
            Behaviour::IoError => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "stream did not contain valid UTF-8",
                ))
            }
            Behaviour::Normal => {}
        }

        let key = args.last().map(String::as_str).unwrap_or("");
        let flagged = self.responses.iter().find(|(flag, k, _)| {
            k == key && flag.as_ref().is_some_and(|f| args.contains(f))
        });
        let plain = || self.responses.iter().find(|(flag, k, _)| k == key && flag.is_none());

        Ok(flagged
            .or_else(plain)
            .map(|(_, _, out)| out.clone())
            .unwrap_or(CommandOutput {
                success: true,
                ..CommandOutput::default()
            }))
    }
}

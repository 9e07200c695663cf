//! Session command parsing.
//!
//! Only a handful of commands are handled by jniscope itself; everything else
//! is forwarded verbatim to the underlying debugger, which keeps the whole
//! debugger command surface available untouched.

pub const JNIENV_COMMAND: &str = "jnienv";
pub const VMMAP_COMMAND: &str = "vmmap";
pub const HELP_COMMAND: &str = "help";
pub const HELP_COMMAND_SHORT: &str = "h";
pub const QUIT_COMMAND: &str = "quit";
pub const QUIT_COMMAND_SHORT: &str = "q";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Install the function table base pointer for this session.
    SetTableBase(u64),
    /// Show the current function table base pointer.
    ShowTableBase,
    /// Print debuggee memory mappings, optionally filtered by path substring.
    VmMap { filter: Option<String> },
    Help(Option<String>),
    Quit,
    /// Anything jniscope does not handle itself.
    Forward(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("malformed command: {0}")]
    Parsing(String),
}

pub fn parse(input: &str) -> Result<UserCommand, CommandError> {
    let input = input.trim();
    let mut tokens = input.split_whitespace();

    match tokens.next() {
        None => Err(CommandError::Parsing("empty input".to_string())),
        Some(JNIENV_COMMAND) => match (tokens.next(), tokens.next()) {
            (None, _) => Ok(UserCommand::ShowTableBase),
            (Some(addr), None) => parse_address(addr)
                .map(UserCommand::SetTableBase)
                .ok_or_else(|| {
                    CommandError::Parsing(format!("`{addr}` is not an address"))
                }),
            (Some(_), Some(_)) => Err(CommandError::Parsing(
                "jnienv takes a single address".to_string(),
            )),
        },
        Some(VMMAP_COMMAND) => match (tokens.next(), tokens.next(), tokens.next()) {
            (None, _, _) => Ok(UserCommand::VmMap { filter: None }),
            (Some("-f"), Some(pattern), None) => Ok(UserCommand::VmMap {
                filter: Some(pattern.to_string()),
            }),
            _ => Err(CommandError::Parsing(
                "usage: vmmap [-f <pattern>]".to_string(),
            )),
        },
        Some(HELP_COMMAND) | Some(HELP_COMMAND_SHORT) => {
            Ok(UserCommand::Help(tokens.next().map(ToString::to_string)))
        }
        Some(QUIT_COMMAND) | Some(QUIT_COMMAND_SHORT) => Ok(UserCommand::Quit),
        Some(_) => Ok(UserCommand::Forward(input.to_string())),
    }
}

fn parse_address(token: &str) -> Option<u64> {
    crate::bridge::parse_value(token)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_command_parsing() {
        struct TestCase {
            input: &'static str,
            expected: UserCommand,
        }
        let test_cases = [
            TestCase {
                input: "jnienv 0xb6f00120",
                expected: UserCommand::SetTableBase(0xb6f00120),
            },
            TestCase {
                input: "jnienv 8196",
                expected: UserCommand::SetTableBase(8196),
            },
            TestCase {
                input: "  jnienv  ",
                expected: UserCommand::ShowTableBase,
            },
            TestCase {
                input: "vmmap",
                expected: UserCommand::VmMap { filter: None },
            },
            TestCase {
                input: "vmmap -f libart",
                expected: UserCommand::VmMap {
                    filter: Some("libart".to_string()),
                },
            },
            TestCase {
                input: "help",
                expected: UserCommand::Help(None),
            },
            TestCase {
                input: "h jnienv",
                expected: UserCommand::Help(Some("jnienv".to_string())),
            },
            TestCase {
                input: "q",
                expected: UserCommand::Quit,
            },
            TestCase {
                input: "break Java_com_app_native",
                expected: UserCommand::Forward("break Java_com_app_native".to_string()),
            },
            TestCase {
                input: "info registers",
                expected: UserCommand::Forward("info registers".to_string()),
            },
        ];

        for tc in test_cases {
            assert_eq!(parse(tc.input).unwrap(), tc.expected, "input: {}", tc.input);
        }
    }

    #[test]
    fn test_malformed_commands() {
        for input in ["", "   ", "jnienv zzz", "jnienv 1 2", "vmmap -f", "vmmap x"] {
            assert!(parse(input).is_err(), "input: {input:?}");
        }
    }
}

//! Command-line parsing.

use crossportal_domain::Portal;

/// Usage text printed on `help` or a parse error.
pub const USAGE: &str = "\
Usage: crossportal <command>

Commands:
  login <user-id> <primary-token>   Store a primary session
  open <portal> [path]              Open a portal, exchanging a token if needed
  status                            Show the session and per-portal token state
  signout                           Sign out of every portal
  help                              Show this message

Portals: gateway, makerspace-cave, store";

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Establish and persist a primary session.
    Login {
        /// Identity-provider user id.
        user_id: String,
        /// Primary bearer credential.
        token: String,
    },
    /// Open a portal.
    Open {
        /// Target portal.
        portal: Portal,
        /// Optional path below the portal origin.
        path: Option<String>,
    },
    /// Print session and token status.
    Status,
    /// Sign out everywhere.
    SignOut,
    /// Print usage.
    Help,
}

/// Errors raised while parsing arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// No command given.
    #[error("missing command")]
    MissingCommand,

    /// The command is not recognized.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A required argument is absent.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// More arguments than the command accepts.
    #[error("{0}: too many arguments")]
    TooManyArguments(&'static str),

    /// The portal name is not recognized.
    #[error("unknown portal: {0}")]
    UnknownPortal(String),
}

impl Command {
    /// Parses arguments, excluding the program name.
    ///
    /// # Errors
    /// Returns a `UsageError` describing the first problem found.
    pub fn parse<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let command = args.next().ok_or(UsageError::MissingCommand)?;

        let parsed = match command.as_str() {
            "login" => {
                let user_id = args.next().ok_or(UsageError::MissingArgument {
                    command: "login",
                    argument: "<user-id>",
                })?;
                let token = args.next().ok_or(UsageError::MissingArgument {
                    command: "login",
                    argument: "<primary-token>",
                })?;
                ensure_done(&mut args, "login")?;
                Self::Login { user_id, token }
            }
            "open" => {
                let name = args.next().ok_or(UsageError::MissingArgument {
                    command: "open",
                    argument: "<portal>",
                })?;
                let portal = name
                    .parse::<Portal>()
                    .map_err(|_| UsageError::UnknownPortal(name))?;
                let path = args.next();
                ensure_done(&mut args, "open")?;
                Self::Open { portal, path }
            }
            "status" => {
                ensure_done(&mut args, "status")?;
                Self::Status
            }
            "signout" | "logout" => {
                ensure_done(&mut args, "signout")?;
                Self::SignOut
            }
            "help" | "-h" | "--help" => Self::Help,
            _ => return Err(UsageError::UnknownCommand(command)),
        };
        Ok(parsed)
    }
}

fn ensure_done(
    args: &mut impl Iterator<Item = String>,
    command: &'static str,
) -> Result<(), UsageError> {
    match args.next() {
        Some(_) => Err(UsageError::TooManyArguments(command)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_open_with_and_without_path() {
        assert_eq!(
            Command::parse(["open", "store"]).unwrap(),
            Command::Open {
                portal: Portal::Store,
                path: None,
            }
        );
        assert_eq!(
            Command::parse(["open", "makerspace-cave", "/members"]).unwrap(),
            Command::Open {
                portal: Portal::MakerspaceCave,
                path: Some("/members".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            Command::parse(["login", "u1", "primary-1"]).unwrap(),
            Command::Login {
                user_id: "u1".to_string(),
                token: "primary-1".to_string(),
            }
        );
        assert_eq!(
            Command::parse(["login", "u1"]),
            Err(UsageError::MissingArgument {
                command: "login",
                argument: "<primary-token>",
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse(Vec::<String>::new()),
            Err(UsageError::MissingCommand)
        );
        assert_eq!(
            Command::parse(["frobnicate"]),
            Err(UsageError::UnknownCommand("frobnicate".to_string()))
        );
        assert_eq!(
            Command::parse(["open", "admin"]),
            Err(UsageError::UnknownPortal("admin".to_string()))
        );
        assert_eq!(
            Command::parse(["status", "extra"]),
            Err(UsageError::TooManyArguments("status"))
        );
        assert_eq!(Command::parse(["logout"]).unwrap(), Command::SignOut);
    }
}

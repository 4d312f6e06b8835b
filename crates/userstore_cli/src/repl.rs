//! Interactive command interpreter.
//!
//! # Responsibility
//! - Read line-oriented commands, tokenize them, dispatch to the service,
//!   and print serialized results.
//! - Keep the session alive across command failures; only `exit`/`quit`
//!   or end of input terminate the loop.
//!
//! # Invariants
//! - Argument errors are detected before any service call is made.
//! - Every failed command produces exactly one diagnostic line on stderr.

use crate::payload;
use crate::render;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use userstore_core::{
    is_valid_email, CreateUserRequest, RepoError, UpdateUserRequest, UserId, UserRepository,
    UserService,
};

const PROMPT: &str = "> ";

/// What a processed line means for the session loop.
#[derive(Debug)]
pub enum LineOutcome {
    /// Nothing to print (blank input).
    Quiet,
    /// A status line for stdout.
    Output(String),
    /// A diagnostic for stderr; the session continues.
    Error(CommandError),
    /// Session over.
    Exit,
}

#[derive(Debug)]
pub enum CommandError {
    /// Malformed command shape, missing field, or failed validation.
    InvalidArgument(String),
    /// Error surfaced by the service/repository layers.
    Service(RepoError),
}

pub struct Repl<R: UserRepository> {
    service: UserService<R>,
}

impl<R: UserRepository> Repl<R> {
    pub fn new(service: UserService<R>) -> Self {
        Self { service }
    }

    /// Runs the blocking read/dispatch/print session until exit or EOF.
    pub fn run(&self) -> Result<(), ReadlineError> {
        let mut rl = DefaultEditor::new()?;
        let history_file = history_path();
        let _ = rl.load_history(&history_file);

        println!("{}", help_text());
        println!("\nEnter command (type 'help' for options, 'exit' to quit):");

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    match self.execute_line(&line) {
                        LineOutcome::Quiet => {}
                        LineOutcome::Output(text) => println!("{text}"),
                        LineOutcome::Error(CommandError::InvalidArgument(message)) => {
                            eprintln!("Input Error: {message}");
                        }
                        LineOutcome::Error(CommandError::Service(err)) => {
                            eprintln!("Error: {err}");
                        }
                        LineOutcome::Exit => {
                            println!("Exiting CLI. Goodbye!");
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        if let Some(parent) = history_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(&history_file);
        Ok(())
    }

    /// Tokenizes and dispatches one input line.
    pub fn execute_line(&self, line: &str) -> LineOutcome {
        let tokens = tokenize(line);
        let Some((command, args)) = tokens.split_first() else {
            return LineOutcome::Quiet;
        };
        info!("event=command_dispatch module=cli command={command}");

        let result = match command.as_str() {
            "exit" | "quit" => return LineOutcome::Exit,
            "help" => return LineOutcome::Output(help_text()),
            "create" => self.handle_create(args),
            "get" => self.handle_get(args),
            "get-all" => self.handle_get_all(),
            "update" => self.handle_update(args),
            "delete" => self.handle_delete(args),
            other => Ok(format!(
                "Unknown command: '{other}'. Type 'help' for options."
            )),
        };

        match result {
            Ok(text) => LineOutcome::Output(text),
            Err(err) => LineOutcome::Error(err),
        }
    }

    fn handle_create(&self, args: &[String]) -> Result<String, CommandError> {
        let payload_token = args.first().ok_or_else(|| usage("create <json_data>"))?;
        if let Some(id) = payload::extract_int(payload_token, "id") {
            return Err(CommandError::InvalidArgument(format!(
                "id must not be supplied on create (got {id}); storage assigns it"
            )));
        }
        let (name, email) = parse_user_fields(payload_token, "user creation")?;
        let response = self
            .service
            .create_user(&CreateUserRequest { name, email })
            .map_err(CommandError::Service)?;
        Ok(format!("User created: {}", render::render_user(&response)))
    }

    fn handle_get(&self, args: &[String]) -> Result<String, CommandError> {
        let id = parse_id(args.first(), "get <id>")?;
        match self.service.get_user(id).map_err(CommandError::Service)? {
            Some(response) => Ok(format!("User found: {}", render::render_user(&response))),
            None => Ok(format!("User with ID {id} not found.")),
        }
    }

    fn handle_get_all(&self) -> Result<String, CommandError> {
        let responses = self.service.list_users();
        if responses.is_empty() {
            Ok("No users found.".to_string())
        } else {
            Ok(format!("All users: {}", render::render_users(&responses)))
        }
    }

    fn handle_update(&self, args: &[String]) -> Result<String, CommandError> {
        let id = parse_id(args.first(), "update <id> <json_data>")?;
        let payload_token = args
            .get(1)
            .ok_or_else(|| usage("update <id> <json_data>"))?;
        let (name, email) = parse_user_fields(payload_token, "user update")?;

        match self.service.update_user(&UpdateUserRequest { id, name, email }) {
            Ok(response) => Ok(format!("User updated: {}", render::render_user(&response))),
            Err(RepoError::NotFound(_)) => Ok(format!("User with ID {id} not found.")),
            Err(err) => Err(CommandError::Service(err)),
        }
    }

    fn handle_delete(&self, args: &[String]) -> Result<String, CommandError> {
        let id = parse_id(args.first(), "delete <id>")?;
        match self.service.delete_user(id) {
            Ok(()) => Ok(format!("User with ID {id} deleted successfully.")),
            Err(RepoError::NotFound(_)) => Ok(format!("User with ID {id} not found.")),
            Err(err) => Err(CommandError::Service(err)),
        }
    }
}

/// Splits a line into whitespace-delimited tokens up to the first `{`;
/// everything from that `{` to end of line is one verbatim payload token.
fn tokenize(line: &str) -> Vec<String> {
    match line.find('{') {
        Some(start) => {
            let mut tokens: Vec<String> = line[..start]
                .split_whitespace()
                .map(str::to_string)
                .collect();
            tokens.push(line[start..].trim_end().to_string());
            tokens
        }
        None => line.split_whitespace().map(str::to_string).collect(),
    }
}

fn parse_id(arg: Option<&String>, usage_text: &str) -> Result<UserId, CommandError> {
    let raw = arg.ok_or_else(|| usage(usage_text))?;
    raw.parse().map_err(|_| {
        CommandError::InvalidArgument(format!("id must be an integer, got '{raw}'"))
    })
}

fn parse_user_fields(
    payload_token: &str,
    context: &str,
) -> Result<(String, String), CommandError> {
    let name = payload::extract_string(payload_token, "name").unwrap_or_default();
    let email = payload::extract_string(payload_token, "email").unwrap_or_default();

    if name.is_empty() || email.is_empty() {
        return Err(CommandError::InvalidArgument(format!(
            "Name and email are required in JSON for {context}."
        )));
    }
    if !is_valid_email(email) {
        return Err(CommandError::InvalidArgument(
            "Invalid email format.".to_string(),
        ));
    }
    Ok((name.to_string(), email.to_string()))
}

fn usage(text: &str) -> CommandError {
    CommandError::InvalidArgument(format!("Usage: {text}"))
}

fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".userstore")
        .join("history")
}

fn help_text() -> String {
    [
        "--- Available Commands ---",
        "  create <json_data>          - Create a new user. Example: create {\"name\":\"Alice\",\"email\":\"alice@example.com\"}",
        "  get <id>                    - Get a user by ID. Example: get 1",
        "  get-all                     - Get all users.",
        "  update <id> <json_data>     - Update an existing user. Example: update 1 {\"name\":\"Alice Updated\",\"email\":\"alice.updated@example.com\"}",
        "  delete <id>                 - Delete a user by ID. Example: delete 1",
        "  help                        - Show this help message.",
        "  exit                        - Exit the application.",
        "--------------------------",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{tokenize, CommandError, LineOutcome, Repl};
    use userstore_core::db::open_db_in_memory;
    use userstore_core::{SqliteUserRepository, UserService};

    fn output(outcome: LineOutcome) -> String {
        match outcome {
            LineOutcome::Output(text) => text,
            other => panic!("expected output, got {other:?}"),
        }
    }

    fn invalid_argument(outcome: LineOutcome) -> String {
        match outcome {
            LineOutcome::Error(CommandError::InvalidArgument(message)) => message,
            other => panic!("expected invalid argument, got {other:?}"),
        }
    }

    #[test]
    fn tokenize_splits_words_and_keeps_payload_verbatim() {
        assert_eq!(
            tokenize("update 1 {\"name\":\"A B\",\"email\":\"a@b.co\"}"),
            vec![
                "update".to_string(),
                "1".to_string(),
                "{\"name\":\"A B\",\"email\":\"a@b.co\"}".to_string(),
            ]
        );
        assert_eq!(tokenize("  get   7  "), vec!["get".to_string(), "7".to_string()]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn create_prints_the_serialized_user() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        let text = output(
            repl.execute_line("create {\"name\":\"Alice\",\"email\":\"alice@example.com\"}"),
        );
        assert!(text.starts_with("User created: "));
        assert!(text.contains("\"name\":\"Alice\""));
        assert!(text.contains("\"email\":\"alice@example.com\""));
    }

    #[test]
    fn create_then_get_roundtrips_verbatim() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        output(repl.execute_line("create {\"name\":\"Alice\",\"email\":\"alice@example.com\"}"));
        let text = output(repl.execute_line("get 1"));
        assert_eq!(
            text,
            "User found: {\"id\":1,\"name\":\"Alice\",\"email\":\"alice@example.com\"}"
        );
    }

    #[test]
    fn create_rejects_missing_fields_without_side_effects() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        let message = invalid_argument(repl.execute_line("create {\"name\":\"Alice\"}"));
        assert!(message.contains("required"));

        let message =
            invalid_argument(repl.execute_line("create {\"name\":\"A\",\"email\":\"bad\"}"));
        assert_eq!(message, "Invalid email format.");

        assert_eq!(output(repl.execute_line("get-all")), "No users found.");
    }

    #[test]
    fn create_rejects_a_caller_supplied_id() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        let message = invalid_argument(repl.execute_line(
            "create {\"id\":5,\"name\":\"Alice\",\"email\":\"alice@example.com\"}",
        ));
        assert!(message.contains("storage assigns it"));
        assert_eq!(output(repl.execute_line("get-all")), "No users found.");
    }

    #[test]
    fn get_all_lists_every_created_user() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        output(repl.execute_line("create {\"name\":\"Alice\",\"email\":\"alice@example.com\"}"));
        output(repl.execute_line("create {\"name\":\"Bob\",\"email\":\"bob@x.co\"}"));

        let text = output(repl.execute_line("get-all"));
        assert!(text.starts_with("All users: ["));
        assert!(text.contains("\"name\":\"Alice\""));
        assert!(text.contains("\"name\":\"Bob\""));
    }

    #[test]
    fn get_missing_user_reports_not_found() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        assert_eq!(
            output(repl.execute_line("get 99")),
            "User with ID 99 not found."
        );
    }

    #[test]
    fn update_of_missing_user_reports_not_found() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        assert_eq!(
            output(repl.execute_line("update 1 {\"name\":\"Bob\",\"email\":\"bob@x.co\"}")),
            "User with ID 1 not found."
        );
    }

    #[test]
    fn update_replaces_all_mutable_fields() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        output(repl.execute_line("create {\"name\":\"Alice\",\"email\":\"alice@example.com\"}"));
        let text =
            output(repl.execute_line("update 1 {\"name\":\"Bob\",\"email\":\"bob@x.co\"}"));
        assert_eq!(
            text,
            "User updated: {\"id\":1,\"name\":\"Bob\",\"email\":\"bob@x.co\"}"
        );
    }

    #[test]
    fn delete_twice_reports_success_then_not_found() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        output(repl.execute_line("create {\"name\":\"Alice\",\"email\":\"alice@example.com\"}"));
        assert_eq!(
            output(repl.execute_line("delete 1")),
            "User with ID 1 deleted successfully."
        );
        assert_eq!(
            output(repl.execute_line("delete 1")),
            "User with ID 1 not found."
        );
    }

    #[test]
    fn non_integer_id_is_rejected_before_dispatch() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        let message = invalid_argument(repl.execute_line("get abc"));
        assert!(message.contains("integer"));
    }

    #[test]
    fn missing_arguments_print_usage() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        assert!(invalid_argument(repl.execute_line("create")).starts_with("Usage: create"));
        assert!(invalid_argument(repl.execute_line("update 1")).starts_with("Usage: update"));
        assert!(invalid_argument(repl.execute_line("delete")).starts_with("Usage: delete"));
    }

    #[test]
    fn unknown_command_keeps_the_session_alive() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        let text = output(repl.execute_line("frobnicate"));
        assert!(text.starts_with("Unknown command: 'frobnicate'"));
    }

    #[test]
    fn exit_and_quit_terminate_the_loop() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        assert!(matches!(repl.execute_line("exit"), LineOutcome::Exit));
        assert!(matches!(repl.execute_line("quit"), LineOutcome::Exit));
    }

    #[test]
    fn help_lists_the_command_table() {
        let conn = open_db_in_memory().unwrap();
        let repl = Repl::new(UserService::new(SqliteUserRepository::new(&conn)));

        let text = output(repl.execute_line("help"));
        for command in ["create", "get", "get-all", "update", "delete", "exit"] {
            assert!(text.contains(command), "help should mention {command}");
        }
    }
}

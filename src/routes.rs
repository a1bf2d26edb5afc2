// src/routes.rs

use std::path::PathBuf;

use crate::{error::AppError, models::report::DraftField, state::Tab};

/// A kiosk command typed (or scanned) on one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the scanner for a badge login.
    Login,
    /// Open the scanner in the current tab's mode.
    Scan,
    /// Close the scanner without a decode.
    Cancel,
    /// Dismiss the welcome screen.
    Acknowledge,
    Tab(Tab),
    Exam(String),
    Edit(DraftField, String),
    Sign(PathBuf),
    Unsign,
    Submit,
    Logout,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  login                 scan a proctor badge
  scan                  scan a student code (or any code on the minutes tab)
  cancel                close the scanner
  ok                    continue past the welcome screen
  tab scan|minutes      switch tab
  exam <id>             select an exam (empty id clears)
  kelas <text>          override the class name
  present <n>           override the present count
  absent <text>         absence details
  notes <text>          notes for the minutes
  sign <file.png>       attach the signature image
  unsign                clear the signature
  submit                send the minutes
  logout                end the session
  status                show the current form
  help                  this text
  quit                  exit";

/// Parses one input line into a command.
pub fn parse_command(line: &str) -> Result<Command, AppError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let cmd = match head.to_ascii_lowercase().as_str() {
        "login" => Command::Login,
        "scan" => Command::Scan,
        "cancel" => Command::Cancel,
        "ok" => Command::Acknowledge,
        "tab" => match rest.to_ascii_lowercase().as_str() {
            "scan" | "scan-peserta" => Command::Tab(Tab::ScanPeserta),
            "minutes" | "berita-acara" => Command::Tab(Tab::BeritaAcara),
            other => {
                return Err(AppError::ValidationError(format!(
                    "Unknown tab '{}', use 'scan' or 'minutes'",
                    other
                )));
            }
        },
        "exam" => Command::Exam(rest.to_string()),
        "kelas" => Command::Edit(DraftField::Kelas, rest.to_string()),
        "present" => Command::Edit(DraftField::TotalPresent, rest.to_string()),
        "absent" => Command::Edit(DraftField::AbsentDetails, rest.to_string()),
        "notes" => Command::Edit(DraftField::Notes, rest.to_string()),
        "sign" => {
            if rest.is_empty() {
                return Err(AppError::ValidationError("Usage: sign <file.png>".to_string()));
            }
            Command::Sign(PathBuf::from(rest))
        }
        "unsign" => Command::Unsign,
        "submit" => Command::Submit,
        "logout" => Command::Logout,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => return Err(AppError::ValidationError("Empty command".to_string())),
        other => {
            return Err(AppError::ValidationError(format!(
                "Unknown command '{}', type 'help'",
                other
            )));
        }
    };

    Ok(cmd)
}

use forno_core::discovery::document;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    match serde_json::to_string_pretty(&document()) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("discovery", "serialization", error.to_string(), 1),
    }
}

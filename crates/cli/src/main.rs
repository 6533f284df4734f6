use std::process::ExitCode;

fn main() -> ExitCode {
    forno_cli::run()
}

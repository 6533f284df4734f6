pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "forno",
    about = "Forno Antico operator CLI",
    long_about = "Inspect the menu, the discovery document, and the agent tools, call a tool against the configured cart, and review effective configuration.",
    after_help = "Examples:\n  forno menu\n  forno call configurator.set_selection --params '{\"categoryId\":\"cheese\",\"ingredientId\":\"burrata\"}'\n  forno call cart.add_current_pizza\n  forno call order.place"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List menu categories and ingredients with prices")]
    Menu,
    #[command(about = "Print the agent discovery document as JSON")]
    Discovery,
    #[command(about = "List the agent tools with their descriptions")]
    Tools,
    #[command(about = "Invoke one agent tool against the configured cart and print its result envelope")]
    Call {
        #[arg(help = "Tool name, e.g. cart.get_snapshot")]
        tool: String,
        #[arg(long, help = "Tool parameters as a JSON object")]
        params: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Menu => commands::CommandResult { exit_code: 0, output: commands::menu::run() },
        Command::Discovery => commands::discovery::run(),
        Command::Tools => commands::CommandResult { exit_code: 0, output: commands::tools::run() },
        Command::Call { tool, params } => commands::call::run(&tool, params.as_deref()),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

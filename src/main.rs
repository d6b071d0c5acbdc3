//! run_template CLI entry point
//!
//! Parses the three positional arguments, renders the template and maps
//! any failure to a message on stderr and exit status 1.

use run_template::cli;
use run_template::core::{RunTemplateError, user_friendly_error};

fn main() {
    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = match cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(RunTemplateError::Usage) => {
            eprintln!("{}", RunTemplateError::Usage);
            std::process::exit(1);
        }
        Err(e) => {
            user_friendly_error(e.into()).display();
            std::process::exit(1);
        }
    };

    if let Err(e) = cli.execute() {
        // Convert to user-friendly error with context and suggestions
        user_friendly_error(e).display();
        std::process::exit(1);
    }
}

// Mon Feb 02 2026 - Alex

use colored::Colorize;

fn main() {
    match leak_report::cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "[!]".red(), e);
            std::process::exit(1);
        }
    }
}

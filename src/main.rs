//! idir - membership service for a community mutual-aid society

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, missing_debug_implementations)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod cli;

use colored::Colorize;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

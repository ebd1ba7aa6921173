//! adjust-display CLI
//!
//! Lists attached displays and changes their video mode and DPI scale.
//!
//! Usage:
//!   adjust-display get                          # List displays
//!   adjust-display get disp=2                   # List the video modes of display 2
//!   adjust-display get --json                   # Dump the display registry as JSON
//!   adjust-display set width=1920 height=1080   # Best matching mode on display 1
//!   adjust-display set disp=2 mode=14 scale=150 # Mode 14 of display 2 at 150%
//!   adjust-display ident                        # Print display identification labels
//!
//! `--fixture layout.json` runs every command against a simulated display layout.

use crate::cli::Cli;

mod cli;
mod command;
mod config;
mod help;
mod utils;

fn main() {
    use clap::Parser;
    let cli = Cli::parse();

    if let Err(e) = command::run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

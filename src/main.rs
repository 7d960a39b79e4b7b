//! This crate contains the source code for the binary of the maze animator mazestep.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use std::io;

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use mazestep::{config::Cli, headless, App};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    let settings = cli.settings()?;

    if cli.print {
        let _path = headless::print_solution(&settings, &mut io::stdout().lock())?;
        return Ok(());
    }

    let mut app = App::new(settings)?;
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}

#![deny(warnings)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use clap::Parser;
use vm2hack::translate;

#[derive(Parser)] // requires `derive` feature
#[command(name = "vm2hack")]
#[command(
    bin_name = "vm2hack",
    version,
    about = "Translates stack VM code into Hack assembly",
    long_about = "Translates stack VM code into Hack assembly. Given a .vm file the output is written next to it as a .asm file; given a directory, every .vm unit inside is translated and combined into a single <dir>/<dir>.asm."
)]
struct TranslatorCli {
    /// A .vm source file or a program directory containing .vm files
    path: PathBuf,
    #[arg(short = 'b', long)]
    /// Prepend the bootstrap prologue (SP = 256, then call Sys.init)
    bootstrap: bool,
}

fn main() -> miette::Result<()> {
    let cli = TranslatorCli::parse();
    println!("Start translating for '{}'", cli.path.display());
    let output = translate(&cli.path, cli.bootstrap)?;
    println!("Completed: {}", output.display());
    Ok(())
}

mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Show bclyt info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("bclyt", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Info { path } => commands::info::run(path, &cli.global),
        Command::Tree { path, groups } => commands::tree::run(path, *groups, &cli.global),
        Command::Export { path, dump, po } => {
            commands::export::run(path, dump.as_deref(), po.as_deref(), &cli.global)
        }
        Command::Import {
            original,
            dump,
            po,
            output,
        } => commands::import::run(
            original,
            dump.as_deref(),
            po.as_deref(),
            output,
            &cli.global,
        ),
        Command::ExportDir { input, output } => {
            commands::batch::export_dir(input, output, &cli.global)
        }
        Command::ImportDir {
            original,
            input,
            output,
        } => commands::batch::import_dir(original, input, output, &cli.global),
        Command::Verify { path } => commands::verify::run(path, &cli.global),
    }
}

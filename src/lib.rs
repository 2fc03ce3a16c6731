pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod interpreter;
pub mod packages;
pub mod ui;
pub mod utils;

use clap::Parser;
use std::process::exit;

/// Run pypkgs CLI entrypoint.
pub fn run_cli() {
    // 1. Signal handling (running commands poll the flag and stop)
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        ui::mark_interrupted();
        ui::warning("Operation cancelled by user.");
    }) {
        ui::warning(&format!("Could not set Ctrl-C handler: {}", e));
    }

    // 2. Parse & load settings
    let args = cli::args::Cli::parse();
    let ctx = match context::AppContext::load(args.global.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            ui::error(&format!("{}", e));
            exit(1);
        }
    };

    // 3. Output modes, flags override settings
    let color = args
        .global
        .color
        .map(|c| c.as_str())
        .unwrap_or(ctx.settings.color.as_str());
    ui::init_colors(color);
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose || ctx.settings.verbose);

    // 4. Run
    let result = cli::dispatcher::dispatch(&args, &ctx);
    ctx.shutdown();

    if let Err(e) = result {
        ui::error(&format!("{}", e));
        exit(1);
    }
}

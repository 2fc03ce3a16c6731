//! Command dispatcher
//!
//! Routes CLI commands to their handlers. Commands that act on an
//! interpreter get a management service for it, resolved through the
//! context's registry.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::core::{Module, Project};
use crate::error::Result;
use crate::packages::ManagementService;
use crate::ui as output;
use std::env;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli, ctx: &AppContext) -> Result<()> {
    match &args.command {
        Command::Config => commands::settings::run(ctx, args.global.config.as_deref()),
        Command::Completions { shell } => commands::completions::run(*shell),
        command => {
            let service = service_for(args, ctx)?;
            route(command, ctx, &service)
        }
    }
}

fn service_for(args: &Cli, ctx: &AppContext) -> Result<ManagementService> {
    let interpreter = commands::select_interpreter(args.global.python.as_deref());
    output::debug(&format!(
        "interpreter: {} ({})",
        interpreter.name(),
        interpreter.home_path().unwrap_or("no home path")
    ));

    let root = env::current_dir()?;
    let module = Module::from_root(&root);
    let project = Project::new(module.name, root);

    Ok(ctx.registry.management_service(&project, &interpreter))
}

fn route(command: &Command, ctx: &AppContext, service: &ManagementService) -> Result<()> {
    match command {
        Command::Resolve => commands::resolve::run(service),

        Command::List { cached, json } => commands::list::run(
            service,
            commands::list::ListOptions {
                cached: *cached,
                json: *json,
            },
        ),

        Command::Install {
            requirements,
            upgrade,
            user,
            extra,
        } => commands::install::run(
            service,
            commands::install::InstallOptions {
                requirements: requirements.clone(),
                upgrade: *upgrade,
                user: *user,
                extra: extra.clone(),
            },
        ),

        Command::Uninstall { packages } => commands::uninstall::run(service, packages),

        Command::Venv {
            destination,
            system_site_packages,
        } => commands::venv::run(service, destination, *system_site_packages),

        Command::Dependents { package } => commands::dependents::run(service, package),

        Command::Check { module } => commands::check::run(
            service,
            module,
            &ctx.registry.options().requirements_file,
        ),

        // Handled in `dispatch` before an interpreter is selected
        Command::Config | Command::Completions { .. } => Ok(()),
    }
}

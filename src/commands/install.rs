use crate::core::Requirement;
use crate::error::Result;
use crate::packages::{ManagementService, ManagerKind, PackageManager};
use crate::ui as output;

/// Options for the install command
pub struct InstallOptions {
    pub requirements: Vec<String>,
    pub upgrade: bool,
    pub user: bool,
    pub extra: Vec<String>,
}

pub fn run(service: &ManagementService, options: InstallOptions) -> Result<()> {
    let requirements = options
        .requirements
        .iter()
        .map(|r| Requirement::parse(r))
        .collect::<Result<Vec<_>>>()?;

    let manager = service.manager();

    if options.user && !service.can_install_to_user() {
        output::warning(&format!(
            "--user is ignored for {}",
            service.interpreter().name()
        ));
    }

    if !manager.has_management(false)? {
        output::info(bootstrap_message(manager.kind()));
        manager.install_management()?;
    }

    let args = service.install_options(options.upgrade, options.user, &options.extra);
    if !args.is_empty() {
        output::debug(&format!("{}: {}", service.install_options_hint(), args.join(" ")));
    }

    manager.install(&requirements, &args)?;

    let names: Vec<String> = requirements.iter().map(|r| r.to_string()).collect();
    output::success(&format!("Installed {}", names.join(", ")));
    Ok(())
}

fn bootstrap_message(kind: ManagerKind) -> &'static str {
    match kind {
        ManagerKind::Conda => "conda executable not found, trying to install pip with conda",
        _ => "pip is missing, installing it first",
    }
}

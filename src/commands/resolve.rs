use crate::error::Result;
use crate::packages::{ManagementService, ManagerKind, PackageManager, ServiceFlavor};
use crate::ui as output;

pub fn run(service: &ManagementService) -> Result<()> {
    let interpreter = service.interpreter();
    let manager = service.manager();

    output::header("Interpreter");
    output::keyval("Name", interpreter.name());
    output::keyval("Home", interpreter.home_path().unwrap_or("-"));
    output::keyval("Version", &interpreter.language_level().to_string());
    output::keyval("Type", interpreter.flavor().name());

    output::header("Package manager");
    output::keyval("Manager", &manager.kind().to_string());
    output::keyval(
        "Service",
        match service.flavor() {
            ServiceFlavor::Standard => "standard",
            ServiceFlavor::Conda => "conda",
        },
    );
    output::keyval("Options", service.install_options_hint());
    output::keyval(
        "User site",
        if service.can_install_to_user() { "yes" } else { "no" },
    );

    if manager.kind() == ManagerKind::Remote {
        // Probing a remote host is slow; report what is known.
        return Ok(());
    }

    if !manager.has_management(false)? {
        output::warning(&format!(
            "pip is not available for {} (run `pypkgs install` to bootstrap it)",
            interpreter.name()
        ));
    }

    Ok(())
}

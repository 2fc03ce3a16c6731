use crate::error::Result;
use crate::packages::{ManagementService, PackageManager};
use crate::ui as output;
use std::path::Path;

pub fn run(
    service: &ManagementService,
    destination: &Path,
    system_site_packages: bool,
) -> Result<()> {
    output::info(&format!(
        "Creating virtual environment from {}",
        service.interpreter().name()
    ));

    let python = service
        .manager()
        .create_virtual_env(destination, system_site_packages)?;

    output::success(&format!(
        "Created virtual environment at {}",
        destination.display()
    ));
    output::keyval("Interpreter", &python);
    Ok(())
}

use crate::error::Result;
use crate::packages::ManagementService;
use crate::ui as output;
use crate::utils::sanitize;

pub fn run(service: &ManagementService, packages: &[String]) -> Result<()> {
    sanitize::validate_package_names(packages)?;
    service.uninstall_packages(packages)?;
    output::success(&format!("Removed {}", packages.join(", ")));
    Ok(())
}

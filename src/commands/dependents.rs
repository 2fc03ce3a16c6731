use crate::error::{PypkgsError, Result};
use crate::packages::{ManagementService, PackageManager};
use crate::ui as output;

pub fn run(service: &ManagementService, name: &str) -> Result<()> {
    let manager = service.manager();
    let package = manager.find_package(name, false)?.ok_or_else(|| {
        PypkgsError::PackageManagerError(format!(
            "Package '{}' is not installed in {}",
            name,
            service.interpreter().name()
        ))
    })?;

    match manager.dependents(&package)? {
        Some(dependents) if !dependents.is_empty() => {
            output::header(&format!("Packages depending on {}", package));
            for dependent in dependents {
                output::indent(&dependent.to_string(), 1);
            }
        }
        _ => output::info(&format!("Nothing depends on {}", package.name)),
    }
    Ok(())
}

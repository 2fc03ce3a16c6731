use crate::core::Module;
use crate::error::{PypkgsError, Result};
use crate::packages::{ManagementService, PackageManager};
use crate::ui as output;
use colored::Colorize;
use std::path::Path;

/// Compare a module's requirements file with what is installed.
///
/// Fails when any requirement is not satisfied, so it can gate scripts.
pub fn run(service: &ManagementService, root: &Path, requirements_file: &str) -> Result<()> {
    let module = Module::from_root(root);

    let Some(requirements) = service.manager().requirements(&module) else {
        output::info(&format!(
            "No {} in {}",
            requirements_file,
            module.root.display()
        ));
        return Ok(());
    };

    let missing = service.missing_requirements(&module)?;
    if missing.is_empty() {
        output::success(&format!(
            "All {} requirements of {} are satisfied",
            requirements.len(),
            module.name
        ));
        return Ok(());
    }

    output::header(&format!("Missing requirements ({})", missing.len()));
    for requirement in &missing {
        println!("  {} {}", "✗".red(), requirement);
    }

    Err(PypkgsError::PackageManagerError(format!(
        "{} of {} requirements of {} are not satisfied",
        missing.len(),
        requirements.len(),
        module.name
    )))
}

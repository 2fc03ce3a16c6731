use crate::core::Package;
use crate::error::Result;
use crate::packages::{ManagementService, PackageManager};
use crate::ui as output;
use colored::Colorize;

/// Options for the list command
pub struct ListOptions {
    pub cached: bool,
    pub json: bool,
}

pub fn run(service: &ManagementService, options: ListOptions) -> Result<()> {
    let packages = if options.cached {
        service.manager().packages(true)?
    } else {
        Some(service.installed_packages()?)
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&packages)?);
        return Ok(());
    }

    match packages {
        Some(packages) => display_packages(service, &packages),
        None => output::info("No cached package list for this interpreter"),
    }
    Ok(())
}

fn display_packages(service: &ManagementService, packages: &[Package]) {
    if packages.is_empty() {
        output::info("No packages found");
        return;
    }

    output::header(&format!(
        "Installed Packages ({}) in {}",
        packages.len(),
        service.interpreter().name()
    ));

    let mut sorted: Vec<&Package> = packages.iter().collect();
    sorted.sort_by_key(|p| p.name.to_lowercase());

    for pkg in sorted {
        println!("  {:<36} {:>14}", pkg.name, pkg.version.dimmed());
    }
}

pub mod requirements;
pub mod types;

pub use requirements::{Requirement, VersionSpec, parse_requirements_file};
pub use types::{Module, Package, Project};

//! # Package Managers
//!
//! One manager is bound to one Python interpreter and performs package
//! operations against it.
//!
//! ## Implementations
//!
//! - **pip** (`pip.rs`): `python -m pip` for local interpreters
//! - **conda** (`conda.rs`): `conda -p ROOT` for conda environments
//! - **remote** (`remote.rs`): pip over `ssh` or `docker exec`
//! - **invalid** (`invalid.rs`): interpreters without a home path; every
//!   operation fails with an execution error
//!
//! All of them implement [`PackageManager`] and are wrapped in the closed
//! [`Manager`] enum.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pypkgs::interpreter::Interpreter;
//! use pypkgs::packages::{ManagerRegistry, PackageManager};
//!
//! let registry = ManagerRegistry::default();
//! let interpreter = Interpreter::detect("/usr/bin/python3");
//! let manager = registry.resolve(&interpreter);
//! manager.install_requirement("requests>=2.31")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod conda;
pub mod invalid;
pub mod locator;
pub mod manager;
pub mod options;
pub mod pip;
pub mod registry;
pub mod remote;
pub mod service;
pub mod traits;

pub use locator::{CondaLocator, FilesystemCondaLocator};
pub use manager::Manager;
pub use options::ManagerOptions;
pub use registry::ManagerRegistry;
pub use service::{ManagementService, ServiceFlavor};
pub use traits::{ManagerKind, PackageManager};

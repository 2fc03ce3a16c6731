pub mod check;
pub mod completions;
pub mod dependents;
pub mod install;
pub mod list;
pub mod resolve;
pub mod settings;
pub mod uninstall;
pub mod venv;

use crate::interpreter::{Flavor, Interpreter, LanguageLevel};
use crate::ui;

/// Interpreter named on the command line, or the first python on `PATH`.
///
/// When neither exists the handle has no home path and every package
/// operation on it fails with an execution error.
pub fn select_interpreter(python: Option<&str>) -> Interpreter {
    if let Some(python) = python {
        return Interpreter::detect(python);
    }

    match which::which("python3").or_else(|_| which::which("python")) {
        Ok(path) => Interpreter::detect(&path.to_string_lossy()),
        Err(e) => {
            ui::debug(&format!("no python on PATH: {}", e));
            Interpreter::new(
                "Python (not found on PATH)",
                None,
                LanguageLevel::DEFAULT,
                Flavor::CPython,
            )
        }
    }
}

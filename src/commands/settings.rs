use crate::context::AppContext;
use crate::error::Result;
use crate::ui as output;
use crate::utils::paths;
use std::path::Path;

pub fn run(ctx: &AppContext, config: Option<&Path>) -> Result<()> {
    let path = match config {
        Some(path) => path.to_path_buf(),
        None => paths::settings_file()?,
    };

    output::header("Settings");
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };
    output::keyval("file", &source);
    println!();

    for (key, value) in ctx.settings.entries() {
        output::keyval(key, if value.is_empty() { "-" } else { &value });
    }
    Ok(())
}

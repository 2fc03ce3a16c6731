//! Interpreter handles
//!
//! An [`Interpreter`] names one Python installation: where it lives, which
//! language level it speaks and what kind of installation it is. Local
//! interpreters are identified by the path of their executable, remote ones
//! by an `ssh://` or `docker://` URL.

use crate::error::{PypkgsError, Result};
use crate::ui;
use crate::utils::{platform, process};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

/// Home path prefixes that mark an interpreter as remote
pub const REMOTE_SCHEMES: [&str; 2] = ["ssh://", "docker://"];

const VERSION_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

static LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)").expect("Invalid regex pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LanguageLevel {
    pub major: u8,
    pub minor: u8,
}

impl LanguageLevel {
    /// Assumed when the interpreter cannot tell us
    pub const DEFAULT: LanguageLevel = LanguageLevel {
        major: 3,
        minor: 12,
    };

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// First `X.Y` found in the input (`"3.11"`, `"Python 3.11.4"`, `"python3.11"`)
    pub fn find_in(input: &str) -> Option<Self> {
        let caps = LEVEL.captures(input)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
        })
    }
}

impl Default for LanguageLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for LanguageLevel {
    type Err = PypkgsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::find_in(s)
            .ok_or_else(|| PypkgsError::Other(format!("Invalid language level: '{}'", s)))
    }
}

// Kind of installation. Remote interpreters are recognised from their home
// path, not from the flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    CPython,
    VirtualEnv,
    Conda,
    PyPy,
}

impl Flavor {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CPython => "CPython",
            Self::VirtualEnv => "Virtualenv",
            Self::Conda => "Conda",
            Self::PyPy => "PyPy",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    name: String,
    home_path: Option<String>,
    language_level: LanguageLevel,
    flavor: Flavor,
}

impl Interpreter {
    pub fn new(
        name: impl Into<String>,
        home_path: Option<String>,
        language_level: LanguageLevel,
        flavor: Flavor,
    ) -> Self {
        Self {
            name: name.into(),
            home_path,
            language_level,
            flavor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Executable path or remote URL; the registry cache key
    pub fn home_path(&self) -> Option<&str> {
        self.home_path.as_deref()
    }

    pub fn language_level(&self) -> LanguageLevel {
        self.language_level
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn is_remote(&self) -> bool {
        self.home_path
            .as_deref()
            .is_some_and(|p| REMOTE_SCHEMES.iter().any(|s| p.starts_with(s)))
    }

    pub fn is_conda_venv(&self) -> bool {
        self.flavor == Flavor::Conda
    }

    pub fn is_virtual_env(&self) -> bool {
        self.flavor == Flavor::VirtualEnv
    }

    /// Directory holding the executable. `None` for remote interpreters.
    pub fn home_directory(&self) -> Option<PathBuf> {
        if self.is_remote() {
            return None;
        }
        let home = Path::new(self.home_path.as_deref()?);
        home.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    /// Build a handle for an executable path or a remote URL.
    ///
    /// Local interpreters are classified from their directory layout and
    /// asked for their version; remote ones are never contacted here.
    pub fn detect(path: &str) -> Self {
        if REMOTE_SCHEMES.iter().any(|s| path.starts_with(s)) {
            // Only the executable name carries a version; hosts can be dotted IPs.
            let level = path
                .rsplit('/')
                .next()
                .and_then(LanguageLevel::find_in)
                .unwrap_or_default();
            let host = path
                .split_once("://")
                .map(|(_, rest)| rest.split('/').next().unwrap_or(rest))
                .unwrap_or(path);
            return Self::new(
                format!("Remote Python {} ({})", level, host),
                Some(path.to_string()),
                level,
                Flavor::CPython,
            );
        }

        let executable = Path::new(path);
        let flavor = detect_flavor(executable);
        let level = query_language_level(executable)
            .or_else(|| {
                executable
                    .file_name()
                    .and_then(|n| LanguageLevel::find_in(&n.to_string_lossy()))
            })
            .unwrap_or_default();

        let env_name = platform::env_root_for(executable)
            .and_then(|root| root.file_name().map(|n| n.to_string_lossy().into_owned()));
        let name = match env_name {
            Some(env) if flavor != Flavor::CPython && flavor != Flavor::PyPy => {
                format!("Python {} ({})", level, env)
            }
            _ => format!("Python {}", level),
        };

        ui::debug(&format!("detected {} interpreter '{}' at {}", flavor, name, path));
        Self::new(name, Some(path.to_string()), level, flavor)
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Classify a local interpreter from its layout on disk.
pub fn detect_flavor(executable: &Path) -> Flavor {
    if let Some(root) = platform::env_root_for(executable) {
        if root.join("conda-meta").is_dir() {
            return Flavor::Conda;
        }
        if root.join("pyvenv.cfg").is_file() {
            return Flavor::VirtualEnv;
        }
    }

    let is_pypy = executable
        .file_name()
        .is_some_and(|n| n.to_string_lossy().to_ascii_lowercase().starts_with("pypy"));
    if is_pypy {
        Flavor::PyPy
    } else {
        Flavor::CPython
    }
}

fn query_language_level(executable: &Path) -> Option<LanguageLevel> {
    let mut cmd = Command::new(executable);
    cmd.arg("--version");
    let output = process::run_command_with_timeout(&mut cmd, VERSION_QUERY_TIMEOUT).ok()?;
    if !output.status.success() {
        return None;
    }
    // Python 2 prints its version on stderr
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    LanguageLevel::find_in(&text)
}

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pypkgs",
    about = "Manage Python packages per interpreter",
    long_about = "Manage Python packages per interpreter - pip, conda environments and remote interpreters over ssh or docker",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Interpreter executable or remote URL (ssh://host/path, docker://container/path)
    ///
    /// Defaults to python3 (or python) on PATH.
    #[arg(short = 'p', long, global = true, value_name = "PYTHON")]
    pub python: Option<String>,

    /// Settings file (defaults to settings.kdl in the config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the interpreter and the package manager selected for it
    Resolve,

    /// List installed packages
    List {
        /// Only show what is already cached (never runs pip or conda)
        #[arg(long)]
        cached: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Install packages from requirement strings
    Install {
        /// Requirements, e.g. requests or "django>=4.2,<5"
        #[arg(required = true)]
        requirements: Vec<String>,

        /// Upgrade already installed packages
        #[arg(short = 'U', long)]
        upgrade: bool,

        /// Install into the user site (pip, non-virtualenv interpreters only)
        #[arg(long)]
        user: bool,

        /// Extra options passed to pip or conda, after `--`
        #[arg(last = true)]
        extra: Vec<String>,
    },

    /// Uninstall packages
    Uninstall {
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Create a virtual environment from the interpreter
    Venv {
        destination: PathBuf,

        /// Give the environment access to the global site-packages
        #[arg(long)]
        system_site_packages: bool,
    },

    /// Show installed packages that depend on a package
    Dependents { package: String },

    /// Check a module's requirements file against installed packages
    Check {
        /// Module root containing the requirements file
        #[arg(default_value = ".")]
        module: PathBuf,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_install_with_extra_args() {
        let cli = Cli::try_parse_from([
            "pypkgs",
            "--python",
            "/usr/bin/python3",
            "install",
            "-U",
            "requests>=2",
            "flask",
            "--",
            "--no-deps",
        ])
        .unwrap();

        assert_eq!(cli.global.python.as_deref(), Some("/usr/bin/python3"));
        match cli.command {
            Command::Install {
                requirements,
                upgrade,
                user,
                extra,
            } => {
                assert_eq!(requirements, vec!["requests>=2", "flask"]);
                assert!(upgrade);
                assert!(!user);
                assert_eq!(extra, vec!["--no-deps"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pypkgs", "list", "-p", "ssh://box/usr/bin/python3", "-v"])
            .unwrap();
        assert!(cli.global.verbose);
        assert!(matches!(cli.command, Command::List { cached: false, .. }));
    }

    #[test]
    fn install_needs_requirements() {
        assert!(Cli::try_parse_from(["pypkgs", "install"]).is_err());
    }

    #[test]
    fn check_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["pypkgs", "check"]).unwrap();
        match cli.command {
            Command::Check { module } => assert_eq!(module, PathBuf::from(".")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

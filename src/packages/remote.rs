//! Remote interpreters
//!
//! Home paths of remote interpreters are URLs:
//!
//! - `ssh://[user@]host[:port]/path/to/python`, IPv6 hosts in brackets
//! - `docker://container/path/to/python`
//!
//! Package operations are the pip ones, executed through `ssh` or
//! `docker exec`. A malformed URL is reported when the manager is first
//! used, not when it is created.

use crate::core::{Module, Package, Requirement};
use crate::error::{PypkgsError, Result};
use crate::packages::cache::module_requirements;
use crate::packages::options::ManagerOptions;
use crate::packages::pip::{PipManager, PythonRunner};
use crate::packages::traits::{ManagerKind, PackageManager};
use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    Ssh {
        user: Option<String>,
        host: String,
        port: Option<u16>,
        python: String,
    },
    Docker {
        container: String,
        python: String,
    },
}

impl RemoteTarget {
    pub fn parse(url: &str) -> Result<Self> {
        Self::parse_url(url).map_err(PypkgsError::InvalidRemote)
    }

    fn parse_url(url: &str) -> std::result::Result<Self, String> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| format!("'{}' is not a remote interpreter URL", url))?;

        let (authority, path) = match rest.find('/') {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, ""),
        };
        if path.len() <= 1 {
            return Err(format!("'{}' has no interpreter path", url));
        }
        if authority.is_empty() {
            return Err(format!("'{}' has no host", url));
        }
        let python = path.to_string();

        match scheme {
            "ssh" => {
                let (user, host_port) = match authority.split_once('@') {
                    Some((user, host)) if !user.is_empty() => (Some(user.to_string()), host),
                    Some((_, host)) => (None, host),
                    None => (None, authority),
                };
                let (host, port) = split_host_port(host_port)
                    .ok_or_else(|| format!("'{}' has an unterminated IPv6 host", url))?;
                let port = port
                    .map(|p| {
                        p.parse::<u16>()
                            .map_err(|_| format!("'{}' has an invalid port '{}'", url, p))
                    })
                    .transpose()?;
                let host = host.to_string();
                if host.is_empty() {
                    return Err(format!("'{}' has no host", url));
                }
                Ok(Self::Ssh {
                    user,
                    host,
                    port,
                    python,
                })
            }
            "docker" => Ok(Self::Docker {
                container: authority.to_string(),
                python,
            }),
            other => Err(format!("unsupported remote scheme '{}'", other)),
        }
    }

    pub fn python(&self) -> &str {
        match self {
            Self::Ssh { python, .. } | Self::Docker { python, .. } => python,
        }
    }

    /// Build the local command that runs `python <args>` on the remote side.
    pub fn command(&self, args: &[String], options: &ManagerOptions) -> Result<Command> {
        match self {
            Self::Ssh {
                user,
                host,
                port,
                python,
            } => {
                let words = std::iter::once(python.as_str()).chain(args.iter().map(String::as_str));
                let remote = shlex::try_join(words).map_err(|e| {
                    PypkgsError::InvalidRemote(format!("cannot quote remote command: {}", e))
                })?;

                let mut cmd = Command::new(&options.ssh_binary);
                cmd.args(["-o", "BatchMode=yes"]);
                if let Some(port) = port {
                    cmd.arg("-p").arg(port.to_string());
                }
                match user {
                    Some(user) => cmd.arg(format!("{}@{}", user, host)),
                    None => cmd.arg(host),
                };
                cmd.arg("--").arg(remote);
                Ok(cmd)
            }
            Self::Docker { container, python } => {
                let mut cmd = Command::new(&options.docker_binary);
                cmd.arg("exec").arg(container).arg(python).args(args);
                Ok(cmd)
            }
        }
    }
}

/// Split `host[:port]` or `[v6addr][:port]`; brackets are dropped from the host.
/// Anything after `]` other than `:port` is kept in the port so it fails to parse.
fn split_host_port(authority: &str) -> Option<(&str, Option<&str>)> {
    match authority.strip_prefix('[') {
        Some(bracketed) => {
            let (host, after) = bracketed.split_once(']')?;
            match after {
                "" => Some((host, None)),
                _ => Some((host, Some(after.strip_prefix(':').unwrap_or(after)))),
            }
        }
        None => match authority.rsplit_once(':') {
            Some((host, port)) => Some((host, Some(port))),
            None => Some((authority, None)),
        },
    }
}

/// Manager for interpreters on another machine or in a container
pub struct RemoteManager {
    home_path: String,
    requirements_file: String,
    pip: std::result::Result<PipManager, String>,
}

impl RemoteManager {
    pub fn new(home_path: &str, options: ManagerOptions) -> Self {
        let requirements_file = options.requirements_file.clone();
        let pip = RemoteTarget::parse_url(home_path).map(|target| {
            PipManager::with_runner(home_path, PythonRunner::Remote(target), options)
        });

        Self {
            home_path: home_path.to_string(),
            requirements_file,
            pip,
        }
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn target(&self) -> Option<&RemoteTarget> {
        self.pip.as_ref().ok().and_then(PipManager::remote_target)
    }

    fn pip(&self) -> Result<&PipManager> {
        self.pip
            .as_ref()
            .map_err(|reason| PypkgsError::InvalidRemote(reason.clone()))
    }
}

impl PackageManager for RemoteManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Remote
    }

    fn install_management(&self) -> Result<()> {
        self.pip()?.install_management()
    }

    fn has_management(&self, cached_only: bool) -> Result<bool> {
        self.pip()?.has_management(cached_only)
    }

    fn install_requirement(&self, requirement: &str) -> Result<()> {
        self.pip()?.install_requirement(requirement)
    }

    fn install(&self, requirements: &[Requirement], extra_args: &[String]) -> Result<()> {
        self.pip()?.install(requirements, extra_args)
    }

    fn uninstall(&self, packages: &[Package]) -> Result<()> {
        self.pip()?.uninstall(packages)
    }

    fn refresh(&self) {
        if let Ok(pip) = &self.pip {
            pip.refresh();
        }
    }

    fn create_virtual_env(&self, destination: &Path, use_global_site: bool) -> Result<String> {
        self.pip()?.create_virtual_env(destination, use_global_site)
    }

    fn packages(&self, cached_only: bool) -> Result<Option<Vec<Package>>> {
        self.pip()?.packages(cached_only)
    }

    fn requirements(&self, module: &Module) -> Option<Vec<Requirement>> {
        module_requirements(module, &self.requirements_file)
    }

    fn dependents(&self, package: &Package) -> Result<Option<BTreeSet<Package>>> {
        self.pip()?.dependents(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn parses_ssh_urls() {
        let target = RemoteTarget::parse("ssh://dev@build-01:2222/usr/bin/python3").unwrap();
        assert_eq!(
            target,
            RemoteTarget::Ssh {
                user: Some("dev".into()),
                host: "build-01".into(),
                port: Some(2222),
                python: "/usr/bin/python3".into(),
            }
        );

        let target = RemoteTarget::parse("ssh://box/opt/py/bin/python").unwrap();
        assert_eq!(target.python(), "/opt/py/bin/python");
    }

    #[test]
    fn parses_docker_urls() {
        let target = RemoteTarget::parse("docker://web/usr/local/bin/python").unwrap();
        assert_eq!(
            target,
            RemoteTarget::Docker {
                container: "web".into(),
                python: "/usr/local/bin/python".into(),
            }
        );
    }

    #[test]
    fn parses_bracketed_ipv6_hosts() {
        let target = RemoteTarget::parse("ssh://[::1]/usr/bin/python").unwrap();
        assert_eq!(
            target,
            RemoteTarget::Ssh {
                user: None,
                host: "::1".into(),
                port: None,
                python: "/usr/bin/python".into(),
            }
        );

        let target = RemoteTarget::parse("ssh://dev@[fe80::1]:2222/usr/bin/python3").unwrap();
        let cmd = target.command(&[], &ManagerOptions::default()).unwrap();
        assert_eq!(
            args(&cmd),
            ["-o", "BatchMode=yes", "-p", "2222", "dev@fe80::1", "--", "/usr/bin/python3"]
        );

        assert!(RemoteTarget::parse("ssh://[::1/usr/bin/python").is_err());
        assert!(RemoteTarget::parse("ssh://[::1]x/usr/bin/python").is_err());
    }

    #[test]
    fn rejects_malformed_urls() {
        assert!(RemoteTarget::parse("ssh://box").is_err());
        assert!(RemoteTarget::parse("ssh://box/").is_err());
        assert!(RemoteTarget::parse("ssh:///usr/bin/python").is_err());
        assert!(RemoteTarget::parse("ssh://box:abc/usr/bin/python").is_err());
        assert!(RemoteTarget::parse("ftp://box/usr/bin/python").is_err());
        assert!(RemoteTarget::parse("/usr/bin/python").is_err());
    }

    #[test]
    fn ssh_command_quotes_remote_side() {
        let target = RemoteTarget::parse("ssh://dev@box:2200/usr/bin/python3").unwrap();
        let cmd = target
            .command(
                &["-m".into(), "pip".into(), "install".into(), "requests>=2; rm".into()],
                &ManagerOptions::default(),
            )
            .unwrap();

        assert_eq!(cmd.get_program(), "ssh");
        let args = args(&cmd);
        assert_eq!(&args[..5], &["-o", "BatchMode=yes", "-p", "2200", "dev@box"]);
        assert_eq!(args[5], "--");
        assert_eq!(
            shlex::split(&args[6]).unwrap(),
            vec!["/usr/bin/python3", "-m", "pip", "install", "requests>=2; rm"]
        );
    }

    #[test]
    fn docker_command_uses_exec() {
        let target = RemoteTarget::parse("docker://web/usr/bin/python").unwrap();
        let options = ManagerOptions {
            docker_binary: "podman".into(),
            ..ManagerOptions::default()
        };
        let cmd = target.command(&["--version".into()], &options).unwrap();
        assert_eq!(cmd.get_program(), "podman");
        assert_eq!(args(&cmd), vec!["exec", "web", "/usr/bin/python", "--version"]);
    }

    #[test]
    fn malformed_remote_fails_on_use() {
        let manager = RemoteManager::new("ssh://", ManagerOptions::default());
        assert_eq!(manager.kind(), ManagerKind::Remote);
        assert!(manager.target().is_none());
        manager.refresh();
        let err = manager.packages(false).unwrap_err();
        assert!(matches!(err, PypkgsError::InvalidRemote(_)));
    }
}

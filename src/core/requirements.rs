//! Requirement strings and `requirements.txt` files
//!
//! Supports the subset of PEP 508 that appears in requirement files in
//! practice: a name, optional extras, comma separated version specifiers and
//! an environment marker, which is carried through but never evaluated.

use crate::core::types::Package;
use crate::error::{PypkgsError, Result};
use crate::ui;
use crate::utils::sanitize;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<specs>[^;]*?)\s*(?:;\s*(?P<marker>.*?))?\s*$",
    )
    .expect("Invalid regex pattern")
});

static VERSION_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<op>===|~=|==|!=|<=|>=|<|>)\s*(?P<version>[A-Za-z0-9_.*+!-]+)\s*$")
        .expect("Invalid regex pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Compatible,
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    Identical,
}

impl Operator {
    fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "~=" => Self::Compatible,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "<=" => Self::LessEqual,
            ">=" => Self::GreaterEqual,
            "<" => Self::Less,
            ">" => Self::Greater,
            "===" => Self::Identical,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compatible => "~=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Identical => "===",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    pub op: Operator,
    pub version: String,
}

impl VersionSpec {
    pub fn is_satisfied_by(&self, installed: &str) -> bool {
        match self.op {
            Operator::Identical => installed == self.version,
            Operator::Equal => equal_version(installed, &self.version),
            Operator::NotEqual => !equal_version(installed, &self.version),
            Operator::Less => compare_versions(installed, &self.version) == Ordering::Less,
            Operator::LessEqual => compare_versions(installed, &self.version) != Ordering::Greater,
            Operator::Greater => compare_versions(installed, &self.version) == Ordering::Greater,
            Operator::GreaterEqual => compare_versions(installed, &self.version) != Ordering::Less,
            Operator::Compatible => {
                let wanted = release(&self.version);
                if compare_versions(installed, &self.version) == Ordering::Less {
                    return false;
                }
                // ~=1.4.5 means >=1.4.5, ==1.4.*
                let prefix = &wanted[..wanted.len().saturating_sub(1).max(1).min(wanted.len())];
                let have = release(installed);
                have.len() >= prefix.len() && have[..prefix.len()] == *prefix
            }
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.version)
    }
}

/// A single requirement, e.g. `requests[socks]>=2.31,<3; python_version >= "3.8"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub specs: Vec<VersionSpec>,
    pub marker: Option<String>,
}

impl Requirement {
    /// Requirement on any version of `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extras: Vec::new(),
            specs: Vec::new(),
            marker: None,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let caps = REQUIREMENT
            .captures(input)
            .ok_or_else(|| PypkgsError::InvalidRequirement(input.trim().to_string()))?;

        let name = caps["name"].to_string();
        sanitize::validate_package_name(&name)?;

        let extras = caps
            .name("extras")
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let raw_specs = caps.name("specs").map(|m| m.as_str()).unwrap_or("");
        let raw_specs = raw_specs
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');

        let mut specs = Vec::new();
        for part in raw_specs.split(',').filter(|p| !p.trim().is_empty()) {
            let spec = VERSION_SPEC
                .captures(part)
                .and_then(|c| {
                    Operator::parse(&c["op"]).map(|op| VersionSpec {
                        op,
                        version: c["version"].to_string(),
                    })
                })
                .ok_or_else(|| PypkgsError::InvalidRequirement(input.trim().to_string()))?;
            specs.push(spec);
        }

        let marker = caps
            .name("marker")
            .map(|m| m.as_str().trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(Self {
            name,
            extras,
            specs,
            marker,
        })
    }

    /// Whether an installed package fulfils this requirement.
    ///
    /// Markers are not evaluated.
    pub fn is_satisfied_by(&self, package: &Package) -> bool {
        package.matches_name(&self.name)
            && self.specs.iter().all(|s| s.is_satisfied_by(&package.version))
    }

    /// Find the installed package satisfying this requirement, if any
    pub fn match_installed<'a>(&self, installed: &'a [Package]) -> Option<&'a Package> {
        installed.iter().find(|p| self.is_satisfied_by(p))
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        let specs: Vec<String> = self.specs.iter().map(ToString::to_string).collect();
        write!(f, "{}", specs.join(","))?;
        if let Some(marker) = &self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

/// Numeric release segments of a version, ignoring epoch, pre/post/dev and local parts.
fn release(version: &str) -> Vec<u64> {
    let version = version.trim().trim_start_matches(['v', 'V']);
    let version = version.split_once('!').map(|(_, v)| v).unwrap_or(version);
    let version = version.split('+').next().unwrap_or(version);

    let mut parts = Vec::new();
    for segment in version.split('.') {
        let digits: String = segment.chars().take_while(char::is_ascii_digit).collect();
        match digits.parse::<u64>() {
            Ok(n) => parts.push(n),
            Err(_) => break,
        }
        if digits.len() != segment.len() {
            break;
        }
    }
    parts
}

pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a, b) = (release(a), release(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

fn equal_version(installed: &str, wanted: &str) -> bool {
    if let Some(prefix) = wanted.strip_suffix(".*") {
        let prefix = release(prefix);
        let have = release(installed);
        return have.len() >= prefix.len() && have[..prefix.len()] == *prefix;
    }
    compare_versions(installed, wanted) == Ordering::Equal
}

/// Read requirements from a `requirements.txt`, following `-r` includes.
pub fn parse_requirements_file(path: &Path) -> Result<Vec<Requirement>> {
    let mut visited = HashSet::new();
    let mut requirements = Vec::new();
    collect_requirements(path, &mut visited, &mut requirements)?;
    Ok(requirements)
}

fn collect_requirements(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    out: &mut Vec<Requirement>,
) -> Result<()> {
    let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(key) {
        return Ok(());
    }

    let content = fs::read_to_string(path).map_err(|e| PypkgsError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    for line in logical_lines(&content) {
        if let Some(include) = include_target(&line) {
            collect_requirements(&base.join(include), visited, out)?;
            continue;
        }
        if line.starts_with('-') {
            // -e, -c, --index-url and friends
            continue;
        }
        match Requirement::parse(&line) {
            Ok(req) => out.push(req),
            Err(e) => ui::debug(&format!("{}: skipping '{}': {}", path.display(), line, e)),
        }
    }

    Ok(())
}

/// Lines with continuations joined and comments removed
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for raw in content.lines() {
        if let Some(continued) = raw.strip_suffix('\\') {
            current.push_str(continued);
            current.push(' ');
            continue;
        }
        current.push_str(raw);
        let line = strip_comment(&current).trim().to_string();
        if !line.is_empty() {
            lines.push(line);
        }
        current.clear();
    }

    let line = strip_comment(&current).trim().to_string();
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn include_target(line: &str) -> Option<&str> {
    for flag in ["--requirement", "-r"] {
        if let Some(rest) = line.strip_prefix(flag) {
            let rest = rest.trim_start_matches('=').trim();
            if !rest.is_empty() {
                return Some(rest);
            }
        }
    }
    None
}

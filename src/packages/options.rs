use std::time::Duration;

/// Knobs shared by every manager a registry creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Upper bound for any single pip / conda / ssh / docker invocation
    pub timeout: Duration,
    /// Passed to pip as `--index-url`
    pub pip_index_url: Option<String>,
    /// Passed to conda as `-c` options by the conda management service
    pub conda_channels: Vec<String>,
    pub ssh_binary: String,
    pub docker_binary: String,
    /// Requirements file looked up in module roots
    pub requirements_file: String,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            pip_index_url: None,
            conda_channels: Vec::new(),
            ssh_binary: "ssh".to_string(),
            docker_binary: "docker".to_string(),
            requirements_file: "requirements.txt".to_string(),
        }
    }
}

use std::path::PathBuf;

/// Remote that is fetched from and pushed to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Branch on the remote that the current branch is rebased onto.
pub const DEFAULT_UPSTREAM_BRANCH: &str = "main";

/// Ignore-file path, relative to the working-copy root.
pub const IGNORE_FILE: &str = ".gitignore";

pub const IGNORE_FILE_COMMIT_MESSAGE: &str = "Add Python + Termux + IDE gitignore";

pub const IGNORE_FILE_CONTENT: &str = "\
# Byte-compiled / optimized / DLL files
__pycache__/
*.py[cod]
*$py.class

# Virtual environments
venv/
.env/

# IDEs / editors
.idea/
.vscode/
*.swp

# OS files
.DS_Store
Thumbs.db

# Termux / misc
*.termux
";

#[derive(Debug, Clone)]
pub struct Config {
    pub remote: String,
    pub upstream_branch: String,
    pub ignore_file: PathBuf,
    pub ignore_file_content: String,
    pub ignore_file_commit_message: String,
}

impl Config {
    /// Create a config with explicit remote and upstream branch (useful for tests)
    pub fn new(remote: String, upstream_branch: String) -> Self {
        Self {
            remote,
            upstream_branch,
            ..Self::default()
        }
    }

    /// The remote-tracking ref to rebase onto, e.g. `origin/main`.
    pub fn upstream_ref(&self) -> String {
        format!("{}/{}", self.remote, self.upstream_branch)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            upstream_branch: DEFAULT_UPSTREAM_BRANCH.to_string(),
            ignore_file: PathBuf::from(IGNORE_FILE),
            ignore_file_content: IGNORE_FILE_CONTENT.to_string(),
            ignore_file_commit_message: IGNORE_FILE_COMMIT_MESSAGE.to_string(),
        }
    }
}

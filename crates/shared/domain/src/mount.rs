use serde::{Deserialize, Serialize};

/// Declaration of a mounted sub-application.
///
/// Accepts both the full table form and a bare name:
///
/// ```toml
/// apps = ["billing", { name = "admin", path = "/ops", help = "Admin tools" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MountSpecDe")]
pub struct MountSpec {
    /// Component name the sub-application handle resolves under.
    pub name: String,
    /// Explicit mount prefix; `/<name>` when omitted.
    pub path: Option<String>,
    /// Help text shown on the namespaced CLI group.
    pub help: Option<String>,
}

impl MountSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), path: None, help: None }
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// The prefix this sub-application is mounted under.
    #[must_use]
    pub fn mount_path(&self) -> String {
        self.path.clone().unwrap_or_else(|| format!("/{}", self.name))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MountSpecDe {
    Name(String),
    Full { name: String, path: Option<String>, help: Option<String> },
}

impl From<MountSpecDe> for MountSpec {
    fn from(de: MountSpecDe) -> Self {
        match de {
            MountSpecDe::Name(name) => Self { name, path: None, help: None },
            MountSpecDe::Full { name, path, help } => Self { name, path, help },
        }
    }
}

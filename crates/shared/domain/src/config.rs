use crate::mount::MountSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root of the profile file: one `[profile.<Name>]` table per environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profiles {
    #[serde(default)]
    pub profile: BTreeMap<String, ProfileSpec>,
}

impl Profiles {
    /// Looks a profile up by name. Matching is case-insensitive so the
    /// capitalized discriminator finds its table regardless of how the
    /// configuration source normalized keys.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProfileSpec> {
        self.profile.get(name).or_else(|| {
            self.profile.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, spec)| spec)
        })
    }
}

/// One named configuration profile as declared in the profile file.
///
/// Every attribute is optional so that a profile can extend another and
/// shadow only the attributes it overrides. `vars` merges per key; every
/// other attribute shadows wholesale.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileSpec {
    /// Name of the single parent profile this one extends.
    pub extends: Option<String>,
    pub debug: Option<bool>,
    pub server: Option<ServerSettings>,
    pub extensions: Option<Vec<String>>,
    pub commands: Option<Vec<String>>,
    pub blueprints: Option<Vec<String>>,
    pub middlewares: Option<Vec<String>>,
    pub apis: Option<Vec<String>>,
    pub services: Option<Vec<String>>,
    pub api_docs: Option<bool>,
    pub create_db: Option<bool>,
    pub apps: Option<Vec<MountSpec>>,
    /// Free-form key/value settings, available through [`Settings::var`].
    pub vars: Option<BTreeMap<String, String>>,
}

impl ProfileSpec {
    /// Shadows `parent` with the attributes this profile declares.
    ///
    /// Attribute shadowing only: a declared attribute replaces the parent's
    /// value entirely, except `vars`, which merges key by key with this
    /// profile's entries winning. `extends` is consumed by the overlay.
    #[must_use]
    pub fn overlay(self, parent: &Self) -> Self {
        let vars = match (parent.vars.clone(), self.vars) {
            (Some(mut base), Some(child)) => {
                base.extend(child);
                Some(base)
            },
            (base, child) => child.or(base),
        };

        Self {
            extends: None,
            debug: self.debug.or(parent.debug),
            server: self.server.or_else(|| parent.server.clone()),
            extensions: self.extensions.or_else(|| parent.extensions.clone()),
            commands: self.commands.or_else(|| parent.commands.clone()),
            blueprints: self.blueprints.or_else(|| parent.blueprints.clone()),
            middlewares: self.middlewares.or_else(|| parent.middlewares.clone()),
            apis: self.apis.or_else(|| parent.apis.clone()),
            services: self.services.or_else(|| parent.services.clone()),
            api_docs: self.api_docs.or(parent.api_docs),
            create_db: self.create_db.or(parent.create_db),
            apps: self.apps.or_else(|| parent.apps.clone()),
            vars,
        }
    }

    /// Materializes the profile into concrete [`Settings`].
    #[must_use]
    pub fn into_settings(self) -> Settings {
        Settings {
            debug: self.debug.unwrap_or(false),
            server: self.server.unwrap_or_default(),
            extensions: self.extensions.unwrap_or_default(),
            commands: self.commands.unwrap_or_default(),
            blueprints: self.blueprints.unwrap_or_default(),
            middlewares: self.middlewares.unwrap_or_default(),
            apis: self.apis.unwrap_or_default(),
            services: self.services.unwrap_or_default(),
            api_docs: self.api_docs.unwrap_or(false),
            create_db: self.create_db.unwrap_or(false),
            apps: self.apps.unwrap_or_default(),
            vars: self.vars.unwrap_or_default(),
        }
    }
}

/// The fully-resolved settings of the selected profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub debug: bool,
    pub server: ServerSettings,
    pub extensions: Vec<String>,
    pub commands: Vec<String>,
    pub blueprints: Vec<String>,
    pub middlewares: Vec<String>,
    pub apis: Vec<String>,
    pub services: Vec<String>,
    pub api_docs: bool,
    pub create_db: bool,
    pub apps: Vec<MountSpec>,
    pub vars: BTreeMap<String, String>,
}

impl Settings {
    /// Looks up a free-form setting by key.
    #[must_use]
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// HTTP bind parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslSettings>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 5000, ssl: None }
    }
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslSettings {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ProfileSpec {
        toml::from_str(
            r#"
            debug = true
            blueprints = ["auth"]
            api_docs = true
            [vars]
            secret_key = "dev"
            mail_port = "8025"
            "#,
        )
        .expect("profile parses")
    }

    #[test]
    fn overlay_shadows_declared_attributes_only() {
        let child: ProfileSpec =
            toml::from_str("debug = false\n[vars]\nsecret_key = \"prod\"").expect("child parses");

        let merged = child.overlay(&base());
        assert_eq!(merged.debug, Some(false));
        assert_eq!(merged.blueprints.as_deref(), Some(&["auth".to_owned()][..]));
        assert_eq!(merged.api_docs, Some(true));

        let vars = merged.vars.expect("vars merged");
        assert_eq!(vars.get("secret_key").map(String::as_str), Some("prod"));
        assert_eq!(vars.get("mail_port").map(String::as_str), Some("8025"));
    }

    #[test]
    fn settings_defaults_are_inert() {
        let settings = ProfileSpec::default().into_settings();
        assert!(!settings.api_docs);
        assert!(!settings.create_db);
        assert!(settings.blueprints.is_empty());
        assert_eq!(settings.server.port, 5000);
    }
}

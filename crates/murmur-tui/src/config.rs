//! Startup configuration.
//!
//! TOML file, default `murmur.toml`:
//!
//! ```toml
//! [account]
//! jid = "alice@example.org"
//! password = "hunter2"        # optional, else $MURMUR_PASSWORD
//! room = "lounge@conference.example.org"
//! nick = "alice"
//! key = "shared secret"       # optional; enables gold and stealth modes
//!
//! [client]
//! logfile = "murmur.log"
//! bell = false
//! local_time = false          # log timestamps in UTC unless set
//! ```
//!
//! Command-line flags override `nick`, `room`, `logfile` and `bell`. The
//! result is validated into [`StartupParams`] before anything connects.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable consulted when the file has no password.
pub const PASSWORD_ENV: &str = "MURMUR_PASSWORD";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No password in the file or the environment.
    #[error("no password configured (set account.password or $MURMUR_PASSWORD)")]
    MissingPassword,

    /// A field failed validation.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Config file layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Account and room.
    pub account: AccountSection,
    /// Client behavior.
    #[serde(default)]
    pub client: ClientSection,
}

/// `[account]` section.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountSection {
    /// Account address, `user@domain`.
    pub jid: String,
    /// Account password.
    pub password: Option<String>,
    /// Room address.
    pub room: String,
    /// Nickname in the room.
    pub nick: String,
    /// Shared secret for gold and stealth modes.
    pub key: Option<String>,
}

impl fmt::Debug for AccountSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSection")
            .field("jid", &self.jid)
            .field("room", &self.room)
            .field("nick", &self.nick)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// `[client]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Activity log path.
    #[serde(default = "default_logfile")]
    pub logfile: PathBuf,
    /// Ring the bell on inbound messages.
    #[serde(default)]
    pub bell: bool,
    /// Stamp the activity log in local time instead of UTC.
    #[serde(default)]
    pub local_time: bool,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self { logfile: default_logfile(), bell: false, local_time: false }
    }
}

fn default_logfile() -> PathBuf {
    PathBuf::from("murmur.log")
}

impl FileConfig {
    /// Parse a config document.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Nickname.
    pub nick: Option<String>,
    /// Room address.
    pub room: Option<String>,
    /// Activity log path.
    pub logfile: Option<PathBuf>,
    /// Force the bell on.
    pub bell: bool,
}

/// Validated parameters the session is built from.
#[derive(Clone)]
pub struct StartupParams {
    /// Account address.
    pub jid: String,
    /// Account password.
    pub password: String,
    /// Room address.
    pub room: String,
    /// Nickname in the room.
    pub nick: String,
    /// Shared secret, if configured.
    pub key: Option<String>,
    /// Activity log path.
    pub logfile: PathBuf,
    /// Initial bell setting.
    pub bell: bool,
    /// Log timestamps in local time.
    pub local_time: bool,
}

impl fmt::Debug for StartupParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartupParams")
            .field("jid", &self.jid)
            .field("room", &self.room)
            .field("nick", &self.nick)
            .field("key_configured", &self.key.is_some())
            .field("logfile", &self.logfile)
            .field("bell", &self.bell)
            .field("local_time", &self.local_time)
            .finish_non_exhaustive()
    }
}

impl StartupParams {
    /// Merge file, overrides and the environment password, then validate.
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
        env_password: Option<String>,
    ) -> Result<Self, ConfigError> {
        let FileConfig { account, client } = file;

        let password = account.password.or(env_password).ok_or(ConfigError::MissingPassword)?;
        let params = Self {
            jid: account.jid,
            password,
            room: overrides.room.unwrap_or(account.room),
            nick: overrides.nick.unwrap_or(account.nick),
            key: account.key.filter(|key| !key.is_empty()),
            logfile: overrides.logfile.unwrap_or(client.logfile),
            bell: overrides.bell || client.bell,
            local_time: client.local_time,
        };

        params.validate()?;
        Ok(params)
    }

    /// Domain part of the account address.
    pub fn domain(&self) -> &str {
        self.jid.split_once('@').map_or("", |(_, domain)| domain)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.jid.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {},
            _ => return Err(ConfigError::Invalid { field: "jid", reason: "expected user@domain" }),
        }
        check_token("nick", &self.nick)?;
        check_token("room", &self.room)?;
        Ok(())
    }
}

fn check_token(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid { field, reason: "must not be empty" });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid { field, reason: "must not contain whitespace" });
    }
    Ok(())
}

/// Read `path`, apply overrides and `$MURMUR_PASSWORD`, validate.
pub fn load(path: &Path, overrides: Overrides) -> Result<StartupParams, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let file = FileConfig::parse(&text)?;

    StartupParams::resolve(file, overrides, std::env::var(PASSWORD_ENV).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [account]
        jid = "alice@example.org"
        room = "lounge@conference.example.org"
        nick = "alice"
    "#;

    fn resolve(text: &str, overrides: Overrides) -> Result<StartupParams, ConfigError> {
        StartupParams::resolve(FileConfig::parse(text).unwrap(), overrides, Some("env-pw".into()))
    }

    #[test]
    fn defaults_apply() {
        let params = resolve(MINIMAL, Overrides::default()).unwrap();

        assert_eq!(params.password, "env-pw");
        assert_eq!(params.logfile, PathBuf::from("murmur.log"));
        assert!(!params.bell);
        assert!(params.key.is_none());
        assert_eq!(params.domain(), "example.org");
    }

    #[test]
    fn file_password_wins_over_environment() {
        let text = MINIMAL.replace("nick = \"alice\"", "nick = \"alice\"\npassword = \"file-pw\"");

        assert_eq!(resolve(&text, Overrides::default()).unwrap().password, "file-pw");
    }

    #[test]
    fn missing_password_is_an_error() {
        let file = FileConfig::parse(MINIMAL).unwrap();

        let err = StartupParams::resolve(file, Overrides::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPassword));
    }

    #[test]
    fn overrides_take_precedence() {
        let overrides = Overrides {
            nick: Some("bob".into()),
            room: Some("attic@conference.example.org".into()),
            logfile: Some(PathBuf::from("/tmp/bob.log")),
            bell: true,
        };

        let params = resolve(MINIMAL, overrides).unwrap();

        assert_eq!(params.nick, "bob");
        assert_eq!(params.room, "attic@conference.example.org");
        assert_eq!(params.logfile, PathBuf::from("/tmp/bob.log"));
        assert!(params.bell);
    }

    #[test]
    fn client_section_and_key() {
        let text = format!(
            "{MINIMAL}\nkey = \"s3cret\"\n[client]\nlogfile = \"chat.log\"\nbell = true\nlocal_time = true\n"
        );

        let params = resolve(&text, Overrides::default()).unwrap();

        assert_eq!(params.key.as_deref(), Some("s3cret"));
        assert_eq!(params.logfile, PathBuf::from("chat.log"));
        assert!(params.bell);
        assert!(params.local_time);
    }

    #[test]
    fn invalid_values_rejected() {
        let bad_jid = MINIMAL.replace("alice@example.org", "alice");
        let bad_nick = MINIMAL.replace("nick = \"alice\"", "nick = \"al ice\"");

        assert!(matches!(
            resolve(&bad_jid, Overrides::default()),
            Err(ConfigError::Invalid { field: "jid", .. })
        ));
        assert!(matches!(
            resolve(&bad_nick, Overrides::default()),
            Err(ConfigError::Invalid { field: "nick", .. })
        ));
        assert!(matches!(
            resolve(MINIMAL, Overrides { nick: Some(String::new()), ..Overrides::default() }),
            Err(ConfigError::Invalid { field: "nick", .. })
        ));
    }

    #[test]
    fn unknown_fields_rejected() {
        let text = format!("{MINIMAL}\nnickname = \"oops\"\n");

        assert!(matches!(FileConfig::parse(&text), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("murmur.toml");
        let text = MINIMAL.replace("nick = \"alice\"", "nick = \"alice\"\npassword = \"pw\"");
        fs::write(&path, text).unwrap();

        let params = load(&path, Overrides::default()).unwrap();
        assert_eq!(params.nick, "alice");
        assert_eq!(params.password, "pw");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = load(&dir.path().join("absent.toml"), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let text = format!("{MINIMAL}\nkey = \"s3cret\"\n");
        let params = resolve(&text, Overrides::default()).unwrap();

        insta::assert_snapshot!(
            format!("{params:?}"),
            @r#"StartupParams { jid: "alice@example.org", room: "lounge@conference.example.org", nick: "alice", key_configured: true, logfile: "murmur.log", bell: false, local_time: false, .. }"#
        );
    }
}

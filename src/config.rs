//! Configuration for httpdiff
//!
//! Settings come from three places, highest precedence first: command-line
//! flags, the selected section of the INI profile file, and built-in defaults.

use crate::cmd_args::CommandLineArgs;
use crate::errors::ConfigError;
use crate::executor::TransportConfig;
use crate::headers::{parse_header_line, read_header_file, ExclusionSet};
use crate::request::{RequestSpec, Targets, DEFAULT_METHOD, DEFAULT_USER_AGENT};
use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default profile file path for httpdiff
pub const DEFAULT_PROFILE_PATH: &str = "~/.httpdiff/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "HTTPDIFF_PROFILE_PATH";

/// Environment variable selecting the log level (trace, debug, info, warn, error)
pub const LOG_LEVEL_ENV_VAR: &str = "HTTPDIFF_LOG_LEVEL";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// One section of the profile file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub method: Option<String>,
    pub agent: Option<String>,
    pub host: Option<String>,
    pub ignore: Option<String>,
    pub insecure: Option<bool>,
    pub mono: Option<bool>,
    pub diffapp: Option<String>,
    /// Path to a header file
    pub headers: Option<String>,
    pub timeout: Option<u64>,
}

/// Reads profiles from an INI file whose sections are profile names
#[derive(Debug, Clone)]
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Path with `~` and environment variables expanded
    fn expanded_path(&self) -> Result<PathBuf, ConfigError> {
        shellexpand::full(&self.path)
            .map(|p| PathBuf::from(p.into_owned()))
            .map_err(|e| self.error(e.to_string()))
    }

    fn error(&self, message: String) -> ConfigError {
        ConfigError::Profile {
            path: self.path.clone(),
            message,
        }
    }

    /// Load the named profile. A missing file or section yields `None`.
    pub fn get_profile(&self, name: &str) -> Result<Option<Profile>, ConfigError> {
        let path = self.expanded_path()?;
        if !path.exists() {
            tracing::debug!("Profile file {} not found", path.display());
            return Ok(None);
        }

        let ini = Ini::load_from_file(&path).map_err(|e| self.error(e.to_string()))?;
        let Some(section) = ini.section(Some(name)) else {
            tracing::debug!("Profile '{}' not found in {}", name, path.display());
            return Ok(None);
        };

        let text = |key: &str| section.get(key).map(|v| v.trim().to_string());
        let flag = |key: &str| -> Result<Option<bool>, ConfigError> {
            text(key)
                .map(|v| {
                    parse_bool(&v)
                        .ok_or_else(|| self.error(format!("{key}: not a boolean: {v}")))
                })
                .transpose()
        };
        let timeout = text("timeout")
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|_| self.error(format!("timeout: not a number of seconds: {v}")))
            })
            .transpose()?;

        let profile = Profile {
            method: text("method"),
            agent: text("agent"),
            host: text("host"),
            ignore: text("ignore"),
            insecure: flag("insecure")?,
            mono: flag("mono")?,
            diffapp: text("diffapp"),
            headers: text("headers"),
            timeout,
        };
        tracing::debug!("Loaded profile '{}': {:?}", name, profile);
        Ok(Some(profile))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Fully resolved run configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub spec: RequestSpec,
    pub targets: Targets,
    pub exclusions: ExclusionSet,
    pub transport: TransportConfig,
    pub diffapp: Option<String>,
    pub mono: bool,
    pub json: bool,
}

impl Settings {
    /// Merge command-line arguments over a profile.
    ///
    /// Header sources are applied in order: the profile's header file, the
    /// `--headers` file, then each `-H` value. A later value for the same
    /// header replaces an earlier one. Any malformed header or a target count
    /// other than two fails here, before anything is sent.
    pub fn resolve(args: &CommandLineArgs, profile: &Profile) -> Result<Self, ConfigError> {
        let targets = Targets::from_args(args.urls().to_vec())?;

        let method = args
            .method()
            .or(profile.method.as_deref())
            .unwrap_or(DEFAULT_METHOD);
        let agent = args
            .agent()
            .or(profile.agent.as_deref())
            .unwrap_or(DEFAULT_USER_AGENT);
        let host = args.host().or(profile.host.as_deref()).unwrap_or_default();

        let mut headers = Vec::new();
        if let Some(file) = &profile.headers {
            let file = shellexpand::tilde(file);
            headers.extend(read_header_file(Path::new(&*file))?);
        }
        if let Some(file) = args.header_file() {
            headers.extend(read_header_file(file)?);
        }
        for line in args.headers() {
            headers.push(parse_header_line(line)?);
        }

        let mut spec = RequestSpec::new(method)?
            .with_host(host)
            .with_user_agent(agent)
            .with_headers(headers);
        if let Some(body) = args.body() {
            spec = spec.with_body(body.to_string());
        }

        let mut exclusions = ExclusionSet::new();
        for list in [profile.ignore.as_deref(), args.ignore()].into_iter().flatten() {
            exclusions.extend_from_list(list);
        }

        let transport = TransportConfig {
            insecure: args.insecure() || profile.insecure.unwrap_or(false),
            timeout: args.timeout().or(profile.timeout).map(Duration::from_secs),
        };

        Ok(Self {
            spec,
            targets,
            exclusions,
            transport,
            diffapp: args
                .diffapp()
                .map(str::to_string)
                .or_else(|| profile.diffapp.clone()),
            mono: args.mono() || profile.mono.unwrap_or(false),
            json: args.json(),
        })
    }
}

use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(alias = "bilforsikring")]
    pub insurance: Option<String>,
    pub leasing: Option<String>,
    pub base: Option<String>,
    pub output: Option<String>,
    #[serde(alias = "output_format")]
    pub format: Option<String>,
    pub timeout: Option<u64>,
    pub retry: Option<bool>,
    pub failure_policy: Option<String>,
    pub title: Option<String>,
    pub stylesheet: Option<String>,
    pub no_color: Option<bool>,
    pub quiet: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".carcompare").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

pub fn default_config_yaml() -> String {
    r#"# carcompare config
#
# Location (default):
#   ~/.carcompare/config.yml
#
# Command line flags override every value set here.

# Datasets: file names, paths or http(s) URLs, resolved against `base`
insurance: bilforsikring.json
leasing: leasing.json
# base: https://example.dk/data/

# Output (optional, defaults to stdout)
# output: ./index.html
# format: html

# HTTP
timeout: 10
retry: true

# What a section shows when its dataset cannot be loaded:
#   notice - a short "unavailable" message
#   silent - leave the section untouched
failure_policy: notice

# Page
# title: Sammenlign bilforsikring og billeasing
stylesheet: styles.css

# Output styling
no_color: false
quiet: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::model::payload::{self, SchemaError, SchemaVersion};
use crate::model::{Dataset, Offer};

pub const USER_AGENT: &str = concat!("carcompare/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(Url),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

fn http_url(value: &str) -> Option<Url> {
    Url::parse(value)
        .ok()
        .filter(|u| u.scheme() == "http" || u.scheme() == "https")
}

impl Source {
    /// Resolves `resource` against `base`, which may be a directory or an
    /// http(s) URL. Absolute URLs and absolute paths ignore the base.
    pub fn resolve(resource: &str, base: Option<&str>) -> Result<Self, LoadError> {
        let resource = resource.trim();
        if resource.is_empty() {
            return Err(LoadError::InvalidSource {
                resource: resource.to_string(),
                reason: "empty resource name".to_string(),
            });
        }
        if let Some(url) = http_url(resource) {
            return Ok(Self::Url(url));
        }
        let base = base.map(str::trim).filter(|b| !b.is_empty());
        match base {
            Some(base) => match http_url(base) {
                Some(mut base_url) => {
                    if !base_url.path().ends_with('/') {
                        let path = format!("{}/", base_url.path());
                        base_url.set_path(&path);
                    }
                    base_url
                        .join(resource)
                        .map(Self::Url)
                        .map_err(|e| LoadError::InvalidSource {
                            resource: resource.to_string(),
                            reason: e.to_string(),
                        })
                }
                None => {
                    let path = crate::config::expand_tilde(resource);
                    if path.is_absolute() {
                        Ok(Self::Path(path))
                    } else {
                        Ok(Self::Path(crate::config::expand_tilde(base).join(path)))
                    }
                }
            },
            None => Ok(Self::Path(crate::config::expand_tilde(resource))),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid resource {resource:?}: {reason}")]
    InvalidSource { resource: String, reason: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{resource} is not valid JSON: {source}")]
    Parse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{resource}: {source}")]
    Schema {
        resource: String,
        #[source]
        source: SchemaError,
    },
}

impl LoadError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            Self::Read { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

#[derive(Debug)]
pub enum DatasetState<T> {
    Loaded(Dataset<T>),
    Empty,
    Failed(LoadError),
}

impl<T> DatasetState<T> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct LoadReport<T> {
    pub resource: String,
    pub attempts: u32,
    pub version: Option<SchemaVersion>,
    pub dropped: usize,
    pub state: DatasetState<T>,
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(USER_AGENT),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
}

#[derive(Clone, Debug)]
pub struct Loader {
    client: reqwest::Client,
    base: Option<String>,
    retry: bool,
}

impl Loader {
    pub fn new(client: reqwest::Client, base: Option<String>, retry: bool) -> Self {
        Self {
            client,
            base,
            retry,
        }
    }

    pub fn resolve(&self, resource: &str) -> Result<Source, LoadError> {
        Source::resolve(resource, self.base.as_deref())
    }

    async fn fetch_once(&self, source: &Source) -> Result<Value, LoadError> {
        let bytes = match source {
            Source::Path(path) => {
                tokio::fs::read(path).await.map_err(|e| LoadError::Read {
                    path: path.display().to_string(),
                    source: e,
                })?
            }
            Source::Url(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| LoadError::Network {
                        url: url.to_string(),
                        source: e,
                    })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                response
                    .bytes()
                    .await
                    .map_err(|e| LoadError::Network {
                        url: url.to_string(),
                        source: e,
                    })?
                    .to_vec()
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse {
            resource: source.to_string(),
            source: e,
        })
    }

    /// Retries a transient failure once; returns the result and the attempt count.
    pub async fn fetch(&self, source: &Source) -> (Result<Value, LoadError>, u32) {
        match self.fetch_once(source).await {
            Err(e) if self.retry && e.is_transient() => {
                warn!(resource = %source, error = %e, "transient failure, retrying once");
                (self.fetch_once(source).await, 2)
            }
            other => (other, 1),
        }
    }

    pub async fn load<T: Offer>(&self, resource: &str) -> LoadReport<T> {
        let kind = T::KIND.label();
        let source = match self.resolve(resource) {
            Ok(source) => source,
            Err(e) => {
                error!(dataset = kind, error = %e, "cannot resolve dataset");
                return LoadReport {
                    resource: resource.to_string(),
                    attempts: 0,
                    version: None,
                    dropped: 0,
                    state: DatasetState::Failed(e),
                };
            }
        };
        debug!(dataset = kind, resource = %source, "loading");

        let (fetched, attempts) = self.fetch(&source).await;
        let parsed = fetched.and_then(|value| {
            payload::parse_dataset::<T>(value).map_err(|e| LoadError::Schema {
                resource: source.to_string(),
                source: e,
            })
        });
        let payload::Parsed {
            version,
            dataset,
            rejected,
        } = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(dataset = kind, resource = %source, attempts, error = %e, "failed to load dataset");
                return LoadReport {
                    resource: source.to_string(),
                    attempts,
                    version: None,
                    dropped: 0,
                    state: DatasetState::Failed(e),
                };
            }
        };

        let (dataset, unrenderable) = retain_renderable(dataset);
        if unrenderable > 0 {
            warn!(dataset = kind, dropped = unrenderable, "dropped records without owner or link");
        }
        let dropped = rejected + unrenderable;
        if let Some(expected) = dataset.metadata.total_records {
            if expected != dataset.len() + dropped {
                warn!(
                    dataset = kind,
                    expected,
                    found = dataset.len() + dropped,
                    "metadata total_records does not match payload"
                );
            }
        }
        info!(
            dataset = kind,
            records = dataset.len(),
            schema = version.number(),
            "dataset loaded"
        );

        let state = if dataset.is_empty() {
            DatasetState::Empty
        } else {
            DatasetState::Loaded(dataset)
        };
        LoadReport {
            resource: source.to_string(),
            attempts,
            version: Some(version),
            dropped,
            state,
        }
    }
}

fn retain_renderable<T: Offer>(mut dataset: Dataset<T>) -> (Dataset<T>, usize) {
    let before = dataset.data.len();
    dataset.data.retain(|offer| offer.is_renderable());
    let dropped = before - dataset.data.len();
    (dataset, dropped)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Migration {
    pub from: SchemaVersion,
    pub records: usize,
}

impl Migration {
    pub fn changed(&self) -> bool {
        self.from.number() != payload::CURRENT_SCHEMA_VERSION
    }
}

/// Rewrites a local dataset file in the current schema. Files already
/// current are left untouched.
pub async fn migrate_file(path: &Path) -> Result<Migration, LoadError> {
    let display = path.display().to_string();
    let bytes = tokio::fs::read(path).await.map_err(|e| LoadError::Read {
        path: display.clone(),
        source: e,
    })?;
    let raw: Value = serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse {
        resource: display.clone(),
        source: e,
    })?;
    let (from, value) = payload::migrate(raw).map_err(|e| LoadError::Schema {
        resource: display.clone(),
        source: e,
    })?;
    let records = value
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    let migration = Migration { from, records };
    if !migration.changed() {
        return Ok(migration);
    }
    let mut out = serde_json::to_vec_pretty(&value).map_err(|e| LoadError::Parse {
        resource: display.clone(),
        source: e,
    })?;
    out.push(b'\n');
    tokio::fs::write(path, out).await.map_err(|e| LoadError::Write {
        path: display,
        source: e,
    })?;
    info!(path = %path.display(), from = from.number(), "migrated dataset");
    Ok(migration)
}

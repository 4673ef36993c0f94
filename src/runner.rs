use std::time::Duration;

use indicatif::ProgressBar;
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::interact::Controllers;
use crate::loader::{self, DatasetState, LoadReport, Loader};
use crate::model::{InsuranceOffer, LeasingOffer, OfferKind};
use crate::output::report::CLIENT_RUNTIME;
use crate::page::{Page, PageSettings, FAQ_ENTRIES};
use crate::view::{NoticeKind, OfferView, SectionView};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Notice,
    Silent,
}

impl FailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "notice" => Some(Self::Notice),
            "silent" => Some(Self::Silent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Silent => "silent",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Options {
    pub insurance: String,
    pub leasing: String,
    pub base: Option<String>,
    pub timeout_seconds: u64,
    pub retry: bool,
    pub failure_policy: FailurePolicy,
    pub page: PageSettings,
    pub progress: Option<ProgressBar>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            insurance: OfferKind::Insurance.default_resource().to_string(),
            leasing: OfferKind::Leasing.default_resource().to_string(),
            base: None,
            timeout_seconds: loader::DEFAULT_TIMEOUT_SECONDS,
            retry: true,
            failure_policy: FailurePolicy::default(),
            page: PageSettings::default(),
            progress: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no {kind} dataset given")]
    MissingResource { kind: &'static str },

    #[error("invalid timeout {value}, expected a positive number of seconds")]
    InvalidTimeout { value: u64 },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionStatus {
    pub kind: OfferKind,
    pub resource: String,
    pub state: &'static str,
    pub offers: usize,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    pub dropped: usize,
    pub rendered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct PageBuild {
    pub started_at: Instant,
    pub elapsed: Duration,
    pub page: Page,
    pub controllers: Controllers,
    pub sections: Vec<SectionView>,
    pub statuses: Vec<SectionStatus>,
}

impl PageBuild {
    pub fn failures(&self) -> usize {
        self.statuses.iter().filter(|s| s.state == "failed").count()
    }
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.insurance.trim().is_empty() {
            return Err(RunnerError::MissingResource {
                kind: OfferKind::Insurance.label(),
            });
        }
        if options.leasing.trim().is_empty() {
            return Err(RunnerError::MissingResource {
                kind: OfferKind::Leasing.label(),
            });
        }
        if options.timeout_seconds == 0 {
            return Err(RunnerError::InvalidTimeout {
                value: options.timeout_seconds,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub async fn run(&self) -> Result<PageBuild, RunnerError> {
        let started_at = Instant::now();
        let client = loader::build_client(Duration::from_secs(self.options.timeout_seconds))
            .map_err(|e| RunnerError::HttpClientBuild { source: e })?;
        let loader = Loader::new(client, self.options.base.clone(), self.options.retry);

        let pb = self
            .options
            .progress
            .clone()
            .unwrap_or_else(ProgressBar::hidden);
        pb.set_length(2);
        let (insurance, leasing) = futures::join!(
            async {
                let report = loader.load::<InsuranceOffer>(&self.options.insurance).await;
                pb.inc(1);
                report
            },
            async {
                let report = loader.load::<LeasingOffer>(&self.options.leasing).await;
                pb.inc(1);
                report
            }
        );
        pb.finish_and_clear();

        let policy = self.options.failure_policy;
        let mut page = Page::new(self.options.page.clone());
        let mut sections = Vec::new();
        let mut statuses = Vec::new();
        for (view, status) in [apply_policy(&insurance, policy), apply_policy(&leasing, policy)] {
            if let Some(view) = view {
                let applied = page.apply_section(&view);
                debug!(section = view.kind.section_id(), ?applied, "section applied");
                sections.push(view);
            }
            statuses.push(status);
        }

        page.inject_structured_data();
        let mut controllers = Controllers::new();
        controllers.attach_smooth_scroll(&mut page);
        controllers.attach_menu(&mut page);
        if let Some(mounted) = page.mount_faq(&FAQ_ENTRIES) {
            controllers.attach_accordion(&mut page, &mounted);
        }
        page.install_runtime(CLIENT_RUNTIME);

        let elapsed = started_at.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "page built");
        Ok(PageBuild {
            started_at,
            elapsed,
            page,
            controllers,
            sections,
            statuses,
        })
    }
}

pub fn apply_policy<T: OfferView>(
    report: &LoadReport<T>,
    policy: FailurePolicy,
) -> (Option<SectionView>, SectionStatus) {
    let kind = T::KIND;
    let view = match &report.state {
        DatasetState::Loaded(dataset) => Some(SectionView::from_dataset(dataset)),
        DatasetState::Empty => Some(SectionView::notice(kind, NoticeKind::Empty)),
        DatasetState::Failed(_) => match policy {
            FailurePolicy::Notice => Some(SectionView::notice(kind, NoticeKind::Unavailable)),
            FailurePolicy::Silent => None,
        },
    };
    let status = SectionStatus {
        kind,
        resource: report.resource.clone(),
        state: report.state.label(),
        offers: view.as_ref().map(SectionView::offer_count).unwrap_or(0),
        attempts: report.attempts,
        schema_version: report.version.map(|v| v.number()),
        dropped: report.dropped,
        rendered: view.is_some(),
        error: match &report.state {
            DatasetState::Failed(e) => Some(e.to_string()),
            _ => None,
        },
    };
    (view, status)
}

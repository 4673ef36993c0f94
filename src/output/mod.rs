pub mod report;

use serde::Serialize;

use crate::runner::{PageBuild, SectionStatus};
use crate::view::SectionView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    statuses: &'a [SectionStatus],
    sections: &'a [SectionView],
}

pub fn render(format: OutputFormat, build: &PageBuild) -> Result<Vec<u8>, String> {
    match format {
        OutputFormat::Text => Ok(render_text(build)),
        OutputFormat::Json => render_json(build),
        OutputFormat::Html => Ok(render_html(build)),
    }
}

/// One line per dataset: `<section> <state> <offers> <resource>`.
pub fn render_text(build: &PageBuild) -> Vec<u8> {
    let mut out = String::new();
    for s in build.statuses.iter() {
        out.push_str(&format!(
            "{:<14} {:<7} {:>3} {}",
            s.kind.section_id(),
            s.state,
            s.offers,
            s.resource
        ));
        if let Some(error) = s.error.as_deref() {
            out.push_str(&format!(" ({error})"));
        }
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(build: &PageBuild) -> Result<Vec<u8>, String> {
    let report = JsonReport {
        statuses: &build.statuses,
        sections: &build.sections,
    };
    let mut out = serde_json::to_vec_pretty(&report)
        .map_err(|e| format!("failed to serialize json report: {e}"))?;
    out.push(b'\n');
    Ok(out)
}

pub fn render_html(build: &PageBuild) -> Vec<u8> {
    report::render_html(&build.page)
}

use std::path::{Path, PathBuf};

use scout_core::{Endpoint, JobRecord, Posting};
use scout_logging::scout_warn;
use serde::Serialize;

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Serialize)]
struct EndpointRow<'a> {
    domain: &'a str,
    site_path: String,
    base_url: String,
    estimated_job_count: usize,
}

/// Flat record row; the HTML description only goes to JSON.
#[derive(Serialize)]
struct RecordRow<'a> {
    title: &'a str,
    url: &'a str,
    apply_url: &'a str,
    location: &'a str,
    date_posted: &'a str,
    department: &'a str,
    employment_type: &'a str,
    description_text: &'a str,
    source_domain: &'a str,
    extraction_status: String,
    extracted_at: &'a str,
}

impl<'a> From<&'a JobRecord> for RecordRow<'a> {
    fn from(record: &'a JobRecord) -> Self {
        Self {
            title: &record.title,
            url: &record.url,
            apply_url: &record.apply_url,
            location: &record.location,
            date_posted: &record.date_posted,
            department: &record.department,
            employment_type: &record.employment_type,
            description_text: &record.description_text,
            source_domain: &record.source_domain,
            extraction_status: record.extraction_status.to_string(),
            extracted_at: &record.extracted_at,
        }
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<PathBuf, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(write_atomically(path, &bytes)?)
}

/// Columns: title, url, location, source_domain, source_path.
pub fn write_postings_csv(path: &Path, postings: &[Posting]) -> Result<PathBuf, ExportError> {
    if postings.is_empty() {
        // serde-driven headers need at least one row
        return Ok(write_atomically(
            path,
            b"title,url,location,source_domain,source_path\n",
        )?);
    }
    write_rows(path, postings)
}

pub fn write_endpoints_csv(path: &Path, endpoints: &[Endpoint]) -> Result<PathBuf, ExportError> {
    if endpoints.is_empty() {
        return Ok(write_atomically(
            path,
            b"domain,site_path,base_url,estimated_job_count\n",
        )?);
    }
    write_rows(
        path,
        endpoints.iter().map(|endpoint| EndpointRow {
            domain: endpoint.root.domain(),
            site_path: endpoint.root.site_path(),
            base_url: endpoint.root.base_url(),
            estimated_job_count: endpoint.estimated_job_count,
        }),
    )
}

pub fn write_records_csv(path: &Path, records: &[JobRecord]) -> Result<PathBuf, ExportError> {
    if records.is_empty() {
        return Ok(write_atomically(
            path,
            b"title,url,apply_url,location,date_posted,department,employment_type,description_text,source_domain,extraction_status,extracted_at\n",
        )?);
    }
    write_rows(path, records.iter().map(RecordRow::from))
}

/// Pretty-printed JSON array of full records.
pub fn write_records_json(path: &Path, records: &[JobRecord]) -> Result<PathBuf, ExportError> {
    let content = serde_json::to_vec_pretty(records)?;
    Ok(write_atomically(path, &content)?)
}

pub fn write_text(path: &Path, text: &str) -> Result<PathBuf, ExportError> {
    Ok(write_atomically(path, text.as_bytes())?)
}

/// Postings from a headed CSV. Only `title` and `url` are required; rows that
/// do not parse or have no URL are skipped with a warning.
pub fn read_postings_csv(path: &Path) -> Result<Vec<Posting>, ExportError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut postings = Vec::new();
    for (line, row) in reader.deserialize::<Posting>().enumerate() {
        match row {
            Ok(posting) if !posting.url.trim().is_empty() => postings.push(posting),
            Ok(_) => scout_warn!("{}: row {} has no url, skipped", path.display(), line + 2),
            Err(err) => scout_warn!("{}: row {} skipped: {}", path.display(), line + 2, err),
        }
    }
    Ok(postings)
}

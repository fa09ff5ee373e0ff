use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::record::CaptureRecord;

/// Parse one EPIC metadata document (a JSON array of capture records).
/// Fields the record does not model are ignored.
pub fn parse_metadata(json: &str) -> Result<Vec<CaptureRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Load capture records from a metadata file, or from every `.json` file in
/// a directory (one document per day), sorted by capture time.
pub fn load_metadata(path: &Path) -> Result<Vec<CaptureRecord>> {
    let mut records = Vec::new();
    if path.is_dir() {
        let mut files: Vec<_> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        files.sort();
        for file in files {
            let day = parse_metadata(&std::fs::read_to_string(&file)?)?;
            debug!(file = %file.display(), records = day.len(), "Loaded metadata");
            records.extend(day);
        }
    } else {
        records = parse_metadata(&std::fs::read_to_string(path)?)?;
    }

    sort_records(&mut records);
    info!(records = records.len(), path = %path.display(), "Capture metadata loaded");
    Ok(records)
}

/// Order records by capture time and drop duplicate identifiers.
pub fn sort_records(records: &mut Vec<CaptureRecord>) {
    records.sort_by(|a, b| a.captured_at.cmp(&b.captured_at).then_with(|| a.id.cmp(&b.id)));
    records.dedup_by(|a, b| a.id == b.id);
}

// Mon Feb 02 2026 - Alex

use crate::error::LeakError;
use crate::report::Report;
use crate::utils::sanitize_file_stem;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const REPORT_FILE_NAME: &str = "report.json";
const MAX_STEM_LEN: usize = 80;

static RECORD_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3,}-.*\.(txt|json)$").expect("record file pattern"));

/// Files produced by one [`ArtifactWriter::write`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub report_path: PathBuf,
    pub raw_dumps: Vec<PathBuf>,
    pub record_json: Vec<PathBuf>,
}

impl ArtifactSummary {
    pub fn file_count(&self) -> usize {
        1 + self.raw_dumps.len() + self.record_json.len()
    }
}

/// Persists a report to a directory: one raw-line dump and one JSON file per
/// record, plus the aggregate report.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, report: &Report) -> Result<ArtifactSummary, LeakError> {
        fs::create_dir_all(&self.dir)?;
        let removed = self.remove_record_files()?;
        if removed > 0 {
            log::debug!("Removed {} stale record file(s) from {}", removed, self.dir.display());
        }

        let mut summary = ArtifactSummary {
            report_path: self.dir.join(REPORT_FILE_NAME),
            ..ArtifactSummary::default()
        };

        for (index, record) in report.leaks().iter().enumerate() {
            let stem = format!(
                "{:03}-{}",
                index + 1,
                sanitize_file_stem(&record.root_type_name, MAX_STEM_LEN)
            );

            let raw_path = self.dir.join(format!("{}.txt", stem));
            let mut raw_text = record.raw_text();
            raw_text.push('\n');
            write_file(&raw_path, &raw_text)?;
            summary.raw_dumps.push(raw_path);

            let json_path = self.dir.join(format!("{}.json", stem));
            write_file(&json_path, &record.to_json_pretty()?)?;
            summary.record_json.push(json_path);
        }

        write_file(&summary.report_path, &report.to_json_pretty()?)?;

        log::info!(
            "Wrote {} artifact file(s) to {}",
            summary.file_count(),
            self.dir.display()
        );

        Ok(summary)
    }

    /// Deletes per-record dumps left by an earlier write so the directory
    /// only describes the report being written. Other files are kept.
    fn remove_record_files(&self) -> Result<usize, LeakError> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if RECORD_FILE.is_match(&name.to_string_lossy()) {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), LeakError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LeakParser;
    use crate::report::InvocationParams;
    use chrono::Utc;

    const OUTPUT: &str = "Process 7: 2 leaks for 64 total leaked bytes.\n\
        1 (32 bytes) ROOT LEAK: <Outer<Inner> 0x1> [32]\n   \
        1 (16 bytes) value --> <Box 0x2> [16]\n\
        1 (32 bytes) ROOT CYCLE: <Node 0x3> [32]\n";

    fn report() -> Report {
        LeakParser::new()
            .with_test_name("testArtifacts")
            .parse(OUTPUT, InvocationParams::new("7"), Utc::now())
    }

    #[test]
    fn test_writes_per_record_and_aggregate_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("artifacts");

        let summary = ArtifactWriter::new(&target).write(&report()).unwrap();

        assert_eq!(summary.file_count(), 5);
        assert_eq!(summary.raw_dumps[0], target.join("001-Outer_Inner_.txt"));
        assert_eq!(summary.record_json[1], target.join("002-Node.json"));

        let raw = fs::read_to_string(&summary.raw_dumps[0]).unwrap();
        assert_eq!(
            raw,
            "Process 7: 2 leaks for 64 total leaked bytes.\n\
             1 (32 bytes) ROOT LEAK: <Outer<Inner> 0x1> [32]\n   \
             1 (16 bytes) value --> <Box 0x2> [16]\n"
        );

        let record: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.record_json[0]).unwrap()).unwrap();
        assert_eq!(record["rootTypeName"], "Outer<Inner>");
        assert_eq!(record["testName"], "testArtifacts");

        let aggregate = fs::read_to_string(&summary.report_path).unwrap();
        let restored = Report::from_json(&aggregate).unwrap();
        assert_eq!(restored.len(), 2);
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_rewrite_removes_records_from_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let first = LeakParser::new().parse(
            "1 (16 bytes) ROOT LEAK: <A 0x1> [16]\n1 (16 bytes) ROOT LEAK: <B 0x2> [16]\n",
            InvocationParams::new("7"),
            Utc::now(),
        );
        writer.write(&first).unwrap();

        let second = LeakParser::new().parse(
            "1 (16 bytes) ROOT CYCLE: <C 0x3> [16]\n",
            InvocationParams::new("7"),
            Utc::now(),
        );
        let summary = writer.write(&second).unwrap();

        assert_eq!(summary.file_count(), 3);
        assert_eq!(
            file_names(dir.path()),
            vec!["001-C.json", "001-C.txt", "notes.txt", "report.json"]
        );
        let restored = Report::from_json(&fs::read_to_string(&summary.report_path).unwrap()).unwrap();
        assert_eq!(restored.leaks()[0].root_type_name, "C");
    }

    #[test]
    fn test_empty_report_still_writes_aggregate() {
        let dir = tempfile::tempdir().unwrap();
        let empty = LeakParser::new().parse("", InvocationParams::new("7"), Utc::now());

        let summary = ArtifactWriter::new(dir.path()).write(&empty).unwrap();

        assert_eq!(summary.file_count(), 1);
        assert!(summary.report_path.exists());
    }
}

use crate::error::ExportError;
use crate::models::{CandidateProfile, InstitutionKind, RankedEntry, RankedResult, SaveFormat};
use chrono::NaiveDateTime;
use csv::Writer;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const NAME_HEADER: &str = "College Name";
const RANK_HEADER: &str = "Close Rank";

/// Renders one result table as aligned text, or a "no matches" notice.
pub fn render_table(kind: InstitutionKind, result: &RankedResult) -> String {
    if result.is_empty() {
        return format!(
            "No {}s found matching your criteria.\n💡 Try adjusting your preferences or rank range.\n",
            kind.label()
        );
    }

    let name_width = result
        .iter()
        .map(|entry| entry.institution_name.chars().count())
        .chain(std::iter::once(NAME_HEADER.len()))
        .max()
        .unwrap_or(NAME_HEADER.len());

    let mut content = String::new();
    content.push_str(&format!("{:<width$}  {:>10}\n", NAME_HEADER, RANK_HEADER, width = name_width));
    content.push_str(&format!("{}  {}\n", "-".repeat(name_width), "-".repeat(10)));
    for entry in result.iter() {
        content.push_str(&format!(
            "{:<width$}  {:>10}\n",
            entry.institution_name,
            entry.closing_rank,
            width = name_width
        ));
    }
    content.push_str(&format!("✅ Found {} {} options\n", result.len(), kind.label()));
    content
}

/// Everything persisted about one recommendation query.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub category: String,
    pub state: String,
    pub degrees: String,
    pub branches: String,
    pub rank: i64,
    pub nit_count: usize,
    pub iiit_count: usize,
    pub generated_at: String,
    #[serde(skip)]
    pub file_stamp: String,
    pub nit_recommendations: Vec<RankedEntry>,
    pub iiit_recommendations: Vec<RankedEntry>,
}

impl SessionRecord {
    pub fn new(
        profile: &CandidateProfile,
        nits: &RankedResult,
        iiits: &RankedResult,
        generated_at: NaiveDateTime,
    ) -> Self {
        Self {
            name: profile.name.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
            gender: profile.gender_pool.label().to_string(),
            category: profile.category.label().to_string(),
            state: profile.home_state.clone(),
            degrees: profile.degrees.join(", "),
            branches: profile.branches.join(", "),
            rank: profile.rank,
            nit_count: nits.len(),
            iiit_count: iiits.len(),
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            file_stamp: generated_at.format("%Y%m%d_%H%M%S").to_string(),
            nit_recommendations: nits.entries.clone(),
            iiit_recommendations: iiits.entries.clone(),
        }
    }

    /// File-name-safe form of the candidate name.
    fn file_label(&self) -> String {
        let cleaned: String = self
            .name
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let cleaned = cleaned.trim_matches('_').to_string();
        if cleaned.is_empty() {
            "anonymous".to_string()
        } else {
            cleaned
        }
    }
}

pub struct SessionExporter {
    output_dir: PathBuf,
    master_log: PathBuf,
}

impl SessionExporter {
    pub fn new(output_dir: impl Into<PathBuf>, master_log: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            master_log: master_log.into(),
        }
    }

    pub fn master_log_path(&self) -> &Path {
        &self.master_log
    }

    /// Writes the session in `format` and appends it to the master log.
    /// Returns the files written for this session (the master log excluded).
    /// A corrupt master log is reported before any session file is created.
    pub fn save(&self, record: &SessionRecord, format: SaveFormat) -> Result<Vec<PathBuf>, ExportError> {
        let mut log = self.read_master_log()?;
        fs::create_dir_all(&self.output_dir)?;

        let stem = self.free_stem(record, format);
        let files = match format {
            SaveFormat::Json => vec![self.write_json(record, &stem)?],
            SaveFormat::Csv => vec![
                self.write_user_info_csv(record, &stem)?,
                self.write_recommendations_csv(record, &stem)?,
            ],
        };

        let total = self.append_master_log(&mut log, record, &files)?;
        tracing::info!(files = files.len(), total_sessions = total, "session saved");
        Ok(files)
    }

    /// `<name>_<timestamp>`, with a `_<n>` suffix when an earlier session in
    /// the same second already claimed the plain stem.
    fn free_stem(&self, record: &SessionRecord, format: SaveFormat) -> String {
        let base = format!("{}_{}", record.file_label(), record.file_stamp);
        let taken = |stem: &str| match format {
            SaveFormat::Json => self.session_path("user_session", stem, "json").exists(),
            SaveFormat::Csv => {
                self.session_path("user_info", stem, "csv").exists()
                    || self.session_path("recommendations", stem, "csv").exists()
            }
        };

        if !taken(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let stem = format!("{}_{}", base, n);
            if !taken(&stem) {
                return stem;
            }
            n += 1;
        }
    }

    fn session_path(&self, prefix: &str, stem: &str, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{}.{}", prefix, stem, extension))
    }

    fn write_json(&self, record: &SessionRecord, stem: &str) -> Result<PathBuf, ExportError> {
        let path = self.session_path("user_session", stem, "json");
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        Ok(path)
    }

    fn write_user_info_csv(&self, record: &SessionRecord, stem: &str) -> Result<PathBuf, ExportError> {
        let path = self.session_path("user_info", stem, "csv");
        let mut writer = Writer::from_path(&path)?;

        writer.write_record([
            "Name",
            "Phone",
            "Gender",
            "Category",
            "State",
            "Degrees",
            "Branches",
            "Rank",
            "NIT Count",
            "IIIT Count",
            "Generated At",
        ])?;
        writer.write_record([
            record.name.as_str(),
            record.phone.as_str(),
            record.gender.as_str(),
            record.category.as_str(),
            record.state.as_str(),
            record.degrees.as_str(),
            record.branches.as_str(),
            record.rank.to_string().as_str(),
            record.nit_count.to_string().as_str(),
            record.iiit_count.to_string().as_str(),
            record.generated_at.as_str(),
        ])?;

        writer.flush()?;
        Ok(path)
    }

    fn write_recommendations_csv(&self, record: &SessionRecord, stem: &str) -> Result<PathBuf, ExportError> {
        let path = self.session_path("recommendations", stem, "csv");
        let mut writer = Writer::from_path(&path)?;

        writer.write_record(["Type", NAME_HEADER, RANK_HEADER])?;
        let tables = [
            (InstitutionKind::Nit, &record.nit_recommendations),
            (InstitutionKind::Iiit, &record.iiit_recommendations),
        ];
        for (kind, entries) in tables {
            for entry in entries {
                writer.write_record([
                    kind.label(),
                    entry.institution_name.as_str(),
                    entry.closing_rank.to_string().as_str(),
                ])?;
            }
        }

        writer.flush()?;
        Ok(path)
    }

    /// Reads `{"sessions": [...]}`, or starts an empty one when the log is absent.
    fn read_master_log(&self) -> Result<Value, ExportError> {
        let corrupt = |reason: String| ExportError::CorruptLog {
            path: self.master_log.clone(),
            reason,
        };

        if !self.master_log.exists() {
            return Ok(serde_json::json!({ "sessions": [] }));
        }

        let content = fs::read_to_string(&self.master_log)?;
        let log = serde_json::from_str::<Value>(&content).map_err(|e| corrupt(e.to_string()))?;
        if !log.get("sessions").map_or(false, Value::is_array) {
            return Err(corrupt("missing \"sessions\" array".to_string()));
        }
        Ok(log)
    }

    /// Appends a summary to an already validated log and writes it back.
    /// Existing entries are preserved as-is. Returns the new session count.
    fn append_master_log(&self, log: &mut Value, record: &SessionRecord, files: &[PathBuf]) -> Result<usize, ExportError> {
        let sessions = log
            .get_mut("sessions")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| ExportError::CorruptLog {
                path: self.master_log.clone(),
                reason: "missing \"sessions\" array".to_string(),
            })?;

        sessions.push(serde_json::json!({
            "timestamp": record.generated_at,
            "name": record.name,
            "phone": record.phone,
            "gender": record.gender,
            "category": record.category,
            "state": record.state,
            "rank": record.rank,
            "nit_count": record.nit_count,
            "iiit_count": record.iiit_count,
            "files": files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>(),
        }));
        let total = sessions.len();

        if let Some(parent) = self.master_log.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.master_log, serde_json::to_string_pretty(&*log)?)?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, GenderPool};
    use chrono::NaiveDate;

    fn profile(name: &str) -> CandidateProfile {
        CandidateProfile {
            name: Some(name.to_string()),
            phone: Some("9876543210".to_string()),
            gender_pool: GenderPool::GenderNeutral,
            category: Category::ObcNcl,
            home_state: "Kerala".to_string(),
            degrees: vec!["Bachelor of Technology".to_string()],
            branches: vec!["Civil Engineering".to_string(), "Mining Engineering".to_string()],
            rank: 15000,
        }
    }

    fn result(entries: &[(&str, u64)]) -> RankedResult {
        RankedResult {
            entries: entries
                .iter()
                .map(|(name, rank)| RankedEntry {
                    institution_name: name.to_string(),
                    closing_rank: *rank,
                })
                .collect(),
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 14)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap()
    }

    #[test]
    fn empty_table_renders_notice() {
        let text = render_table(InstitutionKind::Iiit, &RankedResult::default());
        assert!(text.starts_with("No IIITs found matching your criteria."));
    }

    #[test]
    fn table_columns_are_aligned() {
        let text = render_table(
            InstitutionKind::Nit,
            &result(&[("NIT Calicut", 16000), ("Visvesvaraya NIT Nagpur", 18250)]),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("College Name"));
        assert_eq!(lines[2].len(), lines[3].len());
        assert!(lines[3].ends_with("18250"));
        assert_eq!(lines.last().copied(), Some("✅ Found 2 NIT options"));
    }

    #[test]
    fn json_session_and_master_log_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = SessionExporter::new(dir.path().join("out"), dir.path().join("master_user_log.json"));
        let record = SessionRecord::new(
            &profile("Asha K."),
            &result(&[("NIT Calicut", 16000)]),
            &RankedResult::default(),
            at(),
        );

        let files = exporter.save(&record, SaveFormat::Json).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("user_session_Asha_K_20250714_093005.json"));

        let saved: Value = serde_json::from_str(&fs::read_to_string(&files[0]).unwrap()).unwrap();
        assert_eq!(saved["rank"], 15000);
        assert_eq!(saved["category"], "OBC-NCL");
        assert_eq!(saved["branches"], "Civil Engineering, Mining Engineering");
        assert_eq!(saved["nit_recommendations"][0]["institution_name"], "NIT Calicut");

        let again = exporter.save(&record, SaveFormat::Json).unwrap();
        assert!(again[0].ends_with("user_session_Asha_K_20250714_093005_2.json"));
        assert!(files[0].exists());
        let log: Value =
            serde_json::from_str(&fs::read_to_string(exporter.master_log_path()).unwrap()).unwrap();
        assert_eq!(log["sessions"].as_array().unwrap().len(), 2);
        assert_eq!(log["sessions"][0]["nit_count"], 1);
        assert_ne!(log["sessions"][0]["files"], log["sessions"][1]["files"]);
    }

    #[test]
    fn csv_session_writes_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = SessionExporter::new(dir.path(), dir.path().join("log.json"));
        let record = SessionRecord::new(
            &profile(""),
            &result(&[("NIT Calicut", 16000)]),
            &result(&[("IIIT Kottayam", 21000), ("IIIT Sri City", 24000)]),
            at(),
        );

        let files = exporter.save(&record, SaveFormat::Csv).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("user_info_anonymous_20250714_093005.csv"));

        let mut reader = csv::Reader::from_path(&files[1]).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "NIT");
        assert_eq!(&rows[2][1], "IIIT Sri City");
        assert_eq!(&rows[2][2], "24000");
    }

    #[test]
    fn corrupt_master_log_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.json");
        let out_dir = dir.path().join("out");
        fs::write(&log_path, "{\"entries\": 3}").unwrap();
        let exporter = SessionExporter::new(&out_dir, &log_path);
        let record = SessionRecord::new(&profile("x"), &RankedResult::default(), &RankedResult::default(), at());

        let err = exporter.save(&record, SaveFormat::Json).unwrap_err();
        assert!(matches!(err, ExportError::CorruptLog { .. }));
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "{\"entries\": 3}");
        assert!(!out_dir.exists() || fs::read_dir(&out_dir).unwrap().next().is_none());
    }

    #[test]
    fn unparsable_master_log_leaves_no_session_files() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.json");
        let out_dir = dir.path().join("out");
        fs::create_dir_all(&out_dir).unwrap();
        fs::write(&log_path, "not json").unwrap();
        let exporter = SessionExporter::new(&out_dir, &log_path);
        let record = SessionRecord::new(&profile("x"), &RankedResult::default(), &RankedResult::default(), at());

        let err = exporter.save(&record, SaveFormat::Csv).unwrap_err();
        assert!(matches!(err, ExportError::CorruptLog { .. }));
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "not json");
    }

    #[test]
    fn csv_sessions_in_the_same_second_keep_matching_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = SessionExporter::new(dir.path().join("out"), dir.path().join("log.json"));
        let record = SessionRecord::new(&profile("Ravi"), &RankedResult::default(), &RankedResult::default(), at());

        exporter.save(&record, SaveFormat::Csv).unwrap();
        let second = exporter.save(&record, SaveFormat::Csv).unwrap();
        assert!(second[0].ends_with("user_info_Ravi_20250714_093005_2.csv"));
        assert!(second[1].ends_with("recommendations_Ravi_20250714_093005_2.csv"));
    }
}

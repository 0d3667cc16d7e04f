use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog;
use crate::error::RecommendError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exam: Exam,
    // Seat tables, resolved against data_directory when relative
    pub data_directory: Option<String>,
    pub nit_table: String,
    pub iiit_table: String,
    // Session export
    pub output_directory: Option<String>,
    pub master_log: Option<String>,
    #[serde(default)]
    pub save_format: SaveFormat,
    pub candidate: CandidateConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Exam {
    #[default]
    #[serde(rename = "jee-main")]
    JeeMain,
    #[serde(rename = "jee-advanced")]
    JeeAdvanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveFormat {
    #[default]
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "csv")]
    Csv,
}

impl FromStr for SaveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(SaveFormat::Json),
            "csv" => Ok(SaveFormat::Csv),
            other => Err(format!("unknown save format '{}' (expected json or csv)", other)),
        }
    }
}

/// Candidate details as written in the config file, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub gender: String,
    pub category: String,
    pub home_state: String,
    pub degrees: Vec<String>,
    pub branches: Vec<String>,
    pub rank: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exam: Exam::JeeMain,
            data_directory: Some("data-source".to_string()),
            nit_table: "nits_round_5.csv".to_string(),
            iiit_table: "iiits_round_5.csv".to_string(),
            output_directory: Some("output".to_string()),
            master_log: Some("master_user_log.json".to_string()),
            save_format: SaveFormat::Json,
            candidate: CandidateConfig {
                name: "".to_string(),
                phone: "".to_string(),
                gender: "Gender-Neutral".to_string(),
                category: "OPEN".to_string(),
                home_state: "".to_string(),
                degrees: vec!["Bachelor of Technology".to_string()],
                branches: vec![
                    "Computer Science and Engineering".to_string(),
                    "Electronics and Communication Engineering".to_string(),
                ],
                rank: 10000,
            },
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}

/// Lowercases, drops parentheses and joins words with single dashes, so that
/// `"OBC-NCL (PwD)"`, `"obc-ncl-pwd"` and `" OBC NCL PwD "` share one key.
fn label_key(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['(', ')', '_'], " ")
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Trimmed, lowercased form used for free-text comparisons (states, degrees, branches).
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstitutionKind {
    #[serde(rename = "NIT")]
    Nit,
    #[serde(rename = "IIIT")]
    Iiit,
    #[serde(rename = "Other")]
    Other,
}

impl InstitutionKind {
    pub fn label(&self) -> &'static str {
        match self {
            InstitutionKind::Nit => "NIT",
            InstitutionKind::Iiit => "IIIT",
            InstitutionKind::Other => "Other",
        }
    }

    /// Only NIT seats are split into home-state and other-state pools.
    pub fn uses_state_quota(&self) -> bool {
        matches!(self, InstitutionKind::Nit)
    }
}

impl fmt::Display for InstitutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quota {
    HomeState,
    OtherState,
    Unspecified,
}

impl Quota {
    /// Parses a quota cell. Pools other than HS/OS (AI, GO, JK, LA) and blanks
    /// are `Unspecified`.
    pub fn from_label(raw: &str) -> Self {
        match label_key(raw).as_str() {
            "hs" | "home-state" => Quota::HomeState,
            "os" | "other-state" => Quota::OtherState,
            _ => Quota::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderPool {
    #[serde(rename = "Gender-Neutral")]
    GenderNeutral,
    #[serde(rename = "Female-only (including Supernumerary)")]
    FemaleOnly,
}

impl GenderPool {
    pub fn label(&self) -> &'static str {
        match self {
            GenderPool::GenderNeutral => "Gender-Neutral",
            GenderPool::FemaleOnly => "Female-only (including Supernumerary)",
        }
    }
}

impl FromStr for GenderPool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = label_key(s);
        match key.as_str() {
            "gender-neutral" | "neutral" => Ok(GenderPool::GenderNeutral),
            _ if key == "female" || key.starts_with("female-only") => Ok(GenderPool::FemaleOnly),
            _ => Err(format!("unrecognized gender pool '{}'", s.trim())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "EWS")]
    Ews,
    #[serde(rename = "EWS (PwD)")]
    EwsPwd,
    #[serde(rename = "OBC-NCL")]
    ObcNcl,
    #[serde(rename = "OBC-NCL (PwD)")]
    ObcNclPwd,
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "OPEN (PwD)")]
    OpenPwd,
    #[serde(rename = "SC (PwD)")]
    ScPwd,
    #[serde(rename = "ST (PwD)")]
    StPwd,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Sc => "SC",
            Category::St => "ST",
            Category::Ews => "EWS",
            Category::EwsPwd => "EWS (PwD)",
            Category::ObcNcl => "OBC-NCL",
            Category::ObcNclPwd => "OBC-NCL (PwD)",
            Category::Open => "OPEN",
            Category::OpenPwd => "OPEN (PwD)",
            Category::ScPwd => "SC (PwD)",
            Category::StPwd => "ST (PwD)",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match label_key(s).as_str() {
            "sc" => Ok(Category::Sc),
            "st" => Ok(Category::St),
            "ews" => Ok(Category::Ews),
            "ews-pwd" => Ok(Category::EwsPwd),
            "obc-ncl" => Ok(Category::ObcNcl),
            "obc-ncl-pwd" => Ok(Category::ObcNclPwd),
            "open" => Ok(Category::Open),
            "open-pwd" => Ok(Category::OpenPwd),
            "sc-pwd" => Ok(Category::ScPwd),
            "st-pwd" => Ok(Category::StPwd),
            _ => Err(format!("unrecognized category '{}'", s.trim())),
        }
    }
}

/// One row of a previous round's seat matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub institution_name: String,
    pub institution_kind: InstitutionKind,
    pub institution_state: Option<String>,
    pub quota: Quota,
    pub gender_pool: GenderPool,
    pub category: Category,
    pub degree: String,
    pub branch: String,
    pub closing_rank: i64,
}

/// Coerces a closing-rank cell the way spreadsheet exports need it: plain
/// integers, or floats without a fractional part (`"1234.0"`). Preparatory
/// ranks such as `"1234P"`, blanks and non-finite values yield `None`.
pub fn parse_closing_rank(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

/// A validated candidate query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender_pool: GenderPool,
    pub category: Category,
    pub home_state: String,
    pub degrees: Vec<String>,
    pub branches: Vec<String>,
    pub rank: i64,
}

impl CandidateProfile {
    /// Validates raw input into a profile. Degree and branch lists are
    /// trimmed and deduplicated case-insensitively, keeping first spelling.
    pub fn from_input(input: &CandidateConfig) -> Result<Self, RecommendError> {
        if input.rank <= 0 {
            return Err(RecommendError::InvalidProfile(format!(
                "rank must be a positive integer, got {}",
                input.rank
            )));
        }
        let gender_pool = input
            .gender
            .parse::<GenderPool>()
            .map_err(RecommendError::InvalidProfile)?;
        let category = input
            .category
            .parse::<Category>()
            .map_err(RecommendError::InvalidProfile)?;

        let degrees = dedup_preferences(&input.degrees);
        if degrees.is_empty() {
            return Err(RecommendError::InvalidProfile(
                "select at least one degree".to_string(),
            ));
        }
        let branches = dedup_preferences(&input.branches);
        if branches.is_empty() {
            return Err(RecommendError::InvalidProfile(
                "select at least one branch".to_string(),
            ));
        }

        warn_unlisted("degree", &degrees, catalog::DEGREE_OPTIONS);
        warn_unlisted("branch", &branches, catalog::BRANCH_OPTIONS);
        let home_state = input.home_state.trim().to_string();
        if !home_state.is_empty() && !catalog::contains(catalog::STATE_OPTIONS, &home_state) {
            tracing::warn!(state = %home_state, "home state is not in the state list");
        }

        Ok(Self {
            name: non_blank(&input.name),
            phone: non_blank(&input.phone),
            gender_pool,
            category,
            home_state,
            degrees,
            branches,
            rank: input.rank,
        })
    }
}

fn dedup_preferences(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(normalize_text(value)))
        .map(str::to_string)
        .collect()
}

fn warn_unlisted(field: &str, values: &[String], options: &[&str]) {
    for value in values {
        if !catalog::contains(options, value) {
            tracing::warn!(field, value = %value, "preference is not in the option list");
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub institution_name: String,
    pub closing_rank: u64,
}

/// Admissible institutions for one seat table, best (lowest) closing rank first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedResult {
    pub entries: Vec<RankedEntry>,
}

impl RankedResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry> {
        self.entries.iter()
    }
}

use crate::error::LoadError;
use crate::models::{parse_closing_rank, Category, GenderPool, InstitutionKind, Quota, SeatRecord};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::{Path, PathBuf};

/// All usable rows of one seat table, plus how many rows were dropped.
#[derive(Debug, Clone)]
pub struct SeatTable {
    pub kind: InstitutionKind,
    pub source: PathBuf,
    pub records: Vec<SeatRecord>,
    pub skipped: usize,
}

const COLLEGE_NAME: &str = "college name";
const COLLEGE_STATE: &str = "college state";
const QUOTA: &str = "quota";
const GENDER: &str = "gender";
const CATEGORY: &str = "category";
const DEGREE: &str = "degree";
const BRANCH: &str = "branch";
const CLOSE_RANK: &str = "close rank";

/// Alternative header spellings seen in exported seat matrices.
const ALIASES: &[(&str, &str)] = &[
    ("institute", COLLEGE_NAME),
    ("institution", COLLEGE_NAME),
    ("institute name", COLLEGE_NAME),
    ("state", COLLEGE_STATE),
    ("institute state", COLLEGE_STATE),
    ("seat type", CATEGORY),
    ("academic program name", BRANCH),
    ("program", BRANCH),
    ("closing rank", CLOSE_RANK),
];

/// Positions of the known columns within a header row.
struct ColumnMap {
    name: usize,
    state: Option<usize>,
    quota: Option<usize>,
    gender: usize,
    category: usize,
    degree: usize,
    branch: usize,
    close_rank: usize,
}

enum RowOutcome {
    Record(SeatRecord),
    Skipped(&'static str),
}

pub struct SeatTableLoader {
    whitespace: Regex,
}

impl SeatTableLoader {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
        }
    }

    /// Loads a `.csv`, `.html` or `.htm` seat table. Every row is tagged with `kind`.
    pub fn load_file(&self, path: &Path, kind: InstitutionKind) -> Result<SeatTable, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let (headers, rows) = match extension.as_deref() {
            Some("csv") => self.read_csv(path)?,
            Some("html") | Some("htm") => {
                let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                self.parse_html_content(&content)
                    .map_err(|reason| LoadError::Html {
                        path: path.to_path_buf(),
                        reason,
                    })?
            }
            _ => {
                return Err(LoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        self.build_table(path, kind, &headers, rows)
    }

    fn read_csv(&self, path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), LoadError> {
        let csv_error = |source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_error)?;

        let headers = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok((headers, rows))
    }

    /// Extracts the first `<table>` of a saved seat-matrix page. The header row is
    /// the first row made of `<th>` cells, or the first row if there is none.
    pub fn parse_html_content(&self, content: &str) -> Result<(Vec<String>, Vec<Vec<String>>), String> {
        let document = Html::parse_document(content);
        let table_selector = selector("table")?;
        let row_selector = selector("tr")?;
        let header_selector = selector("th")?;
        let cell_selector = selector("th, td")?;

        let table = document
            .select(&table_selector)
            .next()
            .ok_or_else(|| "no <table> element found".to_string())?;

        let rows: Vec<ElementRef> = table.select(&row_selector).collect();
        let header_index = rows
            .iter()
            .position(|row| row.select(&header_selector).next().is_some())
            .unwrap_or(0);

        let cells_of = |row: &ElementRef| -> Vec<String> {
            row.select(&cell_selector)
                .map(|cell| self.collapse(&cell.text().collect::<String>()))
                .collect()
        };

        let headers = rows
            .get(header_index)
            .map(&cells_of)
            .ok_or_else(|| "table has no rows".to_string())?;
        let body = rows
            .iter()
            .skip(header_index + 1)
            .map(&cells_of)
            .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
            .collect();

        Ok((headers, body))
    }

    /// Header cleanup: ASCII only, trimmed, lowercased, single spaces.
    pub fn normalize_header(&self, raw: &str) -> String {
        let ascii: String = raw.chars().filter(char::is_ascii).collect();
        self.collapse(&ascii).to_lowercase()
    }

    fn collapse(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }

    fn canonical_column(&self, raw: &str) -> String {
        let header = self.normalize_header(raw);
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == header)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(header)
    }

    fn map_columns(&self, path: &Path, kind: InstitutionKind, headers: &[String]) -> Result<ColumnMap, LoadError> {
        let columns: Vec<String> = headers.iter().map(|h| self.canonical_column(h)).collect();
        let find = |name: &str| columns.iter().position(|column| column == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
        };

        let quota = if kind.uses_state_quota() {
            Some(require(QUOTA)?)
        } else {
            find(QUOTA)
        };

        Ok(ColumnMap {
            name: require(COLLEGE_NAME)?,
            state: find(COLLEGE_STATE),
            quota,
            gender: require(GENDER)?,
            category: require(CATEGORY)?,
            degree: require(DEGREE)?,
            branch: require(BRANCH)?,
            close_rank: require(CLOSE_RANK)?,
        })
    }

    fn build_table(
        &self,
        path: &Path,
        kind: InstitutionKind,
        headers: &[String],
        rows: Vec<Vec<String>>,
    ) -> Result<SeatTable, LoadError> {
        let columns = self.map_columns(path, kind, headers)?;
        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0;

        for (index, row) in rows.iter().enumerate() {
            match parse_row(&columns, kind, row) {
                RowOutcome::Record(record) => records.push(record),
                RowOutcome::Skipped(reason) => {
                    skipped += 1;
                    // +2: one for the header, one for 1-based numbering
                    tracing::debug!(source = %path.display(), row = index + 2, reason, "skipping seat row");
                }
            }
        }

        tracing::info!(
            source = %path.display(),
            kind = %kind,
            loaded = records.len(),
            skipped,
            "seat table loaded"
        );

        Ok(SeatTable {
            kind,
            source: path.to_path_buf(),
            records,
            skipped,
        })
    }
}

impl Default for SeatTableLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|value| value.trim()).unwrap_or("")
}

fn parse_row(columns: &ColumnMap, kind: InstitutionKind, row: &[String]) -> RowOutcome {
    let institution_name = cell(row, columns.name);
    if institution_name.is_empty() {
        return RowOutcome::Skipped("blank college name");
    }
    let Some(closing_rank) = parse_closing_rank(cell(row, columns.close_rank)) else {
        return RowOutcome::Skipped("closing rank is not numeric");
    };
    let Ok(gender_pool) = cell(row, columns.gender).parse::<GenderPool>() else {
        return RowOutcome::Skipped("unrecognized gender pool");
    };
    let Ok(category) = cell(row, columns.category).parse::<Category>() else {
        return RowOutcome::Skipped("unrecognized category");
    };

    let institution_state = columns
        .state
        .map(|index| cell(row, index))
        .filter(|state| !state.is_empty())
        .map(str::to_string);
    let quota = columns
        .quota
        .map(|index| Quota::from_label(cell(row, index)))
        .unwrap_or(Quota::Unspecified);

    RowOutcome::Record(SeatRecord {
        institution_name: institution_name.to_string(),
        institution_kind: kind,
        institution_state,
        quota,
        gender_pool,
        category,
        degree: cell(row, columns.degree).to_string(),
        branch: cell(row, columns.branch).to_string(),
        closing_rank,
    })
}

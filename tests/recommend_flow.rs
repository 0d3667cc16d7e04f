use college_recommender::loader::SeatTableLoader;
use college_recommender::models::{CandidateConfig, CandidateProfile, InstitutionKind, SaveFormat};
use college_recommender::report::{render_table, SessionExporter, SessionRecord};
use college_recommender::{rank_colleges, RecommendError};
use std::fs;

const NITS: &str = "\
college name,college state,quota,gender,category,degree,branch,close rank
NIT A,Karnataka,HS,Gender-Neutral,OPEN,B.Tech,Computer Science,1200
NIT A,Karnataka,OS,Gender-Neutral,OPEN,B.Tech,Computer Science,5000
NIT B,Delhi,OS,Gender-Neutral,OPEN,B.Tech,Computer Science,3000
NIT B,Delhi,HS,Gender-Neutral,OPEN,B.Tech,Computer Science,2600
NIT C,Goa,OS,Female-only (including Supernumerary),OPEN,B.Tech,Computer Science,2500
NIT D,Goa,OS,Gender-Neutral,OPEN,B.Tech,Computer Science,2400P
";

const IIITS: &str = "\
college name,gender,category,degree,branch,close rank
IIIT X,gender-neutral,open,b.tech,computer science,2100
IIIT Y,Gender-Neutral,OPEN,B.Tech,Computer Science,1999
IIIT Z,Gender-Neutral,OBC-NCL,B.Tech,Computer Science,8000
";

fn candidate(rank: i64) -> CandidateConfig {
    CandidateConfig {
        name: "Test Candidate".to_string(),
        phone: String::new(),
        gender: "Gender-Neutral".to_string(),
        category: "open".to_string(),
        home_state: "Karnataka".to_string(),
        degrees: vec!["B.Tech".to_string()],
        branches: vec!["Computer Science".to_string()],
        rank,
    }
}

#[test]
fn nit_and_iiit_passes_from_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let nit_path = dir.path().join("nits.csv");
    let iiit_path = dir.path().join("iiits.csv");
    fs::write(&nit_path, NITS).unwrap();
    fs::write(&iiit_path, IIITS).unwrap();

    let loader = SeatTableLoader::new();
    let nit_table = loader.load_file(&nit_path, InstitutionKind::Nit).unwrap();
    let iiit_table = loader.load_file(&iiit_path, InstitutionKind::Iiit).unwrap();
    assert_eq!(nit_table.skipped, 1);

    let profile = CandidateProfile::from_input(&candidate(2000)).unwrap();
    let nits = rank_colleges(&nit_table.records, &profile, true).unwrap();
    let iiits = rank_colleges(&iiit_table.records, &profile, false).unwrap();

    let nit_rows: Vec<(&str, u64)> = nits
        .iter()
        .map(|e| (e.institution_name.as_str(), e.closing_rank))
        .collect();
    assert_eq!(nit_rows, vec![("NIT B", 3000)]);

    let iiit_rows: Vec<(&str, u64)> = iiits
        .iter()
        .map(|e| (e.institution_name.as_str(), e.closing_rank))
        .collect();
    assert_eq!(iiit_rows, vec![("IIIT X", 2100)]);

    let exporter = SessionExporter::new(dir.path().join("out"), dir.path().join("master.json"));
    let at = chrono::NaiveDate::from_ymd_opt(2025, 7, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let files = exporter
        .save(&SessionRecord::new(&profile, &nits, &iiits, at), SaveFormat::Csv)
        .unwrap();
    let recommendations = fs::read_to_string(&files[1]).unwrap();
    assert!(recommendations.contains("NIT,NIT B,3000"));
    assert!(recommendations.contains("IIIT,IIIT X,2100"));
}

#[test]
fn strong_rank_with_no_matching_preferences_renders_notice() {
    let dir = tempfile::tempdir().unwrap();
    let nit_path = dir.path().join("nits.csv");
    fs::write(&nit_path, NITS).unwrap();

    let mut input = candidate(100);
    input.branches = vec!["Mining Engineering".to_string()];
    let profile = CandidateProfile::from_input(&input).unwrap();

    let table = SeatTableLoader::new().load_file(&nit_path, InstitutionKind::Nit).unwrap();
    let nits = rank_colleges(&table.records, &profile, true).unwrap();
    assert!(nits.is_empty());
    assert!(render_table(InstitutionKind::Nit, &nits).starts_with("No NITs found"));
}

#[test]
fn invalid_rank_is_rejected_before_ranking() {
    let err = CandidateProfile::from_input(&candidate(-3)).unwrap_err();
    assert!(matches!(err, RecommendError::InvalidProfile(_)));
}

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use college_recommender::analyzer::{rank_colleges_traced, LogTrace};
use college_recommender::catalog;
use college_recommender::loader::{SeatTable, SeatTableLoader};
use college_recommender::models::{CandidateProfile, Config, Exam, InstitutionKind, SaveFormat};
use college_recommender::report::{render_table, SessionExporter, SessionRecord};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("college-recommender")
        .version("0.1")
        .about("Recommends NITs and IIITs from previous-round JEE Main closing ranks")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("rank")
                .short('r')
                .long("rank")
                .value_name("RANK")
                .help("JEE Main rank (overrides candidate.rank)")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .value_name("CATEGORY")
                .help("Reservation category, e.g. OPEN or \"OBC-NCL (PwD)\""),
        )
        .arg(
            Arg::new("gender")
                .long("gender")
                .value_name("POOL")
                .help("Gender-Neutral or Female-only"),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .value_name("STATE")
                .help("Home state (overrides candidate.home_state)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Session save format: json or csv")
                .value_parser(|s: &str| s.parse::<SaveFormat>()),
        )
        .arg(
            Arg::new("no-save")
                .long("no-save")
                .help("Do not write session files or the master log")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("Print the accepted categories, states, degrees and branches")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list") {
        print_catalog();
        return Ok(());
    }

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    // Load or create configuration
    let mut config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)
            .with_context(|| format!("Failed to load configuration from {}", config_file))?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        Config::default().save_to_file(config_file)?;
        println!(
            "⚠️  Please edit {} and set your home state and preferences, then run the program again.",
            config_file
        );
        return Ok(());
    };

    if let Some(rank) = matches.get_one::<i64>("rank") {
        config.candidate.rank = *rank;
    }
    if let Some(category) = matches.get_one::<String>("category") {
        config.candidate.category = category.clone();
    }
    if let Some(gender) = matches.get_one::<String>("gender") {
        config.candidate.gender = gender.clone();
    }
    if let Some(state) = matches.get_one::<String>("state") {
        config.candidate.home_state = state.clone();
    }
    if let Some(format) = matches.get_one::<SaveFormat>("format") {
        config.save_format = *format;
    }

    if config.exam == Exam::JeeAdvanced {
        println!("Currently, only JEE Mains-based recommendations are supported.");
        return Ok(());
    }

    if config.candidate.home_state.trim().is_empty() {
        println!("❌ Error: candidate.home_state is empty in configuration file");
        println!("   Please edit {} and set your home state", config_file);
        return Ok(());
    }

    let profile = CandidateProfile::from_input(&config.candidate)
        .with_context(|| format!("Candidate settings in {} are not usable", config_file))?;

    println!("🔍 Finding colleges for JEE Main rank {}", profile.rank);
    println!("🎯 Category: {} | {} | Home state: {}", profile.category.label(), profile.gender_pool.label(), profile.home_state);
    println!("📚 Degrees: {}", profile.degrees.join(", "));
    println!("🛠️  Branches: {}", profile.branches.join(", "));

    println!("\n📥 Loading college data...");
    let loader = SeatTableLoader::new();
    let data_dir = config.data_directory.as_deref().unwrap_or("data-source");
    let nit_table = load_table(&loader, data_dir, &config.nit_table, InstitutionKind::Nit)?;
    let iiit_table = load_table(&loader, data_dir, &config.iiit_table, InstitutionKind::Iiit)?;

    println!("\n🔍 Filtering colleges based on your preferences...");
    let nits = rank_colleges_traced(&nit_table.records, &profile, true, &mut LogTrace)?;
    let iiits = rank_colleges_traced(&iiit_table.records, &profile, false, &mut LogTrace)?;

    println!("\n🎯 College Recommendations Based on JEE Mains Rank:\n");
    println!("🟢 NITs ===");
    print!("{}", render_table(InstitutionKind::Nit, &nits));
    println!("\n🟣 IIITs ===");
    print!("{}", render_table(InstitutionKind::Iiit, &iiits));

    println!("\n📊 SUMMARY");
    println!("==========");
    println!("👤 Your Rank: {}", profile.rank);
    println!("🟢 NITs Found: {}", nits.len());
    println!("🟣 IIITs Found: {}", iiits.len());

    if matches.get_flag("no-save") {
        return Ok(());
    }

    let output_dir = config.output_directory.as_deref().unwrap_or("output");
    let master_log = config.master_log.as_deref().unwrap_or("master_user_log.json");
    let exporter = SessionExporter::new(output_dir, master_log);
    let generated_at = chrono::Local::now().naive_local();
    let record = SessionRecord::new(&profile, &nits, &iiits, generated_at);

    let files = exporter
        .save(&record, config.save_format)
        .context("Failed to save session data")?;
    println!("\n💾 Session saved:");
    for file in &files {
        println!("   📁 {}", file.display());
    }
    println!("📅 Generated on: {}", generated_at.format("%Y-%m-%d at %H:%M:%S"));
    println!("📊 Master log: {}", exporter.master_log_path().display());

    Ok(())
}

fn resolve_table_path(data_dir: &str, table: &str) -> PathBuf {
    let path = Path::new(table);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(data_dir).join(path)
    }
}

fn load_table(loader: &SeatTableLoader, data_dir: &str, table: &str, kind: InstitutionKind) -> Result<SeatTable> {
    let path = resolve_table_path(data_dir, table);
    println!("📄 Processing: {}", path.display());

    let seat_table = loader
        .load_file(&path, kind)
        .with_context(|| format!("Failed to load {} seat table", kind))?;
    println!("   ✅ Found {} {} seat records", seat_table.records.len(), kind);
    if seat_table.skipped > 0 {
        println!("   ⚠️  Skipped {} rows with unusable values", seat_table.skipped);
    }
    Ok(seat_table)
}

fn print_catalog() {
    let sections: [(&str, &[&str]); 5] = [
        ("Gender pools", catalog::GENDER_OPTIONS),
        ("Categories", catalog::CATEGORY_OPTIONS),
        ("States", catalog::STATE_OPTIONS),
        ("Degrees", catalog::DEGREE_OPTIONS),
        ("Branches", catalog::BRANCH_OPTIONS),
    ];
    for (title, options) in sections {
        println!("{}:", title);
        for (i, option) in options.iter().enumerate() {
            println!("   {}. {}", i + 1, option);
        }
        println!();
    }
}

use anyhow::{Context, Result};
use colored::Colorize;
use g6_expiry::config::{self, RuntimeConfig};
use g6_expiry::{
    ExpiryResolver, HolidayCalendar, PolicyTable, Rule, StaticExpiryProvider, classify_expiry,
    logging,
};

fn banner(title: &str) {
    println!("{}", "=".repeat(60).blue());
    println!("{}", title.green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();
}

fn build_resolver(cfg: &RuntimeConfig) -> Result<ExpiryResolver<StaticExpiryProvider>> {
    let provider = match &cfg.expiries_file {
        Some(path) => StaticExpiryProvider::from_json_file(path)?,
        None => {
            println!("{} No G6_EXPIRIES_FILE set, every index will use fabricated expiries", "ℹ".blue());
            StaticExpiryProvider::new()
        }
    };

    let policies = match &cfg.policy_file {
        Some(path) => PolicyTable::from_json_file(path)
            .with_context(|| format!("Failed to load index policy from {}", path))?,
        None => PolicyTable::canonical(),
    };

    let mut resolver = ExpiryResolver::new(provider, policies).with_fabrication(cfg.fabricate);

    if let Some(path) = &cfg.holidays_file {
        let holidays = HolidayCalendar::from_json_file(path)
            .with_context(|| format!("Failed to load holidays from {}", path))?;
        println!("{} Loaded {} holidays", "✓".green(), holidays.len());
        resolver = resolver.with_holidays(holidays);
    }

    Ok(resolver)
}

/// Resolve a single rule for a single index
async fn run_resolve(cfg: &RuntimeConfig) -> Result<()> {
    banner("G6 Expiry Resolve");
    let resolver = build_resolver(cfg)?;

    println!("{} Index: {}", "→".cyan(), cfg.index.yellow());
    println!("{} Rule: {}", "→".cyan(), cfg.rule.yellow());
    println!("{} Today: {}", "→".cyan(), cfg.today.to_string().yellow());
    println!();

    let resolution = resolver.resolve(&cfg.index, &cfg.rule, cfg.today).await?;
    let policy = resolver.policies().lookup(&cfg.index);

    println!("{} Expiry: {}", "✓".green(), resolution.expiry.to_string().bold());
    println!("{} Kind: {:?}", "ℹ".blue(), classify_expiry(resolution.expiry, &policy));
    if resolution.fabricated {
        println!("{} Resolved from fabricated candidates", "⚠".yellow());
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&resolution)?);

    Ok(())
}

/// Resolve every canonical rule for every configured index
async fn run_matrix(cfg: &RuntimeConfig) -> Result<()> {
    banner("G6 Expiry Matrix");
    let resolver = build_resolver(cfg)?;

    let rules: Vec<&str> = Rule::ALL.iter().map(|r| r.as_str()).collect();
    let results = resolver
        .resolve_matrix(config::G6_INDICES, &rules, cfg.today)
        .await;

    println!(
        "{:<12} {:<12} {:<12} {}",
        "INDEX".bold(),
        "RULE".bold(),
        "EXPIRY".bold(),
        "NOTE".bold()
    );

    let mut failed = 0;
    for result in &results {
        match result {
            Ok(res) => {
                let note = if res.fabricated { "fabricated".yellow() } else { "".normal() };
                println!("{:<12} {:<12} {:<12} {}", res.index, res.rule, res.expiry.to_string().green(), note);
            }
            Err(e) => {
                failed += 1;
                println!("{} {}", "✗".red(), e.to_string().chars().take(100).collect::<String>());
            }
        }
    }

    println!();
    println!("{} Resolved: {}", "✓".green(), results.len() - failed);
    if failed > 0 {
        println!("{} Failed: {}", "✗".red(), failed);
    }

    Ok(())
}

/// Classify a date against an index's expiry calendar
fn run_classify(cfg: &RuntimeConfig) -> Result<()> {
    banner("G6 Expiry Classify");

    let policies = match &cfg.policy_file {
        Some(path) => PolicyTable::from_json_file(path)?,
        None => PolicyTable::canonical(),
    };
    let policy = policies.lookup(&cfg.index);
    let date = cfg.classify_date.unwrap_or(cfg.today);

    println!("{} Index: {}", "→".cyan(), cfg.index.yellow());
    println!("{} Date: {}", "→".cyan(), date.to_string().yellow());
    println!("{} Weekly expiry day: {}", "ℹ".blue(), policy.weekly_dow);
    println!("{} Kind: {:?}", "✓".green(), classify_expiry(date, &policy));

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let cfg = RuntimeConfig::from_env()?;

    match cfg.mode.as_str() {
        "resolve" => run_resolve(&cfg).await?,
        "matrix" => run_matrix(&cfg).await?,
        "classify" => run_classify(&cfg)?,
        other => {
            eprintln!("Invalid mode '{}'. Use 'resolve', 'matrix' or 'classify'", other);
            eprintln!("Set G6_MODE environment variable to control execution mode");
            eprintln!("Examples:");
            eprintln!("  G6_MODE=matrix G6_EXPIRIES_FILE=expiries.json cargo run");
            eprintln!("  G6_MODE=resolve G6_INDEX=NIFTY G6_RULE=next_week G6_TODAY=2025-10-27 cargo run");
            eprintln!("  G6_MODE=classify G6_INDEX=SENSEX G6_DATE=2025-10-31 cargo run");
            std::process::exit(1);
        }
    }

    Ok(())
}

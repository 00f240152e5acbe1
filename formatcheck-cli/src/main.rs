use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

// Import from formatcheck-core
use formatcheck_core::{
    CheckOutcome, CheckReport, ConfigManager, DocumentSession, DocumentType, FormatChecker,
    GrammarProvider, ProfileConfig, SnapshotHost,
};

#[derive(Parser)]
#[command(name = "formatcheck")]
#[command(about = "Check thesis documents against the department formatting guide")]
struct Args {
    /// Path to the document snapshot (JSON) to check
    #[arg(short, long)]
    input: Option<String>,

    /// Document part: entry, tech_assignment or main_part
    #[arg(short, long, default_value = "main_part")]
    document_type: String,

    /// Run the formatting checks (default when no check is selected)
    #[arg(long)]
    formatting: bool,

    /// Run the grammar pass
    #[arg(long)]
    grammar: bool,

    /// Comma-separated words the grammar pass should accept
    #[arg(short, long, value_delimiter = ',')]
    exceptions: Vec<String>,

    /// Path to custom profile file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: text or json
    #[arg(short = 'f', long, default_value = "text")]
    output_format: String,

    /// Output file path (prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<String>,

    /// LanguageTool endpoint (defaults to the profile's endpoint)
    #[arg(long)]
    language_tool_url: Option<String>,

    /// Print per-checker timings
    #[arg(long)]
    profile: bool,

    /// Show the built-in profiles and exit
    #[arg(long)]
    show_profiles: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("🦀 Formatcheck Thesis Linter");

    if args.show_profiles {
        show_profiles()?;
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        println!("⚠️  No input given. Use --input <snapshot.json> or --show-profiles.");
        return Ok(());
    };

    // Check if input file exists
    if !Path::new(input).exists() {
        println!("⚠️  Input document not found at: {input}");
        println!("   Please check the file path.");
        return Ok(());
    }

    let run_grammar = args.grammar;
    let run_formatting = args.formatting || !args.grammar;

    let mut config_manager = ConfigManager::new()?;
    if let Some(config_path) = &args.config {
        let document_type: DocumentType = args.document_type.parse()?;
        let profile =
            ProfileConfig::load_with_fallback(Some(config_path.as_str()), document_type.clone());
        if profile.document_type != document_type {
            println!(
                "⚠️  Profile {config_path} is for {}, not {document_type}",
                profile.document_type
            );
        }
        println!("📋 Loaded profile from: {config_path}");
        config_manager.insert(profile);
    } else {
        println!("📋 Using built-in profile: {}", args.document_type);
    }

    let mut checker = FormatChecker::new_with_dependencies(config_manager, None);
    checker.set_profiling(args.profile);
    if run_grammar {
        if let Some(provider) = create_provider(&args, checker.config_manager()) {
            checker.set_provider(provider);
        }
    }

    let exceptions: HashSet<String> = args
        .exceptions
        .iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect();
    log::debug!("Exception words: {exceptions:?}");

    println!("📄 Checking: {input}");
    let session = DocumentSession::open(&SnapshotHost::new(), Path::new(input))
        .with_context(|| format!("Could not open {input}"))?;

    let outcome = checker.check(
        session.document(),
        &args.document_type,
        run_formatting,
        run_grammar,
        &exceptions,
    );
    if let Err(e) = session.close() {
        println!("⚠️  Failed to close document: {e}");
    }

    if args.profile {
        print_timings(&checker);
    }

    let rendered = match args.output_format.as_str() {
        "json" => serde_json::to_string_pretty(&outcome)?,
        "text" => render_text(&outcome, run_formatting, run_grammar),
        other => {
            println!("⚠️  Unknown output format '{other}', using text");
            render_text(&outcome, run_formatting, run_grammar)
        }
    };

    match &args.output {
        Some(output_path) => {
            std::fs::write(output_path, &rendered)
                .with_context(|| format!("Could not write {output_path}"))?;
            println!("💾 Results saved to: {output_path}");
        }
        None => println!("{rendered}"),
    }

    match outcome {
        CheckOutcome::Report(report) => {
            println!(
                "✅ {} formatting findings, {} grammar findings",
                report.formatting.len(),
                report.grammar.len()
            );
            Ok(())
        }
        CheckOutcome::Error { error } => {
            eprintln!("❌ Check failed: {error}");
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "languagetool")]
fn create_provider(
    args: &Args,
    config_manager: &ConfigManager,
) -> Option<Box<dyn GrammarProvider>> {
    let endpoint = args.language_tool_url.clone().or_else(|| {
        args.document_type
            .parse::<DocumentType>()
            .ok()
            .and_then(|t| config_manager.get_config(&t))
            .map(|config| config.grammar.endpoint.clone())
    })?;
    let provider = formatcheck_core::LanguageToolProvider::new(&endpoint);
    println!("🌐 Using LanguageTool at: {}", provider.endpoint());
    Some(Box::new(provider))
}

/// Fallback when no grammar provider is compiled in
#[cfg(not(feature = "languagetool"))]
fn create_provider(
    _args: &Args,
    _config_manager: &ConfigManager,
) -> Option<Box<dyn GrammarProvider>> {
    println!("⚠️  No grammar provider compiled in. Compile with: --features languagetool");
    None
}

fn render_text(outcome: &CheckOutcome, run_formatting: bool, run_grammar: bool) -> String {
    match outcome {
        CheckOutcome::Error { error } => format!("Error: {error}"),
        CheckOutcome::Report(report) => render_report(report, run_formatting, run_grammar),
    }
}

fn render_report(report: &CheckReport, run_formatting: bool, run_grammar: bool) -> String {
    let mut lines = vec![format!(
        "Document part: {} (checked at {})",
        report.document_type,
        report.checked_at.to_rfc3339()
    )];

    if run_formatting {
        lines.push(String::new());
        lines.push(format!("📐 Formatting ({} findings)", report.formatting.len()));
        if report.formatting.is_empty() {
            lines.push("   No formatting errors found".to_string());
        }
        lines.extend(report.formatting.iter().map(|f| format!("   - {f}")));
    }

    if run_grammar {
        lines.push(String::new());
        lines.push(format!("✍️  Grammar ({} findings)", report.grammar.len()));
        if report.grammar.is_empty() {
            lines.push("   No grammar errors found".to_string());
        }
        lines.extend(report.grammar.iter().map(|f| format!("   - {}", f.message)));
    }

    lines.join("\n")
}

fn print_timings(checker: &FormatChecker) {
    let steps = checker.step_timings();
    if !steps.is_empty() {
        println!("\n⏱️  Stage Timings:");
        print_timing_table(&steps);
    }

    let rules = checker.rule_timings();
    if !rules.is_empty() {
        println!("\n📊 Performance Summary:");
        print_timing_table(&rules);
    }
}

fn print_timing_table(timings: &[(String, Duration)]) {
    let total: Duration = timings.iter().map(|(_, d)| *d).sum();
    for (name, duration) in timings {
        println!("   {:.<35} {:.2}ms", name, duration.as_secs_f64() * 1000.0);
    }
    println!("   {:.<35} {:.2}ms", "Total", total.as_secs_f64() * 1000.0);
}

fn show_profiles() -> Result<()> {
    let manager = ConfigManager::new()?;

    println!("\n📋 Built-in Profiles:");
    for document_type in DocumentType::all() {
        let Some(config) = manager.get_config(&document_type) else {
            continue;
        };
        println!(
            "  {:<16} appendix policy: {:?}, requires '{}': {}",
            document_type.as_str(),
            config.appendix_policy,
            config.markers.contents,
            config.requires_contents
        );
        for rule in &config.pipeline.rules {
            let zones = if rule.zones.is_empty() {
                "default zones".to_string()
            } else {
                format!("{:?}", rule.zones)
            };
            println!("    - {} ({zones})", rule.name);
        }
    }

    println!("\n📝 Usage Examples:");
    println!("  formatcheck -i thesis.json -d main_part");
    println!("  formatcheck -i thesis.json -d main_part --grammar -e ZDO,KPI");
    println!("  formatcheck -i assignment.json -d tech_assignment -f json -o report.json");
    println!("  formatcheck -i thesis.json -c profile.yaml --profile");

    Ok(())
}

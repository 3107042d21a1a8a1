use anyhow::Result;
use clap::Parser;
use std::path::Path;

// Import from labelscope-core
use labelscope_core::{AnalyzerConfig, CorpusProcessor, Report};

#[derive(Parser)]
#[command(name = "labelscope")]
#[command(about = "A schema profiler for drug-label JSON corpora")]
struct Args {
    /// Path to the label JSON file to analyze (one object or an array)
    #[arg(short, long)]
    input: String,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: report, table, or summary
    #[arg(short = 'f', long, default_value = "report")]
    output_format: String,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Print the human-readable summary to stdout after analysis
    #[arg(long)]
    summary: bool,

    /// Skip cache and force fresh analysis (useful for development/testing)
    #[arg(long)]
    skip_cache: bool,

    /// Cache directory for analyzed reports
    #[arg(long, default_value = "cache")]
    cache_dir: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🦀 Labelscope Schema Profiler");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    // Check if input file exists
    if !Path::new(&args.input).exists() {
        eprintln!("❌ Input file not found at: {}", args.input);
        eprintln!("   Please check the file path.");
        std::process::exit(1);
    }

    // Load config using the fallback pattern
    let config = AnalyzerConfig::load_with_fallback(args.config.as_deref());

    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    let processor = CorpusProcessor::new_cli(config, &args.cache_dir)?;

    match processor.process_file(&args.input, args.skip_cache) {
        Ok(report) => {
            println!("✅ Successfully analyzed corpus");
            println!("📊 Report metrics:");
            println!("   - Distinct fields: {}", report.total_fields);
            println!("   - HTML fields: {}", report.html_fields.len());
            println!("   - Key sections: {}", report.key_sections.len());

            if args.summary {
                println!("\n{}", report.render_summary());
            }

            // Generate output path
            let output_path = if let Some(output) = &args.output {
                output.clone()
            } else {
                let input_name = Path::new(&args.input)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                let extension = match args.output_format.as_str() {
                    "table" => "csv",
                    "summary" => "txt",
                    _ => "json",
                };
                format!("{input_name}_labelscope.{extension}")
            };

            save_report(&report, &output_path, &args.output_format)?;
        }
        Err(e) => {
            eprintln!("❌ Analysis failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>         Load custom config file (YAML)");
    println!("  --input <path>          Label JSON file to analyze");
    println!("  --output <path>         Output file path (auto-generated if not specified)");
    println!("  --output-format <fmt>   Output format: report, table, or summary");
    println!("  --summary               Print the textual summary to stdout");
    println!("  --skip-cache            Force fresh analysis, bypassing the report cache");
    println!("  --cache-dir <path>      Cache directory (default: ./cache)");

    println!("\n📄 Output Formats:");
    println!("  report   - Full structured report as JSON (default)");
    println!("  table    - Per-field summary as CSV");
    println!("  summary  - Human-readable text summary");

    println!("\n⚙️  Config keys (all optional, YAML):");
    println!("  sample_limit            Retained samples per field (default 3)");
    println!("  sample_preview_chars    Sample truncation length (default 100)");
    println!("  markup_preview_chars    HTML text preview length (default 200)");
    println!("  key_section_keywords    Key-section path keywords");
    println!("  section_code_attr       Section-code attribute name");

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -i labels.json");
    println!("  cargo run -- -i labels.json -f table -o fields.csv");
    println!("  cargo run -- -i labels.json -c config.yaml --summary");
}

fn save_report(report: &Report, output_path: &str, format: &str) -> Result<()> {
    report.save_with_format(output_path, format)?;

    match format {
        "table" => println!("💾 Field summary table saved to: {}", output_path),
        "summary" => println!("💾 Text summary saved to: {}", output_path),
        "report" => println!("💾 Full report saved to: {}", output_path),
        _ => {
            println!("⚠️  Unknown output format '{}', using default report format", format);
            println!("💾 Full report saved to: {}", output_path);
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use huffpack::config::{ToolConfig, DEFAULT_CONFIG_FILE};
use huffpack::metrics::Report;
use huffpack::session::Session;

#[derive(Parser)]
#[command(name = "huffpack")]
#[command(about = "Huffman file compression")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, help = "Config file path")]
    config: Option<String>,

    #[arg(long, help = "Replace existing output files (overrides config)")]
    overwrite: bool,

    #[arg(long, help = "Engine debug level, 1 for summaries, 4 for code tables (overrides config)")]
    debug: Option<u8>,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compress a file
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a compressed file
    Decompress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Round-trip a file in memory and compare digests
    Verify {
        input: PathBuf,
    },
    /// Print the code tree stored in a compressed file
    Inspect {
        input: PathBuf,
    },
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::GenerateConfig { output } = &cli.command {
        ToolConfig::default().save(output)?;
        if cli.json {
            println!("{}", serde_json::json!({"success": true, "config_file": output}));
        } else {
            println!("Wrote default configuration to {}", output);
        }
        return Ok(());
    }

    let mut config = ToolConfig::load_or_create(cli.config.as_deref())?;

    // Override config with CLI args if provided
    if cli.overwrite {
        config.overwrite = true;
    }
    if let Some(level) = cli.debug {
        config.debug_level = level;
    }

    let filter = if cli.verbose {
        EnvFilter::new("huffpack=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    info!("Loaded configuration: {:?}", config);

    let session = Session::new(config);

    match cli.command {
        Commands::Compress { input, output } => {
            match session.compress_file(&input, output.as_deref()) {
                Ok((dest, stats)) => {
                    let report = Report::new("compress", input.display().to_string(), dest.display().to_string(), stats);
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!("Compressed {} -> {}", report.input, report.output);
                        println!("   {} bytes -> {} bytes ({:.1}%)", report.stats.input_bytes, report.stats.output_bytes, report.ratio * 100.0);
                        println!("   Header: {} bits, payload: {} bits", report.stats.header_bits, report.stats.payload_bits);
                        println!("   Leaves: {}, longest code: {} bits", report.stats.leaves, report.stats.max_code_len);
                    }
                }
                Err(e) => {
                    if cli.json {
                        println!("{}", serde_json::json!({"error": e.to_string()}));
                    } else {
                        eprintln!("Compression failed: {}", e);
                    }
                    return Err(e);
                }
            }
        }
        Commands::Decompress { input, output } => {
            match session.decompress_file(&input, output.as_deref()) {
                Ok((dest, stats)) => {
                    let report = Report::new("decompress", input.display().to_string(), dest.display().to_string(), stats);
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!("Decompressed {} -> {}", report.input, report.output);
                        println!("   {} bytes -> {} bytes", report.stats.input_bytes, report.stats.output_bytes);
                    }
                }
                Err(e) => {
                    if cli.json {
                        println!("{}", serde_json::json!({"error": e.to_string()}));
                    } else {
                        eprintln!("Decompression failed: {}", e);
                    }
                    return Err(e);
                }
            }
        }
        Commands::Verify { input } => {
            let verification = session.verify_file(&input)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&verification)?);
            } else {
                println!("Verifying {}", input.display());
                println!("   Original: {}", verification.original_hash);
                println!("   Restored: {}", verification.restored_hash);
                println!("   Compressed size: {} bytes", verification.compressed.output_bytes);
                if verification.hash_match {
                    println!("Round trip PASSED");
                } else {
                    println!("Round trip FAILED");
                }
            }
            if !verification.hash_match {
                anyhow::bail!("round trip of {} does not reproduce the input", input.display());
            }
        }
        Commands::Inspect { input } => {
            let inspection = session.inspect_file(&input)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&inspection)?);
            } else {
                println!("Tree: {} leaves, depth {}", inspection.leaves, inspection.depth);
                print!("{}", inspection.outline);
                println!("Codes:");
                for (symbol, code) in &inspection.codes {
                    println!("   {:<16} {}", symbol, code);
                }
            }
        }
        Commands::GenerateConfig { .. } => {}
    }

    Ok(())
}

mod cli;

use frametrim::batch::{self, BatchOptions, FfmpegTrimmer};
use frametrim::config;
use frametrim_av::{probe::try_probe_frame_rate_with, tools};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "frametrim=debug,frametrim_av=debug".to_string()
        } else {
            "frametrim=info,frametrim_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Trim {
            manifest,
            output_dir,
            dry_run,
        } => trim(cli.config.as_deref(), manifest, output_dir, dry_run),
        Commands::Probe { file } => probe_file(&file, cli.config.as_deref()),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("frametrim {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn trim(
    config_path: Option<&Path>,
    manifest: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let manifest = manifest.unwrap_or_else(|| config.batch.manifest.clone());
    let options = BatchOptions {
        output_dir: output_dir.unwrap_or_else(|| config.batch.output_dir.clone()),
        output_prefix: config.batch.output_prefix.clone(),
    };

    tracing::debug!("Manifest: {:?}, output: {:?}", manifest, options.output_dir);

    let mut trimmer = FfmpegTrimmer::new(config.trim_settings()).dry_run(dry_run);

    // Row and clip failures are absorbed by run_batch and exit 0. A missing
    // or undecodable manifest comes back as an error and exits non-zero.
    let summary = batch::run_batch(&manifest, &options, &mut trimmer)?;

    println!("\n--- Batch Complete ---");
    println!(
        "Rows: {} processed, {} skipped",
        summary.rows, summary.rows_skipped
    );
    println!(
        "Trim sets: {} ({} invalid frame pairs skipped)",
        summary.trim_sets, summary.invalid_pairs
    );
    if dry_run {
        println!("[DRY RUN] {} clips planned", summary.clips_planned);
    } else {
        println!(
            "Clips: {} succeeded, {} failed",
            summary.clips_succeeded, summary.clips_failed
        );
    }

    Ok(())
}

fn probe_file(file: &Path, config_path: Option<&Path>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let settings = config.trim_settings();

    println!("File: {}", file.display());
    match try_probe_frame_rate_with(&settings.ffprobe, file)? {
        Some(rate) => println!("Frame rate: {:.3} fps (from {})", rate.fps, rate.source),
        None => println!(
            "Frame rate: unknown (trimming would assume {} fps)",
            settings.default_fps
        ),
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tools = tools::check_tools(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    );
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg or set [tools] paths in the config.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Manifest: {}", config.batch.manifest.display());
    println!("  Output dir: {}", config.batch.output_dir.display());
    println!("  Output prefix: {}", config.batch.output_prefix);
    println!("  Default FPS: {}", config.batch.default_fps);
    println!(
        "  Video: {} (crf {})",
        config.encode.video_codec, config.encode.crf
    );
    println!(
        "  Audio: {} @ {}",
        config.encode.audio_codec, config.encode.audio_bitrate
    );

    Ok(())
}

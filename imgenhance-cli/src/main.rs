use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use std::path::PathBuf;

use imgenhance::{DirectorySink, EnhanceConfig, Enhancement, FileSource, PngCompression};

#[derive(Parser)]
#[command(name = "imgenhance-cli")]
#[command(about = "Apply one of five fixed enhancements to a JPEG/PNG image", long_about = None)]
#[command(version)]
struct Args {
    /// Input image (JPEG or PNG)
    #[arg(value_name = "INPUT", required_unless_present = "list")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Enhancement to apply, defaults to the saved configuration
    #[arg(short, long, value_enum)]
    enhancement: Option<EnhancementArg>,

    /// PNG compression level
    #[arg(long, value_enum)]
    png_compression: Option<PngCompressionArg>,

    /// Also write the original and enhanced image side by side
    #[arg(long, default_value_t)]
    side_by_side: bool,

    /// Skip the side-by-side image even if the saved configuration asks for it
    #[arg(long, default_value_t, conflicts_with = "side_by_side")]
    no_side_by_side: bool,

    /// Remember the enhancement and compression for later runs
    #[arg(long, default_value_t)]
    save_config: bool,

    /// List the available enhancements and exit
    #[arg(long, default_value_t)]
    list: bool,

    /// Verbose output
    #[arg(short, long, default_value_t)]
    verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, default_value_t)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum EnhancementArg {
    BilateralFiltering,
    UnsharpMasking,
    SaturationEnhancement,
    GammaCorrection,
    EdgeEnhancement,
}

impl From<EnhancementArg> for Enhancement {
    fn from(arg: EnhancementArg) -> Self {
        match arg {
            EnhancementArg::BilateralFiltering => Enhancement::BilateralFiltering,
            EnhancementArg::UnsharpMasking => Enhancement::UnsharpMasking,
            EnhancementArg::SaturationEnhancement => Enhancement::SaturationEnhancement,
            EnhancementArg::GammaCorrection => Enhancement::GammaCorrection,
            EnhancementArg::EdgeEnhancement => Enhancement::EdgeEnhancement,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PngCompressionArg {
    Fast,
    Default,
    Best,
}

impl From<PngCompressionArg> for PngCompression {
    fn from(arg: PngCompressionArg) -> Self {
        match arg {
            PngCompressionArg::Fast => PngCompression::Fast,
            PngCompressionArg::Default => PngCompression::Default,
            PngCompressionArg::Best => PngCompression::Best,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    setup_logging(args.verbose, args.quiet);

    if args.list {
        for enhancement in Enhancement::iter() {
            println!("{:<24} {}", enhancement.slug(), enhancement.label());
        }
        return Ok(());
    }

    let input = args
        .input
        .clone()
        .context("An input image is required")?;

    // Validate input file
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    // Create output directory if it doesn't exist
    if !args.output_dir.exists() {
        std::fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;
    }

    let config = build_config(&args, EnhanceConfig::load().unwrap_or_default());

    if args.save_config && config.save().is_none() {
        log::warn!("Could not save configuration");
    }

    let source = FileSource::new(input).context("Unsupported input image")?;
    let mut sink = DirectorySink::new(&args.output_dir);

    let processed = imgenhance::session::run(&source, &mut sink, &config)
        .with_context(|| format!("Failed to apply {}", config.enhancement))?;

    if !args.quiet {
        let (width, height) = processed.dimensions;
        log::info!("Done: {} ({width}x{height})", processed.path.display());
        if let Some(comparison) = &processed.comparison {
            log::info!("Comparison: {}", comparison.display());
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Flags override the saved configuration
fn build_config(args: &Args, saved: EnhanceConfig) -> EnhanceConfig {
    EnhanceConfig {
        enhancement: args
            .enhancement
            .map(Into::into)
            .unwrap_or(saved.enhancement),
        png_compression: args
            .png_compression
            .map(Into::into)
            .unwrap_or(saved.png_compression),
        side_by_side: if args.side_by_side {
            true
        } else if args.no_side_by_side {
            false
        } else {
            saved.side_by_side
        },
    }
}

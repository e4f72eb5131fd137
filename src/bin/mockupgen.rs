//! CLI for mockupgen - edit an image with a text prompt.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mockupgen::{
    GeminiModel, GenerationResult, GeneratorClient, GeneratorConfig, ImageFormat, ImageResource,
    MockupError, Pipeline,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// File stem the result is written to when `--output` is not given.
const DEFAULT_OUTPUT_STEM: &str = "generated-mockup";

#[derive(Parser)]
#[command(name = "mockupgen")]
#[command(about = "Upload a logo, describe the mockup, and let Gemini create it")]
#[command(version)]
struct Cli {
    /// Image to edit (PNG, JPEG, GIF or WebP)
    input: PathBuf,

    /// Instruction describing the edit, e.g. "Place this logo on a black t-shirt"
    prompt: String,

    /// Where to write the generated image [default: generated-mockup.<ext>]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model to use
    #[arg(short, long, value_enum, default_value = "nano-banana")]
    model: ModelArg,

    /// Declared media type of the input, overriding detection
    #[arg(long)]
    mime_type: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    NanoBanana,
    NanoBananaPro,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::NanoBanana => GeminiModel::NanoBanana,
            ModelArg::NanoBananaPro => GeminiModel::NanoBananaPro,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(err) if json => {
            let result = serde_json::json!({
                "success": false,
                "error": format!("{err:#}"),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
            std::process::exit(1);
        }
        Err(err) => Err(err),
    }
}

fn validate_args(cli: &Cli) -> anyhow::Result<()> {
    if cli.prompt.trim().is_empty() {
        anyhow::bail!("Please provide a prompt describing the mockup");
    }
    if !cli.input.is_file() {
        anyhow::bail!("Input image not found: {}", cli.input.display());
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    validate_args(&cli)?;

    let config = GeneratorConfig {
        model: cli.model.into(),
        ..GeneratorConfig::from_env()
    };
    // Fail fast with a clear message before the image is read.
    if config.api_key.is_none() {
        return Err(MockupError::MissingCredential.into());
    }

    let client = GeneratorClient::builder().config(config).build()?;
    let pipeline = Pipeline::new(client);

    let resource = select_resource(&cli.input, cli.mime_type).await;
    let source = resource.path().unwrap_or(cli.input.as_path()).display().to_string();

    let start = Instant::now();
    let result = pipeline
        .generate(&resource, &cli.prompt)
        .await
        .with_context(|| format!("failed to generate mockup from {source}"))?;
    let duration_ms = start.elapsed().as_millis() as u64;

    let output = cli.output.unwrap_or_else(|| default_output(result.mime_type()));
    let size = result
        .save(&output)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    report(&output, &result, size, pipeline.client().model(), duration_ms, cli.json)
}

/// Builds the resource for `input`, honouring an explicit `--mime-type`.
async fn select_resource(input: &Path, mime_type: Option<String>) -> ImageResource {
    match mime_type {
        Some(mime) => ImageResource::from_path_with_mime(input, mime),
        None => ImageResource::from_path(input).await,
    }
}

/// Default output file, with the extension matching the returned media type.
fn default_output(mime_type: &str) -> PathBuf {
    let format = ImageFormat::from_mime_type(mime_type).unwrap_or_default();
    PathBuf::from(format!("{DEFAULT_OUTPUT_STEM}.{}", format.extension()))
}

fn report(
    output: &Path,
    result: &GenerationResult,
    size: usize,
    model: GeminiModel,
    duration_ms: u64,
    json_output: bool,
) -> anyhow::Result<()> {
    if json_output {
        let summary = serde_json::json!({
            "success": true,
            "output": output.display().to_string(),
            "size_bytes": size,
            "mime_type": result.mime_type(),
            "model": model.as_str(),
            "duration_ms": duration_ms,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Generated mockup: {} ({} bytes) via {}",
            output.display(),
            size,
            model
        );
        println!("Duration: {}ms", duration_ms);
    }
    Ok(())
}

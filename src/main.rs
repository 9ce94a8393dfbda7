use clap::Parser;
use parallel_images::{
    logger::{self, LogLevel, LoggerConfig},
    BatchImageOrchestrator, GeneratorConfig, IdStrategy, ImageQuality, ImageSize,
};
use std::path::PathBuf;

const DEMO_PROMPTS: [&str; 3] = [
    "A cute kitten playing with a ball of yarn",
    "A tiny frog sitting on a lily pad",
    "A whimsical treehouse in a magical forest",
];

/// Generate a batch of images concurrently and save them to disk.
///
/// Partial failures are logged and do not change the exit code.
#[derive(Parser, Debug)]
#[command(name = "parallel-images", version)]
struct Cli {
    /// Prompts to render; a small demo set is used when none are given
    prompts: Vec<String>,

    /// Directory the images are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// 1024x1024, 1536x1024, 1024x1536 or auto
    #[arg(short, long)]
    size: Option<ImageSize>,

    /// low, medium or high
    #[arg(short, long)]
    quality: Option<ImageQuality>,

    /// Image model name
    #[arg(long)]
    model: Option<String>,

    /// API key; falls back to OPENAI_API_KEY
    #[arg(long)]
    api_key: Option<String>,

    /// uuid or timestamp file names
    #[arg(long)]
    id_strategy: Option<IdStrategy>,

    /// Issue requests one after another instead of all at once
    #[arg(long)]
    sequential: bool,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn apply(&self, mut config: GeneratorConfig) -> GeneratorConfig {
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(size) = self.size {
            config = config.with_size(size);
        }
        if let Some(quality) = self.quality {
            config = config.with_quality(quality);
        }
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }
        if let Some(strategy) = self.id_strategy {
            config = config.with_id_strategy(strategy);
        }
        config
    }

    fn overrides(&self, key: &str) -> bool {
        match key {
            "IMAGE_OUTPUT_DIR" => self.output_dir.is_some(),
            "IMAGE_SIZE" => self.size.is_some(),
            "IMAGE_QUALITY" => self.quality.is_some(),
            "OPENAI_IMAGE_MODEL" => self.model.is_some(),
            "OPENAI_API_KEY" => self.api_key.is_some(),
            "IMAGE_ID_STRATEGY" => self.id_strategy.is_some(),
            _ => false,
        }
    }

    /// Wraps `base` so variables a flag already overrides are never read, and
    /// an invalid value there cannot fail startup.
    fn env_lookup<'a, F>(&'a self, base: F) -> impl Fn(&str) -> Option<String> + 'a
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        move |key: &str| {
            if self.overrides(key) {
                None
            } else {
                base(key)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(
        LoggerConfig::new()
            .with_level(cli.log_level)
            .with_json_output(cli.json_logs),
    )?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let env = cli.env_lookup(|key| std::env::var(key).ok());
    let config = cli.apply(GeneratorConfig::from_lookup(env)?);
    logger::log_config_info(&config);

    let generator = match BatchImageOrchestrator::from_config(&config) {
        Ok(generator) => generator,
        Err(e) => {
            log::error!("❌ Failed to initialize image generator: {}", e);
            return Err(e.into());
        }
    };

    let prompts: Vec<String> = if cli.prompts.is_empty() {
        DEMO_PROMPTS.iter().map(|p| p.to_string()).collect()
    } else {
        cli.prompts.clone()
    };

    let report = if cli.sequential {
        generator
            .generate_sequential(
                &prompts,
                generator.default_size(),
                generator.default_quality(),
            )
            .await
    } else {
        generator.generate_with_defaults(&prompts).await
    };

    for (index, image) in report.stored_images().into_iter().enumerate() {
        if let Some(image) = image {
            println!(
                "Generated image for '{}': {}",
                prompts[index],
                image.path.display()
            );
        }
    }
    println!("{}", report.summary_line());

    Ok(())
}

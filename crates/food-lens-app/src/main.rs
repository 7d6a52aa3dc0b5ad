#![warn(missing_docs)]
//! # food-lens binary
//!
//! Terminal shell over the `food-lens` controller and API client.
//!
//! ```bash
//! food-lens analyze lunch.jpg dinner.png
//! food-lens capture --frames 2
//! food-lens --base-url http://127.0.0.1:9000 health
//! food-lens chat "is rice a good post-run meal?"
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use food_lens_api::ApiClient;
use food_lens_app::{
    AppConfig, AppError, CaptureController, SystemClock, app_version, build_api_client,
    init_tracing,
};
use food_lens_capture::SyntheticCamera;
use food_lens_core::{MediaBlob, Nutrition};
use food_lens_ui::{UiState, render_outcome};
use tracing::debug;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Parser)]
#[command(
    name = "food-lens",
    about = "Food recognition and nutrition analysis client",
    version = food_lens_app::APP_VERSION
)]
struct Cli {
    /// Backend base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse image files as if uploaded one after another
    Analyze {
        /// Image files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Open the built-in test camera and analyse captured frames
    Capture {
        /// Number of frames to capture
        #[arg(long, default_value_t = 1)]
        frames: u32,
    },
    /// Ask the backend for nutrition advice on explicit values
    Advice {
        /// Calories, kcal
        #[arg(long)]
        calories: f64,
        /// Protein, grams
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        /// Carbohydrates, grams
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,
        /// Fat, grams
        #[arg(long, default_value_t = 0.0)]
        fat: f64,
    },
    /// Send one message to the nutrition assistant
    Chat {
        /// Message text
        message: String,
    },
    /// Probe backend health
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("food-lens: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let mut config = AppConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    init_tracing(&config.log_filter)?;
    debug!(
        stage = "startup",
        action = "config",
        version = app_version(),
        base_url = %config.api_base_url,
        timeout_ms = config.api_timeout.as_millis() as u64,
        "configuration loaded"
    );

    let client = Arc::new(build_api_client(&config)?);
    match cli.command {
        Command::Analyze { paths } => analyze(client, &paths).await,
        Command::Capture { frames } => capture(client, frames).await,
        Command::Advice {
            calories,
            protein,
            carbs,
            fat,
        } => {
            let nutrition = Nutrition {
                calories,
                protein,
                carbs,
                fat,
            };
            let advice = client.get_nutrition_advice(&nutrition).await;
            println!("{}", advice.advice);
            for recommendation in advice.recommendations {
                println!("  - {recommendation}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Chat { message } => {
            let reply = client.chat_with_ai(&message, None).await;
            println!("{}", reply.response);
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => health(&client).await,
    }
}

async fn analyze(client: Arc<ApiClient>, paths: &[PathBuf]) -> Result<ExitCode, AppError> {
    let mut controller = CaptureController::new(
        Arc::new(SyntheticCamera::new()),
        client,
        Arc::new(SystemClock),
    );

    let mut rejected = 0usize;
    for path in paths {
        let blob = read_media(path)?;
        let accepted = controller.handle_file_upload(blob).await.is_some();
        if !accepted {
            rejected += 1;
        }
        println!(
            "{}",
            render_outcome(&path.display().to_string(), accepted, controller.ui())
        );
    }
    print_history(controller.ui());

    Ok(if rejected == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn capture(client: Arc<ApiClient>, frames: u32) -> Result<ExitCode, AppError> {
    let mut controller = CaptureController::new(
        Arc::new(SyntheticCamera::new()),
        client,
        Arc::new(SystemClock),
    );

    controller.toggle_camera();
    if !controller.camera_active() {
        print_toasts(controller.ui());
        return Ok(ExitCode::FAILURE);
    }

    for index in 1..=frames {
        if controller.capture_image().await.is_none() {
            break;
        }
        println!(
            "{}",
            render_outcome(&format!("frame {index}"), true, controller.ui())
        );
    }
    controller.close_camera();
    print_history(controller.ui());
    print_toasts(controller.ui());
    Ok(ExitCode::SUCCESS)
}

async fn health(client: &ApiClient) -> Result<ExitCode, AppError> {
    if client.health_check().await {
        println!("backend {} is healthy", client.base_url());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("backend {} is unreachable", client.base_url());
        Ok(ExitCode::FAILURE)
    }
}

fn read_media(path: &Path) -> Result<MediaBlob, AppError> {
    let bytes = std::fs::read(path).map_err(|source| AppError::Input {
        path: path.display().to_string(),
        source,
    })?;
    let mime_type = image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE);

    let blob = MediaBlob::new(mime_type, bytes).map_err(|error| AppError::Input {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, error),
    })?;
    Ok(match path.file_name() {
        Some(name) => blob.with_file_name(name.to_string_lossy()),
        None => blob,
    })
}

fn print_history(ui: &UiState) {
    println!("History");
    for item in &ui.history {
        println!("  {}  {:>9}  {}", item.timestamp, item.calories, item.foods);
    }
}

fn print_toasts(ui: &UiState) {
    for toast in ui.toasts.visible() {
        println!("[{:?}] {}", toast.kind, toast.text);
    }
}

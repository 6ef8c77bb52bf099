// Main entry point
mod interfaces;

use clap::Parser;
use colored::Colorize;
use interfaces::cli::Cli;
use kb_translate::application::models::{self, ModelStatus};
use kb_translate::infrastructure::config::{self, load_config, Logging};
use kb_translate::presentation::theme::Theme;
use kb_translate::{AppState, Outcome, Translation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            eprintln!("\nInterrupted, shutting down...");
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            let config_path_clone = config_path.clone();
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor)
                    .arg(&config_path_clone)
                    .status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }

    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);
    let state = AppState::new(config)?;

    if cli.status {
        let status = models::model_status(&state).await?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            print_status(&status, &theme);
        }
        return Ok(());
    }
    if cli.delete_model {
        if models::delete_model(&state).await? {
            println!("Model deleted.");
        } else {
            println!("No model installed.");
        }
        return Ok(());
    }

    if cli.missing_text() {
        eprintln!("{}", "Please provide text to translate".red());
        std::process::exit(1);
    }

    // Everything below needs the model, so start the download first
    // unless told not to. Ctrl-C abandons a download in progress.
    if cli.wants_download() {
        tokio::select! {
            result = models::download_model(&state) => {
                if let Err(e) = result {
                    if cli.download {
                        return Err(e.into());
                    }
                    eprintln!("{}", (theme.warn)(&format!("Model unavailable: {}", e)));
                }
            }
            _ = shutdown_rx => {
                eprintln!("Download interrupted");
                return Ok(());
            }
        }
    }
    if cli.download {
        println!("Model ready for {}.", state.manager().options().pair_id());
        return Ok(());
    }

    let text = cli.text.join(" ");
    let result = state.manager().translate(&text).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_translation(&result, &theme);
    }

    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn print_translation(result: &Translation, theme: &Theme) {
    println!("{}", (theme.text)(&result.text));
    let note = match result.outcome {
        Outcome::Translated | Outcome::Empty => return,
        Outcome::NotReady => "[original: model not ready]",
        Outcome::Fallback => "[original: translation failed]",
    };
    eprintln!("{}", (theme.warn)(note));
}

fn print_status(status: &ModelStatus, theme: &Theme) {
    println!("{}", (theme.title)("kbt Status"));
    println!("{}", (theme.muted)(&"━".repeat(40)));

    let row = |label: &str, value: String| {
        println!("{} {}", (theme.label)(&format!("{:<14}", label)), value);
    };

    row("Language pair:", status.pair.pair_id());
    row("Connectivity:", status.connectivity.to_string());
    row("Model dir:", status.model_dir.display().to_string());
    match &status.manifest {
        Some(manifest) if status.installed => {
            row(
                "Model:",
                format!(
                    "installed {} ({} bytes)",
                    manifest.installed_at.format("%Y-%m-%d %H:%M"),
                    manifest.archive_size
                ),
            );
            row("SHA-256:", (theme.muted)(&manifest.sha256));
        }
        _ => row("Model:", (theme.warn)("not installed")),
    }
    row(
        "Config:",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string()),
    );
    if let Some(err) = &status.last_error {
        row("Last error:", (theme.warn)(err));
    }
}

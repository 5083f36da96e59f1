mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use console::{ConsoleIndicator, ConsoleToasts};
use murmur_core::{
    AppContext, CpalCapture, JsonRecordingsDb, Ports, RecordingId, Settings, SystemTextOutput,
    ToggleOutcome, TranscriptionProvider,
};

#[derive(Parser)]
#[command(name = "murmur", about = "Voice recorder with cloud transcription", version)]
struct Cli {
    /// Print verbose diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record from the microphone, then transcribe
    Record,
    /// List available audio input devices
    Devices,
    /// List stored recordings
    List,
    /// Transcribe a stored recording
    Transcribe {
        /// Recording id (see `murmur list`)
        id: String,
    },
    /// Delete stored recordings
    Delete {
        /// Recording ids to delete
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Export a recording's audio as a WAV file
    Export {
        id: String,
        /// Destination path
        path: PathBuf,
    },
    /// Copy a recording's transcript to the clipboard
    Copy { id: String },
    /// Show or change settings
    Config {
        /// Transcription provider: openai, groq, faster-whisper-server
        #[arg(long)]
        provider: Option<String>,
        /// API key for the selected provider
        #[arg(long)]
        api_key: Option<String>,
        /// Language hint (e.g. "en"), or "auto" to clear
        #[arg(long)]
        language: Option<String>,
        /// Recording device id, or "default" to clear
        #[arg(long)]
        device: Option<String>,
        /// Keep the capture stream open between recordings
        #[arg(long)]
        faster_rerecord: Option<bool>,
        /// Copy transcripts to the clipboard on completion
        #[arg(long)]
        copy_to_clipboard: Option<bool>,
        /// Type transcripts at the cursor on completion
        #[arg(long)]
        paste_on_success: Option<bool>,
        /// Base URL of a self-hosted faster-whisper-server
        #[arg(long)]
        server_url: Option<String>,
        /// Model requested from faster-whisper-server
        #[arg(long)]
        server_model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    murmur_core::set_verbose(cli.verbose);

    match cli.command {
        Command::Config {
            provider,
            api_key,
            language,
            device,
            faster_rerecord,
            copy_to_clipboard,
            paste_on_success,
            server_url,
            server_model,
        } => {
            return configure(ConfigArgs {
                provider,
                api_key,
                language,
                device,
                faster_rerecord,
                copy_to_clipboard,
                paste_on_success,
                server_url,
                server_model,
            });
        }
        command => {
            let ctx = build_context().await?;
            run(&ctx, command).await?;
            ctx.shutdown().await;
        }
    }
    Ok(())
}

async fn build_context() -> Result<AppContext> {
    let db = JsonRecordingsDb::at_default_location()?;
    AppContext::new(
        Settings::load(),
        Ports {
            capture: Arc::new(CpalCapture),
            db: Arc::new(db),
            output: Arc::new(SystemTextOutput),
            toasts: Arc::new(ConsoleToasts),
            indicator: Arc::new(ConsoleIndicator),
        },
    )
    .await
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Record => record(ctx).await,
        Command::Devices => {
            for device in ctx.enumerate_devices().await? {
                let marker = if device.is_default { " (default)" } else { "" };
                println!("{}{marker}", device.label);
            }
            Ok(())
        }
        Command::List => {
            let recordings = ctx.recordings();
            if recordings.is_empty() {
                println!("No recordings yet. Try `murmur record`.");
                return Ok(());
            }
            for r in recordings {
                println!(
                    "{}  {}  {}  {}",
                    r.id,
                    r.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    r.transcription_status,
                    preview(&r.transcribed_text),
                );
            }
            Ok(())
        }
        Command::Transcribe { id } => {
            ctx.transcribe(&RecordingId::from_raw(id)).await?;
            Ok(())
        }
        Command::Delete { ids } => {
            let ids: Vec<RecordingId> = ids.into_iter().map(RecordingId::from_raw).collect();
            ctx.delete_recordings(&ids).await
        }
        Command::Export { id, path } => {
            let id = RecordingId::from_raw(id);
            ctx.export_recording(&id, &path).await?;
            println!("Exported {} to {}", id, path.display());
            Ok(())
        }
        Command::Copy { id } => {
            ctx.copy_recording_text(&RecordingId::from_raw(id)).await?;
            Ok(())
        }
        Command::Config { .. } => unreachable!("handled before context construction"),
    }
}

/// Interactive recording loop: Enter stops and transcribes, `c` cancels.
async fn record(ctx: &AppContext) -> Result<()> {
    ctx.toggle_recording().await?;
    println!("Recording. Press Enter to stop, or type 'c' + Enter to cancel.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let cancelled = matches!(lines.next_line().await?, Some(line) if line.trim() == "c");

    if cancelled {
        ctx.cancel_recording().await?;
        return Ok(());
    }

    match ctx.toggle_recording().await? {
        ToggleOutcome::Stopped(id) => {
            if let Some(recording) = ctx.get_recording(&id) {
                if !recording.transcribed_text.is_empty() {
                    println!("{}", recording.transcribed_text);
                }
            }
        }
        ToggleOutcome::Started => unreachable!("second toggle cannot start a session"),
    }
    Ok(())
}

struct ConfigArgs {
    provider: Option<String>,
    api_key: Option<String>,
    language: Option<String>,
    device: Option<String>,
    faster_rerecord: Option<bool>,
    copy_to_clipboard: Option<bool>,
    paste_on_success: Option<bool>,
    server_url: Option<String>,
    server_model: Option<String>,
}

fn configure(args: ConfigArgs) -> Result<()> {
    let mut settings = Settings::load();
    let mut changed = false;

    if let Some(provider) = args.provider {
        settings.provider = provider
            .parse::<TranscriptionProvider>()
            .map_err(|e| anyhow::anyhow!(e))?;
        changed = true;
    }
    if let Some(key) = args.api_key {
        if settings.provider.requires_api_key() {
            settings
                .api_keys
                .insert(settings.provider.as_str().to_string(), key);
            changed = true;
        } else {
            bail!(
                "{} does not use an API key",
                settings.provider.display_name()
            );
        }
    }
    if let Some(language) = args.language {
        settings.language = (language != "auto").then_some(language);
        changed = true;
    }
    if let Some(device) = args.device {
        settings.recording_device = (device != "default").then_some(device);
        changed = true;
    }
    if let Some(v) = args.faster_rerecord {
        settings.faster_rerecord = v;
        changed = true;
    }
    if let Some(v) = args.copy_to_clipboard {
        settings.copy_to_clipboard = v;
        changed = true;
    }
    if let Some(v) = args.paste_on_success {
        settings.paste_on_success = v;
        changed = true;
    }
    if let Some(url) = args.server_url {
        settings.faster_whisper_server_url = url;
        changed = true;
    }
    if let Some(model) = args.server_model {
        settings.faster_whisper_server_model = model;
        changed = true;
    }

    if changed {
        settings.save().context("Failed to save settings")?;
        println!("Settings saved.");
    } else {
        print_settings(&settings);
    }
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("provider: {}", settings.provider);
    println!(
        "language: {}",
        settings.language.as_deref().unwrap_or("auto")
    );
    println!(
        "device: {}",
        settings.recording_device.as_deref().unwrap_or("default")
    );
    println!("faster_rerecord: {}", settings.faster_rerecord);
    println!("copy_to_clipboard: {}", settings.copy_to_clipboard);
    println!("paste_on_success: {}", settings.paste_on_success);
    println!("server_url: {}", settings.faster_whisper_server_url);
    println!("server_model: {}", settings.faster_whisper_server_model);
    for provider in TranscriptionProvider::all() {
        if provider.requires_api_key() {
            let configured = settings.api_key_for(provider).is_some();
            println!(
                "{} API key: {}",
                provider.display_name(),
                if configured { "configured" } else { "not set" }
            );
        }
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 48;
    let text = text.trim().replace('\n', " ");
    if text.is_empty() {
        return "-".to_string();
    }
    if text.chars().count() <= MAX {
        return text;
    }
    let truncated: String = text.chars().take(MAX).collect();
    format!("{truncated}…")
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voice_agent::api::ApiServer;
use voice_agent::{Config, ConversationAgent, KnowledgeBase, VoiceConversation};

/// Voice Agent - ask a FAQ knowledge base out loud
#[derive(Parser)]
#[command(name = "voice-agent", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/voice-agent/config.toml)
    #[arg(short, long, env = "VOICE_AGENT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// FAQ knowledge base file (JSON, or YAML)
    #[arg(short, long, global = true)]
    knowledge_base: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one recorded question and save the spoken reply
    Chat {
        /// Input audio file (wav/m4a/mp3)
        input: PathBuf,
        /// Where to save the synthesized reply (wav)
        output: PathBuf,
        /// Whisper model name
        #[arg(long)]
        stt_model: Option<String>,
        /// Force transcription language
        #[arg(long)]
        language: Option<String>,
        /// TTS model name
        #[arg(long)]
        tts_model: Option<String>,
        /// TTS voice preset
        #[arg(long)]
        voice: Option<String>,
        /// Speech speed multiplier
        #[arg(long)]
        speed: Option<f32>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask a typed question (no speech backends)
    Ask {
        /// Question text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Run the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate the knowledge base and print its size
    CheckKb,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,voice_agent=info",
        1 => "info,voice_agent=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(kb) = cli.knowledge_base {
        config.knowledge_base = kb;
    }
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Command::Chat {
            input,
            output,
            stt_model,
            language,
            tts_model,
            voice,
            speed,
            json,
        } => {
            let voice_config = &mut config.voice;
            if let Some(model) = stt_model {
                voice_config.stt_model = model;
            }
            if language.is_some() {
                voice_config.stt_language = language;
            }
            if let Some(model) = tts_model {
                voice_config.tts_model = model;
            }
            if let Some(voice) = voice {
                voice_config.tts_voice = voice;
            }
            if let Some(speed) = speed {
                voice_config.tts_speed = speed;
            }
            chat(&config, &input, &output, json).await
        }
        Command::Ask { text } => ask(&config, &text.join(" ")),
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(&config).await
        }
        Command::CheckKb => check_kb(&config),
    }
}

/// One spoken exchange from a file
async fn chat(
    config: &Config,
    input: &std::path::Path,
    output: &std::path::Path,
    json: bool,
) -> anyhow::Result<()> {
    let mut conversation = VoiceConversation::from_config(config)?;
    let payload = conversation.handle_audio_file(input).await?;
    VoiceConversation::save_audio_response(&payload, output).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Transcript:\n{}", payload.transcript);
    println!("\nAgent response:\n{}", payload.response_text);
    println!("\nSaved synthesized speech to {}", output.display());
    Ok(())
}

/// Text-only question against the knowledge base
fn ask(config: &Config, text: &str) -> anyhow::Result<()> {
    let mut agent = ConversationAgent::builder(&config.knowledge_base)
        .similarity_threshold(config.agent.similarity_threshold)
        .system_prompt(config.agent.system_prompt.clone())
        .build()?;

    println!("{}", agent.respond(text));
    Ok(())
}

/// Run the HTTP API until interrupted
async fn serve(config: &Config) -> anyhow::Result<()> {
    // Built once up front; every request shares this conversation
    let conversation = VoiceConversation::from_config(config)?;

    tracing::info!(
        port = config.server.port,
        knowledge_base = %config.knowledge_base.display(),
        session_id = %conversation.session_id(),
        "starting voice agent server"
    );

    ApiServer::new(conversation, config.server.port).run().await?;
    Ok(())
}

/// Load the knowledge base and report what it holds
fn check_kb(config: &Config) -> anyhow::Result<()> {
    let kb = KnowledgeBase::load(&config.knowledge_base)?;
    println!(
        "{}: {} FAQ entries, {} tips",
        config.knowledge_base.display(),
        kb.faqs.len(),
        kb.tips.len()
    );
    if kb.faqs.is_empty() {
        println!("warning: no FAQ entries, every question will get the fallback reply");
    }
    Ok(())
}

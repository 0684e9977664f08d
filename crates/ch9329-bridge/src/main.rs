//! CH9329 bridge command-line entry point.
//!
//! Opens the serial link to a CH9329, performs one action, releases
//! everything and closes the port.
//!
//! # Usage
//!
//! ```text
//! ch9329-bridge [OPTIONS] <COMMAND>
//!
//! Commands:
//!   text   [TEXT]              Type text (reads stdin when TEXT is omitted)
//!   key    <NAME>              Press a special key (ENTER, F5, SHIFT…)
//!   combo  <MODIFIERS> <NAME>  Hold modifiers while pressing a key (ctrl+alt DELETE)
//!   media  <NAME>              Press a media key (VOLUME_UP, MUTE…)
//!   raw    <MODIFIER> <CODE>   Send a raw keyboard report (bytes, hex allowed)
//!   move   <DX> <DY>           Move the pointer relatively
//!   abs    <X> <Y>             Place the pointer at a screen pixel
//!   click  <BUTTON>            Click left, right or middle
//!   scroll <AMOUNT>            Turn the wheel
//!   dom    <CODE> [--key K] [--meta]
//!                              Replay a browser KeyboardEvent
//!
//! Options:
//!   --port <PATH>      Serial device               [env: CH9329_PORT]
//!   --baud <RATE>      Baud rate                   [env: CH9329_BAUD]
//!   --layout <NAME>    Target layout: us | jis     [env: CH9329_LAYOUT]
//!   --config <FILE>    Config file path            [env: CH9329_CONFIG]
//!   --json-log         Emit the log as JSON lines on stdout
//!   --dry-run          Print frames to stderr instead of opening the port
//! ```
//!
//! Values come from the config file first; flags and environment variables
//! override them.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ch9329_bridge::infrastructure::log_sink::{JsonLinesSink, TracingSink};
use ch9329_bridge::infrastructure::storage::config::{
    load_config, load_config_from, BridgeConfig, ConfigError,
};
use ch9329_bridge::infrastructure::transport::{MockOpener, MockTransport, SerialOpener};
use ch9329_bridge::{CommandSequencer, LogSink, TransportOpener};
use ch9329_core::{KeyIntent, ModifierMask, MouseButton, Packet, TargetLayout};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Drive a CH9329 USB-HID bridge chip over a serial link.
#[derive(Debug, Parser)]
#[command(name = "ch9329-bridge", version)]
struct Cli {
    /// Serial device the chip is attached to.
    #[arg(long, env = "CH9329_PORT")]
    port: Option<String>,

    /// Serial baud rate (9600 unless the chip was reconfigured).
    #[arg(long, env = "CH9329_BAUD")]
    baud: Option<u32>,

    /// Keyboard layout the target machine is set to (`us` or `jis`).
    #[arg(long, env = "CH9329_LAYOUT")]
    layout: Option<String>,

    /// Config file to read instead of the platform default.
    #[arg(long, env = "CH9329_CONFIG")]
    config: Option<PathBuf>,

    /// Write the user-facing log as JSON lines on stdout.
    #[arg(long)]
    json_log: bool,

    /// Record frames in memory and print them to stderr instead of opening
    /// the port.
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Type text.  Reads stdin when TEXT is omitted.
    Text { text: Option<String> },
    /// Press and release a special key.
    Key { name: String },
    /// Hold `+`-separated modifiers while pressing a key or character.
    Combo { modifiers: String, name: String },
    /// Press and release a media key.
    Media { name: String },
    /// Send a raw keyboard report.
    Raw {
        #[arg(value_parser = parse_byte)]
        modifier: u8,
        #[arg(value_parser = parse_byte)]
        code: u8,
    },
    /// Move the pointer relative to its position.
    #[command(allow_negative_numbers = true)]
    Move { dx: i32, dy: i32 },
    /// Place the pointer at a pixel of the configured screen.
    Abs { x: u32, y: u32 },
    /// Click a mouse button.
    Click { button: MouseButton },
    /// Turn the mouse wheel (positive scrolls up).
    #[command(allow_negative_numbers = true)]
    Scroll { amount: i32 },
    /// Replay a browser key event by its `KeyboardEvent.code`.
    Dom {
        code: String,
        /// The event's `KeyboardEvent.key` value.
        #[arg(long)]
        key: Option<String>,
        /// The event had `metaKey` set (Command on a Mac).
        #[arg(long)]
        meta: bool,
    },
}

/// Parses `0x1F`-style hex or plain decimal.
fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte '{s}': {e}"))
}

impl Cli {
    /// Loads the config file named by `--config`, or the platform default.
    fn load_config(&self) -> Result<BridgeConfig, ConfigError> {
        match &self.config {
            Some(path) => load_config_from(path),
            None => match load_config() {
                Err(ConfigError::NoPlatformConfigDir) => Ok(BridgeConfig::default()),
                other => other,
            },
        }
    }

    /// Applies flag and environment overrides on top of `config`.
    fn apply_overrides(&self, mut config: BridgeConfig) -> BridgeConfig {
        if let Some(port) = &self.port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(layout) = &self.layout {
            config.keyboard.target_layout = TargetLayout::from_name(layout);
        }
        config
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli
        .load_config()
        .context("failed to load configuration")?;
    let config = cli.apply_overrides(config);

    // RUST_LOG wins; otherwise the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let sink: Arc<dyn LogSink> = if cli.json_log {
        Arc::new(JsonLinesSink::stdout())
    } else {
        Arc::new(TracingSink)
    };

    let mut sequencer = CommandSequencer::new(sink)
        .with_layout(config.keyboard.target_layout)
        .with_pacing(config.pacing.to_pacing())
        .with_screen(config.screen.to_screen_size());

    let recorder = MockTransport::new();
    let opener: Box<dyn TransportOpener> = if cli.dry_run {
        Box::new(MockOpener::new(recorder.clone()))
    } else {
        Box::new(SerialOpener::new(
            config.serial.port.clone(),
            config.serial.baud_rate,
        ))
    };

    sequencer
        .connect(opener.as_ref())
        .await
        .with_context(|| format!("could not open {}", opener.describe()))?;

    // Ctrl+C drops the running action; `disconnect` then completes any
    // release it left pending.
    let outcome = tokio::select! {
        result = run_command(&mut sequencer, cli.command) => result,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => warn!("interrupted; releasing keys before exit"),
                Err(e) => warn!("failed to listen for Ctrl+C: {e}"),
            }
            Ok(())
        }
    };

    sequencer.disconnect().await;

    // stderr, so stdout stays pure JSON under `--json-log`.
    if cli.dry_run {
        write_frame_dump(&recorder.frames(), &mut std::io::stderr().lock())
            .context("failed to print recorded frames")?;
    }

    outcome
}

async fn run_command(sequencer: &mut CommandSequencer, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Text { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut buf)
                        .await
                        .context("failed to read text from stdin")?;
                    buf
                }
            };
            let report = sequencer.send_text(&text).await?;
            info!("typed {} characters", report.typed);
            if !report.skipped.is_empty() {
                warn!("skipped unsupported characters: {:?}", report.skipped);
            }
        }
        Command::Key { name } => sequencer.send_special_key(&name).await?,
        Command::Combo { modifiers, name } => {
            let modifier: ModifierMask = modifiers
                .parse()
                .with_context(|| format!("invalid modifiers '{modifiers}'"))?;
            sequencer.send_key_combo(modifier, &name).await?;
        }
        Command::Media { name } => sequencer.send_media_key(&name).await?,
        Command::Raw { modifier, code } => {
            sequencer
                .send_raw_keycode(ModifierMask::from_bits(modifier), code)
                .await?
        }
        Command::Move { dx, dy } => sequencer.move_mouse_relative(dx, dy).await?,
        Command::Abs { x, y } => sequencer.move_mouse_absolute(x, y).await?,
        Command::Click { button } => sequencer.click_mouse(button).await?,
        Command::Scroll { amount } => sequencer.scroll_mouse(amount).await?,
        Command::Dom { code, key, meta } => {
            match KeyIntent::from_dom_event(&code, key.as_deref(), meta) {
                Some(intent) => sequencer.send_intent(&intent).await?,
                None => warn!("no key intent for code '{code}'"),
            }
        }
    }
    Ok(())
}

/// Writes one hex line per frame.
fn write_frame_dump(frames: &[Vec<u8>], out: &mut impl Write) -> std::io::Result<()> {
    for frame in frames {
        writeln!(out, "{}", hex(frame))?;
    }
    Ok(())
}

fn hex(frame: &[u8]) -> String {
    frame
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

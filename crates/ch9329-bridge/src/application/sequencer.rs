//! CommandSequencer: turns key and mouse intents into paced frame writes.
//!
//! Every logical action is a press frame followed by the matching release
//! frame, each followed by a settle delay so the chip can emit the USB
//! report before the next command arrives.
//!
//! # Action phases (for beginners)
//!
//! ```text
//! Idle ──► PressPending ──(press written, settle)──► ReleasePending
//!   ▲                                                     │
//!   └──────────────(release written, settle)──────────────┘
//! ```
//!
//! If an action stops halfway (a write fails, or the caller drops the future
//! while it is suspended in a settle delay) the phase is left where it was.
//! The next action, or [`CommandSequencer::disconnect`], sees the non-idle
//! phase and writes the missing release first, so a key is never left held
//! down on the target machine.
//!
//! # Single writer
//!
//! Operations take `&mut self`, so one sequencer can only run one action at
//! a time.  Callers that share it across tasks wrap it in a
//! `tokio::sync::Mutex` (see [`CommandSequencer::into_shared`]).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ch9329_core::{
    KeyIntent, LayoutTable, MediaKey, ModifierMask, MouseButton, MouseButtons, Packet, ScreenSize,
    SpecialKey, TargetLayout,
};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::application::events::{LogLevel, LogRecord, LogSink};
use crate::application::transport::{Transport, TransportError, TransportOpener};

/// Delay after every frame write.
pub const DEFAULT_FRAME_SETTLE: Duration = Duration::from_millis(20);

/// Extra delay between characters of a text burst.
pub const DEFAULT_CHAR_GAP: Duration = Duration::from_millis(10);

/// Errors returned by sequencer operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The transport could not be opened.  The sequencer stays disconnected.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(#[source] TransportError),

    /// An action was requested while no channel is open.
    #[error("not connected")]
    NotConnected,

    /// A frame write was rejected.  The action is not retried.
    #[error("write failed: {0}")]
    WriteFailure(#[source] TransportError),
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Which report an in-flight action is using; decides its release frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Keyboard,
    Mouse,
    Media,
}

impl ReportKind {
    /// The frame that releases everything this report can hold.
    pub fn release(self) -> Packet {
        match self {
            ReportKind::Keyboard => Packet::keyboard_release(),
            ReportKind::Mouse => Packet::mouse_relative_release(),
            ReportKind::Media => Packet::media_key_release(),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::Keyboard => "keyboard",
            ReportKind::Mouse => "mouse",
            ReportKind::Media => "media",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionPhase {
    #[default]
    Idle,
    PressPending(ReportKind),
    ReleasePending(ReportKind),
}

/// Inter-frame delays.  Zero durations skip the sleep entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub frame_settle: Duration,
    pub char_gap: Duration,
}

impl Pacing {
    pub const fn from_millis(frame_settle_ms: u64, char_gap_ms: u64) -> Self {
        Self {
            frame_settle: Duration::from_millis(frame_settle_ms),
            char_gap: Duration::from_millis(char_gap_ms),
        }
    }

    /// No delays at all.
    pub const fn none() -> Self {
        Self::from_millis(0, 0)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            frame_settle: DEFAULT_FRAME_SETTLE,
            char_gap: DEFAULT_CHAR_GAP,
        }
    }
}

/// Outcome of [`CommandSequencer::send_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReport {
    /// Characters pressed and released.
    pub typed: usize,
    /// Characters with no entry in the active layout, in input order.
    pub skipped: Vec<char>,
}

/// A sequencer shared between tasks.
pub type SharedSequencer = Arc<Mutex<CommandSequencer>>;

// ── Sequencer ─────────────────────────────────────────────────────────────────

/// Owns the transport and the active layout table; writes every frame.
pub struct CommandSequencer {
    transport: Option<Box<dyn Transport>>,
    layout: Arc<LayoutTable>,
    sink: Arc<dyn LogSink>,
    pacing: Pacing,
    screen: ScreenSize,
    phase: ActionPhase,
}

impl CommandSequencer {
    /// Creates a disconnected sequencer with the US layout and default pacing.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            transport: None,
            layout: Arc::new(LayoutTable::build(TargetLayout::Us)),
            sink,
            pacing: Pacing::default(),
            screen: ScreenSize::default(),
            phase: ActionPhase::Idle,
        }
    }

    pub fn with_layout(mut self, target: TargetLayout) -> Self {
        self.layout = Arc::new(LayoutTable::build(target));
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Sets the target screen used to scale absolute mouse positions.
    pub fn with_screen(mut self, screen: ScreenSize) -> Self {
        self.screen = screen;
        self
    }

    pub fn into_shared(self) -> SharedSequencer {
        Arc::new(Mutex::new(self))
    }

    pub fn state(&self) -> ConnectionState {
        if self.transport.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    /// The active layout table.  Holders keep a consistent snapshot even if
    /// the layout is switched afterwards.
    pub fn layout(&self) -> Arc<LayoutTable> {
        Arc::clone(&self.layout)
    }

    pub fn target_layout(&self) -> TargetLayout {
        self.layout.target()
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    // ── Connection lifecycle ──────────────────────────────────────────────────

    /// Opens a channel through `opener`.
    ///
    /// An already-open channel is disconnected cleanly first.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TransportUnavailable`] if the open fails; the
    /// sequencer is then disconnected.
    pub async fn connect(&mut self, opener: &dyn TransportOpener) -> Result<(), SessionError> {
        if self.transport.is_some() {
            self.log(LogLevel::Info, "closing the current connection first");
            self.disconnect().await;
        }

        self.log(LogLevel::Info, format!("connecting to {}", opener.describe()));
        match opener.open().await {
            Ok(transport) => {
                self.attach(transport);
                Ok(())
            }
            Err(e) => {
                self.log(LogLevel::Error, format!("connection failed: {e}"));
                Err(SessionError::TransportUnavailable(e))
            }
        }
    }

    /// Adopts an already-open channel.
    ///
    /// A previous channel, if any, is dropped without a release flush; use
    /// [`CommandSequencer::connect`] for a clean switch.
    pub fn attach(&mut self, transport: Box<dyn Transport>) {
        let name = transport.describe();
        self.transport = Some(transport);
        self.log(LogLevel::Success, format!("connected: {name}"));
    }

    /// Releases everything and closes the channel.
    ///
    /// Completes a pending release, writes one extra all-zero keyboard
    /// report, then closes.  Failures along the way are logged and do not
    /// stop the sequence.
    pub async fn disconnect(&mut self) {
        if self.transport.is_none() {
            self.log(LogLevel::Debug, "disconnect requested while not connected");
            return;
        }

        // Write failures are recorded by `write`.
        let _ = self.recover_pending().await;
        if self.transport.is_some() {
            let _ = self.write(&Packet::keyboard_release()).await;
        }

        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                self.log(LogLevel::Error, format!("close failed: {e}"));
            }
        }
        self.phase = ActionPhase::Idle;
        self.log(LogLevel::Info, "disconnected");
    }

    /// Switches the target layout.  The new table replaces the old one
    /// wholesale; an in-progress text burst finishes on the old table.
    pub fn set_target_layout(&mut self, target: TargetLayout) {
        self.layout = Arc::new(LayoutTable::build(target));
        self.log(LogLevel::Info, format!("target layout: {target}"));
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    /// Types `text` one code point at a time.
    ///
    /// Characters missing from the active layout are logged as warnings and
    /// skipped; the rest are typed in order.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotConnected`] before anything is written, or
    /// [`SessionError::WriteFailure`] for the first rejected frame.
    pub async fn send_text(&mut self, text: &str) -> Result<TextReport, SessionError> {
        self.ensure_connected()?;

        let layout = Arc::clone(&self.layout);
        let mut report = TextReport::default();
        for ch in text.chars() {
            match layout.lookup(ch) {
                Ok(stroke) => {
                    self.press_release(ReportKind::Keyboard, Packet::key_stroke(stroke))
                        .await?;
                    report.typed += 1;
                    pause(self.pacing.char_gap).await;
                }
                Err(e) => {
                    self.log(LogLevel::Warning, format!("{e} (skipped)"));
                    report.skipped.push(ch);
                }
            }
        }
        Ok(report)
    }

    /// Presses and releases a named special key (`ENTER`, `F5`, `SHIFT`…).
    ///
    /// Unknown names are logged as warnings and nothing is sent.
    pub async fn send_special_key(&mut self, name: &str) -> Result<(), SessionError> {
        self.ensure_connected()?;

        let key = match name.parse::<SpecialKey>() {
            Ok(key) => key,
            Err(e) => {
                self.log(LogLevel::Warning, e.to_string());
                return Ok(());
            }
        };
        self.press_release(ReportKind::Keyboard, Packet::key_stroke(key.stroke()))
            .await
    }

    /// Presses and releases a named media key (`VOLUME_UP`, `MUTE`…).
    ///
    /// Unknown names are logged as warnings and nothing is sent.
    pub async fn send_media_key(&mut self, name: &str) -> Result<(), SessionError> {
        self.ensure_connected()?;

        let key = match name.parse::<MediaKey>() {
            Ok(key) => key,
            Err(e) => {
                self.log(LogLevel::Warning, e.to_string());
                return Ok(());
            }
        };
        self.press_release(ReportKind::Media, Packet::media_key_report(key.report()))
            .await
    }

    /// Presses and releases a report built from a raw modifier and usage byte.
    pub async fn send_raw_keycode(
        &mut self,
        modifier: ModifierMask,
        code: u8,
    ) -> Result<(), SessionError> {
        self.ensure_connected()?;
        self.press_release(ReportKind::Keyboard, Packet::raw_keyboard(modifier, code))
            .await
    }

    /// Holds `modifier` while pressing `key`, e.g. Ctrl+Alt+`DELETE`.
    ///
    /// `key` is a special-key name or a single character from the active
    /// layout; a character's own modifier (Shift for `A`) is added to
    /// `modifier`.  Unresolvable keys are logged as warnings.
    pub async fn send_key_combo(
        &mut self,
        modifier: ModifierMask,
        key: &str,
    ) -> Result<(), SessionError> {
        self.ensure_connected()?;

        let stroke = match key.parse::<SpecialKey>() {
            Ok(special) => Some(special.stroke()),
            Err(e) => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => match self.layout.lookup(ch) {
                        Ok(stroke) => Some(stroke),
                        Err(layout_err) => {
                            self.log(LogLevel::Warning, layout_err.to_string());
                            None
                        }
                    },
                    _ => {
                        self.log(LogLevel::Warning, e.to_string());
                        None
                    }
                }
            }
        };
        let Some(stroke) = stroke else {
            return Ok(());
        };

        let press = Packet::raw_keyboard(modifier | stroke.modifier, stroke.code.as_u8());
        self.press_release(ReportKind::Keyboard, press).await
    }

    /// Dispatches one [`KeyIntent`].
    pub async fn send_intent(&mut self, intent: &KeyIntent) -> Result<(), SessionError> {
        match intent {
            KeyIntent::Character(ch) => {
                let mut buf = [0u8; 4];
                self.send_text(ch.encode_utf8(&mut buf)).await.map(|_| ())
            }
            KeyIntent::SpecialKey(name) => self.send_special_key(name).await,
            KeyIntent::MediaKey(name) => self.send_media_key(name).await,
            KeyIntent::RawKeycode { modifier, code } => {
                self.send_raw_keycode(*modifier, *code).await
            }
        }
    }

    // ── Mouse ─────────────────────────────────────────────────────────────────

    /// Moves the pointer by `(dx, dy)`, clamped to `[-128, 127]` per axis,
    /// then sends a neutral report.
    pub async fn move_mouse_relative(&mut self, dx: i32, dy: i32) -> Result<(), SessionError> {
        self.ensure_connected()?;
        let press = Packet::mouse_relative(MouseButtons::NONE, dx, dy, 0);
        self.press_release(ReportKind::Mouse, press).await
    }

    pub async fn click_mouse(&mut self, button: MouseButton) -> Result<(), SessionError> {
        self.ensure_connected()?;
        let press = Packet::mouse_relative(button.into(), 0, 0, 0);
        self.press_release(ReportKind::Mouse, press).await
    }

    /// Scrolls by `amount` wheel steps, clamped to `[-127, 127]`.
    pub async fn scroll_mouse(&mut self, amount: i32) -> Result<(), SessionError> {
        self.ensure_connected()?;
        let press = Packet::mouse_relative(MouseButtons::NONE, 0, 0, amount);
        self.press_release(ReportKind::Mouse, press).await
    }

    /// Places the pointer at pixel `(x, y)` on the configured screen.
    ///
    /// No button is held, so this is a single frame with no release.
    pub async fn move_mouse_absolute(&mut self, x: u32, y: u32) -> Result<(), SessionError> {
        self.ensure_connected()?;
        self.recover_pending().await?;
        let packet = Packet::mouse_absolute(MouseButtons::NONE, x, y, self.screen);
        self.write(&packet).await?;
        pause(self.pacing.frame_settle).await;
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn ensure_connected(&self) -> Result<(), SessionError> {
        if self.transport.is_none() {
            self.log(LogLevel::Error, "not connected");
            return Err(SessionError::NotConnected);
        }
        Ok(())
    }

    async fn press_release(&mut self, kind: ReportKind, press: Packet) -> Result<(), SessionError> {
        self.recover_pending().await?;

        // Phase reflects the last accepted frame, even during settle delays.
        self.phase = ActionPhase::PressPending(kind);
        self.write(&press).await?;
        self.phase = ActionPhase::ReleasePending(kind);
        pause(self.pacing.frame_settle).await;
        self.write(&kind.release()).await?;
        self.phase = ActionPhase::Idle;
        pause(self.pacing.frame_settle).await;
        Ok(())
    }

    /// Writes the release for an action that stopped halfway.
    async fn recover_pending(&mut self) -> Result<(), SessionError> {
        let kind = match self.phase {
            ActionPhase::Idle => return Ok(()),
            ActionPhase::PressPending(kind) | ActionPhase::ReleasePending(kind) => kind,
        };
        self.log(
            LogLevel::Warning,
            format!("previous {kind} action was interrupted; sending its release"),
        );
        self.write(&kind.release()).await?;
        self.phase = ActionPhase::Idle;
        pause(self.pacing.frame_settle).await;
        Ok(())
    }

    /// Writes one frame.  Does not wait; callers settle after updating the
    /// phase.
    async fn write(&mut self, packet: &Packet) -> Result<(), SessionError> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(SessionError::NotConnected);
        };

        let result = transport.write_frame(packet.as_bytes()).await;
        match result {
            Ok(()) => self.log(LogLevel::Debug, format!("TX {packet}")),
            Err(TransportError::Closed) => {
                self.transport = None;
                self.log(LogLevel::Error, "connection lost: transport closed");
                return Err(SessionError::WriteFailure(TransportError::Closed));
            }
            Err(e) => {
                self.log(LogLevel::Error, format!("write failed: {e}"));
                return Err(SessionError::WriteFailure(e));
            }
        }
        Ok(())
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.sink.record(LogRecord::now(level, message));
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

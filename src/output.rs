// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Tagged progress lines in normal mode, final results only in quiet mode, JSON lines for scripting.

use serde::Serialize;
use std::io::Write;
use std::time::Instant;

use crate::deploy::Phase;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug, Clone)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

/// Right-aligned, upper-cased tag followed by the message.
pub fn tagged_line(tag: &str, message: &str) -> String {
    format!("{:>10}: {}", tag.to_uppercase(), message)
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a tagged progress line (suppressed in quiet/json mode).
    pub fn tagged(&self, tag: &str, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{}", tagged_line(tag, message));
        }
    }

    /// Tool banner printed before the first deployment.
    pub fn header(&self, version: &str, url: &str, strategy: &str) {
        match self.mode {
            OutputMode::Normal => {
                self.tagged("atroctl", &format!("version {version}"));
                self.tagged("atroctl", &format!("starting deployment to {url}"));
                self.tagged("strategy", &format!("using strategy {strategy}"));
            }
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit(JsonEvent {
                event: "start",
                message: Some(url),
                strategy: Some(strategy),
                version: Some(version),
                ..JsonEvent::default()
            }),
        }
    }

    /// Phase-level progress: start and completion markers.
    pub fn phase(&self, phase: Phase, message: &str) {
        match self.mode {
            OutputMode::Normal => self.tagged(phase.as_str(), message),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit(JsonEvent {
                event: "phase",
                phase: Some(phase.as_str()),
                message: Some(message),
                ..JsonEvent::default()
            }),
        }
    }

    /// Start marker for a single item; completed by [`Output::item_finished`].
    pub fn item_started(&self, phase: Phase, message: &str) {
        if self.mode == OutputMode::Normal {
            print!("{}", tagged_line(phase.as_str(), message));
            let _ = std::io::stdout().flush();
        }
    }

    /// Outcome marker for an item: `[OK]`, the observed status, or `[FAILED]`
    /// when no status was received.
    pub fn item_finished(&self, phase: Phase, item: &str, status: Option<u16>, accepted: bool) {
        match self.mode {
            OutputMode::Normal => match (accepted, status) {
                (true, _) => println!(" [OK]"),
                (false, Some(code)) => println!(" [{code}]"),
                (false, None) => println!(" [FAILED]"),
            },
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit(JsonEvent {
                event: if accepted { "item_ok" } else { "item_failed" },
                phase: Some(phase.as_str()),
                item: Some(item),
                status,
                ..JsonEvent::default()
            }),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{} ({:.1}s)", tagged_line("done", message), elapsed);
                } else {
                    println!("{}", tagged_line("done", message));
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => self.emit(JsonEvent {
                event: "success",
                message: Some(message),
                duration_secs: self.duration(),
                ..JsonEvent::default()
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("{}", tagged_line("error", message));
            }
            OutputMode::Json => self.emit_err(JsonEvent {
                event: "error",
                message: Some(message),
                duration_secs: self.duration(),
                ..JsonEvent::default()
            }),
        }
    }

    fn emit(&self, event: JsonEvent<'_>) {
        if let Ok(json) = serde_json::to_string(&event) {
            println!("{json}");
        }
    }

    fn emit_err(&self, event: JsonEvent<'_>) {
        if let Ok(json) = serde_json::to_string(&event) {
            eprintln!("{json}");
        }
    }
}

#[derive(Serialize, Default)]
struct JsonEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

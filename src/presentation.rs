//! Presentation boundary
//!
//! The engine knows nothing about screens. After every transition the session
//! hands a `RoundSnapshot` to a `Presenter`.

use crate::games::{MessageKind, Phase, RoundSnapshot};
use std::io::{self, Write};

pub trait Presenter {
    fn render(&mut self, snapshot: &RoundSnapshot) -> io::Result<()>;
}

/// Line-oriented terminal view. While a round climbs it rewrites one status
/// line in place; every other transition prints a full block.
pub struct TerminalPresenter<W: Write> {
    out: W,
    last_phase: Option<Phase>,
    last_message: Option<String>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_phase: None,
            last_message: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_climb(&mut self, snapshot: &RoundSnapshot) -> io::Result<()> {
        write!(
            self.out,
            "\r  {:>8.2}x   potential ${:.2}   ",
            snapshot.multiplier, snapshot.potential_win
        )?;
        self.out.flush()
    }

    fn render_block(&mut self, snapshot: &RoundSnapshot) -> io::Result<()> {
        // Finish any in-place climb line first
        if self.last_phase == Some(Phase::Playing) {
            writeln!(self.out)?;
        }

        let style = snapshot
            .phase
            .style_class()
            .map(|class| format!(" [{}]", class))
            .unwrap_or_default();
        writeln!(
            self.out,
            "Balance: ${:.2} | Bet: ${:.2} | {:.2}x{}",
            snapshot.balance, snapshot.bet, snapshot.multiplier, style
        )?;

        if !snapshot.message.is_hidden() {
            let tag = match snapshot.message.kind {
                MessageKind::Info => "info",
                MessageKind::Win => "win",
                MessageKind::Loss => "loss",
                MessageKind::Error => "error",
            };
            writeln!(self.out, "[{}] {}", tag, snapshot.message.text)?;
        }

        if snapshot.phase.is_resolved() && !snapshot.history.is_empty() {
            let items: Vec<String> = snapshot
                .history
                .iter()
                .map(|entry| {
                    format!(
                        "{:.2}x{}",
                        entry.multiplier,
                        if entry.is_win { "(W)" } else { "(L)" }
                    )
                })
                .collect();
            writeln!(self.out, "History: {}", items.join(" "))?;
        }

        self.out.flush()
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, snapshot: &RoundSnapshot) -> io::Result<()> {
        let message_changed = self.last_message.as_deref() != Some(snapshot.message.text.as_str());
        let climbing = snapshot.phase == Phase::Playing
            && self.last_phase == Some(Phase::Playing)
            && !message_changed;

        if climbing {
            self.render_climb(snapshot)?;
        } else {
            self.render_block(snapshot)?;
        }

        self.last_phase = Some(snapshot.phase);
        self.last_message = Some(snapshot.message.text.clone());
        Ok(())
    }
}

/// One JSON object per line, for piping into another front end
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn render(&mut self, snapshot: &RoundSnapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Keeps every frame; used to assert on what a session showed
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub frames: Vec<RoundSnapshot>,
}

impl RecordingPresenter {
    pub fn last(&self) -> Option<&RoundSnapshot> {
        self.frames.last()
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, snapshot: &RoundSnapshot) -> io::Result<()> {
        self.frames.push(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{HistoryEntry, Message};

    fn snapshot(phase: Phase, multiplier: f64, message: Message) -> RoundSnapshot {
        RoundSnapshot {
            balance: 990.0,
            bet: 10.0,
            multiplier,
            phase,
            potential_win: 10.0 * multiplier,
            can_start: phase != Phase::Playing,
            can_cash_out: phase == Phase::Playing,
            message,
            history: if phase.is_resolved() {
                vec![HistoryEntry::loss(multiplier)]
            } else {
                vec![]
            },
        }
    }

    #[test]
    fn test_terminal_renders_round() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter
            .render(&snapshot(Phase::Playing, 1.0, Message::hidden()))
            .unwrap();
        presenter
            .render(&snapshot(Phase::Playing, 1.42, Message::hidden()))
            .unwrap();
        presenter
            .render(&snapshot(
                Phase::Crashed,
                2.0,
                Message::new("Crashed at 2.00x! You lost $10.00", MessageKind::Loss),
            ))
            .unwrap();

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(text.contains("Balance: $990.00 | Bet: $10.00 | 1.00x [playing]"));
        assert!(text.contains("\r      1.42x   potential $14.20"));
        assert!(text.contains("[loss] Crashed at 2.00x! You lost $10.00"));
        assert!(text.contains("History: 2.00x(L)"));
    }

    #[test]
    fn test_terminal_hides_empty_history_and_message() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter
            .render(&snapshot(Phase::Idle, 1.0, Message::hidden()))
            .unwrap();

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(text, "Balance: $990.00 | Bet: $10.00 | 1.00x\n");
    }

    #[test]
    fn test_json_presenter_emits_lines() {
        let mut presenter = JsonPresenter::new(Vec::new());
        presenter
            .render(&snapshot(Phase::Idle, 1.0, Message::hidden()))
            .unwrap();
        presenter
            .render(&snapshot(
                Phase::Crashed,
                2.0,
                Message::new("Crashed", MessageKind::Loss),
            ))
            .unwrap();

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: RoundSnapshot = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.phase, Phase::Crashed);
        assert_eq!(parsed.message.kind, MessageKind::Loss);
        assert!(lines[1].contains("\"potential_win\":20.0"));
    }
}

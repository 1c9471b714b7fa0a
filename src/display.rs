use std::io::Write;

use tracing::warn;

use crate::emotion::{Color, Emotion};

/// Kind of the status indicator, mirrored in its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Detecting,
    Stopped,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
            StatusKind::Detecting => "detecting",
            StatusKind::Stopped => "stopped",
        }
    }
}

/// Surface the controller projects onto.
///
/// Implementations own the on-screen indicators: a status line, the start and
/// stop triggers, the dominant-emotion label and one bar per [`Emotion`].
pub trait DisplaySurface: Send {
    fn set_status(&mut self, text: &str, kind: StatusKind);

    fn set_controls(&mut self, start_enabled: bool, stop_enabled: bool);

    fn set_dominant(&mut self, text: &str, color: Color, high_confidence: bool);

    fn set_bar(
        &mut self,
        emotion: Emotion,
        height_pct: u8,
        color: Color,
        label: &str,
        active: bool,
    );

    /// Called once every setter for a frame has been applied.
    fn flush(&mut self) {}
}

/// [`DisplaySurface`] rendering ANSI-colored text to a writer.
pub struct TerminalDisplay<W: Write + Send> {
    out: W,
    width: usize,
    lines: Vec<String>,
}

impl<W: Write + Send> TerminalDisplay<W> {
    /// Creates a display whose bars are `width` cells wide at 100%.
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width: width.max(1),
            lines: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(color: Color, text: &str) -> String {
        let (r, g, b) = color.rgb();
        format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            warn!(?e, "display write failed");
        }
    }
}

impl<W: Write + Send> DisplaySurface for TerminalDisplay<W> {
    fn set_status(&mut self, text: &str, kind: StatusKind) {
        let line = format!("[{}] {}", kind.as_str(), text);
        self.emit(&line);
    }

    fn set_controls(&mut self, start_enabled: bool, stop_enabled: bool) {
        let mut hints = Vec::new();
        if start_enabled {
            hints.push("start");
        }
        if stop_enabled {
            hints.push("stop");
        }
        hints.push("quit");
        let line = format!("commands: {}", hints.join(" | "));
        self.emit(&line);
    }

    fn set_dominant(&mut self, text: &str, color: Color, high_confidence: bool) {
        let marker = if high_confidence { " *" } else { "" };
        self.lines.push(format!("{}{marker}", Self::paint(color, text)));
    }

    fn set_bar(
        &mut self,
        emotion: Emotion,
        height_pct: u8,
        color: Color,
        label: &str,
        active: bool,
    ) {
        let cells = self.width * usize::from(height_pct.min(100)) / 100;
        let glyph = if active { "█" } else { "░" };
        // padding stays outside the escape codes so labels line up
        let bar = Self::paint(color, &glyph.repeat(cells));
        let pad = " ".repeat(self.width - cells);
        self.lines.push(format!("{:>10} {bar}{pad} {label}", emotion.key()));
    }

    fn flush(&mut self) {
        let frame = std::mem::take(&mut self.lines).join("\n");
        self.emit(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_names_kind() {
        let mut display = TerminalDisplay::new(Vec::new(), 10);
        display.set_status("Detection stopped", StatusKind::Stopped);
        let out = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(out, "[stopped] Detection stopped\n");
    }

    #[test]
    fn frame_is_written_on_flush() {
        let mut display = TerminalDisplay::new(Vec::new(), 10);
        display.set_dominant("Happy", Emotion::Happy.color(), true);
        display.set_bar(Emotion::Happy, 50, Emotion::Happy.color(), "50%", true);
        assert!(display.lines.len() == 2);
        display.flush();
        let out = String::from_utf8(display.into_inner()).unwrap();
        assert!(out.contains("Happy *"));
        assert!(out.contains(&"█".repeat(5)));
        assert!(out.contains("50%"));
    }

    fn visible(line: &str) -> String {
        let mut out = String::new();
        let mut chars = line.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                chars.by_ref().find(|c| *c == 'm');
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn labels_share_a_column() {
        let mut display = TerminalDisplay::new(Vec::new(), 40);
        for (emotion, pct) in Emotion::ALL.into_iter().zip([2, 1, 10, 72, 5, 100, 0]) {
            let label = format!("{pct}%");
            display.set_bar(emotion, pct, emotion.color(), &label, pct > 10);
        }
        let columns: Vec<usize> = display
            .lines
            .iter()
            .map(|line| {
                let text = visible(line);
                let label_start = text.rfind(' ').unwrap() + 1;
                text[..label_start].chars().count()
            })
            .collect();
        assert_eq!(columns.len(), 7);
        assert!(columns.iter().all(|c| *c == 10 + 1 + 40 + 1), "{columns:?}");
    }

    #[test]
    fn controls_list_enabled_triggers() {
        let mut display = TerminalDisplay::new(Vec::new(), 10);
        display.set_controls(false, true);
        let out = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(out, "commands: stop | quit\n");
    }
}

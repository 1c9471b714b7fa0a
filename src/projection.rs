//! Pure mapping from an [`EmotionReading`] to what the display shows.

use crate::display::DisplaySurface;
use crate::emotion::{Color, Emotion, EmotionReading};

/// Probability above which the dominant label is flagged as high confidence.
pub const HIGH_CONFIDENCE: f64 = 0.5;

/// Percentage above which a bar is marked active.
pub const ACTIVE_PERCENT: u8 = 10;

/// Converts a probability to a whole percentage, rounding halves up.
///
/// Values outside `[0, 1]` are clamped and `NaN` maps to zero.
///
/// # Examples
/// ```
/// use felt::projection::percentage;
/// assert_eq!(percentage(0.715), 72);
/// assert_eq!(percentage(1.0), 100);
/// ```
pub fn percentage(p: f64) -> u8 {
    if p.is_nan() {
        return 0;
    }
    (p * 100.0).round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    pub emotion: Emotion,
    pub height_pct: u8,
    pub color: Color,
    pub label: String,
    pub active: bool,
}

/// Everything one cycle pushes onto the display.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub dominant_text: String,
    pub dominant_color: Color,
    pub high_confidence: bool,
    pub bars: [BarView; 7],
}

impl Frame {
    pub fn bar(&self, emotion: Emotion) -> &BarView {
        &self.bars[emotion as usize]
    }

    pub fn apply(&self, surface: &mut dyn DisplaySurface) {
        surface.set_dominant(&self.dominant_text, self.dominant_color, self.high_confidence);
        for bar in &self.bars {
            surface.set_bar(bar.emotion, bar.height_pct, bar.color, &bar.label, bar.active);
        }
        surface.flush();
    }
}

/// Projects a reading onto the fixed set of indicators.
pub fn project(reading: &EmotionReading) -> Frame {
    let probabilities = &reading.probabilities;
    let bars = Emotion::ALL.map(|emotion| {
        let pct = percentage(probabilities.get(emotion));
        BarView {
            emotion,
            height_pct: pct,
            color: emotion.color(),
            label: format!("{pct}%"),
            active: pct > ACTIVE_PERCENT,
        }
    });
    Frame {
        dominant_text: reading.dominant_emotion.clone(),
        dominant_color: Color::for_label(&reading.dominant_emotion),
        high_confidence: probabilities.max() > HIGH_CONFIDENCE,
        bars,
    }
}

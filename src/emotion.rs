use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// The seven emotions the classifier reports, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emotion {
    Angry,
    Disgust,
    Scared,
    Happy,
    Sad,
    Surprised,
    Mewing,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Scared,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprised,
        Emotion::Mewing,
    ];

    /// Lower-case key used on the wire and to tag display bars.
    pub fn key(self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Scared => "scared",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprised => "surprised",
            Emotion::Mewing => "mewing",
        }
    }

    /// Display color for this emotion.
    pub fn color(self) -> Color {
        Color(match self {
            Emotion::Angry => "#ff4757",
            Emotion::Disgust => "#2ed573",
            Emotion::Scared => "#5352ed",
            Emotion::Happy => "#ffa502",
            Emotion::Sad => "#3742fa",
            Emotion::Surprised => "#ff6b81",
            Emotion::Mewing => "#a4b0be",
        })
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion `{0}`")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    /// Parses an emotion key, ignoring case. Surrounding whitespace is not
    /// stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

/// A `#rrggbb` display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(&'static str);

impl Color {
    /// Color used for labels that match no known emotion.
    pub const DEFAULT: Color = Color("#ffffff");

    /// Looks up the color for a dominant-emotion label, falling back to
    /// [`Color::DEFAULT`] when the label is not a known emotion.
    ///
    /// # Examples
    /// ```
    /// use felt::{Color, Emotion};
    /// assert_eq!(Color::for_label("Happy"), Emotion::Happy.color());
    /// assert_eq!(Color::for_label("Confused"), Color::DEFAULT);
    /// ```
    pub fn for_label(label: &str) -> Color {
        label
            .to_lowercase()
            .parse::<Emotion>()
            .map(Emotion::color)
            .unwrap_or(Color::DEFAULT)
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| {
            self.0
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(0xff)
        };
        (channel(1), channel(3), channel(5))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Probability per emotion. Emotions absent from the source read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Probabilities([f64; 7]);

impl Probabilities {
    pub fn get(&self, emotion: Emotion) -> f64 {
        self.0[emotion.index()]
    }

    /// Highest probability across all seven emotions.
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }
}

impl FromIterator<(Emotion, f64)> for Probabilities {
    fn from_iter<I: IntoIterator<Item = (Emotion, f64)>>(iter: I) -> Self {
        let mut values = [0.0; 7];
        for (emotion, p) in iter {
            values[emotion.index()] = p;
        }
        Probabilities(values)
    }
}

impl<'de> Deserialize<'de> for Probabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        // exact lower-case key wins, otherwise the first case variant in key order
        let mut slots: [Option<(bool, f64)>; 7] = [None; 7];
        for (key, p) in raw {
            let Ok(emotion) = key.parse::<Emotion>() else {
                continue;
            };
            let exact = key == emotion.key();
            let slot = &mut slots[emotion.index()];
            if exact || slot.is_none() {
                *slot = Some((exact, p));
            }
        }
        Ok(Emotion::ALL
            .into_iter()
            .zip(slots)
            .filter_map(|(e, slot)| slot.map(|(_, p)| (e, p)))
            .collect())
    }
}

/// One classification result, either from the detection service or the
/// fallback rotation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmotionReading {
    pub dominant_emotion: String,
    pub probabilities: Probabilities,
    /// Free-form note from the service, e.g. "No face detected".
    #[serde(default)]
    pub message: Option<String>,
}

impl EmotionReading {
    pub fn new(
        dominant_emotion: impl Into<String>,
        probabilities: impl IntoIterator<Item = (Emotion, f64)>,
    ) -> Self {
        Self {
            dominant_emotion: dominant_emotion.into(),
            probabilities: probabilities.into_iter().collect(),
            message: None,
        }
    }
}

use crate::emotion::{Emotion, EmotionReading};

#[derive(Debug, thiserror::Error)]
#[error("fallback rotation needs at least one reading")]
pub struct RotationError;

/// Canned readings shown, in turn, while the detection service is unavailable.
#[derive(Debug, Clone)]
pub struct FallbackRotation {
    readings: Vec<EmotionReading>,
    cursor: usize,
}

impl FallbackRotation {
    pub fn new(readings: Vec<EmotionReading>) -> Result<Self, RotationError> {
        if readings.is_empty() {
            return Err(RotationError);
        }
        Ok(Self {
            readings,
            cursor: 0,
        })
    }

    /// The three demo readings: happy, surprised and sad.
    pub fn canned() -> Self {
        use Emotion::*;
        let readings = vec![
            EmotionReading::new(
                "Happy",
                [
                    (Angry, 0.02),
                    (Disgust, 0.01),
                    (Scared, 0.10),
                    (Happy, 0.72),
                    (Sad, 0.05),
                    (Surprised, 0.08),
                    (Mewing, 0.02),
                ],
            ),
            EmotionReading::new(
                "Surprised",
                [
                    (Angry, 0.05),
                    (Disgust, 0.02),
                    (Scared, 0.15),
                    (Happy, 0.20),
                    (Sad, 0.08),
                    (Surprised, 0.45),
                    (Mewing, 0.05),
                ],
            ),
            EmotionReading::new(
                "Sad",
                [
                    (Angry, 0.08),
                    (Disgust, 0.03),
                    (Scared, 0.12),
                    (Happy, 0.15),
                    (Sad, 0.52),
                    (Surprised, 0.07),
                    (Mewing, 0.03),
                ],
            ),
        ];
        Self {
            readings,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the reading under the cursor and advances it, wrapping to the
    /// start after the last reading.
    pub fn next_reading(&mut self) -> EmotionReading {
        let reading = self.readings[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.readings.len();
        reading
    }
}

impl Default for FallbackRotation {
    fn default() -> Self {
        Self::canned()
    }
}

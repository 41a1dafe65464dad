//! Adaptive key placement for the on-screen dot keys.
//!
//! Tracks where presses land relative to each key's centre and suggests an
//! offset that moves the key towards the user's fingers. This component only
//! sees press coordinates; it never reads or writes grid or cursor state.

use serde::{Deserialize, Serialize};

use crate::models::Dot;

/// Tuning for the offset estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    /// Weight of the newest sample in the moving average (0.0-1.0)
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    /// Presses required before a key gets a suggestion
    #[serde(default = "default_min_samples")]
    pub min_samples: u32,
    /// Largest offset ever suggested, in the same units as the key rects
    #[serde(default = "default_max_offset")]
    pub max_offset: f32,
}

fn default_alpha() -> f32 {
    0.3
}

fn default_min_samples() -> u32 {
    5
}

fn default_max_offset() -> f32 {
    2.0
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            min_samples: default_min_samples(),
            max_offset: default_max_offset(),
        }
    }
}

/// Axis-aligned key rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyRect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl KeyRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// This rectangle moved by `offset`.
    #[must_use]
    pub fn shifted(&self, offset: Offset) -> Self {
        Self {
            x: self.x + offset.dx,
            y: self.y + offset.dy,
            ..*self
        }
    }

    /// Whether the two rectangles share any area. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// A 2D displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Offset {
    /// Horizontal displacement
    pub dx: f32,
    /// Vertical displacement
    pub dy: f32,
}

impl Offset {
    fn length(self) -> f32 {
        self.dx.hypot(self.dy)
    }

    fn clamped(self, max: f32) -> Self {
        let len = self.length();
        if len <= max || len == 0.0 {
            self
        } else {
            let scale = max / len;
            Self {
                dx: self.dx * scale,
                dy: self.dy * scale,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyStats {
    samples: u32,
    average: Offset,
}

/// Per-key exponential moving average of press offsets.
#[derive(Debug, Clone)]
pub struct KeyCalibrator {
    settings: CalibrationSettings,
    keys: [KeyRect; 6],
    stats: [KeyStats; 6],
}

impl KeyCalibrator {
    /// Creates a calibrator for keys laid out at `keys` (indexed by dot).
    #[must_use]
    pub fn new(settings: CalibrationSettings, keys: [KeyRect; 6]) -> Self {
        Self {
            settings,
            keys,
            stats: [KeyStats::default(); 6],
        }
    }

    /// Replaces the key layout (e.g. after a resize) and forgets all samples.
    pub fn set_layout(&mut self, keys: [KeyRect; 6]) {
        if self.keys != keys {
            self.keys = keys;
            self.reset();
        }
    }

    /// Current base layout.
    #[must_use]
    pub const fn layout(&self) -> &[KeyRect; 6] {
        &self.keys
    }

    /// Forgets all samples.
    pub fn reset(&mut self) {
        self.stats = [KeyStats::default(); 6];
    }

    /// Records a press of `dot` landing at (`x`, `y`).
    pub fn record_press(&mut self, dot: Dot, x: f32, y: f32) {
        let (cx, cy) = self.keys[dot.index()].center();
        let sample = Offset {
            dx: x - cx,
            dy: y - cy,
        };
        let alpha = self.settings.alpha.clamp(0.0, 1.0);
        let stats = &mut self.stats[dot.index()];

        stats.average = if stats.samples == 0 {
            sample
        } else {
            Offset {
                dx: alpha * sample.dx + (1.0 - alpha) * stats.average.dx,
                dy: alpha * sample.dy + (1.0 - alpha) * stats.average.dy,
            }
        };
        stats.samples = stats.samples.saturating_add(1);
    }

    /// Number of presses recorded for `dot`.
    #[must_use]
    pub fn samples(&self, dot: Dot) -> u32 {
        self.stats[dot.index()].samples
    }

    /// Suggested offsets for all keys, indexed by dot.
    ///
    /// Keys are resolved in dot order. A key gets `None` until it has enough
    /// samples, and also when its shifted rectangle would overlap a key
    /// already placed.
    #[must_use]
    pub fn suggestions(&self) -> [Option<Offset>; 6] {
        let mut placed = self.keys;
        let mut result = [None; 6];

        for dot in Dot::ALL {
            let i = dot.index();
            let stats = self.stats[i];
            if stats.samples < self.settings.min_samples {
                continue;
            }

            let offset = stats.average.clamped(self.settings.max_offset);
            let candidate = self.keys[i].shifted(offset);
            let collides = placed
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && candidate.overlaps(other));

            if !collides {
                placed[i] = candidate;
                result[i] = Some(offset);
            }
        }

        result
    }

    /// Key rectangles with accepted suggestions applied.
    #[must_use]
    pub fn adjusted_layout(&self) -> [KeyRect; 6] {
        let suggestions = self.suggestions();
        let mut keys = self.keys;
        for (key, offset) in keys.iter_mut().zip(suggestions) {
            if let Some(offset) = offset {
                *key = key.shifted(offset);
            }
        }
        keys
    }

    /// Index of the key containing (`x`, `y`) in the adjusted layout.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<Dot> {
        self.adjusted_layout()
            .iter()
            .position(|r| x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height)
            .and_then(Dot::from_index)
    }
}

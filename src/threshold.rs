//! Threshold scale
//!
//! Maps a discrete control position to a severity level and back. The scale
//! itself is immutable; the selected position belongs to whoever drives the
//! control (see [`ThresholdControl`]).

use crate::severity::SeverityLevel;

/// Level used whenever a position cannot be resolved
pub const FALLBACK_LEVEL: SeverityLevel = SeverityLevel::Trace;

/// Ordered, bijective mapping between positions `0..len()` and severity levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdScale {
    levels: Vec<SeverityLevel>,
}

impl ThresholdScale {
    /// Build the scale with all levels sorted ascending by weight
    pub fn new() -> Self {
        let mut levels = SeverityLevel::LEVELS.to_vec();
        levels.sort_by_key(|level| level.weight());
        Self { levels }
    }

    /// Number of positions on the scale
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if the scale has no positions
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Fixed index of a level
    pub fn position_of(&self, level: SeverityLevel) -> usize {
        self.levels
            .iter()
            .position(|l| *l == level)
            .unwrap_or_else(|| self.default_position())
    }

    /// Level at a position, or TRACE when the position is out of range
    pub fn level_at(&self, position: isize) -> SeverityLevel {
        usize::try_from(position)
            .ok()
            .and_then(|p| self.get(p))
            .unwrap_or(FALLBACK_LEVEL)
    }

    /// Level at a position, without the fallback
    pub fn get(&self, position: usize) -> Option<SeverityLevel> {
        self.levels.get(position).copied()
    }

    /// Position of TRACE
    pub fn default_position(&self) -> usize {
        self.levels
            .iter()
            .position(|l| *l == FALLBACK_LEVEL)
            .unwrap_or(0)
    }

    /// `(position, label)` pairs for building a control's label table
    pub fn labels(&self) -> impl Iterator<Item = (usize, &'static str)> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(position, level)| (position, level.as_str()))
    }

    /// All levels in scale order
    pub fn levels(&self) -> &[SeverityLevel] {
        &self.levels
    }
}

impl Default for ThresholdScale {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-owned selection on a [`ThresholdScale`]
///
/// Behaves like a bounded range model: positions are clamped into the scale.
#[derive(Debug, Clone)]
pub struct ThresholdControl {
    scale: ThresholdScale,
    position: usize,
}

impl ThresholdControl {
    /// Create a control positioned at the scale's default (TRACE)
    pub fn new(scale: ThresholdScale) -> Self {
        let position = scale.default_position();
        Self { scale, position }
    }

    /// The underlying scale
    pub fn scale(&self) -> &ThresholdScale {
        &self.scale
    }

    /// Current position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move to a position, clamped into `[0, len - 1]`
    pub fn set_position(&mut self, position: isize) {
        let max = self.scale.len().saturating_sub(1) as isize;
        self.position = position.clamp(0, max) as usize;
    }

    /// Move to the position of `level`
    pub fn set_chosen_level(&mut self, level: SeverityLevel) {
        self.position = self.scale.position_of(level);
    }

    /// Level currently selected
    pub fn selected_level(&self) -> SeverityLevel {
        self.scale.level_at(self.position as isize)
    }

    /// Whether a record at `level` passes the selected threshold
    pub fn admits(&self, level: SeverityLevel) -> bool {
        level.is_visible_at(self.selected_level())
    }
}

impl Default for ThresholdControl {
    fn default() -> Self {
        Self::new(ThresholdScale::new())
    }
}

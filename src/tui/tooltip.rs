use std::time::{Duration, Instant};

/// How long the pointer has to rest on a cell before the tooltip shows.
pub const DWELL: Duration = Duration::from_millis(1000);
/// Tooltip sits this far right of and below the pointer.
pub const OFFSET: (u16, u16) = (12, 12);

/// Identifies a day cell by its coordinates in the year grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    Idle,
    Dwelling,
    Shown,
}

/// Hover tooltip over day cells.
///
/// `Idle -> Dwelling` when the pointer lands on a cell, `Dwelling -> Shown`
/// once [`DWELL`] elapses on that same cell, and back to `Idle` as soon as
/// the pointer leaves it. A single tooltip is reused: hiding only clears
/// the visible flag.
#[derive(Debug, Clone)]
pub struct TooltipController {
    target: Option<CellKey>,
    dwell_deadline: Option<Instant>,
    visible: bool,
    pointer: (u16, u16),
    text: String,
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new()
    }
}

impl TooltipController {
    pub fn new() -> Self {
        Self {
            target: None,
            dwell_deadline: None,
            visible: false,
            pointer: (0, 0),
            text: String::new(),
        }
    }

    pub fn phase(&self) -> TooltipPhase {
        if self.visible {
            TooltipPhase::Shown
        } else if self.dwell_deadline.is_some() {
            TooltipPhase::Dwelling
        } else {
            TooltipPhase::Idle
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn target(&self) -> Option<CellKey> {
        self.target
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Top-left corner of the tooltip: pointer plus [`OFFSET`].
    pub fn position(&self) -> (u16, u16) {
        (
            self.pointer.0.saturating_add(OFFSET.0),
            self.pointer.1.saturating_add(OFFSET.1),
        )
    }

    /// When the pending dwell fires, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.dwell_deadline
    }

    /// Feed a pointer move. `hit` is the cell under the pointer together with
    /// its precomputed date label, or `None` when the pointer is elsewhere.
    pub fn pointer_moved(&mut self, hit: Option<(CellKey, &str)>, column: u16, row: u16, now: Instant) {
        self.pointer = (column, row);

        match hit {
            Some((key, _)) if self.target == Some(key) => {
                // Same cell: a visible tooltip follows the pointer, a pending
                // dwell just keeps waiting.
            }
            Some((key, label)) => {
                self.visible = false;
                self.target = Some(key);
                self.text = label.to_string();
                self.dwell_deadline = Some(now + DWELL);
            }
            None => self.reset(),
        }
    }

    /// Advance time. Returns `true` when the tooltip just became visible.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.dwell_deadline {
            Some(deadline) if now >= deadline && self.target.is_some() => {
                self.dwell_deadline = None;
                self.visible = true;
                true
            }
            _ => false,
        }
    }

    /// Back to idle: cancel any pending dwell, hide, forget the target.
    pub fn reset(&mut self) {
        self.target = None;
        self.dwell_deadline = None;
        self.visible = false;
    }
}

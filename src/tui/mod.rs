pub mod event;
pub mod grid;
pub mod headline;
pub mod scheduler;
pub mod tooltip;
pub mod ui;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::calendar::{aggregates, year_view, Aggregates, YearView};
use crate::store::{KeyValueStore, USER_NAME_KEY};
use grid::GridLayout;
use headline::{compose, Headline};
use scheduler::MidnightScheduler;
use tooltip::TooltipController;

/// Upper bound on how long the event loop sleeps between wakeups.
const MAX_IDLE: Duration = Duration::from_millis(250);

// ─── Name prompt ─────────────────────────────────────────────────────────────

/// Longest display name the prompt accepts, in characters.
pub const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct NamePrompt {
    pub visible: bool,
    /// Keystrokes go to the prompt while focused.
    pub focused: bool,
    pub input: String,
}

impl NamePrompt {
    pub fn show(&mut self) {
        self.visible = true;
        self.focused = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.focused = false;
    }
}

// ─── Background results ──────────────────────────────────────────────────────

/// Stored name read for one render, tagged with that render's sequence number.
#[derive(Debug)]
pub struct NameLookup {
    pub seq: u64,
    pub name: Option<String>,
}

// ─── App State ──────────────────────────────────────────────────────────────

pub struct App {
    pub store: Arc<dyn KeyValueStore>,
    pub running: bool,

    // Render output
    pub today: NaiveDate,
    pub year_view: YearView,
    pub aggregates: Aggregates,
    pub headline: Option<Headline>,
    pub render_seq: u64,

    // UI state
    pub prompt: NamePrompt,
    pub tooltip: TooltipController,
    /// Cell positions from the last drawn frame, used for hover hit tests.
    pub layout: GridLayout,
    pub scheduler: MidnightScheduler,

    // Status
    pub status_message: String,

    // Background channels
    pub headline_rx: Option<oneshot::Receiver<NameLookup>>,
    pub save_rx: Option<oneshot::Receiver<()>>,
}

impl App {
    pub fn new(store: Arc<dyn KeyValueStore>, now: DateTime<Local>, at: Instant) -> Self {
        let today = now.date_naive();
        Self {
            store,
            running: true,
            today,
            year_view: year_view(today.year(), today),
            aggregates: aggregates(today),
            headline: None,
            render_seq: 0,
            prompt: NamePrompt::default(),
            tooltip: TooltipController::new(),
            layout: GridLayout::default(),
            scheduler: MidnightScheduler::new(now, at),
            status_message: "Loading…".into(),
            headline_rx: None,
            save_rx: None,
        }
    }

    /// One full render: rebuild the year view and aggregates for `today`,
    /// then look up the stored name in the background.
    pub fn render(&mut self, today: NaiveDate) {
        self.today = today;
        self.year_view = year_view(today.year(), today);
        self.aggregates = aggregates(today);
        // The old cells are gone; hovering starts over on the next move.
        self.tooltip.reset();
        self.layout = GridLayout::default();

        debug!(
            %today,
            remaining = self.aggregates.remaining_days_in_year,
            "render"
        );
        self.start_headline_fetch();
    }

    /// Spawn the name lookup for the current render. A newer render drops the
    /// receiver of any older one, and the sequence check below discards a
    /// late result, so the latest render always wins.
    fn start_headline_fetch(&mut self) {
        self.render_seq = self.render_seq.wrapping_add(1);
        let seq = self.render_seq;
        let store = Arc::clone(&self.store);
        let (tx, rx) = oneshot::channel();
        self.headline_rx = Some(rx);
        tokio::spawn(async move {
            let name = store.get(USER_NAME_KEY).await;
            let _ = tx.send(NameLookup { seq, name });
        });
    }

    /// Check the name lookup without blocking. Returns `true` once applied.
    pub fn poll_headline_result(&mut self) -> bool {
        let result = match self.headline_rx.as_mut() {
            None => return false,
            Some(rx) => match rx.try_recv() {
                Ok(r) => r,
                Err(oneshot::error::TryRecvError::Empty) => return false,
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.headline_rx = None;
                    return false;
                }
            },
        };
        self.headline_rx = None;
        self.apply_headline(result)
    }

    pub fn apply_headline(&mut self, lookup: NameLookup) -> bool {
        if lookup.seq != self.render_seq {
            debug!(seq = lookup.seq, current = self.render_seq, "stale headline dropped");
            return false;
        }

        let headline = compose(lookup.name.as_deref(), &self.aggregates, self.today);
        if headline.prompt_visible {
            self.prompt.show();
            self.status_message = "What should we call you? Type a name and press Enter.".into();
        } else {
            self.prompt.hide();
            self.status_message = format!(
                "{} days left in {}.",
                self.aggregates.remaining_days_in_year, self.year_view.year
            );
        }
        self.headline = Some(headline);
        true
    }

    /// Persist the typed name. Blank input is ignored: nothing is written and
    /// the prompt stays open.
    pub fn submit_name(&mut self) {
        let name = self.prompt.input.trim().to_string();
        if name.is_empty() {
            return;
        }
        if self.save_rx.is_some() {
            return;
        }

        let store = Arc::clone(&self.store);
        let (tx, rx) = oneshot::channel();
        self.save_rx = Some(rx);
        self.status_message = "Saving…".into();
        tokio::spawn(async move {
            store.set(USER_NAME_KEY, &name).await;
            info!("display name saved");
            let _ = tx.send(());
        });
    }

    /// Check for a finished name write; re-renders for `today` when done.
    pub fn poll_save_result(&mut self, today: NaiveDate) -> bool {
        let done = match self.save_rx.as_mut() {
            None => return false,
            Some(rx) => match rx.try_recv() {
                Ok(()) => true,
                Err(oneshot::error::TryRecvError::Empty) => return false,
                Err(oneshot::error::TryRecvError::Closed) => false,
            },
        };
        self.save_rx = None;
        if done {
            self.finish_save(today);
        }
        done
    }

    pub fn finish_save(&mut self, today: NaiveDate) {
        self.prompt.input.clear();
        self.render(today);
    }

    /// Feed a mouse move to the tooltip, hit-testing against the last frame.
    pub fn pointer_moved(&mut self, column: u16, row: u16, at: Instant) {
        let hit = self
            .layout
            .cell_at(column, row)
            .map(|c| (c.key, c.label.as_str()));
        self.tooltip.pointer_moved(hit, column, row, at);
    }

    /// Advance timers: show a due tooltip and fire the midnight refresh.
    ///
    /// The monotonic deadline stalls while the machine sleeps, so a wall-clock
    /// date that moved past `today` also counts as a day boundary.
    pub fn tick(&mut self, at: Instant, now: DateTime<Local>) {
        if self.tooltip.tick(at) {
            debug!(text = self.tooltip.text(), "tooltip shown");
        }

        if self.scheduler.due(at) || now.date_naive() != self.today {
            info!(date = %now.date_naive(), "day changed, re-rendering");
            self.render(now.date_naive());
            self.scheduler.arm(now, at);
        }
    }

    /// How long the event loop may wait before the next timer needs service.
    pub fn next_wakeup(&self, at: Instant) -> Duration {
        let mut wait = MAX_IDLE;
        let deadlines = [self.tooltip.next_deadline(), Some(self.scheduler.deadline())];
        for deadline in deadlines.into_iter().flatten() {
            wait = wait.min(deadline.saturating_duration_since(at));
        }
        wait
    }
}

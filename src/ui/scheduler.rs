//! Deferred relayout and scroll requests.
//!
//! Resize notifications are debounced: each one cancels the pending resize
//! relayout and pushes it `resize_debounce` into the future, so a burst of
//! resizes produces a single pass. Other requests run on the next frame or
//! after a fixed delay. Time is always passed in by the caller, so the same
//! sequence of calls yields the same decisions.

use std::time::{Duration, Instant};

use crate::gallery::card::CardId;

/// Quiet period after the last resize before relaying out.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(60);
/// Follow-up relayout while the gallery overlay is still animating open.
pub const OPEN_SETTLE_DELAY: Duration = Duration::from_millis(120);
/// Delay before scrolling to a card opened by page number.
pub const SCROLL_DELAY: Duration = Duration::from_millis(120);

/// Work the scheduler hands back to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Relayout,
    ScrollTo(CardId),
}

/// Cancel token for a scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Timer {
    ticket: Ticket,
    due: Instant,
    job: Job,
}

#[derive(Debug)]
pub struct Scheduler {
    resize_debounce: Duration,
    timers: Vec<Timer>,
    next_ticket: u64,
    /// Pending debounced resize relayout
    resize: Option<Ticket>,
    /// Pending scroll; a newer scroll request replaces it
    scroll: Option<Ticket>,
    /// Relayout on the next frame
    frame: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

impl Scheduler {
    pub fn new(resize_debounce: Duration) -> Self {
        Self {
            resize_debounce,
            timers: Vec::new(),
            next_ticket: 0,
            resize: None,
            scroll: None,
            frame: false,
        }
    }

    fn schedule(&mut self, due: Instant, job: Job) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.timers.push(Timer { ticket, due, job });
        ticket
    }

    /// Cancel a job that has not run yet. Returns whether it was pending.
    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.ticket != ticket);
        if self.resize == Some(ticket) {
            self.resize = None;
        }
        if self.scroll == Some(ticket) {
            self.scroll = None;
        }
        self.timers.len() != before
    }

    /// A resize happened: (re)start the debounce window.
    pub fn on_resize(&mut self, now: Instant) -> Ticket {
        if let Some(previous) = self.resize.take() {
            self.cancel(previous);
        }
        let ticket = self.schedule(now + self.resize_debounce, Job::Relayout);
        self.resize = Some(ticket);
        ticket
    }

    /// Relayout once the current state change has been applied.
    pub fn relayout_next_frame(&mut self) {
        self.frame = true;
    }

    pub fn relayout_after(&mut self, now: Instant, delay: Duration) -> Ticket {
        self.schedule(now + delay, Job::Relayout)
    }

    /// Scroll to `card` after `delay`, replacing any pending scroll.
    pub fn scroll_after(&mut self, now: Instant, delay: Duration, card: CardId) -> Ticket {
        if let Some(previous) = self.scroll.take() {
            self.cancel(previous);
        }
        let ticket = self.schedule(now + delay, Job::ScrollTo(card));
        self.scroll = Some(ticket);
        ticket
    }

    /// Collect every job due at `now`. At most one `Relayout` is returned,
    /// and it always comes before any scroll so scrolling sees fresh
    /// positions.
    pub fn poll(&mut self, now: Instant) -> Vec<Job> {
        let mut relayout = std::mem::take(&mut self.frame);
        let mut scrolls = Vec::new();

        let mut due: Vec<Timer> = Vec::new();
        let mut pending = Vec::with_capacity(self.timers.len());
        for timer in self.timers.drain(..) {
            if timer.due <= now {
                due.push(timer);
            } else {
                pending.push(timer);
            }
        }
        self.timers = pending;
        due.sort_by_key(|t| (t.due, t.ticket.0));

        for timer in due {
            if self.resize == Some(timer.ticket) {
                self.resize = None;
            }
            if self.scroll == Some(timer.ticket) {
                self.scroll = None;
            }
            match timer.job {
                Job::Relayout => relayout = true,
                Job::ScrollTo(card) => scrolls.push(Job::ScrollTo(card)),
            }
        }

        let mut jobs = Vec::with_capacity(scrolls.len() + 1);
        if relayout {
            jobs.push(Job::Relayout);
        }
        jobs.extend(scrolls);
        if !jobs.is_empty() {
            tracing::debug!("Scheduler fired {:?}", jobs);
        }
        jobs
    }

    /// Whether something must run on the very next frame.
    pub fn wants_frame(&self) -> bool {
        self.frame
    }

    /// Earliest timer deadline, for `ControlFlow::WaitUntil`.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.due).min()
    }

    pub fn is_idle(&self) -> bool {
        !self.frame && self.timers.is_empty()
    }
}

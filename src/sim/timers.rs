//! Fire-once delayed tasks
//!
//! Expiry, respawn, particle removal and the repeating cadences are all
//! entries in one queue pumped from outside the frame loop. Repeating
//! cadences reschedule themselves when they fire.

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Work a timer performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Lifetime ran out
    ExpireCat(u32),
    /// Replace an expired cat
    RespawnCat,
    /// Periodic population floor check
    TopUp,
    /// Next sparkle while the key is held
    EmitSparkle,
    /// Sparkle or confetti timed out
    RemoveParticle(u32),
    HideBanner,
    RemoveFlash,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    due_ms: f64,
    task: Task,
}

/// Pending tasks ordered by due time, then by submission order
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run `task` at `due_ms`
    pub fn schedule_at(&mut self, due_ms: f64, task: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due_ms = if due_ms.is_finite() { due_ms } else { f64::MAX };
        self.entries.push(Entry { id, due_ms, task });
        id
    }

    /// Run `task` `delay_ms` after `now_ms`; negative delays fire immediately
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: Task) -> TimerId {
        self.schedule_at(now_ms + delay_ms.max(0.0), task)
    }

    /// Drop a pending task; returns `false` if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop everything (teardown)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Earliest due time
    pub fn next_due(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.due_ms).min_by(f64::total_cmp)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Pop the earliest task due at or before `now_ms`.
    ///
    /// Returns the task with its scheduled time, so chained work is timed
    /// from when it should have run rather than when the pump noticed.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(f64, Task)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(idx);
        Some((entry.due_ms, entry.task))
    }
}

//! Cooperative scheduling port
//!
//! The session never sleeps or spawns threads. It asks the host for one frame
//! callback at a time and for one-shot real-time timers, and cancels them
//! explicitly. Cancelling a handle that already fired is a no-op. A request the
//! host refuses returns `None` and nothing will be called back.

/// Pending animation frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Pending one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// What a timer callback means to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One step of the post-quiz countdown
    Countdown,
    /// The speed boost window ended
    BoostExpired,
}

pub trait Scheduler {
    /// Ask for `Session::on_frame` to be called before the next repaint
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Ask for `Session::on_timer(kind)` after `delay_ms` of real time
    fn set_timeout(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TimerHandle>;
    fn clear_timeout(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    handle: TimerHandle,
    kind: TimerKind,
    due_ms: u64,
}

/// Virtual-clock scheduler for native runs and tests.
///
/// Nothing fires on its own: the driver pulls frames with [`take_frame`] and
/// due timers with [`pop_due`].
///
/// [`take_frame`]: ManualScheduler::take_frame
/// [`pop_due`]: ManualScheduler::pop_due
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: i32,
    frames: Vec<FrameHandle>,
    timers: Vec<PendingTimer>,
    /// Simulate a host that refuses new frames and timers
    pub refuse: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Number of frame requests not yet taken or cancelled
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Count pending timers of one kind
    pub fn pending_of(&self, kind: TimerKind) -> usize {
        self.timers.iter().filter(|t| t.kind == kind).count()
    }

    /// Due time of the earliest pending timer of `kind`
    pub fn due_of(&self, kind: TimerKind) -> Option<u64> {
        self.timers
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.due_ms)
            .min()
    }

    /// Consume the oldest pending frame request
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    /// Remove the earliest timer due at or before `until_ms` and move the
    /// clock to its due time. Ties fire in the order they were armed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerKind> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.handle.0))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(idx);
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(timer.kind)
    }

    /// Earliest pending timer regardless of due time
    pub fn pop_next(&mut self) -> Option<TimerKind> {
        self.pop_due(u64::MAX)
    }

    /// Move the clock forward without firing anything
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.refuse {
            return None;
        }
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|f| *f != handle);
    }

    fn set_timeout(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TimerHandle> {
        if self.refuse {
            return None;
        }
        let handle = TimerHandle(self.next_id());
        self.timers.push(PendingTimer {
            handle,
            kind,
            due_ms: self.now_ms + u64::from(delay_ms),
        });
        Some(handle)
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}

//! Frame-coalesced redraw scheduling.
//!
//! Any number of redraw requests between two display refreshes collapse into
//! a single paint on the next refresh. The scheduler only tracks whether a
//! frame is pending and the handle needed to cancel it; painting reads the
//! stores at tick time, so intermediate states are never replayed.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

/// Source of display-refresh callbacks (`requestAnimationFrame` in the browser).
pub trait FrameSource {
    type Handle;

    /// Ask for a callback at the next refresh. `None` if one could not be scheduled.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Cancel a previously requested callback.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Outcome of [`RenderScheduler::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// A new frame callback was requested.
    NextFrame,
    /// A frame is already pending; this request folds into it.
    Coalesced,
    /// The frame source failed to schedule; the caller should paint now.
    PaintNow,
    /// The scheduler was shut down; nothing will be painted.
    Closed,
}

/// Holds at most one pending frame request.
#[derive(Debug)]
pub struct RenderScheduler<H> {
    pending: Option<H>,
    closed: bool,
}

impl<H> Default for RenderScheduler<H> {
    fn default() -> Self {
        Self { pending: None, closed: false }
    }
}

impl<H> RenderScheduler<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Request a redraw at the next refresh.
    pub fn request<S>(&mut self, source: &mut S) -> Scheduled
    where
        S: FrameSource<Handle = H>,
    {
        if self.closed {
            return Scheduled::Closed;
        }
        if self.pending.is_some() {
            return Scheduled::Coalesced;
        }
        match source.request_frame() {
            Some(handle) => {
                self.pending = Some(handle);
                Scheduled::NextFrame
            }
            None => Scheduled::PaintNow,
        }
    }

    /// Consume the pending request when its refresh fires. Returns `true` if
    /// the caller should paint.
    pub fn on_frame(&mut self) -> bool {
        let fired = self.pending.take().is_some();
        if fired {
            log::trace!("render frame");
        }
        fired
    }

    /// Cancel the pending frame, if any, and refuse every later request.
    /// Called on teardown.
    pub fn shutdown<S>(&mut self, source: &mut S)
    where
        S: FrameSource<Handle = H>,
    {
        self.closed = true;
        if let Some(handle) = self.pending.take() {
            source.cancel_frame(handle);
        }
    }
}

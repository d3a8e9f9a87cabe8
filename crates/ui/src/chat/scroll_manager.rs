use gpui::{Pixels, ScrollHandle, point};

/// Small delta used to ignore floating-point scroll jitter.
const SCROLL_DELTA_EPSILON: f32 = 1.0;

/// Frames to keep pinning after a change before trusting the measured extent.
const WARMUP_FRAMES: u8 = 1;

/// Pins the transcript to its newest entry whenever the message count changes.
///
/// A freshly appended row is only measured on the frame after it is added, so a
/// scroll request stays pending until the scrollable extent stops moving.
pub struct ScrollManager {
    scroll_handle: ScrollHandle,
    observed_len: usize,
    pending_scroll_to_bottom: bool,
    warmup_frames: u8,
    last_max_offset: Pixels,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            scroll_handle: ScrollHandle::new(),
            observed_len: 0,
            pending_scroll_to_bottom: false,
            warmup_frames: 0,
            last_max_offset: Pixels::ZERO,
        }
    }

    pub fn handle(&self) -> &ScrollHandle {
        &self.scroll_handle
    }

    pub fn is_scroll_pending(&self) -> bool {
        self.pending_scroll_to_bottom
    }

    /// Records the current row count; returns true when it changed.
    pub fn observe_len(&mut self, len: usize) -> bool {
        if len == self.observed_len {
            return false;
        }

        self.observed_len = len;
        self.request_scroll_to_bottom();
        true
    }

    pub fn request_scroll_to_bottom(&mut self) {
        self.pending_scroll_to_bottom = true;
        self.warmup_frames = WARMUP_FRAMES;
    }

    /// Moves the viewport to the tail. Returns true while another frame is
    /// needed to reach it.
    pub fn apply_pending_scroll(&mut self) -> bool {
        if !self.pending_scroll_to_bottom {
            return false;
        }

        let max_offset = self.scroll_handle.max_offset().height;
        let current_x = self.scroll_handle.offset().x;
        let target_y = if max_offset > Pixels::ZERO {
            -max_offset
        } else {
            Pixels::ZERO
        };
        self.scroll_handle.set_offset(point(current_x, target_y));

        let settled = (f32::from(max_offset) - f32::from(self.last_max_offset)).abs()
            <= SCROLL_DELTA_EPSILON;
        self.last_max_offset = max_offset;
        if self.warmup_frames > 0 {
            self.warmup_frames -= 1;
        } else if settled {
            self.pending_scroll_to_bottom = false;
        }

        self.pending_scroll_to_bottom
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_changes_request_a_scroll() {
        let mut manager = ScrollManager::new();
        assert!(!manager.is_scroll_pending());

        assert!(manager.observe_len(1));
        assert!(manager.is_scroll_pending());
        assert!(!manager.observe_len(1));
    }

    #[test]
    fn pending_scroll_clears_once_extent_is_stable() {
        let mut manager = ScrollManager::new();
        manager.observe_len(2);

        // The first frame after a change never trusts the extent.
        assert!(manager.apply_pending_scroll());
        assert!(manager.is_scroll_pending());

        // An unlaid-out handle keeps reporting a zero extent, which is stable.
        assert!(!manager.apply_pending_scroll());
        assert!(!manager.is_scroll_pending());
        assert!(!manager.apply_pending_scroll());
    }
}

/// Default proximity threshold, in rendered lines.
pub const DEFAULT_LOAD_MORE_THRESHOLD: u16 = 5;

/// Vertical scroll state of the feed viewport.
///
/// All quantities are in rendered lines. `viewport` and `content` are
/// refreshed from each frame's layout; `offset` is clamped to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMonitor {
    offset: usize,
    viewport: usize,
    content: usize,
    threshold: usize,
}

impl Default for ScrollMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_MORE_THRESHOLD)
    }
}

impl ScrollMonitor {
    pub fn new(threshold: u16) -> Self {
        Self {
            offset: 0,
            viewport: 0,
            content: 0,
            threshold: threshold as usize,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn content(&self) -> usize {
        self.content
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Largest offset that still fills the viewport.
    pub fn max_offset(&self) -> usize {
        self.content.saturating_sub(self.viewport)
    }

    /// Record the heights measured during layout.
    pub fn set_extent(&mut self, viewport: usize, content: usize) {
        self.viewport = viewport;
        self.content = content;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Move by `delta` lines. Returns true if the offset changed.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let target = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.scroll_to(target)
    }

    /// Jump to an absolute offset. Returns true if the offset changed.
    pub fn scroll_to(&mut self, offset: usize) -> bool {
        let clamped = offset.min(self.max_offset());
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        self.scroll_to(self.max_offset())
    }

    /// Keep the line range `[start, end)` visible, moving the minimum amount.
    pub fn reveal(&mut self, start: usize, end: usize) -> bool {
        if start < self.offset {
            self.scroll_to(start)
        } else if end > self.offset + self.viewport {
            self.scroll_to(end.saturating_sub(self.viewport).min(start))
        } else {
            false
        }
    }

    /// True when the bottom of the viewport is within `threshold` lines of
    /// the end of the content.
    pub fn near_bottom(&self) -> bool {
        self.offset + self.viewport + self.threshold >= self.content
    }

    /// The position indicator is shown once the user has scrolled past the
    /// threshold.
    pub fn show_indicator(&self) -> bool {
        self.offset > self.threshold
    }

    /// Percentage through the scrollable range, for the indicator.
    pub fn percent(&self) -> u16 {
        let max = self.max_offset();
        if max == 0 {
            return 100;
        }
        ((self.offset * 100) / max) as u16
    }
}

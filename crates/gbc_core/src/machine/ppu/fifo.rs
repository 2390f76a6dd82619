/// Upper bound on queued pixels: a push is only accepted at eight or fewer.
pub(crate) const FIFO_CAPACITY: usize = 16;

/// Fixed-capacity ring buffer of composed ARGB pixels.
#[derive(Debug, Clone)]
pub(crate) struct PixelFifo {
    pixels: [u32; FIFO_CAPACITY],
    head: usize,
    len: usize,
}

impl Default for PixelFifo {
    fn default() -> Self {
        Self {
            pixels: [0; FIFO_CAPACITY],
            head: 0,
            len: 0,
        }
    }
}

impl PixelFifo {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Returns `false` and drops the pixel when the buffer is full.
    pub(crate) fn push(&mut self, pixel: u32) -> bool {
        if self.len == FIFO_CAPACITY {
            return false;
        }
        self.pixels[(self.head + self.len) % FIFO_CAPACITY] = pixel;
        self.len += 1;
        true
    }

    pub(crate) fn pop(&mut self) -> Option<u32> {
        if self.len == 0 {
            return None;
        }
        let pixel = self.pixels[self.head];
        self.head = (self.head + 1) % FIFO_CAPACITY;
        self.len -= 1;
        Some(pixel)
    }
}

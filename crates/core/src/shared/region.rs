/// Axis-aligned rectangle in frame pixel coordinates.
///
/// Used to select the area a key color is sampled from. Coordinates may
/// extend past the frame; [`Region::clip`] restricts them to the visible part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// Intersection with a `frame_w` x `frame_h` frame, or `None` if empty.
    pub fn clip(&self, frame_w: u32, frame_h: u32) -> Option<Region> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x.saturating_add(self.width)).min(frame_w as i32);
        let y1 = (self.y.saturating_add(self.height)).min(frame_h as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Region::new(x0, y0, x1 - x0, y1 - y0))
    }
}

//! frame.rs — RGB888 pixel buffer returned by `step` and `render`

pub type Rgb = [u8; 3];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    /// Row-major `[r,g,b, r,g,b, ...]`, `width * height * 3` bytes.
    pub rgb: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        let mut rgb = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height { rgb.extend_from_slice(&fill); }
        Frame { width, height, rgb }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool { x < self.width && y < self.height }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if !self.contains(x, y) { return None; }
        let o = (y * self.width + x) * 3;
        Some([self.rgb[o], self.rgb[o + 1], self.rgb[o + 2]])
    }

    pub fn put_pixel(&mut self, x: usize, y: usize, c: Rgb) {
        if !self.contains(x, y) { return; }
        let o = (y * self.width + x) * 3;
        self.rgb[o..o + 3].copy_from_slice(&c);
    }

    /// Fill a rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, c: Rgb) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for py in y.min(self.height)..y_end {
            for px in x.min(self.width)..x_end { self.put_pixel(px, py, c); }
        }
    }

    /// Coarse luminance dump, every second row, for terminal output.
    pub fn to_ascii(&self) -> String {
        let palette = ['.', '+', '#', '@'];
        let mut out = String::with_capacity((self.width + 1) * (self.height / 2));
        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let [r, g, b] = self.pixel(x, y).unwrap_or([0, 0, 0]);
                let luma = (r as u32 * 30 + g as u32 * 59 + b as u32 * 11) / 100;
                out.push(palette[(luma / 64).min(3) as usize]);
            }
            out.push('\n');
        }
        out
    }
}

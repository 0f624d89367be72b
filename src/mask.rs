//! Bit-packed pixel collision masks.
//!
//! A [`CollisionMask`] is a width × height grid of solid/empty bits derived
//! from a bitmap's alpha channel.  Cars own a mask rebuilt from their sprite
//! mask every time their heading changes; the track owns one immutable mask
//! where solid pixels are walls.
//!
//! Overlap tests place the second mask's top-left corner at an integer offset
//! inside the first mask's coordinate space, the same convention sprite rects
//! use on screen, so two masks overlap at `other.origin - self.origin`.

use bevy::math::{IVec2, UVec2};

/// Alpha values strictly above this count as solid.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl CollisionMask {
    /// An empty (all clear) mask.
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// A mask with every pixel solid.
    pub fn filled(width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        mask.fill_rect(0, 0, width, height);
        mask
    }

    /// Build a mask from tightly packed RGBA8 pixels (row-major, 4 bytes per pixel).
    ///
    /// Returns `None` when the buffer is shorter than `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        let needed = width as usize * height as usize * 4;
        if rgba.len() < needed {
            return None;
        }
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let alpha = rgba[(y as usize * width as usize + x as usize) * 4 + 3];
                if alpha > ALPHA_THRESHOLD {
                    mask.set(x, y, true);
                }
            }
        }
        Some(mask)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> (usize, u64) {
        let word = y as usize * self.words_per_row + (x as usize >> 6);
        (word, 1u64 << (x & 63))
    }

    /// Whether the pixel at `(x, y)` is solid.  Out-of-bounds reads are clear.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        let (word, bit) = self.index(x as u32, y as u32);
        self.bits[word] & bit != 0
    }

    /// Set or clear one pixel.  Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.index(x, y);
        if solid {
            self.bits[word] |= bit;
        } else {
            self.bits[word] &= !bit;
        }
    }

    /// Mark a rectangle solid, clipped to the mask bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                self.set(px, py, true);
            }
        }
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether any solid pixel of `other`, placed with its top-left corner at
    /// `offset` in this mask's coordinates, lands on a solid pixel here.
    pub fn overlaps(&self, other: &CollisionMask, offset: IVec2) -> bool {
        // Intersection of the two rectangles in self's coordinates.
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        for y in y0..y1 {
            let oy = y - offset.y;
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, oy) {
                    return true;
                }
            }
        }
        false
    }

    /// Rotate counter-clockwise (as seen on screen, +Y down) by `degrees`.
    ///
    /// The result is sized to the bounding box of the rotated rectangle and
    /// keeps the source centred, matching how rotated sprites are drawn.
    /// Sampling is nearest-neighbour from each destination pixel centre.
    pub fn rotated(&self, degrees: f32) -> CollisionMask {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        // The epsilon absorbs f32 noise at right angles (cos 90° is not 0).
        let extent = |v: f32| (v - 1e-3).ceil().max(1.0) as u32;
        let out_w = extent(w * cos.abs() + h * sin.abs());
        let out_h = extent(w * sin.abs() + h * cos.abs());
        let mut out = CollisionMask::new(out_w, out_h);

        let (half_out_w, half_out_h) = (out_w as f32 / 2.0, out_h as f32 / 2.0);
        let (half_w, half_h) = (w / 2.0, h / 2.0);
        for y in 0..out_h {
            let oy = y as f32 + 0.5 - half_out_h;
            for x in 0..out_w {
                let ox = x as f32 + 0.5 - half_out_w;
                // Inverse rotation back into source space.
                let sx = cos * ox - sin * oy + half_w;
                let sy = sin * ox + cos * oy + half_h;
                if self.get(sx.floor() as i32, sy.floor() as i32) {
                    out.set(x, y, true);
                }
            }
        }
        out
    }

    /// Nearest-neighbour resample to `width` × `height`.
    pub fn scaled(&self, width: u32, height: u32) -> CollisionMask {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = CollisionMask::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        let sx = self.width as f32 / width.max(1) as f32;
        let sy = self.height as f32 / height.max(1) as f32;
        for y in 0..height {
            let src_y = ((y as f32 + 0.5) * sy) as i32;
            for x in 0..width {
                let src_x = ((x as f32 + 0.5) * sx) as i32;
                if self.get(src_x, src_y) {
                    out.set(x, y, true);
                }
            }
        }
        out
    }
}

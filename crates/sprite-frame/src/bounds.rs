/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == width && self.height == height
    }
}

/// Bounding box of all pixels with non-zero alpha.
///
/// `alpha` is a row-major plane of `width * height` values. Returns `None`
/// when every pixel is fully transparent (or the plane is empty).
pub fn opaque_bounds(width: u32, height: u32, alpha: &[u8]) -> Option<Bounds> {
    debug_assert_eq!(alpha.len() as u64, width as u64 * height as u64);
    if width == 0 {
        return None;
    }

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;

    for (y, row) in alpha.chunks_exact(width as usize).enumerate() {
        let Some(first) = row.iter().position(|&a| a != 0) else {
            continue;
        };
        // A row with one opaque pixel has a last one as well.
        let last = row.iter().rposition(|&a| a != 0).unwrap_or(first);
        let y = y as u32;
        min_x = min_x.min(first as u32);
        max_x = max_x.max(last as u32);
        min_y = min_y.min(y);
        max_y = y;
    }

    (min_x != u32::MAX).then(|| Bounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

//! Binary-tree rectangle packer.
//!
//! Each occupied region splits its remaining space into two children: the
//! strip below the occupant (as wide as the occupant plus its border) and
//! everything to its right. Rectangles are tried against the first child
//! before the second.

/// Top-left pixel of a packed rectangle, inside its border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// A rectangular area that rectangles can be packed into.
#[derive(Debug)]
pub struct PackRegion {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    occupied: bool,
    children: Option<Box<(PackRegion, PackRegion)>>,
}

impl PackRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            occupied: false,
            children: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Places a `width` x `height` rectangle surrounded by `border` pixels on
    /// every side. Returns `None` if no free region can hold it.
    pub fn pack(&mut self, width: u32, height: u32, border: u32) -> Option<Placement> {
        if self.occupied {
            let (below, right) = self.children.as_deref_mut()?;
            return below
                .pack(width, height, border)
                .or_else(|| right.pack(width, height, border));
        }

        let outer_w = width.checked_add(border * 2)?;
        let outer_h = height.checked_add(border * 2)?;
        if outer_w > self.width || outer_h > self.height {
            return None;
        }

        self.occupied = true;
        self.children = Some(Box::new((
            PackRegion::new(self.x, self.y + outer_h, outer_w, self.height - outer_h),
            PackRegion::new(self.x + outer_w, self.y, self.width - outer_w, self.height),
        )));
        Some(Placement {
            x: self.x + border,
            y: self.y + border,
        })
    }

    /// Number of rectangles packed into this region and its children.
    pub fn packed_count(&self) -> usize {
        let own = usize::from(self.occupied);
        match &self.children {
            Some(children) => own + children.0.packed_count() + children.1.packed_count(),
            None => own,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_rectangle_goes_to_origin() {
        let mut region = PackRegion::new(0, 0, 32, 32);
        assert_eq!(region.pack(16, 16, 0), Some(Placement { x: 0, y: 0 }));
    }

    #[test]
    fn test_fills_below_before_right() {
        let mut region = PackRegion::new(0, 0, 32, 32);
        region.pack(16, 16, 0);
        assert_eq!(region.pack(16, 16, 0), Some(Placement { x: 0, y: 16 }));
        assert_eq!(region.pack(16, 16, 0), Some(Placement { x: 16, y: 0 }));
        assert_eq!(region.pack(16, 16, 0), Some(Placement { x: 16, y: 16 }));
        assert_eq!(region.pack(1, 1, 0), None);
        assert_eq!(region.packed_count(), 4);
    }

    #[test]
    fn test_border_offsets_placement() {
        let mut region = PackRegion::new(0, 0, 20, 20);
        assert_eq!(region.pack(16, 16, 2), Some(Placement { x: 2, y: 2 }));
        assert_eq!(region.pack(1, 1, 2), None);
    }

    #[test]
    fn test_oversized_rectangle_rejected() {
        let mut region = PackRegion::new(0, 0, 16, 16);
        assert_eq!(region.pack(17, 4, 0), None);
        assert_eq!(region.pack(4, 15, 1), None);
        assert_eq!(region.packed_count(), 0);
    }

    #[test]
    fn test_narrow_strip_below_does_not_take_wide_rectangle() {
        let mut region = PackRegion::new(0, 0, 32, 32);
        region.pack(8, 8, 0);
        // The strip below is only 8 wide, so a 16-wide rectangle goes right.
        assert_eq!(region.pack(16, 8, 0), Some(Placement { x: 8, y: 0 }));
    }
}

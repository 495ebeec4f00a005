use image::math::Rect;

use super::args_helper::args;

args! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    Borders {
        "Number of pixels to cut away from the top edge"
        top: u32 = 0;

        "Number of pixels to cut away from the bottom edge"
        bottom: u32 = 0;

        "Number of pixels to cut away from the left edge"
        left: u32 = 0;

        "Number of pixels to cut away from the right edge"
        right: u32 = 0;
    }
}

impl BordersArgs {
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// The part of a `width` x `height` image that is left after removing the borders, or
    /// None if the borders meet or overlap.
    pub fn crop_rect(self, width: u32, height: u32) -> Option<Rect> {
        let (start_y, end_y) = (self.top, height.checked_sub(self.bottom)?);
        let (start_x, end_x) = (self.left, width.checked_sub(self.right)?);
        if start_y >= end_y || start_x >= end_x {
            return None;
        }

        Some(Rect {
            x: start_x,
            y: start_y,
            width: end_x - start_x,
            height: end_y - start_y,
        })
    }
}

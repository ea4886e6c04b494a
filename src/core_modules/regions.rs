// THEORY:
// The `regions` module is the spatial grouping layer. It takes the binary
// foreground mask for a single frame and identifies coherent connected
// components ("the subject" plus whatever noise survived smoothing), then
// reduces the winning component to an axis-aligned bounding box.
//
// Key architectural principles:
// 1.  **Stateless Utility**: Region extraction takes one mask and produces the
//     regions of that same mask. It has no memory of previous frames; all
//     temporal state lives in the background model.
// 2.  **Flood Fill over a Visited Grid**: Components are grown from each
//     unvisited foreground pixel with an explicit stack and 8-connectivity, so
//     diagonally touching pixels merge into one region the way external contour
//     extraction would treat them.
// 3.  **Largest Wins, Small Is Noise**: The subject is the largest component by
//     pixel area; a bounding box whose area falls under a caller-supplied
//     fraction of the frame is rejected as a noise blob rather than a subject.

use crate::core_modules::framing::BoundingBox;
use crate::core_modules::mask::ForegroundMask;
use tracing::trace;

/// A single connected foreground component within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Number of mask pixels in the component.
    pub area: usize,
    /// Axis-aligned extent of the component.
    pub bbox: BoundingBox,
}

/// Extracts every 8-connected foreground component from the mask.
pub fn find_regions(mask: &ForegroundMask) -> Vec<Region> {
    let width = mask.width() as i64;
    let height = mask.height() as i64;
    let mut visited = vec![false; (width * height) as usize];
    let mut regions = Vec::new();

    for start_y in 0..height {
        for start_x in 0..width {
            let start_index = (start_y * width + start_x) as usize;
            if visited[start_index] || !mask.get(start_x as u32, start_y as u32) {
                continue;
            }

            visited[start_index] = true;
            let mut stack = vec![(start_x, start_y)];
            let mut area = 0usize;
            let (mut min_x, mut min_y, mut max_x, mut max_y) =
                (start_x, start_y, start_x, start_y);

            while let Some((x, y)) = stack.pop() {
                area += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);

                for dy in -1..=1i64 {
                    for dx in -1..=1i64 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x + dx;
                        let ny = y + dy;
                        if nx < 0 || nx >= width || ny < 0 || ny >= height {
                            continue;
                        }
                        let neighbor_index = (ny * width + nx) as usize;
                        if !visited[neighbor_index] && mask.get(nx as u32, ny as u32) {
                            visited[neighbor_index] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }

            regions.push(Region {
                area,
                bbox: BoundingBox::new(
                    min_x as u32,
                    min_y as u32,
                    max_x as u32 + 1,
                    max_y as u32 + 1,
                ),
            });
        }
    }

    regions
}

/// Picks the subject's bounding box out of a mask: the largest component by
/// pixel area, unless its box covers less than `min_area_fraction` of the
/// frame. Such blobs are noise, not a person, and yield `None`.
pub fn select_subject(mask: &ForegroundMask, min_area_fraction: f64) -> Option<BoundingBox> {
    let regions = find_regions(mask);
    let largest = regions.into_iter().max_by_key(|region| region.area)?;
    let frame_area = mask.width() as f64 * mask.height() as f64;
    if (largest.bbox.area() as f64) < frame_area * min_area_fraction {
        trace!(
            area = largest.bbox.area(),
            floor = frame_area * min_area_fraction,
            "largest region under area floor; treating as noise"
        );
        return None;
    }
    Some(largest.bbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with_block(
        mask: &mut ForegroundMask,
        x0: u32,
        y0: u32,
        block_width: u32,
        block_height: u32,
    ) {
        for y in y0..y0 + block_height {
            for x in x0..x0 + block_width {
                mask.set(x, y, true);
            }
        }
    }

    #[test]
    fn finds_separate_components_with_correct_areas() {
        let mut mask = ForegroundMask::new(640, 480);
        mask_with_block(&mut mask, 10, 10, 50, 20); // 1000 px
        mask_with_block(&mut mask, 100, 100, 250, 200); // 50000 px
        let mut regions = find_regions(&mask);
        regions.sort_by_key(|region| region.area);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].area, 1000);
        assert_eq!(regions[1].area, 50000);
        assert_eq!(regions[1].bbox, BoundingBox::new(100, 100, 350, 300));
    }

    #[test]
    fn diagonal_touch_merges_into_one_region() {
        let mut mask = ForegroundMask::new(8, 8);
        mask.set(2, 2, true);
        mask.set(3, 3, true);
        let regions = find_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 2);
    }

    #[test]
    fn largest_component_wins_when_above_area_floor() {
        // 640x480 frame: 2% floor = 6144 px². The 50000 px² block clears it.
        let mut mask = ForegroundMask::new(640, 480);
        mask_with_block(&mut mask, 10, 10, 50, 20);
        mask_with_block(&mut mask, 100, 100, 250, 200);
        let subject = select_subject(&mask, 0.02);
        assert_eq!(subject, Some(BoundingBox::new(100, 100, 350, 300)));
    }

    #[test]
    fn all_components_below_floor_yield_none() {
        let mut mask = ForegroundMask::new(640, 480);
        mask_with_block(&mut mask, 10, 10, 50, 20); // 1000 px² < 6144 px²
        mask_with_block(&mut mask, 200, 200, 40, 25); // 1000 px² < 6144 px²
        assert_eq!(select_subject(&mask, 0.02), None);
    }

    #[test]
    fn empty_mask_yields_none() {
        let mask = ForegroundMask::new(640, 480);
        assert!(find_regions(&mask).is_empty());
        assert_eq!(select_subject(&mask, 0.02), None);
    }
}

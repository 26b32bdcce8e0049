use crate::shared::frame::Frame;
use crate::shared::geometry::{Circle, RoiRect};

/// Per-channel floor average over `rect`. Returns an empty vec for an empty rect.
pub fn block_average(frame: &Frame, rect: RoiRect) -> Vec<u8> {
    let channels = frame.channels() as usize;
    if rect.is_empty() {
        return Vec::new();
    }
    let mut sums = vec![0u64; channels];
    for row in rect.y..rect.y + rect.h {
        let start = frame.offset(rect.x, row);
        let line = &frame.data()[start..start + rect.w * channels];
        for px in line.chunks_exact(channels) {
            for (sum, &v) in sums.iter_mut().zip(px) {
                *sum += v as u64;
            }
        }
    }
    let count = (rect.w * rect.h) as u64;
    sums.into_iter().map(|s| (s / count) as u8).collect()
}

/// Block-averaging pixelation of the pixels inside `circle`.
///
/// The block grid is anchored at the top-left of the circle's bounding box
/// (clamped to the frame). Each block's average is taken over the whole
/// block, but only pixels inside the circle are overwritten.
pub fn pixelate_circle(frame: &mut Frame, circle: &Circle, block_size: u32) {
    let Some(roi) = circle.bounding_rect(frame.width(), frame.height()) else {
        return;
    };
    let block = (block_size.max(1)) as usize;
    let channels = frame.channels() as usize;

    let mut by = roi.y;
    while by < roi.y + roi.h {
        let bh = block.min(roi.y + roi.h - by);
        let mut bx = roi.x;
        while bx < roi.x + roi.w {
            let bw = block.min(roi.x + roi.w - bx);
            let cell = RoiRect {
                x: bx,
                y: by,
                w: bw,
                h: bh,
            };
            let avg = block_average(frame, cell);
            for row in by..by + bh {
                for col in bx..bx + bw {
                    if circle.contains_pixel(col, row) {
                        let off = frame.offset(col, row);
                        frame.data_mut()[off..off + channels].copy_from_slice(&avg);
                    }
                }
            }
            bx += block;
        }
        by += block;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(w: u32, h: u32) -> Frame {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for row in 0..h {
            for col in 0..w {
                let v = if (row + col) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Frame::new(data, w, h, 3, 0)
    }

    #[test]
    fn test_block_average_uniform() {
        let frame = Frame::new(vec![40u8; 10 * 10 * 4], 10, 10, 4, 0);
        let avg = block_average(
            &frame,
            RoiRect {
                x: 2,
                y: 2,
                w: 4,
                h: 3,
            },
        );
        assert_eq!(avg, vec![40, 40, 40, 40]);
    }

    #[test]
    fn test_block_average_floors() {
        // two pixels: 0 and 255 -> 127
        let frame = Frame::new(vec![0, 0, 0, 255, 255, 255], 2, 1, 3, 0);
        let avg = block_average(
            &frame,
            RoiRect {
                x: 0,
                y: 0,
                w: 2,
                h: 1,
            },
        );
        assert_eq!(avg, vec![127, 127, 127]);
    }

    #[test]
    fn test_block_average_empty_rect() {
        let frame = Frame::new(vec![0u8; 12], 2, 2, 3, 0);
        let avg = block_average(
            &frame,
            RoiRect {
                x: 0,
                y: 0,
                w: 0,
                h: 2,
            },
        );
        assert!(avg.is_empty());
    }

    #[test]
    fn test_pixelate_flattens_detail_inside_circle() {
        let mut frame = checkerboard(40, 40);
        let circle = Circle::new(20.0, 20.0, 10.0);
        pixelate_circle(&mut frame, &circle, 4);

        // Inside the circle every pixel of a full 4x4 checker block becomes ~127
        let v = frame.pixel(20, 20)[0];
        assert!((120..=135).contains(&v), "got {v}");
    }

    #[test]
    fn test_pixelate_leaves_outside_untouched() {
        let original = checkerboard(40, 40);
        let mut frame = original.clone();
        pixelate_circle(&mut frame, &Circle::new(20.0, 20.0, 10.0), 4);

        // Bounding-box corner is outside the circle
        assert_eq!(frame.pixel(10, 10), original.pixel(10, 10));
        assert_eq!(frame.pixel(0, 0), original.pixel(0, 0));
    }

    #[test]
    fn test_pixelate_huge_circle_clamps_to_frame() {
        let mut frame = checkerboard(16, 16);
        pixelate_circle(&mut frame, &Circle::new(8.0, 8.0, 500.0), 8);
        // Whole frame is inside; each 8x8 block averages to 127
        assert!(frame.data().iter().all(|&b| b == 127));
    }

    #[test]
    fn test_pixelate_outside_frame_is_noop() {
        let original = checkerboard(16, 16);
        let mut frame = original.clone();
        pixelate_circle(&mut frame, &Circle::new(-100.0, -100.0, 10.0), 4);
        assert_eq!(frame, original);
    }
}

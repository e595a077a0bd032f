// Image-level operations on whole frames: mirroring the camera and blending
// the whiteboard canvas over it.
use crate::error::Error;
use crate::types::{FrameBuffer, pack_rgb, unpack_rgb};

/// Flip a frame left-to-right in place, so moving your hand right moves the
/// cursor right (selfie view).
pub fn mirror_horizontal(fb: &mut FrameBuffer) {
    if fb.width == 0 {
        return;
    }
    for row in fb.pixels.chunks_exact_mut(fb.width) {
        row.reverse();
    }
}

/// Average two 0x00RRGGBB pixels channel by channel, rounding half up.
#[inline]
fn average_px(a: u32, b: u32) -> u32 {
    let (ar, ag, ab) = unpack_rgb(a);
    let (br, bg, bb) = unpack_rgb(b);
    let avg = |x: u8, y: u8| ((x as u16 + y as u16 + 1) / 2) as u8;
    pack_rgb(avg(ar, br), avg(ag, bg), avg(ab, bb))
}

/// Write `0.5 * live + 0.5 * canvas` into `dst`. All three must share one size.
/// Blank canvas pixels darken the video; strokes show at half strength.
pub fn blend_half_into(dst: &mut FrameBuffer, live: &FrameBuffer, canvas: &FrameBuffer) -> Result<(), Error> {
    for (what, other) in [("blend: live vs canvas", live), ("blend: dst vs canvas", &*dst)] {
        if !other.same_size(canvas) {
            return Err(Error::Dimension {
                what,
                left_w: other.width,
                left_h: other.height,
                right_w: canvas.width,
                right_h: canvas.height,
            });
        }
    }

    for ((out, &l), &c) in dst.pixels.iter_mut().zip(&live.pixels).zip(&canvas.pixels) {
        *out = average_px(l, c);
    }
    Ok(())
}

/// Allocate a new composite of `live` and `canvas` (used for screenshots).
pub fn blend_half(live: &FrameBuffer, canvas: &FrameBuffer) -> Result<FrameBuffer, Error> {
    let mut out = FrameBuffer::blank(canvas.width, canvas.height);
    blend_half_into(&mut out, live, canvas)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_averages_each_channel() {
        let live = FrameBuffer { width: 2, height: 1, pixels: vec![0x00_FF_FF_FF, 0x00_10_20_30] };
        let canvas = FrameBuffer { width: 2, height: 1, pixels: vec![0x00_00_00_00, 0x00_10_00_31] };
        let out = blend_half(&live, &canvas).unwrap();
        assert_eq!(out.pixels, vec![0x00_80_80_80, 0x00_10_10_31]);
    }

    #[test]
    fn blend_rejects_mismatched_sizes() {
        let live = FrameBuffer::blank(4, 4);
        let canvas = FrameBuffer::blank(4, 3);
        let err = blend_half(&live, &canvas).unwrap_err();
        assert!(matches!(err, Error::Dimension { left_h: 4, right_h: 3, .. }));
    }

    #[test]
    fn mirror_reverses_rows() {
        let mut fb = FrameBuffer { width: 3, height: 2, pixels: vec![1, 2, 3, 4, 5, 6] };
        mirror_horizontal(&mut fb);
        assert_eq!(fb.pixels, vec![3, 2, 1, 6, 5, 4]);
    }
}

// Opens a webcam and hands out frames as packed 0x00RRGGBB buffers, the same
// layout the canvas and the window use.

use tracing::info;

use crate::error::Error;
use crate::types::{FrameBuffer, pack_rgb};
use crate::vision::mirror_horizontal;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    /// Flip frames left-to-right before handing them out.
    mirror: bool,
}

impl CameraCapture {
    /// Open camera `index` as close as possible to `width`×`height` @ 30 FPS.
    pub fn new(index: u32, width: u32, height: u32, mirror: bool) -> Result<Self, Error> {
        let fmt = CameraFormat::new(Resolution::new(width, height), FrameFormat::YUYV, 30);
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream may settle on a different resolution than requested.
        let actual = cam.resolution();
        info!(
            index,
            requested = %format!("{width}x{height}"),
            actual = %format!("{}x{}", actual.width(), actual.height()),
            "camera opened"
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
            mirror,
        })
    }

    /// Grab one frame (blocks until the camera delivers it).
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let pixels = rgb_img
            .pixels()
            .map(|p| pack_rgb(p[0], p[1], p[2]))
            .collect();

        let mut fb = FrameBuffer { width: w as usize, height: h as usize, pixels };
        if self.mirror {
            mirror_horizontal(&mut fb);
        }
        Ok(fb)
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

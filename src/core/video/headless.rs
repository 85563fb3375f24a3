//=========================================================================
// Headless Presenter
//
// A `FramePresenter` whose "texture" is a CPU byte array. Used for
// timedemo/replay runs without a window, and as the reference
// implementation of the present contract in tests.
//
// The texture is sized and filled exactly like a GPU presenter's:
// power-of-two box, stored image in the top-left sub-rectangle.
//
//=========================================================================

//=== External Crates =====================================================
use log::{debug, trace};

//=== Internal Modules ====================================================
use super::frame::{FrameBuffer, FrameFormat, FrameLayout, FrameSize, BYTES_PER_PIXEL};
use super::geometry::texture_size_for;
use super::{
    check_frame, log_initialization, prepare_display, FramePresenter, SharedDisplay, VideoError,
};
use crate::core::config::SharedConfig;

//=== HeadlessPresenter ===================================================

pub struct HeadlessPresenter {
    format: FrameFormat,
    texture_size: FrameSize,
    texture: Vec<u8>,
    frames_presented: u64,
    display: SharedDisplay,
}

impl HeadlessPresenter {
    pub fn new(
        config: &SharedConfig,
        display: SharedDisplay,
        layout: FrameLayout,
    ) -> Result<Self, VideoError> {
        let format = prepare_display(config, &display, layout);
        log_initialization("headless", Ok(Self::with_format(format, display)))
    }

    /// Builds a presenter for an explicit format, bypassing the config.
    pub fn with_format(format: FrameFormat, display: SharedDisplay) -> Self {
        let texture_size = texture_size_for(format);
        debug!(target: "video", "Headless texture {} for {}", texture_size, format);

        Self {
            format,
            texture_size,
            texture: vec![0; texture_size.byte_len()],
            frames_presented: 0,
            display,
        }
    }

    //--- Inspection -------------------------------------------------------

    pub fn texture_size(&self) -> FrameSize {
        self.texture_size
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Texel at `(x, y)` in texture space.
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.texture_size.width || y >= self.texture_size.height {
            return None;
        }
        let at = (y as usize * self.texture_size.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.texture[at..at + BYTES_PER_PIXEL]);
        Some(rgba)
    }
}

impl FramePresenter for HeadlessPresenter {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), VideoError> {
        check_frame(self.format, frame)?;

        let src_stride = frame.row_stride();
        let dst_stride = self.texture_size.width as usize * BYTES_PER_PIXEL;

        for (row, src) in frame.data().chunks_exact(src_stride).enumerate() {
            let start = row * dst_stride;
            self.texture[start..start + src_stride].copy_from_slice(src);
        }

        self.frames_presented += 1;
        trace!(target: "video", "Headless frame {}", self.frames_presented);
        Ok(())
    }

    fn format(&self) -> FrameFormat {
        self.format
    }

    fn display(&self) -> &SharedDisplay {
        &self.display
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::video::StoredDisplaySettings;

    fn presenter(layout: FrameLayout, high_resolution: bool) -> HeadlessPresenter {
        let mut config = Config::default();
        config.video_highresolution = high_resolution;
        let size = FrameSize::for_resolution(high_resolution);
        HeadlessPresenter::new(
            &config.into_shared(),
            StoredDisplaySettings::new(size).into_shared(),
            layout,
        )
        .unwrap()
    }

    #[test]
    fn transposed_low_resolution_uses_256_by_512() {
        let presenter = presenter(FrameLayout::Transposed, false);
        assert_eq!(presenter.texture_size(), FrameSize::new(256, 512));
    }

    #[test]
    fn present_does_not_reallocate() {
        let mut presenter = presenter(FrameLayout::Transposed, true);
        let mut frame = FrameBuffer::new(presenter.format());
        let storage = presenter.texture.as_ptr();
        let len = presenter.texture.len();

        for shade in 0..5 {
            frame.fill([shade, 0, 0, 255]);
            presenter.present(&frame).unwrap();
            assert_eq!(presenter.texture.as_ptr(), storage);
            assert_eq!(presenter.texture.len(), len);
        }

        assert_eq!(presenter.frames_presented(), 5);
        assert_eq!(presenter.texture_size(), FrameSize::new(512, 1024));
    }

    #[test]
    fn mismatched_frame_is_rejected_untouched() {
        let mut presenter = presenter(FrameLayout::RowMajor, false);
        let mut wrong = FrameBuffer::new(FrameFormat::new(FrameSize::new(640, 400), FrameLayout::RowMajor));
        wrong.fill([255, 255, 255, 255]);

        let result = presenter.present(&wrong);

        assert!(matches!(result, Err(VideoError::FrameMismatch { .. })));
        assert_eq!(presenter.frames_presented(), 0);
        assert_eq!(presenter.texel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn row_major_frame_lands_top_left() {
        let mut presenter = presenter(FrameLayout::RowMajor, false);
        let mut frame = FrameBuffer::new(presenter.format());
        frame.set_pixel(319, 199, [1, 2, 3, 4]);

        presenter.present(&frame).unwrap();

        assert_eq!(presenter.texel(319, 199), Some([1, 2, 3, 4]));
        assert_eq!(presenter.texel(320, 199), Some([0, 0, 0, 0]));
    }

    #[test]
    fn transposed_frame_is_stored_column_per_row() {
        let mut presenter = presenter(FrameLayout::Transposed, false);
        let mut frame = FrameBuffer::new(presenter.format());
        frame.set_pixel(10, 3, [9, 8, 7, 6]);

        presenter.present(&frame).unwrap();

        // screen column 10 is texture row 10, screen row 3 is texel x 3
        assert_eq!(presenter.texel(3, 10), Some([9, 8, 7, 6]));
    }

    #[test]
    fn settings_forward_to_display() {
        let display = StoredDisplaySettings::new(FrameSize::new(320, 200)).into_shared();
        let mut presenter = HeadlessPresenter::with_format(
            FrameFormat::new(FrameSize::new(320, 200), FrameLayout::RowMajor),
            display.clone(),
        );

        presenter.set_window_size(4);
        presenter.set_gamma_correction_level(9);
        presenter.initialize_wipe();

        assert_eq!(display.borrow().window_size(), 4);
        assert_eq!(presenter.gamma_correction_level(), 9);
        assert_eq!(presenter.max_gamma_correction_level(), 10);
        assert_eq!(presenter.wipe_band_count(), 160);
    }
}

//=========================================================================
// Frame Buffer
//
// The CPU-side RGBA image the external renderer draws into each frame.
//
// Two storage layouts are supported:
// ```text
//   RowMajor     data[(y * width  + x) * 4]   (origin top-left)
//   Transposed   data[(x * height + y) * 4]   (one stored row per
//                                              screen column)
// ```
// The transposed layout is what a column-drawing software renderer
// produces naturally; presenters rotate it back when texturing the quad.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::fmt;

//=== Logical Resolutions =================================================

pub const SCREEN_WIDTH: u32 = 320;
pub const SCREEN_HEIGHT: u32 = 200;

pub const BYTES_PER_PIXEL: usize = 4;

//=== FrameSize ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 320x200, or 640x400 in high resolution.
    pub fn for_resolution(high_resolution: bool) -> Self {
        let scale = if high_resolution { 2 } else { 1 };
        Self::new(SCREEN_WIDTH * scale, SCREEN_HEIGHT * scale)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn byte_len(&self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

//=== FrameLayout =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrameLayout {
    #[default]
    RowMajor,
    Transposed,
}

impl FrameLayout {
    /// Width and height of the image as it sits in memory.
    pub fn stored_size(self, logical: FrameSize) -> FrameSize {
        match self {
            Self::RowMajor => logical,
            Self::Transposed => FrameSize::new(logical.height, logical.width),
        }
    }
}

//=== FrameFormat =========================================================

/// Logical size plus storage layout: everything a presenter needs to know
/// about the frames it will receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    pub size: FrameSize,
    pub layout: FrameLayout,
}

impl FrameFormat {
    pub fn new(size: FrameSize, layout: FrameLayout) -> Self {
        Self { size, layout }
    }

    pub fn stored_size(&self) -> FrameSize {
        self.layout.stored_size(self.size)
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.size, self.layout)
    }
}

//=== FrameBuffer =========================================================

pub struct FrameBuffer {
    format: FrameFormat,
    data: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(format: FrameFormat) -> Self {
        Self {
            format,
            data: vec![0; format.size.byte_len()],
        }
    }

    pub fn format(&self) -> FrameFormat {
        self.format
    }

    pub fn size(&self) -> FrameSize {
        self.format.size
    }

    pub fn layout(&self) -> FrameLayout {
        self.format.layout
    }

    pub fn stored_size(&self) -> FrameSize {
        self.format.stored_size()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes per stored row.
    pub fn row_stride(&self) -> usize {
        self.stored_size().width as usize * BYTES_PER_PIXEL
    }

    /// Byte offset of logical pixel `(x, y)`, or `None` if outside.
    pub fn offset_of(&self, x: u32, y: u32) -> Option<usize> {
        let size = self.format.size;
        if x >= size.width || y >= size.height {
            return None;
        }
        let index = match self.format.layout {
            FrameLayout::RowMajor => y as usize * size.width as usize + x as usize,
            FrameLayout::Transposed => x as usize * size.height as usize + y as usize,
        };
        Some(index * BYTES_PER_PIXEL)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let at = self.offset_of(x, y)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[at..at + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    /// Writes one logical pixel; out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(at) = self.offset_of(x, y) {
            self.data[at..at + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        }
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for pixel in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgba);
        }
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolutions() {
        assert_eq!(FrameSize::for_resolution(false), FrameSize::new(320, 200));
        assert_eq!(FrameSize::for_resolution(true), FrameSize::new(640, 400));
    }

    #[test]
    fn buffer_is_four_bytes_per_pixel() {
        let frame = FrameBuffer::new(FrameFormat::new(FrameSize::new(320, 200), FrameLayout::RowMajor));
        assert_eq!(frame.data().len(), 4 * 320 * 200);
    }

    #[test]
    fn transposed_layout_swaps_stored_size() {
        let format = FrameFormat::new(FrameSize::new(320, 200), FrameLayout::Transposed);
        assert_eq!(format.stored_size(), FrameSize::new(200, 320));
    }

    #[test]
    fn row_major_offsets() {
        let frame = FrameBuffer::new(FrameFormat::new(FrameSize::new(4, 3), FrameLayout::RowMajor));

        assert_eq!(frame.offset_of(0, 0), Some(0));
        assert_eq!(frame.offset_of(1, 0), Some(4));
        assert_eq!(frame.offset_of(0, 1), Some(16));
        assert_eq!(frame.offset_of(4, 0), None);
        assert_eq!(frame.row_stride(), 16);
    }

    #[test]
    fn transposed_offsets() {
        let frame = FrameBuffer::new(FrameFormat::new(FrameSize::new(4, 3), FrameLayout::Transposed));

        assert_eq!(frame.offset_of(0, 1), Some(4));
        assert_eq!(frame.offset_of(1, 0), Some(12));
        assert_eq!(frame.offset_of(0, 3), None);
        assert_eq!(frame.row_stride(), 12);
    }

    #[test]
    fn set_and_read_pixel() {
        let mut frame =
            FrameBuffer::new(FrameFormat::new(FrameSize::new(8, 8), FrameLayout::Transposed));

        frame.set_pixel(5, 2, [1, 2, 3, 4]);
        frame.set_pixel(99, 99, [9, 9, 9, 9]);

        assert_eq!(frame.pixel(5, 2), Some([1, 2, 3, 4]));
        assert_eq!(frame.pixel(2, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn fill_covers_every_pixel() {
        let mut frame = FrameBuffer::new(FrameFormat::new(FrameSize::new(3, 2), FrameLayout::RowMajor));
        frame.fill([7, 7, 7, 255]);
        assert!(frame.data().chunks(4).all(|p| p == [7, 7, 7, 255]));
    }
}

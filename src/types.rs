// Core raster types shared by the editor, the mask export and the window.

/// What the window shows. Same layout minifb wants.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // buffer width in pixels (the image's native width)
    pub height: usize,     // buffer height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// The layer the user paints into, at the source image's resolution.
/// Visual: shown as a translucent tint; logically every pixel is either painted or not.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintLayer {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>, // length = width * height, 0 = untouched, 255 = painted
}

impl PaintLayer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, coverage: vec![0; width * height] }
    }

    pub fn clear(&mut self) {
        self.coverage.fill(0);
    }
}

/// Binary black/white mask handed to the inpainting step (white = repaint here).
pub type MaskImage = image::GrayImage;

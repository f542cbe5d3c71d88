// Freehand mask painting for AI inpainting.
//
// `MaskRegionEditor` turns pointer strokes over a photo into a binary
// mask at the photo's native resolution and a coarse `{position, size}` label
// pair for prompts. The rest of the crate is the window that hosts it.

pub mod cli;
pub mod config;
pub mod draw;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod handoff;
pub mod overlay;
pub mod region;
pub mod source;
pub mod types;
pub mod vision;

pub use editor::{EditorEvent, EditorState, MaskRegionEditor, StrokeOutcome};
pub use error::Error;
pub use geometry::{DisplaySize, Point, PointerEvent, StrokeBounds, to_image_space};
pub use region::{PositionLabel, RegionDescriptor, SizeLabel};
pub use types::{MaskImage, PaintLayer};

// One error type for the whole tool.
// Every variant states *where* things went wrong.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed

    #[error("Image load error: {0}")]
    ImageLoad(String), // Opening/decoding the source photo failed

    #[error("Clipboard error: {0}")]
    Clipboard(String), // Nothing usable on the clipboard, or the clipboard is unavailable

    #[error("Overlay error: {0}")]
    Overlay(String), // Tint could not be laid over the photo (layer and photo disagree on size)

    #[error("Mask render error: {0}")]
    MaskRender(String), // PaintLayer could not be turned into a black/white raster

    #[error("A stroke is still in progress")]
    StrokeActive, // Export asked for while the user is still painting

    #[error("No image loaded")]
    NoImage,

    #[error("Export error: {0}")]
    Export(String), // Writing the mask / sidecar to disk failed

    #[error("Config error: {0}")]
    Config(String),
}

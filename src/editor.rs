// The mask editor: one source photo, one paint layer of the same size, and the
// box around everything painted so far.
//
// State machine:
//   Idle --load_image--> Ready(empty) --begin_stroke--> Painting --end_stroke--> Ready(mask)
//   clear(): Ready(*) -> Ready(empty)        load_image(): any -> Ready(empty)
//
// Results go two ways: returned to the caller, and queued as `EditorEvent`s for
// whoever else cares (the window HUD, the handoff writer).

use std::collections::VecDeque;

use image::RgbaImage;

use crate::error::Error;
use crate::geometry::{Point, PointerEvent, StrokeBounds, scale_factors};
use crate::region::{RegionDescriptor, classify};
use crate::types::{MaskImage, PaintLayer};
use crate::vision::{paint_dab, render_mask};

/// Brush diameter in display pixels when nothing else is configured.
pub const DEFAULT_BRUSH_SIZE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// No image yet; strokes are ignored.
    Idle,
    /// Image loaded, no gesture in progress.
    Ready { mask_present: bool },
    /// Between `begin_stroke` and `end_stroke`.
    Painting,
}

/// What a finished stroke produces. Labels and mask fail independently:
/// a broken mask render still leaves `region` usable.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeOutcome {
    pub region: RegionDescriptor,
    /// Clamped to the image.
    pub bounds: StrokeBounds,
    pub mask: Result<MaskImage, Error>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// New source photo; downstream code may pick an output resolution from it.
    ImageLoaded { width: u32, height: u32 },
    /// A stroke ended with paint on the layer.
    RegionUpdated(StrokeOutcome),
    /// Mask wiped: no region, no mask.
    Cleared { width: u32, height: u32 },
}

struct Session {
    source: RgbaImage,
    paint: PaintLayer,
    bounds: Option<StrokeBounds>, // unclamped while painting, clamped once the stroke ends
    stroke_active: bool,
}

impl Session {
    fn dimensions(&self) -> (u32, u32) {
        self.source.dimensions()
    }
}

pub struct MaskRegionEditor {
    session: Option<Session>,
    brush_size: f64, // diameter, display pixels
    revision: u64,   // bumps whenever the paint layer changes, so views know to redraw
    events: VecDeque<EditorEvent>,
}

impl Default for MaskRegionEditor {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_SIZE)
    }
}

impl MaskRegionEditor {
    pub fn new(brush_size: f64) -> Self {
        Self {
            session: None,
            brush_size: sanitize_brush(brush_size),
            revision: 0,
            events: VecDeque::new(),
        }
    }

    /// Take ownership of a new source photo. Paint and bounds start empty.
    /// Returns the native `(width, height)`.
    pub fn load_image(&mut self, source: RgbaImage) -> Result<(u32, u32), Error> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::ImageLoad(format!("image has no pixels ({width}x{height})")));
        }

        self.session = Some(Session {
            paint: PaintLayer::new(width as usize, height as usize),
            source,
            bounds: None,
            stroke_active: false,
        });
        self.revision += 1;
        log::info!("Loaded {width}x{height} image into the mask editor");
        self.events.push_back(EditorEvent::ImageLoaded { width, height });
        Ok((width, height))
    }

    /// Start a gesture and lay down the first dab. Ignored without an image.
    pub fn begin_stroke(&mut self, pointer: PointerEvent) {
        let Some(session) = self.session.as_mut() else { return };
        session.stroke_active = true;
        self.dab(pointer);
    }

    /// Paint at the pointer while a gesture is active.
    pub fn continue_stroke(&mut self, pointer: PointerEvent) {
        if !self.session.as_ref().is_some_and(|s| s.stroke_active) {
            return;
        }
        self.dab(pointer);
    }

    /// One dab at the pointer. The display→image ratio comes from this event only.
    fn dab(&mut self, pointer: PointerEvent) {
        let brush = self.brush_size;
        let Some(session) = self.session.as_mut() else { return };
        let Some(scale) = scale_factors(pointer.display, session.dimensions()) else {
            log::debug!("Ignoring pointer sample on a zero-sized display surface");
            return;
        };

        let center = Point::new(pointer.position.x * scale.x, pointer.position.y * scale.y);
        let radius = brush * scale.x / 2.0;

        if paint_dab(&mut session.paint, center, radius) > 0 {
            self.revision += 1;
        }
        let dab_box = StrokeBounds::from_circle(center, radius);
        session.bounds.get_or_insert(dab_box).include(dab_box);
    }

    /// Finish the gesture. With paint on the layer, clamps the bounds, labels them,
    /// renders the mask and emits both. Calling it again without new paint gives the same result.
    pub fn end_stroke(&mut self) -> Option<StrokeOutcome> {
        let session = self.session.as_mut()?;
        session.stroke_active = false;

        let (width, height) = session.dimensions();
        let bounds = session.bounds?.clamped(width, height);
        session.bounds = Some(bounds);

        let region = classify(&bounds, width, height);
        let mask = render_mask(&session.paint);
        match &mask {
            Ok(_) => log::debug!("Stroke finished: {region} ({bounds:?})"),
            Err(e) => log::warn!("Stroke finished: {region}, but the mask is unavailable: {e}"),
        }

        let outcome = StrokeOutcome { region, bounds, mask };
        self.events.push_back(EditorEvent::RegionUpdated(outcome.clone()));
        Some(outcome)
    }

    /// Wipe all paint. Any gesture in progress is dropped.
    pub fn clear(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        session.paint.clear();
        session.bounds = None;
        session.stroke_active = false;

        let (width, height) = session.dimensions();
        self.revision += 1;
        log::debug!("Mask cleared");
        self.events.push_back(EditorEvent::Cleared { width, height });
    }

    /// Strict black/white mask of the current paint. Refused mid-stroke.
    pub fn export_mask(&self) -> Result<MaskImage, Error> {
        let session = self.session.as_ref().ok_or(Error::NoImage)?;
        if session.stroke_active {
            return Err(Error::StrokeActive);
        }
        render_mask(&session.paint)
    }

    /// Labels for the current paint; `None` with no paint or mid-stroke.
    pub fn region(&self) -> Option<RegionDescriptor> {
        let session = self.session.as_ref()?;
        if session.stroke_active {
            return None;
        }
        let (width, height) = session.dimensions();
        session.bounds.map(|b| classify(&b, width, height))
    }

    pub fn state(&self) -> EditorState {
        match &self.session {
            None => EditorState::Idle,
            Some(s) if s.stroke_active => EditorState::Painting,
            Some(s) => EditorState::Ready { mask_present: s.bounds.is_some() },
        }
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.session.as_ref().map(Session::dimensions)
    }

    pub fn source(&self) -> Option<&RgbaImage> {
        self.session.as_ref().map(|s| &s.source)
    }

    pub fn paint_layer(&self) -> Option<&PaintLayer> {
        self.session.as_ref().map(|s| &s.paint)
    }

    /// Current box, unclamped if a stroke is still running.
    pub fn bounds(&self) -> Option<StrokeBounds> {
        self.session.as_ref().and_then(|s| s.bounds)
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.brush_size = sanitize_brush(size);
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Hand over everything emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = EditorEvent> + '_ {
        self.events.drain(..)
    }
}

fn sanitize_brush(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 { size } else { DEFAULT_BRUSH_SIZE }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DisplaySize;
    use crate::region::SizeLabel;

    // Display surface the same size as the image: display pixels == image pixels.
    fn at(x: f64, y: f64, size: u32) -> PointerEvent {
        PointerEvent::new(Point::new(x, y), DisplaySize::new(size as f64, size as f64))
    }

    fn editor_with(size: u32, brush: f64) -> MaskRegionEditor {
        let mut editor = MaskRegionEditor::new(brush);
        editor.load_image(RgbaImage::new(size, size)).unwrap();
        editor.drain_events().for_each(drop);
        editor
    }

    #[test]
    fn strokes_without_an_image_do_nothing() {
        let mut editor = MaskRegionEditor::default();
        editor.begin_stroke(at(5.0, 5.0, 10));
        editor.continue_stroke(at(6.0, 6.0, 10));
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.end_stroke().is_none());
        assert_eq!(editor.export_mask(), Err(Error::NoImage));
        assert_eq!(editor.drain_events().count(), 0);
    }

    #[test]
    fn empty_image_is_rejected() {
        let mut editor = MaskRegionEditor::default();
        assert!(matches!(editor.load_image(RgbaImage::new(0, 10)), Err(Error::ImageLoad(_))));
        assert_eq!(editor.state(), EditorState::Idle);
    }

    #[test]
    fn load_reports_native_dimensions() {
        let mut editor = MaskRegionEditor::default();
        assert_eq!(editor.load_image(RgbaImage::new(640, 480)).unwrap(), (640, 480));
        let events: Vec<_> = editor.drain_events().collect();
        assert_eq!(events, vec![EditorEvent::ImageLoaded { width: 640, height: 480 }]);
        assert_eq!(editor.state(), EditorState::Ready { mask_present: false });
    }

    #[test]
    fn walks_the_state_machine() {
        let mut editor = editor_with(100, 10.0);
        editor.begin_stroke(at(50.0, 50.0, 100));
        assert_eq!(editor.state(), EditorState::Painting);
        editor.continue_stroke(at(52.0, 50.0, 100));
        editor.end_stroke().unwrap();
        assert_eq!(editor.state(), EditorState::Ready { mask_present: true });
        editor.clear();
        assert_eq!(editor.state(), EditorState::Ready { mask_present: false });
        editor.load_image(RgbaImage::new(20, 30)).unwrap();
        assert_eq!(editor.state(), EditorState::Ready { mask_present: false });
        assert_eq!(editor.dimensions(), Some((20, 30)));
    }

    #[test]
    fn continue_without_begin_is_ignored() {
        let mut editor = editor_with(100, 10.0);
        editor.continue_stroke(at(50.0, 50.0, 100));
        assert!(editor.bounds().is_none());
        assert!(editor.paint_layer().unwrap().coverage.iter().all(|&c| c == 0));
    }

    #[test]
    fn loading_mid_stroke_drops_the_gesture() {
        let mut editor = editor_with(100, 10.0);
        editor.begin_stroke(at(50.0, 50.0, 100));
        assert_eq!(editor.state(), EditorState::Painting);

        editor.load_image(RgbaImage::new(80, 60)).unwrap();
        assert_eq!(editor.state(), EditorState::Ready { mask_present: false });
        assert_eq!(editor.bounds(), None);

        // The old gesture is gone: a late move paints nothing and there is nothing to finish.
        editor.continue_stroke(at(40.0, 30.0, 80));
        assert_eq!(editor.bounds(), None);
        assert_eq!(editor.end_stroke(), None);
        assert!(editor.export_mask().unwrap().pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn clearing_mid_stroke_drops_the_gesture() {
        let mut editor = editor_with(100, 10.0);
        editor.begin_stroke(at(50.0, 50.0, 100));
        editor.clear();
        assert_eq!(editor.state(), EditorState::Ready { mask_present: false });
        assert_eq!(editor.bounds(), None);

        editor.continue_stroke(at(60.0, 60.0, 100));
        assert_eq!(editor.bounds(), None);
        assert_eq!(editor.end_stroke(), None);
        assert!(editor.export_mask().unwrap().pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn nothing_to_classify_mid_stroke() {
        let mut editor = editor_with(100, 10.0);
        editor.begin_stroke(at(50.0, 50.0, 100));
        assert!(editor.region().is_none());
        assert_eq!(editor.export_mask(), Err(Error::StrokeActive));
        editor.end_stroke();
        assert!(editor.region().is_some());
        assert!(editor.export_mask().is_ok());
    }

    #[test]
    fn bounds_stay_unclamped_until_the_stroke_ends() {
        let mut editor = editor_with(100, 20.0);
        editor.begin_stroke(at(-30.0, 50.0, 100));
        let live = editor.bounds().unwrap();
        assert_eq!(live.min_x, -40.0);

        let outcome = editor.end_stroke().unwrap();
        assert_eq!(outcome.bounds, StrokeBounds::new(0.0, 40.0, 0.0, 60.0));
        assert_eq!(editor.bounds(), Some(outcome.bounds));
        assert_eq!(outcome.region.size, SizeLabel::Tiny);
    }

    #[test]
    fn end_stroke_twice_is_idempotent() {
        let mut editor = editor_with(200, 16.0);
        editor.begin_stroke(at(30.0, 170.0, 200));
        editor.continue_stroke(at(60.0, 150.0, 200));
        let first = editor.end_stroke().unwrap();
        let second = editor.end_stroke().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn radius_follows_horizontal_scale() {
        // 400px image shown at 200px: brush 20 display px -> 40 image px diameter.
        let mut editor = editor_with(400, 20.0);
        editor.begin_stroke(PointerEvent::new(
            Point::new(100.0, 100.0),
            DisplaySize::new(200.0, 200.0),
        ));
        editor.end_stroke();
        assert_eq!(editor.bounds(), Some(StrokeBounds::new(180.0, 180.0, 220.0, 220.0)));
    }

    #[test]
    fn zero_sized_display_is_skipped() {
        let mut editor = editor_with(100, 10.0);
        editor.begin_stroke(PointerEvent::new(Point::new(1.0, 1.0), DisplaySize::new(0.0, 0.0)));
        assert_eq!(editor.state(), EditorState::Painting);
        assert!(editor.bounds().is_none());
        assert!(editor.end_stroke().is_none());
    }

    #[test]
    fn clear_emits_and_resets() {
        let mut editor = editor_with(50, 10.0);
        editor.begin_stroke(at(25.0, 25.0, 50));
        editor.end_stroke();
        editor.clear();
        let events: Vec<_> = editor.drain_events().collect();
        assert!(matches!(events[0], EditorEvent::RegionUpdated(_)));
        assert_eq!(events[1], EditorEvent::Cleared { width: 50, height: 50 });
        assert!(editor.region().is_none());
        assert!(editor.export_mask().unwrap().pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn broken_mask_still_yields_labels() {
        let mut editor = editor_with(100, 10.0);
        editor.begin_stroke(at(10.0, 10.0, 100));
        editor.session.as_mut().unwrap().paint.coverage.truncate(5);
        let outcome = editor.end_stroke().unwrap();
        assert_eq!(outcome.region.position.to_string(), "top far left");
        assert!(matches!(outcome.mask, Err(Error::MaskRender(_))));
    }

    #[test]
    fn revision_tracks_paint_changes() {
        let mut editor = editor_with(100, 10.0);
        let start = editor.revision();
        editor.begin_stroke(at(50.0, 50.0, 100));
        assert!(editor.revision() > start);
        let painted = editor.revision();
        editor.continue_stroke(at(50.0, 50.0, 100)); // same spot, no new pixels
        assert_eq!(editor.revision(), painted);
    }

    #[test]
    fn bad_brush_sizes_fall_back() {
        let mut editor = MaskRegionEditor::new(-3.0);
        assert_eq!(editor.brush_size(), DEFAULT_BRUSH_SIZE);
        editor.set_brush_size(f64::NAN);
        assert_eq!(editor.brush_size(), DEFAULT_BRUSH_SIZE);
        editor.set_brush_size(12.0);
        assert_eq!(editor.brush_size(), 12.0);
    }
}

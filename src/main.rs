// What you SEE:
// • The photo, stretched to the window (resize the window freely).
// • Hold Left Mouse: paint a translucent tint over the part to be regenerated.
// • HUD shows where the painted region sits and how big it is ("top far left, tiny-sized").
// • C clears the mask. S saves mask.png + mask.json. V pastes a photo from the clipboard.
// • [ and ] change the brush size. ESC quits.

use clap::Parser;
use env_logger::Env;

use region_mask::cli::Cli;
use region_mask::config::Settings;
use region_mask::draw::{Drawer, draw_brush_ring, draw_text_5x7, fit_window};
use region_mask::editor::{EditorEvent, EditorState, MaskRegionEditor};
use region_mask::error::Error;
use region_mask::geometry::{PointerEvent, scale_factors, to_image_space};
use region_mask::handoff::{self, OutputResolution, Saved};
use region_mask::overlay::{self, GammaLut, Tint};
use region_mask::region::RegionDescriptor;
use region_mask::source;
use region_mask::types::FrameBuffer;

const TITLE: &str = "Region Mask";
const PLACEHOLDER_SIZE: (u32, u32) = (640, 480);
const PLACEHOLDER_GRAY: u32 = 0x00_30_30_30;
const RING_COLOR: u32 = 0x00_FF_CC_33; // yellow, like a cursor
const HUD_COLOR: u32 = 0x00_FF_FF_FF;
const BRUSH_STEP: f64 = 2.0; // display pixels per [ or ] press
const MIN_BRUSH: f64 = 2.0;
const KEY_HINTS: &str = "C CLEAR  S SAVE  V PASTE  [ ] BRUSH";

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    /* --- Settings: file first, then command-line overrides --- */
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);
    settings.validate()?;

    let lut = GammaLut::new();
    let tint = Tint { rgb: settings.overlay_color, opacity: settings.overlay_opacity };
    let mut editor = MaskRegionEditor::new(settings.brush_size);

    /* --- Optional photo from the command line ---
       Visual: the window opens already showing it. */
    if let Some(path) = &cli.image {
        editor.load_image(source::load_from_file(path)?)?;
    }
    let (img_w, img_h) = editor.dimensions().unwrap_or(PLACEHOLDER_SIZE);
    let (win_w, win_h) = fit_window(img_w, img_h, settings.max_window_width, settings.max_window_height);
    let mut drawer = Drawer::new(TITLE, win_w, win_h)?;

    /* --- Reusable buffers ---
       `base` is the flattened photo, `composed` adds the paint tint (rebuilt only
       when the paint changes), `screen` adds the ring + HUD every frame. */
    let mut base: Option<FrameBuffer> = None;
    let mut composed = placeholder();
    let mut screen = composed.clone();
    let mut seen_revision = u64::MAX;

    let mut was_down = false;
    let mut region: Option<RegionDescriptor> = None;
    let mut mask_ok = true;
    let mut output_res: Option<OutputResolution> = None;
    let mut notice = String::new();
    let mut shown_title = TITLE.to_string();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Keys */
        if drawer.v_pressed_once() {
            match source::paste_from_clipboard().and_then(|img| editor.load_image(img)) {
                Ok(_) => notice.clear(),
                Err(e) => {
                    log::warn!("Paste failed: {e}");
                    notice = "NOTHING TO PASTE".into();
                }
            }
        }
        if drawer.c_pressed_once() {
            editor.clear(); // visual: tint disappears
        }
        let step = drawer.brush_step();
        if step != 0 {
            let size = (editor.brush_size() + f64::from(step) * BRUSH_STEP).max(MIN_BRUSH);
            editor.set_brush_size(size); // visual: ring grows/shrinks
        }

        /* 2) Pointer -> stroke. Display size is read fresh each frame and travels
           with the event, so resizing mid-stroke cannot skew coordinates. */
        let display = drawer.display_size();
        let pointer = drawer.pointer();
        let down = drawer.left_mouse_down();
        match (was_down, down, pointer) {
            (false, true, Some(p)) => editor.begin_stroke(PointerEvent::new(p, display)),
            (true, true, Some(p)) => editor.continue_stroke(PointerEvent::new(p, display)),
            (true, false, _) => {
                editor.end_stroke();
            }
            _ => {}
        }
        was_down = down && (was_down || pointer.is_some());

        /* 3) Save the handoff files */
        if drawer.s_pressed_once() {
            notice = match save(&editor, &settings) {
                Ok(saved) => saved.notice(),
                Err(e) => {
                    log::warn!("Save failed: {e}");
                    "SAVE FAILED".into()
                }
            };
        }

        /* 4) React to what the editor emitted */
        let events: Vec<EditorEvent> = editor.drain_events().collect();
        for event in events {
            match event {
                EditorEvent::ImageLoaded { width, height } => {
                    let res = OutputResolution::for_source(width, height);
                    log::info!("Output resolution for {width}x{height}: {res}");
                    output_res = Some(res);
                    base = editor.source().map(|img| overlay::flatten_source(img, &lut));
                    // Visual: a pasted photo of another shape gets a window of its own shape.
                    let fit = fit_window(width, height, settings.max_window_width, settings.max_window_height);
                    if drawer.refit(fit)? {
                        was_down = false;
                    }
                    region = None;
                    mask_ok = true;
                }
                EditorEvent::RegionUpdated(outcome) => {
                    region = Some(outcome.region);
                    mask_ok = outcome.mask.is_ok();
                }
                EditorEvent::Cleared { .. } => {
                    region = None;
                    mask_ok = true;
                }
            }
        }

        /* 5) Re-tint only when the paint layer changed */
        if editor.revision() != seen_revision {
            if let (Some(base), Some(layer)) = (&base, editor.paint_layer()) {
                overlay::compose(base, layer, tint, &lut, &mut composed)?;
            }
            seen_revision = editor.revision();
        }
        screen.width = composed.width;
        screen.height = composed.height;
        screen.pixels.clone_from(&composed.pixels); // reuses the allocation

        /* 6) Brush ring + HUD, drawn in buffer pixels */
        let hud_scale = match scale_factors(display, (screen.width as u32, screen.height as u32)) {
            Some(s) => (2.0 * s.x).round().max(1.0) as i32,
            None => 1,
        };
        if let (Some(p), Some(dims)) = (pointer, editor.dimensions()) {
            if let (Some(at), Some(scale)) = (to_image_space(p, display, dims), scale_factors(display, dims)) {
                let radius = editor.brush_size() * scale.x / 2.0;
                draw_brush_ring(&mut screen, at.x, at.y, radius, hud_scale.max(1) / 2 + 1, RING_COLOR);
            }
        }
        let hud = hud_line(editor.state(), region.as_ref(), mask_ok, output_res, &notice);
        let margin = 4 * hud_scale;
        draw_text_5x7(&mut screen, margin, margin, &hud, HUD_COLOR, hud_scale);
        let hints_y = screen.height as i32 - margin - 8 * hud_scale;
        draw_text_5x7(&mut screen, margin, hints_y, KEY_HINTS, HUD_COLOR, hud_scale);

        /* 7) Present */
        drawer.present(&screen)?;
        let title = match &region {
            Some(r) => format!("{TITLE} - {r}"),
            None => TITLE.to_string(),
        };
        if title != shown_title {
            drawer.set_title(&title);
            shown_title = title;
        }
    }

    Ok(())
}

/// Mask (+ optional source) into the output dir.
fn save(editor: &MaskRegionEditor, settings: &Settings) -> Result<Saved, Error> {
    let mask = editor.export_mask()?;
    let source = if settings.save_source { editor.source() } else { None };
    handoff::save(&settings.output_dir, &mask, editor.region().as_ref(), source)
}

fn placeholder() -> FrameBuffer {
    let (w, h) = PLACEHOLDER_SIZE;
    let mut fb = FrameBuffer::new(w as usize, h as usize);
    fb.pixels.fill(PLACEHOLDER_GRAY);
    fb
}

fn hud_line(
    state: EditorState,
    region: Option<&RegionDescriptor>,
    mask_ok: bool,
    output_res: Option<OutputResolution>,
    notice: &str,
) -> String {
    let mut line = match (state, region) {
        (EditorState::Idle, _) => "V: PASTE AN IMAGE".to_string(),
        (EditorState::Painting, _) => "PAINTING".to_string(),
        (_, Some(r)) => r.to_string(),
        (_, None) => "PAINT THE AREA TO CHANGE".to_string(),
    };
    if !mask_ok {
        line.push_str(" | MASK UNAVAILABLE");
    }
    if let Some(res) = output_res {
        line.push_str(&format!(" | {res}"));
    }
    if !notice.is_empty() {
        line.push_str(" | ");
        line.push_str(notice);
    }
    line
}

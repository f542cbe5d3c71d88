// Raster work on the paint layer: laying down brush dabs and turning the
// layer into the strict black/white mask the inpainting step consumes.
use crate::error::Error;
use crate::geometry::Point;
use crate::types::{MaskImage, PaintLayer};

/// Coverage value written by a dab.
pub const PAINTED: u8 = 255;

/// Paint a filled circle into the layer at (cx, cy) in image pixels.
/// A pixel is covered when its center lies within `radius` of the dab center.
/// Parts of the circle outside the layer are dropped; returns how many pixels changed.
pub fn paint_dab(layer: &mut PaintLayer, center: Point, radius: f64) -> usize {
    if layer.width == 0 || layer.height == 0 || !(radius > 0.0) {
        return 0;
    }
    let w = layer.width as i64;
    let h = layer.height as i64;
    let r2 = radius * radius;

    // Scan only the circle's box, clipped to the layer.
    let x0 = ((center.x - radius).floor() as i64).max(0);
    let y0 = ((center.y - radius).floor() as i64).max(0);
    let x1 = ((center.x + radius).ceil() as i64).min(w - 1);
    let y1 = ((center.y + radius).ceil() as i64).min(h - 1);

    let mut changed = 0;
    for py in y0..=y1 {
        let dy = py as f64 + 0.5 - center.y;
        for px in x0..=x1 {
            let dx = px as f64 + 0.5 - center.x;
            if dx * dx + dy * dy > r2 { continue; }
            let idx = py as usize * layer.width + px as usize;
            if layer.coverage[idx] != PAINTED {
                layer.coverage[idx] = PAINTED;
                changed += 1;
            }
        }
    }
    changed
}

/// Black everywhere, white wherever the layer has any paint.
/// Independent of how the layer is tinted on screen.
pub fn render_mask(layer: &PaintLayer) -> Result<MaskImage, Error> {
    let expected = layer.width * layer.height;
    if layer.coverage.len() != expected {
        return Err(Error::MaskRender(format!(
            "paint layer holds {} pixels, expected {}x{} = {}",
            layer.coverage.len(),
            layer.width,
            layer.height,
            expected
        )));
    }
    let width = u32::try_from(layer.width)
        .map_err(|_| Error::MaskRender("width does not fit a mask raster".into()))?;
    let height = u32::try_from(layer.height)
        .map_err(|_| Error::MaskRender("height does not fit a mask raster".into()))?;

    let pixels: Vec<u8> = layer
        .coverage
        .iter()
        .map(|&c| if c != 0 { 255 } else { 0 })
        .collect();

    MaskImage::from_raw(width, height, pixels)
        .ok_or_else(|| Error::MaskRender("mask buffer size mismatch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dab_covers_a_disc() {
        let mut layer = PaintLayer::new(50, 50);
        let n = paint_dab(&mut layer, Point::new(25.0, 25.0), 5.0);
        // Area of a radius-5 disc is ~78.5; pixel sampling lands close to it.
        assert!((70..=90).contains(&n), "painted {n}");
        assert_eq!(layer.coverage[25 * 50 + 25], PAINTED);
        assert_eq!(layer.coverage[25 * 50 + 31], 0);
        assert_eq!(layer.coverage[0], 0);
    }

    #[test]
    fn repeated_dab_changes_nothing() {
        let mut layer = PaintLayer::new(20, 20);
        paint_dab(&mut layer, Point::new(10.0, 10.0), 4.0);
        assert_eq!(paint_dab(&mut layer, Point::new(10.0, 10.0), 4.0), 0);
    }

    #[test]
    fn dab_off_the_edge_is_clipped() {
        let mut layer = PaintLayer::new(10, 10);
        let n = paint_dab(&mut layer, Point::new(-2.0, -2.0), 4.0);
        assert!(n > 0);
        assert_eq!(layer.coverage[0], PAINTED);

        let far = paint_dab(&mut layer, Point::new(-100.0, 500.0), 4.0);
        assert_eq!(far, 0);
    }

    #[test]
    fn zero_radius_paints_nothing() {
        let mut layer = PaintLayer::new(10, 10);
        assert_eq!(paint_dab(&mut layer, Point::new(5.0, 5.0), 0.0), 0);
        assert!(layer.coverage.iter().all(|&c| c == 0));
    }

    #[test]
    fn mask_is_strictly_binary() {
        let mut layer = PaintLayer::new(30, 20);
        paint_dab(&mut layer, Point::new(10.0, 10.0), 6.0);
        layer.coverage[0] = 17; // partial coverage still counts as painted

        let mask = render_mask(&layer).unwrap();
        assert_eq!(mask.dimensions(), (30, 20));
        assert!(mask.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(mask.get_pixel(0, 0).0[0], 255);
        assert_eq!(mask.get_pixel(10, 10).0[0], 255);
        assert_eq!(mask.get_pixel(29, 19).0[0], 0);
    }

    #[test]
    fn empty_layer_renders_all_black() {
        let layer = PaintLayer::new(12, 7);
        let mask = render_mask(&layer).unwrap();
        assert_eq!(mask, MaskImage::new(12, 7));
    }

    #[test]
    fn inconsistent_layer_is_a_render_error() {
        let mut layer = PaintLayer::new(4, 4);
        layer.coverage.truncate(3);
        assert!(matches!(render_mask(&layer), Err(Error::MaskRender(_))));
    }
}

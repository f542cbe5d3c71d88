// What the user sees while painting: the photo, with a translucent tint where
// the paint layer is set. Display only; the exported mask never comes from here.
// Mixing happens in linear light through lookup tables so the tint edges stay clean.

use image::RgbaImage;

use crate::error::Error;
use crate::types::{FrameBuffer, PaintLayer};

/// sRGB <-> linear lookup tables.
pub struct GammaLut {
    to_linear: [f32; 256],    // sRGB byte -> linear 0..1
    to_srgb: [u8; 4096],      // linear quantized to 4096 steps -> sRGB byte
}

impl GammaLut {
    pub fn new() -> Self {
        let mut to_linear = [0.0f32; 256];
        for (v, slot) in to_linear.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut to_srgb = [0u8; 4096];
        for (i, slot) in to_srgb.iter_mut().enumerate() {
            let l = i as f32 / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { to_linear, to_srgb }
    }

    #[inline]
    fn linear(&self, v: u8) -> f32 {
        self.to_linear[v as usize]
    }

    #[inline]
    fn srgb(&self, l: f32) -> u8 {
        self.to_srgb[(l.clamp(0.0, 1.0) * 4095.0).round() as usize]
    }

    /// `a` of `over` on top of `under`, per channel, in linear light.
    #[inline]
    pub fn mix(&self, under: [u8; 3], over: [u8; 3], a: f32) -> [u8; 3] {
        let inv = 1.0 - a;
        let mut out = [0u8; 3];
        for c in 0..3 {
            out[c] = self.srgb(a * self.linear(over[c]) + inv * self.linear(under[c]));
        }
        out
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

/// Color and strength of the paint tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub rgb: [u8; 3],
    pub opacity: f32,
}

#[inline]
pub fn pack(rgb: [u8; 3]) -> u32 {
    (u32::from(rgb[0]) << 16) | (u32::from(rgb[1]) << 8) | u32::from(rgb[2])
}

#[inline]
pub fn unpack(px: u32) -> [u8; 3] {
    [((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8]
}

/// Flatten the photo onto white at native resolution.
/// Visual: transparent product cut-outs show up on a white card.
pub fn flatten_source(source: &RgbaImage, lut: &GammaLut) -> FrameBuffer {
    let (w, h) = source.dimensions();
    let mut frame = FrameBuffer::new(w as usize, h as usize);
    for (dst, px) in frame.pixels.iter_mut().zip(source.pixels()) {
        let [r, g, b, a] = px.0;
        *dst = match a {
            255 => pack([r, g, b]),
            0 => 0x00_FF_FF_FF,
            _ => pack(lut.mix([255, 255, 255], [r, g, b], f32::from(a) / 255.0)),
        };
    }
    frame
}

/// `out = base` with the tint mixed in wherever the layer has paint.
pub fn compose(
    base: &FrameBuffer,
    layer: &PaintLayer,
    tint: Tint,
    lut: &GammaLut,
    out: &mut FrameBuffer,
) -> Result<(), Error> {
    if layer.width != base.width || layer.height != base.height {
        return Err(Error::Overlay(format!(
            "paint layer is {}x{}, photo is {}x{}",
            layer.width, layer.height, base.width, base.height
        )));
    }
    if out.width != base.width || out.height != base.height {
        out.width = base.width;
        out.height = base.height;
        out.pixels.resize(base.pixels.len(), 0);
    }

    let a = tint.opacity.clamp(0.0, 1.0);
    for ((dst, &src), &cov) in out.pixels.iter_mut().zip(&base.pixels).zip(&layer.coverage) {
        *dst = if cov == 0 || a <= 0.0 {
            src // visual: untouched photo
        } else {
            pack(lut.mix(unpack(src), tint.rgb, a)) // visual: tinted where painted
        };
    }
    Ok(())
}

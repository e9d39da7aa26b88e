//! Musician tickets: a cosmetic PNG keyed on the gig's ticket payload.
//!
//! The image only looks like a QR code. Nothing decodes it; the venue's
//! scanner compares the raw payload string.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use encore_model::Gig;
use image::{ImageFormat, Rgb, RgbImage};

use crate::Error;

const INK: Rgb<u8> = Rgb([0xA8, 0x55, 0xF7]);
const PAPER: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);

/// Modules per side of a corner marker.
const MARKER_MODULES: f64 = 7.0;

/// Ticket image geometry.
#[derive(Clone, Debug)]
pub struct TicketOptions {
    /// Width and height in pixels.
    pub size: u32,

    /// Blank border in pixels.
    pub padding: u32,

    /// Modules per side of the pattern.
    pub modules: u32,
}

impl Default for TicketOptions {
    fn default() -> Self {
        Self {
            size: 400,
            padding: 40,
            modules: 25,
        }
    }
}

/// 32-bit string hash (`h * 31 + unit` over UTF-16 code units) seeding the
/// module pattern.
#[must_use]
pub fn pattern_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// `encoreats-ticket-<name>.png`, each whitespace run in the name replaced
/// by a single `-`.
#[must_use]
pub fn file_name(gig_name: &str) -> String {
    let mut slug = String::with_capacity(gig_name.len());
    let mut in_space = false;

    for c in gig_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }

    format!("encoreats-ticket-{slug}.png")
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fill(image: &mut RgbImage, x: f64, y: f64, side: f64, color: Rgb<u8>) {
    let x0 = x.round().max(0.0) as u32;
    let y0 = y.round().max(0.0) as u32;
    let x1 = ((x + side).round().max(0.0) as u32).min(image.width());
    let y1 = ((y + side).round().max(0.0) as u32).min(image.height());

    for py in y0..y1 {
        for px in x0..x1 {
            image.put_pixel(px, py, color);
        }
    }
}

fn marker(image: &mut RgbImage, x: f64, y: f64, module: f64) {
    let side = module * MARKER_MODULES;

    fill(image, x, y, side, INK);
    fill(image, x + module, y + module, side - module * 2.0, PAPER);
    fill(image, x + module * 2.0, y + module * 2.0, side - module * 4.0, INK);
}

/// Draws the ticket for `payload`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn render(payload: &str, options: &TicketOptions) -> RgbImage {
    let size = f64::from(options.size);
    let padding = f64::from(options.padding);
    let modules = options.modules.max(1);
    let module = (size - padding * 2.0) / f64::from(modules);
    let hash = pattern_hash(payload);

    let mut image = RgbImage::from_pixel(options.size, options.size, PAPER);

    for y in 0..modules {
        for x in 0..modules {
            let seed = hash.wrapping_add((x as i32) * 31 + (y as i32) * 17) & 0xFF;

            if seed % 2 == 0 {
                fill(
                    &mut image,
                    padding + f64::from(x) * module,
                    padding + f64::from(y) * module,
                    module,
                    INK,
                );
            }
        }
    }

    let far = size - padding - module * MARKER_MODULES;
    marker(&mut image, padding, padding, module);
    marker(&mut image, far, padding, module);
    marker(&mut image, padding, far, module);

    image
}

/// Encodes a rendered ticket as PNG.
///
/// # Errors
///
/// Returns `Image` if encoding fails.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(bytes)
}

/// Renders the ticket for `gig` and writes it into `dir`.
///
/// # Errors
///
/// Returns `Image` if encoding fails or `Io` if the file cannot be written.
pub async fn write_ticket(
    gig: &Gig,
    dir: &Path,
    options: &TicketOptions,
) -> Result<PathBuf, Error> {
    let bytes = encode_png(&render(&gig.ticket_payload(), options))?;
    let path = dir.join(file_name(&gig.name));

    tokio::fs::write(&path, bytes).await?;
    tracing::debug!(gig_id = %gig.id, path = %path.display(), "wrote ticket");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_hash() {
        assert_eq!(pattern_hash(""), 0);
        assert_eq!(pattern_hash("gig-1"), 98_351_145);
        assert_eq!(pattern_hash("gig-1792411200000"), 2_014_440_619);
    }

    #[test]
    fn test_file_name_collapses_whitespace() {
        assert_eq!(
            file_name("Friday  Night\tJazz"),
            "encoreats-ticket-Friday-Night-Jazz.png"
        );
        assert_eq!(file_name(" Solo "), "encoreats-ticket--Solo-.png");
    }

    #[test]
    fn test_render_draws_markers_inside_padding() {
        let options = TicketOptions::default();
        let image = render("gig-1", &options);

        assert_eq!(image.dimensions(), (400, 400));
        assert_eq!(*image.get_pixel(0, 0), PAPER);
        assert_eq!(*image.get_pixel(399, 399), PAPER);

        // Outer ring, white ring and core of the top-left marker.
        assert_eq!(*image.get_pixel(41, 41), INK);
        assert_eq!(*image.get_pixel(59, 59), PAPER);
        assert_eq!(*image.get_pixel(84, 84), INK);
    }

    #[test]
    fn test_payload_changes_the_pattern() {
        let options = TicketOptions::default();

        assert_ne!(render("gig-1", &options), render("gig-2", &options));
        assert_eq!(render("gig-1", &options), render("gig-1", &options));
    }

    #[test]
    fn test_png_round_trips_through_decoder() {
        let bytes = encode_png(&render("gig-7", &TicketOptions::default())).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();

        assert_eq!(decoded.width(), 400);
        assert_eq!(decoded.height(), 400);
    }
}

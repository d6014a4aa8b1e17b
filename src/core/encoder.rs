//! QR encoding engine.
//!
//! Wraps the `qrcode` matrix encoder and renders it to the requested output:
//! an RGB PNG raster, standalone SVG markup, or a base64 data URL. Encoding
//! is CPU-bound, so the async entry point hands off to the blocking pool.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageBuffer, ImageEncoder, Rgb, RgbImage};
use qrcode::QrCode;

use crate::core::options::{EcLevel, OutputFormat, QrOptions};

/// Rendered QR output, one variant per output format.
#[derive(Debug, Clone)]
pub enum Rendered {
    Png(Vec<u8>),
    Svg(String),
    DataUrl(String),
}

impl Rendered {
    /// The form embedded in JSON responses: PNG bytes become a data URL,
    /// SVG markup and data URLs are already strings.
    pub fn into_inline_string(self) -> String {
        match self {
            Rendered::Png(bytes) => png_data_url(&bytes),
            Rendered::Svg(svg) => svg,
            Rendered::DataUrl(url) => url,
        }
    }
}

/// Stateless encoding engine, shared across requests behind `Arc`.
pub struct QrEncoder;

impl QrEncoder {
    pub fn new() -> Self {
        QrEncoder
    }

    pub async fn render(&self, text: &str, options: &QrOptions) -> Result<Rendered> {
        let text = text.to_string();
        let options = options.clone();

        tokio::task::spawn_blocking(move || render_sync(&text, &options))
            .await
            .map_err(|e| anyhow!("task join error: {e}"))?
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn render_sync(text: &str, options: &QrOptions) -> Result<Rendered> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), ec_level(options.ec_level))
        .map_err(|e| anyhow!("QR encoding failed: {e}"))?;

    match options.format {
        OutputFormat::Svg => Ok(Rendered::Svg(render_svg(&code, options))),
        OutputFormat::Png => Ok(Rendered::Png(render_png(&code, options)?)),
        OutputFormat::Base64 => {
            let png = render_png(&code, options)?;
            Ok(Rendered::DataUrl(png_data_url(&png)))
        }
    }
}

fn ec_level(level: EcLevel) -> qrcode::EcLevel {
    match level {
        EcLevel::L => qrcode::EcLevel::L,
        EcLevel::M => qrcode::EcLevel::M,
        EcLevel::Q => qrcode::EcLevel::Q,
        EcLevel::H => qrcode::EcLevel::H,
    }
}

/// Draw the module matrix into an RGB raster. Modules are scaled by the
/// largest whole factor that keeps the image within the requested width.
fn render_png(code: &QrCode, options: &QrOptions) -> Result<Vec<u8>> {
    let dark = parse_hex_color(&options.dark_color)?;
    let light = parse_hex_color(&options.light_color)?;

    let modules = code.width();
    let margin = options.margin_modules as usize;
    let total = modules + 2 * margin;
    let scale = (options.width_px as usize / total).max(1);
    let img_size = (total * scale) as u32;

    let mut img: RgbImage = ImageBuffer::from_pixel(img_size, img_size, light);
    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let x = margin + i % modules;
        let y = margin + i / modules;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel((x * scale + dx) as u32, (y * scale + dy) as u32, dark);
            }
        }
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(img.as_raw(), img_size, img_size, ExtendedColorType::Rgb8)
        .context("PNG encoding failed")?;
    Ok(png)
}

/// Standalone SVG: background rect plus a single path of 1x1 module cells.
fn render_svg(code: &QrCode, options: &QrOptions) -> String {
    let modules = code.width();
    let margin = options.margin_modules as usize;
    let dimension = modules + 2 * margin;

    let mut path = String::new();
    for y in 0..modules {
        for x in 0..modules {
            if code[(x, y)] == qrcode::Color::Dark {
                if !path.is_empty() {
                    path.push(' ');
                }
                path.push_str(&format!("M{},{}h1v1h-1z", x + margin, y + margin));
            }
        }
    }

    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" ",
            "width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {dim} {dim}\" stroke=\"none\">\n",
            "<rect width=\"100%\" height=\"100%\" fill=\"#{light}\"/>\n",
            "<path d=\"{path}\" fill=\"#{dark}\"/>\n",
            "</svg>\n"
        ),
        size = options.width_px,
        dim = dimension,
        light = options.light_color,
        dark = options.dark_color,
        path = path,
    )
}

fn parse_hex_color(hex: &str) -> Result<Rgb<u8>> {
    let bytes = hex.as_bytes();
    if bytes.len() != 6 {
        return Err(anyhow!("invalid hex color `{hex}`"));
    }
    let channel = |i: usize| -> Result<u8> {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| anyhow!("invalid hex color `{hex}`"))
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png))
}

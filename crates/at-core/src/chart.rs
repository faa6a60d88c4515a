//! Inventory chart rendering.
//!
//! Draws a bar chart of asset counts per type into an in-memory PNG. The API
//! layer caches the returned bytes; rendering the same counts twice yields
//! byte-identical output.

use crate::{CoreError, CoreResult};
use image::ImageEncoder;
use plotters::prelude::*;
use serde::Serialize;

/// One bar: a type label and its count.
#[derive(Debug, Clone, Serialize)]
pub struct TypeCount {
    pub label: String,
    pub count: i64,
}

const WIDTH: u32 = 800;
const HEIGHT: u32 = 480;

pub fn render_inventory_chart(counts: &[TypeCount]) -> CoreResult<Vec<u8>> {
    if counts.is_empty() {
        return Err(CoreError::Chart("no categories to draw".to_string()));
    }

    let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0).max(1);

    let mut rgb = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| CoreError::Chart(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Asset inventory by type", ("sans-serif", 24))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(48)
            .build_cartesian_2d(0f64..counts.len() as f64, 0f64..(max as f64 * 1.1))
            .map_err(|e| CoreError::Chart(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(counts.len())
            .x_label_formatter(&|x| {
                labels
                    .get(x.floor() as usize)
                    .map(|l| l.to_string())
                    .unwrap_or_default()
            })
            .y_desc("count")
            .draw()
            .map_err(|e| CoreError::Chart(e.to_string()))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, c)| {
                Rectangle::new(
                    [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, c.count as f64)],
                    BLUE.mix(0.6).filled(),
                )
            }))
            .map_err(|e| CoreError::Chart(e.to_string()))?;

        root.present().map_err(|e| CoreError::Chart(e.to_string()))?;
    }

    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(&rgb, WIDTH, HEIGHT, image::ExtendedColorType::Rgb8)
        .map_err(|e| CoreError::Chart(e.to_string()))?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> Vec<TypeCount> {
        vec![
            TypeCount { label: "DESKTOP".to_string(), count: 4 },
            TypeCount { label: "LAPTOP".to_string(), count: 9 },
            TypeCount { label: "MONITOR".to_string(), count: 0 },
        ]
    }

    #[test]
    fn test_renders_png_magic_bytes() {
        let png = render_inventory_chart(&counts()).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn test_same_input_is_byte_identical() {
        assert_eq!(
            render_inventory_chart(&counts()).unwrap(),
            render_inventory_chart(&counts()).unwrap()
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(render_inventory_chart(&[]).is_err());
    }
}

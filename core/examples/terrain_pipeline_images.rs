// Generates and saves three 257×257 grayscale images:
// Fractal Perlin heightmap
// Heightmap + point-policy erosion
// Heightmap + brush-policy erosion

use image::{GrayImage, Luma};
use std::path::Path;
use terrain_core::{ErosionConfig, Heightmap2D, HydraulicErosion2D, NoiseParams, generate_heightmap};

fn save_grayscale(map: &Heightmap2D, filename: &str) -> Result<(), image::ImageError> {
    let (min, max) = map.range();
    let mut img = GrayImage::new(map.width as u32, map.height as u32);
    for y in 0..map.height {
        for x in 0..map.width {
            let norm = if (max - min).abs() < f32::EPSILON {
                0.5
            } else {
                (map.get(x, y) - min) / (max - min)
            };
            let gray = (norm * 255.0).round() as u8;
            img.put_pixel(x as u32, y as u32, Luma([gray]));
        }
    }
    img.save(Path::new(filename))?;
    println!("Saved {}", filename);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = NoiseParams {
        seed: 42,
        scale: 60.0,
        octaves: 6,
        persistence: 0.45,
        lacunarity: 2.0,
        ..NoiseParams::vertex_grid(256)
    };

    // 1) Fractal Perlin heightmap
    let base = generate_heightmap(&params)?;
    save_grayscale(&base, "terrain_heightmap.png")?;

    // 2) Point erosion
    let mut point = base.clone();
    HydraulicErosion2D::new(ErosionConfig::point(0.1), 7).erode_map(&mut point, 50_000)?;
    save_grayscale(&point, "terrain_eroded_point.png")?;

    // 3) Brush erosion
    let mut brushed = base.clone();
    HydraulicErosion2D::new(ErosionConfig::brush(3), 7).erode_map(&mut brushed, 50_000)?;
    save_grayscale(&brushed, "terrain_eroded_brush.png")?;

    Ok(())
}

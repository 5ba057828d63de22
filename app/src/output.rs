use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Luma};
use terrain_core::Heightmap2D;

// Map heights onto the full u16 range using the map's own extrema
pub fn to_luma16(map: &Heightmap2D) -> Vec<u16> {
    let (min, max) = map.range();
    let range = max - min;
    map.data
        .iter()
        .map(|&h| {
            let norm = if range > f32::EPSILON {
                (h - min) / range
            } else {
                0.0
            };
            (norm.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16
        })
        .collect()
}

// 16-bit grayscale PNG, black = lowest point, white = highest
pub fn save_png(map: &Heightmap2D, path: &Path) -> Result<(), image::ImageError> {
    let Some(buf): Option<ImageBuffer<Luma<u16>, Vec<u16>>> =
        ImageBuffer::from_raw(map.width as u32, map.height as u32, to_luma16(map))
    else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} heights do not fill {}x{}", map.data.len(), map.width, map.height),
        )
        .into());
    };
    buf.save(path)
}

// Raw little-endian f32 dump, row-major, no header
pub fn save_raw(map: &Heightmap2D, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for &h in &map.data {
        out.write_all(&h.to_le_bytes())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::to_luma16;
    use terrain_core::Heightmap2D;

    #[test]
    fn luma_spans_full_range() {
        let map = Heightmap2D::from_fn(3, 1, |x, _| x as f32 * 0.25);
        assert_eq!(to_luma16(&map), vec![0, 32768, u16::MAX]);
    }

    #[test]
    fn flat_map_is_black() {
        let map = Heightmap2D::filled(2, 2, 0.7);
        assert!(to_luma16(&map).iter().all(|&v| v == 0));
    }
}

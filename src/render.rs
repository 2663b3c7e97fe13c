//! Renders channel trees to raster images.
//!
//! For each pixel `(i, j)` the coordinate is remapped to `[-1, 1]`, the
//! three channel trees are evaluated at that point and the results are
//! quantized to bytes. Trees are immutable, so rows render in parallel
//! without any synchronization on the trees themselves.

use crate::{color_map, remap, Color};

use image::{Rgb, RgbImage};

fn pixel(color: &Color, p: [f64; 2]) -> Rgb<u8> {
    let r = color_map(color[0].eval(p));
    let g = color_map(color[1].eval(p));
    let b = color_map(color[2].eval(p));
    Rgb([r, g, b])
}

/// Render to image using single thread.
///
/// Calls `report` once per row with the fraction of rows done.
pub fn gen_to_image<F>(color: &Color, img: &mut RgbImage, report: F) -> anyhow::Result<()>
    where F: Fn(f64)
{
    let (w, h) = img.dimensions();
    for j in 0..h {
        report(j as f64 / h as f64);
        let y = remap(j as f64, 0.0, h as f64, -1.0, 1.0)?;
        for i in 0..w {
            let x = remap(i as f64, 0.0, w as f64, -1.0, 1.0)?;
            img.put_pixel(i, j, pixel(color, [x, y]));
        }
    }
    Ok(())
}

/// Render to file using single thread, reporting progress to stderr.
pub fn gen(color: &Color, file: &str, size: [u32; 2]) -> anyhow::Result<()> {
    let mut img = RgbImage::new(size[0], size[1]);
    gen_to_image(color, &mut img, |progress| {
        eprintln!("{:.2} %", 100.0 * progress);
    })?;
    img.save(file)?;
    Ok(())
}

/// Render to image using Rayon, one row per task.
pub fn par_gen_to_image(color: &Color, img: &mut RgbImage) -> anyhow::Result<()> {
    use rayon::prelude::*;

    let (w, h) = img.dimensions();
    let rows: Vec<Vec<Rgb<u8>>> = (0..h)
        .into_par_iter()
        .map(|j| -> anyhow::Result<Vec<Rgb<u8>>> {
            let y = remap(j as f64, 0.0, h as f64, -1.0, 1.0)?;
            let mut row = Vec::with_capacity(w as usize);
            for i in 0..w {
                let x = remap(i as f64, 0.0, w as f64, -1.0, 1.0)?;
                row.push(pixel(color, [x, y]));
            }
            Ok(row)
        })
        .collect::<anyhow::Result<_>>()?;
    for (j, row) in rows.into_iter().enumerate() {
        for (i, px) in row.into_iter().enumerate() {
            img.put_pixel(i as u32, j as u32, px);
        }
    }
    Ok(())
}

/// Render to file using Rayon.
pub fn par_gen(color: &Color, file: &str, size: [u32; 2]) -> anyhow::Result<()> {
    let mut img = RgbImage::new(size[0], size[1]);
    par_gen_to_image(color, &mut img)?;
    img.save(file)?;
    Ok(())
}

use rayon::prelude::*;

use crate::foundation::core::{Resolution, Vec4};
use crate::render::extract::FrameCamera;
use crate::scene::DepthOfField;

/// Thin-lens camera model mapping view depth to a blur radius in target pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LensBlur {
    focal_mm: f32,
    aperture_mm: f32,
    focus_mm: f32,
    px_per_mm: f32,
    max_radius: f32,
}

impl LensBlur {
    /// `None` when the lens cannot defocus anything (disabled, or focused inside the focal length).
    pub(crate) fn new(
        camera: &FrameCamera,
        dof: DepthOfField,
        target: Resolution,
        max_radius: f32,
    ) -> Option<Self> {
        if !dof.enabled
            || !(dof.aperture_fstop.is_finite() && dof.aperture_fstop > 0.0)
            || !dof.focus_distance.is_finite()
            || camera.sensor_width_mm <= 0.0
        {
            return None;
        }
        let half_tan = (camera.fov * 0.5).tan();
        if !(half_tan.is_finite() && half_tan > 0.0) {
            return None;
        }
        let focal_mm = camera.sensor_width_mm * 0.5 / half_tan;
        let focus_mm = dof.focus_distance * 1000.0;
        if focus_mm <= focal_mm {
            return None;
        }
        Some(Self {
            focal_mm,
            aperture_mm: focal_mm / dof.aperture_fstop,
            focus_mm,
            px_per_mm: target.width.max(target.height) as f32 / camera.sensor_width_mm,
            max_radius,
        })
    }

    /// Half the circle of confusion, in pixels, for a point `depth` meters down the view axis.
    pub(crate) fn radius(&self, depth: f32) -> f32 {
        let spread = if depth.is_finite() {
            let z = (depth * 1000.0).max(self.focal_mm);
            (z - self.focus_mm).abs() / z
        } else {
            1.0
        };
        let coc_mm = self.aperture_mm * self.focal_mm * spread / (self.focus_mm - self.focal_mm);
        (coc_mm * self.px_per_mm * 0.5).min(self.max_radius)
    }
}

/// Depth-aware gather blur. Each neighbor spreads over its own radius; a neighbor farther away
/// than the center only lands inside the center's radius, so sharp foreground edges stay sharp.
pub(crate) fn gather_blur(color: &[Vec4], depth: &[f32], width: usize, lens: &LensBlur) -> Vec<Vec4> {
    let radii: Vec<f32> = depth.par_iter().map(|&d| lens.radius(d).max(0.5)).collect();
    let reach = radii.iter().copied().fold(0.0_f32, f32::max);
    if reach <= 0.5 || width == 0 {
        return color.to_vec();
    }
    let reach = reach.ceil() as isize;
    let height = (color.len() / width) as isize;

    let mut out = vec![Vec4::ZERO; color.len()];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            let center = y * width + x;
            let (center_depth, center_radius) = (depth[center], radii[center]);
            let mut acc = Vec4::ZERO;
            let mut weight = 0.0;
            for dy in -reach..=reach {
                let qy = y as isize + dy;
                if qy < 0 || qy >= height {
                    continue;
                }
                for dx in -reach..=reach {
                    let qx = x as isize + dx;
                    if qx < 0 || qx >= width as isize {
                        continue;
                    }
                    let q = qy as usize * width + qx as usize;
                    let dist = ((dx * dx + dy * dy) as f32).sqrt();
                    let r = radii[q];
                    if dist > r || (depth[q] > center_depth && dist > center_radius) {
                        continue;
                    }
                    let wq = 1.0 / (r * r);
                    acc += color[q] * wq;
                    weight += wq;
                }
            }
            *px = if weight > 0.0 {
                acc / weight
            } else {
                color[center]
            };
        }
    });
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/dof.rs"]
mod tests;

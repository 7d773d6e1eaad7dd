use std::f32::consts::{FRAC_1_PI, PI};

use rayon::prelude::*;

use crate::foundation::core::{Mat3, Mat4, Resolution, RgbaColor, Vec2, Vec3, Vec4};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::foundation::math::{linear_to_srgb, srgb_to_linear, unit_to_u8};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::dof::{LensBlur, gather_blur};
use crate::render::extract::{FrameCamera, FrameScene, Surface};
use crate::shader::{Bsdf, ShadingInputs};

/// Rows of the supersampled target rasterized by one task.
const BAND_ROWS: usize = 16;
pub const MAX_SUPERSAMPLE: u32 = 4;
/// Blur radius cap in output pixels.
const MAX_BLUR_RADIUS: f32 = 8.0;

#[derive(Clone, Debug, Default)]
pub struct CpuBackendOpts {
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Software rasterizer: triangles are binned into horizontal bands, each band is depth-resolved
/// and then shaded on the thread pool.
pub struct CpuBackend {
    pool: rayon::ThreadPool,
}

impl CpuBackend {
    pub fn new(opts: CpuBackendOpts) -> ForgeResult<Self> {
        Ok(Self {
            pool: build_thread_pool(opts.threads)?,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl RenderBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    #[tracing::instrument(skip_all, fields(
        width = settings.resolution.width,
        height = settings.resolution.height,
        supersample = settings.supersample,
    ))]
    fn render_frame(
        &mut self,
        frame: &FrameScene<'_>,
        settings: &RenderSettings,
    ) -> anyhow::Result<FrameRGBA> {
        anyhow::ensure!(
            (1..=MAX_SUPERSAMPLE).contains(&settings.supersample),
            "supersample must be within 1..={MAX_SUPERSAMPLE}, got {}",
            settings.supersample
        );
        let ss = settings.supersample as usize;
        let target = settings.resolution.scaled(settings.supersample);
        let (w, h) = (target.width as usize, target.height as usize);

        let view = ViewTransform::new(&frame.camera, target)?;
        let tris = setup_triangles(frame, &view, w, h)?;
        let bins = bin_triangles(&tris, h);
        tracing::debug!(
            triangles = tris.len(),
            submitted = frame.triangle_count(),
            bands = bins.len(),
            "triangle setup done"
        );

        let mut color = vec![background_texel(settings.background_rgba); w * h];
        let mut depth = vec![f32::INFINITY; w * h];
        self.pool.install(|| {
            color
                .par_chunks_mut(BAND_ROWS * w)
                .zip(depth.par_chunks_mut(BAND_ROWS * w))
                .zip(bins.par_iter())
                .enumerate()
                .for_each(|(band, ((color, depth), bin))| {
                    let rows = color.len() / w;
                    let frags = rasterize_band(&tris, bin, band * BAND_ROWS, w, rows, view.far);
                    shade_band(frame, &tris, &frags, color, depth);
                });
        });

        if let Some(dof) = frame.camera.dof
            && let Some(lens) = LensBlur::new(
                &frame.camera,
                dof,
                target,
                MAX_BLUR_RADIUS * settings.supersample as f32,
            )
        {
            color = self.pool.install(|| gather_blur(&color, &depth, w, &lens));
        }

        let data = self
            .pool
            .install(|| downsample(&color, w, ss, settings.resolution));
        Ok(FrameRGBA {
            width: settings.resolution.width,
            height: settings.resolution.height,
            data,
            premultiplied: false,
        })
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> ForgeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ForgeError::config(
            "render 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ForgeError::render(anyhow::Error::new(e).context("failed to build rayon thread pool")))
}

/// Vertical field of view for a camera whose `fov` spans the larger image axis.
pub(crate) fn vertical_fov(fov: f32, aspect: f32) -> f32 {
    if aspect >= 1.0 {
        2.0 * ((fov * 0.5).tan() / aspect).atan()
    } else {
        fov
    }
}

struct ViewTransform {
    view_proj: Mat4,
    near: f32,
    far: f32,
}

impl ViewTransform {
    fn new(cam: &FrameCamera, target: Resolution) -> anyhow::Result<Self> {
        let forward = cam.target - cam.eye;
        anyhow::ensure!(
            forward.length_squared() > 1e-12,
            "camera eye and target coincide"
        );
        anyhow::ensure!(
            cam.fov > 0.0 && cam.fov < PI,
            "camera field of view {} outside (0, pi)",
            cam.fov
        );
        anyhow::ensure!(
            cam.clip_start > 0.0 && cam.clip_end > cam.clip_start,
            "camera clip range {}..{} is empty",
            cam.clip_start,
            cam.clip_end
        );
        let up = if forward.normalize().cross(Vec3::Z).length_squared() < 1e-8 {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let aspect = target.aspect();
        let view = Mat4::look_at_rh(cam.eye, cam.target, up);
        let proj = Mat4::perspective_rh(
            vertical_fov(cam.fov, aspect),
            aspect,
            cam.clip_start,
            cam.clip_end,
        );
        Ok(Self {
            view_proj: proj * view,
            near: cam.clip_start,
            far: cam.clip_end,
        })
    }
}

/// A front-facing triangle in screen space with its world attributes.
struct SetupTri {
    draw: u32,
    screen: [Vec2; 3],
    inv_area: f32,
    inv_w: [f32; 3],
    world: [Vec3; 3],
    normal: [Vec3; 3],
    generated: [Vec3; 3],
    min: Vec2,
    max: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct Fragment {
    tri: u32,
    /// View-axis distance from the camera.
    depth: f32,
    /// Perspective-correct barycentrics.
    bary: Vec3,
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn setup_triangles(
    frame: &FrameScene<'_>,
    view: &ViewTransform,
    w: usize,
    h: usize,
) -> anyhow::Result<Vec<SetupTri>> {
    let (wf, hf) = (w as f32, h as f32);
    let eye = frame.camera.eye;
    let mut out = Vec::with_capacity(frame.triangle_count());

    for (draw_idx, draw) in frame.draws.iter().enumerate() {
        let mesh = draw.mesh;
        let n = mesh.positions.len();
        anyhow::ensure!(
            mesh.normals.len() == n && mesh.generated.len() == n,
            "mesh '{}' has mismatched vertex attributes",
            draw.name
        );
        let normal_mat = Mat3::from_mat4(draw.world);
        let world: Vec<Vec3> = mesh
            .positions
            .iter()
            .map(|&p| draw.world.transform_point3(p))
            .collect();
        let clip: Vec<Vec4> = world
            .iter()
            .map(|p| view.view_proj * p.extend(1.0))
            .collect();

        for tri in &mesh.triangles {
            let idx = tri.map(|i| i as usize);
            anyhow::ensure!(
                idx.iter().all(|&i| i < n),
                "mesh '{}' indexes past its vertex array",
                draw.name
            );
            let p = idx.map(|i| world[i]);
            if (p[1] - p[0]).cross(p[2] - p[0]).dot(eye - p[0]) <= 0.0 {
                continue;
            }
            let c = idx.map(|i| clip[i]);
            if c.iter().any(|c| c.w <= view.near) {
                continue;
            }
            let screen = c.map(|c| {
                Vec2::new(
                    (c.x / c.w * 0.5 + 0.5) * wf,
                    (0.5 - c.y / c.w * 0.5) * hf,
                )
            });
            let min = screen[0].min(screen[1]).min(screen[2]);
            let max = screen[0].max(screen[1]).max(screen[2]);
            if max.x < 0.0 || max.y < 0.0 || min.x >= wf || min.y >= hf {
                continue;
            }
            let area = edge(screen[0], screen[1], screen[2]);
            if area.abs() < 1e-12 {
                continue;
            }
            out.push(SetupTri {
                draw: draw_idx as u32,
                screen,
                inv_area: 1.0 / area,
                inv_w: c.map(|c| 1.0 / c.w),
                world: p,
                normal: idx.map(|i| (normal_mat * mesh.normals[i]).normalize_or_zero()),
                generated: idx.map(|i| mesh.generated[i]),
                min,
                max,
            });
        }
    }
    Ok(out)
}

fn bin_triangles(tris: &[SetupTri], h: usize) -> Vec<Vec<u32>> {
    let bands = h.div_ceil(BAND_ROWS);
    let mut bins = vec![Vec::new(); bands];
    let last_row = h.saturating_sub(1) as f32;
    for (i, t) in tris.iter().enumerate() {
        let first = t.min.y.clamp(0.0, last_row) as usize / BAND_ROWS;
        let last = t.max.y.clamp(0.0, last_row) as usize / BAND_ROWS;
        for bin in &mut bins[first..=last] {
            bin.push(i as u32);
        }
    }
    bins
}

fn rasterize_band(
    tris: &[SetupTri],
    bin: &[u32],
    y0: usize,
    w: usize,
    rows: usize,
    far: f32,
) -> Vec<Option<Fragment>> {
    let mut frags = vec![None; rows * w];
    for &ti in bin {
        let t = &tris[ti as usize];
        let x_start = t.min.x.max(0.0).floor() as usize;
        let x_end = (t.max.x.ceil().max(0.0) as usize).min(w);
        let y_start = (t.min.y.max(0.0).floor() as usize).max(y0);
        let y_end = (t.max.y.ceil().max(0.0) as usize).min(y0 + rows);

        for y in y_start..y_end {
            for x in x_start..x_end {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let l0 = edge(t.screen[1], t.screen[2], p) * t.inv_area;
                let l1 = edge(t.screen[2], t.screen[0], p) * t.inv_area;
                let l2 = 1.0 - l0 - l1;
                if l0 < 0.0 || l1 < 0.0 || l2 < 0.0 {
                    continue;
                }
                let pw = Vec3::new(l0 * t.inv_w[0], l1 * t.inv_w[1], l2 * t.inv_w[2]);
                let sum = pw.x + pw.y + pw.z;
                if sum <= 0.0 {
                    continue;
                }
                let depth = 1.0 / sum;
                if depth > far {
                    continue;
                }
                let slot = &mut frags[(y - y0) * w + x];
                if slot.is_some_and(|f: Fragment| f.depth <= depth) {
                    continue;
                }
                *slot = Some(Fragment {
                    tri: ti,
                    depth,
                    bary: pw * depth,
                });
            }
        }
    }
    frags
}

fn shade_band(
    frame: &FrameScene<'_>,
    tris: &[SetupTri],
    frags: &[Option<Fragment>],
    color: &mut [Vec4],
    depth: &mut [f32],
) {
    for ((frag, c), d) in frags.iter().zip(color.iter_mut()).zip(depth.iter_mut()) {
        let Some(f) = frag else {
            continue;
        };
        let t = &tris[f.tri as usize];
        let interp = |a: [Vec3; 3]| a[0] * f.bary.x + a[1] * f.bary.y + a[2] * f.bary.z;
        let position = interp(t.world);
        let normal = interp(t.normal).normalize_or_zero();
        let generated = interp(t.generated);

        let bsdf = match &frame.draws[t.draw as usize].surface {
            Surface::Nodes(shader) => shader.evaluate(&ShadingInputs { generated }),
            Surface::Flat(bsdf) => Some(*bsdf),
        };
        let radiance = bsdf.map_or(Vec3::ZERO, |b| shade_point(frame, &b, position, normal));
        *c = tonemap(radiance).extend(1.0);
        *d = f.depth;
    }
}

fn linear_rgb(c: RgbaColor) -> Vec3 {
    Vec3::new(srgb_to_linear(c.r), srgb_to_linear(c.g), srgb_to_linear(c.b))
}

/// Blinn-Phong exponent matching a roughness in `[0, 1]`.
fn blinn_exponent(roughness: f32) -> f32 {
    let a2 = roughness.clamp(0.05, 1.0).powi(2);
    (2.0 / (a2 * a2) - 2.0).max(1.0)
}

/// Outgoing linear radiance toward the camera.
fn shade_point(frame: &FrameScene<'_>, bsdf: &Bsdf, p: Vec3, n: Vec3) -> Vec3 {
    let base = linear_rgb(bsdf.base_color);
    let metallic = bsdf.metallic.clamp(0.0, 1.0);
    let diffuse = base * (1.0 - metallic);
    let f0 = Vec3::splat(0.08 * bsdf.specular.clamp(0.0, 1.0)).lerp(base, metallic);
    let shininess = blinn_exponent(bsdf.roughness);
    let spec_norm = (shininess + 8.0) / (8.0 * PI);
    let v = (frame.camera.eye - p).normalize_or_zero();

    let mut out = frame.ambient * diffuse;
    for light in &frame.lights {
        let to_light = light.position - p;
        let d2 = to_light.length_squared().max(1e-4);
        let l = to_light / d2.sqrt();
        let ndl = n.dot(l);
        if ndl <= 0.0 {
            continue;
        }
        let irradiance = light.intensity * (ndl / d2);
        let h = (l + v).normalize_or_zero();
        let spec = spec_norm * n.dot(h).max(0.0).powf(shininess);
        out += irradiance * (diffuse * FRAC_1_PI + f0 * spec);
    }
    out
}

fn tonemap(radiance: Vec3) -> Vec3 {
    Vec3::ONE - (-radiance.max(Vec3::ZERO)).exp()
}

fn background_texel(rgba: [u8; 4]) -> Vec4 {
    let c = RgbaColor::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    linear_rgb(c).extend(c.a)
}

/// Box-filter `ss x ss` blocks into straight-alpha sRGB bytes.
fn downsample(color: &[Vec4], w: usize, ss: usize, out: Resolution) -> Vec<u8> {
    let ow = out.width as usize;
    let inv = 1.0 / (ss * ss) as f32;
    let mut data = vec![0u8; out.pixel_count() * 4];
    data.par_chunks_mut(ow * 4).enumerate().for_each(|(oy, row)| {
        for (ox, px) in row.chunks_exact_mut(4).enumerate() {
            let mut acc = Vec4::ZERO;
            for sy in 0..ss {
                let line = (oy * ss + sy) * w + ox * ss;
                for s in &color[line..line + ss] {
                    acc += (s.truncate() * s.w).extend(s.w);
                }
            }
            acc *= inv;
            let rgb = if acc.w > 0.0 {
                acc.truncate() / acc.w
            } else {
                Vec3::ZERO
            };
            px[0] = unit_to_u8(linear_to_srgb(rgb.x));
            px[1] = unit_to_u8(linear_to_srgb(rgb.y));
            px[2] = unit_to_u8(linear_to_srgb(rgb.z));
            px[3] = unit_to_u8(acc.w);
        }
    });
    data
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

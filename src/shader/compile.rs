use smallvec::SmallVec;

use crate::foundation::core::{RgbaColor, Vec3};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::shader::graph::{
    ColorRamp, GradientKind, InputSocket, NodeId, OutputSocket, ShaderGraph, ShaderNode,
    SurfaceParams,
};

/// Surface response produced by a compiled shader at one shading point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bsdf {
    /// Base color in the sRGB-encoded domain the user picked it in.
    pub base_color: RgbaColor,
    pub roughness: f32,
    pub specular: f32,
    pub metallic: f32,
}

#[derive(Clone, Copy, Debug)]
enum Value {
    Float(f32),
    Color(RgbaColor),
    Closure(Bsdf),
}

impl Value {
    fn as_float(self) -> f32 {
        match self {
            Self::Float(v) => v,
            // Luminance weights; a gray color converts to its own level.
            Self::Color(c) => 0.2126 * c.r + 0.7152 * c.g + 0.0722 * c.b,
            Self::Closure(_) => 0.0,
        }
    }

    fn as_color(self) -> RgbaColor {
        match self {
            Self::Float(v) => RgbaColor::rgba(v, v, v, 1.0),
            Self::Color(c) => c,
            Self::Closure(_) => RgbaColor::BLACK,
        }
    }
}

/// Where an instruction reads one of its inputs from.
#[derive(Clone, Copy, Debug)]
struct Source {
    instr: usize,
    socket: OutputSocket,
}

#[derive(Clone, Debug)]
enum Op {
    Gradient(GradientKind),
    Ramp { ramp: ColorRamp, fac: Source },
    Surface {
        params: SurfaceParams,
        base_color: Option<Source>,
    },
    Output { surface: Source },
}

/// A validated shader graph flattened into dependency order.
#[derive(Clone, Debug)]
pub struct CompiledShader {
    ops: Vec<Op>,
}

/// Per-pixel values a shader may read.
#[derive(Clone, Copy, Debug)]
pub struct ShadingInputs {
    /// Bounding-box normalized object coordinates.
    pub generated: Vec3,
}

type Outputs = [Option<Value>; 2];

impl CompiledShader {
    /// Validate `graph` and flatten the nodes reachable from its output sink.
    pub fn compile(graph: &ShaderGraph) -> ForgeResult<Self> {
        let order = graph.validate()?;
        let slot = |id: NodeId| order.iter().position(|&o| o == id);

        let source = |to: NodeId, socket: InputSocket| -> ForgeResult<Option<Source>> {
            let Some(link) = graph.incoming(to, socket) else {
                return Ok(None);
            };
            let instr = slot(link.from).ok_or_else(|| {
                ForgeError::shader_link(format!("{:?} feeds from an unordered node", link.to))
            })?;
            Ok(Some(Source {
                instr,
                socket: link.from_socket,
            }))
        };
        let required = |to: NodeId, socket: InputSocket| -> ForgeResult<Source> {
            source(to, socket)?.ok_or_else(|| {
                ForgeError::shader_link(format!("input {socket:?} of {to:?} is unlinked"))
            })
        };

        let mut ops = Vec::with_capacity(order.len());
        for &id in &order {
            let node = graph
                .node(id)
                .ok_or_else(|| ForgeError::shader_link(format!("node {id:?} vanished")))?;
            let op = match &node.node {
                ShaderNode::GradientSource { kind } => Op::Gradient(*kind),
                ShaderNode::ColorRamp(ramp) => Op::Ramp {
                    ramp: ramp.clone(),
                    fac: required(id, InputSocket::Fac)?,
                },
                ShaderNode::SurfaceShader(params) => Op::Surface {
                    params: *params,
                    base_color: source(id, InputSocket::BaseColor)?,
                },
                ShaderNode::OutputSink => Op::Output {
                    surface: required(id, InputSocket::Surface)?,
                },
            };
            ops.push(op);
        }

        Ok(Self { ops })
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Run the program; `None` means the surface has no shader closure (renders black).
    pub fn evaluate(&self, inputs: &ShadingInputs) -> Option<Bsdf> {
        let mut values: SmallVec<[Outputs; 8]> = SmallVec::with_capacity(self.ops.len());
        let read = |values: &SmallVec<[Outputs; 8]>, src: Source| -> Option<Value> {
            let outs = values.get(src.instr)?;
            let idx = match src.socket {
                OutputSocket::Color | OutputSocket::Bsdf => 0,
                OutputSocket::Fac => 1,
            };
            outs[idx]
        };

        let mut result = None;
        for op in &self.ops {
            let outs: Outputs = match op {
                Op::Gradient(kind) => {
                    let fac = gradient_factor(*kind, inputs.generated);
                    [
                        Some(Value::Color(RgbaColor::rgba(fac, fac, fac, 1.0))),
                        Some(Value::Float(fac)),
                    ]
                }
                Op::Ramp { ramp, fac } => {
                    let t = read(&values, *fac).map_or(0.0, Value::as_float);
                    [Some(Value::Color(ramp.evaluate(t))), None]
                }
                Op::Surface { params, base_color } => {
                    let base = base_color
                        .and_then(|s| read(&values, s))
                        .map_or(params.base_color, Value::as_color);
                    [
                        Some(Value::Closure(Bsdf {
                            base_color: base,
                            roughness: params.roughness,
                            specular: params.specular,
                            metallic: params.metallic,
                        })),
                        None,
                    ]
                }
                Op::Output { surface } => {
                    if let Some(Value::Closure(bsdf)) = read(&values, *surface) {
                        result = Some(bsdf);
                    }
                    [None, None]
                }
            };
            values.push(outs);
        }
        result
    }
}

/// Gradient texture field over generated coordinates (object x runs `0 -> 1`).
fn gradient_factor(kind: GradientKind, p: Vec3) -> f32 {
    let f = match kind {
        GradientKind::Linear => p.x,
        GradientKind::Quadratic => {
            let x = p.x.max(0.0);
            x * x
        }
        GradientKind::Diagonal => (p.x + p.y) * 0.5,
        GradientKind::Radial => {
            let c = p - Vec3::splat(0.5);
            c.y.atan2(c.x) / std::f32::consts::TAU + 0.5
        }
    };
    f.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/shader/compile.rs"]
mod tests;

use smallvec::SmallVec;

use crate::foundation::core::{RgbaColor, Vec2};
use crate::foundation::error::{ForgeError, ForgeResult};

/// Handle to a node inside one [`ShaderGraph`]. Handles are never reused within a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Output ports across all node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputSocket {
    Color,
    Fac,
    Bsdf,
}

/// Input ports across all node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputSocket {
    Fac,
    BaseColor,
    Surface,
}

/// What flows along a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SocketType {
    Float,
    Color,
    Shader,
}

impl OutputSocket {
    pub fn socket_type(self) -> SocketType {
        match self {
            Self::Color => SocketType::Color,
            Self::Fac => SocketType::Float,
            Self::Bsdf => SocketType::Shader,
        }
    }
}

impl InputSocket {
    pub fn socket_type(self) -> SocketType {
        match self {
            Self::Fac => SocketType::Float,
            Self::BaseColor => SocketType::Color,
            Self::Surface => SocketType::Shader,
        }
    }
}

fn compatible(from: SocketType, to: SocketType) -> bool {
    match (from, to) {
        (SocketType::Shader, SocketType::Shader) => true,
        (SocketType::Shader, _) | (_, SocketType::Shader) => false,
        // Float and color convert implicitly.
        _ => true,
    }
}

/// Shape of the gradient field over generated coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GradientKind {
    #[default]
    Linear,
    Quadratic,
    Diagonal,
    Radial,
}

/// Interpolation between neighbouring ramp stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RampInterpolation {
    #[default]
    Linear,
    Constant,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampStop {
    pub position: f32,
    pub color: RgbaColor,
}

/// Piecewise color function over `[0, 1]`. Stops are kept sorted by position.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    pub interpolation: RampInterpolation,
    stops: SmallVec<[RampStop; 4]>,
}

impl ColorRamp {
    /// Two stops at 0.0 and 1.0.
    pub fn two_stop(start: RgbaColor, end: RgbaColor, interpolation: RampInterpolation) -> Self {
        let mut stops = SmallVec::new();
        stops.push(RampStop {
            position: 0.0,
            color: start,
        });
        stops.push(RampStop {
            position: 1.0,
            color: end,
        });
        Self {
            interpolation,
            stops,
        }
    }

    pub fn stops(&self) -> &[RampStop] {
        &self.stops
    }

    pub fn set_stop_color(&mut self, index: usize, color: RgbaColor) -> ForgeResult<()> {
        let stop = self.stops.get_mut(index).ok_or_else(|| {
            ForgeError::shader_link(format!("color ramp has no stop #{index}"))
        })?;
        stop.color = color;
        Ok(())
    }

    pub fn insert_stop(&mut self, position: f32, color: RgbaColor) {
        let position = position.clamp(0.0, 1.0);
        let at = self
            .stops
            .iter()
            .position(|s| s.position > position)
            .unwrap_or(self.stops.len());
        self.stops.insert(at, RampStop { position, color });
    }

    pub fn evaluate(&self, t: f32) -> RgbaColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let Some(first) = self.stops.first() else {
            return RgbaColor::BLACK;
        };
        if t <= first.position {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.position {
                let span = b.position - a.position;
                let local = if span > 0.0 {
                    (t - a.position) / span
                } else {
                    1.0
                };
                return match self.interpolation {
                    RampInterpolation::Linear => a.color.lerp(b.color, local),
                    RampInterpolation::Constant => a.color,
                };
            }
        }
        self.stops.last().map_or(RgbaColor::BLACK, |s| s.color)
    }
}

/// Fixed parameters of the physically based surface shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceParams {
    /// Used when `BaseColor` is unlinked.
    pub base_color: RgbaColor,
    pub roughness: f32,
    pub specular: f32,
    pub metallic: f32,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            base_color: RgbaColor::rgba(0.8, 0.8, 0.8, 1.0),
            roughness: 0.5,
            specular: 0.5,
            metallic: 0.0,
        }
    }
}

/// Closed set of node kinds a material graph may contain.
#[derive(Clone, Debug, PartialEq)]
pub enum ShaderNode {
    GradientSource { kind: GradientKind },
    ColorRamp(ColorRamp),
    SurfaceShader(SurfaceParams),
    OutputSink,
}

impl ShaderNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::GradientSource { .. } => "GradientSource",
            Self::ColorRamp(_) => "ColorRamp",
            Self::SurfaceShader(_) => "SurfaceShader",
            Self::OutputSink => "OutputSink",
        }
    }

    pub fn outputs(&self) -> &'static [OutputSocket] {
        match self {
            Self::GradientSource { .. } => &[OutputSocket::Color, OutputSocket::Fac],
            Self::ColorRamp(_) => &[OutputSocket::Color],
            Self::SurfaceShader(_) => &[OutputSocket::Bsdf],
            Self::OutputSink => &[],
        }
    }

    pub fn inputs(&self) -> &'static [InputSocket] {
        match self {
            Self::GradientSource { .. } => &[],
            Self::ColorRamp(_) => &[InputSocket::Fac],
            Self::SurfaceShader(_) => &[InputSocket::BaseColor],
            Self::OutputSink => &[InputSocket::Surface],
        }
    }

    /// Inputs that must carry exactly one link for the graph to be valid.
    pub fn required_inputs(&self) -> &'static [InputSocket] {
        match self {
            Self::GradientSource { .. } | Self::SurfaceShader(_) => &[],
            Self::ColorRamp(_) => &[InputSocket::Fac],
            Self::OutputSink => &[InputSocket::Surface],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub node: ShaderNode,
    /// Editor placement; no effect on evaluation.
    pub location: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    pub from: NodeId,
    pub from_socket: OutputSocket,
    pub to: NodeId,
    pub to_socket: InputSocket,
}

/// Directed acyclic graph of shader nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShaderGraph {
    nodes: Vec<GraphNode>,
    links: Vec<Link>,
    next_id: u32,
}

impl ShaderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface shader wired into an output sink.
    pub fn surface_output(params: SurfaceParams) -> Self {
        let mut graph = Self::new();
        let bsdf = graph.add(ShaderNode::SurfaceShader(params), Vec2::new(10.0, 300.0));
        let out = graph.add(ShaderNode::OutputSink, Vec2::new(300.0, 300.0));
        graph.links.push(Link {
            from: bsdf,
            from_socket: OutputSocket::Bsdf,
            to: out,
            to_socket: InputSocket::Surface,
        });
        graph
    }

    pub fn add(&mut self, node: ShaderNode, location: Vec2) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(GraphNode { id, node, location });
        id
    }

    /// Remove a node and every link touching it. Returns `false` for an unknown id.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.links.retain(|l| l.from != id && l.to != id);
        self.nodes.len() != before
    }

    /// Remove every node and link. Node ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node matching `pred`, in insertion order.
    pub fn find(&self, pred: impl Fn(&ShaderNode) -> bool) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| pred(&n.node))
    }

    /// The link feeding `to`'s `socket`, if any.
    pub fn incoming(&self, to: NodeId, socket: InputSocket) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.to == to && l.to_socket == socket)
    }

    /// Connect `from.from_socket` to `to.to_socket`.
    ///
    /// An input holds at most one link: linking into an occupied input replaces the previous
    /// link. Fails when either node is unknown, a node lacks the named port, the socket types
    /// cannot convert, or the link would close a cycle.
    pub fn link(
        &mut self,
        from: NodeId,
        from_socket: OutputSocket,
        to: NodeId,
        to_socket: InputSocket,
    ) -> ForgeResult<()> {
        let src = self
            .node(from)
            .ok_or_else(|| ForgeError::shader_link(format!("unknown source node {from:?}")))?;
        let dst = self
            .node(to)
            .ok_or_else(|| ForgeError::shader_link(format!("unknown target node {to:?}")))?;

        if !src.node.outputs().contains(&from_socket) {
            return Err(ForgeError::shader_link(format!(
                "{} has no output {from_socket:?}",
                src.node.kind_name()
            )));
        }
        if !dst.node.inputs().contains(&to_socket) {
            return Err(ForgeError::shader_link(format!(
                "{} has no input {to_socket:?}",
                dst.node.kind_name()
            )));
        }
        if !compatible(from_socket.socket_type(), to_socket.socket_type()) {
            return Err(ForgeError::shader_link(format!(
                "cannot connect {:?} output to {:?} input",
                from_socket.socket_type(),
                to_socket.socket_type()
            )));
        }
        if from == to || self.reaches(to, from) {
            return Err(ForgeError::shader_link(format!(
                "link {from:?} -> {to:?} would create a cycle"
            )));
        }

        self.links
            .retain(|l| !(l.to == to && l.to_socket == to_socket));
        self.links.push(Link {
            from,
            from_socket,
            to,
            to_socket,
        });
        Ok(())
    }

    /// Check required inputs and the single output sink, then return a topological order of the
    /// nodes feeding that sink (sink last).
    pub fn validate(&self) -> ForgeResult<Vec<NodeId>> {
        let sinks: Vec<&GraphNode> = self
            .nodes
            .iter()
            .filter(|n| matches!(n.node, ShaderNode::OutputSink))
            .collect();
        let sink = match sinks.as_slice() {
            [one] => *one,
            [] => return Err(ForgeError::shader_link("graph has no output sink")),
            _ => {
                return Err(ForgeError::shader_link(format!(
                    "graph has {} output sinks",
                    sinks.len()
                )));
            }
        };

        for n in &self.nodes {
            for &socket in n.node.required_inputs() {
                let count = self
                    .links
                    .iter()
                    .filter(|l| l.to == n.id && l.to_socket == socket)
                    .count();
                if count != 1 {
                    return Err(ForgeError::shader_link(format!(
                        "{} input {socket:?} has {count} links, expected exactly 1",
                        n.node.kind_name()
                    )));
                }
            }
        }

        let mut order = Vec::new();
        let mut visiting = Vec::new();
        self.visit(sink.id, &mut visiting, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        id: NodeId,
        visiting: &mut Vec<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> ForgeResult<()> {
        if order.contains(&id) {
            return Ok(());
        }
        if visiting.contains(&id) {
            return Err(ForgeError::shader_link("shader graph contains a cycle"));
        }
        visiting.push(id);
        for l in self.links.iter().filter(|l| l.to == id) {
            self.visit(l.from, visiting, order)?;
        }
        visiting.pop();
        order.push(id);
        Ok(())
    }

    /// `true` if `to` is reachable from `from` along links.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = Vec::new();
        while let Some(cur) = stack.pop() {
            if cur == to {
                return true;
            }
            if seen.contains(&cur) {
                continue;
            }
            seen.push(cur);
            stack.extend(self.links.iter().filter(|l| l.from == cur).map(|l| l.to));
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/graph.rs"]
mod tests;

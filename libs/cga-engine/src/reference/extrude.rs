//! Face extrusion used by the reference rule.

use glam::DVec3;

use crate::shape::ShapeGeometry;

/// Vertices plus faces whose indices point into `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MeshPart {
    pub vertices: Vec<f64>,
    pub faces: Vec<Vec<u32>>,
}

impl MeshPart {
    fn push_vertex(&mut self, p: DVec3) -> u32 {
        let index = (self.vertices.len() / 3) as u32;
        self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
        index
    }
}

/// Result of extruding every face of a shape.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Extrusion {
    /// The untouched initial faces.
    pub base: MeshPart,
    /// Side walls and caps of the extruded faces.
    pub shell: MeshPart,
    /// Summed area of the initial faces.
    pub area: f64,
}

/// Extrudes each face of `geometry` along its own normal by `height`.
///
/// Degenerate faces (zero area) extrude along +Y, the up axis of the rule
/// coordinate system.
pub(crate) fn extrude(geometry: &ShapeGeometry, height: f64) -> Extrusion {
    let base = MeshPart {
        vertices: geometry.vertices.clone(),
        faces: geometry.faces().map(<[u32]>::to_vec).collect(),
    };

    let mut shell = MeshPart::default();
    let mut area = 0.0;

    for face in geometry.faces() {
        let ring: Vec<DVec3> = face
            .iter()
            .map(|&i| DVec3::from_array(geometry.position(i)))
            .collect();
        let newell = newell_normal(&ring);
        area += newell.length() * 0.5;

        let offset = newell.try_normalize().unwrap_or(DVec3::Y) * height;
        let bottom: Vec<u32> = ring.iter().map(|&p| shell.push_vertex(p)).collect();
        let top: Vec<u32> = ring.iter().map(|&p| shell.push_vertex(p + offset)).collect();

        let n = ring.len();
        for i in 0..n {
            let j = (i + 1) % n;
            shell.faces.push(vec![bottom[i], bottom[j], top[j], top[i]]);
        }
        shell.faces.push(top);
    }

    Extrusion { base, shell, area }
}

/// Unnormalized polygon normal whose length is twice the polygon area.
fn newell_normal(ring: &[DVec3]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for (i, current) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        normal += current.cross(next);
    }
    normal
}

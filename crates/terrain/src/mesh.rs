use std::f32::consts::TAU;

use glam::Vec3;

use crate::Heightfield;

/// GPU-ready vertex: position, normal, texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

/// Indexed triangle mesh with counter-clockwise front faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Triangulate a heightfield with smooth, area-weighted vertex normals.
    pub fn from_heightfield(hf: &Heightfield, uv_repeat: f32) -> Self {
        let (rows, cols) = hf.resolution();
        let stride = cols + 1;

        let mut positions = Vec::with_capacity(hf.vertex_count());
        let mut vertices = Vec::with_capacity(hf.vertex_count());
        for row in 0..=rows {
            for col in 0..=cols {
                let p = hf.vertex_position(row, col);
                positions.push(p);
                let uv = [
                    col as f32 / cols as f32 * uv_repeat,
                    row as f32 / rows as f32 * uv_repeat,
                ];
                vertices.push(Vertex::new(p, Vec3::Y, uv));
            }
        }

        let mut indices = Vec::with_capacity(rows as usize * cols as usize * 6);
        for row in 0..rows {
            for col in 0..cols {
                let a = row * stride + col;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        let mut mesh = Self { vertices, indices };
        mesh.recompute_normals(&positions);
        mesh
    }

    /// Flat up-facing ribbon centred on the origin, long side along z.
    pub fn road(width: f32, length: f32, height: f32) -> Self {
        let (hw, hl) = (width * 0.5, length * 0.5);
        let corners = [
            (Vec3::new(-hw, height, -hl), [0.0, 0.0]),
            (Vec3::new(hw, height, -hl), [1.0, 0.0]),
            (Vec3::new(-hw, height, hl), [0.0, 1.0]),
            (Vec3::new(hw, height, hl), [1.0, 1.0]),
        ];
        Self {
            vertices: corners
                .into_iter()
                .map(|(p, uv)| Vertex::new(p, Vec3::Y, uv))
                .collect(),
            indices: vec![0, 2, 1, 1, 2, 3],
        }
    }

    /// Axis-aligned box centred on the origin with flat-shaded faces.
    pub fn cuboid(size: Vec3) -> Self {
        let half = size * 0.5;
        // (normal, u, v) with u x v == normal
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];

        let mut mesh = Self::default();
        for (n, u, v) in faces {
            let base = mesh.vertices.len() as u32;
            for (su, sv, uv) in [
                (-1.0, -1.0, [0.0, 0.0]),
                (1.0, -1.0, [1.0, 0.0]),
                (1.0, 1.0, [1.0, 1.0]),
                (-1.0, 1.0, [0.0, 1.0]),
            ] {
                let p = (n + u * su + v * sv) * half;
                mesh.vertices.push(Vertex::new(p, n, uv));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Capped cylinder around the y axis, centred on the origin.
    pub fn cylinder(radius: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height * 0.5;
        let ring = |i: u32| {
            let theta = i as f32 / segments as f32 * TAU;
            Vec3::new(theta.sin(), 0.0, theta.cos())
        };

        let mut mesh = Self::default();

        // Side: top/bottom pairs, seam duplicated for continuous uvs.
        for i in 0..=segments {
            let dir = ring(i);
            let u = i as f32 / segments as f32;
            mesh.vertices
                .push(Vertex::new(dir * radius + Vec3::Y * half, dir, [u, 0.0]));
            mesh.vertices
                .push(Vertex::new(dir * radius - Vec3::Y * half, dir, [u, 1.0]));
        }
        for i in 0..segments {
            let t0 = 2 * i;
            let b0 = t0 + 1;
            let t1 = t0 + 2;
            let b1 = t0 + 3;
            mesh.indices.extend_from_slice(&[t0, b0, b1, t0, b1, t1]);
        }

        for (y, normal) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
            let center = mesh.vertices.len() as u32;
            mesh.vertices
                .push(Vertex::new(Vec3::Y * y, normal, [0.5, 0.5]));
            for i in 0..=segments {
                let dir = ring(i);
                let uv = [0.5 + dir.x * 0.5, 0.5 + dir.z * 0.5];
                mesh.vertices
                    .push(Vertex::new(dir * radius + Vec3::Y * y, normal, uv));
            }
            for i in 0..segments {
                let k0 = center + 1 + i;
                let k1 = k0 + 1;
                if normal.y > 0.0 {
                    mesh.indices.extend_from_slice(&[center, k0, k1]);
                } else {
                    mesh.indices.extend_from_slice(&[center, k1, k0]);
                }
            }
        }
        mesh
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex buffer contents for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Axis-aligned bounds as `(min, max)`; `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    fn recompute_normals(&mut self, positions: &[Vec3]) {
        let mut acc = vec![Vec3::ZERO; positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            // Unnormalised cross product weights each face by its area.
            let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        for (v, n) in self.vertices.iter_mut().zip(acc) {
            let n = n.try_normalize().unwrap_or(Vec3::Y);
            v.normal = n.to_array();
        }
    }
}

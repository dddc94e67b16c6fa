use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::error::{Attribute, Error, Result};
use crate::model::obj::{Corner, RawModel};

/// GPU vertex: position, normal, texcoord. 8 tightly packed floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const STRIDE: usize = 8 * std::mem::size_of::<f32>();

    pub fn new(pos: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            pos: pos.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.pos)
    }
}

/// Expand every face corner into a fully resolved vertex.
///
/// Faces are visited in file order and corners in declaration order, so the
/// winding of each triangle is preserved and every 3 consecutive vertices form
/// one triangle. Shared corners are not merged.
pub fn reshape(model: &RawModel) -> Result<Vec<Vertex>> {
    let mut vertices = Vec::with_capacity(model.faces.len() * 3);

    for (face_idx, face) in model.faces.iter().enumerate() {
        for (corner_idx, corner) in face.corners.iter().enumerate() {
            vertices.push(resolve(model, face_idx, corner_idx, corner)?);
        }
    }

    Ok(vertices)
}

fn resolve(model: &RawModel, face: usize, corner: usize, refs: &Corner) -> Result<Vertex> {
    let lookup = |attribute: Attribute, index: usize, len: usize| -> Result<usize> {
        index
            .checked_sub(1)
            .filter(|&i| i < len)
            .ok_or(Error::IndexOutOfRange {
                face: face + 1,
                corner: corner + 1,
                attribute,
                index,
                len,
            })
    };

    let p = lookup(Attribute::Position, refs.position, model.positions.len())?;
    let t = lookup(Attribute::TexCoord, refs.tex_coord, model.tex_coords.len())?;
    let n = lookup(Attribute::Normal, refs.normal, model.normals.len())?;

    Ok(Vertex::new(model.positions[p], model.normals[n], model.tex_coords[t]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::obj::parse_str;

    const QUAD: &str = "\
v -0.5 -0.5 0.0
v 0.5 -0.5 0.0
v 0.5 0.5 0.0
v -0.5 0.5 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
f 1/1/1 3/1/1 4/1/1
";

    #[test]
    fn vertex_is_eight_packed_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), Vertex::STRIDE);
        assert_eq!(Vertex::STRIDE, 32);
    }

    #[test]
    fn unit_square_expands_to_six_vertices() {
        let raw = parse_str(QUAD).unwrap();
        let verts = reshape(&raw).unwrap();
        assert_eq!(verts.len(), 6);
        assert_eq!(verts.len() % 3, 0);
        for v in &verts {
            assert!(raw.positions.contains(&v.position()));
        }
    }

    #[test]
    fn output_follows_face_and_corner_order() {
        let raw = parse_str(QUAD).unwrap();
        let verts = reshape(&raw).unwrap();
        let expected = [1, 2, 3, 1, 3, 4];
        for (v, &p) in verts.iter().zip(expected.iter()) {
            assert_eq!(v.position(), raw.positions[p - 1]);
        }
    }

    #[test]
    fn every_attribute_is_resolved_from_its_own_stream() {
        let text = "\
v 1 0 0
v 2 0 0
v 3 0 0
vt 0.1 0.1
vt 0.2 0.2
vn 0 1 0
vn 0 0 1
vn 1 0 0
f 3/2/1 1/1/3 2/2/2
";
        let raw = parse_str(text).unwrap();
        let verts = reshape(&raw).unwrap();
        for (v, corner) in verts.iter().zip(raw.faces[0].corners.iter()) {
            assert_eq!(v.pos, raw.positions[corner.position as usize - 1].to_array());
            assert_eq!(v.uv, raw.tex_coords[corner.tex_coord as usize - 1].to_array());
            assert_eq!(v.normal, raw.normals[corner.normal as usize - 1].to_array());
        }
    }

    #[test]
    fn vertex_count_is_three_per_face() {
        let mut text = String::from("v 0 0 0\nvt 0 0\nvn 0 1 0\n");
        for _ in 0..17 {
            text.push_str("f 1/1/1 1/1/1 1/1/1\n");
        }
        let verts = reshape(&parse_str(&text).unwrap()).unwrap();
        assert_eq!(verts.len(), 3 * 17);
    }

    #[test]
    fn zero_index_is_out_of_range() {
        let raw = parse_str("v 0 0 0\nvt 0 0\nvn 0 1 0\nf 1/1/1 0/1/1 1/1/1\n").unwrap();
        match reshape(&raw) {
            Err(Error::IndexOutOfRange { face: 1, corner: 2, attribute: Attribute::Position, index: 0, len: 1 }) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn index_past_end_is_out_of_range() {
        let raw = parse_str("v 0 0 0\nvt 0 0\nvn 0 1 0\nf 1/1/1 1/1/1 1/1/2\n").unwrap();
        assert!(matches!(
            reshape(&raw),
            Err(Error::IndexOutOfRange { attribute: Attribute::Normal, index: 2, len: 1, .. })
        ));

        let raw = parse_str("v 0 0 0\nvt 0 0\nvn 0 1 0\nf 1/5/1 1/1/1 1/1/1\n").unwrap();
        assert!(matches!(
            reshape(&raw),
            Err(Error::IndexOutOfRange { attribute: Attribute::TexCoord, index: 5, .. })
        ));
    }

    #[test]
    fn index_beyond_u32_is_out_of_range() {
        let raw = parse_str("v 0 0 0\nvt 0 0\nvn 0 1 0\nf 4294967296/1/1 1/1/1 1/1/1\n").unwrap();
        match reshape(&raw) {
            Err(Error::IndexOutOfRange { face: 1, corner: 1, attribute: Attribute::Position, index, len: 1 }) => {
                assert_eq!(index as u64, 4_294_967_296);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn no_faces_gives_no_vertices() {
        let raw = parse_str("v 0 0 0\n").unwrap();
        assert!(reshape(&raw).unwrap().is_empty());
    }
}

//! Reader for the face-indexed text model format.
//!
//! ```text
//! v  <x> <y> <z>
//! vt <u> <v>
//! vn <x> <y> <z>
//! f  <p>/<t>/<n> <p>/<t>/<n> <p>/<t>/<n>
//! ```
//!
//! Indices are 1-based. Lines with any other leading token are skipped.
//! Index ranges are not checked here; that happens when the faces are
//! resolved into vertices (see [`crate::model::geometry::reshape`]).

use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;

use glam::{Vec2, Vec3};
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map};
use nom::sequence::{preceded, tuple};
use nom::IResult;

use crate::error::{Error, Result};

/// One face corner: 1-based (position, texcoord, normal) indices as written in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub tex_coord: usize,
    pub normal: usize,
}

/// A triangle as declared by one `f` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRecord {
    pub corners: [Corner; 3],
}

/// Parse-time intermediate: the three attribute streams plus the face list, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawModel {
    pub positions: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<FaceRecord>,
}

impl RawModel {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Read and parse a model file from disk
pub fn parse(path: impl AsRef<Path>) -> Result<RawModel> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let model = parse_str(&text)?;
    tracing::debug!(
        path = %path.display(),
        positions = model.positions.len(),
        tex_coords = model.tex_coords.len(),
        normals = model.normals.len(),
        faces = model.faces.len(),
        "parsed model"
    );
    Ok(model)
}

/// Parse model text already in memory
pub fn parse_str(text: &str) -> Result<RawModel> {
    let mut model = RawModel::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else { continue };

        match tag {
            "v" => {
                let [x, y, z] = floats::<3>(&mut tokens)
                    .ok_or_else(|| malformed_record(line_no, "v", line))?;
                model.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = floats::<2>(&mut tokens)
                    .ok_or_else(|| malformed_record(line_no, "vt", line))?;
                model.tex_coords.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = floats::<3>(&mut tokens)
                    .ok_or_else(|| malformed_record(line_no, "vn", line))?;
                model.normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let face = face(tokens).ok_or_else(|| Error::MalformedFace {
                    line: line_no,
                    text: line.trim().to_string(),
                })?;
                model.faces.push(face);
            }
            other => {
                tracing::trace!(line = line_no, tag = other, "skipping unrecognized record");
            }
        }
    }

    Ok(model)
}

fn malformed_record(line: usize, tag: &'static str, text: &str) -> Error {
    Error::MalformedRecord {
        line,
        tag,
        text: text.trim().to_string(),
    }
}

/// Take the next N tokens as floats. Trailing tokens (e.g. a `w` component) are ignored.
fn floats<const N: usize>(tokens: &mut SplitWhitespace<'_>) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        *slot = tokens.next()?.parse().ok()?;
    }
    Some(out)
}

/// Exactly three `p/t/n` groups, nothing more
fn face(mut tokens: SplitWhitespace<'_>) -> Option<FaceRecord> {
    let a = corner(tokens.next()?)?;
    let b = corner(tokens.next()?)?;
    let c = corner(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }
    Some(FaceRecord { corners: [a, b, c] })
}

fn corner(token: &str) -> Option<Corner> {
    all_consuming(corner_triple)(token)
        .ok()
        .map(|(_, (position, tex_coord, normal))| Corner {
            position,
            tex_coord,
            normal,
        })
}

/// An all-digit index too large for `usize` saturates, so it is still
/// reported as out of range rather than as a malformed face.
fn index(input: &str) -> IResult<&str, usize> {
    map(digit1, |digits: &str| digits.parse::<usize>().unwrap_or(usize::MAX))(input)
}

fn corner_triple(input: &str) -> IResult<&str, (usize, usize, usize)> {
    tuple((index, preceded(char('/'), index), preceded(char('/'), index)))(input)
}

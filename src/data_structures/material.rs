/// Shades a surface by its view-space normal: `colour = normal * 0.5 + 0.5`.
///
/// Needs no lights, which makes it the usual first material for checking that
/// geometry and transforms are right. With `wireframe` set only the triangle
/// edges are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshNormalMaterial {
    pub wireframe: bool,
}


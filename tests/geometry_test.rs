use cgmath::{InnerSpace, Vector3};
use flow_cube::data_structures::geometry::BoxGeometry;

mod common;

fn position(geometry: &BoxGeometry, index: u32) -> Vector3<f32> {
    geometry.vertices()[index as usize].position.into()
}

#[test]
fn box_has_four_vertices_and_two_triangles_per_face() {
    let geometry = BoxGeometry::new(4.0, 2.0, 0.1);

    assert_eq!(geometry.vertices().len(), 24);
    assert_eq!(geometry.indices().len(), 36);
    assert!(geometry.indices().iter().all(|&i| (i as usize) < 24));
}

#[test]
fn vertices_sit_on_the_half_extents() {
    let geometry = BoxGeometry::new(4.0, 2.0, 0.1);

    for vertex in geometry.vertices() {
        let [x, y, z] = vertex.position;
        assert!((x.abs() - 2.0).abs() < 1e-6, "x = {}", x);
        assert!((y.abs() - 1.0).abs() < 1e-6, "y = {}", y);
        assert!((z.abs() - 0.05).abs() < 1e-6, "z = {}", z);
    }
}

#[test]
fn normals_are_unit_axes_pointing_outwards() {
    let geometry = BoxGeometry::new(4.0, 2.0, 0.1);

    for vertex in geometry.vertices() {
        let normal = Vector3::from(vertex.normal);
        let position = Vector3::from(vertex.position);
        assert!((normal.magnitude() - 1.0).abs() < 1e-6);
        assert_eq!(
            normal.x.abs() + normal.y.abs() + normal.z.abs(),
            1.0,
            "{:?} is not axis aligned",
            normal
        );
        assert!(position.dot(normal) > 0.0, "{:?} points inwards", normal);
    }
}

#[test]
fn triangles_wind_counter_clockwise_from_outside() {
    let geometry = BoxGeometry::new(4.0, 2.0, 0.1);

    for triangle in geometry.indices().chunks(3) {
        let a = position(&geometry, triangle[0]);
        let b = position(&geometry, triangle[1]);
        let c = position(&geometry, triangle[2]);
        let face_normal = (b - a).cross(c - a);
        let normal = Vector3::from(geometry.vertices()[triangle[0] as usize].normal);
        assert!(
            face_normal.dot(normal) > 0.0,
            "triangle {:?} faces away from {:?}",
            triangle,
            normal
        );
    }
}

#[test]
fn wireframe_traces_every_triangle() {
    let geometry = BoxGeometry::new(4.0, 2.0, 0.1);
    let edges = geometry.edge_indices();

    assert_eq!(edges.len(), 72);
    for (triangle, lines) in geometry.indices().chunks(3).zip(edges.chunks(6)) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
        assert_eq!(lines, [a, b, b, c, c, a]);
    }
}

#[test]
fn wireframe_shows_box_edges_and_face_diagonals() {
    let geometry = BoxGeometry::new(4.0, 2.0, 0.1);

    let mut lengths: Vec<f32> = geometry
        .edge_indices()
        .chunks(2)
        .map(|pair| (position(&geometry, pair[1]) - position(&geometry, pair[0])).magnitude())
        .collect();
    lengths.sort_by(|a, b| a.total_cmp(b));

    // each box edge is shared by two faces, each face adds its diagonal twice
    let mut expected = Vec::new();
    expected.extend([0.1_f32; 8]);
    expected.extend([2.0_f32; 8]);
    expected.extend([(2.0_f32 * 2.0 + 0.1 * 0.1).sqrt(); 4]);
    expected.extend([4.0_f32; 8]);
    expected.extend([(4.0_f32 * 4.0 + 0.1 * 0.1).sqrt(); 4]);
    expected.extend([(4.0_f32 * 4.0 + 2.0 * 2.0).sqrt(); 4]);

    assert_eq!(lengths.len(), expected.len());
    for (actual, expected) in lengths.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-5, "{} vs {}", actual, expected);
    }
}

#[test]
fn flat_box_keeps_its_wireframe() {
    let flat = BoxGeometry::new(1.0, 1.0, 0.0);
    let thick = BoxGeometry::new(1.0, 1.0, 1.0);

    assert_eq!(flat.edge_indices(), thick.edge_indices());
    // the +Z face (fifth face, triangles 8 and 9) still outlines a unit square
    let front: Vec<f32> = flat.edge_indices()[48..54]
        .chunks(2)
        .map(|pair| (position(&flat, pair[1]) - position(&flat, pair[0])).magnitude())
        .collect();
    assert!((front[0] - 1.0).abs() < 1e-6);
    assert!((front[1] - 1.0).abs() < 1e-6);
    assert!((front[2] - 2.0_f32.sqrt()).abs() < 1e-6);
}

//! Transform and world-composition tests
//!
//! Tests for:
//! - Local matrix layout: T(position) · R(rotation) · T(-anchor) · S(scale)
//! - Shadow-state dirty checking
//! - World matrix composition through the graph (naive query and traversal)

use std::f32::consts::FRAC_PI_2;

use canopy::scene::graph::SceneGraph;
use canopy::scene::node::Node;
use canopy::scene::transform::Transform;
use canopy::{RecordingRenderer, Scene};
use glam::{Mat4, Vec2};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec2_approx(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn point_through(m: &Mat4, p: Vec2) -> Vec2 {
    m.transform_point3(p.extend(0.0)).truncate()
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec2::ZERO);
    assert_eq!(t.anchor, Vec2::ZERO);
    assert_eq!(t.rotation, 0.0);
    assert_eq!(t.scale, Vec2::ONE);
    assert_eq!(t.local_matrix(), Mat4::IDENTITY);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    assert!(t.update_local_matrix(), "first refresh always builds");
    assert!(!t.update_local_matrix(), "unchanged fields stay cached");

    t.position.x = 3.0;
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

#[test]
fn transform_reads_reflect_latest_fields() {
    let mut t = Transform::from_position(1.0, 2.0);
    let before = t.local_matrix();
    t.set_position(5.0, 6.0);
    let after = t.local_matrix();
    assert_ne!(before, after);
    assert!(vec2_approx(point_through(&after, Vec2::ZERO), Vec2::new(5.0, 6.0)));
}

#[test]
fn transform_anchor_is_pivot_before_rotation() {
    let mut t = Transform::new();
    t.set_position(10.0, 0.0);
    t.set_anchor(1.0, 0.0);
    t.rotation = FRAC_PI_2;
    t.set_uniform_scale(2.0);

    // (0.5, 0) scales onto the anchor, which lands exactly on `position`.
    assert!(vec2_approx(t.transform_point(Vec2::new(0.5, 0.0)), Vec2::new(10.0, 0.0)));
    // One unit past the anchor along +x rotates to +y.
    assert!(vec2_approx(t.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 1.0)));
}

#[test]
fn transform_matrix_matches_explicit_product() {
    let mut t = Transform::new();
    t.position = Vec2::new(4.0, -2.0);
    t.anchor = Vec2::new(0.5, 0.25);
    t.rotation = 0.3;
    t.scale = Vec2::new(2.0, 3.0);

    let expected = Mat4::from_translation(t.position.extend(0.0))
        * Mat4::from_rotation_z(t.rotation)
        * Mat4::from_translation((-t.anchor).extend(0.0))
        * Mat4::from_scale(t.scale.extend(1.0));

    assert!(t.local_matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn transform_helpers_accumulate() {
    let mut t = Transform::new();
    t.translate(Vec2::new(1.0, 1.0));
    t.translate(Vec2::new(2.0, 0.0));
    t.rotate(0.25);
    t.rotate(0.25);
    assert_eq!(t.position, Vec2::new(3.0, 1.0));
    assert!((t.rotation - 0.5).abs() < EPSILON);

    t.reset();
    assert_eq!(t.local_matrix(), Mat4::IDENTITY);
}

// ============================================================================
// World Composition
// ============================================================================

#[test]
fn world_matrix_composes_parent_first() {
    let mut graph = SceneGraph::new();
    let parent = graph.insert(Node::group("parent"));
    let child = graph.insert(Node::group("child"));
    graph.add_child(parent, child).unwrap();

    {
        let p = graph.get_mut(parent).unwrap();
        p.transform.set_position(10.0, 0.0);
        p.transform.rotation = FRAC_PI_2;
    }
    graph.get_mut(child).unwrap().transform.set_position(5.0, 0.0);

    let world = graph.world_matrix(child).unwrap();
    assert!(vec2_approx(point_through(&world, Vec2::ZERO), Vec2::new(10.0, 5.0)));
}

#[test]
fn world_matrix_query_is_always_fresh() {
    let mut graph = SceneGraph::new();
    let parent = graph.insert(Node::group("parent"));
    let child = graph.insert(Node::group("child"));
    graph.add_child(parent, child).unwrap();

    let first = graph.world_matrix(child).unwrap();
    graph.get_mut(parent).unwrap().transform.set_position(0.0, 7.0);
    let second = graph.world_matrix(child).unwrap();

    assert_eq!(first, Mat4::IDENTITY);
    assert!(vec2_approx(point_through(&second, Vec2::ZERO), Vec2::new(0.0, 7.0)));
}

#[test]
fn world_matrix_of_missing_node_is_none() {
    let mut graph = SceneGraph::new();
    let key = graph.insert(Node::group("gone"));
    graph.destroy(key);
    assert!(graph.world_matrix(key).is_none());
}

#[test]
fn traversal_world_matrix_matches_naive_query() {
    let mut scene = Scene::new();
    let a = scene.build_node("a").with_position(3.0, 4.0).with_rotation(0.7).build().unwrap();
    let b = scene
        .build_node("b")
        .with_parent(a)
        .with_position(1.0, 0.0)
        .with_scale(2.0)
        .build()
        .unwrap();
    let c = scene
        .build_node("c")
        .with_parent(b)
        .with_anchor(0.5, 0.5)
        .with_rotation(-0.2)
        .build()
        .unwrap();

    scene.update(0.0, &mut RecordingRenderer::new());

    for key in [a, b, c] {
        let naive = scene.graph().world_matrix(key).unwrap();
        let traversed = *scene.get_node(key).unwrap().world_matrix();
        assert!(naive.abs_diff_eq(traversed, EPSILON), "mismatch for {key:?}");
    }
}

//! Scene Graph Integration Tests
//!
//! Tests for:
//! - Hierarchy: add/remove child, reparenting, cycle and self-parent rejection
//! - Arena: ids from the injected generator, subtree destruction
//! - Tint/alpha composition
//! - Scene facade: builder, root protection, sprite sheets, listeners

use std::cell::Cell;
use std::rc::Rc;

use canopy::resources::{Color, Material, Shader};
use canopy::scene::graph::SceneGraph;
use canopy::scene::node::{Node, NodeKind, ShapeKind, SpriteSheet};
use canopy::scene::scene::Scene;
use canopy::settings::SceneSettings;
use canopy::utils::id::{IdGenerator, NodeId};
use canopy::{CanopyError, RecordingRenderer};
use glam::Vec2;

fn material(label: &'static str) -> Material {
    Material::new(label, Shader::new("flat"))
}

fn group(graph: &mut SceneGraph, name: &str) -> canopy::NodeKey {
    graph.insert(Node::group(name))
}

/// Checks parent/child mutual consistency over the whole arena.
fn assert_tree_invariant(graph: &SceneGraph) {
    for (key, node) in graph.iter() {
        for &child in node.children() {
            assert_eq!(graph.get(child).unwrap().parent(), Some(key));
        }
        if let Some(parent) = node.parent() {
            let siblings = graph.get(parent).unwrap().children();
            assert_eq!(siblings.iter().filter(|&&c| c == key).count(), 1);
        }
    }
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn add_child_links_both_sides() {
    let mut graph = SceneGraph::new();
    let parent = group(&mut graph, "parent");
    let a = group(&mut graph, "a");
    let b = group(&mut graph, "b");

    graph.add_child(parent, a).unwrap();
    graph.add_child(parent, b).unwrap();

    assert_eq!(graph.get(parent).unwrap().children(), &[a, b]);
    assert_eq!(graph.get(a).unwrap().parent(), Some(parent));
    assert_tree_invariant(&graph);
}

#[test]
fn add_child_to_itself_is_rejected() {
    let mut graph = SceneGraph::new();
    let node = group(&mut graph, "solo");

    let err = graph.add_child(node, node).unwrap_err();
    assert!(matches!(err, CanopyError::SelfParenting(_)));
    assert!(graph.get(node).unwrap().children().is_empty());
    assert_eq!(graph.get(node).unwrap().parent(), None);
}

#[test]
fn add_ancestor_as_child_is_rejected_without_mutation() {
    let mut graph = SceneGraph::new();
    let a = group(&mut graph, "a");
    let b = group(&mut graph, "b");
    let c = group(&mut graph, "c");
    graph.add_child(a, b).unwrap();
    graph.add_child(b, c).unwrap();

    let err = graph.add_child(c, a).unwrap_err();
    assert!(matches!(err, CanopyError::CycleDetected { .. }));

    assert_eq!(graph.get(a).unwrap().parent(), None);
    assert_eq!(graph.get(c).unwrap().children(), &[] as &[canopy::NodeKey]);
    assert_eq!(graph.get(b).unwrap().children(), &[c]);
    assert_tree_invariant(&graph);
}

#[test]
fn reparenting_moves_the_child() {
    let mut graph = SceneGraph::new();
    let p1 = group(&mut graph, "p1");
    let p2 = group(&mut graph, "p2");
    let child = group(&mut graph, "child");

    graph.add_child(p1, child).unwrap();
    graph.add_child(p2, child).unwrap();

    assert!(graph.get(p1).unwrap().children().is_empty());
    assert_eq!(graph.get(p2).unwrap().children(), &[child]);
    assert_eq!(graph.get(child).unwrap().parent(), Some(p2));
    assert_tree_invariant(&graph);
}

#[test]
fn re_adding_to_same_parent_moves_to_end() {
    let mut graph = SceneGraph::new();
    let parent = group(&mut graph, "parent");
    let a = group(&mut graph, "a");
    let b = group(&mut graph, "b");
    graph.add_child(parent, a).unwrap();
    graph.add_child(parent, b).unwrap();

    graph.add_child(parent, a).unwrap();

    assert_eq!(graph.get(parent).unwrap().children(), &[b, a]);
}

#[test]
fn remove_child_of_non_child_is_noop() {
    let mut graph = SceneGraph::new();
    let parent = group(&mut graph, "parent");
    let stranger = group(&mut graph, "stranger");
    let other = group(&mut graph, "other");
    graph.add_child(other, stranger).unwrap();

    assert!(!graph.remove_child(parent, stranger));
    assert_eq!(graph.get(stranger).unwrap().parent(), Some(other));
}

#[test]
fn remove_child_clears_parent() {
    let mut graph = SceneGraph::new();
    let parent = group(&mut graph, "parent");
    let child = group(&mut graph, "child");
    graph.add_child(parent, child).unwrap();

    assert!(graph.remove_child(parent, child));
    assert_eq!(graph.get(child).unwrap().parent(), None);
    assert!(graph.get(parent).unwrap().children().is_empty());
}

#[test]
fn missing_keys_are_reported() {
    let mut graph = SceneGraph::new();
    let parent = group(&mut graph, "parent");
    let dead = group(&mut graph, "dead");
    graph.destroy(dead);

    assert!(matches!(
        graph.add_child(parent, dead),
        Err(CanopyError::NodeNotFound(key)) if key == dead
    ));
}

#[test]
fn ancestors_walk_to_the_top() {
    let mut graph = SceneGraph::new();
    let a = group(&mut graph, "a");
    let b = group(&mut graph, "b");
    let c = group(&mut graph, "c");
    graph.add_child(a, b).unwrap();
    graph.add_child(b, c).unwrap();

    assert_eq!(graph.ancestors(c).collect::<Vec<_>>(), vec![b, a]);
    assert!(graph.is_ancestor(a, c));
    assert!(!graph.is_ancestor(c, a));
}

// ============================================================================
// Arena & Ids
// ============================================================================

#[test]
fn destroy_removes_whole_subtree() {
    let mut graph = SceneGraph::new();
    let keep = group(&mut graph, "keep");
    let parent = group(&mut graph, "parent");
    let child = group(&mut graph, "child");
    let grandchild = group(&mut graph, "grandchild");
    graph.add_child(keep, parent).unwrap();
    graph.add_child(parent, child).unwrap();
    graph.add_child(child, grandchild).unwrap();

    assert_eq!(graph.destroy(parent), 3);
    assert!(graph.get(parent).is_none());
    assert!(graph.get(grandchild).is_none());
    assert!(graph.get(keep).unwrap().children().is_empty());
    assert_eq!(graph.len(), 1);
}

#[test]
fn ids_come_from_injected_generator() {
    let mut graph = SceneGraph::with_id_generator(IdGenerator::starting_at(100));
    let a = group(&mut graph, "a");
    let b = group(&mut graph, "b");

    assert_eq!(graph.get(a).unwrap().id().get(), 100);
    assert_eq!(graph.get(b).unwrap().id().get(), 101);
}

#[test]
fn ids_are_never_reused() {
    let mut graph = SceneGraph::new();
    let a = group(&mut graph, "a");
    let first = graph.get(a).unwrap().id();
    graph.destroy(a);
    let b = group(&mut graph, "b");
    assert!(graph.get(b).unwrap().id() > first);
}

#[test]
fn detached_node_has_unassigned_id() {
    let node = Node::group("loose");
    assert_eq!(node.id(), NodeId::UNASSIGNED);
    assert!(!node.id().is_assigned());
}

// ============================================================================
// Color Composition
// ============================================================================

#[test]
fn tint_and_alpha_compose_multiplicatively() {
    let mut graph = SceneGraph::new();
    let parent = group(&mut graph, "parent");
    let child = group(&mut graph, "child");
    graph.add_child(parent, child).unwrap();

    {
        let p = graph.get_mut(parent).unwrap();
        p.set_tint(Color::new(0.5, 1.0, 1.0));
        p.set_alpha(0.5);
    }
    {
        let c = graph.get_mut(child).unwrap();
        c.set_tint(Color::new(1.0, 0.5, 1.0));
        c.set_alpha(0.5);
    }

    let (color, alpha) = graph.composed_color(child).unwrap();
    assert_eq!(color, Color::new(0.5, 0.5, 1.0));
    assert_eq!(alpha, 0.25);
}

#[test]
fn setters_clamp_alpha_and_tint() {
    let mut node = Node::group("n");
    node.set_alpha(1.5);
    assert_eq!(node.alpha, 1.0);
    node.set_alpha(-0.5);
    assert_eq!(node.alpha, 0.0);
    node.set_tint(Color::new(2.0, -1.0, 0.5));
    assert_eq!(node.tint, Color::new(1.0, 0.0, 0.5));
}

#[test]
fn traversal_composes_tint_and_alpha() {
    let mut scene = Scene::new();
    let mat = material("m");
    let parent = scene
        .build_node("parent")
        .with_tint(Color::new(0.5, 1.0, 1.0))
        .with_alpha(0.5)
        .build()
        .unwrap();
    let child = scene
        .build_node("child")
        .with_parent(parent)
        .shape(ShapeKind::Rect { width: 4.0, height: 4.0 }, mat)
        .with_tint(Color::new(1.0, 0.5, 1.0))
        .with_alpha(0.5)
        .build()
        .unwrap();

    scene.update(0.0, &mut RecordingRenderer::new());

    let node = scene.get_node(child).unwrap();
    assert_eq!(node.world_color(), Color::new(0.5, 0.5, 1.0));
    assert_eq!(node.world_alpha(), 0.25);
}

// ============================================================================
// Scene Facade
// ============================================================================

#[test]
fn builder_attaches_under_root_by_default() {
    let mut scene = Scene::new();
    let key = scene.build_node("child").build().unwrap();
    assert_eq!(scene.get_node(key).unwrap().parent(), Some(scene.root()));
    assert_eq!(scene.get_node(key).unwrap().name, "child");
}

#[test]
fn builder_with_dead_parent_fails_cleanly() {
    let mut scene = Scene::new();
    let parent = scene.build_node("parent").build().unwrap();
    scene.remove_node(parent);
    let before = scene.graph().len();

    let result = scene.build_node("orphan").with_parent(parent).build();
    assert!(matches!(result, Err(CanopyError::NodeNotFound(_))));
    assert_eq!(scene.graph().len(), before);
}

#[test]
fn builder_variant_keeps_name_and_transform() {
    let mut scene = Scene::new();
    let key = scene
        .build_node("image")
        .with_position(3.0, 4.0)
        .static_image(16.0, 8.0, material("img"))
        .build()
        .unwrap();
    let node = scene.get_node(key).unwrap();
    assert_eq!(node.name, "image");
    assert_eq!(node.transform.position, Vec2::new(3.0, 4.0));
    assert!(matches!(node.kind(), NodeKind::StaticImage { width, height } if *width == 16.0 && *height == 8.0));
    assert!(node.material.is_some());
}

#[test]
fn scene_root_cannot_be_removed() {
    let mut scene = Scene::new();
    let root = scene.root();
    assert_eq!(scene.remove_node(root), 0);
    assert!(scene.get_node(root).is_some());
}

#[test]
fn scene_root_takes_first_injected_id() {
    let scene = Scene::with_id_generator(IdGenerator::starting_at(42), SceneSettings::default()).unwrap();
    assert_eq!(scene.get_node(scene.root()).unwrap().id().get(), 42);
}

#[test]
fn pre_update_listeners_run_every_frame() {
    let mut scene = Scene::new();
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    scene.add_pre_update_listener(move |_, dt| {
        assert_eq!(dt, 0.5);
        seen.set(seen.get() + 1);
    });

    let mut renderer = RecordingRenderer::new();
    scene.update(0.5, &mut renderer);
    scene.update(0.5, &mut renderer);
    assert_eq!(calls.get(), 2);
}

#[test]
fn listener_changes_are_visible_in_same_frame() {
    let mut scene = Scene::new();
    let key = scene
        .build_node("hidden")
        .shape(ShapeKind::Rect { width: 1.0, height: 1.0 }, material("m"))
        .with_alpha(0.5)
        .visible(false)
        .build()
        .unwrap();
    scene.add_pre_update_listener(move |graph, _| {
        if let Some(node) = graph.get_mut(key) {
            node.visible = true;
        }
    });

    scene.update(0.0, &mut RecordingRenderer::new());
    assert_eq!(scene.render_plan().singles(), &[key]);
}

// ============================================================================
// Sprite Sheets
// ============================================================================

#[test]
fn sprite_sheet_advance_rewrites_uvs() {
    let mut scene = Scene::new();
    let sheet = SpriteSheet::new(2, 2, 0.1);
    let key = scene
        .build_node("walk")
        .sprite_sheet(sheet, Vec2::new(16.0, 16.0), material("atlas"))
        .build()
        .unwrap();

    let node = scene.get_node_mut(key).unwrap();
    assert_eq!(node.geometry.uvs()[0], Vec2::ZERO);
    assert!(node.geometry.take_dirty());

    scene.update(0.1, &mut RecordingRenderer::new());

    let node = scene.get_node(key).unwrap();
    assert!(node.geometry.is_dirty());
    assert_eq!(node.geometry.uvs()[0], Vec2::new(0.5, 0.0));
    assert_eq!(node.geometry.uvs()[2], Vec2::new(1.0, 0.5));
}

#[test]
fn sprite_sheet_loops_and_stops() {
    let mut looping = SpriteSheet::new(3, 1, 1.0);
    assert!(looping.advance(1.0));
    assert!(looping.advance(1.0));
    assert!(looping.advance(1.0));
    assert_eq!(looping.current_frame(), 0);

    let mut once = SpriteSheet::new(3, 1, 1.0).looping(false);
    once.advance(10.0);
    assert_eq!(once.current_frame(), 2);
    assert!(!once.advance(1.0));
}

#[test]
fn set_sprite_frame_on_other_kinds_is_false() {
    let mut scene = Scene::new();
    let key = scene.build_node("plain").build().unwrap();
    assert!(!scene.graph_mut().set_sprite_frame(key, 3).unwrap());
}

#[test]
fn set_sprite_frame_wraps() {
    let mut scene = Scene::new();
    let key = scene
        .build_node("sheet")
        .sprite_sheet(SpriteSheet::new(2, 2, 0.0), Vec2::ONE, material("atlas"))
        .build()
        .unwrap();

    assert!(scene.graph_mut().set_sprite_frame(key, 7).unwrap());
    let node = scene.get_node(key).unwrap();
    assert!(matches!(node.kind(), NodeKind::SpriteSheet(s) if s.current_frame() == 3));
    assert_eq!(node.geometry.uvs()[0], Vec2::new(0.5, 0.5));
}

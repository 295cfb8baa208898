use super::*;
use crate::assets::color::Color;
use crate::foundation::core::Rgba8Premul;
use crate::scene::node::Mesh;

fn pair() -> ScenePair {
    ScenePair::new(
        SceneGraph::new(Rgba8Premul::opaque(255, 255, 255)),
        SceneGraph::new(Rgba8Premul::opaque(70, 130, 180)),
    )
}

fn model(color: Color) -> ModelNode {
    let mut m = ModelNode::with_mesh(
        "body",
        Mesh {
            positions: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            triangles: vec![[0, 1, 2]],
            color,
        },
    );
    m.set_shadows(true, true);
    m
}

#[test]
fn create_entity_mirrors_into_wireframe_scene() {
    let mut p = pair();
    let e = p.create_entity("witch", model(Color::from_rgb8(1, 2, 3)));
    assert_eq!(p.scene(SceneKind::Shaded).count_named("witch"), 1);
    assert_eq!(p.scene(SceneKind::Wireframe).count_named("witch"), 1);
    assert_eq!(p.scene(SceneKind::Wireframe).len(), 2);

    let wire_child = p.scene(SceneKind::Wireframe).node(e.wireframe()).unwrap().children()[0];
    let node = p.scene(SceneKind::Wireframe).node(wire_child).unwrap();
    assert!(node.cast_shadow);
    assert!(node.receive_shadow);
    assert_ne!(e.shaded(), NodeId(u32::MAX));
}

#[test]
fn transform_writes_reach_both_nodes() {
    let mut p = pair();
    let e = p.create_entity("bear", model(Color::from_rgb8(1, 2, 3)));
    p.set_component(&e, Channel::Position, Axis::X, -6.0);
    p.set_channel(&e, Channel::Rotation, DVec3::new(0.0, 1.0, 0.0));

    let wire = p.scene(SceneKind::Wireframe).node(e.wireframe()).unwrap();
    assert_eq!(wire.transform.position.x, -6.0);
    assert_eq!(wire.transform.rotation.y, 1.0);
    assert!(p.is_synchronized(&e));
    assert_eq!(p.channel(&e, Channel::Position).x, -6.0);
}

#[test]
fn duplicate_registration_replaces_model_without_duplicating_nodes() {
    let mut p = pair();
    let first = p.create_entity("witch", model(Color::from_rgb8(255, 0, 0)));
    p.set_component(&first, Channel::Position, Axis::X, 6.0);

    let second = p.create_entity("witch", model(Color::from_rgb8(0, 255, 0)));
    assert_eq!(first, second);
    assert_eq!(p.entities().len(), 1);
    for kind in [SceneKind::Shaded, SceneKind::Wireframe] {
        let scene = p.scene(kind);
        assert_eq!(scene.count_named("witch"), 1);
        assert_eq!(scene.count_named("body"), 1);
        assert_eq!(scene.roots().len(), 1);
    }

    // The transform survives; the mesh is the new one.
    assert_eq!(p.channel(&second, Channel::Position).x, 6.0);
    let shaded = p.scene(SceneKind::Shaded);
    let body = shaded.node(second.shaded()).unwrap().children()[0];
    let color = shaded.node(body).unwrap().mesh.as_ref().unwrap().color;
    assert_eq!(color, Color::from_rgb8(0, 255, 0));
}

#[test]
fn strict_registration_rejects_duplicates() {
    let mut p = pair();
    p.try_create_entity("witch", model(Color::from_rgb8(1, 1, 1)))
        .unwrap();
    let err = p
        .try_create_entity("witch", model(Color::from_rgb8(1, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, TwinviewError::DuplicateEntity(ref n) if n == "witch"));
    assert_eq!(p.scene(SceneKind::Shaded).count_named("witch"), 1);
}

use super::*;
use crate::assets::model::builtin_model;
use crate::assets::resolver::ResolvedModels;
use crate::config::StageConfig;

fn stage_with(names: &[&str]) -> (Stage, ResolvedEntities) {
    let mut stage = Stage::from_config(&StageConfig::default()).unwrap();
    let entities = stage.populate(ResolvedModels {
        models: names
            .iter()
            .map(|n| ((*n).to_owned(), builtin_model("box").unwrap()))
            .collect(),
        failures: Vec::new(),
    });
    (stage, entities)
}

#[test]
fn parses_every_target_form() {
    assert_eq!(
        TargetPath::parse("witch.position").unwrap(),
        TargetPath::Entity {
            name: "witch".into(),
            channel: Channel::Position
        }
    );
    assert_eq!(
        TargetPath::parse("bear.rotation").unwrap(),
        TargetPath::Entity {
            name: "bear".into(),
            channel: Channel::Rotation
        }
    );
    assert_eq!(TargetPath::parse("cameras.position").unwrap(), TargetPath::Cameras);
    assert_eq!(TargetPath::parse("camera[1].position").unwrap(), TargetPath::Camera(1));
    assert_eq!(TargetPath::parse("look_at").unwrap(), TargetPath::LookAt);
    assert_eq!(TargetPath::parse("views[1]").unwrap(), TargetPath::Viewport(1));
    assert_eq!(TargetPath::parse("viewport[0]").unwrap(), TargetPath::Viewport(0));
}

#[test]
fn rejects_malformed_targets() {
    assert!(TargetPath::parse("witch").is_err());
    assert!(TargetPath::parse("witch.scale").is_err());
    assert!(TargetPath::parse(".position").is_err());
    assert!(TargetPath::parse("views[x]").is_err());
}

#[test]
fn group_camera_target_expands_to_every_camera() {
    let (stage, entities) = stage_with(&[]);
    let props = TargetPath::Cameras.resolve("z", &stage, &entities).unwrap();
    assert_eq!(props.len(), 2);
    assert!(TargetPath::Camera(5).resolve("z", &stage, &entities).is_err());
}

#[test]
fn unknown_keys_and_missing_entities() {
    let (stage, entities) = stage_with(&["witch"]);
    let witch = TargetPath::parse("witch.position").unwrap();
    assert!(witch.resolve("w", &stage, &entities).is_err());
    assert!(
        TargetPath::Viewport(1)
            .resolve("width", &stage, &entities)
            .is_err()
    );
    let bear = TargetPath::parse("bear.position").unwrap();
    assert!(bear.resolve("x", &stage, &entities).unwrap().is_empty());
}

#[test]
fn entity_writes_reach_both_scenes() {
    let (mut stage, entities) = stage_with(&["witch"]);
    let prop = TargetPath::parse("witch.position")
        .unwrap()
        .resolve("x", &stage, &entities)
        .unwrap()
        .remove(0);
    prop.write(&mut stage, 6.0);
    assert_eq!(prop.read(&stage), 6.0);
    let e = entities.get("witch").unwrap();
    assert!(stage.scenes.is_synchronized(e));
    assert_eq!(prop.to_string(), "witch.position.x");
}

#[test]
fn viewport_and_look_at_writes() {
    let (mut stage, _) = stage_with(&[]);
    Property::ViewportHeight(1).write(&mut stage, 0.5);
    Property::ViewportBottom(1).write(&mut stage, 0.25);
    Property::LookAt(Axis::Y).write(&mut stage, 1.0);
    let v = stage.viewports.get(1).unwrap();
    assert_eq!((v.bottom, v.height), (0.25, 0.5));
    assert_eq!(stage.look_at.y, 1.0);
}

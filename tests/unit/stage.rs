use super::*;
use crate::assets::model::builtin_model;

fn resolved(names: &[&str]) -> ResolvedModels {
    ResolvedModels {
        models: names
            .iter()
            .map(|n| ((*n).to_owned(), builtin_model("box").unwrap()))
            .collect(),
        failures: Vec::new(),
    }
}

#[test]
fn default_stage_is_dressed() {
    let stage = Stage::from_config(&StageConfig::default()).unwrap();
    assert_eq!(stage.cameras.len(), 2);
    assert_eq!(stage.viewports.len(), 2);
    assert_eq!(stage.look_at, DVec3::new(0.0, 3.0, 0.0));

    let shaded = stage.scene(SceneKind::Shaded);
    assert_eq!(shaded.count_named("floor"), 1);
    assert!(shaded.fog.is_some());
    assert!(shaded.directional.is_some_and(|l| l.cast_shadow));
    assert_eq!(shaded.background.to_array(), [255, 255, 255, 255]);

    let wire = stage.scene(SceneKind::Wireframe);
    assert!(wire.is_empty());
    assert!(wire.override_material.is_some());
    assert_eq!(wire.background.to_array(), [70, 130, 180, 255]);
}

#[test]
fn cameras_start_at_configured_pose() {
    let stage = Stage::from_config(&StageConfig::default()).unwrap();
    for cam in &stage.cameras {
        assert_eq!(cam.position, DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(cam.fov_deg, 75.0);
        assert!((cam.aspect - 1280.0 / 720.0).abs() < 1e-12);
    }
}

#[test]
fn populate_registers_each_name_once() {
    let mut stage = Stage::from_config(&StageConfig::default()).unwrap();
    let entities = stage.populate(resolved(&["witch", "bear", "witch"]));
    assert_eq!(entities.len(), 2);
    assert!(entities.get("witch").is_some());
    assert!(entities.get("dragon").is_none());
    assert_eq!(stage.scene(SceneKind::Wireframe).count_named("witch"), 1);
    assert_eq!(stage.scene(SceneKind::Shaded).count_named("witch"), 1);
}

#[test]
fn startup_pixel_ratio_is_capped() {
    let cfg = StageConfig {
        device_pixel_ratio: 3.0,
        ..StageConfig::default()
    };
    assert_eq!(Stage::from_config(&cfg).unwrap().pixel_ratio(), 2.0);

    let cfg = StageConfig {
        device_pixel_ratio: 1.5,
        ..StageConfig::default()
    };
    assert_eq!(Stage::from_config(&cfg).unwrap().pixel_ratio(), 1.5);
}

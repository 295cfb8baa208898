use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = StageConfig::from_reader(&b"{}"[..]).unwrap();
    assert_eq!(cfg, StageConfig::default());
    assert_eq!(cfg.timeline.sections.len(), 4);
    assert_eq!(cfg.models[0].name, "witch");
    assert_eq!(cfg.camera.fov_deg, 75.0);
}

#[test]
fn partial_overrides_keep_other_defaults() {
    let json = serde_json::json!({
        "camera": { "fov_deg": 50.0 },
        "colors": { "blue": "navy" },
        "models": [ { "name": "cube", "source": "builtin:box" } ]
    });
    let cfg = StageConfig::from_reader(json.to_string().as_bytes()).unwrap();
    assert_eq!(cfg.camera.fov_deg, 50.0);
    assert_eq!(cfg.camera.far, 100.0);
    assert_eq!(cfg.colors.blue, Color::from_rgb8(0, 0, 128));
    assert!(cfg.models[0].shadows);
}

#[test]
fn rejects_duplicate_models_and_bad_camera_refs() {
    let mut cfg = StageConfig::default();
    cfg.models.push(cfg.models[0].clone());
    assert!(cfg.validate().is_err());

    let mut cfg = StageConfig::default();
    cfg.viewports[1].camera = 7;
    assert!(cfg.validate().is_err());

    let mut cfg = StageConfig::default();
    cfg.pixel_ratio_cap = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = StageConfig::default();
    cfg.device_pixel_ratio = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(StageConfig::from_reader(&br#"{ "camra": {} }"#[..]).is_err());
}

#[test]
fn round_trips_through_json() {
    let cfg = StageConfig::default();
    let text = serde_json::to_string(&cfg).unwrap();
    let back = StageConfig::from_reader(text.as_bytes()).unwrap();
    assert_eq!(back, cfg);
}

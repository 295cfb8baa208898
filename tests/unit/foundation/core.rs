use super::*;

#[test]
fn surface_size_rejects_zero() {
    assert!(SurfaceSize::new(0, 10).is_err());
    assert!(SurfaceSize::new(10, 0).is_err());
    assert!(SurfaceSize::new(10, 10).is_ok());
}

#[test]
fn aspect_is_width_over_height() {
    let s = SurfaceSize::new(1600, 900).unwrap();
    assert!((s.aspect() - 1600.0 / 900.0).abs() < 1e-12);
}

#[test]
fn scaled_uses_pixel_ratio_and_ignores_garbage() {
    let s = SurfaceSize::new(100, 50).unwrap();
    assert_eq!(s.scaled(2.0), (200, 100));
    assert_eq!(s.scaled(f64::NAN), (100, 50));
    assert_eq!(s.scaled(-1.0), (100, 50));
}

#[test]
fn region_flips_to_top_left() {
    let r = Region {
        x: 0.0,
        y: 25.0,
        width: 100.0,
        height: 50.0,
    };
    let tl = r.to_top_left(100.0);
    assert_eq!(tl.y0, 25.0);
    assert_eq!(tl.y1, 75.0);
}

#[test]
fn pixel_bounds_are_clipped_to_surface() {
    let r = Region {
        x: -10.0,
        y: 80.0,
        width: 200.0,
        height: 50.0,
    };
    // Top edge above the surface is clipped to row 0.
    assert_eq!(r.pixel_bounds(100, 100), (0, 0, 100, 20));
}

#[test]
fn mix_hits_endpoints_and_clamps() {
    let c = Rgba8Premul::opaque(200, 100, 0);
    let w = Rgba8Premul::opaque(255, 255, 255);
    assert_eq!(c.mix(w, 1.0), w);
    assert_eq!(c.mix(w, 0.0), c);
    assert_eq!(c.mix(w, 3.0), w);
}

#[test]
fn axis_reads_and_writes_components() {
    let mut v = DVec3::new(1.0, 2.0, 3.0);
    assert_eq!(Axis::Y.get(v), 2.0);
    Axis::Z.set(&mut v, -1.0);
    assert_eq!(v, DVec3::new(1.0, 2.0, -1.0));
    assert_eq!(Axis::from_key("x"), Some(Axis::X));
    assert_eq!(Axis::from_key("w"), None);
}

use approx::assert_relative_eq;
use proptest::prelude::*;
use waveshelf::export::inspect::{compare, describe_shapes, inspect, read_dxf};
use waveshelf::params::{BackplaneShape, SlotStyle};
use waveshelf::math::Point2D;
use waveshelf::sketch::{Interpolation, Profile, ProfileSequence, ProfileSpacing, TransformKeyframe};
use waveshelf::{
    BackplaneParams, ExportFormat, RibShape, Shelf, ShelfConfig, ShelfError, ShelfParams,
};

fn reference_shelf() -> Shelf {
    let config = ShelfConfig {
        shelf: ShelfParams::default(),
        backplane: BackplaneParams::default().with_excluded_slot(5),
    };
    Shelf::new(config).unwrap()
}

fn dxf_text(shelf: &Shelf) -> String {
    let file = shelf.export(ExportFormat::Dxf).unwrap();
    String::from_utf8(file.bytes).unwrap()
}

#[test]
fn test_reference_scenario() {
    let shelf = reference_shelf();

    let wave = shelf.wave_path();
    assert_eq!(wave.len(), 11);
    assert_relative_eq!(wave[0].x, -600.0);
    assert_relative_eq!(wave[10].x, 600.0);

    let layout = shelf.layout();
    assert!(layout.sheet_count() >= 1);
    assert_eq!(layout.rib_count(), 11);
    assert_eq!(layout.slot_count(), 10);

    let entities = read_dxf(&dxf_text(&shelf)).unwrap();
    let closed = entities.iter().filter(|e| e.shape.is_closed()).count();
    assert_eq!(closed, layout.sheet_count() + 11 + 1 + 10);
}

#[test]
fn test_every_shape_exports_closed_outlines() {
    for shape in [RibShape::Square, RibShape::Rectangle, RibShape::Circle] {
        for bp_shape in [BackplaneShape::Rectangular, BackplaneShape::Organic] {
            let config = ShelfConfig {
                shelf: ShelfParams::default().with_shape(shape),
                backplane: BackplaneParams::default().with_shape(bp_shape),
            };
            let shelf = Shelf::new(config).unwrap();
            let layout = shelf.layout();
            let report = inspect(&dxf_text(&shelf), 12.0).unwrap();
            assert_eq!(
                report.closed_entities,
                layout.sheet_count() + 11 + 1 + 11,
                "{shape:?} with {bp_shape:?}"
            );

            let svg = String::from_utf8(shelf.export(ExportFormat::Svg).unwrap().bytes).unwrap();
            assert!(svg.contains("scale(1,-1)"));
            let elements = svg.matches("<path").count() + svg.matches("<circle").count();
            assert_eq!(elements, report.closed_entities);
        }
    }
}

#[test]
fn test_preview_meshes_are_closed() {
    for shape in [RibShape::Square, RibShape::Circle] {
        let shelf = Shelf::new(ShelfConfig {
            shelf: ShelfParams::default().with_shape(shape),
            ..Default::default()
        })
        .unwrap();
        let assembly = shelf.assembly();
        assert_eq!(assembly.ribs.len(), 11);
        for rib in &assembly.ribs {
            assert!(rib.mesh.is_closed(), "{shape:?} rib {}", rib.index);
        }
        assert_eq!(assembly.rods.len(), 2);
    }
}

#[test]
fn test_stl_export() {
    let file = reference_shelf().export(ExportFormat::Stl).unwrap();
    assert_eq!(file.filename, "waveshelf-1200mm-11ribs.stl");
    let count = u32::from_le_bytes([file.bytes[80], file.bytes[81], file.bytes[82], file.bytes[83]]);
    assert!(count > 0);
    assert_eq!(file.bytes.len(), 84 + count as usize * 50);
}

#[test]
fn test_freeform_blend_exports() {
    let square = Profile::from_points(&[
        Point2D::new(0.0, 0.0),
        Point2D::new(1.0, 0.0),
        Point2D::new(1.0, 1.0),
        Point2D::new(0.0, 1.0),
    ]);
    let trapezoid = Profile::from_points(&[
        Point2D::new(0.0, 0.0),
        Point2D::new(1.0, 0.0),
        Point2D::new(0.8, 1.0),
        Point2D::new(0.2, 1.0),
    ]);
    let profiles = ProfileSequence {
        profiles: vec![square, trapezoid],
        spacing: ProfileSpacing::Even,
        interpolation: Interpolation::Linear,
    };
    let shelf = Shelf::new(ShelfConfig {
        shelf: ShelfParams::default()
            .with_shape(RibShape::Freeform)
            .with_profiles(Some(profiles)),
        ..Default::default()
    })
    .unwrap();

    for rib in &shelf.assembly().ribs {
        assert!(rib.mesh.is_closed());
    }
    let report = inspect(&dxf_text(&shelf), 12.0).unwrap();
    assert_eq!(report.layers.get("RIB"), Some(&11));
}

#[test]
fn test_crossed_profile_is_not_exported() {
    let bow_tie = Profile::from_points(&[
        Point2D::new(0.0, 0.0),
        Point2D::new(1.0, 1.0),
        Point2D::new(1.0, 0.0),
        Point2D::new(0.0, 1.0),
    ]);
    let shelf = Shelf::new(ShelfConfig {
        shelf: ShelfParams::default()
            .with_shape(RibShape::Freeform)
            .with_profiles(Some(ProfileSequence::single(bow_tie))),
        ..Default::default()
    })
    .unwrap();
    for format in [ExportFormat::Dxf, ExportFormat::Svg] {
        assert!(matches!(
            shelf.export(format),
            Err(ShelfError::Export(waveshelf::ExportError::SelfIntersecting { .. }))
        ));
    }
}

#[test]
fn test_keyframes_scale_ribs() {
    let keyframes = vec![
        TransformKeyframe {
            position: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        },
        TransformKeyframe {
            position: 1.0,
            scale_x: 2.0,
            scale_y: 2.0,
            rotation: 0.0,
        },
    ];
    let shelf = Shelf::new(ShelfConfig {
        shelf: ShelfParams::default().with_keyframes(keyframes),
        ..Default::default()
    })
    .unwrap();
    let ribs = shelf.rib_profiles();
    assert_relative_eq!(ribs[0].height, 75.0);
    assert_relative_eq!(ribs[5].height, 112.5);
    assert_relative_eq!(ribs[10].height, 150.0);
}

#[test]
fn test_dogbone_slots_classify_as_slots() {
    let shelf = Shelf::new(ShelfConfig {
        backplane: BackplaneParams {
            slot_style: SlotStyle::Dogbone,
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap();
    let report = inspect(&dxf_text(&shelf), 12.0).unwrap();
    assert_eq!(report.classification.slots.len(), 11);
}

#[test]
fn test_compare_against_self_and_organic() {
    let reference = describe_shapes(&read_dxf(&dxf_text(&reference_shelf())).unwrap());
    let same = compare(&reference, &reference, 12.0);
    assert!(same.rib_count_match && same.slot_count_match);
    assert!(same.slot_width_consistency);

    // A taller wave so the organic panel still reads as a backplane.
    let organic = Shelf::new(ShelfConfig {
        shelf: ShelfParams::default().with_wave(6.0, 1.5),
        backplane: BackplaneParams::default().with_shape(BackplaneShape::Organic),
    })
    .unwrap();
    let generated = describe_shapes(&read_dxf(&dxf_text(&organic)).unwrap());
    let report = compare(&generated, &reference, 12.0);
    assert!(report.is_backplane_organic_generated);
    assert!(!report.is_backplane_organic_reference);
    assert!(report.overall_score > same.overall_score);
}

#[test]
fn test_config_files_drive_the_pipeline() {
    let dir = std::env::temp_dir().join(format!("waveshelf-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let config = ShelfConfig {
        shelf: ShelfParams::default().with_rib_count(6),
        ..Default::default()
    };
    let toml_path = dir.join("shelf.toml");
    std::fs::write(&toml_path, config.to_toml_string().unwrap()).unwrap();
    let json_path = dir.join("shelf.json");
    std::fs::write(&json_path, config.to_json_string().unwrap()).unwrap();

    for path in [&toml_path, &json_path] {
        let shelf = Shelf::load(path).unwrap();
        assert_eq!(shelf.config(), &config);
        assert_eq!(shelf.layout().rib_count(), 7);
    }

    std::fs::write(&toml_path, "[shelf]\nrib_count = 0\n").unwrap();
    assert!(matches!(Shelf::load(&toml_path), Err(ShelfError::Params(_))));
    std::fs::remove_dir_all(&dir).ok();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_one_closed_outline_per_part(
        rib_count in 1usize..30,
        amplitude in 0.0f64..4.0,
        excluded in 0usize..30,
    ) {
        let config = ShelfConfig {
            shelf: ShelfParams::default().with_rib_count(rib_count).with_wave(amplitude, 1.5),
            backplane: BackplaneParams::default().with_excluded_slot(excluded),
        };
        let shelf = Shelf::new(config).unwrap();
        let layout = shelf.layout();
        let slots = if excluded <= rib_count { rib_count } else { rib_count + 1 };
        prop_assert_eq!(layout.slot_count(), slots);

        let entities = read_dxf(&dxf_text(&shelf)).unwrap();
        let closed = entities.iter().filter(|e| e.shape.is_closed()).count();
        prop_assert_eq!(closed, layout.sheet_count() + rib_count + 1 + 1 + slots);
    }
}

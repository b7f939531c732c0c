mod common;

use approx::assert_relative_eq;
use cga_generate::{EncoderOptions, ModelGenerator};
use config::constants::IN_MEMORY_ENCODER_ID;
use serde_json::json;

use common::{counting_context, octagon_box, overrides, quad, unit_box, write_package};

#[test]
fn two_boxes_generate_two_models() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, engine) = counting_context();
    let generator = ModelGenerator::new(context, vec![unit_box(0.0), unit_box(3.0)]);

    let models = generator
        .generate(
            &[overrides(json!({ "startRule": "default$init", "seed": 42 }))],
            Some(package.as_path()),
            IN_MEMORY_ENCODER_ID,
            &EncoderOptions::new(),
        )
        .unwrap();

    assert_eq!(engine.generate_calls(), 1);
    let indices: Vec<u32> = models.iter().map(|m| m.initial_shape_index()).collect();
    assert_eq!(indices, vec![0, 1]);
    for model in &models {
        assert!(!model.vertices().is_empty());
        assert!(!model.report().is_empty());
        assert_relative_eq!(model.report()["seed"].as_float().unwrap(), 42.0);
        let face_total: u32 = model.face_counts().iter().sum();
        assert_eq!(face_total as usize, model.indices().len());
    }
}

#[test]
fn two_single_face_boxes_generate_two_models() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, engine) = counting_context();
    let generator = ModelGenerator::new(context, vec![octagon_box(0.0), octagon_box(3.0)]);

    let models = generator
        .generate(
            &[overrides(json!({ "startRule": "default$init", "seed": 42 }))],
            Some(package.as_path()),
            IN_MEMORY_ENCODER_ID,
            &EncoderOptions::new(),
        )
        .unwrap();

    assert_eq!(engine.generate_calls(), 1);
    let indices: Vec<u32> = models.iter().map(|m| m.initial_shape_index()).collect();
    assert_eq!(indices, vec![0, 1]);
    for model in &models {
        assert!(!model.vertices().is_empty());
        assert!(!model.report().is_empty());
        assert_eq!(model.report()["faceCount"].as_float(), Some(1.0));
    }
}

#[test]
fn repeat_generation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, engine) = counting_context();
    let generator = ModelGenerator::new(context, vec![unit_box(0.0), unit_box(3.0)]);
    let sets = [overrides(json!({ "seed": 42 }))];

    let first = generator
        .generate(&sets, Some(package.as_path()), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap();
    let second = generator
        .generate(&sets, Some(package.as_path()), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap();
    let third = generator.generate_another(&sets).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(engine.generate_calls(), 3);
}

#[test]
fn single_set_applies_to_every_shape() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, _) = counting_context();
    let generator = ModelGenerator::new(context, vec![quad(0.0), quad(2.0), quad(4.0)]);

    let models = generator
        .generate(
            &[overrides(json!({ "seed": 9, "shapeName": "Lot", "startRule": "default$lot" }))],
            Some(package.as_path()),
            IN_MEMORY_ENCODER_ID,
            &EncoderOptions::new(),
        )
        .unwrap();

    assert_eq!(models.len(), 3);
    for model in &models {
        let report = model.report();
        assert_eq!(report["seed"].as_float(), Some(9.0));
        assert_eq!(report["shapeName"].as_str(), Some("Lot"));
        assert_eq!(report["startRule"].as_str(), Some("default$lot"));
    }
}

#[test]
fn per_shape_sets_stay_with_their_shape() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, _) = counting_context();
    let generator = ModelGenerator::new(context, vec![quad(0.0), quad(2.0), quad(4.0)]);

    let sets = [
        overrides(json!({ "seed": 1, "height": 2 })),
        overrides(json!({ "shapeName": "Middle" })),
        overrides(json!({ "seed": 3, "startRule": "default$tall", "height": 7.5 })),
        overrides(json!({ "seed": 99 })),
    ];
    let models = generator
        .generate(&sets, Some(package.as_path()), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap();

    assert_eq!(models.len(), 3);
    let r0 = models[0].report();
    assert_eq!(r0["seed"].as_float(), Some(1.0));
    assert_eq!(r0["height"].as_float(), Some(2.0));
    assert_eq!(r0["shapeName"].as_str(), Some("InitialShape"));

    let r1 = models[1].report();
    assert_eq!(r1["seed"].as_float(), Some(666.0));
    assert_eq!(r1["shapeName"].as_str(), Some("Middle"));
    assert_eq!(r1["height"].as_float(), Some(10.0));

    let r2 = models[2].report();
    assert_eq!(r2["seed"].as_float(), Some(3.0));
    assert_eq!(r2["startRule"].as_str(), Some("default$tall"));
    assert_relative_eq!(r2["height"].as_float().unwrap(), 7.5);
}

#[test]
fn failing_shape_is_absent_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, _) = counting_context();
    let generator = ModelGenerator::new(context, vec![quad(0.0), quad(2.0), quad(4.0)]);

    let sets = [
        overrides(json!({})),
        overrides(json!({ "ruleFile": "bin/missing.cgb" })),
        overrides(json!({ "startRule": "no-style-separator" })),
    ];
    let models = generator
        .generate(&sets, Some(package.as_path()), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap();

    let indices: Vec<u32> = models.iter().map(|m| m.initial_shape_index()).collect();
    assert_eq!(indices, vec![0]);
}

#[test]
fn geometry_can_be_switched_off() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, _) = counting_context();
    let generator = ModelGenerator::new(context, vec![quad(0.0)]);

    let options = overrides(json!({ "emitGeometry": false }));
    let models = generator
        .generate(&[overrides(json!({}))], Some(package.as_path()), IN_MEMORY_ENCODER_ID, &options)
        .unwrap();

    assert_eq!(models.len(), 1);
    assert!(models[0].vertices().is_empty());
    assert!(models[0].indices().is_empty());
    assert!(!models[0].report().is_empty());
}

#[test]
fn path_shapes_share_the_generator_cache() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let obj = dir.path().join("lot.obj");
    std::fs::write(&obj, "v 0 0 0\nv 0 0 1\nv 1 0 1\nv 1 0 0\nf 1 2 3 4\n").unwrap();

    let (context, _) = counting_context();
    let generator = ModelGenerator::new(
        context,
        vec![
            cga_generate::InitialShapeDescriptor::from_path(&obj),
            cga_generate::InitialShapeDescriptor::from_path(&obj),
        ],
    );

    let models = generator
        .generate(&[overrides(json!({}))], Some(package.as_path()), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(generator.cache().len(), 1);
    assert_relative_eq!(models[0].report()["area"].as_float().unwrap(), 1.0);
}

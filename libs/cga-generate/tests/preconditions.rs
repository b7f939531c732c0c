mod common;

use std::path::Path;
use std::sync::Arc;

use cga_engine::EngineContext;
use cga_generate::{EncoderOptions, ErrorKind, GenerationError, InitialShapeDescriptor, ModelGenerator};
use config::constants::{GenerationDefaults, IN_MEMORY_ENCODER_ID};
use serde_json::json;

use common::{counting_context, overrides, quad, write_package};

#[test]
fn uninitialized_engine_is_reported() {
    let generator = ModelGenerator::new(Arc::new(EngineContext::new()), vec![quad(0.0)]);
    let err = generator
        .generate(&[overrides(json!({}))], None, IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap_err();
    assert_eq!(err, GenerationError::EngineNotReady);

    let err = generator.generate_another(&[overrides(json!({}))]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EngineNotReady);
}

#[test]
fn shutdown_engine_is_reported() {
    let (context, engine) = counting_context();
    let generator = ModelGenerator::new(context.clone(), vec![quad(0.0)]);
    context.shutdown();

    let err = generator
        .generate(&[overrides(json!({}))], None, IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EngineNotReady);
    assert_eq!(engine.generate_calls(), 0);
}

#[test]
fn two_sets_for_five_shapes_is_insufficient() {
    let (context, engine) = counting_context();
    let shapes = (0..5).map(|i| quad(i as f64 * 2.0)).collect();
    let generator = ModelGenerator::new(context, shapes);

    let err = generator
        .generate(
            &[overrides(json!({})), overrides(json!({}))],
            None,
            IN_MEMORY_ENCODER_ID,
            &EncoderOptions::new(),
        )
        .unwrap_err();
    assert_eq!(err, GenerationError::InsufficientOverrides { supplied: 2, shapes: 5 });
    assert_eq!(engine.generate_calls(), 0);
}

#[test]
fn no_sets_for_one_shape_is_insufficient() {
    let (context, _) = counting_context();
    let generator = ModelGenerator::new(context, vec![quad(0.0)]);
    let err = generator
        .generate(&[], None, IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientOverrides);
}

#[test]
fn face_count_violation_never_reaches_engine() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, engine) = counting_context();
    let bad = InitialShapeDescriptor::with_faces(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        vec![0, 1, 2, 3],
        vec![3, 3],
    );
    let generator = ModelGenerator::new(context, vec![quad(0.0), bad]);

    let err = generator
        .generate(&[overrides(json!({}))], Some(package.as_path()), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap_err();
    assert!(matches!(err, GenerationError::Validation { shape_index: 1, .. }));
    assert_eq!(engine.generate_calls(), 0);
}

#[test]
fn invalid_package_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "not json").unwrap();
    let (context, engine) = counting_context();
    let generator = ModelGenerator::new(context, vec![quad(0.0)]);

    for package in [broken.as_path(), Path::new("/no/such/package.json")] {
        let err = generator
            .generate(&[overrides(json!({}))], Some(package), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PackageResolution);
    }
    assert_eq!(engine.generate_calls(), 0);
}

#[test]
fn rejected_encoder_options_are_reported() {
    let (context, engine) = counting_context();
    let generator = ModelGenerator::new(context, vec![quad(0.0)]);

    let err = generator
        .generate(
            &[overrides(json!({}))],
            None,
            IN_MEMORY_ENCODER_ID,
            &overrides(json!({ "unknownOption": 1 })),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionValidation);
    assert_eq!(engine.generate_calls(), 0);
}

#[test]
fn custom_defaults_apply_without_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let package = write_package(dir.path());
    let (context, _) = counting_context();
    let defaults = GenerationDefaults::new("bin/rule.cgb", "lot$start", 5, "Parcel").unwrap();
    let generator = ModelGenerator::with_defaults(context, vec![quad(0.0)], defaults);

    let models = generator
        .generate(&[overrides(json!({}))], Some(package.as_path()), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap();
    let report = models[0].report();
    assert_eq!(report["startRule"].as_str(), Some("lot$start"));
    assert_eq!(report["shapeName"].as_str(), Some("Parcel"));
    assert_eq!(report["seed"].as_float(), Some(5.0));
}

#[test]
fn empty_batch_generates_nothing() {
    let (context, _) = counting_context();
    let generator = ModelGenerator::new(context, Vec::new());
    let models = generator
        .generate(&[], None, IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
        .unwrap();
    assert!(models.is_empty());
}

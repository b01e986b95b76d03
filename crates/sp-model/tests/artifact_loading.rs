//! Load artifacts from disk and exercise the predictor end to end.

use sp_model::artifact::{load_basis, load_model};
use sp_model::{DomainPolicy, FlightCondition, ModelError, ModelVariant, Predictor};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_artifacts(dir: &PathBuf) -> (PathBuf, PathBuf, PathBuf) {
    let basis = dir.join("pod_basis.json");
    fs::write(
        &basis,
        r#"{
            "field_dim": 5,
            "latent_dim": 2,
            "modes": [1.0, 0.0, 0.0, 1.0, 0.5, 0.5, -1.0, 1.0, 0.25, 0.0],
            "mean": [0.1, 0.2, 0.3, 0.4, 0.5]
        }"#,
    )
    .unwrap();

    let mf = dir.join("MF_model.json");
    fs::write(
        &mf,
        r#"{
            "name": "MF_clf",
            "output": "latent",
            "regressor": {
                "kind": "polynomial",
                "degree": 2,
                "coefficients": [
                    [0.1, 1.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
                    [-0.2, 0.0, 0.3, 0.7, 0.0, 0.0, 0.0, 0.1, 0.0, 0.2]
                ],
                "intercept": [0.0, 0.0]
            }
        }"#,
    )
    .unwrap();

    let sf = dir.join("SF_model.json");
    fs::write(
        &sf,
        r#"{
            "name": "HF_clf",
            "output": "latent",
            "regressor": {
                "kind": "gaussian_process",
                "train_inputs": [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.5, 0.5, 0.5]],
                "dual_coef": [[0.2, -0.1], [0.4, 0.3], [-0.5, 0.9]],
                "length_scale": [0.4, 0.6, 0.6],
                "amplitude": 1.2
            },
            "target_scaler": { "mean": [0.05, -0.05], "scale": [2.0, 2.0] }
        }"#,
    )
    .unwrap();

    (basis, mf, sf)
}

fn predictor(dir_name: &str, policy: DomainPolicy) -> Predictor {
    let dir = scratch_dir(dir_name);
    let (basis, mf, sf) = write_artifacts(&dir);
    let basis = load_basis(&basis).unwrap();
    let mf = load_model(&mf, Some(&basis)).unwrap();
    let sf = load_model(&sf, Some(&basis)).unwrap();
    Predictor::new(mf, sf, policy).unwrap()
}

#[test]
fn prediction_is_deterministic_for_both_variants() {
    let predictor = predictor("sp_model_determinism", DomainPolicy::Extrapolate);
    let condition = FlightCondition::new(6.3, 2.5, 1.0);
    for variant in ModelVariant::ALL {
        let a = predictor.predict(variant, &condition).unwrap();
        let b = predictor.predict(variant, &condition).unwrap();
        let bits_a: Vec<u64> = a.values().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u64> = b.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b, "variant {variant} is not deterministic");
    }
}

#[test]
fn prediction_length_equals_field_dim() {
    let predictor = predictor("sp_model_shape", DomainPolicy::Extrapolate);
    assert_eq!(predictor.field_dim(), 5);
    for (mach, alpha, beta) in [(5.0, 0.0, 0.0), (7.0, 8.0, 8.0), (6.0, 4.0, 4.0), (9.0, -2.0, 10.0)] {
        let condition = FlightCondition::new(mach, alpha, beta);
        for variant in ModelVariant::ALL {
            let field = predictor.predict(variant, &condition).unwrap();
            assert_eq!(field.len(), 5);
        }
    }
}

#[test]
fn box_corner_uses_bias_and_mean_only() {
    let predictor = predictor("sp_model_corner", DomainPolicy::Extrapolate);
    // Normalized input (0, 0, 0): latent = [0.1, -0.2]
    let field = predictor
        .predict(ModelVariant::MultiFidelity, &FlightCondition::new(5.0, 0.0, 0.0))
        .unwrap();
    let expected = [
        0.1 + 0.1,
        -0.2 + 0.2,
        0.5 * 0.1 + 0.5 * -0.2 + 0.3,
        -0.1 + -0.2 + 0.4,
        0.25 * 0.1 + 0.5,
    ];
    for (got, want) in field.values().iter().zip(expected) {
        assert!((got - want).abs() < 1e-12, "{got} != {want}");
    }
}

#[test]
fn reject_policy_blocks_extrapolation() {
    let predictor = predictor("sp_model_reject", DomainPolicy::Reject);
    let err = predictor
        .predict(ModelVariant::SingleFidelity, &FlightCondition::new(4.0, 1.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, ModelError::OutOfDomain { parameter: "mach", .. }));
}

#[test]
fn basis_shared_between_variants_must_match_latent_dim() {
    let dir = scratch_dir("sp_model_latent_mismatch");
    let (basis, _, _) = write_artifacts(&dir);
    let bad = dir.join("bad.json");
    fs::write(
        &bad,
        r#"{
            "name": "three_modes",
            "output": "latent",
            "regressor": {
                "kind": "polynomial",
                "degree": 0,
                "coefficients": [[1.0], [2.0], [3.0]],
                "intercept": [0.0, 0.0, 0.0]
            }
        }"#,
    )
    .unwrap();
    let basis = load_basis(&basis).unwrap();
    let err = load_model(&bad, Some(&basis)).unwrap_err();
    assert!(matches!(
        err,
        ModelError::ShapeMismatch {
            expected: 2,
            actual: 3,
            ..
        }
    ));
}

#[test]
fn malformed_json_is_parse_error() {
    let dir = scratch_dir("sp_model_malformed");
    let path = dir.join("broken.json");
    fs::write(&path, "{ \"name\": ").unwrap();
    assert!(matches!(
        load_model(&path, None),
        Err(ModelError::ArtifactParse { .. })
    ));
}

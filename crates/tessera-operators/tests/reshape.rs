//! Reshape tests on CPU.

mod common;

use common::*;

#[test]
fn test_reshape_from_attribute() {
    let def = OperatorDef::new("Reshape")
        .with_input("x")
        .with_output("y")
        .with_arg("shape", vec![0i64, -1]);
    let x = Tensor::from_vec("x", (0..24).map(|v| v as f32).collect(), &[2, 3, 4]);

    let mut harness = Harness::new(def, vec![x]).unwrap();
    harness.init().unwrap();
    harness.run().unwrap();

    let y = harness.tensor("y");
    assert_eq!(y.shape(), &[2, 12]);
    assert_eq!(y.to_vec::<f32>().unwrap()[13], 13.0);
}

#[test]
fn test_reshape_from_shape_input() {
    let def = OperatorDef::new("Reshape")
        .with_data_type(DataType::I32)
        .with_input("x")
        .with_input("shape")
        .with_output("y");
    let x = Tensor::from_vec("x", vec![1i32, 2, 3, 4, 5, 6], &[6]);
    let shape = Tensor::from_vec("shape", vec![3i64, 2], &[2]);

    let mut harness = Harness::new(def, vec![x, shape]).unwrap();
    harness.init().unwrap();
    harness.run().unwrap();

    let y = harness.tensor("y");
    assert_eq!(y.shape(), &[3, 2]);
    assert_eq!(y.to_vec::<i32>().unwrap(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_reshape_without_target_fails_init() {
    let def = OperatorDef::new("Reshape").with_input("x").with_output("y");
    let x = Tensor::from_vec("x", vec![1.0f32], &[1]);

    let mut harness = Harness::new(def, vec![x]).unwrap();
    assert!(matches!(harness.init(), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_reshape_element_mismatch_fails_run() {
    let def = OperatorDef::new("Reshape")
        .with_input("x")
        .with_output("y")
        .with_arg("shape", vec![4i64]);
    let x = Tensor::from_vec("x", vec![1.0f32, 2.0, 3.0], &[3]);

    let mut harness = Harness::new(def, vec![x]).unwrap();
    harness.init().unwrap();
    assert!(matches!(harness.run(), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_reshape_to_scalar_with_empty_attribute() {
    let def = OperatorDef::new("Reshape")
        .with_input("x")
        .with_output("y")
        .with_arg("shape", Vec::<i64>::new());
    let x = Tensor::from_vec("x", vec![7.0f32], &[1]);

    let mut harness = Harness::new(def, vec![x]).unwrap();
    harness.init().unwrap();
    harness.run().unwrap();

    let y = harness.tensor("y");
    assert_eq!(y.shape(), &[] as &[usize]);
    assert_eq!(y.to_vec::<f32>().unwrap(), vec![7.0]);
}

#[test]
fn test_reshape_empty_attribute_wins_over_shape_input() {
    let def = OperatorDef::new("Reshape")
        .with_input("x")
        .with_input("shape")
        .with_output("y")
        .with_arg("shape", Vec::<i64>::new());
    let x = Tensor::from_vec("x", vec![3.0f32], &[1, 1]);
    let shape = Tensor::from_vec("shape", vec![1i64], &[1]);

    let mut harness = Harness::new(def, vec![x, shape]).unwrap();
    harness.init().unwrap();
    harness.run().unwrap();
    assert!(harness.tensor("y").shape().is_empty());
}

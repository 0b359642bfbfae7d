//! Eltwise family tests on CPU.

mod common;

use common::*;

// ================================================================================
// Same-shape operands
// ================================================================================

#[test]
fn test_add_basic() {
    let a = Tensor::from_vec("a", vec![1.0f32, 2.0, 3.0, 4.0], &[4]);
    let b = Tensor::from_vec("b", vec![10.0f32, 20.0, 30.0, 40.0], &[4]);

    let c = run_binary_f32("Add", a, b).unwrap();
    assert_eq!(c.shape(), &[4]);
    assert_eq!(c.to_vec::<f32>().unwrap(), vec![11.0, 22.0, 33.0, 44.0]);
}

#[test]
fn test_sub_mul_div() {
    let make = || {
        (
            Tensor::from_vec("a", vec![6.0f32, 8.0], &[2]),
            Tensor::from_vec("b", vec![2.0f32, 4.0], &[2]),
        )
    };

    let (a, b) = make();
    assert_eq!(
        run_binary_f32("Sub", a, b).unwrap().to_vec::<f32>().unwrap(),
        vec![4.0, 4.0]
    );
    let (a, b) = make();
    assert_eq!(
        run_binary_f32("Mul", a, b).unwrap().to_vec::<f32>().unwrap(),
        vec![12.0, 32.0]
    );
    let (a, b) = make();
    assert_eq!(
        run_binary_f32("Div", a, b).unwrap().to_vec::<f32>().unwrap(),
        vec![3.0, 2.0]
    );
}

#[test]
fn test_max_min() {
    let a = Tensor::from_vec("a", vec![1.0f32, 5.0, -3.0], &[3]);
    let b = Tensor::from_vec("b", vec![2.0f32, 4.0, -4.0], &[3]);
    assert_eq!(
        run_binary_f32("Max", a.clone(), b.clone())
            .unwrap()
            .to_vec::<f32>()
            .unwrap(),
        vec![2.0, 5.0, -3.0]
    );
    assert_eq!(
        run_binary_f32("Min", a, b).unwrap().to_vec::<f32>().unwrap(),
        vec![1.0, 4.0, -4.0]
    );
}

// ================================================================================
// Broadcasting
// ================================================================================

#[test]
fn test_add_broadcast_scalar() {
    let a = Tensor::from_vec("a", vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = Tensor::from_vec("b", vec![100.0f32], &[1]);

    let c = run_binary_f32("Add", a, b).unwrap();
    assert_eq!(c.shape(), &[2, 3]);
    assert_eq!(
        c.to_vec::<f32>().unwrap(),
        vec![101.0, 102.0, 103.0, 104.0, 105.0, 106.0]
    );
}

#[test]
fn test_mul_broadcast_column() {
    let a = Tensor::from_vec("a", vec![2.0f32, 3.0], &[2, 1]);
    let b = Tensor::from_vec("b", vec![1.0f32, 10.0, 100.0], &[3]);

    let c = run_binary_f32("Mul", a, b).unwrap();
    assert_eq!(c.shape(), &[2, 3]);
    assert_eq!(
        c.to_vec::<f32>().unwrap(),
        vec![2.0, 20.0, 200.0, 3.0, 30.0, 300.0]
    );
}

#[test]
fn test_incompatible_shapes_fail_at_run() {
    let a = Tensor::from_vec("a", vec![1.0f32, 2.0, 3.0], &[3]);
    let b = Tensor::from_vec("b", vec![1.0f32, 2.0], &[2]);

    let err = run_binary_f32("Add", a, b).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

// ================================================================================
// Integer specialization
// ================================================================================

#[test]
fn test_add_i32() {
    let a = Tensor::from_vec("a", vec![1i32, 2, 3], &[3]);
    let b = Tensor::from_vec("b", vec![10i32, 20, 30], &[3]);

    let mut harness = Harness::new(binary_def("Add", DataType::I32), vec![a, b]).unwrap();
    harness.init().unwrap();
    harness.run().unwrap();

    let c = harness.tensor("c");
    assert_eq!(c.dtype(), DataType::I32);
    assert_eq!(c.to_vec::<i32>().unwrap(), vec![11, 22, 33]);
}

#[test]
fn test_div_i32_by_zero() {
    let a = Tensor::from_vec("a", vec![4i32, 2], &[2]);
    let b = Tensor::from_vec("b", vec![2i32, 0], &[2]);

    let mut harness = Harness::new(binary_def("Div", DataType::I32), vec![a, b]).unwrap();
    harness.init().unwrap();
    assert!(matches!(harness.run(), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_i32_op_with_f32_inputs_is_tensor_error() {
    let a = Tensor::from_vec("a", vec![1.0f32], &[1]);
    let b = Tensor::from_vec("b", vec![1.0f32], &[1]);

    let mut harness = Harness::new(binary_def("Add", DataType::I32), vec![a, b]).unwrap();
    harness.init().unwrap();
    assert!(matches!(harness.run(), Err(Error::Tensor(_))));
}

// ================================================================================
// Lifecycle
// ================================================================================

#[test]
fn test_repeated_runs_follow_input_content() {
    let a = Tensor::from_vec("a", vec![1.0f32, 2.0], &[2]);
    let b = Tensor::from_vec("b", vec![1.0f32, 1.0], &[2]);

    let mut harness = Harness::new(binary_def("Add", DataType::F32), vec![a, b]).unwrap();
    harness.init().unwrap();

    harness.run().unwrap();
    harness.run().unwrap();
    assert_eq!(harness.tensor("c").to_vec::<f32>().unwrap(), vec![2.0, 3.0]);

    harness
        .workspace
        .get_tensor("b")
        .unwrap()
        .write()
        .as_mut_slice::<f32>()
        .unwrap()
        .copy_from_slice(&[5.0, 5.0]);
    harness.run().unwrap();
    assert_eq!(harness.tensor("c").to_vec::<f32>().unwrap(), vec![6.0, 7.0]);
}

#[test]
fn test_wrong_arity_fails_init() {
    let def = OperatorDef::new("Add").with_input("a").with_output("c");
    let a = Tensor::from_vec("a", vec![1.0f32], &[1]);

    let mut harness = Harness::new(def, vec![a]).unwrap();
    assert!(matches!(harness.init(), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_in_place_add() {
    let registry = core_op_registry();
    let device = CpuDevice::new(1);
    let mut workspace = Workspace::new();
    let a = workspace.add_tensor(Tensor::from_vec("a", vec![1.0f32, 2.0], &[2]));
    let b = workspace.add_tensor(Tensor::from_vec("b", vec![3.0f32, 4.0], &[2]));

    let def = OperatorDef::new("Add")
        .with_input("a")
        .with_input("b")
        .with_output("a");
    let mut ctx = OpConstructContext::new(&workspace);
    ctx.set_operator_def(std::sync::Arc::new(def));
    let mut op = registry.create_operation(&mut ctx, DeviceType::Cpu).unwrap();
    op.base_mut().set_inputs(vec![a.clone(), b]);
    op.base_mut().set_outputs(vec![a.clone()]);

    op.init(&mut OpInitContext::new(&workspace, Some(&device)))
        .unwrap();
    op.run(&mut OpContext::new(&workspace, &device)).unwrap();
    assert_eq!(a.read().to_vec::<f32>().unwrap(), vec![4.0, 6.0]);
}

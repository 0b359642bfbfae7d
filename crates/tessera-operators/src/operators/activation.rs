//! Pointwise activation functions.

use tessera_core::{
    op_input_tags, op_output_tags, register_op, ConstructOp, DataType, DeviceType, Error, OpBase,
    OpConstructContext, OpContext, OpInitContext, OpRegistry, Operation, Result,
};

use crate::helpers::prepare_output;

/// Supported activation functions, by their attribute spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationType {
    NoOp,
    Relu,
    /// ReLU clipped at `max_limit`.
    ReluX,
    LeakyRelu,
    Tanh,
    Sigmoid,
}

impl ActivationType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NOOP" => Some(ActivationType::NoOp),
            "RELU" => Some(ActivationType::Relu),
            "RELUX" => Some(ActivationType::ReluX),
            "LEAKYRELU" => Some(ActivationType::LeakyRelu),
            "TANH" => Some(ActivationType::Tanh),
            "SIGMOID" => Some(ActivationType::Sigmoid),
            _ => None,
        }
    }
}

/// Applies an activation selected by the `activation` attribute.
///
/// Attributes:
/// - `activation`: function name, default `NOOP`
/// - `max_limit`: upper clip for `RELUX`
/// - `leakyrelu_coefficient`: negative slope for `LEAKYRELU`
pub struct ActivationOp {
    base: OpBase,
    activation_name: String,
    activation: ActivationType,
    max_limit: f32,
    leakyrelu_coefficient: f32,
}

impl ActivationOp {
    op_input_tags!(INPUT);
    op_output_tags!(OUTPUT);

    pub fn activation(&self) -> ActivationType {
        self.activation
    }

    fn apply(&self, x: f32) -> f32 {
        match self.activation {
            ActivationType::NoOp => x,
            ActivationType::Relu => x.max(0.0),
            ActivationType::ReluX => x.max(0.0).min(self.max_limit),
            ActivationType::LeakyRelu => {
                if x < 0.0 {
                    x * self.leakyrelu_coefficient
                } else {
                    x
                }
            }
            ActivationType::Tanh => x.tanh(),
            ActivationType::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

impl ConstructOp for ActivationOp {
    fn construct(context: &mut OpConstructContext<'_>) -> Self {
        let base = OpBase::new(context);
        let activation_name = base.get_optional_arg("activation", "NOOP".to_string());
        let max_limit = base.get_optional_arg("max_limit", 0.0f32);
        let leakyrelu_coefficient = base.get_optional_arg("leakyrelu_coefficient", 0.0f32);
        Self {
            base,
            activation_name,
            activation: ActivationType::NoOp,
            max_limit,
            leakyrelu_coefficient,
        }
    }
}

impl Operation for ActivationOp {
    fn base(&self) -> &OpBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OpBase {
        &mut self.base
    }

    fn init(&mut self, _context: &mut OpInitContext<'_>) -> Result<()> {
        self.activation = ActivationType::from_name(&self.activation_name).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Unknown activation '{}' on '{}'",
                self.activation_name,
                self.name()
            ))
        })?;
        if self.activation == ActivationType::ReluX && self.max_limit <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "RELUX on '{}' needs a positive max_limit, got {}",
                self.name(),
                self.max_limit
            )));
        }
        Ok(())
    }

    fn run(&mut self, _context: &mut OpContext<'_>) -> Result<()> {
        let (shape, values) = {
            let input = self.base.input(Self::INPUT);
            let values: Vec<f32> = input
                .as_slice::<f32>()?
                .iter()
                .map(|&x| self.apply(x))
                .collect();
            (input.shape().to_vec(), values)
        };

        let mut output = self.base.output(Self::OUTPUT);
        prepare_output(&mut output, &shape, DataType::F32);
        output.as_mut_slice::<f32>()?.copy_from_slice(&values);
        Ok(())
    }
}

pub fn register(registry: &mut OpRegistry) -> Result<()> {
    register_op!(registry, "Activation", ActivationOp, DeviceType::Cpu, f32)
}

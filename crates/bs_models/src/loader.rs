use std::fmt;
use std::path::Path;

use bs_core::{Error, Result};
use tract_onnx::prelude::*;
use tract_onnx::tract_hir::infer::Factoid;
use tract_onnx::tract_hir::internal::DimLike;

type Plan = TypedRunnableModel<TypedModel>;

/// A deserialized, inference-capable model. Owns its weights; lives for the
/// process lifetime behind the registry's `Arc`.
pub struct LoadedModel {
    name: String,
    plan: Plan,
    input_height: usize,
    input_width: usize,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("name", &self.name)
            .field("input_height", &self.input_height)
            .field("input_width", &self.input_width)
            .finish()
    }
}

impl LoadedModel {
    /// Deserialize an ONNX artifact. The spatial input dimensions are read
    /// from the model's declared input fact; the batch dimension is pinned
    /// to 1 before optimizing. Models declare channels-last input
    /// (N, H, W, C), matching their training lineage.
    pub fn load(name: &str, path: &Path) -> Result<Self> {
        let model = tract_onnx::onnx().model_for_path(path)?;
        let fact = model.input_fact(0)?;
        let (input_height, input_width) = declared_spatial_dims(fact).ok_or_else(|| {
            Error::Provisioning(format!(
                "{}: model does not declare concrete spatial input dimensions",
                name
            ))
        })?;

        let plan = model
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, input_height, input_width, 3),
                ),
            )?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self {
            name: name.to_string(),
            plan,
            input_height,
            input_width,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expected spatial input dimensions as (height, width).
    pub fn input_dims(&self) -> (usize, usize) {
        (self.input_height, self.input_width)
    }

    /// Single forward pass over a preprocessed batch of one, producing the
    /// sigmoid fracture score.
    pub fn predict(&self, tensor: tract_ndarray::Array4<f32>) -> Result<f32> {
        let outputs = self.plan.run(tvec!(tensor.into_tensor().into()))?;
        let view = outputs[0].to_array_view::<f32>()?;
        view.iter()
            .next()
            .copied()
            .ok_or_else(|| Error::Inference(format!("{}: model produced an empty output", self.name)))
    }
}

fn declared_spatial_dims(fact: &InferenceFact) -> Option<(usize, usize)> {
    let dims: Vec<Option<usize>> = fact
        .shape
        .dims()
        .map(|d| d.concretize().and_then(|d| d.to_usize().ok()))
        .collect();
    if dims.len() != 4 {
        return None;
    }
    match (dims[1], dims[2]) {
        (Some(height), Some(width)) => Some((height, width)),
        _ => None,
    }
}

#[cfg(test)]
impl LoadedModel {
    /// Identity plan over a fixed channels-last input, for registry tests
    /// that need a live instance without a real artifact on disk.
    pub(crate) fn passthrough(name: &str, height: usize, width: usize) -> Self {
        let mut model = TypedModel::default();
        let input = model
            .add_source("input", f32::fact([1, height, width, 3]))
            .unwrap();
        model.set_output_outlets(&[input]).unwrap();
        Self {
            name: name.to_string(),
            plan: model.into_runnable().unwrap(),
            input_height: height,
            input_width: width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_channels_last_shape_yields_spatial_dims() {
        let fact = InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 224, 224, 3));
        assert_eq!(declared_spatial_dims(&fact), Some((224, 224)));
    }

    #[test]
    fn non_image_rank_yields_nothing() {
        let fact = InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 768));
        assert_eq!(declared_spatial_dims(&fact), None);
    }

    #[test]
    fn open_shape_yields_nothing() {
        assert_eq!(declared_spatial_dims(&InferenceFact::default()), None);
    }

    #[test]
    fn passthrough_model_echoes_its_input() {
        let model = LoadedModel::passthrough("Echo", 4, 4);
        assert_eq!(model.input_dims(), (4, 4));
        let tensor = tract_ndarray::Array4::from_elem((1, 4, 4, 3), 0.82f32);
        assert_eq!(model.predict(tensor).unwrap(), 0.82);
    }

    #[test]
    fn loading_a_corrupt_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Corrupt.onnx");
        std::fs::write(&path, b"not an onnx file").unwrap();
        assert!(LoadedModel::load("Corrupt", &path).is_err());
    }

    #[test]
    fn loading_a_missing_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LoadedModel::load("Missing", &dir.path().join("Missing.onnx")).is_err());
    }
}

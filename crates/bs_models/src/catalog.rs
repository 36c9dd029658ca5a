use bs_core::{Error, ModelDescriptor, Result};

/// Compiled-in model catalog. Adding a model means adding an entry here.
pub const CATALOG: &[ModelDescriptor] = &[
    ModelDescriptor {
        name: "DenseNet169",
        artifact_id: "1dIhc-0vd9sDoU5O6H0ZE6RYrP-CAyWks",
    },
    ModelDescriptor {
        name: "InceptionV3",
        artifact_id: "1ARBL_SK66Ppj7_kJ1Pe2FhH2olbTQHWY",
    },
    ModelDescriptor {
        name: "MobileNet",
        artifact_id: "14YuV3qZb_6FI7pXoiJx69HxiDD4uNc_Q",
    },
    ModelDescriptor {
        name: "EfficientNetB3",
        artifact_id: "1cQA3_oH2XjDFK-ZE9D9YsP6Ya8fQiPOy",
    },
];

/// Resolve a display name. Unknown names fail here, before any network or
/// filesystem access happens.
pub fn find(name: &str) -> Result<&'static ModelDescriptor> {
    CATALOG
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| Error::Catalog(name.to_string()))
}

pub fn model_names() -> Vec<&'static str> {
    CATALOG.iter().map(|d| d.name).collect()
}

/// Cache filename for a display name: spaces sanitized, `.onnx` suffix.
pub fn artifact_filename(name: &str) -> String {
    format!("{}.onnx", name.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        for descriptor in CATALOG {
            assert_eq!(find(descriptor.name).unwrap().name, descriptor.name);
        }
    }

    #[test]
    fn unknown_name_is_a_catalog_error() {
        match find("ResNet50") {
            Err(Error::Catalog(name)) => assert_eq!(name, "ResNet50"),
            other => panic!("expected catalog error, got {:?}", other.map(|d| d.name)),
        }
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(artifact_filename("DenseNet169"), "DenseNet169.onnx");
        assert_eq!(artifact_filename("My Model"), "My_Model.onnx");
    }
}

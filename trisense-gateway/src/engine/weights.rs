//! Safetensors weight bundles for the face, voice and meta slots.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use candle_core::{Device, Tensor};

use crate::lifecycle::LoadError;

/// Named tensors read from one or more safetensors files.
pub struct WeightBundle {
    tensors: HashMap<String, Tensor>,
}

impl WeightBundle {
    pub fn from_tensors(tensors: HashMap<String, Tensor>) -> Self {
        Self { tensors }
    }

    /// Load a single safetensors file, or every `*.safetensors` file in a
    /// directory in file-name order.
    pub fn load(location: &Path) -> Result<Self, LoadError> {
        if location.is_file() {
            return Self::read_files(&[location.to_path_buf()]);
        }
        if !location.is_dir() {
            return Err(LoadError::MissingArtifact(location.to_path_buf()));
        }

        let mut files: Vec<PathBuf> = fs::read_dir(location)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "safetensors"))
            .collect();
        if files.is_empty() {
            return Err(LoadError::MissingArtifact(location.join("*.safetensors")));
        }
        files.sort();

        Self::read_files(&files)
    }

    fn read_files(files: &[PathBuf]) -> Result<Self, LoadError> {
        let mut tensors = HashMap::new();
        for file in files {
            tensors.extend(candle_core::safetensors::load(file, &Device::Cpu)?);
        }
        Ok(Self { tensors })
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.tensors.get(name)
    }

    pub fn tensor_count(&self) -> usize {
        self.tensors.len()
    }

    pub fn parameter_count(&self) -> usize {
        self.tensors.values().map(Tensor::elem_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;

    fn write_weights(path: &Path, names: &[&str]) {
        let tensors: HashMap<String, Tensor> = names
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    Tensor::zeros((2, 3), DType::F32, &Device::Cpu).unwrap(),
                )
            })
            .collect();
        candle_core::safetensors::save(&tensors, path).unwrap();
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trisense_meta_model.safetensors");
        write_weights(&path, &["dense.weight", "dense.bias"]);

        let bundle = WeightBundle::load(&path).unwrap();
        assert_eq!(bundle.tensor_count(), 2);
        assert_eq!(bundle.parameter_count(), 12);
        assert!(bundle.get("dense.weight").is_some());
    }

    #[test]
    fn test_load_directory_merges_files() {
        let dir = tempfile::tempdir().unwrap();
        write_weights(&dir.path().join("part-0.safetensors"), &["conv.weight"]);
        write_weights(&dir.path().join("part-1.safetensors"), &["head.weight"]);
        std::fs::write(dir.path().join("README.md"), "face model").unwrap();

        let bundle = WeightBundle::load(dir.path()).unwrap();
        assert_eq!(bundle.tensor_count(), 2);
        assert!(bundle.get("head.weight").is_some());
    }

    #[test]
    fn test_missing_location() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            WeightBundle::load(&dir.path().join("trisense_voice_model")),
            Err(LoadError::MissingArtifact(_))
        ));
    }

    #[test]
    fn test_directory_without_weights() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            WeightBundle::load(dir.path()),
            Err(LoadError::MissingArtifact(_))
        ));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trisense_meta_model.safetensors");
        std::fs::write(&path, b"not a safetensors header").unwrap();

        assert!(matches!(
            WeightBundle::load(&path),
            Err(LoadError::Weights(_))
        ));
    }
}

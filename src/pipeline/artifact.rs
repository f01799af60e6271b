//! Compiled contract artifacts.
//!
//! An artifact is the build-time product this pipeline consumes: creation
//! bytecode plus the ABI used to check and encode constructor arguments.
//! Hardhat and Foundry artifact JSON both carry these under `abi` and
//! `bytecode`.

use std::path::Path;

use alloy::dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde::Deserialize;
use thiserror::Error;

/// Immutable descriptor of a compiled contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    /// Human name used in logs and records.
    #[serde(rename = "contractName", alias = "name", default)]
    pub name: String,

    /// Contract interface descriptor.
    pub abi: JsonAbi,

    /// Creation bytecode as emitted by the compiler.
    pub bytecode: Bytes,
}

/// Errors raised while loading or validating an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse artifact: {0}")]
    Parse(String),

    #[error("artifact has empty bytecode")]
    EmptyBytecode,

    #[error("constructor expects {expected} argument(s), got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("constructor argument {index} ('{value}') is not a valid {ty}: {message}")]
    ArgumentCoercion {
        index: usize,
        value: String,
        ty: String,
        message: String,
    },

    #[error("constructor argument encoding failed: {0}")]
    Encoding(String),
}

impl ContractArtifact {
    /// Load an artifact from a JSON file.
    ///
    /// When the JSON carries no contract name, the file stem is used.
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut artifact: ContractArtifact =
            serde_json::from_str(&content).map_err(|e| ArtifactError::Parse(e.to_string()))?;

        if artifact.name.is_empty() {
            artifact.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "contract".to_string());
        }

        Ok(artifact)
    }

    /// Number of arguments the constructor takes (0 when there is none).
    pub fn constructor_arity(&self) -> usize {
        self.abi
            .constructor
            .as_ref()
            .map(|c| c.inputs.len())
            .unwrap_or(0)
    }

    /// Validate a request against this artifact: non-empty bytecode and a
    /// matching constructor argument count.
    pub fn validate(&self, args: &[DynSolValue]) -> Result<(), ArtifactError> {
        if self.bytecode.is_empty() {
            return Err(ArtifactError::EmptyBytecode);
        }
        let expected = self.constructor_arity();
        if args.len() != expected {
            return Err(ArtifactError::ArgumentCount {
                expected,
                actual: args.len(),
            });
        }
        Ok(())
    }

    /// Assemble the deployment calldata: creation bytecode followed by the
    /// ABI-encoded constructor arguments.
    pub fn deploy_data(&self, args: &[DynSolValue]) -> Result<Bytes, ArtifactError> {
        self.validate(args)?;

        let mut data = self.bytecode.to_vec();
        if let Some(constructor) = &self.abi.constructor {
            if !constructor.inputs.is_empty() {
                let encoded = constructor
                    .abi_encode_input(args)
                    .map_err(|e| ArtifactError::Encoding(e.to_string()))?;
                data.extend_from_slice(&encoded);
            }
        }

        Ok(data.into())
    }

    /// Coerce CLI argument strings against the constructor input types.
    pub fn coerce_args(&self, raw: &[String]) -> Result<Vec<DynSolValue>, ArtifactError> {
        let empty = Vec::new();
        let inputs = self
            .abi
            .constructor
            .as_ref()
            .map(|c| &c.inputs)
            .unwrap_or(&empty);

        if raw.len() != inputs.len() {
            return Err(ArtifactError::ArgumentCount {
                expected: inputs.len(),
                actual: raw.len(),
            });
        }

        inputs
            .iter()
            .zip(raw)
            .enumerate()
            .map(|(index, (param, value))| {
                let ty = param.resolve().map_err(|e| ArtifactError::ArgumentCoercion {
                    index,
                    value: value.clone(),
                    ty: param.ty.clone(),
                    message: e.to_string(),
                })?;
                ty.coerce_str(value).map_err(|e| ArtifactError::ArgumentCoercion {
                    index,
                    value: value.clone(),
                    ty: param.ty.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

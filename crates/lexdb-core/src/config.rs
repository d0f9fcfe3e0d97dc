//! Configuration loader and typed settings.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `LEXDB_*` env
//! vars. The typed structs carry the knobs the engine actually reads, with
//! fail-fast validation for the ones that can be malformed.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("LEXDB_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }
}

/// Word-based chunking settings shared by both strategies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 500, chunk_overlap: 50 }
    }
}

impl ChunkingConfig {
    /// The overlap must leave a positive stride; anything else is a caller
    /// bug and fails fast rather than being clamped.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap ({}) must be strictly less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    pub fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

/// Hybrid engine settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Dense/sparse blend weight in [0, 1]; 1.0 is dense-only.
    pub alpha: f32,
    /// Chunks per concurrent embedding-provider call during bulk ingestion.
    pub embed_batch_size: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self { alpha: 0.5, embed_batch_size: 250 }
    }
}

impl HybridConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!(
                "alpha ({}) must be within [0, 1]",
                self.alpha
            )));
        }
        if self.embed_batch_size == 0 {
            return Err(Error::InvalidConfig("embed_batch_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_must_be_smaller_than_size() {
        let bad = ChunkingConfig { chunk_size: 100, chunk_overlap: 100 };
        assert!(matches!(bad.validate(), Err(Error::InvalidConfig(_))));

        let good = ChunkingConfig { chunk_size: 100, chunk_overlap: 99 };
        assert!(good.validate().is_ok());
        assert_eq!(good.stride(), 1);
    }

    #[test]
    fn alpha_must_be_a_weight() {
        let bad = HybridConfig { alpha: 1.5, embed_batch_size: 250 };
        assert!(matches!(bad.validate(), Err(Error::InvalidConfig(_))));
        assert!(HybridConfig::default().validate().is_ok());
    }
}

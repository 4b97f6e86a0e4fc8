use std::{fs, path::Path};

use anyhow::{Context, Result};
use lava_runner_core::InvalidLevelPlan;
use lava_runner_world::Level;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;

/// Pack compiled into the binary, used when no `--levels` file is given.
const BUNDLED_PACK: &str = include_str!("../../../levels/default.toml");

/// Ordered list of level plans a campaign plays through.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct LevelPack {
    #[serde(rename = "level", default)]
    levels: Vec<LevelPlan>,
}

/// A single named level plan.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct LevelPlan {
    /// Title shown while the level is played.
    pub(crate) name: String,
    /// Plan rows, top to bottom.
    pub(crate) rows: Vec<String>,
}

impl LevelPack {
    /// Pack shipped with the game.
    pub(crate) fn bundled() -> Result<Self, LevelPackError> {
        Self::parse(BUNDLED_PACK)
    }

    /// Reads and validates a pack stored as TOML on disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level pack {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid level pack {}", path.display()))
    }

    /// Parses a TOML pack and checks that every plan builds a level.
    pub(crate) fn parse(contents: &str) -> Result<Self, LevelPackError> {
        let pack: Self = toml::from_str(contents)?;
        if pack.levels.is_empty() {
            return Err(LevelPackError::Empty);
        }

        // Coin phases do not affect validity.
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for (index, plan) in pack.levels.iter().enumerate() {
            let _ = Level::from_plan(plan.rows.as_slice(), &mut rng).map_err(|source| {
                LevelPackError::InvalidLevel {
                    index,
                    name: plan.name.clone(),
                    source,
                }
            })?;
        }
        Ok(pack)
    }

    /// Number of levels in the pack.
    pub(crate) fn len(&self) -> usize {
        self.levels.len()
    }

    /// Plan at the provided index.
    pub(crate) fn get(&self, index: usize) -> Option<&LevelPlan> {
        self.levels.get(index)
    }
}

/// Errors that can occur while reading a level pack.
#[derive(Debug, Error)]
pub(crate) enum LevelPackError {
    /// The TOML document could not be deserialised.
    #[error("malformed level pack: {0}")]
    Malformed(#[from] toml::de::Error),
    /// The pack did not contain a single `[[level]]` table.
    #[error("level pack contains no levels")]
    Empty,
    /// One of the plans was rejected by level construction.
    #[error("level {index} ({name:?}) is invalid")]
    InvalidLevel {
        /// Zero-based position of the level within the pack.
        index: usize,
        /// Name of the offending level.
        name: String,
        /// Reason the plan was rejected.
        #[source]
        source: InvalidLevelPlan,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_pack_is_valid() {
        let pack = LevelPack::bundled().expect("bundled pack parses");
        assert!(pack.len() >= 3);
        assert_eq!(pack.get(0).map(|plan| plan.name.as_str()), Some("Lava Pit"));
        assert!(pack.get(pack.len()).is_none());
    }

    #[test]
    fn parses_levels_in_document_order() {
        let pack = LevelPack::parse(
            r#"
            [[level]]
            name = "first"
            rows = ["@ o", "xxx"]

            [[level]]
            name = "second"
            rows = ["o @"]
            "#,
        )
        .expect("valid pack");

        assert_eq!(pack.len(), 2);
        assert_eq!(
            pack.get(1).map(|plan| plan.rows.clone()),
            Some(vec!["o @".to_owned()])
        );
    }

    #[test]
    fn rejects_packs_without_levels() {
        assert!(matches!(LevelPack::parse(""), Err(LevelPackError::Empty)));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            LevelPack::parse("[[level]]\nname = 3"),
            Err(LevelPackError::Malformed(_))
        ));
    }

    #[test]
    fn reports_the_offending_level() {
        let error = LevelPack::parse(
            r#"
            [[level]]
            name = "fine"
            rows = ["@"]

            [[level]]
            name = "no player"
            rows = ["o  "]
            "#,
        )
        .expect_err("second level lacks a player");

        match error {
            LevelPackError::InvalidLevel {
                index,
                name,
                source,
            } => {
                assert_eq!(index, 1);
                assert_eq!(name, "no player");
                assert_eq!(source, InvalidLevelPlan::MissingPlayer);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_reports_missing_files() {
        let error = LevelPack::load(Path::new("/nonexistent/levels.toml"))
            .expect_err("file does not exist");
        assert!(format!("{error:#}").contains("failed to read level pack"));
    }
}

//! Game registry mapping codes and aliases to playable configurations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use quiz_trail_core::GameKind;
use serde::Deserialize;

/// Catalog of playable game modes, loaded from TOML or built in.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct GameRegistry {
    games: Vec<GameEntry>,
}

/// One playable game definition.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct GameEntry {
    code: String,
    label: String,
    kind: EntryKind,
    time_limit_secs: u64,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    map: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EntryKind {
    Leaf,
    Train,
}

impl GameRegistry {
    /// Registry shipped with the binary.
    pub(crate) fn builtin() -> Self {
        Self {
            games: vec![
                GameEntry {
                    code: "leaf_hop".to_owned(),
                    label: "Leaf Hop".to_owned(),
                    kind: EntryKind::Leaf,
                    time_limit_secs: 180,
                    aliases: vec!["leaf".to_owned(), "tower".to_owned(), "town".to_owned()],
                    map: None,
                },
                GameEntry {
                    code: "train_link".to_owned(),
                    label: "Couple the Cars".to_owned(),
                    kind: EntryKind::Train,
                    time_limit_secs: 300,
                    aliases: vec!["train".to_owned()],
                    map: None,
                },
            ],
        }
    }

    /// Loads a registry from a TOML file.
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read game registry {}", path.display()))?;
        let registry: Self = toml::from_str(&raw)
            .with_context(|| format!("could not parse game registry {}", path.display()))?;
        if registry.games.is_empty() {
            anyhow::bail!("game registry {} lists no games", path.display());
        }
        Ok(registry)
    }

    /// Resolves a code or alias, falling back to the first listed game.
    pub(crate) fn resolve_or_default(&self, code: &str) -> &GameEntry {
        self.games
            .iter()
            .find(|entry| entry.code == code || entry.aliases.iter().any(|alias| alias == code))
            .unwrap_or(&self.games[0])
    }
}

impl GameEntry {
    /// Stable code of the game mode.
    pub(crate) fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable name of the game mode.
    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// Core game kind the entry selects.
    pub(crate) fn kind(&self) -> GameKind {
        match self.kind {
            EntryKind::Leaf => GameKind::LeafHop,
            EntryKind::Train => GameKind::TrainLink,
        }
    }

    /// Default time limit in seconds.
    pub(crate) fn time_limit_secs(&self) -> u64 {
        self.time_limit_secs
    }

    /// Map image associated with the entry, when one is configured.
    pub(crate) fn map(&self) -> Option<&Path> {
        self.map.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_resolves_codes_and_aliases() {
        let registry = GameRegistry::builtin();

        assert_eq!(registry.resolve_or_default("leaf_hop").code(), "leaf_hop");
        assert_eq!(registry.resolve_or_default("tower").code(), "leaf_hop");
        assert_eq!(registry.resolve_or_default("train").code(), "train_link");
        assert_eq!(registry.resolve_or_default("train_link").kind(), GameKind::TrainLink);
    }

    #[test]
    fn unknown_codes_fall_back_to_the_first_game() {
        let registry = GameRegistry::builtin();
        assert_eq!(registry.resolve_or_default("mystery").code(), "leaf_hop");
    }

    #[test]
    fn registry_parses_from_toml() {
        let raw = r#"
            [[games]]
            code = "custom_leaf"
            label = "Custom Leaf"
            kind = "leaf"
            time_limit_secs = 90
            aliases = ["c"]
            map = "maps/custom.png"
        "#;

        let registry: GameRegistry = toml::from_str(raw).expect("registry parses");
        let entry = registry.resolve_or_default("c");
        assert_eq!(entry.code(), "custom_leaf");
        assert_eq!(entry.time_limit_secs(), 90);
        assert_eq!(entry.map(), Some(Path::new("maps/custom.png")));
    }
}

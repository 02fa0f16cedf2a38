use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tictactoe::Skill;

/// A participant as configured in a JSON file, e.g.
/// `{"nick": "Alice", "kind": "human"}` or `{"nick": "Bob", "kind": "bot", "skill": 0.7}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub nick: String,
    #[serde(flatten)]
    pub kind: ParticipantKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParticipantKind {
    Human,
    Bot { skill: Skill },
}

impl PlayerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|err| anyhow::anyhow!("Invalid player config '{}': {}", path.display(), err))
    }

    pub fn is_human(&self) -> bool {
        self.kind == ParticipantKind::Human
    }
}

/// Parses the short command line form: `human`, `bot` or `bot:<skill>`.
impl FromStr for ParticipantKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            None if s.trim() == "human" => Ok(ParticipantKind::Human),
            None if s.trim() == "bot" => Ok(ParticipantKind::Bot {
                skill: Skill::default(),
            }),
            Some(("bot", skill)) => Ok(ParticipantKind::Bot {
                skill: skill.parse()?,
            }),
            _ => anyhow::bail!("Expected 'human', 'bot' or 'bot:<skill>', got '{}'", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kinds() {
        assert_eq!(
            "human".parse::<ParticipantKind>().unwrap(),
            ParticipantKind::Human
        );
        assert_eq!(
            "bot".parse::<ParticipantKind>().unwrap(),
            ParticipantKind::Bot {
                skill: Skill::default()
            }
        );
        assert_eq!(
            "bot:0.8".parse::<ParticipantKind>().unwrap(),
            ParticipantKind::Bot {
                skill: Skill::new(0.8).unwrap()
            }
        );
        assert!("bot:1.8".parse::<ParticipantKind>().is_err());
        assert!("robot".parse::<ParticipantKind>().is_err());
    }

    #[test]
    fn player_config_json() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{"nick": "Bob", "kind": "bot", "skill": 0.7}"#).unwrap();
        assert_eq!(config.nick, "Bob");
        assert_eq!(
            config.kind,
            ParticipantKind::Bot {
                skill: Skill::new(0.7).unwrap()
            }
        );
        let config: PlayerConfig =
            serde_json::from_str(r#"{"nick": "Alice", "kind": "human"}"#).unwrap();
        assert!(config.is_human());
        assert!(serde_json::from_str::<PlayerConfig>(
            r#"{"nick": "Eve", "kind": "bot", "skill": 3}"#
        )
        .is_err());
    }
}

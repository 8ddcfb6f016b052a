//! Module catalog: the six mini-games and their routes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MaximusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Math,
    Reading,
    Typing,
    Drawing,
    Coding,
    Kindness,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 6] = [
        ModuleKind::Math,
        ModuleKind::Reading,
        ModuleKind::Typing,
        ModuleKind::Drawing,
        ModuleKind::Coding,
        ModuleKind::Kindness,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ModuleKind::Math => "math",
            ModuleKind::Reading => "reading",
            ModuleKind::Typing => "typing",
            ModuleKind::Drawing => "draw",
            ModuleKind::Coding => "coding",
            ModuleKind::Kindness => "being-nice",
        }
    }

    pub fn route(&self) -> String {
        format!("/learn/{}", self.slug())
    }

    pub fn title(&self) -> &'static str {
        match self {
            ModuleKind::Math => "Math Mission",
            ModuleKind::Reading => "Reading Quest",
            ModuleKind::Typing => "Typing Drill",
            ModuleKind::Drawing => "Creative Mode",
            ModuleKind::Coding => "Coding Combat",
            ModuleKind::Kindness => "Kindness Arena",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ModuleKind::Math => "Solve math challenges and earn V-Bucks!",
            ModuleKind::Reading => "Explore lore and complete reading quests for V-Bucks!",
            ModuleKind::Typing => "Master the keyboard in typing drills to win V-Bucks!",
            ModuleKind::Drawing => "Unleash your inner artist and design for V-Bucks!",
            ModuleKind::Coding => "Snap code blocks together and run your program for V-Bucks!",
            ModuleKind::Kindness => "Choose the kindest action to earn V-Bucks!",
        }
    }

    /// Whether rounds ask the difficulty oracle for the next challenge
    pub fn uses_oracle(&self) -> bool {
        matches!(
            self,
            ModuleKind::Math | ModuleKind::Reading | ModuleKind::Typing | ModuleKind::Kindness
        )
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ModuleKind {
    type Err = MaximusError;

    /// Accepts a slug, a route, or a common alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().trim_start_matches("/learn/").to_lowercase();
        match key.as_str() {
            "math" => Ok(ModuleKind::Math),
            "reading" | "read" => Ok(ModuleKind::Reading),
            "typing" | "type" => Ok(ModuleKind::Typing),
            "draw" | "drawing" => Ok(ModuleKind::Drawing),
            "coding" | "code" => Ok(ModuleKind::Coding),
            "being-nice" | "kindness" | "nice" => Ok(ModuleKind::Kindness),
            _ => Err(MaximusError::UnknownModule(s.to_string())),
        }
    }
}

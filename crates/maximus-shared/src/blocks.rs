//! Code blocks for the coding module and the program they build.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MaximusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    Action,
    Loop,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeBlock {
    MoveForward,
    TurnLeft,
    TurnRight,
    Repeat2,
    OnStart,
}

impl CodeBlock {
    pub const TOOLBOX: [CodeBlock; 5] = [
        CodeBlock::MoveForward,
        CodeBlock::TurnLeft,
        CodeBlock::TurnRight,
        CodeBlock::Repeat2,
        CodeBlock::OnStart,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CodeBlock::MoveForward => "moveForward",
            CodeBlock::TurnLeft => "turnLeft",
            CodeBlock::TurnRight => "turnRight",
            CodeBlock::Repeat2 => "repeat2",
            CodeBlock::OnStart => "onStart",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CodeBlock::MoveForward => "Move Forward",
            CodeBlock::TurnLeft => "Turn Left",
            CodeBlock::TurnRight => "Turn Right",
            CodeBlock::Repeat2 => "Repeat 2x",
            CodeBlock::OnStart => "On Start",
        }
    }

    pub fn category(&self) -> BlockCategory {
        match self {
            CodeBlock::MoveForward | CodeBlock::TurnLeft | CodeBlock::TurnRight => {
                BlockCategory::Action
            }
            CodeBlock::Repeat2 => BlockCategory::Loop,
            CodeBlock::OnStart => BlockCategory::Event,
        }
    }
}

impl FromStr for CodeBlock {
    type Err = MaximusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| c.is_alphanumeric()).collect();
        CodeBlock::TOOLBOX
            .iter()
            .copied()
            .find(|b| {
                b.id().eq_ignore_ascii_case(&wanted)
                    || b.name().replace(' ', "").eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| MaximusError::UnknownBlock(s.to_string()))
    }
}

/// Character position on the coding stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Blocks placed in the workspace, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub blocks: Vec<CodeBlock>,
}

impl Program {
    pub fn push(&mut self, block: CodeBlock) {
        self.blocks.push(block);
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Final character position. Only Move Forward moves the character;
    /// turns and loops are placed but not interpreted yet.
    pub fn run(&self) -> Position {
        let forward = self
            .blocks
            .iter()
            .filter(|b| **b == CodeBlock::MoveForward)
            .count();
        Position {
            x: 0,
            y: forward as i32,
        }
    }
}

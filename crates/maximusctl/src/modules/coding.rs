//! Coding combat: snap blocks into a program and run it.

use async_trait::async_trait;
use maximus_common::OracleError;
use maximus_shared::blocks::{CodeBlock, Position, Program};
use maximus_shared::rewards::{coding_run_reward, CODE_BLOCK_ADDED, CODE_CLEAR};
use maximus_shared::{ModuleKind, Notice, Outcome, CURRENCY_NAME};
use std::convert::Infallible;

use crate::session::{Evaluation, LoadContext, Loaded, ModuleStrategy, SessionError};

/// Program being built and where it left the character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodingWorkspace {
    pub program: Program,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeAction {
    AddBlock(CodeBlock),
    Clear,
    Run,
}

#[derive(Debug, Default)]
pub struct CodingStrategy;

impl CodingStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModuleStrategy for CodingStrategy {
    type Challenge = CodingWorkspace;
    type Input = Infallible;
    type Action = CodeAction;

    fn kind(&self) -> ModuleKind {
        ModuleKind::Coding
    }

    async fn load(
        &mut self,
        _ctx: LoadContext<'_, CodingWorkspace>,
    ) -> Result<Loaded<CodingWorkspace>, OracleError> {
        Ok(Loaded::new(CodingWorkspace::default(), 1))
    }

    fn is_empty(&self, input: &Infallible) -> bool {
        match *input {}
    }

    fn evaluate(
        &mut self,
        _workspace: &CodingWorkspace,
        _difficulty: u32,
        input: Infallible,
    ) -> Result<Evaluation, SessionError> {
        match input {}
    }

    fn apply_action(
        &mut self,
        workspace: &mut CodingWorkspace,
        action: CodeAction,
    ) -> Result<Evaluation, SessionError> {
        match action {
            CodeAction::AddBlock(block) => {
                workspace.program.push(block);
                Ok(Evaluation::new(
                    CODE_BLOCK_ADDED,
                    Outcome::Neutral,
                    "Block Added!",
                    format!(
                        "You added '{}' to your program! +{} {}",
                        block.name(),
                        CODE_BLOCK_ADDED,
                        CURRENCY_NAME
                    ),
                ))
            }
            CodeAction::Clear => {
                workspace.program.clear();
                workspace.position = Position::default();
                Ok(Evaluation::new(
                    CODE_CLEAR,
                    Outcome::Neutral,
                    "Workspace Cleared!",
                    format!("Ready for a new program! +{} {}", CODE_CLEAR, CURRENCY_NAME),
                ))
            }
            CodeAction::Run => {
                if workspace.program.is_empty() {
                    return Ok(Evaluation::quiet().with_notice(Notice::warning(
                        "Empty Program!",
                        "Add some blocks to the workspace to build your program!",
                    )));
                }
                workspace.position = workspace.program.run();
                let reward = coding_run_reward(workspace.program.len());
                Ok(Evaluation::new(
                    reward,
                    Outcome::Neutral,
                    "Program Executed!",
                    format!(
                        "Awesome! Your program ran. You earned {} {}!",
                        reward, CURRENCY_NAME
                    ),
                ))
            }
        }
    }
}

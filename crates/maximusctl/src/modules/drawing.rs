//! Creative mode: free drawing rewarded per action and for sustained activity.

use async_trait::async_trait;
use maximus_common::{DrawingConfig, OracleError};
use maximus_shared::palette::{brush_size, Color};
use maximus_shared::rewards::{
    DRAW_ACTIVITY_TICK, DRAW_BRUSH_CHANGE, DRAW_CLEAR, DRAW_COLOR_CHANGE, DRAW_SAVE, DRAW_STROKE,
    DRAW_STROKE_MILESTONE,
};
use maximus_shared::{CurrencyLedger, ModuleKind, Notice, Outcome, CURRENCY_NAME};
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

use crate::canvas::{DrawingSurface, Point, RasterCanvas};
use crate::session::{Evaluation, LoadContext, Loaded, ModuleStrategy, SessionError};
use crate::timer::ActivityTimer;

/// Canvas plus the strokes finished on it
#[derive(Debug, Clone)]
pub struct DrawingBoard {
    pub canvas: RasterCanvas,
    pub strokes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawAction {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Palette name or hex code
    SelectColor(String),
    SelectBrush(u32),
    Clear,
    Save,
}

pub struct DrawingStrategy {
    ledger: Arc<CurrencyLedger>,
    tick: Duration,
    export_dir: PathBuf,
    width: u32,
    height: u32,
    activity: Option<ActivityTimer>,
    /// Notices raised by activity ticks, drained by the session
    pending: Arc<Mutex<Vec<Notice>>>,
    last_saved: Option<PathBuf>,
}

impl DrawingStrategy {
    pub fn new(ledger: Arc<CurrencyLedger>, config: &DrawingConfig) -> Self {
        Self {
            ledger,
            tick: config.activity_tick(),
            export_dir: config.export_dir.clone(),
            width: config.canvas_width,
            height: config.canvas_height,
            activity: None,
            pending: Arc::new(Mutex::new(Vec::new())),
            last_saved: None,
        }
    }

    /// Whether the pointer is currently down
    pub fn is_active(&self) -> bool {
        self.activity.is_some()
    }

    pub fn last_saved(&self) -> Option<&PathBuf> {
        self.last_saved.as_ref()
    }

    fn start_activity(&mut self) {
        let ledger = Arc::clone(&self.ledger);
        let pending = Arc::clone(&self.pending);
        self.activity = Some(ActivityTimer::start("drawing", self.tick, move || {
            match ledger.add(DRAW_ACTIVITY_TICK) {
                Ok(update) if update.tier_changed() => {
                    if let Ok(mut pending) = pending.lock() {
                        pending.push(Notice::tier_up(update.after.tier));
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "activity reward rejected"),
            }
        }));
    }

    fn stroke_finished(&mut self, board: &mut DrawingBoard) -> Evaluation {
        board.strokes += 1;

        let evaluation = Evaluation::new(DRAW_STROKE, Outcome::Neutral, "", "");
        if board.strokes % DRAW_STROKE_MILESTONE == 0 {
            evaluation.with_notice(Notice::success(
                "Stroke of Genius!",
                format!(
                    "+{} {} for your art! Keep up the great work!",
                    DRAW_STROKE, CURRENCY_NAME
                ),
            ))
        } else {
            evaluation
        }
    }
}

#[async_trait]
impl ModuleStrategy for DrawingStrategy {
    type Challenge = DrawingBoard;
    type Input = Infallible;
    type Action = DrawAction;

    fn kind(&self) -> ModuleKind {
        ModuleKind::Drawing
    }

    async fn load(
        &mut self,
        _ctx: LoadContext<'_, DrawingBoard>,
    ) -> Result<Loaded<DrawingBoard>, OracleError> {
        let board = DrawingBoard {
            canvas: RasterCanvas::new(self.width, self.height),
            strokes: 0,
        };
        Ok(Loaded::new(board, 1))
    }

    fn activated(&mut self, _board: &DrawingBoard) {
        // A fresh canvas has no open stroke
        self.activity = None;
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        self.pending
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }

    fn is_empty(&self, input: &Infallible) -> bool {
        match *input {}
    }

    fn evaluate(
        &mut self,
        _board: &DrawingBoard,
        _difficulty: u32,
        input: Infallible,
    ) -> Result<Evaluation, SessionError> {
        match input {}
    }

    fn apply_action(
        &mut self,
        board: &mut DrawingBoard,
        action: DrawAction,
    ) -> Result<Evaluation, SessionError> {
        match action {
            DrawAction::PointerDown(at) => {
                if board.canvas.is_drawing() {
                    return Err(SessionError::InvalidAction(
                        "a stroke is already in progress".to_string(),
                    ));
                }
                board.canvas.begin_stroke(at);
                self.start_activity();
                Ok(Evaluation::quiet())
            }
            DrawAction::PointerMove(to) => {
                board.canvas.extend_stroke(to);
                Ok(Evaluation::quiet())
            }
            DrawAction::PointerUp => {
                self.activity = None;
                if board.canvas.end_stroke() {
                    Ok(self.stroke_finished(board))
                } else {
                    Ok(Evaluation::quiet())
                }
            }
            DrawAction::SelectColor(name) => {
                let color = name
                    .parse::<Color>()
                    .map_err(|e| SessionError::InvalidAction(e.to_string()))?;
                board.canvas.set_color(color);
                Ok(Evaluation::new(
                    DRAW_COLOR_CHANGE,
                    Outcome::Neutral,
                    "Color Changed!",
                    format!("Switched to a new color! +{} {}", DRAW_COLOR_CHANGE, CURRENCY_NAME),
                ))
            }
            DrawAction::SelectBrush(size) => {
                let size = brush_size(size).map_err(|e| SessionError::InvalidAction(e.to_string()))?;
                board.canvas.set_brush_size(size);
                Ok(Evaluation::new(
                    DRAW_BRUSH_CHANGE,
                    Outcome::Neutral,
                    "Brush Resized!",
                    format!("New brush size selected! +{} {}", DRAW_BRUSH_CHANGE, CURRENCY_NAME),
                ))
            }
            DrawAction::Clear => {
                self.activity = None;
                board.canvas.clear();
                Ok(Evaluation::new(
                    DRAW_CLEAR,
                    Outcome::Neutral,
                    "Canvas Cleared!",
                    format!("Fresh start! +{} {}", DRAW_CLEAR, CURRENCY_NAME),
                ))
            }
            DrawAction::Save => {
                let path = board
                    .canvas
                    .save_to_dir(&self.export_dir)
                    .map_err(|e| SessionError::Export(e.to_string()))?;
                let message = format!(
                    "Your masterpiece is saved to {}! +{} {}",
                    path.display(),
                    DRAW_SAVE,
                    CURRENCY_NAME
                );
                self.last_saved = Some(path);
                Ok(Evaluation::new(DRAW_SAVE, Outcome::Neutral, "Artwork Saved!", message))
            }
        }
    }
}

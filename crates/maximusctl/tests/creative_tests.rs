//! Drawing and coding modules, plus the line shell end to end.

use maximus_common::DrawingConfig;
use maximus_shared::blocks::{CodeBlock, Position};
use maximus_shared::{CurrencyLedger, NoticeLevel};
use maximusctl::canvas::{Point, ARTWORK_FILE_NAME};
use maximusctl::modules::{CodeAction, CodingStrategy, DrawAction, DrawingStrategy};
use maximusctl::{shell, SessionController, SessionError, SessionState};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn drawing_session(export_dir: &std::path::Path) -> SessionController<DrawingStrategy> {
    let ledger = Arc::new(CurrencyLedger::default());
    let config = DrawingConfig {
        export_dir: export_dir.to_path_buf(),
        canvas_width: 40,
        canvas_height: 30,
        ..DrawingConfig::default()
    };
    let strategy = DrawingStrategy::new(Arc::clone(&ledger), &config);
    SessionController::new(strategy, ledger)
}

// ============================================================================
// Drawing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_held_stroke_earns_activity_ticks() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();
    assert_eq!(session.state(), SessionState::Active);

    session.act(DrawAction::PointerDown(Point::new(5, 5))).unwrap();
    assert!(session.strategy().is_active());
    session.act(DrawAction::PointerMove(Point::new(20, 10))).unwrap();

    // Ticks at 10s and 20s
    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(session.ledger().total(), 2);

    let report = session.act(DrawAction::PointerUp).unwrap();
    assert_eq!(report.evaluation.reward, 1);
    assert_eq!(session.ledger().total(), 3);
    assert!(!session.strategy().is_active());
    assert_eq!(session.challenge().unwrap().strokes, 1);
    assert!(!session.challenge().unwrap().canvas.is_blank());

    // Released: no more ticks
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(session.ledger().total(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_quick_tap_earns_only_the_stroke() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();

    session.act(DrawAction::PointerDown(Point::new(1, 1))).unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;
    session.act(DrawAction::PointerUp).unwrap();
    assert_eq!(session.ledger().total(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_mid_stroke_stops_ticks() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    let ledger = Arc::clone(session.ledger());
    session.start().await.unwrap();

    session.act(DrawAction::PointerDown(Point::new(1, 1))).unwrap();
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    assert_eq!(ledger.total(), 1);

    drop(session);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(ledger.total(), 1);
}

#[tokio::test]
async fn test_pointer_up_without_stroke_is_quiet() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();

    let report = session.act(DrawAction::PointerUp).unwrap();
    assert_eq!(report.evaluation.reward, 0);
    assert_eq!(session.challenge().unwrap().strokes, 0);
}

#[tokio::test]
async fn test_second_pointer_down_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();

    session.act(DrawAction::PointerDown(Point::new(1, 1))).unwrap();
    assert!(matches!(
        session.act(DrawAction::PointerDown(Point::new(2, 2))),
        Err(SessionError::InvalidAction(_))
    ));
    assert_eq!(session.state(), SessionState::Active);
}

#[tokio::test]
async fn test_tool_rewards() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();

    session.act(DrawAction::SelectColor("red".to_string())).unwrap();
    assert_eq!(session.ledger().total(), 2);
    session.act(DrawAction::SelectBrush(10)).unwrap();
    assert_eq!(session.ledger().total(), 4);
    assert_eq!(session.challenge().unwrap().canvas.brush_size(), 10);
    session.act(DrawAction::Clear).unwrap();
    assert_eq!(session.ledger().total(), 9);

    let notices = session.drain_notices();
    let titles: Vec<&str> = notices.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Color Changed!", "Brush Resized!", "Canvas Cleared!"]);
}

#[tokio::test]
async fn test_invalid_tool_choice_pays_nothing() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();

    assert!(matches!(
        session.act(DrawAction::SelectColor("sparkly".to_string())),
        Err(SessionError::InvalidAction(_))
    ));
    assert!(matches!(
        session.act(DrawAction::SelectBrush(7)),
        Err(SessionError::InvalidAction(_))
    ));
    assert_eq!(session.ledger().total(), 0);
    assert_eq!(session.challenge().unwrap().canvas.brush_size(), 5);
}

#[tokio::test]
async fn test_save_writes_png() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();

    session.act(DrawAction::PointerDown(Point::new(10, 10))).unwrap();
    session.act(DrawAction::PointerUp).unwrap();
    let report = session.act(DrawAction::Save).unwrap();

    assert_eq!(report.evaluation.reward, 20);
    assert_eq!(session.ledger().total(), 21);

    let path = dir.path().join(ARTWORK_FILE_NAME);
    assert_eq!(session.strategy().last_saved(), Some(&path));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_save_failure_pays_nothing() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let mut session = drawing_session(&blocker);
    session.start().await.unwrap();

    assert!(matches!(
        session.act(DrawAction::Save),
        Err(SessionError::Export(_))
    ));
    assert_eq!(session.ledger().total(), 0);
    assert_eq!(session.state(), SessionState::Active);
}

#[tokio::test]
async fn test_stroke_milestone_notice() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();

    for i in 0..50 {
        session.act(DrawAction::PointerDown(Point::new(i % 40, 3))).unwrap();
        session.act(DrawAction::PointerUp).unwrap();
    }

    assert_eq!(session.ledger().total(), 50);
    let notices = session.drain_notices();
    assert_eq!(
        notices
            .iter()
            .filter(|n| n.title == "Stroke of Genius!")
            .count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_skipping_mid_stroke_stops_ticks() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.start().await.unwrap();

    session.act(DrawAction::PointerDown(Point::new(4, 4))).unwrap();
    session.next().await.unwrap();
    assert!(!session.strategy().is_active());

    // Release lands on the new, untouched canvas
    let report = session.act(DrawAction::PointerUp).unwrap();
    assert_eq!(report.evaluation.reward, 0);
    assert!(!session.strategy().is_active());

    tokio::time::sleep(Duration::from_secs(100)).await;
    assert_eq!(session.ledger().total(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_activity_tick_reports_tier_up() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    session.ledger().add(99).unwrap();
    session.start().await.unwrap();

    session.act(DrawAction::PointerDown(Point::new(4, 4))).unwrap();
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    assert_eq!(session.ledger().tier(), 2);

    let notices = session.drain_notices();
    assert!(notices
        .iter()
        .any(|n| n.title == "Tier up!" && n.body.contains("Tier 2")));
    assert!(session.drain_notices().is_empty());
}

// ============================================================================
// Coding
// ============================================================================

fn coding_session() -> SessionController<CodingStrategy> {
    SessionController::new(CodingStrategy::new(), Arc::new(CurrencyLedger::default()))
}

#[tokio::test]
async fn test_run_empty_program_warns() {
    let mut session = coding_session();
    session.start().await.unwrap();

    let report = session.act(CodeAction::Run).unwrap();
    assert_eq!(report.evaluation.reward, 0);
    assert_eq!(session.ledger().total(), 0);

    let notices = session.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(notices[0].title, "Empty Program!");
}

#[tokio::test]
async fn test_build_and_run_program() {
    let mut session = coding_session();
    session.start().await.unwrap();

    session.act(CodeAction::AddBlock(CodeBlock::MoveForward)).unwrap();
    session.act(CodeAction::AddBlock(CodeBlock::MoveForward)).unwrap();
    session.act(CodeAction::AddBlock(CodeBlock::TurnLeft)).unwrap();
    assert_eq!(session.ledger().total(), 6);

    // 3 blocks * 5 + 10
    let report = session.act(CodeAction::Run).unwrap();
    assert_eq!(report.evaluation.reward, 25);
    assert_eq!(session.ledger().total(), 31);
    assert_eq!(session.challenge().unwrap().position, Position { x: 0, y: 2 });

    session.act(CodeAction::Clear).unwrap();
    assert_eq!(session.ledger().total(), 36);
    assert!(session.challenge().unwrap().program.is_empty());
    assert_eq!(session.challenge().unwrap().position, Position::default());
}

#[tokio::test]
async fn test_action_before_start_is_refused() {
    let mut session = coding_session();
    assert_eq!(
        session.act(CodeAction::Run).unwrap_err(),
        SessionError::NotAccepting(SessionState::Loading)
    );
}

// ============================================================================
// Shell
// ============================================================================

#[tokio::test]
async fn test_shell_plays_coding_session() {
    let mut session = coding_session();
    let input: &[u8] = b"add moveForward\n\nfly\nrun\n:quit\nadd moveForward\n";
    let mut out = Vec::new();

    shell::play(&mut session, input, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[*] Block Added!: You added 'Move Forward'"));
    assert!(text.contains("unknown coding command: fly"));
    assert!(text.contains("[*] Program Executed!"));
    assert!(text.contains("V-Bucks: 17 | Tier 1 | 17/100"));
    // Nothing after :quit is read
    assert_eq!(session.ledger().total(), 17);
}

#[tokio::test]
async fn test_shell_reports_invalid_actions() {
    let dir = TempDir::new().unwrap();
    let mut session = drawing_session(dir.path());
    let input: &[u8] = b"color sparkly\ncolor blue\n";
    let mut out = Vec::new();

    shell::play(&mut session, input, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("sparkly"));
    assert!(text.contains("[*] Color Changed!"));
    assert_eq!(session.ledger().total(), 2);
}

// キャンセルと停止処理のテスト
use crate::fixtures::{quiet_engine, write_color_image, GatedCompositor, JobDirs};
use mask_compositor::core::{FailureKind, OutputFormat};
use mask_compositor::{
    CancellationController, DefaultProcessingConfig, NoOpProgressReporter, ProcessingEngine,
};
use std::time::Duration;
use tokio::time::timeout;

fn dirs_with_images(count: usize) -> JobDirs {
    let dirs = JobDirs::new();
    for i in 0..count {
        write_color_image(&dirs.input.join(format!("img{i}.png")), 4, 4);
    }
    dirs
}

fn gated_engine(
    grace_period: Duration,
) -> ProcessingEngine<GatedCompositor, DefaultProcessingConfig, NoOpProgressReporter> {
    ProcessingEngine::new(
        GatedCompositor::closed(),
        DefaultProcessingConfig::new(2)
            .with_grace_period(grace_period)
            .with_poll_interval(Duration::from_millis(10)),
        NoOpProgressReporter::new(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_scenario_d_cancel_mid_run() {
    let dirs = dirs_with_images(6);
    let engine = gated_engine(Duration::from_secs(5));

    let handle = engine.submit(dirs.job(OutputFormat::Png)).unwrap();
    engine.compositor().wait_until_started(2).await;

    handle.cancel();
    engine.compositor().open_gate();

    let progress = handle.progress();
    let result = timeout(Duration::from_secs(10), handle.result())
        .await
        .unwrap()
        .unwrap();

    // 開始済みだった2件だけが完了し、それ以降は1件も開始されない
    assert!(result.cancelled);
    assert_eq!(engine.compositor().started_count(), 2);
    assert_eq!(progress.snapshot().processed, 2);
    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 0);
    assert_eq!(result.unprocessed(), 4);
    assert!(dirs.output.join("img0.png").exists());
    assert!(dirs.output.join("img1.png").exists());
    assert!(!dirs.output.join("img2.png").exists());
}

#[tokio::test]
async fn test_cancel_before_dispatch() {
    let dirs = dirs_with_images(4);
    let engine = quiet_engine(2);
    let cancellation = CancellationController::new();
    cancellation.cancel();

    let handle = engine
        .submit_with_cancellation(dirs.job(OutputFormat::Png), cancellation)
        .unwrap();
    let progress = handle.progress();
    let result = handle.result().await.unwrap();

    assert_eq!(progress.snapshot().processed, 0);
    assert!(result.succeeded + result.failed < result.total);
    assert_eq!(result.total, 4);
    assert!(!dirs.output.join("img0.png").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_grace_period_expiry_marks_stragglers_interrupted() {
    let dirs = dirs_with_images(5);
    let engine = gated_engine(Duration::from_millis(50));

    let handle = engine.submit(dirs.job(OutputFormat::Png)).unwrap();
    engine.compositor().wait_until_started(2).await;
    handle.cancel();

    let progress = handle.progress();
    let result = timeout(Duration::from_secs(10), handle.result())
        .await
        .unwrap()
        .unwrap();

    assert!(result.cancelled);
    assert_eq!(result.succeeded, 0);
    assert_eq!(result.failed, 2);
    assert!(result
        .failures
        .iter()
        .all(|failure| failure.kind == FailureKind::Interrupted));
    assert_eq!(progress.snapshot().processed, 2);
}

#[tokio::test]
async fn test_cancel_after_completion_is_harmless() {
    let dirs = dirs_with_images(2);
    let engine = quiet_engine(2);

    let handle = engine.submit(dirs.job(OutputFormat::Png)).unwrap();
    let progress = handle.progress();
    let cancellation = handle.cancellation();
    let result = handle.result().await.unwrap();

    cancellation.cancel();
    cancellation.cancel();

    assert_eq!(result.succeeded, 2);
    assert_eq!(progress.snapshot().processed, 2);
}

#[tokio::test]
async fn test_poll_is_monotonic_until_finished() {
    let dirs = dirs_with_images(8);
    let engine = quiet_engine(3);

    let handle = engine.submit(dirs.job(OutputFormat::Png)).unwrap();
    let mut last = 0;
    while !handle.is_finished() {
        let state = handle.poll();
        assert!(state.processed >= last);
        assert!(state.processed <= state.total);
        assert_eq!(state.total, 8);
        last = state.processed;
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let final_state = handle.poll();
    assert_eq!(final_state.processed, 8);
    handle.result().await.unwrap();
}

// ジョブ全体のシナリオテスト
use crate::fixtures::{mask_value, quiet_engine, write_color_image, write_corrupted, write_mask, JobDirs};
use mask_compositor::core::{FailureKind, OutputFormat, ProcessingError};
use mask_compositor::run_job;
use std::fs;

#[tokio::test]
async fn test_scenario_a_partial_masks() {
    let dirs = JobDirs::new();
    for name in ["a", "b", "c"] {
        write_color_image(&dirs.input.join(format!("{name}.jpg")), 8, 6);
    }
    write_mask(&dirs.masks.join("a.png"), 8, 6);
    write_mask(&dirs.masks.join("c.png"), 8, 6);

    let engine = quiet_engine(2);
    let handle = engine.submit(dirs.job(OutputFormat::Png)).unwrap();
    let progress = handle.progress();
    let result = handle.result().await.unwrap();

    assert_eq!(result.total, 3);
    assert_eq!(result.succeeded, 3);
    assert_eq!(result.failed, 0);
    assert_eq!(progress.snapshot().processed, 3);
    assert_eq!(progress.snapshot().total, 3);

    for name in ["a", "c"] {
        let output = image::open(dirs.output.join(format!("{name}.png")))
            .unwrap()
            .into_rgba8();
        assert_eq!(output.dimensions(), (8, 6));
        for (x, y, pixel) in output.enumerate_pixels() {
            assert_eq!(pixel.0[3], mask_value(x, y), "{name} alpha at ({x}, {y})");
        }
    }

    let opaque = image::open(dirs.output.join("b.png")).unwrap().into_rgba8();
    assert!(opaque.pixels().all(|p| p.0[3] == u8::MAX));
}

#[tokio::test]
async fn test_scenario_b_empty_input_is_rejected() {
    let dirs = JobDirs::new();
    let engine = quiet_engine(2);

    let result = engine.submit(dirs.job(OutputFormat::Png));

    match result {
        Err(ProcessingError::ConfigurationError { message }) => {
            assert!(message.contains("no eligible images"));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_scenario_c_corrupted_input() {
    let dirs = JobDirs::new();
    for name in ["one", "two", "four", "five"] {
        write_color_image(&dirs.input.join(format!("{name}.png")), 5, 5);
    }
    write_corrupted(&dirs.input.join("three.jpg"));

    let result = run_job(&quiet_engine(3), dirs.job(OutputFormat::Png))
        .await
        .unwrap();

    assert_eq!(result.total, 5);
    assert_eq!(result.succeeded, 4);
    assert_eq!(result.failed, 1);
    assert_eq!(result.failures[0].item_id, "three.jpg");
    assert_eq!(result.failures[0].kind, FailureKind::Decode);
    assert!(!dirs.output.join("three.png").exists());
}

#[tokio::test]
async fn test_mask_size_mismatch_is_item_failure() {
    let dirs = JobDirs::new();
    write_color_image(&dirs.input.join("good.png"), 4, 4);
    write_color_image(&dirs.input.join("odd.png"), 4, 4);
    write_mask(&dirs.masks.join("odd.png"), 3, 3);

    let result = run_job(&quiet_engine(2), dirs.job(OutputFormat::Png))
        .await
        .unwrap();

    assert_eq!(result.succeeded, 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].item_id, "odd.png");
    assert_eq!(result.failures[0].kind, FailureKind::DimensionMismatch);
}

async fn assert_rerun_is_identical(format: OutputFormat) {
    let dirs = JobDirs::new();
    for name in ["x", "y"] {
        write_color_image(&dirs.input.join(format!("{name}.png")), 7, 3);
        write_mask(&dirs.masks.join(format!("{name}.png")), 7, 3);
    }
    let engine = quiet_engine(2);
    let read_outputs = || -> Vec<Vec<u8>> {
        ["x", "y"]
            .iter()
            .map(|name| {
                fs::read(dirs.output.join(format!("{name}.{}", format.extension()))).unwrap()
            })
            .collect()
    };

    run_job(&engine, dirs.job(format)).await.unwrap();
    let first = read_outputs();

    run_job(&engine, dirs.job(format)).await.unwrap();
    let second = read_outputs();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_rerun_produces_identical_outputs() {
    assert_rerun_is_identical(OutputFormat::Png).await;
}

#[tokio::test]
async fn test_rerun_produces_identical_tiff_outputs() {
    assert_rerun_is_identical(OutputFormat::Tiff).await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_dangling_entries_stay_item_scoped() {
    let dirs = JobDirs::new();
    write_color_image(&dirs.input.join("good.png"), 4, 4);
    std::os::unix::fs::symlink("/nonexistent/target", dirs.input.join("notes.txt")).unwrap();
    std::os::unix::fs::symlink("/nonexistent/photo", dirs.input.join("x.jpg")).unwrap();

    let result = run_job(&quiet_engine(2), dirs.job(OutputFormat::Png))
        .await
        .unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.failed, 1);
    assert_eq!(result.failures[0].item_id, "x.jpg");
    assert_eq!(result.failures[0].kind, FailureKind::Io);
    assert!(dirs.output.join("good.png").exists());
    assert!(!dirs.output.join("x.png").exists());
}

#[tokio::test]
async fn test_non_image_files_and_subdirectories_are_ignored() {
    let dirs = JobDirs::new();
    write_color_image(&dirs.input.join("only.png"), 2, 2);
    fs::write(dirs.input.join("notes.txt"), "ignore me").unwrap();
    fs::create_dir(dirs.input.join("nested")).unwrap();
    write_color_image(&dirs.input.join("nested").join("deep.png"), 2, 2);

    let result = run_job(&quiet_engine(2), dirs.job(OutputFormat::Png))
        .await
        .unwrap();

    assert_eq!(result.total, 1);
    assert!(result.is_clean());
}

#[tokio::test]
async fn test_concurrent_jobs_keep_separate_state() {
    let first = JobDirs::new();
    let second = JobDirs::new();
    for i in 0..3 {
        write_color_image(&first.input.join(format!("f{i}.png")), 3, 3);
    }
    for i in 0..5 {
        write_color_image(&second.input.join(format!("s{i}.png")), 3, 3);
    }
    let engine = quiet_engine(2);

    let first_handle = engine.submit(first.job(OutputFormat::Png)).unwrap();
    let second_handle = engine.submit(second.job(OutputFormat::Tiff)).unwrap();

    let first_result = first_handle.result().await.unwrap();
    let second_result = second_handle.result().await.unwrap();

    assert_ne!(first_result.job_id, second_result.job_id);
    assert_eq!(first_result.succeeded, 3);
    assert_eq!(second_result.succeeded, 5);
    assert!(second.output.join("s4.tiff").exists());
    assert!(!first.output.join("f0.tiff").exists());
}

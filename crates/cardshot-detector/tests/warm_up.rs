//! Readiness and single-flight warm-up behaviour.

use std::cell::Cell;
use std::time::Duration;

use cardshot_core::{Error, Result, Viewport};
use cardshot_detector::{
    CardDetector, MemoryDocument, NodeSpec, WarmUpProgress, WarmUpStage, WARM_UP_STAGES,
};

fn detector(delay_ms: u64) -> CardDetector<MemoryDocument> {
    let doc = MemoryDocument::new(Viewport::default(), NodeSpec::new("body"));
    CardDetector::new(doc).with_stage_delay(Duration::from_millis(delay_ms))
}

#[tokio::test]
async fn test_concurrent_calls_share_one_run() {
    let detector = detector(10);
    let events = Cell::new(0usize);

    let count = |_: WarmUpProgress| -> Result<()> {
        events.set(events.get() + 1);
        Ok(())
    };
    let (first, second) = tokio::join!(
        detector.warm_up_with_progress(count),
        detector.warm_up_with_progress(count),
    );

    assert!(first.unwrap());
    assert!(second.unwrap());
    assert_eq!(events.get(), WARM_UP_STAGES.len());
    assert!(detector.is_ready());
}

#[tokio::test]
async fn test_warming_flag_is_set_during_run() {
    let detector = detector(0);
    let mut observed = Vec::new();

    detector
        .warm_up_with_progress(|progress| {
            assert_eq!(progress.stage, WarmUpStage::Algorithm);
            observed.push(detector.is_warming());
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(observed, vec![true; WARM_UP_STAGES.len()]);
    assert!(!detector.is_warming());
}

#[tokio::test]
async fn test_repeated_warm_up_is_idempotent() {
    let detector = detector(0);

    assert!(detector.warm_up().await.unwrap());
    assert!(detector.warm_up().await.unwrap());
    assert!(detector.is_ready());
}

#[tokio::test]
async fn test_dispose_then_warm_up_again() {
    let detector = detector(0);
    detector.warm_up().await.unwrap();

    detector.dispose();
    assert!(!detector.is_ready());

    let stages = Cell::new(0usize);
    detector
        .warm_up_with_progress(|_| {
            stages.set(stages.get() + 1);
            Ok(())
        })
        .await
        .unwrap();

    assert!(detector.is_ready());
    assert_eq!(stages.get(), WARM_UP_STAGES.len());
}

#[tokio::test]
async fn test_queued_caller_sees_failed_run() {
    let detector = detector(10);

    let failing = |progress: WarmUpProgress| -> Result<()> {
        if progress.progress == 30 {
            Err(Error::WarmUp("interrupted".to_string()))
        } else {
            Ok(())
        }
    };
    let (first, second) = tokio::join!(
        detector.warm_up_with_progress(failing),
        detector.warm_up(),
    );

    assert!(matches!(first, Err(Error::WarmUp(_))));
    assert!(!second.unwrap());
    assert!(!detector.is_ready());
    assert!(!detector.is_warming());
}

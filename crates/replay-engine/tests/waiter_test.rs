mod common;

use common::FakePage;
use replay_engine::backend::BackendError;
use replay_engine::waiter::{WaitError, WaitOptions, wait_for_element};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_present_element_returns_without_waiting() {
    let mut page = FakePage::new("https://example.com/").with_element("css=#name");
    let started = Instant::now();

    let found = wait_for_element(&mut page, "css=#name", &WaitOptions::default()).await;

    assert!(found.is_ok());
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(page.query_count("css=#name"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_polls_until_element_appears() {
    let mut page = FakePage::new("https://example.com/").with_late_element("css=#late", 3);
    let started = Instant::now();

    let found = wait_for_element(&mut page, "css=#late", &WaitOptions::default()).await;

    assert!(found.is_ok());
    assert_eq!(page.query_count("css=#late"), 4);
    assert_eq!(started.elapsed(), Duration::from_millis(900));
}

#[tokio::test(start_paused = true)]
async fn test_times_out_with_not_found() {
    let mut page = FakePage::new("https://example.com/");
    let options = WaitOptions::default();
    let started = Instant::now();

    let err = wait_for_element(&mut page, "css=#never", &options)
        .await
        .unwrap_err();

    let elapsed = started.elapsed();
    assert!(elapsed >= options.timeout);
    assert!(elapsed <= options.timeout + options.interval);
    match err {
        WaitError::NotFound { selector, elapsed } => {
            assert_eq!(selector, "css=#never");
            assert!(elapsed >= options.timeout);
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    // 0, 300, ..., 4800
    assert_eq!(page.query_count("css=#never"), 17);
}

#[tokio::test(start_paused = true)]
async fn test_custom_timing() {
    let mut page = FakePage::new("https://example.com/");
    let options = WaitOptions {
        timeout: Duration::from_millis(1000),
        interval: Duration::from_millis(100),
    };

    let err = wait_for_element(&mut page, "//form", &options)
        .await
        .unwrap_err();

    assert!(matches!(err, WaitError::NotFound { .. }));
    assert_eq!(page.query_count("xpath=//form"), 10);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_selector_fails_fast() {
    let mut page = FakePage::new("https://example.com/").with_invalid("xpath=//div[");
    let started = Instant::now();

    let err = wait_for_element(&mut page, "xpath=//div[", &WaitOptions::default())
        .await
        .unwrap_err();

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(err.selector(), "xpath=//div[");
    assert!(matches!(
        err,
        WaitError::Resolve {
            source: BackendError::InvalidSelector(_),
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_zero_timeout_never_queries() {
    let mut page = FakePage::new("https://example.com/").with_element("css=#name");
    let options = WaitOptions {
        timeout: Duration::ZERO,
        interval: Duration::from_millis(300),
    };

    let err = wait_for_element(&mut page, "css=#name", &options)
        .await
        .unwrap_err();

    assert!(matches!(err, WaitError::NotFound { .. }));
    assert!(page.queries.is_empty());
}

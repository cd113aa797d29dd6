use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::common::*;
use crate::requirements::loader::{
    FsRuleSource, RuleLoadError, RuleLoadStatus, RuleSection, RuleSourceError, RuleTableLoader,
};

#[tokio::test]
async fn concurrent_callers_share_a_single_load() {
    let source = MemorySource::fixture();
    let fetches = source.fetch_counter();
    let loader = RuleTableLoader::new(source);

    let (first, second, third) = tokio::join!(
        loader.ensure_loaded(),
        loader.ensure_loaded(),
        loader.ensure_loaded()
    );

    let first = first.expect("first caller loads");
    let second = second.expect("second caller shares load");
    let third = third.expect("third caller shares load");
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(fetches.load(Ordering::SeqCst), RuleSection::ALL.len());
}

#[tokio::test]
async fn loaded_table_is_reused_without_refetching() {
    let source = MemorySource::fixture();
    let fetches = source.fetch_counter();
    let loader = RuleTableLoader::new(source);

    let first = loader.ensure_loaded().await.expect("loads");
    let again = loader.ensure_loaded().await.expect("memoized");

    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(fetches.load(Ordering::SeqCst), RuleSection::ALL.len());
    assert!(loader.table().is_some());
}

#[tokio::test]
async fn waiters_share_a_failure_and_later_callers_retry() {
    let source = MemorySource::fixture().failing(1);
    let fetches = source.fetch_counter();
    let loader = RuleTableLoader::new(source);

    let (first, second) = tokio::join!(loader.ensure_loaded(), loader.ensure_loaded());

    for outcome in [first, second] {
        match outcome {
            Err(RuleLoadError::Fetch { section, .. }) => {
                assert_eq!(section, RuleSection::SetBonuses)
            }
            other => panic!("expected shared fetch failure, got {other:?}"),
        }
    }
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert!(loader.table().is_none());
    match loader.status() {
        RuleLoadStatus::Failed { attempt, error } => {
            assert_eq!(attempt, 1);
            assert!(error.contains("set_bonuses"));
        }
        other => panic!("expected failed status, got {other:?}"),
    }

    loader.ensure_loaded().await.expect("retry succeeds");
    assert_eq!(fetches.load(Ordering::SeqCst), 1 + RuleSection::ALL.len());
    assert!(loader.status().is_ready());
}

#[tokio::test]
async fn status_reports_section_sizes_once_ready() {
    let loader = RuleTableLoader::new(MemorySource::fixture());
    assert_eq!(loader.status(), RuleLoadStatus::NotStarted);
    assert!(loader.table().is_none());

    loader.ensure_loaded().await.expect("loads");

    match loader.status() {
        RuleLoadStatus::Ready { summary, .. } => {
            assert_eq!(summary.banned, 2);
            assert_eq!(summary.penalties, 2);
            assert_eq!(summary.tier_rules, vec![3, 3, 2, 3]);
            assert_eq!(summary.set_bonuses, 1);
            assert_eq!(summary.catalog_items, 17);
            assert_eq!(summary.reskins, 3);
        }
        other => panic!("expected ready status, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_rows_are_skipped_without_failing_the_load() {
    let source = MemorySource::fixture()
        .with_section(
            RuleSection::Points2,
            "ritual-robe\nsword-of-acclaim stray-token\nspecial two item:ritual-robe\n",
        )
        .with_section(
            RuleSection::Points1,
            "special 1 class:dragonslayer\nspecial 1 gem:topaz\nring-of-unbound-attack\n",
        )
        .with_section(RuleSection::SetBonuses, "only three items\n");
    let loader = RuleTableLoader::new(source);

    let table = loader.ensure_loaded().await.expect("load tolerates bad rows");

    let summary = table.summary();
    assert_eq!(summary.tier_rules, vec![3, 3, 1, 1]);
    assert_eq!(summary.set_bonuses, 0);
}

#[tokio::test]
async fn missing_rules_directory_fails_on_first_section() {
    let loader = RuleTableLoader::new(FsRuleSource::new("/nonexistent/exalt-rules"));

    match loader.ensure_loaded().await {
        Err(RuleLoadError::Fetch { section, source }) => {
            assert_eq!(section, RuleSection::SetBonuses);
            assert!(matches!(source.as_ref(), RuleSourceError::Io { .. }));
        }
        other => panic!("expected io failure, got {other:?}"),
    }
}

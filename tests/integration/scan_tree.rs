use crate::support::{build_vault, set_of, INCLUDED};
use std::collections::BTreeSet;
use vault_publish::config::PublishConfig;
use vault_publish::tree::{PublishFilter, TreeScanner};

#[tokio::test]
async fn default_filter_finds_exactly_the_publishable_files() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());

    let filter = PublishFilter::default();
    let records = TreeScanner::default()
        .scan(temp.path(), move |path| filter.includes(path))
        .await
        .unwrap();

    let paths: BTreeSet<String> = records.iter().map(|r| r.relative_path.clone()).collect();
    assert_eq!(paths, set_of(INCLUDED));
    for record in &records {
        assert!(record.local_path.is_absolute());
        assert_eq!(record.local_path, temp.path().join(&record.relative_path));
        assert!(!record.relative_path.contains('\\'));
    }
}

#[tokio::test]
async fn opting_in_adds_the_config_subtree_but_not_artifacts() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());

    let config = PublishConfig {
        include_config_dir: true,
        ..PublishConfig::default()
    };
    let filter = PublishFilter::from_config(&config);
    let records = TreeScanner::default()
        .scan(temp.path(), move |path| filter.includes(path))
        .await
        .unwrap();

    let paths: BTreeSet<String> = records.iter().map(|r| r.relative_path.clone()).collect();
    let mut expected = set_of(INCLUDED);
    expected.insert(".obsidian/app.json".to_string());
    expected.insert(".obsidian/plugins/x/data.json".to_string());
    assert_eq!(paths, expected);
}

#[tokio::test]
async fn same_content_under_different_names_shares_identity() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join("copies")).unwrap();
    std::fs::write(temp.path().join("original.md"), "shared body").unwrap();
    std::fs::write(temp.path().join("copies/duplicate.txt"), "shared body").unwrap();
    std::fs::write(temp.path().join("different.md"), "other body").unwrap();

    let records = TreeScanner::default()
        .scan(temp.path(), |_| true)
        .await
        .unwrap();
    assert_eq!(records.len(), 3);

    let digest_of = |path: &str| {
        records
            .iter()
            .find(|r| r.relative_path == path)
            .map(|r| r.digest.clone())
            .unwrap()
    };
    assert_eq!(digest_of("original.md"), digest_of("copies/duplicate.txt"));
    assert_ne!(digest_of("original.md"), digest_of("different.md"));
}

#[tokio::test]
async fn rescanning_an_unchanged_tree_yields_the_same_records() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());

    let scan = || async {
        let filter = PublishFilter::default();
        let mut records = TreeScanner::new(3, Default::default())
            .scan(temp.path(), move |path| filter.includes(path))
            .await
            .unwrap();
        records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        records
    };
    assert_eq!(scan().await, scan().await);
}

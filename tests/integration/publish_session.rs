use crate::support::{
    build_vault, entry_names, set_of, Notice, PrepareScript, RecordingNotifier, ScriptedEndpoint,
    INCLUDED,
};
use vault_publish::config::PublishConfig;
use vault_publish::session::messages;
use vault_publish::session::{
    Collaborators, FixedRoot, PublishFailure, PublishOutcome, PublishSession, PublishState,
};
use vault_publish::tree::ScanFailurePolicy;

fn config() -> PublishConfig {
    PublishConfig::default().with_server_url("http://publish.invalid")
}

#[tokio::test]
async fn successful_publish_reports_progress_then_success() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::Body(serde_json::json!({
        "diff": { "cached": [], "uncached": [] }
    })));

    let outcome = PublishSession::new()
        .publish(
            &config(),
            &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
        )
        .await;

    let PublishOutcome::Published(report) = outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    assert_eq!(report.scanned, INCLUDED.len());
    assert_eq!(report.uploaded, INCLUDED.len());
    assert_eq!(report.cached, 0);
    assert!(report.negotiated);
    assert_eq!(report.status, 204);

    assert_eq!(
        notifier.events(),
        vec![
            Notice::Show(messages::COLLECTING.to_string()),
            Notice::Update(messages::PUBLISHING.to_string()),
            Notice::Hide,
            Notice::Show(messages::PUBLISHED.to_string()),
        ]
    );
    let upload = endpoint.last_upload();
    assert_eq!(entry_names(&upload.archive), set_of(INCLUDED));
    assert!(upload.diff.is_some());
}

#[tokio::test]
async fn missing_server_url_stops_before_any_work() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::AllCached);

    for url in [None, Some("   ".to_string())] {
        let config = PublishConfig {
            server_url: url,
            ..PublishConfig::default()
        };
        let outcome = PublishSession::new()
            .publish(
                &config,
                &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
            )
            .await;
        assert!(matches!(
            outcome,
            PublishOutcome::Failed(PublishFailure::Configuration(_))
        ));
    }

    assert_eq!(endpoint.prepare_count(), 0);
    assert_eq!(endpoint.upload_count(), 0);
    assert_eq!(
        notifier.events(),
        vec![
            Notice::Show(messages::SERVER_URL_NOT_SET.to_string()),
            Notice::Show(messages::SERVER_URL_NOT_SET.to_string()),
        ]
    );
}

#[tokio::test]
async fn unresolvable_root_is_an_environment_failure() {
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::AllCached);

    let unavailable = FixedRoot::unavailable();
    let outcome = PublishSession::new()
        .publish(
            &config(),
            &Collaborators::new(&unavailable, &notifier).with_endpoint(&endpoint),
        )
        .await;
    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishFailure::Environment(_))
    ));
    assert_eq!(notifier.last_shown().as_deref(), Some(messages::VAULT_NOT_FOUND));

    let temp = tempfile::tempdir().unwrap();
    let missing = FixedRoot::new(temp.path().join("gone"));
    let outcome = PublishSession::new()
        .publish(
            &config(),
            &Collaborators::new(&missing, &notifier).with_endpoint(&endpoint),
        )
        .await;
    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishFailure::Environment(_))
    ));

    assert_eq!(endpoint.prepare_count(), 0);
    assert_eq!(endpoint.upload_count(), 0);
}

#[tokio::test]
async fn file_root_is_not_a_vault() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("note.md");
    std::fs::write(&file, "just a note").unwrap();
    let root = FixedRoot::new(&file);
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::AllCached);
    let session = PublishSession::new();

    let outcome = session
        .publish(
            &config(),
            &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
        )
        .await;

    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishFailure::Environment(_))
    ));
    assert_eq!(
        notifier.events(),
        vec![
            Notice::Show(messages::COLLECTING.to_string()),
            Notice::Hide,
            Notice::Show(messages::VAULT_NOT_FOUND.to_string()),
        ]
    );
    assert_eq!(endpoint.prepare_count(), 0);
    assert_eq!(endpoint.upload_count(), 0);
    assert_eq!(session.state(), PublishState::Idle);
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_entry_fails_the_publish_when_scan_aborts() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    // Sockets cannot be opened for reading, whatever the caller's privileges.
    let _socket =
        std::os::unix::net::UnixListener::bind(temp.path().join("notes/live.sock")).unwrap();
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::AllCached);
    let session = PublishSession::new();

    let config = PublishConfig {
        scan_failure: ScanFailurePolicy::Abort,
        ..config()
    };
    let outcome = session
        .publish(
            &config,
            &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
        )
        .await;

    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishFailure::Scan(_))
    ));
    assert_eq!(
        notifier.events(),
        vec![
            Notice::Show(messages::COLLECTING.to_string()),
            Notice::Hide,
            Notice::Show(messages::FAILED.to_string()),
        ]
    );
    assert_eq!(endpoint.prepare_count(), 0);
    assert_eq!(endpoint.upload_count(), 0);
    assert!(!session.is_publishing());
    assert_eq!(session.state(), PublishState::Idle);
}

#[tokio::test]
async fn file_removed_before_archiving_fails_the_publish() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let doomed = temp.path().join("notes/a.md");
    let endpoint = ScriptedEndpoint::new(PrepareScript::Status(500)).on_prepare(move || {
        let _ = std::fs::remove_file(&doomed);
    });
    let session = PublishSession::new();

    let outcome = session
        .publish(
            &config(),
            &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
        )
        .await;

    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishFailure::Archive(_))
    ));
    assert_eq!(endpoint.prepare_count(), 1);
    assert_eq!(endpoint.upload_count(), 0);
    assert_eq!(
        notifier.events(),
        vec![
            Notice::Show(messages::COLLECTING.to_string()),
            Notice::Hide,
            Notice::Show(messages::FAILED.to_string()),
        ]
    );
    assert!(!session.is_publishing());
    assert_eq!(session.state(), PublishState::Idle);
}

#[tokio::test]
async fn failed_negotiation_uploads_everything_without_diff() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::Status(500));

    let outcome = PublishSession::new()
        .publish(
            &config(),
            &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
        )
        .await;

    let PublishOutcome::Published(report) = outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    assert!(!report.negotiated);
    assert_eq!(report.uploaded, INCLUDED.len());

    let upload = endpoint.last_upload();
    assert!(upload.diff.is_none());
    assert_eq!(entry_names(&upload.archive), set_of(INCLUDED));
    assert_eq!(notifier.last_shown().as_deref(), Some(messages::PUBLISHED));
}

#[tokio::test]
async fn fully_cached_vault_still_uploads_an_empty_archive() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::AllCached);

    let outcome = PublishSession::new()
        .publish(
            &config(),
            &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
        )
        .await;

    let PublishOutcome::Published(report) = outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    assert_eq!(report.uploaded, 0);
    assert_eq!(report.cached, INCLUDED.len());

    let upload = endpoint.last_upload();
    assert!(entry_names(&upload.archive).is_empty());
    assert_eq!(upload.diff.unwrap().cached.len(), INCLUDED.len());
}

#[tokio::test]
async fn rejected_upload_fails_the_publish() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::AllCached).upload_status(500);

    let outcome = PublishSession::new()
        .publish(
            &config(),
            &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
        )
        .await;

    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishFailure::Upload(_))
    ));
    assert_eq!(endpoint.upload_count(), 1);
    let events = notifier.events();
    assert_eq!(events[events.len() - 2], Notice::Hide);
    assert_eq!(notifier.last_shown().as_deref(), Some(messages::FAILED));
}

#[tokio::test]
async fn concurrent_request_is_ignored_while_publishing() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::AllCached).holding();
    let session = PublishSession::new();
    let config = config();
    let collaborators = Collaborators::new(&root, &notifier).with_endpoint(&endpoint);

    let first = session.publish(&config, &collaborators);
    let second = async {
        endpoint.entered().await;
        assert!(session.is_publishing());
        assert_eq!(session.state(), PublishState::Negotiating);
        let outcome = session.clone().publish(&config, &collaborators).await;
        endpoint.release();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_published());
    assert_eq!(second, PublishOutcome::AlreadyRunning);
    assert_eq!(endpoint.prepare_count(), 1);
    assert_eq!(endpoint.upload_count(), 1);
}

#[tokio::test]
async fn session_is_reusable_after_each_attempt() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let failing = ScriptedEndpoint::new(PrepareScript::AllCached).upload_status(503);
    let working = ScriptedEndpoint::new(PrepareScript::AllCached);
    let session = PublishSession::new();

    let outcome = session
        .publish(
            &config(),
            &Collaborators::new(&root, &notifier).with_endpoint(&failing),
        )
        .await;
    assert!(!outcome.is_published());
    assert!(!session.is_publishing());
    assert_eq!(session.state(), PublishState::Idle);

    let outcome = session
        .publish(
            &config(),
            &Collaborators::new(&root, &notifier).with_endpoint(&working),
        )
        .await;
    assert!(outcome.is_published());
    assert!(!session.is_publishing());
    assert_eq!(session.state(), PublishState::Idle);
}

#[tokio::test]
async fn empty_vault_publishes_an_empty_archive() {
    let temp = tempfile::tempdir().unwrap();
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::AllCached);

    let outcome = vault_publish::publish(
        &config(),
        &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
    )
    .await;

    let PublishOutcome::Published(report) = outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    assert_eq!(report.scanned, 0);
    assert_eq!(endpoint.prepare_count(), 1);
    assert!(endpoint.prepares.lock()[0].filelist.is_empty());
    assert!(entry_names(&endpoint.last_upload().archive).is_empty());
}

#[tokio::test]
async fn config_subtree_is_published_only_when_opted_in() {
    let temp = tempfile::tempdir().unwrap();
    build_vault(temp.path());
    let root = FixedRoot::new(temp.path());
    let notifier = RecordingNotifier::default();
    let endpoint = ScriptedEndpoint::new(PrepareScript::Status(404));

    let config = PublishConfig {
        include_config_dir: true,
        ..config()
    };
    let outcome = PublishSession::new()
        .publish(
            &config,
            &Collaborators::new(&root, &notifier).with_endpoint(&endpoint),
        )
        .await;
    assert!(outcome.is_published());

    let names = entry_names(&endpoint.last_upload().archive);
    assert!(names.contains(".obsidian/app.json"));
    assert!(names.contains(".obsidian/plugins/x/data.json"));
    assert!(!names.iter().any(|n| n.ends_with(".DS_Store")));
}

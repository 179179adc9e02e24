//! Live watcher behavior against a real filesystem.

use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;
use ximdev_cli::preview::{ChangeEvent, PreviewWatcher, WatchFilter};

async fn next_event(
    rx: &mut tokio::sync::mpsc::Receiver<ChangeEvent>,
    wait: Duration,
) -> Option<ChangeEvent> {
    timeout(wait, rx.recv()).await.ok().flatten()
}

#[tokio::test(flavor = "multi_thread")]
async fn source_change_produces_event() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    std::fs::write(root.join("counter.go"), "package counter\n").unwrap();

    let (_watcher, mut rx) = PreviewWatcher::new(root.clone(), WatchFilter::none()).unwrap();

    std::fs::write(root.join("counter.go"), "package counter // edited\n").unwrap();

    let event = next_event(&mut rx, Duration::from_secs(5))
        .await
        .expect("expected a change event for the edited source file");
    assert!(event.path.ends_with("counter.go"));
}

#[tokio::test(flavor = "multi_thread")]
async fn project_filter_suppresses_build_outputs_live() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("proj");
    std::fs::create_dir(&project).unwrap();
    let project = project.canonicalize().unwrap();
    std::fs::write(project.join("main.go"), "package main\n").unwrap();
    std::fs::write(project.join("go.mod"), "module proj\n").unwrap();

    let cache_root = dir.path().join(".xim");
    let filter = WatchFilter::project(&project, &cache_root);
    let (_watcher, mut rx) = PreviewWatcher::new(project.clone(), filter).unwrap();

    // Touching what the build itself writes must not come through.
    std::fs::write(project.join("go.mod"), "module proj\n\ngo 1.22\n").unwrap();
    std::fs::write(project.join("main.wasm"), b"\0asm").unwrap();
    assert!(
        next_event(&mut rx, Duration::from_millis(800)).await.is_none(),
        "self-triggered build paths must be filtered"
    );

    // A real source edit still comes through.
    std::fs::write(project.join("main.go"), "package main // edited\n").unwrap();
    let event = next_event(&mut rx, Duration::from_secs(5))
        .await
        .expect("expected a change event for main.go");
    assert!(event.path.ends_with("main.go"));
}

#[tokio::test(flavor = "multi_thread")]
async fn nested_directories_are_watched() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("components/counter");
    std::fs::create_dir_all(&nested).unwrap();
    let nested = nested.canonicalize().unwrap();
    std::fs::write(nested.join("counter.go"), "package counter\n").unwrap();

    let (_watcher, mut rx) = PreviewWatcher::new(
        dir.path().canonicalize().unwrap(),
        WatchFilter::none(),
    )
    .unwrap();

    std::fs::write(nested.join("counter.go"), "package counter // v2\n").unwrap();

    let event = next_event(&mut rx, Duration::from_secs(5))
        .await
        .expect("expected a change event from the nested directory");
    assert!(event.path.ends_with("counter.go"));
}

#[tokio::test(flavor = "multi_thread")]
async fn dropping_the_watcher_closes_the_channel() {
    let dir = tempfile::tempdir().unwrap();
    let (watcher, mut rx) =
        PreviewWatcher::new(dir.path().to_path_buf(), WatchFilter::none()).unwrap();

    drop(watcher);

    // recv() returning None is the session's fatal watcher-closed signal.
    let closed = timeout(Duration::from_secs(5), async {
        loop {
            if rx.recv().await.is_none() {
                break;
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "channel should close once the watcher is gone");
}

#[test]
fn filter_paths_are_relative_to_the_given_roots() {
    let filter = WatchFilter::project(&PathBuf::from("proj"), &PathBuf::from(".xim"));
    assert!(filter.should_ignore(&PathBuf::from("proj/main.wasm")));
    assert!(!filter.should_ignore(&PathBuf::from("other/main.wasm")));
}

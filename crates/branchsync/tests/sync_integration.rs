//! Integration tests for whole sync runs.
//!
//! A stateful in-memory forge stands in for both GitHub and Codeberg. It
//! paginates listings the way the real APIs do and really removes branches
//! on DELETE, so repeated runs can be observed.
//!
//! Key scenarios tested:
//! - Dry run reports candidates without touching the mirror
//! - Live run prunes the mirror down to the source's branches
//! - A second run after a successful prune deletes nothing
//! - Listings spanning several pages are collected completely
//! - A pair whose listing fails does not stop the others
//! - A failed deletion is reported while the sweep continues

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use branchsync::forge::{CODEBERG_API_BASE, Dialect, ForgeClient, GITHUB_API_BASE};
use branchsync::http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use branchsync::sync::{
    DeletionOutcome, ProgressCallback, Remote, RepositoryPair, SyncError, SyncOptions,
    SyncProgress, sync_pairs,
};

/// Upper bound for any run; exceeding it means pagination never terminated.
const SYNC_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct ForgeState {
    /// (api base, owner, repo) -> branches
    repos: HashMap<(String, String, String), BTreeSet<String>>,
    /// (api base, owner, repo) -> status returned for every listing request
    broken_listings: HashMap<(String, String, String), u16>,
    /// Branch names whose deletion fails with 500.
    undeletable: HashSet<String>,
    requests: Vec<HttpRequest>,
}

#[derive(Clone, Default)]
struct FakeForge {
    state: Arc<Mutex<ForgeState>>,
}

impl FakeForge {
    fn add_repo(&self, base: &str, owner: &str, repo: &str, branches: &[&str]) {
        let mut state = self.state.lock().expect("forge state lock");
        state.repos.insert(
            key(base, owner, repo),
            branches.iter().map(|b| b.to_string()).collect(),
        );
    }

    fn add_many(&self, base: &str, owner: &str, repo: &str, prefix: &str, count: usize) {
        let mut state = self.state.lock().expect("forge state lock");
        let entry = state.repos.entry(key(base, owner, repo)).or_default();
        entry.extend((0..count).map(|i| format!("{prefix}-{i:04}")));
    }

    fn break_listing(&self, base: &str, owner: &str, repo: &str, status: u16) {
        let mut state = self.state.lock().expect("forge state lock");
        state.broken_listings.insert(key(base, owner, repo), status);
    }

    fn refuse_delete(&self, branch: &str) {
        let mut state = self.state.lock().expect("forge state lock");
        state.undeletable.insert(branch.to_string());
    }

    fn branches(&self, base: &str, owner: &str, repo: &str) -> Vec<String> {
        let state = self.state.lock().expect("forge state lock");
        state
            .repos
            .get(&key(base, owner, repo))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn delete_count(&self) -> usize {
        let state = self.state.lock().expect("forge state lock");
        state
            .requests
            .iter()
            .filter(|r| r.method == HttpMethod::Delete)
            .count()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.lock().expect("forge state lock");
        state.requests.push(request.clone());

        let Some((base, rest)) = [GITHUB_API_BASE, CODEBERG_API_BASE]
            .iter()
            .find_map(|b| request.url.strip_prefix(*b).map(|rest| (*b, rest)))
        else {
            return respond(404, "unknown host");
        };
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

        match (request.method, segments.as_slice()) {
            (HttpMethod::Get, ["repos", owner, repo, "branches"]) => {
                let repo_key = key(base, owner, repo);
                if let Some(&status) = state.broken_listings.get(&repo_key) {
                    return respond(status, "listing refused");
                }
                let Some(branches) = state.repos.get(&repo_key) else {
                    return respond(404, r#"{"message":"Not Found"}"#);
                };
                let (page, size) = page_and_size(query);
                let items: Vec<_> = branches
                    .iter()
                    .skip((page - 1) * size)
                    .take(size)
                    .map(|name| serde_json::json!({ "name": name, "protected": false }))
                    .collect();
                respond(200, serde_json::Value::from(items).to_string())
            }
            (HttpMethod::Delete, ["repos", owner, repo, "branches", encoded]) => {
                let branch = urlencoding::decode(encoded)
                    .expect("branch segment should be valid UTF-8")
                    .into_owned();
                if state.undeletable.contains(&branch) {
                    return respond(500, "internal error");
                }
                let removed = state
                    .repos
                    .get_mut(&key(base, owner, repo))
                    .is_some_and(|set| set.remove(&branch));
                if removed {
                    respond(204, "")
                } else {
                    respond(404, "branch not found")
                }
            }
            _ => respond(404, "no such route"),
        }
    }
}

#[async_trait]
impl HttpTransport for FakeForge {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        Ok(self.handle(&request))
    }
}

fn key(base: &str, owner: &str, repo: &str) -> (String, String, String) {
    (base.to_string(), owner.to_string(), repo.to_string())
}

fn respond(status: u16, body: impl Into<String>) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: body.into().into_bytes(),
    }
}

fn page_and_size(query: &str) -> (usize, usize) {
    let mut page = 1;
    let mut size = 30;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("page", v)) => page = v.parse().expect("page number"),
            Some(("per_page" | "limit", v)) => size = v.parse().expect("page size"),
            _ => {}
        }
    }
    (page, size)
}

fn remotes(forge: &FakeForge) -> (Remote, Remote) {
    let transport: Arc<dyn HttpTransport> = Arc::new(forge.clone());
    let github = Remote::new(
        ForgeClient::new_with_transport(Dialect::github(), "gh-token", Arc::clone(&transport)),
        "octo",
    );
    let codeberg = Remote::new(
        ForgeClient::new_with_transport(Dialect::codeberg(), "cb-token", transport),
        "octo",
    );
    (github, codeberg)
}

fn collect_events() -> (ProgressCallback, Arc<Mutex<Vec<SyncProgress>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |event| {
        sink.lock().expect("events lock").push(event);
    });
    (callback, events)
}

#[tokio::test]
async fn test_dry_run_leaves_mirror_untouched() {
    let forge = FakeForge::default();
    forge.add_repo(GITHUB_API_BASE, "octo", "hello", &["main", "dev"]);
    forge.add_repo(CODEBERG_API_BASE, "octo", "hello", &["main", "dev", "old-feature"]);
    let (github, codeberg) = remotes(&forge);
    let (callback, events) = collect_events();

    let options = SyncOptions {
        dry_run: true,
        ..Default::default()
    };
    let report = tokio::time::timeout(
        SYNC_TIMEOUT,
        sync_pairs(
            &github,
            &codeberg,
            &[RepositoryPair::new("hello", "hello")],
            &options,
            Some(&callback),
        ),
    )
    .await
    .expect("sync should not hang");

    assert!(report.dry_run);
    assert_eq!(forge.delete_count(), 0);
    assert_eq!(
        forge.branches(CODEBERG_API_BASE, "octo", "hello"),
        vec!["dev", "main", "old-feature"]
    );

    let events = events.lock().expect("events lock");
    assert!(events.iter().any(|e| matches!(
        e,
        SyncProgress::WouldDelete { branch, .. } if branch == "old-feature"
    )));
}

#[tokio::test]
async fn test_live_run_prunes_mirror_and_second_run_is_noop() {
    let forge = FakeForge::default();
    forge.add_repo(GITHUB_API_BASE, "octo", "hello", &["main", "dev"]);
    forge.add_repo(
        CODEBERG_API_BASE,
        "octo",
        "hello",
        &["main", "dev", "old-feature", "feature/nested"],
    );
    let (github, codeberg) = remotes(&forge);
    let pairs = [RepositoryPair::new("hello", "hello")];

    let first = tokio::time::timeout(
        SYNC_TIMEOUT,
        sync_pairs(&github, &codeberg, &pairs, &SyncOptions::default(), None),
    )
    .await
    .expect("sync should not hang");

    assert_eq!(first.deleted(), 2);
    assert!(!first.has_failures());
    assert_eq!(
        forge.branches(CODEBERG_API_BASE, "octo", "hello"),
        vec!["dev", "main"]
    );

    let second = tokio::time::timeout(
        SYNC_TIMEOUT,
        sync_pairs(&github, &codeberg, &pairs, &SyncOptions::default(), None),
    )
    .await
    .expect("sync should not hang");

    assert_eq!(second.deleted(), 0);
    let outcome = second.pairs[0].outcome.as_ref().expect("pair synced");
    assert!(outcome.is_noop());
    assert_eq!(forge.delete_count(), 2);
}

#[tokio::test]
async fn test_multi_page_listings_are_complete() {
    let forge = FakeForge::default();
    forge.add_many(GITHUB_API_BASE, "octo", "big", "keep", 250);
    forge.add_many(CODEBERG_API_BASE, "octo", "big", "keep", 250);
    forge.add_many(CODEBERG_API_BASE, "octo", "big", "stale", 120);
    let (github, codeberg) = remotes(&forge);
    let (callback, events) = collect_events();

    let report = tokio::time::timeout(
        SYNC_TIMEOUT,
        sync_pairs(
            &github,
            &codeberg,
            &[RepositoryPair::new("big", "big")],
            &SyncOptions::default(),
            Some(&callback),
        ),
    )
    .await
    .expect("sync should not hang");

    assert_eq!(report.deleted(), 120);
    assert_eq!(forge.branches(CODEBERG_API_BASE, "octo", "big").len(), 250);

    let events = events.lock().expect("events lock");
    let totals: Vec<(String, usize)> = events
        .iter()
        .filter_map(|e| match e {
            SyncProgress::FetchComplete { remote, total, .. } => Some((remote.clone(), *total)),
            _ => None,
        })
        .collect();
    assert_eq!(
        totals,
        vec![("GitHub".to_string(), 250), ("Codeberg".to_string(), 370)]
    );
}

#[tokio::test]
async fn test_failing_pair_does_not_stop_others() {
    let forge = FakeForge::default();
    // "missing" exists on neither side; "locked" refuses the mirror listing.
    forge.add_repo(GITHUB_API_BASE, "octo", "locked", &["main"]);
    forge.add_repo(CODEBERG_API_BASE, "octo", "locked", &["main", "stale"]);
    forge.break_listing(CODEBERG_API_BASE, "octo", "locked", 403);
    forge.add_repo(GITHUB_API_BASE, "octo", "hello", &["main"]);
    forge.add_repo(CODEBERG_API_BASE, "octo", "hello", &["main", "stale"]);
    let (github, codeberg) = remotes(&forge);
    let (callback, events) = collect_events();

    let pairs = [
        RepositoryPair::new("missing", "missing"),
        RepositoryPair::new("locked", "locked"),
        RepositoryPair::new("hello", "hello"),
    ];
    let report = tokio::time::timeout(
        SYNC_TIMEOUT,
        sync_pairs(
            &github,
            &codeberg,
            &pairs,
            &SyncOptions::default(),
            Some(&callback),
        ),
    )
    .await
    .expect("sync should not hang");

    assert_eq!(report.skipped(), 2);
    assert_eq!(report.synced(), 1);
    assert!(report.has_failures());

    match &report.pairs[0].outcome {
        Err(SyncError::Listing { remote, .. }) => assert_eq!(remote, "GitHub"),
        other => panic!("expected source listing failure, got {other:?}"),
    }
    match &report.pairs[1].outcome {
        Err(SyncError::Listing { remote, source, .. }) => {
            assert_eq!(remote, "Codeberg");
            assert_eq!(source.status(), Some(403));
        }
        other => panic!("expected mirror listing failure, got {other:?}"),
    }

    assert_eq!(
        forge.branches(CODEBERG_API_BASE, "octo", "locked"),
        vec!["main", "stale"]
    );
    assert_eq!(forge.branches(CODEBERG_API_BASE, "octo", "hello"), vec!["main"]);

    let events = events.lock().expect("events lock");
    let skipped = events
        .iter()
        .filter(|e| matches!(e, SyncProgress::PairSkipped { .. }))
        .count();
    assert_eq!(skipped, 2);
    assert!(matches!(
        events.last(),
        Some(SyncProgress::SyncComplete {
            synced: 1,
            skipped: 2,
            deleted: 1,
            failed: 0,
        })
    ));
}

#[tokio::test]
async fn test_failed_deletion_is_reported_and_sweep_continues() {
    let forge = FakeForge::default();
    forge.add_repo(GITHUB_API_BASE, "octo", "hello", &["main"]);
    forge.add_repo(
        CODEBERG_API_BASE,
        "octo",
        "hello",
        &["main", "another-stale", "old-feature", "zzz"],
    );
    forge.refuse_delete("old-feature");
    let (github, codeberg) = remotes(&forge);

    let report = tokio::time::timeout(
        SYNC_TIMEOUT,
        sync_pairs(
            &github,
            &codeberg,
            &[RepositoryPair::new("hello", "hello")],
            &SyncOptions::default(),
            None,
        ),
    )
    .await
    .expect("sync should not hang");

    let outcome = report.pairs[0].outcome.as_ref().expect("pair synced");
    let branches: Vec<_> = outcome.outcomes.iter().map(DeletionOutcome::branch).collect();
    assert_eq!(branches, vec!["another-stale", "old-feature", "zzz"]);
    assert_eq!(outcome.deleted(), 2);
    assert_eq!(outcome.failed(), 1);
    assert_eq!(report.failed_deletions(), 1);
    assert!(report.has_failures());
    assert_eq!(
        forge.branches(CODEBERG_API_BASE, "octo", "hello"),
        vec!["main", "old-feature"]
    );
}

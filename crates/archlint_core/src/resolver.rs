//! Multi-file import resolution.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use archlint_model::{DocPath, ELEMENTS_SECTION, Locator, scan_imports, substitute};

use crate::collector::DiagnosticKind;
use crate::fetch::{FetchError, FragmentFetcher};
use crate::{CoreError, Session};

/// A reference whose fetch is still in flight.
///
/// Created when an import directive is seen, settled by the resolver's
/// drain loop before the session closes. None survive a `resolve` call.
struct AwaitedReference {
    locator: Locator,
    path: DocPath,
    task: JoinHandle<Result<String, FetchError>>,
}

/// Resolves a root locator into one merged manifest.
///
/// The walk fetches fragments as independent tasks, merges each one at
/// the position implied by its reference, and only then scans the
/// freshly merged subtree for nested references (merge-before-recurse).
/// A locator already merged or still in flight is treated as
/// already-satisfied: the duplicate reference collapses to `null` with
/// no duplicate fetch and no diagnostic, which also breaks cycles.
/// Fetch and parse failures on non-root fragments become diagnostics
/// and leave that branch absent; only a failed root aborts the run.
pub struct ImportResolver {
    fetcher: Arc<dyn FragmentFetcher>,
}

impl ImportResolver {
    /// Creates a resolver over the given fetcher.
    pub fn new(fetcher: Arc<dyn FragmentFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolves `root` into a merged manifest, recording load problems
    /// in the session's collector.
    ///
    /// Returns `Err` only when the root document itself cannot be
    /// produced; every other failure is partial-tolerance territory.
    pub async fn resolve(&self, session: &mut Session, root: &Locator) -> Result<Value, CoreError> {
        let mut merged = Value::Null;
        let mut resident: HashSet<Locator> = HashSet::new();
        let mut awaited: VecDeque<AwaitedReference> = VecDeque::new();

        resident.insert(root.clone());
        awaited.push_back(self.spawn_fetch(root.clone(), DocPath::root()));

        // Settle loop: drains awaited references, which may enqueue more
        // as freshly merged subtrees are scanned.
        while let Some(reference) = awaited.pop_front() {
            let is_root = reference.path.is_root();
            let outcome = match reference.task.await {
                Ok(result) => result,
                Err(join_error) => {
                    // A panicked fetch task is contained like any failed fetch.
                    Err(FetchError::Io(std::io::Error::other(join_error.to_string())))
                }
            };

            let content = match outcome {
                Ok(content) => content,
                Err(error) => {
                    if is_root {
                        return Err(CoreError::RootUnavailable(error.to_string()));
                    }
                    warn!("Failed to fetch {}: {}", reference.locator, error);
                    session.collector.add(
                        DiagnosticKind::FetchFailed,
                        reference.locator.as_str(),
                        format!("Failed to fetch '{}': {}", reference.locator, error),
                    );
                    substitute(&mut merged, &reference.path, Value::Null);
                    continue;
                }
            };

            let fragment = match parse_fragment(&content) {
                Ok(fragment) => fragment,
                Err(message) => {
                    if is_root {
                        return Err(CoreError::RootUnavailable(message));
                    }
                    warn!("Failed to parse {}: {}", reference.locator, message);
                    session.collector.add(
                        DiagnosticKind::ParseFailed,
                        reference.locator.as_str(),
                        format!("Malformed fragment '{}': {}", reference.locator, message),
                    );
                    substitute(&mut merged, &reference.path, Value::Null);
                    continue;
                }
            };

            session.store.insert(reference.locator.clone(), fragment.clone());
            if !substitute(&mut merged, &reference.path, fragment) {
                debug!(
                    "Merge position {} vanished for {}, dropping fragment",
                    reference.path, reference.locator
                );
                continue;
            }

            // Merge-before-recurse: nested references are only discovered
            // now that the fragment sits in the merged tree.
            for import in scan_imports(&merged, &reference.path) {
                let target = reference.locator.join(&import.reference);
                if resident.contains(&target) {
                    debug!("Reference to {} already satisfied", target);
                    substitute(&mut merged, &import.path, Value::Null);
                    continue;
                }
                resident.insert(target.clone());
                awaited.push_back(self.spawn_fetch(target, import.path));
            }
        }

        completeness_check(&merged, session);
        Ok(merged)
    }

    fn spawn_fetch(&self, locator: Locator, path: DocPath) -> AwaitedReference {
        let fetcher = Arc::clone(&self.fetcher);
        let target = locator.clone();
        let task = tokio::spawn(async move { fetcher.fetch(&target).await });
        AwaitedReference {
            locator,
            path,
            task,
        }
    }
}

/// Parses one fragment from raw JSONC content.
fn parse_fragment(content: &str) -> Result<Value, String> {
    match jsonc_parser::parse_to_serde_value(content, &Default::default()) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err("fragment is empty".to_string()),
        Err(error) => Err(error.to_string()),
    }
}

/// Advisory check that structurally required sections survived the merge.
fn completeness_check(merged: &Value, session: &mut Session) {
    let has_elements = merged
        .get(ELEMENTS_SECTION)
        .is_some_and(Value::is_object);
    if !has_elements {
        session.collector.add(
            DiagnosticKind::MissingSection,
            ELEMENTS_SECTION,
            "Merged manifest declares no 'elements' section",
        );
    }
}

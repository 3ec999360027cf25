//! Forge API client: paginated branch listing and branch deletion.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::dialect::Dialect;
use super::error::ForgeError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::sync::{BranchSet, ProgressCallback, SyncProgress, emit};

/// REST client for one forge, parameterised by its [`Dialect`].
///
/// The same client type talks to GitHub and to Gitea-based forges; only the
/// dialect differs.
#[derive(Clone)]
pub struct ForgeClient {
    transport: Arc<dyn HttpTransport>,
    dialect: Dialect,
    token: String,
}

impl ForgeClient {
    /// Create a client backed by reqwest with the given request timeout.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use branchsync::forge::{Dialect, ForgeClient};
    ///
    /// let github = ForgeClient::new(Dialect::github(), "ghp_...", Duration::from_secs(30))?;
    /// let codeberg = ForgeClient::new(Dialect::codeberg(), "token", Duration::from_secs(30))?;
    /// # Ok::<(), branchsync::forge::ForgeError>(())
    /// ```
    pub fn new(dialect: Dialect, token: &str, timeout: Duration) -> Result<Self, ForgeError> {
        let transport =
            ReqwestTransport::with_timeout(timeout).map_err(|e| ForgeError::Config(e.to_string()))?;
        Ok(Self::new_with_transport(dialect, token, Arc::new(transport)))
    }

    pub fn new_with_transport(
        dialect: Dialect,
        token: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            dialect,
            token: token.to_string(),
        }
    }

    /// Remote name, e.g. "GitHub".
    pub fn name(&self) -> &str {
        &self.dialect.name
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), self.dialect.accept.clone()),
            ("User-Agent".to_string(), "branchsync".to_string()),
            (
                "Authorization".to_string(),
                self.dialect.auth_scheme.header_value(&self.token),
            ),
        ]
    }

    /// Send an authenticated request and fail on any non-2xx status.
    async fn send(
        &self,
        method: HttpMethod,
        url: String,
        resource: &str,
    ) -> Result<HttpResponse, ForgeError> {
        tracing::debug!(method = method.as_str(), url = %url, remote = %self.dialect.name, "Sending request");

        let request = HttpRequest {
            method,
            url,
            headers: self.headers(),
        };
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(ForgeError::from_status(
                response.status,
                response.body_text(),
                resource,
            ));
        }
        Ok(response)
    }

    /// Extract branch names from one page of the listing.
    fn parse_branch_page(&self, body: &[u8]) -> Result<Vec<String>, ForgeError> {
        let items: Vec<Value> = serde_json::from_slice(body)?;
        let field = &self.dialect.branch_name_field;

        items
            .iter()
            .map(|item| {
                item.get(field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| ForgeError::Decode {
                        message: format!("branch object without string field '{field}'"),
                    })
            })
            .collect()
    }

    /// List every branch of `owner/repo`.
    ///
    /// Pages are requested from 1 upwards until a page comes back empty. A
    /// failure on any page fails the whole listing; partial results are
    /// discarded.
    pub async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<BranchSet, ForgeError> {
        let repository = format!("{owner}/{repo}");
        let resource = format!("repository {repository}");

        emit(
            on_progress,
            SyncProgress::FetchingBranches {
                remote: self.dialect.name.clone(),
                repository: repository.clone(),
            },
        );

        let mut branches = BranchSet::new();
        let mut page = 1u32;

        loop {
            let url = self.dialect.page_url(owner, repo, page);
            let response = self.send(HttpMethod::Get, url, &resource).await?;
            let names = self.parse_branch_page(&response.body)?;

            if names.is_empty() {
                break;
            }

            let count = names.len();
            branches.extend(names);

            emit(
                on_progress,
                SyncProgress::FetchedPage {
                    remote: self.dialect.name.clone(),
                    repository: repository.clone(),
                    page,
                    count,
                    total_so_far: branches.len(),
                },
            );

            page += 1;
        }

        emit(
            on_progress,
            SyncProgress::FetchComplete {
                remote: self.dialect.name.clone(),
                repository,
                total: branches.len(),
            },
        );

        Ok(branches)
    }

    /// Delete one branch of `owner/repo`.
    ///
    /// Any 2xx status (the APIs answer 204) counts as deleted.
    pub async fn delete_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<(), ForgeError> {
        let url = self.dialect.branch_url(owner, repo, branch);
        let resource = format!("branch '{branch}' of {owner}/{repo}");
        self.send(HttpMethod::Delete, url, &resource).await?;
        Ok(())
    }
}

//! Pagination dialects for the supported forges.
//!
//! GitHub and Gitea-based forges (Codeberg, Forgejo) expose the same branch
//! listing contract: a `page` query parameter, a page-size parameter, and a
//! JSON array of branch objects. They differ in base URL, page-size parameter
//! name and authorization scheme. A [`Dialect`] captures those differences so
//! a single pagination routine serves every forge.

/// Default GitHub REST API base.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default Codeberg REST API base.
pub const CODEBERG_API_BASE: &str = "https://codeberg.org/api/v1";

/// Number of branches requested per page.
pub const PAGE_SIZE: u32 = 100;

/// How the access token is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `Authorization: token <token>`
    Token,
}

impl AuthScheme {
    #[must_use]
    pub fn header_value(self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {token}"),
            AuthScheme::Token => format!("token {token}"),
        }
    }
}

/// Query-parameter and response-field conventions of one forge API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// Human-readable remote name used in logs and errors.
    pub name: String,
    /// API base URL without a trailing slash.
    pub api_base: String,
    pub page_param: String,
    pub size_param: String,
    pub page_size: u32,
    /// Field of each branch object that holds the branch name.
    pub branch_name_field: String,
    pub auth_scheme: AuthScheme,
    pub accept: String,
}

impl Dialect {
    /// GitHub REST API v3.
    #[must_use]
    pub fn github() -> Self {
        Self {
            name: "GitHub".to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            page_param: "page".to_string(),
            size_param: "per_page".to_string(),
            page_size: PAGE_SIZE,
            branch_name_field: "name".to_string(),
            auth_scheme: AuthScheme::Bearer,
            accept: "application/vnd.github+json".to_string(),
        }
    }

    /// Codeberg, or any Gitea/Forgejo instance via [`Dialect::with_api_base`].
    #[must_use]
    pub fn codeberg() -> Self {
        Self {
            name: "Codeberg".to_string(),
            api_base: CODEBERG_API_BASE.to_string(),
            page_param: "page".to_string(),
            size_param: "limit".to_string(),
            page_size: PAGE_SIZE,
            branch_name_field: "name".to_string(),
            auth_scheme: AuthScheme::Token,
            accept: "application/json".to_string(),
        }
    }

    /// Point the dialect at a different host (GitHub Enterprise, self-hosted Gitea).
    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// URL of the branch collection of `owner/repo`.
    #[must_use]
    pub fn branches_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/branches",
            self.api_base,
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        )
    }

    /// URL of one page of the branch listing (1-indexed).
    #[must_use]
    pub fn page_url(&self, owner: &str, repo: &str, page: u32) -> String {
        format!(
            "{}?{}={}&{}={}",
            self.branches_url(owner, repo),
            self.page_param,
            page,
            self.size_param,
            self.page_size
        )
    }

    /// URL of a single branch.
    ///
    /// The branch name is escaped as one path segment, so `feature/x` becomes
    /// `feature%2Fx` and is not split by the remote's router.
    #[must_use]
    pub fn branch_url(&self, owner: &str, repo: &str, branch: &str) -> String {
        format!(
            "{}/{}",
            self.branches_url(owner, repo),
            urlencoding::encode(branch)
        )
    }
}

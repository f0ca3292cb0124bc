use crate::areas::config::{Committer, Config};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::errors::{RemoteError, RemoteResult};
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::remote_file::{Content, RemoteFile};
use crate::artifacts::objects::tree_entry::{EntryKind, TreeEntry};
use crate::remote::RemoteRepository;
use crate::remote::wire::{
    ApiErrorBody, BlobResponse, CommitResponse, CommitterPayload, ContentsResponse,
    CreatePullRequest, CreateRefRequest, DeleteFileRequest, PullResponse, PutFileRequest,
    PutFileResponse, RefResponse, RepositoryResponse, TreeResponse, UserResponse, decode_content,
    encode_content,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const ACCEPT: &str = "application/vnd.github+json";
const BASE64_ENCODING: &str = "base64";
const USER_AGENT: &str = concat!("docs-editor/", env!("CARGO_PKG_VERSION"));

/// `RemoteRepository` over the GitHub REST API
///
/// Every request carries the configured token and fails after the configured
/// timeout with `Transport`.
pub struct GitHubClient {
    client: Client,
    api_url: String,
    owner: String,
    name: String,
    token: String,
    committer: Committer,
}

impl GitHubClient {
    pub fn new(config: &Config) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Self::with_client(client, config)
    }

    /// Create a client around a preconfigured `reqwest::Client`
    pub fn with_client(client: Client, config: &Config) -> RemoteResult<Self> {
        let (owner, name) = config
            .repo
            .split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
            .ok_or_else(|| {
                RemoteError::Validation(format!(
                    "repository must look like owner/name, got '{}'",
                    config.repo
                ))
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
            token: config.token.clone(),
            committer: config.committer.clone(),
        })
    }

    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> RemoteResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| RemoteError::Validation(format!("invalid API URL {}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Validation(format!("invalid API URL {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn repo_url<'a>(&'a self, segments: impl IntoIterator<Item = &'a str>) -> RemoteResult<Url> {
        self.url(
            ["repos", self.owner.as_str(), self.name.as_str()]
                .into_iter()
                .chain(segments),
        )
    }

    fn contents_url(&self, path: &str) -> RemoteResult<Url> {
        self.repo_url(std::iter::once("contents").chain(path.split('/')))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "remote request");
        self.client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, format!("token {}", self.token))
            .header(reqwest::header::ACCEPT, ACCEPT)
    }

    /// Send and turn any non-success status into the matching error kind
    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        let error = classify_status(status, message);
        warn!(%status, error = %error, "remote request failed");

        Err(error)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        Ok(self.send(request).await?.json::<T>().await?)
    }

    fn committer_payload(&self) -> CommitterPayload {
        CommitterPayload {
            name: self.committer.name.clone(),
            email: self.committer.email.clone(),
        }
    }

    async fn read_ref(&self, branch: &str) -> RemoteResult<ContentHash> {
        let url = self.repo_url(["git", "ref", "heads"].into_iter().chain(branch.split('/')))?;
        let reference = self
            .send_json::<RefResponse>(self.request(Method::GET, url))
            .await
            .map_err(|error| match error {
                RemoteError::NotFound(_) => {
                    RemoteError::NotFound(format!("branch {branch} not found"))
                }
                other => other,
            })?;

        parse_hash(reference.object.sha)
    }

    async fn read_blob(&self, hash: &ContentHash) -> RemoteResult<Vec<u8>> {
        let url = self.repo_url(["git", "blobs", hash.as_ref()])?;
        let blob = self
            .send_json::<BlobResponse>(self.request(Method::GET, url))
            .await?;

        if blob.encoding != BASE64_ENCODING {
            return Err(RemoteError::Transport(format!(
                "blob {} came back with unsupported encoding '{}'",
                hash.to_short_hash(),
                blob.encoding
            )));
        }
        decode(&blob.content)
    }
}

/// Map an unsuccessful HTTP status to the error taxonomy
pub fn classify_status(status: StatusCode, message: String) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Auth(message),
        StatusCode::NOT_FOUND => RemoteError::NotFound(message),
        StatusCode::CONFLICT => RemoteError::Conflict(message),
        StatusCode::UNPROCESSABLE_ENTITY => RemoteError::Validation(message),
        status => RemoteError::Transport(format!("unexpected status {status}: {message}")),
    }
}

fn decode(encoded: &str) -> RemoteResult<Vec<u8>> {
    decode_content(encoded).map_err(|e| RemoteError::Transport(format!("undecodable content: {e}")))
}

fn parse_hash(raw: String) -> RemoteResult<ContentHash> {
    ContentHash::try_parse(raw).map_err(|e| RemoteError::Transport(e.to_string()))
}

/// A 422 on a contents write that complains about `sha` is a stale or missing version token
fn content_write_error(path: &str, error: RemoteError) -> RemoteError {
    match error {
        RemoteError::Validation(message) if message.contains("sha") => {
            RemoteError::Conflict(format!("{path}: {message}"))
        }
        RemoteError::Conflict(message) => RemoteError::Conflict(format!("{path}: {message}")),
        other => other,
    }
}

impl RemoteRepository for GitHubClient {
    async fn list_tree(&self, branch: &str) -> RemoteResult<Vec<TreeEntry>> {
        let commit_sha = self.read_ref(branch).await?;

        let url = self.repo_url(["git", "commits", commit_sha.as_ref()])?;
        let commit = self
            .send_json::<CommitResponse>(self.request(Method::GET, url))
            .await?;

        let mut url = self.repo_url(["git", "trees", commit.tree.sha.as_str()])?;
        url.query_pairs_mut().append_pair("recursive", "1");
        let tree = self
            .send_json::<TreeResponse>(self.request(Method::GET, url))
            .await?;
        if tree.truncated {
            warn!(branch, "tree listing was truncated by the server");
            return Err(RemoteError::Transport(format!(
                "tree of {branch} is too large to list in one request"
            )));
        }

        tree.tree
            .into_iter()
            .filter_map(|item| {
                EntryKind::from_object_type(&item.object_type).map(|kind| (item, kind))
            })
            .map(|(item, kind)| -> RemoteResult<TreeEntry> {
                let hash = item.sha.map(parse_hash).transpose()?;
                Ok(TreeEntry::new(item.path, kind, hash))
            })
            .collect()
    }

    async fn read_file(&self, path: &str, branch: &str) -> RemoteResult<RemoteFile> {
        let mut url = self.contents_url(path)?;
        url.query_pairs_mut().append_pair("ref", branch);

        let contents = self
            .send_json::<ContentsResponse>(self.request(Method::GET, url))
            .await
            .map_err(|error| match error {
                RemoteError::NotFound(_) => {
                    RemoteError::NotFound(format!("{path} not found on {branch}"))
                }
                other => other,
            })?;

        match contents {
            ContentsResponse::File(file) if file.object_type == "file" => {
                let hash = parse_hash(file.sha)?;
                let bytes = match file.encoding.as_deref() {
                    Some(BASE64_ENCODING) => decode(file.content.as_deref().unwrap_or_default())?,
                    // Files above 1 MB come back without an inline body.
                    _ => self.read_blob(&hash).await?,
                };

                Ok(RemoteFile::new(file.path, hash, Content::from_bytes(bytes)))
            }
            _ => Err(RemoteError::NotFound(format!(
                "{path} is not a file on {branch}"
            ))),
        }
    }

    async fn write_file(
        &self,
        path: &str,
        content: &Content,
        message: &str,
        branch: &str,
        expected_hash: Option<&ContentHash>,
    ) -> RemoteResult<ContentHash> {
        let payload = PutFileRequest {
            message: message.to_string(),
            content: encode_content(content.as_bytes()),
            branch: branch.to_string(),
            sha: expected_hash.map(|hash| hash.to_string()),
            committer: self.committer_payload(),
        };

        let url = self.contents_url(path)?;
        let response = self
            .send_json::<PutFileResponse>(self.request(Method::PUT, url).json(&payload))
            .await
            .map_err(|error| content_write_error(path, error))?;

        parse_hash(response.content.sha)
    }

    async fn delete_file(
        &self,
        path: &str,
        hash: &ContentHash,
        message: &str,
        branch: &str,
    ) -> RemoteResult<()> {
        let payload = DeleteFileRequest {
            message: message.to_string(),
            sha: hash.to_string(),
            branch: branch.to_string(),
            committer: self.committer_payload(),
        };

        let url = self.contents_url(path)?;
        self.send(self.request(Method::DELETE, url).json(&payload))
            .await
            .map_err(|error| content_write_error(path, error))?;

        Ok(())
    }

    async fn create_branch(&self, name: &BranchName, from_branch: &str) -> RemoteResult<ContentHash> {
        let head = self.read_ref(from_branch).await?;
        let payload = CreateRefRequest {
            full_ref: name.as_ref_path(),
            sha: head.to_string(),
        };

        let url = self.repo_url(["git", "refs"])?;
        self.send(self.request(Method::POST, url).json(&payload))
            .await
            .map_err(|error| match error {
                RemoteError::Validation(message) if message.contains("already exists") => {
                    RemoteError::AlreadyExists(format!("branch {name} already exists"))
                }
                other => other,
            })?;

        Ok(head)
    }

    async fn open_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> RemoteResult<String> {
        if head == base {
            return Err(RemoteError::Validation(format!(
                "cannot open a pull request from {head} into itself"
            )));
        }

        let payload = CreatePullRequest {
            title: title.to_string(),
            head: head.to_string(),
            base: base.to_string(),
            body: body.to_string(),
        };

        let url = self.repo_url(["pulls"])?;
        let pull = self
            .send_json::<PullResponse>(self.request(Method::POST, url).json(&payload))
            .await?;

        Ok(pull.html_url)
    }

    async fn authenticated_user(&self) -> RemoteResult<String> {
        let url = self.url(["user"])?;
        let user = self
            .send_json::<UserResponse>(self.request(Method::GET, url))
            .await?;

        Ok(user.login)
    }

    async fn repository_name(&self) -> RemoteResult<String> {
        let url = self.repo_url(std::iter::empty())?;
        let repository = self
            .send_json::<RepositoryResponse>(self.request(Method::GET, url))
            .await?;

        Ok(repository.full_name)
    }

    async fn branch_head(&self, branch: &str) -> RemoteResult<ContentHash> {
        self.read_ref(branch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::errors::ErrorKind;
    use crate::remote::wire::{FileContents, ObjectRef};
    use axum::routing::get;
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SHA: &str = "3b18e512dba79e4c8300dd08aeb37f8e728b8dad";

    fn client() -> GitHubClient {
        let mut config = Config::new("t0ken", "acme/handbook");
        config.api_url = "https://api.example.test/".to_string();
        GitHubClient::new(&config).unwrap()
    }

    async fn serve(router: Router) -> GitHubClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = Config::new("t0ken", "acme/handbook");
        config.api_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        GitHubClient::new(&config).unwrap()
    }

    fn branch_routes(truncated: bool) -> Router {
        Router::new()
            .route(
                "/repos/acme/handbook/git/ref/heads/main",
                get(|| async {
                    Json(RefResponse {
                        full_ref: "refs/heads/main".to_string(),
                        object: ObjectRef { sha: SHA.to_string() },
                    })
                }),
            )
            .route(
                "/repos/acme/handbook/git/commits/{sha}",
                get(|| async {
                    Json(CommitResponse {
                        sha: SHA.to_string(),
                        tree: ObjectRef { sha: SHA.to_string() },
                    })
                }),
            )
            .route(
                "/repos/acme/handbook/git/trees/{sha}",
                get(move || async move {
                    Json(TreeResponse {
                        sha: SHA.to_string(),
                        tree: vec![],
                        truncated,
                    })
                }),
            )
    }

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, ErrorKind::Auth)]
    #[case::forbidden(StatusCode::FORBIDDEN, ErrorKind::Auth)]
    #[case::not_found(StatusCode::NOT_FOUND, ErrorKind::NotFound)]
    #[case::conflict(StatusCode::CONFLICT, ErrorKind::Conflict)]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, ErrorKind::Validation)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, ErrorKind::Transport)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Transport)]
    fn statuses_map_to_error_kinds(#[case] status: StatusCode, #[case] expected: ErrorKind) {
        assert_eq!(classify_status(status, "boom".to_string()).kind(), expected);
    }

    #[test]
    fn missing_sha_on_write_is_a_conflict() {
        let error = content_write_error(
            "docs/a.md",
            RemoteError::Validation("Invalid request.\n\n\"sha\" wasn't supplied.".to_string()),
        );
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn contents_url_encodes_each_segment() {
        let url = client().contents_url("docs/user guide/intro.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.test/repos/acme/handbook/contents/docs/user%20guide/intro.md"
        );
    }

    #[test]
    fn repo_url_prefixes_owner_and_name() {
        let url = client().repo_url(["git", "refs"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/repos/acme/handbook/git/refs");
    }

    #[tokio::test]
    async fn large_file_is_read_through_the_blob_endpoint() {
        let body = "# Big\n".repeat(4);
        let blob = encode_content(body.as_bytes());
        let router = Router::new()
            .route(
                "/repos/acme/handbook/contents/{*path}",
                get(|| async {
                    Json(FileContents {
                        object_type: "file".to_string(),
                        path: "docs/big.md".to_string(),
                        sha: SHA.to_string(),
                        content: Some(String::new()),
                        encoding: Some("none".to_string()),
                    })
                }),
            )
            .route(
                "/repos/acme/handbook/git/blobs/{sha}",
                get(move || async move {
                    Json(BlobResponse {
                        sha: SHA.to_string(),
                        content: blob,
                        encoding: "base64".to_string(),
                    })
                }),
            );

        let file = serve(router).await.read_file("docs/big.md", "main").await.unwrap();

        assert_eq!(file.content, Content::from(body));
        assert_eq!(file.hash.to_string(), SHA);
    }

    #[tokio::test]
    async fn blob_with_unknown_encoding_is_a_transport_error() {
        let router = Router::new()
            .route(
                "/repos/acme/handbook/contents/{*path}",
                get(|| async {
                    Json(FileContents {
                        object_type: "file".to_string(),
                        path: "docs/big.md".to_string(),
                        sha: SHA.to_string(),
                        content: None,
                        encoding: None,
                    })
                }),
            )
            .route(
                "/repos/acme/handbook/git/blobs/{sha}",
                get(|| async {
                    Json(BlobResponse {
                        sha: SHA.to_string(),
                        content: "# Big".to_string(),
                        encoding: "utf-8".to_string(),
                    })
                }),
            );

        let error = serve(router)
            .await
            .read_file("docs/big.md", "main")
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn truncated_tree_fails_instead_of_listing_partially() {
        let error = serve(branch_routes(true))
            .await
            .list_tree("main")
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Transport);
        assert!(error.to_string().contains("too large to list"));
    }

    #[tokio::test]
    async fn complete_tree_is_listed() {
        let entries = serve(branch_routes(false)).await.list_tree("main").await.unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn rejects_repository_without_owner() {
        let config = Config::new("t0ken", "handbook");
        assert!(matches!(
            GitHubClient::new(&config),
            Err(RemoteError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn pull_request_into_itself_is_rejected_locally() {
        let error = client()
            .open_pull_request("main", "main", "docs: Update docs/a.md", "body")
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
    }
}

//! In-process stand-in for the GitHub REST API
//!
//! Serves the endpoints the editor calls from a `MemoryRemote`, so CLI tests can
//! run the real binary over real HTTP and then inspect the repository state.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use docs_editor::artifacts::branch::branch_name::BranchName;
use docs_editor::artifacts::errors::RemoteError;
use docs_editor::artifacts::objects::content_hash::ContentHash;
use docs_editor::artifacts::objects::remote_file::Content;
use docs_editor::remote::RemoteRepository;
use docs_editor::remote::memory::MemoryRemote;
use docs_editor::remote::wire::{
    ApiErrorBody, CommitResponse, CreatePullRequest, CreateRefRequest, DeleteFileRequest,
    FileContents, ObjectRef, PullResponse, PutFileRequest, PutFileResponse, RefResponse,
    RepositoryResponse, TreeItem, TreeResponse, UserResponse, decode_content, encode_content,
};
use serde::Deserialize;
use std::sync::Arc;

pub const TOKEN: &str = "fake-token";
pub const REPO: &str = "acme/handbook";

#[derive(Clone)]
struct AppState {
    remote: Arc<MemoryRemote>,
}

/// A running fake API; the server lives until the test process exits
pub struct FakeGitHub {
    pub url: String,
    pub remote: Arc<MemoryRemote>,
}

struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ApiErrorBody { message: self.1 })).into_response()
    }
}

impl From<RemoteError> for ApiError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Auth(message) => ApiError(StatusCode::UNAUTHORIZED, message),
            RemoteError::NotFound(message) => ApiError(StatusCode::NOT_FOUND, message),
            RemoteError::Conflict(message) => ApiError(StatusCode::CONFLICT, message),
            RemoteError::AlreadyExists(_) => ApiError(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Reference already exists".to_string(),
            ),
            RemoteError::Validation(message) | RemoteError::StaleState(message) => {
                ApiError(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            RemoteError::Transport(message) => ApiError(StatusCode::INTERNAL_SERVER_ERROR, message),
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn authorize(headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = format!("token {TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(ApiError(
            StatusCode::UNAUTHORIZED,
            "Bad credentials".to_string(),
        )),
    }
}

fn parse_hash(raw: &str) -> Result<ContentHash, ApiError> {
    ContentHash::try_parse(raw.to_string())
        .map_err(|e| ApiError(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

async fn user(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<UserResponse> {
    authorize(&headers)?;
    Ok(Json(UserResponse {
        login: state.remote.user().to_string(),
    }))
}

async fn repository(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> ApiResult<RepositoryResponse> {
    authorize(&headers)?;
    let full_name = state.remote.repository_name().await?;
    if full_name != format!("{owner}/{repo}") {
        return Err(ApiError(StatusCode::NOT_FOUND, "Not Found".to_string()));
    }

    Ok(Json(RepositoryResponse { full_name }))
}

async fn branch_ref(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((_, _, branch)): Path<(String, String, String)>,
) -> ApiResult<RefResponse> {
    authorize(&headers)?;
    let head = state.remote.branch_head(&branch).await?;

    Ok(Json(RefResponse {
        full_ref: format!("refs/heads/{branch}"),
        object: ObjectRef {
            sha: head.to_string(),
        },
    }))
}

// Commits double as their own root tree ids.
async fn commit(
    headers: HeaderMap,
    Path((_, _, sha)): Path<(String, String, String)>,
) -> ApiResult<CommitResponse> {
    authorize(&headers)?;

    Ok(Json(CommitResponse {
        sha: sha.clone(),
        tree: ObjectRef { sha },
    }))
}

async fn tree(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((_, _, sha)): Path<(String, String, String)>,
) -> ApiResult<TreeResponse> {
    authorize(&headers)?;
    let entries = state
        .remote
        .commit_tree(&parse_hash(&sha)?)
        .ok_or_else(|| ApiError(StatusCode::NOT_FOUND, "Not Found".to_string()))?;

    Ok(Json(TreeResponse {
        sha,
        tree: entries
            .into_iter()
            .map(|entry| TreeItem {
                object_type: entry.kind.as_object_type().to_string(),
                sha: entry.hash.map(|hash| hash.to_string()),
                path: entry.path,
            })
            .collect(),
        truncated: false,
    }))
}

#[derive(Deserialize)]
struct RefQuery {
    #[serde(rename = "ref")]
    branch: String,
}

async fn read_contents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((_, _, path)): Path<(String, String, String)>,
    Query(query): Query<RefQuery>,
) -> ApiResult<FileContents> {
    authorize(&headers)?;
    let file = state.remote.read_file(&path, &query.branch).await?;

    Ok(Json(FileContents {
        object_type: "file".to_string(),
        path: file.path,
        sha: file.hash.to_string(),
        content: Some(encode_content(file.content.as_bytes())),
        encoding: Some("base64".to_string()),
    }))
}

async fn write_contents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((_, _, path)): Path<(String, String, String)>,
    Json(request): Json<PutFileRequest>,
) -> ApiResult<PutFileResponse> {
    authorize(&headers)?;
    let bytes = decode_content(&request.content)
        .map_err(|e| ApiError(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let expected = request.sha.as_deref().map(parse_hash).transpose()?;

    let hash = state
        .remote
        .write_file(
            &path,
            &Content::from_bytes(bytes),
            &request.message,
            &request.branch,
            expected.as_ref(),
        )
        .await?;

    Ok(Json(PutFileResponse {
        content: ObjectRef {
            sha: hash.to_string(),
        },
    }))
}

async fn delete_contents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((_, _, path)): Path<(String, String, String)>,
    Json(request): Json<DeleteFileRequest>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    let hash = parse_hash(&request.sha)?;
    state
        .remote
        .delete_file(&path, &hash, &request.message, &request.branch)
        .await?;

    Ok(StatusCode::OK)
}

async fn create_ref(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateRefRequest>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    let name = BranchName::try_parse_ref(&request.full_ref)
        .map_err(|e| ApiError(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    state.remote.create_ref(&name, &parse_hash(&request.sha)?)?;

    Ok(StatusCode::CREATED)
}

async fn create_pull(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePullRequest>,
) -> Result<(StatusCode, Json<PullResponse>), ApiError> {
    authorize(&headers)?;
    let html_url = state
        .remote
        .open_pull_request(&request.head, &request.base, &request.title, &request.body)
        .await?;

    Ok((StatusCode::CREATED, Json(PullResponse { html_url })))
}

fn router(remote: Arc<MemoryRemote>) -> Router {
    Router::new()
        .route("/user", get(user))
        .route("/repos/{owner}/{repo}", get(repository))
        .route("/repos/{owner}/{repo}/git/ref/heads/{*branch}", get(branch_ref))
        .route("/repos/{owner}/{repo}/git/commits/{sha}", get(commit))
        .route("/repos/{owner}/{repo}/git/trees/{sha}", get(tree))
        .route("/repos/{owner}/{repo}/git/refs", post(create_ref))
        .route("/repos/{owner}/{repo}/pulls", post(create_pull))
        .route(
            "/repos/{owner}/{repo}/contents/{*path}",
            get(read_contents).put(write_contents).delete(delete_contents),
        )
        .with_state(AppState { remote })
}

/// Serve `remote` on an ephemeral local port from a background thread
pub fn start(remote: MemoryRemote) -> FakeGitHub {
    let remote = Arc::new(remote);
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake API listener");
    listener
        .set_nonblocking(true)
        .expect("Failed to configure fake API listener");
    let url = format!(
        "http://{}",
        listener.local_addr().expect("Failed to read fake API address")
    );

    let app = router(remote.clone());
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build fake API runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener)
                .expect("Failed to adopt fake API listener");
            axum::serve(listener, app)
                .await
                .expect("Fake API server stopped");
        });
    });

    FakeGitHub { url, remote }
}

// HTTP implementation of the tutoring backend contract

use crate::error::{ApiError, Result};
use crate::session::{AuthToken, SessionGuard, AUTH_HEADER};
use crate::traits::TutorBackend;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{RequestBuilder, Response, StatusCode};
use tutor_types::{
    ChatAnswer, ChatQuestion, Credentials, DocumentRequest, LoginResponse, Topic, TopicId,
};

/// Tutoring backend client (HTTP direct)
pub struct HttpTutorClient {
    http_client: reqwest::Client,
    base_url: String,
    session: SessionGuard,
}

impl HttpTutorClient {
    /// Create a client for `base_url` (e.g. "http://localhost:5000/api")
    pub fn new(base_url: impl Into<String>, session: SessionGuard) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `x-auth-token` when a token is present; otherwise send as-is
    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        match self.session.get_token() {
            Some(token) => {
                let value = HeaderValue::from_str(token.as_str())
                    .map_err(|e| ApiError::InvalidToken(e.to_string()))?;
                Ok(request.header(AUTH_HEADER, value))
            }
            None => {
                tracing::debug!("No session token; sending request unauthenticated");
                Ok(request)
            }
        }
    }

    /// Classify non-success responses
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = %status, "Backend returned an error status");

        if status == StatusCode::BAD_REQUEST {
            Err(ApiError::InvalidRequest {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl TutorBackend for HttpTutorClient {
    fn session(&self) -> &SessionGuard {
        &self.session
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthToken> {
        tracing::debug!(email = %credentials.email, "Logging in");

        let response = self
            .http_client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;

        let body: LoginResponse = Self::check(response).await?.json().await?;
        let token = AuthToken::new(body.token);
        self.session.set_token(token.clone())?;

        tracing::info!(email = %credentials.email, "Logged in");
        Ok(token)
    }

    async fn fetch_topic(&self, id: TopicId) -> Result<Topic> {
        tracing::debug!(topic_id = id, "Fetching topic");

        let request = self.http_client.get(self.url(&format!("/topics/{}", id)));
        let response = self.authorize(request)?.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::TopicNotFound(id));
        }

        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_chat_question(&self, question: &str) -> Result<String> {
        tracing::debug!(len = question.len(), "Posting chat question");

        let body = ChatQuestion {
            question: question.to_string(),
        };
        let request = self.http_client.post(self.url("/ai/chat")).json(&body);
        let response = self.authorize(request)?.send().await?;

        let answer: ChatAnswer = Self::check(response).await?.json().await?;
        Ok(answer.answer)
    }

    async fn create_document(&self, topic_name: &str) -> Result<Vec<u8>> {
        tracing::debug!(topic = %topic_name, "Requesting KTP");

        let body = DocumentRequest {
            topic: topic_name.to_string(),
        };
        let request = self
            .http_client
            .post(self.url("/ktp/create"))
            .header(ACCEPT, "application/pdf")
            .json(&body);
        let response = self.authorize(request)?.send().await?;

        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

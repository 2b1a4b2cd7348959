use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response};
use shared::{
    domain::{ChatMessage, Language, SessionId, User},
    error::ApiError,
    protocol::{AssistantReply, AssistantRequest, HomeView, LoginRequest, LoginResponse},
};

/// Thin HTTP client for the clinic server.
pub struct ClinicClient {
    http: Client,
    server_url: String,
    session: Option<(SessionId, User)>,
}

impl ClinicClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into().trim_end_matches('/').to_string(),
            session: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|(_, user)| user)
    }

    fn session_id(&self) -> Result<SessionId> {
        self.session
            .as_ref()
            .map(|(id, _)| *id)
            .ok_or_else(|| anyhow!("not logged in"))
    }

    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        language: Language,
    ) -> Result<&User> {
        let res = self
            .http
            .post(format!("{}/login", self.server_url))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
                language,
            })
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.server_url))?;
        let body: LoginResponse = checked(res).await?.json().await?;
        Ok(&self.session.insert((body.session_id, body.user)).1)
    }

    pub async fn home(&self) -> Result<HomeView> {
        let session_id = self.session_id()?;
        let res = self
            .http
            .get(format!("{}/home", self.server_url))
            .query(&[("session_id", session_id.to_string())])
            .send()
            .await?;
        Ok(checked(res).await?.json().await?)
    }

    pub async fn ask(
        &self,
        history: Vec<ChatMessage>,
        message: &str,
        language: Language,
    ) -> Result<String> {
        let session_id = self.session_id()?;
        let res = self
            .http
            .post(format!("{}/assistant/messages", self.server_url))
            .query(&[("session_id", session_id.to_string())])
            .json(&AssistantRequest {
                history,
                message: message.to_string(),
                language,
            })
            .send()
            .await?;
        let body: AssistantReply = checked(res).await?.json().await?;
        Ok(body.reply)
    }

    pub async fn logout(&mut self) -> Result<()> {
        let session_id = self.session_id()?;
        let res = self
            .http
            .post(format!("{}/logout", self.server_url))
            .query(&[("session_id", session_id.to_string())])
            .send()
            .await?;
        checked(res).await?;
        self.session = None;
        Ok(())
    }
}

/// Surfaces the server's `ApiError` message instead of a bare status.
async fn checked(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let text = res.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&text) {
        Ok(error) => Err(anyhow!("{} ({status})", error.message)),
        Err(_) => Err(anyhow!("server returned {status}: {text}")),
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;

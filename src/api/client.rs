use async_trait::async_trait;
use serde_json::{json, Value};

use super::digest::{app_code_secret, app_token_secret, sha1_hex};
use super::response::{
    ApiResponse, IdResponse, ID_STATE_FAILURE, ID_STATE_SECOND_FACTOR, ID_STATE_SUCCESS,
};
use super::vendor::{RemoteCommand, VendorApi};
use crate::auth::keychain::{SecretKey, SecretStore};
use crate::error::AppError;
use crate::models::device::Device;

const PATH_APP_CODE: &str = "/apiV3/application/getCode/";
const PATH_APP_TOKEN: &str = "/apiV3/application/getToken/";
const PATH_USER_LOGIN: &str = "/apiV3/user/login/";
const PATH_AUTH_SLID: &str = "/json/v2/auth.slid";

const SESSION_COOKIE: &str = "slnet";

/// Base URLs of the two vendor hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub id_url: String,
    pub api_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            id_url: "https://id.starline.ru".into(),
            api_url: "https://developer.starline.ru".into(),
        }
    }
}

impl Endpoints {
    /// Both hosts served from one base URL (used against local mock servers).
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            id_url: base.clone(),
            api_url: base,
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    user_id: String,
    cookie: String,
}

pub struct StarlineClient {
    client: reqwest::Client,
    endpoints: Endpoints,
    tokens: Box<dyn SecretStore>,
    app_token: Option<String>,
    user_token: Option<String>,
    session: Option<Session>,
}

fn build_http_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("cassiopeia/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .build()?)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl StarlineClient {
    pub fn new(endpoints: Endpoints, tokens: Box<dyn SecretStore>) -> Result<Self, AppError> {
        Ok(Self {
            client: build_http_client()?,
            endpoints,
            tokens,
            app_token: None,
            user_token: None,
            session: None,
        })
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Result<&Session, AppError> {
        self.session.as_ref().ok_or(AppError::NotAuthenticated)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AppError::Api {
                message: format!("{}: {}", status, body),
                error_code: Some(i32::from(status.as_u16())),
            })
        }
    }

    /// GET against the identity host.
    async fn request_id(&self, path: &str, query: &[(&str, &str)]) -> Result<IdResponse, AppError> {
        let url = format!("{}{}", self.endpoints.id_url, path);
        tracing::debug!(%url, "GET");

        let response = self.client.get(&url).query(query).send().await?;
        let response = Self::check_status(response).await?;
        let id_response: IdResponse = response.json().await?;
        tracing::debug!(state = id_response.state, "identity host replied");
        Ok(id_response)
    }

    /// Request against the developer host, carrying the session cookie when one is open.
    async fn request_api(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, AppError> {
        let url = format!("{}{}", self.endpoints.api_url, path);
        tracing::debug!(%url, %method, "api request");

        let mut request = self.client.request(method, &url);
        if let Some(session) = &self.session {
            request = request.header(
                reqwest::header::COOKIE,
                format!("{}={}", SESSION_COOKIE, session.cookie),
            );
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = Self::check_status(request.send().await?).await?;
        let api_response: ApiResponse = response.json().await?;
        tracing::debug!(code = ?api_response.code(), "api replied");

        if api_response.successful() {
            Ok(api_response)
        } else {
            Err(AppError::Api {
                message: api_response
                    .codestring
                    .clone()
                    .unwrap_or_else(|| format!("Request failed with code {}", api_response.code)),
                error_code: api_response.code(),
            })
        }
    }

    async fn fetch_app_token(&self, app_id: &str, app_secret: &str) -> Result<String, AppError> {
        let code_secret = app_code_secret(app_secret);
        let response = self
            .request_id(PATH_APP_CODE, &[("appId", app_id), ("secret", code_secret.as_str())])
            .await?;
        let app_code = match response.desc_str("code") {
            Some(code) if response.successful() => code.to_string(),
            _ => {
                return Err(AppError::Auth {
                    message: response
                        .message()
                        .unwrap_or_else(|| "Application code was not issued".into()),
                    error_code: Some(response.state),
                })
            }
        };

        let token_secret = app_token_secret(app_secret, &app_code);
        let response = self
            .request_id(PATH_APP_TOKEN, &[("appId", app_id), ("secret", token_secret.as_str())])
            .await?;
        match response.desc_str("token") {
            Some(token) if response.successful() => Ok(token.to_string()),
            _ => Err(AppError::Auth {
                message: response
                    .message()
                    .unwrap_or_else(|| "Application token was not issued".into()),
                error_code: Some(response.state),
            }),
        }
    }

    /// Exchange a user token for a developer API session.
    async fn open_session(&mut self, user_token: &str) -> Result<(), AppError> {
        let url = format!("{}{}", self.endpoints.api_url, PATH_AUTH_SLID);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "slid_token": user_token }))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let cookie = response
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string());
        let api_response: ApiResponse = response.json().await?;

        if !api_response.successful() {
            return Err(AppError::Auth {
                message: api_response
                    .codestring
                    .clone()
                    .unwrap_or_else(|| "Session was not opened".into()),
                error_code: api_response.code(),
            });
        }

        let user_id = api_response
            .get("user_id")
            .and_then(value_to_string)
            .ok_or_else(|| AppError::MalformedPayload("auth reply has no user_id".into()))?;
        let cookie = cookie.ok_or_else(|| {
            AppError::MalformedPayload(format!("auth reply has no {} cookie", SESSION_COOKIE))
        })?;

        tracing::info!(%user_id, "session opened");
        self.session = Some(Session { user_id, cookie });
        Ok(())
    }
}

#[async_trait]
impl VendorApi for StarlineClient {
    async fn initialize(&mut self, app_id: &str, app_secret: &str) -> Result<bool, AppError> {
        let app_token = self.fetch_app_token(app_id, app_secret).await?;
        self.app_token = Some(app_token);
        self.user_token = self.tokens.get(SecretKey::UserToken)?;
        Ok(self.user_token.is_some())
    }

    async fn resume_session(&mut self) -> Result<(), AppError> {
        let user_token = self.user_token.clone().ok_or(AppError::NotAuthenticated)?;
        match self.open_session(&user_token).await {
            Ok(()) => Ok(()),
            Err(err @ AppError::Auth { .. }) => {
                tracing::info!("stored user token rejected, forgetting it");
                self.user_token = None;
                if let Err(e) = self.tokens.delete(SecretKey::UserToken) {
                    tracing::warn!(error = %e, "could not remove stale user token");
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn authenticate(
        &mut self,
        login: &str,
        password: &str,
        sms_code: Option<&str>,
    ) -> Result<(), AppError> {
        if login.is_empty() {
            return Err(AppError::InvalidInput("Login is required".into()));
        }
        if password.is_empty() {
            return Err(AppError::InvalidInput("Password is required".into()));
        }
        let app_token = self.app_token.clone().ok_or(AppError::NotAuthenticated)?;

        let pass = sha1_hex(password);
        let mut form = vec![("login", login), ("pass", pass.as_str())];
        if let Some(code) = sms_code {
            form.push(("smsCode", code));
        }

        let url = format!("{}{}", self.endpoints.id_url, PATH_USER_LOGIN);
        tracing::debug!(%url, with_sms_code = sms_code.is_some(), "POST");

        let response = self
            .client
            .post(&url)
            .header("token", app_token)
            .form(&form)
            .send()
            .await?;
        let response: IdResponse = Self::check_status(response).await?.json().await?;

        match response.state {
            ID_STATE_SUCCESS => {
                let user_token = response
                    .desc_str("user_token")
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::MalformedPayload("login reply has no user_token".into()))?;
                self.open_session(&user_token).await?;
                if let Err(e) = self.tokens.set(SecretKey::UserToken, &user_token) {
                    tracing::warn!(error = %e, "could not persist user token");
                }
                self.user_token = Some(user_token);
                Ok(())
            }
            ID_STATE_SECOND_FACTOR => Err(AppError::SecondFactorRequired {
                phone: response.desc_str("phone").map(|s| s.to_string()),
            }),
            ID_STATE_FAILURE => Err(AppError::Auth {
                message: response
                    .message()
                    .unwrap_or_else(|| "Authentication failed".into()),
                error_code: Some(ID_STATE_FAILURE),
            }),
            state => Err(AppError::MalformedPayload(format!(
                "login reply has unexpected state {}",
                state
            ))),
        }
    }

    async fn list_devices(&self) -> Result<Vec<Device>, AppError> {
        let session = self.session()?;
        let path = format!("/json/v3/user/{}/devices", session.user_id);
        let response = self.request_api(reqwest::Method::GET, &path, None).await?;

        let devices = response
            .get("devices")
            .cloned()
            .ok_or_else(|| AppError::MalformedPayload("reply has no devices list".into()))?;
        serde_json::from_value(devices).map_err(|e| AppError::MalformedPayload(e.to_string()))
    }

    async fn get_device(&self, device_id: &str) -> Result<Device, AppError> {
        self.session()?;
        let path = format!("/json/v3/device/{}/data", device_id);
        let response = self.request_api(reqwest::Method::GET, &path, None).await?;

        let mut data = match response.get("data") {
            Some(Value::Object(map)) => map.clone(),
            _ => return Err(AppError::MalformedPayload("reply has no device data".into())),
        };
        data.entry("device_id")
            .or_insert_with(|| Value::String(device_id.to_string()));
        serde_json::from_value(Value::Object(data))
            .map_err(|e| AppError::MalformedPayload(e.to_string()))
    }

    async fn run_command(&self, command: RemoteCommand, device_id: &str) -> Result<(), AppError> {
        self.session()?;
        let path = format!("/json/v1/device/{}/set_param", device_id);
        tracing::info!(?command, %device_id, "sending command");
        self.request_api(reqwest::Method::POST, &path, Some(&command.to_body()))
            .await?;
        Ok(())
    }
}

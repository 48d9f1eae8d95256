use serde::Deserialize;
use serde_json::Value;

/// Envelope returned by the identity host: `state` 1 means success.
#[derive(Debug, Deserialize)]
pub struct IdResponse {
    pub state: i32,
    #[serde(default)]
    pub desc: Value,
}

pub const ID_STATE_FAILURE: i32 = 0;
pub const ID_STATE_SUCCESS: i32 = 1;
pub const ID_STATE_SECOND_FACTOR: i32 = 2;

impl IdResponse {
    pub fn successful(&self) -> bool {
        self.state == ID_STATE_SUCCESS
    }

    /// A string field of `desc`.
    pub fn desc_str(&self, key: &str) -> Option<&str> {
        self.desc.get(key).and_then(|v| v.as_str())
    }

    pub fn message(&self) -> Option<String> {
        self.desc_str("message").map(|s| s.to_string())
    }
}

/// Envelope returned by the developer API host.
///
/// `code` is sometimes a number and sometimes a numeric string.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub codestring: Option<String>,
    #[serde(flatten)]
    pub body: serde_json::Map<String, Value>,
}

impl ApiResponse {
    pub fn code(&self) -> Option<i32> {
        self.code
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .or_else(|| self.code.as_str().and_then(|s| s.parse::<i32>().ok()))
    }

    pub fn successful(&self) -> bool {
        self.code() == Some(200)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }
}

//! Share links
//!
//! A share token is an opaque, URL-safe string: random base-36 characters
//! followed by the base-36 creation time in milliseconds.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::SharedResource;
use crate::types::{AppError, AppResult};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_LEN: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Chart,
    Diagram,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Chart => "chart",
            ResourceType::Diagram => "diagram",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chart" => Ok(ResourceType::Chart),
            "diagram" => Ok(ResourceType::Diagram),
            other => Err(AppError::Internal(format!("Unknown resource type: {}", other))),
        }
    }
}

pub fn generate_share_token() -> String {
    let mut rng = rand::thread_rng();
    let mut token: String = (0..RANDOM_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    token.push_str(&to_base36(millis));
    token
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

pub fn share_url(base_url: &str, token: &str) -> String {
    format!("{}/shared/{}", base_url.trim_end_matches('/'), token)
}

pub fn embed_code(share_url: &str) -> String {
    format!(
        r#"<iframe src="{}?embed=true" width="800" height="600" frameborder="0"></iframe>"#,
        share_url
    )
}

/// Embedding needs the owner's explicit opt-in.
pub fn check_access(shared: &SharedResource, embed: bool) -> AppResult<()> {
    if embed && !shared.allow_embed {
        return Err(AppError::Forbidden("Embedding not allowed".to_string()));
    }
    Ok(())
}

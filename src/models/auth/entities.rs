/// 刷新令牌记录，只保存令牌的 SHA-256 摘要
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: i64,
    pub revoked_at: Option<i64>,
    pub replaced_by: Option<i64>,
    pub user_agent: Option<String>,
    pub created_at: i64,
}

impl RefreshToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// OAuth 提供方返回的用户资料
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuthProfile {
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

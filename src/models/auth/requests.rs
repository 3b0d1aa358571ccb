use serde::Deserialize;
use ts_rs::TS;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginRequest {
    /// 邮箱
    pub email: String,
    /// 密码
    pub password: String,
    /// 是否记住我，为 false 时刷新令牌 cookie 随浏览器会话结束
    #[serde(default)]
    pub remember_me: bool,
}

// 刷新/登出请求，cookie 缺失时可在请求体中携带
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

// OAuth 回调参数
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

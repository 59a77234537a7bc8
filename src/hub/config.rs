pub mod retry {
    use std::time::Duration;
    pub const RETRY_COUNT: u32 = 3;
    pub const RETRY_DELAY: Duration = Duration::from_millis(500);
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(60);
}
pub mod storage {
    use std::time::Duration;
    pub const CONTEXT_RETRY_COUNT: u32 = 3;
    pub const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(1000);
    pub const CHANGE_CAPACITY: usize = 32;
    pub const LOCAL_AREA: &str = "local";
}
pub mod github {
    use std::time::Duration;
    pub const API_URL: &str = "https://api.github.com";
    pub const WEB_URL: &str = "https://github.com";
    pub const ACCEPT: &str = "application/vnd.github.v3+json";
    pub const USER_AGENT: &str = concat!("judgehub/", env!("CARGO_PKG_VERSION"));
    pub const TIMEOUT: Duration = Duration::from_secs(30);
    pub const FILE_MODE: &str = "100644";
}
pub mod watcher {
    use std::time::Duration;
    pub const CONTEXT_WAIT_COUNT: u32 = 3;
    pub const CONTEXT_WAIT_DELAY: Duration = Duration::from_millis(100);
    pub const SUCCESS_MARKERS: [&str; 3] = ["Accepted", "Success", "정답"];
}
pub mod oauth {
    pub const AUTHORIZATION_URL: &str = "https://github.com/login/oauth/authorize";
    pub const ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
    pub const REDIRECT_URL: &str = "https://github.com/";
    pub const SCOPES: [&str; 1] = ["repo"];
    pub const STATE_LEN: usize = 24;
}

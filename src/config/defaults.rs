pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "商品が見つかりませんでした";
pub const DEFAULT_REQUEST_FAILED_MESSAGE: &str = "商品情報の取得に失敗しました";

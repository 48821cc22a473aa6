pub const WELCOME: &str = "Welcome to EQ Works 😎";

pub async fn welcome_handler() -> &'static str {
    WELCOME
}

use uuid::Uuid;

pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const LOGIN_SEND_OTP: &str = "/login/otp";
pub const LOGIN_VERIFY_OTP: &str = "/login/verify";
pub const LOGOUT: &str = "/logout";
pub const AUTH_CALLBACK: &str = "/auth/callback";
pub const PLAYERS: &str = "/players";
pub const CREATE_PLAYER: &str = "/players/new";
pub const CREATE_ROUND: &str = "/rounds/new";
pub const CAPTURE_ROUND: &str = "/rounds/new/capture";
pub const CREATE_ROUND_AI: &str = "/functions/v1/create-round-ai";
pub const HEALTH: &str = "/health";

#[must_use]
pub fn player(player_id: &Uuid) -> String {
    format!("{PLAYERS}/{player_id}")
}

use super::types::Args;
use sql_middleware::middleware::DatabaseType;

const SECRETS_LOCATIONS: [&str; 2] = ["/secrets/db_password", "/run/secrets/db_password"];

impl Args {
    /// Validate the database and service settings.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the database configuration is invalid
    pub fn validate(&mut self) -> Result<(), String> {
        if self.db_type == DatabaseType::Postgres {
            if self.db_user.is_none() {
                return Err("Postgres user is required".to_string());
            }
            if self.db_host.as_deref().is_none_or(str::is_empty) {
                return Err("Postgres host is required".to_string());
            }
            if self.db_port.is_none() {
                return Err("Postgres port is required".to_string());
            }
            match self.db_password.as_deref() {
                None => return Err("Postgres password is required".to_string()),
                Some(location) if SECRETS_LOCATIONS.contains(&location) => {
                    let contents = std::fs::read_to_string(location)
                        .map_err(|e| format!("Cannot read postgres password from {location}: {e}"))?;
                    self.db_password = Some(contents.trim().to_string());
                }
                Some(_) => {}
            }
        }
        if self.otp_ttl_minutes <= 0 {
            return Err("otp-ttl-minutes must be positive".to_string());
        }
        if self.session_ttl_hours <= 0 {
            return Err("session-ttl-hours must be positive".to_string());
        }
        Ok(())
    }
}

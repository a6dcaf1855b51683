use serde::Deserialize;

/// Runtime settings loaded from `config/*.yaml` and `APP_*` variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub database_url: String,
    /// Cookie signing key shared with the auth service; at least 64 bytes.
    pub secret: String,
    pub templates_dir: String,
    pub static_dir: String,
    /// Where unauthenticated visitors are sent to sign in.
    pub auth_service_url: String,
}

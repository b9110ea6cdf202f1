pub mod engine_config;
pub mod http_method;
pub mod proxmox_auth;
pub mod proxmox_connection;
pub mod proxmox_credential;
pub mod request_params;
pub mod session_state;

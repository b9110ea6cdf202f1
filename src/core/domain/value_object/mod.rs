mod proxmox_csrf_token;
mod proxmox_host;
mod proxmox_password;
mod proxmox_port;
mod proxmox_scheme;
mod proxmox_ticket;
mod proxmox_token_id;
mod proxmox_token_secret;
mod proxmox_url;
mod proxmox_username;
pub(crate) mod serde_helpers;

pub use proxmox_csrf_token::ProxmoxCSRFToken;
pub use proxmox_host::ProxmoxHost;
pub use proxmox_password::ProxmoxPassword;
pub use proxmox_port::ProxmoxPort;
pub use proxmox_scheme::ProxmoxScheme;
pub use proxmox_ticket::ProxmoxTicket;
pub use proxmox_token_id::ProxmoxTokenId;
pub use proxmox_token_secret::ProxmoxTokenSecret;
pub use proxmox_url::ProxmoxUrl;
pub use proxmox_username::ProxmoxUsername;

pub(crate) use proxmox_password::score_from_level;

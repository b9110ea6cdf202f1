pub mod api_client;
pub(crate) mod response_interpreter;
pub(crate) mod session_manager;

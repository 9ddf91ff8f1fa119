pub mod cors;
pub mod error_handler;
pub mod request_id;

pub use cors::{cors_layer, cors_layer_with_config, CorsConfig};
pub use error_handler::{handle_not_found, internal_error};
pub use request_id::{entity_name, request_id_middleware, RequestId, REQUEST_ID_HEADER};

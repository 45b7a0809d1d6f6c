// Handlers module

pub mod moderate;
pub mod rejection;
pub mod sessions;

pub use moderate::moderate_session_handler;
pub use rejection::handle_rejection;
pub use sessions::{
    create_session_handler, get_session_handler, join_session_handler, session_status_handler,
    submit_turn_handler,
};

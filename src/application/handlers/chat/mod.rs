//! Chat handlers.

mod handle_message;

pub use handle_message::{
    HandleMessageCommand, HandleMessageError, HandleMessageHandler, HandleMessageResult,
    MAX_MESSAGE_LEN,
};

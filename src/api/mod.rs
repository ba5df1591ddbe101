//! API Module
//!
//! Chat completion wire types.

pub mod completion;

pub use completion::{
    ChatMessage, Choice, CompletionRequest, CompletionResponse, ResponseMessage, Role, Usage,
};

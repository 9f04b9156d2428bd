//! Natural-language query assistant
//!
//! Turns free-text questions into live database lookups through a
//! language model. The model classifies each message into a `query` or
//! `chat` decision ([`decision`]), queries run through the document store
//! with a hard result cap, and the same model session summarizes the
//! results for the user ([`handler`]).

pub mod backend;
pub mod decision;
pub mod handler;
pub mod prompt;

pub use backend::{LlmBackend, LlmError, MockBackend, OpenAiBackend};
pub use decision::Decision;
pub use handler::{Assistant, ChatRole, ChatTurn, RESULT_CAP, STORE_APOLOGY};

//! Message handling - Classification, filtering, dispatch and relay

pub mod dispatcher;
pub mod filters;
pub mod parser;
pub mod relay;
pub mod texts;


pub use dispatcher::{MessageDispatcher, Route};
pub use filters::AdminPolicy;
pub use parser::{Action, MessageParser};
pub use relay::RelayEngine;

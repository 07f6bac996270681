//! Domain layer - Core types with no transport dependencies
//! 
//! This layer contains:
//! - Entities: Users, inbound messages, reply keyboards
//! - Traits: The outbound messaging transport (Bot)

pub mod entities;
pub mod traits;

//! Infrastructure layer - network, files and messaging

pub mod http;
pub mod messaging;
pub mod storage;

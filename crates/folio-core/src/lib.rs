pub mod config;
pub mod logging;

pub mod assets;
pub mod clock;
pub mod describe;
pub mod fetch;
pub mod github;
pub mod http;
pub mod page;
pub mod pipeline;
pub mod project;
pub mod publish;
pub mod render;
pub mod retry;
pub mod url_model;

#[cfg(test)]
mod testing;

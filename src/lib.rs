pub mod app;
pub mod cli;
pub mod config;
pub mod dom;
pub mod format;
pub mod interact;
pub mod loader;
pub mod model;
pub mod output;
pub mod page;
pub mod render;
pub mod runner;
pub mod view;

#[cfg(test)]
mod tests;

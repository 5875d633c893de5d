use crate::client::TodoApi;
use std::sync::Arc;

pub mod view;
pub mod web;

/// State shared by the todo page handlers.
#[derive(Clone)]
pub struct TodoState {
    pub api: Arc<dyn TodoApi>,
}

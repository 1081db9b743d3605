/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - strategy ごとの AuthenticationHandler を保持する
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::authentication::AuthenticationHandler;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub handlers: Arc<Vec<AuthenticationHandler>>,
}

impl AppState {
    pub fn new(handlers: Vec<AuthenticationHandler>) -> Self {
        Self {
            handlers: Arc::new(handlers),
        }
    }
}

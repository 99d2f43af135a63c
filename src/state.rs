use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::email::EmailProvider;
use crate::services::identity::IdentityProvider;
use crate::services::payments::PaymentProvider;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub payments: Box<dyn PaymentProvider>,
    pub email: Box<dyn EmailProvider>,
    pub identity: Box<dyn IdentityProvider>,
}

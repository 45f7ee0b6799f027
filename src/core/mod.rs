pub mod adapter;
pub mod request;

pub use crate::domain::model::{User, UserData};
pub use crate::domain::ports::{ConfigProvider, UserApi, UserStream};
pub use crate::utils::error::Result;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

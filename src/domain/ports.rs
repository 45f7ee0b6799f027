use crate::domain::model::User;
use crate::utils::error::Result;
use futures::stream::{BoxStream, Stream};

/// Lazily fetched users. Yields `Err` once and ends if the exchange fails.
pub type UserStream = BoxStream<'static, Result<User>>;

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
}

pub trait UserApi: Send + Sync {
    /// Fetch up to `limit` users, blocking the calling thread.
    fn fetch_users_blocking(&self, limit: i32) -> Result<Vec<User>>;

    /// Fetch users as a stream.
    ///
    /// `limit` must emit at most one value. It is awaited synchronously on
    /// the calling thread before the stream is built, so a failing source
    /// is reported here and not through the stream.
    fn fetch_users_reactive<S, E>(&self, limit: S) -> Result<UserStream>
    where
        S: Stream<Item = std::result::Result<i32, E>>,
        E: std::error::Error + Send + Sync + 'static;
}

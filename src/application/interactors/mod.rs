pub mod password_reset;
pub mod users;

use tracing::error;

use crate::application::app_error::AppResult;
use crate::application::interface::db::DBSession;

/// Rolls the unit of work back when `result` is an error, then hands the result back.
pub(crate) async fn rollback_on_error<T>(db_session: &dyn DBSession, result: AppResult<T>) -> AppResult<T> {
    if result.is_err() {
        if let Err(err) = db_session.rollback().await {
            error!("Failed to roll back session: {}", err);
        }
    }
    result
}

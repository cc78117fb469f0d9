use crate::api::SharedApi;
use crate::app::App;
use crate::auth::{is_auth_error, Route};
use crate::types::Me;

/// Check the stored session and open the first screen: the dashboard when
/// signed in, the login screen otherwise.
pub async fn initialize_app_state(app: &mut App, api: &SharedApi) -> Route {
    match api.current_user().await {
        Ok(Some(user)) => {
            tracing::info!(user = %user.display_name(), "session restored");
            app.set_user(Some(Me::from(user)));
        }
        Ok(None) => tracing::info!("no active session"),
        Err(e) if is_auth_error(&e) => tracing::info!("stored session rejected"),
        Err(e) => {
            tracing::error!(error = ?e, "session check failed");
            app.notify_error(format!("Could not reach the record API: {}", e));
        }
    }

    app.navigate(Route::Dashboard)
}

use axum::{Router, routing::{get, patch}};
use crate::{AppState, controllers::user_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/user", get(user_controller::get_user))
        .route("/user/display-name", patch(user_controller::patch_display_name))
        .route(
            "/user/email-notifications",
            patch(user_controller::patch_email_notifications),
        )
}

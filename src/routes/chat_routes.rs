use axum::{Router, routing::get};
use crate::{AppState, controllers::chat_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/chat/messages",
        get(chat_controller::get_messages).post(chat_controller::post_message),
    )
}

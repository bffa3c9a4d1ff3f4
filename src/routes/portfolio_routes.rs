use axum::{Router, routing::get};
use crate::{AppState, controllers::benchmark_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/portfolio/benchmark",
        get(benchmark_controller::get_benchmark).put(benchmark_controller::put_benchmark),
    )
}

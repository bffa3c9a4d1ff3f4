pub mod home_controller;
pub mod auth_controller;
pub mod user_controller;
pub mod alerts_controller;
pub mod chat_controller;
pub mod benchmark_controller;

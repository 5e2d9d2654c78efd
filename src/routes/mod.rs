pub mod admin;

pub mod auth;

pub mod judging;

pub mod results;

pub mod ws;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use judging::configure_judging_routes;
pub use results::configure_results_routes;
pub use ws::configure_ws_routes;

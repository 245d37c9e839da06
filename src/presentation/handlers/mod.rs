mod create_podcast;
mod health;
mod list_podcasts;
mod podcast_detail;
mod update_podcast;

use serde::Serialize;

pub use create_podcast::create_podcast_handler;
pub use health::health_handler;
pub use list_podcasts::list_podcasts_handler;
pub use podcast_detail::podcast_detail_handler;
pub use update_podcast::update_podcast_handler;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

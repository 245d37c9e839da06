mod in_memory_repository;
mod pg_podcast_repository;
mod pg_pool;

pub use in_memory_repository::InMemoryPodcastRepository;
pub use pg_podcast_repository::PgPodcastRepository;
pub use pg_pool::create_pool;

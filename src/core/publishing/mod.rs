pub mod blog_publisher;
pub mod publish_service;

pub use blog_publisher::{BlogPublisher, PostDraft, PostError, PublishedPost};
pub use publish_service::{
    parse_labels, PublishReport, PublishRequest, PublishService, RunOutcome,
};

pub mod article_writer;
pub mod content_models;
pub mod content_provider;
pub mod formatting;
pub mod images;
pub mod topics;

pub use article_writer::ArticleWriter;
pub use content_models::Article;
pub use content_provider::{ContentError, ContentProvider, GenerationSettings, TextGenerator};
pub use formatting::{ArticleRenderer, StyledHtmlRenderer};
pub use topics::{FixedTopic, RandomTopicGenerator, TopicSource};

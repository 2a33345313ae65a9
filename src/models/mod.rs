mod account;
mod article;
mod id;
mod records;
mod settings;
mod style;

pub use account::{AccountUpdate, NewAccount, WeChatAccount};
pub use article::{Article, ArticleFilter, ArticleStatus, ArticleUpdate};
pub use id::{random_id, timestamp_id};
pub use records::{
    GeneratedImage, ImageStatus, ImageUpdate, PublicationRecord, PublicationStatus,
    PublicationUpdate, RewriteRecord,
};
pub use settings::{AppConfig, ConfigUpdate, Theme};
pub use style::{Platform, RewriteStyle};

pub mod api;
pub mod cli;
pub mod collection;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod forms;
pub mod notices;
pub mod session;
pub mod views;

pub use api::{ApiClient, RequestOptions};
pub use collection::{
    CollectionSource, FailurePolicy, FetchOutcome, FilterSet, FilterState, ListItem, PageResult,
    PageSource, RemoteCollection,
};
pub use config::Config;
pub use error::{MoveMindsError, Result};
pub use forms::{FormSchema, FormValues, Rule, UsernameCheck, UsernameState, ValidationErrors};
pub use notices::{Notice, NoticeLevel, Notices};
pub use session::{Session, SessionContext, SessionState, SessionStore, SessionWatcher};

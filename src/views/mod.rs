//! Dashboard views.
//!
//! Each list view pairs a [`CollectionSource`](crate::collection::CollectionSource)
//! for one endpoint with its filter set, and adds the mutations that page
//! offers. The remaining modules load composite data (instructor stats,
//! program content, checkout forms).

pub mod activities;
pub mod admin_programs;
pub mod admin_users;
pub mod content;
pub mod instructor;
pub mod messages;
pub mod my_programs;
pub mod payment;
pub mod programs;

use moveminds_dto::{Activity, Conversation, Enrollment, Program, User};

use crate::collection::ListItem;

impl ListItem for User {
    fn id(&self) -> i64 {
        self.id
    }
}

impl ListItem for Program {
    fn id(&self) -> i64 {
        self.id
    }
}

impl ListItem for Conversation {
    fn id(&self) -> i64 {
        self.id
    }
}

impl ListItem for Enrollment {
    fn id(&self) -> i64 {
        self.id
    }
}

impl ListItem for Activity {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Search term as an optional query parameter.
pub(crate) fn search_param(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_string())
}

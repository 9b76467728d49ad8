#![allow(missing_docs)]

pub(crate) mod collaborators;
pub(crate) mod html;
pub(crate) mod server;

pub(crate) use collaborators::{TestCollaborators, transaction_item};
pub(crate) use html::{assert_valid_html, must_get_text};
pub(crate) use server::{spawn_test_server, unused_local_url};

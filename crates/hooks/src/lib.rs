//! Message-hook services wiring tracker reference linking into a chat host.
//!
//! The host drives two lifecycle stages. Before a message persists it runs
//! [`PreSendLinker`], which gates on link-only and commit references and
//! rewrites them into markdown links through the host's message builder.
//! After a message is sent it runs [`PostSendEnricher`], which gates on
//! embeddable task/revision references, resolves them via Conduit and
//! appends collapsed preview attachments through the host's message
//! extender. Both services are stateless; tracker settings are read fresh
//! from the host store on every operation.

pub mod host;
pub mod post_send;
pub mod pre_send;
pub mod settings;

pub use {
    host::{
        AttachmentTitle, ChatMessage, MessageAttachment, MessageBuilder, MessageExtender,
        SettingsReader,
    },
    post_send::PostSendEnricher,
    pre_send::PreSendLinker,
};

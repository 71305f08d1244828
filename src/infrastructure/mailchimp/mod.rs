//! Mailchimp Marketing API v3.

mod client;
pub mod dto;

pub use client::MailchimpClient;

//! Domain layer containing the campaign metrics data model.
//!
//! This module defines entities and gateway interfaces independent of any
//! HTTP client or spreadsheet API.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (campaigns, links, batch jobs, rates)
//! - [`gateways`] - Remote system trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Gateway traits define contracts implemented by infrastructure layer
//! - Pipeline logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Report Flow
//!
//! 1. Campaign search resolves a [`entities::CampaignId`]
//! 2. Tracked links are grouped into [`entities::LinkGroups`]
//! 3. One batch per destination URL becomes a [`entities::ClickJob`]
//! 4. Result archives fold into [`entities::UrlAggregate`]s
//! 5. Totals and the [`entities::CampaignSummary`] produce [`entities::UrlRate`]s
//! 6. The [`entities::CampaignReport`] goes to a [`gateways::SheetPublisher`]

pub mod entities;
pub mod gateways;

//! # backlot-services
//!
//! The few flows with logic beyond a single repository call: account
//! management and login, campaign/contact association, and order placement
//! with validated status transitions. Everything else in the API is a plain
//! repository pass-through and does not come through here.

pub mod accounts;
pub mod campaigns;
pub mod orders;

pub use accounts::AccountService;
pub use campaigns::CampaignService;
pub use orders::OrderService;

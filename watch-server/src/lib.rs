//! Train watch server.
//!
//! A web application that keeps an eye on Belgian trains: each watched
//! train gets a card that periodically refreshes its live itinerary
//! from the iRail API and shows delays, cancellations, platform
//! changes, and how stale the data is.

pub mod card;
pub mod config;
pub mod domain;
pub mod i18n;
pub mod irail;
pub mod web;

//! Seat availability scout for the China Railway (12306) left-ticket API.
//!
//! Answers: "this train is sold out for my segment, but it runs further;
//! is a ticket to a later stop still on sale?" Buying that longer ticket
//! and alighting early covers the sold-out segment.

pub mod domain;
pub mod inventory;
pub mod route;
pub mod search;
pub mod stations;
pub mod transport;

//! Clients for the launcher's external collaborators and LAN discovery.

pub mod discovery;
pub mod steam;
pub mod updates;

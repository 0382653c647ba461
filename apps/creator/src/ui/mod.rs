//! # Terminal Surfaces
//!
//! The two prompt screens: login and creator. Each surface runs until a
//! session change (or redirect) hands control back to the surface loop in
//! [`crate::app`].

pub mod creator;
pub mod login;

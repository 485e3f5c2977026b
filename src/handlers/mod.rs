//! HTTP handlers module
//!
//! This module contains the request handlers for the Secret-Santa endpoints

pub mod assignments;
pub mod health;

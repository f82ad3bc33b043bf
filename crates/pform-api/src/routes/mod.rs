//! Route modules, one router per concern.

pub mod calculator;
pub mod catalog;
pub mod form;

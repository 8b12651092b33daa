#[path = "../support/mod.rs"]
mod support;

mod article;
mod cascade;
mod conditions;
mod filters;
mod revert;

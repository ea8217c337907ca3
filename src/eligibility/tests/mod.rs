mod common;
mod registry;
mod rules;
mod service;

pub mod database;
pub mod models;
pub mod services;
pub mod web;

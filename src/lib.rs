pub mod core;
pub mod db;
pub mod ledgerly_web_server;
pub mod models;
pub mod routes;

// Companion API service: readiness and a database clock probe.
pub mod application;
pub mod bootstrap;
pub mod infrastructure;
pub mod presentation;

pub mod database_clock;

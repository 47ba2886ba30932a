pub mod anomalies;
pub mod dashboard;
pub mod health;
pub mod logs;
pub mod machines;
pub mod readings;
pub mod system;

pub mod candidate_routes;
pub mod health;
pub mod interview;
pub mod openapi;
pub mod report;
pub mod resume;

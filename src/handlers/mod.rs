// handlers/mod.rs - HTTP handlers
//
// public:    no authentication (service description, health)
// protected: behind the JWT middleware, under /api/permissions

pub mod protected;
pub mod public;

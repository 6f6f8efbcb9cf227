// handlers/protected/mod.rs - Handlers behind the JWT middleware
//
// Every handler here still calls `require_user` so a missing user context
// answers 401 before the resolver, cache or store is touched.

pub mod permissions;

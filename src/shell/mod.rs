// Composition root for the reservations bounded context.
//
// Responsibilities
// - Read config from files and environment.
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into use case handlers.
// - Spawn background workers (stale reservation sweeper).
// - Expose the HTTP router.

pub mod config;
pub mod http;
pub mod state;
pub mod workers;

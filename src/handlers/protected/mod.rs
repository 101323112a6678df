// handlers/protected/mod.rs - Handlers behind the bearer token gate
//
// Route Prefix: /v1/productos
// Middleware: token_auth_middleware (no identity is injected)

pub mod productos;

pub use productos::*;

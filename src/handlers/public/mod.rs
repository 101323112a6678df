// handlers/public/mod.rs - Handlers reachable without a token
//
// Token issuance must stay outside the auth gate: it is how a client
// bootstraps its first credential.

pub mod token;

pub use token::get as token_get;

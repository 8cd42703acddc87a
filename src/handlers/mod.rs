// handlers/mod.rs - two handler tiers
//
// Public (no identity) → Protected (identity required, most routes also gated
// per resource by the access middleware attached in server.rs)
pub mod protected;
pub mod public;

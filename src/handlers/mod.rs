// Handlers are split by security tier:
// public (no auth, /auth/* and /health) and protected (JWT required, /api/*)
pub mod protected;
pub mod public;

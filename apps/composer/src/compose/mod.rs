// Composition sessions: the HTTP-facing side of the curation engine.
// One in-memory session per job id; handlers translate requests into curation actions.

pub mod handlers;
pub mod sessions;
